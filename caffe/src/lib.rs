#![allow(clippy::len_zero)]
//! # irconv-caffe
//!
//! Translations from Caffe layers to IR ops.
//!
//! Layers are handed over in neutral [`SourceNode`] form: the layer name,
//! its Caffe type (`Convolution`, `Pooling`, ...), bottoms as inputs, tops
//! as outputs, the layer parameters flattened into the attribute bag under
//! their prototxt names, and the weight blobs in order.
//!
//! ```
//! use irconv_caffe::prelude::*;
//!
//! let registry = irconv_caffe::caffe_translations().unwrap();
//! let layers = vec![
//!     SourceNode::new("data".to_string(), "Input".to_string())
//!         .with_outputs(&["data"])
//!         .with_attr("shape", vec![1usize, 3, 8, 8]),
//!     SourceNode::new("pool".to_string(), "Pooling".to_string())
//!         .with_inputs(&["data"])
//!         .with_outputs(&["pool"])
//!         .with_attr("pool", "MAX")
//!         .with_attr("kernel_size", 2usize)
//!         .with_attr("stride", 2usize),
//! ];
//! let mut graph = IrGraph::new(AxisOrder::Caffe);
//! irconv_caffe::translate_net(&registry, &layers, &mut graph).unwrap();
//! assert_eq!(graph.get_output_shape("pool").unwrap().as_slice(), &[1, 3, 4, 4]);
//! ```

#[macro_use]
extern crate log;

pub mod net;
pub mod ops;

pub use irconv_core;
pub use net::{rename_in_place_tops, translate_net};

pub mod prelude {
    pub use irconv_core::prelude::*;
}

use irconv_core::prelude::*;

/// A registry holding the Caffe translations.
pub fn caffe_translations() -> IrResult<TranslationRegistry> {
    let mut registry = TranslationRegistry::new();
    ops::register_all_ops(&mut registry)?;
    Ok(registry)
}

#[cfg(test)]
fn setup_test_logger() {
    let _ = env_logger::Builder::from_env("IRCONV_LOG").is_test(true).try_init();
}
