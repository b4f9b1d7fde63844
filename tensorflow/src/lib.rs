#![allow(clippy::len_zero)]
//! # irconv-tensorflow
//!
//! Translations from TensorFlow graph nodes to IR ops.
//!
//! Nodes are handed over in neutral [`SourceNode`] form: `NodeDef` name and
//! op, inputs as written in the graph (`name:1`, `^control`), attributes
//! flattened into the bag. Tensors feeding shapes, axes or permutations
//! must come from `Const` nodes: they are folded into IR attributes and
//! dropped from the op inputs.
//!
//! ```
//! use irconv_tensorflow::prelude::*;
//!
//! let registry = irconv_tensorflow::tensorflow_translations().unwrap();
//! let nodes = vec![
//!     SourceNode::new("x".to_string(), "Placeholder".to_string()).with_attr("shape", vec![1usize, 6]),
//!     SourceNode::new("shape".to_string(), "Const".to_string()).with_attr("value", tensor1(&[3.0, 2.0])),
//!     SourceNode::new("r".to_string(), "Reshape".to_string()).with_inputs(&["x", "shape"]),
//! ];
//! let mut graph = IrGraph::new(AxisOrder::Tf);
//! irconv_tensorflow::translate_graph(&registry, &nodes, &mut graph).unwrap();
//! assert_eq!(graph.get_output_shape("r").unwrap().as_slice(), &[3, 2]);
//! assert_eq!(graph.output_names(), vec!["r"]);
//! ```

#[macro_use]
extern crate derive_new;
#[macro_use]
extern crate log;

pub mod model;
pub mod ops;

pub use irconv_core;
pub use model::{normalize_inputs, translate_graph};

pub mod prelude {
    pub use irconv_core::prelude::*;
}

use irconv_core::prelude::*;

/// A registry holding the TensorFlow translations.
pub fn tensorflow_translations() -> IrResult<TranslationRegistry> {
    let mut registry = TranslationRegistry::new();
    ops::register_all_ops(&mut registry)?;
    Ok(registry)
}

#[cfg(test)]
fn setup_test_logger() {
    let _ = env_logger::Builder::from_env("IRCONV_LOG").is_test(true).try_init();
}
