#![allow(clippy::len_zero)]
//! # irconv-core
//!
//! The IR side of the irconv model converter: a closed catalogue of
//! operator kinds with typed attributes and shape inference, the
//! [`IrGraph`](model::IrGraph) container that propagates shapes as builders
//! add ops, and the translation registry that maps source-framework
//! operator types to IR builders.
//!
//! ```
//! use irconv_core::prelude::*;
//!
//! let mut graph = IrGraph::new(AxisOrder::Caffe);
//! let input = AttrBag::new()
//!     .with("shape", tvec![1usize, 3, 32, 32])
//!     .with("input_encoding_in", "bgr")
//!     .with("input_encoding_out", "bgr")
//!     .with("input_type", "image");
//! graph.add(Op::from_attrs("data", OpType::Input, &input).unwrap(), &[], &["data"]).unwrap();
//!
//! let pool = AttrBag::new()
//!     .with("pool_type", "POOL_MAX")
//!     .with("size_x", 2usize)
//!     .with("size_y", 2usize)
//!     .with("stride_x", 2usize)
//!     .with("stride_y", 2usize);
//! graph.add(Op::from_attrs("pool1", OpType::Pool, &pool).unwrap(), &["data"], &["pool1"]).unwrap();
//!
//! assert_eq!(graph.get_output_shape("pool1").unwrap().as_slice(), &[1, 3, 16, 16]);
//! ```

#[macro_use]
extern crate derive_new;
#[macro_use]
extern crate log;

#[macro_use]
pub mod macros;

pub mod axes;
pub mod broadcast;
pub mod errors;
pub mod framework;
pub mod model;
#[macro_use]
pub mod ops;

pub use irconv_data;

pub mod prelude {
    pub use crate::axes::{AxisFormat, AxisOrder};
    pub use crate::errors::{IrError, IrResult, ShapeError, ShapeResult};
    pub use crate::framework::{
        Framework, OpBuilder, SourceNode, Translation, TranslationRegistry, UnsupportedPolicy,
    };
    pub use crate::model::IrGraph;
    pub use crate::ops::attrs::{AttrBag, AttrValue};
    pub use crate::ops::{Op, OpKind, OpType};
    pub use irconv_data::prelude::*;
}

pub mod internal {
    pub use crate::axes::{SpatialDims, TimeSeriesDims};
    pub use crate::errors::ShapeResultExt;
    pub use crate::ops::attrs::{Attributes, FromAttr};
    pub use crate::ops::IrOp;
    pub use crate::prelude::*;
    pub use crate::{bail_shape, ensure_shape};
    pub use irconv_data::internal::*;
    pub use itertools::Itertools;
    pub use std::collections::HashMap;
    pub use std::fmt;
}

#[cfg(test)]
fn setup_test_logger() {
    let _ = env_logger::Builder::from_env("IRCONV_LOG").is_test(true).try_init();
}
