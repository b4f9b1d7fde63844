//! # irconv-data
//!
//! Plain data types shared by every irconv crate: the `TVec` small vector,
//! the `Shape` alias and the concrete, materialized `Tensor` used to carry
//! weights and constants into the IR.

#[macro_use]
mod macros;

/// A Smallvec instantiation with 4 embeddable values.
///
/// Used about everywhere in irconv, for op inputs and outputs, or
/// tensor dimensions.
pub type TVec<T> = smallvec::SmallVec<[T; 4]>;

/// A concrete tensor shape.
pub type Shape = TVec<usize>;

mod tensor;

pub mod prelude {
    pub use crate::tensor::{Tensor, tensor0, tensor1, tensor2};
    pub use crate::tvec;
    pub use crate::{Shape, TVec};
}

pub mod internal {
    pub use crate::prelude::*;
    pub use crate::tensor::format_shape;
    pub use itertools as irconv_itertools;
    pub use ndarray as irconv_ndarray;
    pub use smallvec as irconv_smallvec;
}
