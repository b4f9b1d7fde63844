//! `Tensor`, the concrete value carried by weights and constants.
use crate::Shape;
use itertools::Itertools;
use ndarray::prelude::*;
use std::fmt;

/// A materialized, row-major f32 tensor.
///
/// Translation handlers resolve weights before they reach the IR, so a
/// `Tensor` is never symbolic: its shape and every value are known.
#[derive(Clone, PartialEq)]
pub struct Tensor(ArrayD<f32>);

impl Tensor {
    pub fn zeros(shape: &[usize]) -> Tensor {
        Tensor(ArrayD::zeros(IxDyn(shape)))
    }

    /// A tensor of the given shape where every element is `value`.
    pub fn filled(shape: &[usize], value: f32) -> Tensor {
        Tensor(ArrayD::from_elem(IxDyn(shape), value))
    }

    pub fn from_shape_vec(shape: &[usize], data: Vec<f32>) -> Result<Tensor, ndarray::ShapeError> {
        Ok(Tensor(ArrayD::from_shape_vec(IxDyn(shape), data)?))
    }

    #[inline]
    pub fn shape(&self) -> &[usize] {
        self.0.shape()
    }

    #[inline]
    pub fn rank(&self) -> usize {
        self.0.ndim()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn is_scalar(&self) -> bool {
        self.rank() == 0
    }

    /// Dimension `axis`, counted from the end when negative.
    pub fn dim(&self, axis: isize) -> Option<usize> {
        let rank = self.rank() as isize;
        let axis = if axis < 0 { axis + rank } else { axis };
        if (0..rank).contains(&axis) { Some(self.shape()[axis as usize]) } else { None }
    }

    pub fn shape_tvec(&self) -> Shape {
        self.shape().iter().copied().collect()
    }

    /// Reshapes in row-major order. Fails if element counts differ.
    pub fn into_shape(self, shape: &[usize]) -> Result<Tensor, ndarray::ShapeError> {
        let array = if self.0.is_standard_layout() {
            self.0
        } else {
            self.0.as_standard_layout().into_owned()
        };
        Ok(Tensor(array.into_shape_with_order(IxDyn(shape))?))
    }

    pub fn to_array_view(&self) -> ArrayViewD<'_, f32> {
        self.0.view()
    }

    pub fn into_array(self) -> ArrayD<f32> {
        self.0
    }

    pub fn as_slice(&self) -> Option<&[f32]> {
        self.0.as_slice()
    }

    /// Row-major copy of the values.
    pub fn to_vec(&self) -> Vec<f32> {
        self.0.iter().copied().collect()
    }

    /// Same values, flattened to rank 1.
    pub fn flatten(&self) -> Tensor {
        self.0.iter().copied().collect::<Array1<f32>>().into()
    }
}

impl<D: Dimension> From<Array<f32, D>> for Tensor {
    fn from(array: Array<f32, D>) -> Tensor {
        Tensor(array.into_dyn())
    }
}

impl From<f32> for Tensor {
    fn from(value: f32) -> Tensor {
        tensor0(value)
    }
}

impl fmt::Debug for Tensor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let content = self.0.iter().take(8).join(", ");
        let ellipsis = if self.len() > 8 { ", ..." } else { "" };
        write!(f, "{} f32 [{content}{ellipsis}]", format_shape(self.shape()))
    }
}

/// Renders a shape as `2x3x4` (or `scalar`), the way shapes appear in logs.
pub fn format_shape(shape: &[usize]) -> String {
    if shape.is_empty() { "scalar".to_string() } else { shape.iter().join("x") }
}

pub fn tensor0(x: f32) -> Tensor {
    Tensor(arr0(x).into_dyn())
}

pub fn tensor1(xs: &[f32]) -> Tensor {
    Tensor(arr1(xs).into_dyn())
}

pub fn tensor2<const N: usize>(xs: &[[f32; N]]) -> Tensor {
    Tensor(arr2(xs).into_dyn())
}
