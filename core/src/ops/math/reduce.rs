use crate::internal::*;
use crate::ops::{input_shape, resolve_axis};

op_config! {
    /// Reduction (max, mean, min, prod, sum) over `axes`.
    pub struct Reduce {
        axes: TVec<i64>,
        keep_dims: bool = true,
    }
}

op_config! {
    /// Mean and variance over `axes`, as two outputs.
    pub struct Moment {
        axes: TVec<i64>,
        keep_dims: bool = false,
    }
}

op_config! {
    pub struct ArgMax {
        axis: i64,
        keep_dims: bool = false,
    }
}

op_config! {
    /// Max over the third axis from the end.
    pub struct MaxY {}
}

/// Shape of `input` reduced over `axes`.
///
/// Walks input axes in ascending order: reduced axes become 1 when
/// `keep_dims` is set and disappear otherwise, the others are kept in order.
pub fn reduced_shape(input: &[usize], axes: &[i64], keep_dims: bool) -> ShapeResult<Shape> {
    let axes: TVec<usize> =
        axes.iter().map(|&a| resolve_axis(a, input.len())).collect::<ShapeResult<_>>()?;
    let mut output = Shape::new();
    for (ix, &dim) in input.iter().enumerate() {
        if !axes.contains(&ix) {
            output.push(dim);
        } else if keep_dims {
            output.push(1);
        }
    }
    Ok(output)
}

impl IrOp for Reduce {
    fn infer_shape(&self, inputs: &[Shape], _n: usize, _ao: AxisOrder) -> ShapeResult<TVec<Shape>> {
        Ok(tvec!(reduced_shape(input_shape(inputs, 0)?, &self.axes, self.keep_dims)?))
    }
}

impl IrOp for Moment {
    fn infer_shape(&self, inputs: &[Shape], _n: usize, _ao: AxisOrder) -> ShapeResult<TVec<Shape>> {
        let output = reduced_shape(input_shape(inputs, 0)?, &self.axes, self.keep_dims)?;
        Ok(tvec!(output.clone(), output))
    }
}

impl IrOp for ArgMax {
    fn infer_shape(&self, inputs: &[Shape], _n: usize, _ao: AxisOrder) -> ShapeResult<TVec<Shape>> {
        Ok(tvec!(reduced_shape(input_shape(inputs, 0)?, &[self.axis], self.keep_dims)?))
    }
}

impl IrOp for MaxY {
    fn infer_shape(&self, inputs: &[Shape], _n: usize, _ao: AxisOrder) -> ShapeResult<TVec<Shape>> {
        let mut output = input_shape(inputs, 0)?.clone();
        ensure_shape!(output.len() >= 3, "expected an input of rank 3 or more, got {}", output.len());
        let axis = output.len() - 3;
        output[axis] = 1;
        Ok(tvec!(output))
    }
}
