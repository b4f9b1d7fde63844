//! Ops whose output shapes are resolved by the translation and stored.
use crate::internal::*;

op_config! {
    pub struct Reshape {
        output_shape: Shape,
    }
}

op_config! {
    pub struct Crop {
        offsets: TVec<usize>,
        output_shape: Shape,
    }
}

op_config! {
    /// Splits input 0 along `axis` at `slice_points`, one output per piece.
    pub struct Slice {
        axis: i64,
        slice_points: TVec<usize>,
        output_shape: Vec<Shape>,
    }
}

impl IrOp for Reshape {
    fn infer_shape(&self, _inputs: &[Shape], _n: usize, _ao: AxisOrder) -> ShapeResult<TVec<Shape>> {
        Ok(tvec!(self.output_shape.clone()))
    }
}

impl IrOp for Crop {
    fn infer_shape(&self, _inputs: &[Shape], _n: usize, _ao: AxisOrder) -> ShapeResult<TVec<Shape>> {
        Ok(tvec!(self.output_shape.clone()))
    }
}

impl IrOp for Slice {
    fn infer_shape(&self, _inputs: &[Shape], _n: usize, _ao: AxisOrder) -> ShapeResult<TVec<Shape>> {
        Ok(self.output_shape.iter().cloned().collect())
    }
}
