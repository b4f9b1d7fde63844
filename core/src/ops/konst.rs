use crate::internal::*;
use crate::model::Buffer;

op_config! {
    /// A materialized tensor value.
    pub struct Constant {
        tensor: Tensor,
        quantizable: bool = true,
    }
}

impl Constant {
    pub fn new(tensor: Tensor) -> Constant {
        Constant { tensor, quantizable: true }
    }

    /// A constant of `shape` where every element is `value`.
    pub fn from_scalar(value: f32, shape: &[usize]) -> Constant {
        Constant::new(Tensor::filled(shape, value))
    }
}

impl IrOp for Constant {
    fn infer_shape(&self, _inputs: &[Shape], _n: usize, _ao: AxisOrder) -> ShapeResult<TVec<Shape>> {
        Ok(tvec!(self.tensor.shape_tvec()))
    }

    fn populate_axis_format(&self, buffer: &mut Buffer, _axis_order: AxisOrder) {
        buffer.axis_format = AxisFormat::Any;
    }
}
