use crate::internal::*;
use crate::model::Buffer;

op_config! {
    /// A graph input with a declared shape.
    pub struct Input {
        shape: Shape,
        input_encoding_in: String,
        input_encoding_out: String,
        input_type: String,
    }
}

impl Input {
    /// Opaque inputs are not interpreted as images or sequences.
    pub fn is_opaque(&self) -> bool {
        self.input_type == "opaque"
    }
}

impl IrOp for Input {
    fn infer_shape(&self, _inputs: &[Shape], _n: usize, _ao: AxisOrder) -> ShapeResult<TVec<Shape>> {
        Ok(tvec!(self.shape.clone()))
    }

    fn populate_axis_format(&self, buffer: &mut Buffer, axis_order: AxisOrder) {
        if self.is_opaque() {
            buffer.axis_format = AxisFormat::NonTrivial;
        } else {
            buffer.populate_axis_format(axis_order)
        }
    }
}
