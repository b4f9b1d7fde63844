use crate::internal::*;

op_config! {
    /// User-defined layer. The payload is opaque to the converter, which
    /// only forwards the output shapes declared by the layer's author.
    pub struct Udl {
        layer_type: String,
        blob: AttrValue = AttrValue::None,
        output_dims: Vec<Shape>,
        expected_input_axis_orders: Vec<Vec<String>> = vec![],
        expected_output_axis_orders: Vec<Vec<String>> = vec![],
    }
}

impl IrOp for Udl {
    fn infer_shape(&self, _inputs: &[Shape], _n: usize, _ao: AxisOrder) -> ShapeResult<TVec<Shape>> {
        Ok(self.output_dims.iter().cloned().collect())
    }
}
