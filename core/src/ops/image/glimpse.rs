use crate::internal::*;
use crate::ops::input_shape;

op_config! {
    pub struct ExtractGlimpse {
        glimpse_width: usize,
        glimpse_height: usize,
        centered: bool,
        normalized: bool,
        uniform_noise: bool,
    }
}

impl IrOp for ExtractGlimpse {
    fn infer_shape(&self, inputs: &[Shape], _n: usize, axis_order: AxisOrder) -> ShapeResult<TVec<Shape>> {
        let input = axis_order.extract_spatial_dims(input_shape(inputs, 0)?)?;
        let output = SpatialDims::new(input.batch, self.glimpse_height, self.glimpse_width, input.depth);
        Ok(tvec!(axis_order.format_spatial_output_shape(output)))
    }
}
