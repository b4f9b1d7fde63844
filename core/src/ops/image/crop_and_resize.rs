use crate::internal::*;
use crate::ops::input_shape;

attr_enum! {
    pub enum Interpolation {
        Bilinear => "BILINEAR",
        Nearest => "NEAREST",
    }
}

op_config! {
    /// Crops `num_boxes` regions out of the image batch and resizes each one
    /// to `crop_height x crop_width`.
    pub struct CropAndResize {
        num_boxes: usize,
        crop_height: usize,
        crop_width: usize,
        interpolation_method: Interpolation,
        extrapolation_value: f32,
    }
}

impl IrOp for CropAndResize {
    fn infer_shape(&self, inputs: &[Shape], _n: usize, axis_order: AxisOrder) -> ShapeResult<TVec<Shape>> {
        let input = axis_order.extract_spatial_dims(input_shape(inputs, 0)?)?;
        let output = SpatialDims::new(self.num_boxes, self.crop_height, self.crop_width, input.depth);
        Ok(tvec!(axis_order.format_spatial_output_shape(output)))
    }
}
