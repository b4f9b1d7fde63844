use crate::internal::*;
use crate::model::Buffer;
use crate::ops::input_shape;

use super::Interpolation;

op_config! {
    /// Applies one projective transform per image. Always NHWC, whatever the
    /// graph's axis order.
    pub struct ImageProjectiveTransform {
        interpolation_mode: Interpolation = Interpolation::Bilinear,
        /// Output `[height, width]`, the input size when unset.
        output_shape: Option<[usize; 2]> = None,
    }
}

impl IrOp for ImageProjectiveTransform {
    fn infer_shape(&self, inputs: &[Shape], _n: usize, _ao: AxisOrder) -> ShapeResult<TVec<Shape>> {
        let input = AxisOrder::Tf.extract_spatial_dims(input_shape(inputs, 0)?)?;
        let (height, width) = match self.output_shape {
            Some([h, w]) => (h, w),
            None => (input.height, input.width),
        };
        Ok(tvec!(tvec![input.batch, height, width, input.depth]))
    }

    fn populate_axis_format(&self, buffer: &mut Buffer, _axis_order: AxisOrder) {
        buffer.axis_format = AxisFormat::Nsc;
    }
}
