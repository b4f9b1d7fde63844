use super::padding::{PaddingSizeStrategy, calc_deconv_output_dim};
use super::{bias_depth, kernel_hw};
use crate::internal::*;
use crate::ops::input_shape;

op_config! {
    /// Transposed 2D convolution.
    ///
    /// `output_height` and `output_width` override the computed spatial size;
    /// zero means unset.
    pub struct Deconv {
        weights: Tensor,
        bias: Tensor,
        stride: usize = 1,
        padx: usize = 0,
        pady: usize = 0,
        padding_size_strategy: PaddingSizeStrategy = PaddingSizeStrategy::Explicit,
        output_paddingx: usize = 0,
        output_paddingy: usize = 0,
        output_height: usize,
        output_width: usize,
        groups: usize = 1,
    }
}

impl IrOp for Deconv {
    fn infer_shape(&self, inputs: &[Shape], _n: usize, axis_order: AxisOrder) -> ShapeResult<TVec<Shape>> {
        let input = axis_order.extract_spatial_dims(input_shape(inputs, 0)?)?;
        let (kernel_h, kernel_w) = kernel_hw(&self.weights, axis_order)?;
        let (height, width) = if self.output_height == 0 {
            (
                calc_deconv_output_dim(input.height, kernel_h, self.stride, self.pady)?,
                calc_deconv_output_dim(input.width, kernel_w, self.stride, self.padx)?,
            )
        } else {
            (self.output_height, self.output_width)
        };
        let output = SpatialDims::new(input.batch, height, width, bias_depth(&self.bias)?);
        Ok(tvec!(axis_order.format_spatial_output_shape(output)))
    }
}
