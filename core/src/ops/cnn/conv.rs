use super::padding::{PadMode, PaddingSizeStrategy, calc_conv_output_dim};
use super::{bias_depth, kernel_hw};
use crate::internal::*;
use crate::ops::input_shape;

op_config! {
    /// 2D convolution. The bias is sized to the output channels.
    pub struct Conv {
        weights: Tensor,
        bias: Tensor,
        padx: usize,
        pady: usize,
        stridex: usize,
        stridey: usize,
        dilationx: usize,
        dilationy: usize,
        groups: usize = 1,
        padding_mode: PadMode = PadMode::Zero,
        padding_size_strategy: PaddingSizeStrategy = PaddingSizeStrategy::Explicit,
    }
}

impl IrOp for Conv {
    fn infer_shape(&self, inputs: &[Shape], _n: usize, axis_order: AxisOrder) -> ShapeResult<TVec<Shape>> {
        let input = axis_order.extract_spatial_dims(input_shape(inputs, 0)?)?;
        let (kernel_h, kernel_w) = kernel_hw(&self.weights, axis_order)?;
        let height = calc_conv_output_dim(
            input.height,
            kernel_h,
            self.pady,
            self.stridey,
            self.dilationy,
            self.padding_size_strategy,
        )?;
        let width = calc_conv_output_dim(
            input.width,
            kernel_w,
            self.padx,
            self.stridex,
            self.dilationx,
            self.padding_size_strategy,
        )?;
        let depth = bias_depth(&self.bias)?;
        let output = SpatialDims::new(input.batch, height, width, depth);
        Ok(tvec!(axis_order.format_spatial_output_shape(output)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conv(weights: &[usize], strategy: &str, pad: usize, stride: usize) -> Conv {
        let bag = AttrBag::new()
            .with("weights", Tensor::zeros(weights))
            .with("bias", Tensor::zeros(&[16]))
            .with("padx", pad)
            .with("pady", pad)
            .with("stridex", stride)
            .with("stridey", stride)
            .with("dilationx", 1usize)
            .with("dilationy", 1usize)
            .with("padding_size_strategy", strategy);
        Conv::from_attrs("conv", OpType::Convolution, &bag).unwrap()
    }

    #[test]
    fn explicit_same_padding_preserves_size() {
        let c = conv(&[16, 3, 3, 3], "PADDING_SIZE_EXPLICIT", 1, 1);
        let shapes = c.infer_shape(&[tvec![1, 3, 32, 32]], 1, AxisOrder::Caffe).unwrap();
        assert_eq!(shapes, tvec!(tvec![1, 16, 32, 32]));
    }

    #[test]
    fn tf_layout() {
        // weights follow the graph's spatial layout
        let c = conv(&[16, 5, 5, 3], "PADDING_SIZE_IMPLICIT_VALID", 0, 2);
        let shapes = c.infer_shape(&[tvec![2, 28, 28, 3]], 1, AxisOrder::Tf).unwrap();
        assert_eq!(shapes, tvec!(tvec![2, 12, 12, 16]));
    }

    #[test]
    fn defaults() {
        let c = conv(&[16, 3, 3, 3], "PADDING_SIZE_EXPLICIT", 0, 1);
        assert_eq!(c.groups, 1);
        assert_eq!(c.padding_mode, PadMode::Zero);
    }

    #[test]
    fn missing_stride() {
        let bag = AttrBag::new()
            .with("weights", Tensor::zeros(&[1, 1, 1, 1]))
            .with("bias", Tensor::zeros(&[1]))
            .with("padx", 0usize)
            .with("pady", 0usize);
        let e = Conv::from_attrs("c", OpType::Convolution, &bag).unwrap_err();
        assert_eq!(e.to_string(), "Op c (convolution) is missing required attribute `stridex`");
    }

    #[test]
    fn rank_3_input_is_rejected() {
        let c = conv(&[16, 3, 3, 3], "PADDING_SIZE_EXPLICIT", 1, 1);
        assert!(c.infer_shape(&[tvec![3, 32, 32]], 1, AxisOrder::Caffe).is_err());
    }
}
