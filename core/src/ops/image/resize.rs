use crate::internal::*;
use crate::ops::cnn::calc_deconv_output_dim;
use crate::ops::input_shape;

attr_enum! {
    pub enum ResizeMode {
        Bilinear => "RESIZE_BILINEAR",
        NearestNeighbor => "RESIZE_NEAREST_NEIGHBOR",
    }
}

op_config! {
    /// Image resize to a declared output shape. Also backs `upsample`.
    pub struct Resize {
        output_shape: Shape,
        pad_value: f32 = 0.0,
        maintain_aspect_ratio: bool = false,
        resize_mode: ResizeMode = ResizeMode::Bilinear,
        scale_height: f32 = 0.0,
        scale_width: f32 = 0.0,
        align_corners: bool = false,
    }
}

op_config! {
    /// Max-unpooling, driven either by the pooling indices (input 1) or by
    /// the sparse positions of the pooling window.
    ///
    /// A non-positive `output_height`/`output_width` means the size is
    /// derived from the pooling window.
    pub struct UpsampleIndexed {
        pool_size: usize,
        pool_stride: usize = 1,
        pad: usize = 0,
        output_height: i64 = -1,
        output_width: i64 = -1,
    }
}

impl IrOp for Resize {
    fn infer_shape(&self, _inputs: &[Shape], _n: usize, _ao: AxisOrder) -> ShapeResult<TVec<Shape>> {
        Ok(tvec!(self.output_shape.clone()))
    }
}

impl IrOp for UpsampleIndexed {
    fn infer_shape(&self, inputs: &[Shape], _n: usize, axis_order: AxisOrder) -> ShapeResult<TVec<Shape>> {
        let input = axis_order.extract_spatial_dims(input_shape(inputs, 0)?)?;
        let unpool = |declared: i64, size: usize| -> ShapeResult<usize> {
            if declared > 0 {
                Ok(declared as usize)
            } else {
                calc_deconv_output_dim(size, self.pool_size, self.pool_stride, self.pad)
            }
        };
        let output = SpatialDims::new(
            input.batch,
            unpool(self.output_height, input.height)?,
            unpool(self.output_width, input.width)?,
            input.depth,
        );
        Ok(tvec!(axis_order.format_spatial_output_shape(output)))
    }
}
