use crate::internal::*;
use crate::ops::input_shape;

attr_enum! {
    /// Explicit layout of a rank-4 tensor, for ops that carry their own.
    pub enum DataFormat {
        Nhwc => "NHWC",
        Nchw => "NCHW",
    }
}

impl DataFormat {
    pub fn extract_spatial_dims(&self, shape: &[usize]) -> ShapeResult<SpatialDims> {
        match self {
            DataFormat::Nhwc => AxisOrder::Tf.extract_spatial_dims(shape),
            DataFormat::Nchw => AxisOrder::Caffe.extract_spatial_dims(shape),
        }
    }

    pub fn format_spatial_output_shape(&self, dims: SpatialDims) -> Shape {
        match self {
            DataFormat::Nhwc => AxisOrder::Tf.format_spatial_output_shape(dims),
            DataFormat::Nchw => AxisOrder::Caffe.format_spatial_output_shape(dims),
        }
    }
}

op_config! {
    /// Moves depth into space: height and width grow by `upscale_factor`
    /// while depth is divided by it.
    pub struct PixelShuffle {
        upscale_factor: usize,
        data_format: DataFormat = DataFormat::Nhwc,
    }
}

op_config! {
    /// Moves space into depth: height and width shrink by
    /// `downscale_factor` while depth is multiplied by it.
    pub struct SpaceToDepth {
        downscale_factor: usize,
        data_format: DataFormat = DataFormat::Nhwc,
    }
}

fn exact_div(value: usize, factor: usize, what: &str) -> ShapeResult<usize> {
    ensure_shape!(factor > 0, "factor must be positive");
    ensure_shape!(value % factor == 0, "{what} of {value} is not divisible by {factor}");
    Ok(value / factor)
}

impl IrOp for PixelShuffle {
    fn infer_shape(&self, inputs: &[Shape], _n: usize, _ao: AxisOrder) -> ShapeResult<TVec<Shape>> {
        let f = self.upscale_factor;
        let input = self.data_format.extract_spatial_dims(input_shape(inputs, 0)?)?;
        let output = SpatialDims::new(
            input.batch,
            input.height * f,
            input.width * f,
            exact_div(input.depth, f, "depth")?,
        );
        Ok(tvec!(self.data_format.format_spatial_output_shape(output)))
    }
}

impl IrOp for SpaceToDepth {
    fn infer_shape(&self, inputs: &[Shape], _n: usize, axis_order: AxisOrder) -> ShapeResult<TVec<Shape>> {
        let f = self.downscale_factor;
        let input = axis_order.extract_spatial_dims(input_shape(inputs, 0)?)?;
        let output = SpatialDims::new(
            input.batch,
            exact_div(input.height, f, "height")?,
            exact_div(input.width, f, "width")?,
            input.depth * f,
        );
        Ok(tvec!(axis_order.format_spatial_output_shape(output)))
    }
}
