use crate::internal::*;
use crate::ops::input_shape;

op_config! {
    /// Region of interest align. Input 0 is the feature map, input 1 the
    /// `[num_rois, 4]` boxes.
    ///
    /// With `tiled_batch_h > 0` the pooled regions are laid out as one tiled
    /// image, separated by `batch_pad_h`/`batch_pad_w` rows and columns.
    pub struct RoiAlign {
        spatial_scale: f32,
        pooled_size_h: usize,
        pooled_size_w: usize,
        sampling_ratio: i64,
        tiled_batch_h: i64 = -1,
        tiled_batch_w: i64 = -1,
        batch_pad_h: i64 = -1,
        batch_pad_w: i64 = -1,
        pad_value: f32 = 0.0,
    }
}

op_config! {
    pub struct RoiPooling {
        pooled_size_w: usize,
        pooled_size_h: usize,
        spatial_scale: f32,
        output_shape: Shape,
    }
}

fn tiled(tiles: i64, pooled: usize, pad: i64) -> ShapeResult<usize> {
    let size = tiles * pooled as i64 + (tiles - 1) * pad;
    ensure_shape!(size > 0, "tiling of {tiles} regions of {pooled} with padding {pad} is empty");
    Ok(size as usize)
}

impl IrOp for RoiAlign {
    fn infer_shape(&self, inputs: &[Shape], _n: usize, axis_order: AxisOrder) -> ShapeResult<TVec<Shape>> {
        let features = axis_order.extract_spatial_dims(input_shape(inputs, 0)?)?;
        let output = if self.tiled_batch_h > 0 {
            SpatialDims::new(
                1,
                tiled(self.tiled_batch_h, self.pooled_size_h, self.batch_pad_h)?,
                tiled(self.tiled_batch_w, self.pooled_size_w, self.batch_pad_w)?,
                features.depth,
            )
        } else {
            let num_rois = input_shape(inputs, 1)?.first().copied().unwrap_or(1);
            SpatialDims::new(num_rois, self.pooled_size_h, self.pooled_size_w, features.depth)
        };
        Ok(tvec!(axis_order.format_spatial_output_shape(output)))
    }
}

impl IrOp for RoiPooling {
    fn infer_shape(&self, _inputs: &[Shape], _n: usize, _ao: AxisOrder) -> ShapeResult<TVec<Shape>> {
        Ok(tvec!(self.output_shape.clone()))
    }
}
