use super::padding::{PaddingSizeStrategy, calc_pool_output_dim};
use crate::internal::*;
use crate::ops::input_shape;

attr_enum! {
    pub enum PoolType {
        Max => "POOL_MAX",
        Avg => "POOL_AVG",
        L2 => "POOL_L2",
    }
}

op_config! {
    /// 2D spatial pooling. Channels are preserved.
    pub struct Pool {
        pool_type: PoolType,
        size_x: usize,
        size_y: usize,
        stride_x: usize = 1,
        stride_y: usize = 1,
        pad_x: usize = 0,
        pad_y: usize = 0,
        padding_size_strategy: PaddingSizeStrategy = PaddingSizeStrategy::Explicit,
        pool_region_include_padding: bool = true,
    }
}

impl IrOp for Pool {
    fn infer_shape(&self, inputs: &[Shape], _n: usize, axis_order: AxisOrder) -> ShapeResult<TVec<Shape>> {
        let input = axis_order.extract_spatial_dims(input_shape(inputs, 0)?)?;
        let height = calc_pool_output_dim(
            input.height,
            self.size_y,
            self.pad_y,
            self.stride_y,
            self.padding_size_strategy,
        )?;
        let width = calc_pool_output_dim(
            input.width,
            self.size_x,
            self.pad_x,
            self.stride_x,
            self.padding_size_strategy,
        )?;
        let output = SpatialDims::new(input.batch, height, width, input.depth);
        Ok(tvec!(axis_order.format_spatial_output_shape(output)))
    }
}
