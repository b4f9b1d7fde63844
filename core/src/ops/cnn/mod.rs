pub mod conv;
pub mod deconv;
pub mod padding;
pub mod pools;

pub use self::conv::Conv;
pub use self::deconv::Deconv;
pub use self::padding::{
    PadMode, PaddingSizeStrategy, calc_conv_output_dim, calc_deconv_output_dim,
    calc_pool_output_dim, calc_same_padding,
};
pub use self::pools::{Pool, PoolType};

use crate::internal::*;

/// Kernel height and width of a rank-4 weight tensor, laid out according
/// to `axis_order`.
pub(crate) fn kernel_hw(weights: &Tensor, axis_order: AxisOrder) -> ShapeResult<(usize, usize)> {
    let dims = axis_order
        .extract_spatial_dims(weights.shape())
        .map_err(|e| ShapeError(format!("weights: {e}")))?;
    Ok((dims.height, dims.width))
}

/// Output channel count, the length of the bias vector.
pub(crate) fn bias_depth(bias: &Tensor) -> ShapeResult<usize> {
    crate::ops::tensor_dim(bias, 0, "bias")
}
