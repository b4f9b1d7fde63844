use crate::internal::*;

attr_enum! {
    /// How spatial padding is sized for windowed ops.
    pub enum PaddingSizeStrategy {
        /// No padding, partial windows are dropped.
        ImplicitValid => "PADDING_SIZE_IMPLICIT_VALID",
        /// Pad so that `out = ceil(in / stride)`.
        ImplicitSame => "PADDING_SIZE_IMPLICIT_SAME",
        /// Explicit pads, floor rounding.
        ExplicitFloor => "PADDING_SIZE_EXPLICIT_FLOOR",
        /// Explicit pads, ceil rounding with the last window clipped to start
        /// inside the padded input.
        Explicit => "PADDING_SIZE_EXPLICIT",
        /// Explicit pad on the trailing side only, floor rounding.
        ExplicitRightHanded => "PADDING_SIZE_EXPLICIT_RIGHTHANDED",
    }
}

attr_enum! {
    /// Value used for padded elements.
    pub enum PadMode {
        Zero => "PADDING_ZERO",
        Reflect => "PADDING_REFLECT",
        Constant => "PADDING_CONSTANT",
        Edge => "PADDING_EDGE",
    }
}

use PaddingSizeStrategy::*;

/// Output size of a windowed reduction along one spatial axis.
///
/// This is the one place where padding strategies turn into output sizes:
/// convolution goes through it too, with its dilated kernel extent as the
/// window.
pub fn calc_pool_output_dim(
    input: usize,
    window: usize,
    pad: usize,
    stride: usize,
    strategy: PaddingSizeStrategy,
) -> ShapeResult<usize> {
    ensure_shape!(stride > 0, "stride must be positive");
    ensure_shape!(window > 0, "window size must be positive");
    let padded = match strategy {
        ImplicitValid | ImplicitSame => input,
        ExplicitRightHanded => input + pad,
        Explicit | ExplicitFloor => input + 2 * pad,
    };
    if strategy != ImplicitSame {
        ensure_shape!(
            padded >= window,
            "window of {window} does not fit in input of {input} padded to {padded}"
        );
    }
    let output = match strategy {
        ImplicitValid => (input - window + 1).div_ceil(stride),
        ImplicitSame => input.div_ceil(stride),
        ExplicitFloor | ExplicitRightHanded => (padded - window) / stride + 1,
        Explicit => {
            let mut output = (padded - window).div_ceil(stride) + 1;
            // the last window must start inside the input or its leading pad
            if pad > 0 && (output - 1) * stride >= input + pad {
                output -= 1;
            }
            output
        }
    };
    Ok(output)
}

/// Output size of a convolution along one spatial axis.
///
/// Explicit padding rounds down for convolutions, so `Explicit` is computed
/// as `ExplicitFloor`.
pub fn calc_conv_output_dim(
    input: usize,
    kernel: usize,
    pad: usize,
    stride: usize,
    dilation: usize,
    strategy: PaddingSizeStrategy,
) -> ShapeResult<usize> {
    ensure_shape!(kernel > 0 && dilation > 0, "kernel and dilation must be positive");
    let extent = dilation * (kernel - 1) + 1;
    let strategy = if strategy == Explicit { ExplicitFloor } else { strategy };
    calc_pool_output_dim(input, extent, pad, stride, strategy)
}

/// Output size of a transposed convolution: `stride * (in - 1) + kernel - 2 * pad`.
pub fn calc_deconv_output_dim(
    input: usize,
    kernel: usize,
    stride: usize,
    pad: usize,
) -> ShapeResult<usize> {
    ensure_shape!(input > 0, "deconvolution input must not be empty");
    let full = stride * (input - 1) + kernel;
    ensure_shape!(full >= 2 * pad, "padding {pad} exceeds deconvolution output of {full}");
    Ok(full - 2 * pad)
}

/// Leading and trailing pads that make a window of `kernel` (dilated by
/// `dilation`) produce `ceil(input / stride)` outputs. The odd unit goes to
/// the trailing side.
pub fn calc_same_padding(
    input: usize,
    kernel: usize,
    stride: usize,
    dilation: usize,
) -> ShapeResult<(usize, usize)> {
    ensure_shape!(stride > 0 && kernel > 0 && dilation > 0, "invalid window geometry");
    let extent = dilation * (kernel - 1) + 1;
    let output = input.div_ceil(stride);
    let total = ((output.saturating_sub(1)) * stride + extent).saturating_sub(input);
    Ok((total / 2, total - total / 2))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_same_conv_preserves_size() {
        assert_eq!(calc_conv_output_dim(32, 3, 1, 1, 1, Explicit).unwrap(), 32);
    }

    #[test]
    fn conv_rounds_down_pool_rounds_up() {
        assert_eq!(calc_conv_output_dim(6, 3, 0, 2, 1, Explicit).unwrap(), 2);
        assert_eq!(calc_pool_output_dim(6, 3, 0, 2, Explicit).unwrap(), 3);
        assert_eq!(calc_pool_output_dim(6, 3, 0, 2, ExplicitFloor).unwrap(), 2);
    }

    #[test]
    fn pool_clips_window_starting_in_trailing_pad() {
        // ceil((5 + 2 - 2) / 2) + 1 = 4, but the fourth window would start at 6 >= 5 + 1
        assert_eq!(calc_pool_output_dim(5, 2, 1, 2, Explicit).unwrap(), 3);
    }

    #[test]
    fn implicit_strategies() {
        assert_eq!(calc_pool_output_dim(7, 3, 5, 2, ImplicitValid).unwrap(), 3);
        assert_eq!(calc_pool_output_dim(7, 3, 5, 2, ImplicitSame).unwrap(), 4);
        assert_eq!(calc_conv_output_dim(10, 3, 0, 1, 2, ImplicitValid).unwrap(), 6);
    }

    #[test]
    fn right_handed() {
        assert_eq!(calc_pool_output_dim(4, 3, 1, 1, ExplicitRightHanded).unwrap(), 3);
    }

    #[test]
    fn window_too_large() {
        assert!(calc_pool_output_dim(2, 3, 0, 1, Explicit).is_err());
        assert!(calc_pool_output_dim(4, 3, 0, 0, Explicit).is_err());
    }

    #[test]
    fn deconv() {
        assert_eq!(calc_deconv_output_dim(16, 4, 2, 1).unwrap(), 32);
        assert!(calc_deconv_output_dim(1, 1, 1, 1).is_err());
    }

    #[test]
    fn same_padding() {
        assert_eq!(calc_same_padding(32, 3, 1, 1).unwrap(), (1, 1));
        assert_eq!(calc_same_padding(32, 2, 2, 1).unwrap(), (0, 0));
        assert_eq!(calc_same_padding(5, 4, 1, 1).unwrap(), (1, 2));
    }

    #[test]
    fn parse_strategy() {
        assert_eq!("PADDING_SIZE_EXPLICIT".parse::<PaddingSizeStrategy>().unwrap(), Explicit);
        assert!("SAME".parse::<PaddingSizeStrategy>().is_err());
    }
}
