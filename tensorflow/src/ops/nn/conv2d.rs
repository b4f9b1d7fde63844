use crate::ops::{DataInputs, const_input, input_shape, invalid, nhwc_pair, register};
use irconv_core::internal::*;
use irconv_core::ops::cnn::{Conv, PadMode, PaddingSizeStrategy, calc_same_padding};

pub fn register_all_ops(reg: &mut TranslationRegistry) -> IrResult<()> {
    register(reg, conv2d, DataInputs::Leading(1), &["Conv2D"])?;
    register(reg, depthwise_conv2d, DataInputs::Leading(1), &["DepthwiseConv2dNative"])?;
    Ok(())
}

/// Only NHWC graphs are handled.
pub(crate) fn check_data_format(node: &SourceNode, kind: OpType) -> IrResult<()> {
    match node.optional::<String>(kind, "data_format")?.as_deref() {
        None | Some("NHWC") => Ok(()),
        Some(other) => Err(invalid(node, kind, "data_format", format!("{other} is not supported"))),
    }
}

/// `SAME` or `VALID` padding, with the leading pads of `SAME` along height
/// and width for the given window.
pub(crate) fn padding(
    node: &SourceNode,
    graph: &IrGraph,
    kind: OpType,
    window: (usize, usize),
    strides: (usize, usize),
    dilations: (usize, usize),
) -> IrResult<(PaddingSizeStrategy, usize, usize)> {
    let padding: String = node.required(kind, "padding")?;
    match padding.as_str() {
        "VALID" => Ok((PaddingSizeStrategy::ImplicitValid, 0, 0)),
        "SAME" => {
            let input = graph.axis_order().extract_spatial_dims(input_shape(node, graph, 0, kind)?);
            let input = input.map_err(|e| IrError::shape(&node.name, kind, e))?;
            let (pady, _) = calc_same_padding(input.height, window.0, strides.0, dilations.0)
                .map_err(|e| IrError::shape(&node.name, kind, e))?;
            let (padx, _) = calc_same_padding(input.width, window.1, strides.1, dilations.1)
                .map_err(|e| IrError::shape(&node.name, kind, e))?;
            Ok((PaddingSizeStrategy::ImplicitSame, padx, pady))
        }
        other => Err(invalid(node, kind, "padding", format!("unknown padding {other}"))),
    }
}

/// Filter of `[h, w, in, out]` as `[out, h, w, in]`.
fn hwio_to_ohwi(filter: &Tensor) -> Tensor {
    Tensor::from(filter.clone().into_array().permuted_axes(&[3usize, 0, 1, 2][..]))
}

fn build_conv(node: &SourceNode, graph: &IrGraph, weights: Tensor, groups: usize) -> IrResult<Op> {
    let kind = OpType::Convolution;
    check_data_format(node, kind)?;
    let (out, kernel_h, kernel_w) = (weights.shape()[0], weights.shape()[1], weights.shape()[2]);
    let (stridey, stridex) = nhwc_pair(node, kind, "strides", 1)?;
    let (dilationy, dilationx) = nhwc_pair(node, kind, "dilations", 1)?;
    let (padding_size_strategy, padx, pady) = padding(
        node,
        graph,
        kind,
        (kernel_h, kernel_w),
        (stridey, stridex),
        (dilationy, dilationx),
    )?;
    let conv = Conv {
        weights,
        bias: Tensor::zeros(&[out]),
        padx,
        pady,
        stridex,
        stridey,
        dilationx,
        dilationy,
        groups,
        padding_mode: PadMode::Zero,
        padding_size_strategy,
    };
    Ok(Op::new(node.name.clone(), OpKind::Convolution(conv)))
}

fn filter(node: &SourceNode, graph: &IrGraph) -> IrResult<Tensor> {
    let kind = OpType::Convolution;
    let filter = const_input(node, graph, 1, kind)?;
    if filter.rank() != 4 {
        let reason = format!("expected rank 4, got {}", format_shape(filter.shape()));
        return Err(invalid(node, kind, "filter", reason));
    }
    Ok(filter)
}

/// Conv2D with a constant HWIO filter. The bias is zero, a following
/// `BiasAdd` stays a separate op.
pub fn conv2d(node: &SourceNode, graph: &IrGraph) -> IrResult<Op> {
    let filter = filter(node, graph)?;
    build_conv(node, graph, hwio_to_ohwi(&filter), 1)
}

/// Depthwise convolution as a grouped convolution with one group per input
/// channel. The `[h, w, in, multiplier]` filter becomes `[in * multiplier,
/// h, w, 1]`.
pub fn depthwise_conv2d(node: &SourceNode, graph: &IrGraph) -> IrResult<Op> {
    let filter = filter(node, graph)?;
    let &[h, w, channels, multiplier] = filter.shape() else {
        return Err(invalid(node, OpType::Convolution, "filter", "expected rank 4"));
    };
    let grouped = filter
        .into_shape(&[h, w, 1, channels * multiplier])
        .map_err(|e| invalid(node, OpType::Convolution, "filter", e.to_string()))?;
    build_conv(node, graph, hwio_to_ohwi(&grouped), channels)
}
