use super::{bias_or_zeros, input_shape, invalid, register, spatial_pair};
use irconv_core::internal::*;
use irconv_core::ops::cnn::{Conv, Deconv, PadMode, PaddingSizeStrategy, Pool, PoolType};

pub fn register_all_ops(reg: &mut TranslationRegistry) -> IrResult<()> {
    register(reg, convolution, &["Convolution"])?;
    register(reg, deconvolution, &["Deconvolution"])?;
    register(reg, pooling, &["Pooling"])?;
    Ok(())
}

const PAD: (&str, &str, &str) = ("pad", "pad_h", "pad_w");
const STRIDE: (&str, &str, &str) = ("stride", "stride_h", "stride_w");
const DILATION: (&str, &str, &str) = ("dilation", "dilation_h", "dilation_w");
const KERNEL: (&str, &str, &str) = ("kernel_size", "kernel_h", "kernel_w");

/// Output channel count: `num_output`, or the leading weight dimension.
fn num_output(node: &SourceNode, kind: OpType, weights: &Tensor, axis: usize) -> IrResult<usize> {
    match node.optional::<usize>(kind, "num_output")? {
        Some(n) => Ok(n),
        None => weights
            .dim(axis as isize)
            .ok_or_else(|| invalid(node, kind, "weights", "expected a rank 4 blob")),
    }
}

fn bias(node: &SourceNode, kind: OpType, depth: usize) -> IrResult<Tensor> {
    if node.optional::<bool>(kind, "bias_term")?.unwrap_or(true) {
        Ok(bias_or_zeros(node, 1, depth))
    } else {
        Ok(Tensor::zeros(&[depth]))
    }
}

pub fn convolution(node: &SourceNode, _graph: &IrGraph) -> IrResult<Op> {
    let kind = OpType::Convolution;
    let weights = node.blob(0, kind, "weights")?.clone();
    let depth = num_output(node, kind, &weights, 0)?;
    let (pady, padx) = spatial_pair(node, kind, PAD, 0)?;
    let (stridey, stridex) = spatial_pair(node, kind, STRIDE, 1)?;
    let (dilationy, dilationx) = spatial_pair(node, kind, DILATION, 1)?;
    let conv = Conv {
        bias: bias(node, kind, depth)?,
        weights,
        padx,
        pady,
        stridex,
        stridey,
        dilationx,
        dilationy,
        groups: node.optional(kind, "group")?.unwrap_or(1),
        padding_mode: PadMode::Zero,
        padding_size_strategy: PaddingSizeStrategy::Explicit,
    };
    Ok(Op::new(node.name.clone(), OpKind::Convolution(conv)))
}

pub fn deconvolution(node: &SourceNode, _graph: &IrGraph) -> IrResult<Op> {
    let kind = OpType::Deconvolution;
    let weights = node.blob(0, kind, "weights")?.clone();
    let groups = node.optional(kind, "group")?.unwrap_or(1);
    // blobs are laid out [in, out / group, kh, kw]
    let depth = match node.optional::<usize>(kind, "num_output")? {
        Some(n) => n,
        None => num_output(node, kind, &weights, 1)? * groups,
    };
    let (pady, padx) = spatial_pair(node, kind, PAD, 0)?;
    let (stridey, stridex) = spatial_pair(node, kind, STRIDE, 1)?;
    if stridey != stridex {
        return Err(invalid(node, kind, "stride", format!("{stridey}x{stridex} strides are not supported")));
    }
    let deconv = Deconv {
        bias: bias(node, kind, depth)?,
        weights,
        stride: stridey,
        padx,
        pady,
        padding_size_strategy: PaddingSizeStrategy::Explicit,
        output_paddingx: 0,
        output_paddingy: 0,
        output_height: 0,
        output_width: 0,
        groups,
    };
    Ok(Op::new(node.name.clone(), OpKind::Deconvolution(deconv)))
}

pub fn pooling(node: &SourceNode, graph: &IrGraph) -> IrResult<Op> {
    let kind = OpType::Pool;
    let pool_type = match node.optional::<String>(kind, "pool")?.as_deref().unwrap_or("MAX") {
        "MAX" => PoolType::Max,
        "AVE" => PoolType::Avg,
        other => return Err(invalid(node, kind, "pool", format!("unsupported pooling method `{other}`"))),
    };
    let pool = if node.optional::<bool>(kind, "global_pooling")?.unwrap_or(false) {
        let input = input_shape(node, graph, 0, kind)?;
        let dims =
            graph.axis_order().extract_spatial_dims(input).map_err(|e| IrError::shape(&node.name, kind, e))?;
        Pool {
            pool_type,
            size_x: dims.width,
            size_y: dims.height,
            stride_x: 1,
            stride_y: 1,
            pad_x: 0,
            pad_y: 0,
            padding_size_strategy: PaddingSizeStrategy::Explicit,
            pool_region_include_padding: true,
        }
    } else {
        let (size_y, size_x) = spatial_pair(node, kind, KERNEL, 1)?;
        let (pad_y, pad_x) = spatial_pair(node, kind, PAD, 0)?;
        let (stride_y, stride_x) = spatial_pair(node, kind, STRIDE, 1)?;
        Pool {
            pool_type,
            size_x,
            size_y,
            stride_x,
            stride_y,
            pad_x,
            pad_y,
            padding_size_strategy: PaddingSizeStrategy::Explicit,
            pool_region_include_padding: true,
        }
    };
    Ok(Op::new(node.name.clone(), OpKind::Pool(pool)))
}
