use super::{bias_or_zeros, invalid, register};
use irconv_core::internal::*;
use irconv_core::ops::nn::{
    Batchnorm, Dropout, FullyConnected, Neuron, NeuronType, Prelu, RNorm, Scale, Softmax,
};

pub fn register_all_ops(reg: &mut TranslationRegistry) -> IrResult<()> {
    register(reg, batch_norm, &["BatchNorm"])?;
    register(reg, dropout, &["Dropout"])?;
    register(reg, elu, &["ELU"])?;
    register(reg, inner_product, &["InnerProduct"])?;
    register(reg, lrn, &["LRN"])?;
    register(reg, relu, &["ReLU"])?;
    register(reg, scale, &["Scale"])?;
    register(reg, sigmoid, &["Sigmoid"])?;
    register(reg, softmax, &["Softmax"])?;
    register(reg, tanh, &["TanH"])?;
    Ok(())
}

fn neuron(node: &SourceNode, neuron_type: NeuronType, a: f32) -> Op {
    let neuron = Neuron { neuron_type, a, b: 0.0, min_clamp: 0.0, max_clamp: 0.0 };
    Op::new(node.name.clone(), OpKind::Neuron(neuron))
}

/// Leaky ReLUs become a channel-shared PReLU.
pub fn relu(node: &SourceNode, _graph: &IrGraph) -> IrResult<Op> {
    let slope = node.optional::<f32>(OpType::Neuron, "negative_slope")?.unwrap_or(0.0);
    if slope != 0.0 {
        let prelu = Prelu { coeff: tensor1(&[slope]), channel_shared: true };
        return Ok(Op::new(node.name.clone(), OpKind::Prelu(prelu)));
    }
    Ok(neuron(node, NeuronType::Relu, 0.0))
}

pub fn sigmoid(node: &SourceNode, _graph: &IrGraph) -> IrResult<Op> {
    Ok(neuron(node, NeuronType::Logistic, 0.0))
}

pub fn tanh(node: &SourceNode, _graph: &IrGraph) -> IrResult<Op> {
    Ok(neuron(node, NeuronType::Tanh, 1.0))
}

pub fn elu(node: &SourceNode, _graph: &IrGraph) -> IrResult<Op> {
    let alpha = node.optional(OpType::Neuron, "alpha")?.unwrap_or(1.0);
    Ok(neuron(node, NeuronType::Elu, alpha))
}

pub fn softmax(node: &SourceNode, _graph: &IrGraph) -> IrResult<Op> {
    Ok(Op::new(node.name.clone(), OpKind::Softmax(Softmax {})))
}

pub fn dropout(node: &SourceNode, _graph: &IrGraph) -> IrResult<Op> {
    let ratio: f32 = node.optional(OpType::Dropout, "dropout_ratio")?.unwrap_or(0.5);
    if !(0.0..1.0).contains(&ratio) {
        return Err(invalid(node, OpType::Dropout, "dropout_ratio", format!("{ratio} is not in [0, 1)")));
    }
    Ok(Op::new(node.name.clone(), OpKind::Dropout(Dropout { keep: 1.0 - ratio })))
}

/// Caffe stores inner product weights as `[num_output, inputs]`, the IR
/// wants `[inputs, num_output]`.
pub fn inner_product(node: &SourceNode, _graph: &IrGraph) -> IrResult<Op> {
    let kind = OpType::FullyConnected;
    let blob = node.blob(0, kind, "weights")?;
    let transposed = node.optional::<bool>(kind, "transpose")?.unwrap_or(false);
    let num_output = match node.optional::<usize>(kind, "num_output")? {
        Some(n) => n,
        None => blob
            .dim(if transposed { -1 } else { -2 })
            .ok_or_else(|| invalid(node, kind, "weights", "expected a blob of rank 2 or more"))?,
    };
    if num_output == 0 || blob.len() % num_output != 0 {
        return Err(invalid(node, kind, "num_output", format!("{num_output} does not divide the weight blob")));
    }
    let inputs = blob.len() / num_output;
    let weights = if transposed {
        blob.clone().into_shape(&[inputs, num_output])
    } else {
        blob.clone().into_shape(&[num_output, inputs]).map(|w| Tensor::from(w.into_array().reversed_axes()))
    }
    .map_err(|e| invalid(node, kind, "weights", e.to_string()))?;
    let bias = if node.optional::<bool>(kind, "bias_term")?.unwrap_or(true) {
        bias_or_zeros(node, 1, num_output)
    } else {
        Tensor::zeros(&[num_output])
    };
    let fc = FullyConnected { weights_list: vec![weights], bias };
    Ok(Op::new(node.name.clone(), OpKind::FullyConnected(fc)))
}

/// Folds the stored statistics into per-channel weights and bias.
///
/// Caffe keeps running sums scaled by the third blob; a zero scale factor
/// zeroes the statistics.
pub fn batch_norm(node: &SourceNode, _graph: &IrGraph) -> IrResult<Op> {
    let kind = OpType::Batchnorm;
    let mean = node.blob(0, kind, "mean")?.to_vec();
    let variance = node.blob(1, kind, "variance")?.to_vec();
    if mean.len() != variance.len() {
        return Err(invalid(
            node,
            kind,
            "variance",
            format!("{} variances for {} means", variance.len(), mean.len()),
        ));
    }
    let factor = match node.blobs.get(2).and_then(|b| b.to_vec().first().copied()) {
        Some(s) if s == 0.0 => 0.0,
        Some(s) => 1.0 / s,
        None => 1.0,
    };
    let epsilon: f32 = node.optional(kind, "eps")?.unwrap_or(1e-5);
    let weights: Vec<f32> = variance.iter().map(|v| 1.0 / (v * factor + epsilon).sqrt()).collect();
    let bias: Vec<f32> = mean.iter().zip(&weights).map(|(m, w)| -m * factor * w).collect();
    let batchnorm = Batchnorm {
        weights: tensor1(&weights),
        bias: tensor1(&bias),
        compute_statistics: false,
        use_mu_sigma: false,
        across_spatial: false,
        epsilon,
        normalize_variance: true,
        gamma: vec![],
        beta: vec![],
    };
    Ok(Op::new(node.name.clone(), OpKind::Batchnorm(batchnorm)))
}

pub fn lrn(node: &SourceNode, _graph: &IrGraph) -> IrResult<Op> {
    let kind = OpType::RNorm;
    let across_channels = match node.optional::<String>(kind, "norm_region")?.as_deref() {
        None | Some("ACROSS_CHANNELS") => true,
        Some("WITHIN_CHANNEL") => false,
        Some(other) => return Err(invalid(node, kind, "norm_region", format!("unknown region `{other}`"))),
    };
    let rnorm = RNorm {
        size: node.optional(kind, "local_size")?.unwrap_or(5),
        alpha: node.optional(kind, "alpha")?.unwrap_or(1.0),
        beta: node.optional(kind, "beta")?.unwrap_or(0.75),
        k: node.optional(kind, "k")?.unwrap_or(1.0),
        across_channels,
    };
    Ok(Op::new(node.name.clone(), OpKind::RNorm(rnorm)))
}

pub fn scale(node: &SourceNode, _graph: &IrGraph) -> IrResult<Op> {
    let kind = OpType::Scale;
    let weights = node.blob(0, kind, "weights")?.clone();
    let bias = if node.optional::<bool>(kind, "bias_term")?.unwrap_or(false) {
        node.blob(1, kind, "bias")?.clone()
    } else {
        Tensor::zeros(weights.shape())
    };
    let scale = Scale {
        weights,
        bias,
        axis: node.optional(kind, "axis")?.unwrap_or(1),
        num_axes: node.optional(kind, "num_axes")?.unwrap_or(1),
    };
    Ok(Op::new(node.name.clone(), OpKind::Scale(scale)))
}
