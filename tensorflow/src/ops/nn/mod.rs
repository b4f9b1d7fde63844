use super::{DataInputs, const_input, input_shape, invalid, register};
use irconv_core::internal::*;
use irconv_core::ops::nn::{Batchnorm, FullyConnected, Neuron, NeuronType, Prelu, Softmax};

pub mod conv2d;
pub mod pools;

pub fn register_all_ops(reg: &mut TranslationRegistry) -> IrResult<()> {
    conv2d::register_all_ops(reg)?;
    pools::register_all_ops(reg)?;
    register(reg, activation, DataInputs::All, &["Elu", "Relu", "Relu6", "Sigmoid", "Tanh"])?;
    register(reg, fused_batch_norm, DataInputs::Leading(1), &["FusedBatchNorm", "FusedBatchNormV3"])?;
    register(reg, instance_norm, DataInputs::Leading(1), &["InstanceNorm"])?;
    register(reg, leaky_relu, DataInputs::All, &["LeakyRelu"])?;
    register(reg, mat_mul, DataInputs::Leading(1), &["MatMul"])?;
    register(reg, prelu, DataInputs::Leading(1), &["Prelu"])?;
    register(reg, softmax, DataInputs::All, &["Softmax"])?;
    Ok(())
}

pub fn activation(node: &SourceNode, _graph: &IrGraph) -> IrResult<Op> {
    let (neuron_type, a, max_clamp) = match node.op_type.as_str() {
        "Elu" => (NeuronType::Elu, 1.0, 0.0),
        "Relu6" => (NeuronType::ReluMinMax, 0.0, 6.0),
        "Sigmoid" => (NeuronType::Logistic, 0.0, 0.0),
        "Tanh" => (NeuronType::Tanh, 1.0, 0.0),
        _ => (NeuronType::Relu, 0.0, 0.0),
    };
    let neuron = Neuron { neuron_type, a, b: 0.0, min_clamp: 0.0, max_clamp };
    Ok(Op::new(node.name.clone(), OpKind::Neuron(neuron)))
}

pub fn softmax(node: &SourceNode, _graph: &IrGraph) -> IrResult<Op> {
    Ok(Op::new(node.name.clone(), OpKind::Softmax(Softmax {})))
}

/// Channel count of an NHWC (or any channels-last) input.
fn channels(node: &SourceNode, graph: &IrGraph, kind: OpType) -> IrResult<usize> {
    match input_shape(node, graph, 0, kind)?.last() {
        Some(&c) => Ok(c),
        None => Err(invalid(node, kind, "input #0", "scalar input has no channels")),
    }
}

/// Slopes are broadcast to one per channel.
fn per_channel(node: &SourceNode, kind: OpType, attr: &str, values: &[f32], channels: usize) -> IrResult<Tensor> {
    match values {
        [v] => Ok(Tensor::filled(&[channels], *v)),
        _ if values.len() == channels => Ok(tensor1(values)),
        _ => Err(invalid(node, kind, attr, format!("{} values for {channels} channels", values.len()))),
    }
}

pub fn prelu(node: &SourceNode, graph: &IrGraph) -> IrResult<Op> {
    let kind = OpType::Prelu;
    let channels = channels(node, graph, kind)?;
    let alpha = const_input(node, graph, 1, kind)?.to_vec();
    let coeff = per_channel(node, kind, "alpha", &alpha, channels)?;
    Ok(Op::new(node.name.clone(), OpKind::Prelu(Prelu { coeff, channel_shared: false })))
}

pub fn leaky_relu(node: &SourceNode, graph: &IrGraph) -> IrResult<Op> {
    let kind = OpType::Prelu;
    let channels = channels(node, graph, kind)?;
    let alpha: f32 = node.optional(kind, "alpha")?.unwrap_or(0.2);
    let coeff = per_channel(node, kind, "alpha", &[alpha], channels)?;
    Ok(Op::new(node.name.clone(), OpKind::Prelu(Prelu { coeff, channel_shared: false })))
}

/// Instance normalization: statistics are computed at runtime over the
/// spatial axes, gamma and beta come from the optional second and third
/// inputs.
pub fn instance_norm(node: &SourceNode, graph: &IrGraph) -> IrResult<Op> {
    let kind = OpType::Batchnorm;
    let channels = channels(node, graph, kind)?;
    let gamma = match node.inputs.len() > 1 {
        true => const_input(node, graph, 1, kind)?.to_vec(),
        false => vec![],
    };
    let beta = match node.inputs.len() > 2 {
        true => const_input(node, graph, 2, kind)?.to_vec(),
        false => vec![],
    };
    let bn = Batchnorm {
        weights: Tensor::filled(&[channels], 1.0),
        bias: Tensor::zeros(&[channels]),
        compute_statistics: true,
        use_mu_sigma: true,
        across_spatial: true,
        epsilon: node.optional(kind, "epsilon")?.unwrap_or(1e-6),
        normalize_variance: true,
        gamma,
        beta,
    };
    Ok(Op::new(node.name.clone(), OpKind::Batchnorm(bn)))
}

/// Inputs are x, scale, offset, mean and variance. Inference mode folds
/// them into `weights = scale / sqrt(var + eps)` and
/// `bias = offset - mean * weights`.
pub fn fused_batch_norm(node: &SourceNode, graph: &IrGraph) -> IrResult<Op> {
    let kind = OpType::Batchnorm;
    let channels = channels(node, graph, kind)?;
    let epsilon: f32 = node.optional(kind, "epsilon")?.unwrap_or(1e-4);
    let training: bool = node.optional(kind, "is_training")?.unwrap_or(false);
    let params: Vec<Vec<f32>> = (1..5)
        .map(|ix| const_input(node, graph, ix, kind).map(|t| t.to_vec()))
        .collect::<IrResult<_>>()?;
    if let Some(bad) = params.iter().position(|p| p.len() != channels) {
        return Err(invalid(node, kind, &format!("input #{}", bad + 1), format!("expected {channels} values")));
    }
    let (scale, offset, mean, var) = (&params[0], &params[1], &params[2], &params[3]);
    let weights: Vec<f32> = scale.iter().zip(var).map(|(s, v)| s / (v + epsilon).sqrt()).collect();
    let bias: Vec<f32> = offset.iter().zip(mean).zip(&weights).map(|((o, m), w)| o - m * w).collect();
    let bn = Batchnorm {
        weights: tensor1(&weights),
        bias: tensor1(&bias),
        compute_statistics: training,
        use_mu_sigma: false,
        across_spatial: false,
        epsilon,
        normalize_variance: true,
        gamma: vec![],
        beta: vec![],
    };
    Ok(Op::new(node.name.clone(), OpKind::Batchnorm(bn)))
}

/// `x @ w` with a constant `[in, out]` matrix (transposed first when
/// `transpose_b` is set).
pub fn mat_mul(node: &SourceNode, graph: &IrGraph) -> IrResult<Op> {
    let kind = OpType::FullyConnected;
    if node.optional::<bool>(kind, "transpose_a")?.unwrap_or(false) {
        return Err(invalid(node, kind, "transpose_a", "transposed data input is not supported"));
    }
    let weights = const_input(node, graph, 1, kind)?;
    if weights.rank() != 2 {
        let reason = format!("expected a matrix, got {}", format_shape(weights.shape()));
        return Err(invalid(node, kind, "input #1", reason));
    }
    let weights = match node.optional::<bool>(kind, "transpose_b")?.unwrap_or(false) {
        true => Tensor::from(weights.into_array().reversed_axes()),
        false => weights,
    };
    let units = weights.shape()[1];
    let fc = FullyConnected { weights_list: vec![weights], bias: Tensor::zeros(&[units]) };
    Ok(Op::new(node.name.clone(), OpKind::FullyConnected(fc)))
}
