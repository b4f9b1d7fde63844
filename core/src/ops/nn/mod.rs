use crate::internal::*;
use crate::ops::input_shape;

mod fully_connected;

pub use self::fully_connected::FullyConnected;

op_config! {
    /// Batch normalization folded into per-channel `weights` and `bias`.
    pub struct Batchnorm {
        weights: Tensor,
        bias: Tensor,
        compute_statistics: bool = false,
        use_mu_sigma: bool = false,
        across_spatial: bool = false,
        epsilon: f32 = 1e-9,
        normalize_variance: bool = true,
        gamma: Vec<f32> = vec![],
        beta: Vec<f32> = vec![],
    }
}

op_config! {
    pub struct CrossCorrelation {}
}

op_config! {
    pub struct Dropout {
        keep: f32,
    }
}

attr_enum! {
    /// How out of range indices are mapped onto the embedding table.
    pub enum EmbeddingStrategy {
        Mod => "EMBEDDING_PARTITION_STRATEGY_MOD",
        Div => "EMBEDDING_PARTITION_STRATEGY_DIV",
    }
}

op_config! {
    pub struct Embedding {
        output_dim: Shape,
        embedding_strategy: EmbeddingStrategy = EmbeddingStrategy::Mod,
    }
}

op_config! {
    pub struct L2Norm {
        axis: i64 = -1,
        epsilon: f32 = 1e-12,
    }
}

attr_enum! {
    pub enum NeuronType {
        None => "NEURON_NONE",
        Relu => "NEURON_RELU",
        ReluMinMax => "NEURON_RELU_MIN_MAX",
        Logistic => "NEURON_LOGISTIC",
        Tanh => "NEURON_TANH",
        Elu => "NEURON_ELU",
    }
}

op_config! {
    /// Pointwise activation. `a` and `b` are the activation coefficients
    /// (elu alpha, tanh scale), the clamps only apply to `ReluMinMax`.
    pub struct Neuron {
        neuron_type: NeuronType,
        a: f32 = 0.0,
        b: f32 = 0.0,
        min_clamp: f32 = 0.0,
        max_clamp: f32 = 0.0,
    }
}

op_config! {
    pub struct Prelu {
        coeff: Tensor,
        channel_shared: bool = false,
    }
}

op_config! {
    /// Local response normalization.
    pub struct RNorm {
        size: usize,
        alpha: f32,
        beta: f32,
        k: f32,
        across_channels: bool = true,
    }
}

op_config! {
    pub struct Scale {
        weights: Tensor,
        bias: Tensor,
        axis: i64,
        num_axes: i64,
    }
}

op_config! {
    pub struct Softmax {}
}

op_config! {
    pub struct SubtractMean {
        mean_values: Vec<f32>,
    }
}

impl IrOp for Embedding {
    fn infer_shape(&self, inputs: &[Shape], _n: usize, _ao: AxisOrder) -> ShapeResult<TVec<Shape>> {
        input_shape(inputs, 0)?;
        Ok(tvec!(self.output_dim.clone()))
    }
}

shape_of_first_input!(Batchnorm, CrossCorrelation, Dropout, L2Norm, Prelu, Scale, SubtractMean);
shape_of_all_inputs!(Neuron, RNorm, Softmax);
