use crate::internal::*;
use crate::ops::{input_shape, tensor_dim};

op_config! {
    /// Dense layer. One weight matrix per input, shaped `[in, out]`.
    pub struct FullyConnected {
        weights_list: Vec<Tensor>,
        bias: Tensor,
    }
}

impl IrOp for FullyConnected {
    fn infer_shape(&self, inputs: &[Shape], _n: usize, _ao: AxisOrder) -> ShapeResult<TVec<Shape>> {
        let input = input_shape(inputs, 0)?;
        ensure_shape!(!input.is_empty(), "input of a fully connected layer can not be a scalar");
        let Some(weights) = self.weights_list.first() else {
            bail_shape!("no weights");
        };
        Ok(tvec!(tvec![input[0], tensor_dim(weights, 1, "weights")?]))
    }
}
