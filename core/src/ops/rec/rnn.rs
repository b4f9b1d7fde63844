use super::recurrent_output_shapes;
use crate::internal::*;
use crate::ops::nn::NeuronType;
use crate::ops::{input_shape, tensor_dim};

op_config! {
    /// Plain recurrent cell: `activation(x . weights + bias)`.
    pub struct RnnTransformation {
        weights: Tensor,
        bias: Tensor,
        activation: NeuronType,
        h_0_input_name: String = String::new(),
        c_0_input_name: String = String::new(),
    }
}

impl IrOp for RnnTransformation {
    fn infer_shape(&self, inputs: &[Shape], _n: usize, axis_order: AxisOrder) -> ShapeResult<TVec<Shape>> {
        let hidden = tensor_dim(&self.weights, -2, "weights")?;
        recurrent_output_shapes(
            input_shape(inputs, 0)?,
            hidden,
            axis_order,
            &self.h_0_input_name,
            &self.c_0_input_name,
        )
    }
}
