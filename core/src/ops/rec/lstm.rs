use super::recurrent_output_shapes;
use crate::internal::*;
use crate::ops::{input_shape, tensor_dim};

op_config! {
    pub struct Lstm {
        input_weights: Tensor,
        gate_bias: Tensor,
        hidden_state_weights: Tensor,
        w_xc_static: Option<Tensor> = None,
        backward: bool = false,
        reset_state_at_time_step_0: bool = false,
        h_0_input_name: String = String::new(),
        c_0_input_name: String = String::new(),
        sequence_continuation_name: String = String::new(),
        x_static_name: String = String::new(),
        cell_clip: f32 = 0.0,
        /// Gate activation names, framework defaults when empty.
        activations: Vec<String> = vec![],
        /// Peephole weights from the cell state.
        w_cc: Option<Tensor> = None,
        /// Projection of the hidden state, with its bias and clip.
        w_p: Option<Tensor> = None,
        b_p: Option<Tensor> = None,
        projection_clip: f32 = 0.0,
        /// Layer normalization weights, when the cell is normalized.
        w_n: Option<Tensor> = None,
        epsilon: f32 = 1e-5,
    }
}

impl IrOp for Lstm {
    fn infer_shape(&self, inputs: &[Shape], _n: usize, axis_order: AxisOrder) -> ShapeResult<TVec<Shape>> {
        let hidden = tensor_dim(&self.input_weights, -1, "input_weights")?;
        recurrent_output_shapes(
            input_shape(inputs, 0)?,
            hidden,
            axis_order,
            &self.h_0_input_name,
            &self.c_0_input_name,
        )
    }
}
