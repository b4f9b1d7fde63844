//! Recurrent layers.
//!
//! All three kinds share the same output layout: the sequence output, plus
//! the cell and hidden states when the op was wired with explicit state
//! inputs.
use crate::internal::*;

mod gru;
mod lstm;
mod rnn;

pub use self::gru::{Gru, GruGate};
pub use self::lstm::Lstm;
pub use self::rnn::RnnTransformation;

/// Output shapes of a recurrent layer with `hidden` units.
///
/// Only rank 3 inputs provide batch and time; anything else is treated as a
/// single step of a single sequence. State outputs are added when both
/// state input names are set.
pub(crate) fn recurrent_output_shapes(
    input: &[usize],
    hidden: usize,
    axis_order: AxisOrder,
    h_0_input_name: &str,
    c_0_input_name: &str,
) -> ShapeResult<TVec<Shape>> {
    let (batch, time_steps) = if input.len() == 3 {
        let dims = axis_order.extract_time_series_dims(input)?;
        (dims.batch, dims.time_steps)
    } else {
        (1, 1)
    };
    let mut outputs =
        tvec!(axis_order.format_time_series_output_shape(TimeSeriesDims::new(batch, time_steps, hidden)));
    if !h_0_input_name.is_empty() && !c_0_input_name.is_empty() {
        let state: Shape = if axis_order.is_onnx() { tvec![1, batch, hidden] } else { tvec![batch, hidden] };
        trace!("recurrent state outputs {state:?}");
        outputs.push(state.clone());
        outputs.push(state);
    }
    Ok(outputs)
}
