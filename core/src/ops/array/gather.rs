use crate::internal::*;
use crate::ops::{input_shape, resolve_axis};

op_config! {
    /// Gathers slices of input 0 along `axis` at the indices held by input 1.
    pub struct Gather {
        axis: i64 = 0,
    }
}

impl IrOp for Gather {
    fn infer_shape(&self, inputs: &[Shape], _n: usize, _ao: AxisOrder) -> ShapeResult<TVec<Shape>> {
        let data = input_shape(inputs, 0)?;
        let indices = input_shape(inputs, 1)?;
        let axis = resolve_axis(self.axis, data.len())?;
        let output: Shape = data[..axis]
            .iter()
            .chain(indices.iter())
            .chain(data[axis + 1..].iter())
            .copied()
            .collect();
        Ok(tvec!(output))
    }
}
