use crate::internal::*;
use crate::ops::cnn::PadMode;
use crate::ops::input_shape;

op_config! {
    /// Pads every axis by `pads[axis] = [before, after]`.
    pub struct Pad {
        pads: Vec<[usize; 2]>,
        mode: PadMode = PadMode::Constant,
        constant_value: f32 = 0.0,
    }
}

impl IrOp for Pad {
    fn infer_shape(&self, inputs: &[Shape], _n: usize, _ao: AxisOrder) -> ShapeResult<TVec<Shape>> {
        let input = input_shape(inputs, 0)?;
        ensure_shape!(
            self.pads.len() == input.len(),
            "{} pad pairs for an input of rank {}",
            self.pads.len(),
            input.len()
        );
        let output = input.iter().zip(self.pads.iter()).map(|(d, [b, a])| d + b + a).collect();
        Ok(tvec!(output))
    }
}
