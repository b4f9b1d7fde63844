use crate::broadcast::multi_broadcast;
use crate::internal::*;

mod reduce;

pub use self::reduce::{ArgMax, MaxY, Moment, Reduce, reduced_shape};

op_config! {
    /// Two-operand arithmetic with broadcasting.
    pub struct ElementwiseBinary {}
}

op_config! {
    /// N-ary arithmetic over same-shaped inputs.
    pub struct Elementwise {}
}

op_config! {
    /// Weighted sum of same-shaped inputs.
    pub struct ElementwiseSum {
        coeffs: Vec<f32> = vec![],
    }
}

op_config! {
    pub struct ElementwiseUnary {}
}

op_config! {
    /// `(shift + scale * x) ^ power`
    pub struct Power {
        scale: f32 = 1.0,
        shift: f32 = 0.0,
        power: f32 = 1.0,
    }
}

op_config! {
    pub struct Neg {}
}

impl IrOp for ElementwiseBinary {
    fn infer_shape(&self, inputs: &[Shape], _n: usize, _ao: AxisOrder) -> ShapeResult<TVec<Shape>> {
        ensure_shape!(inputs.len() == 2, "binary ops need exactly 2 inputs, got {}", inputs.len());
        Ok(tvec!(multi_broadcast(inputs)?))
    }
}

shape_of_first_input!(Elementwise, ElementwiseSum, ElementwiseUnary, Power);
shape_of_all_inputs!(Neg);
