//! Bookkeeping ops with no computation of their own.
use crate::internal::*;

op_config! {
    /// Identity passthrough of its first `num_outputs` inputs.
    pub struct Noop {}
}

op_config! {
    /// Static data holder. Produces no outputs.
    pub struct Static {}
}

impl IrOp for Noop {
    fn infer_shape(&self, inputs: &[Shape], num_outputs: usize, _ao: AxisOrder) -> ShapeResult<TVec<Shape>> {
        ensure_shape!(
            inputs.len() >= num_outputs,
            "{num_outputs} output(s) declared, only {} input(s) to pass through",
            inputs.len()
        );
        Ok(inputs[..num_outputs].iter().cloned().collect())
    }
}

impl IrOp for Static {
    fn infer_shape(&self, _inputs: &[Shape], _n: usize, _ao: AxisOrder) -> ShapeResult<TVec<Shape>> {
        Ok(tvec!())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noop_keeps_first_outputs() {
        let inputs = [tvec![1, 2], tvec![3], tvec![4, 5, 6]];
        assert_eq!(Noop {}.infer_shape(&inputs, 2, AxisOrder::Tf).unwrap(), tvec!(tvec![1, 2], tvec![3]));
        assert!(Noop {}.infer_shape(&inputs, 0, AxisOrder::Tf).unwrap().is_empty());
        assert!(Noop {}.infer_shape(&inputs, 4, AxisOrder::Tf).is_err());
    }

    #[test]
    fn static_has_no_output() {
        assert!(Static {}.infer_shape(&[tvec![3]], 1, AxisOrder::Tf).unwrap().is_empty());
    }
}
