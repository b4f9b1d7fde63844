use crate::internal::*;
use crate::ops::{input_shape, resolve_axis};

op_config! {
    pub struct Concat {
        axis: i64,
    }
}

impl IrOp for Concat {
    fn infer_shape(&self, inputs: &[Shape], _n: usize, _ao: AxisOrder) -> ShapeResult<TVec<Shape>> {
        let first = input_shape(inputs, 0)?;
        let axis = resolve_axis(self.axis, first.len())?;
        for (ix, shape) in inputs.iter().enumerate().skip(1) {
            ensure_shape!(
                shape.len() == first.len()
                    && shape.iter().zip(first.iter()).enumerate().all(|(d, (a, b))| d == axis || a == b),
                "input #{ix} ({}) does not match input #0 ({}) outside of axis {axis}",
                format_shape(shape),
                format_shape(first)
            );
        }
        let mut output = first.clone();
        output[axis] = inputs.iter().map(|s| s[axis]).sum();
        Ok(tvec!(output))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sums_the_axis() {
        let c = Concat { axis: 1 };
        let shapes = c.infer_shape(&[tvec![2, 3, 4], tvec![2, 5, 4]], 1, AxisOrder::Tf).unwrap();
        assert_eq!(shapes, tvec!(tvec![2, 8, 4]));
    }

    #[test]
    fn negative_axis() {
        let c = Concat { axis: -1 };
        let shapes = c.infer_shape(&[tvec![2, 3], tvec![2, 1], tvec![2, 6]], 1, AxisOrder::Tf).unwrap();
        assert_eq!(shapes, tvec!(tvec![2, 10]));
    }

    #[test]
    fn other_axes_must_match() {
        let c = Concat { axis: 1 };
        assert!(c.infer_shape(&[tvec![2, 3, 4], tvec![3, 5, 4]], 1, AxisOrder::Tf).is_err());
        assert!(c.infer_shape(&[tvec![2, 3, 4], tvec![2, 5]], 1, AxisOrder::Tf).is_err());
        assert!(Concat { axis: 3 }.infer_shape(&[tvec![2, 3, 4]], 1, AxisOrder::Tf).is_err());
    }
}
