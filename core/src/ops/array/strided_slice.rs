use crate::internal::*;
use crate::ops::input_shape;

op_config! {
    /// Strided slice over the leading `begin.len()` axes.
    ///
    /// Axes whose bit is set in `shrink_axis_mask` keep a size of 1.
    pub struct StridedSlice {
        begin: TVec<i64>,
        end: TVec<i64>,
        strides: TVec<i64>,
        shrink_axis_mask: i64 = 0,
    }
}

impl StridedSlice {
    fn shrinks(&self, axis: usize) -> bool {
        axis < 64 && (self.shrink_axis_mask >> axis) & 1 == 1
    }
}

impl IrOp for StridedSlice {
    fn infer_shape(&self, inputs: &[Shape], _n: usize, _ao: AxisOrder) -> ShapeResult<TVec<Shape>> {
        let input = input_shape(inputs, 0)?;
        ensure_shape!(
            self.begin.len() == self.end.len() && self.end.len() == self.strides.len(),
            "begin, end and strides lengths differ ({}, {}, {})",
            self.begin.len(),
            self.end.len(),
            self.strides.len()
        );
        ensure_shape!(
            self.begin.len() <= input.len(),
            "{} sliced axes for an input of rank {}",
            self.begin.len(),
            input.len()
        );
        let mut output = input.clone();
        for axis in 0..self.begin.len() {
            let (begin, end, stride) = (self.begin[axis], self.end[axis], self.strides[axis]);
            ensure_shape!(stride != 0, "stride on axis {axis} is zero");
            output[axis] = if self.shrinks(axis) {
                1
            } else {
                let Some(len) = end.checked_sub(begin).and_then(|span| ceil_div(span, stride)) else {
                    bail_shape!("slice {begin}..{end} by {stride} on axis {axis} overflows")
                };
                ensure_shape!(
                    len >= 0,
                    "slice {begin}..{end} by {stride} on axis {axis} has negative length"
                );
                len as usize
            };
        }
        Ok(tvec!(output))
    }
}

fn ceil_div(a: i64, b: i64) -> Option<i64> {
    let q = a.checked_div(b)?;
    if a.checked_rem(b)? != 0 && ((a < 0) == (b < 0)) { Some(q + 1) } else { Some(q) }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slice(begin: &[i64], end: &[i64], strides: &[i64], mask: i64) -> StridedSlice {
        StridedSlice {
            begin: begin.into(),
            end: end.into(),
            strides: strides.into(),
            shrink_axis_mask: mask,
        }
    }

    #[test]
    fn ceil_division() {
        let s = slice(&[0, 0], &[4, 6], &[2, 3], 0);
        assert_eq!(s.infer_shape(&[tvec![4, 6]], 1, AxisOrder::Tf).unwrap(), tvec!(tvec![2, 2]));
        let s = slice(&[0, 1], &[5, 6], &[2, 3], 0);
        assert_eq!(s.infer_shape(&[tvec![5, 6]], 1, AxisOrder::Tf).unwrap(), tvec!(tvec![3, 2]));
    }

    #[test]
    fn shrink_mask_forces_one() {
        let s = slice(&[0, 0], &[4, 6], &[2, 3], 1);
        assert_eq!(s.infer_shape(&[tvec![4, 6]], 1, AxisOrder::Tf).unwrap(), tvec!(tvec![1, 2]));
        let s = slice(&[0, 0], &[4, 6], &[2, 3], 0b10);
        assert_eq!(s.infer_shape(&[tvec![4, 6]], 1, AxisOrder::Tf).unwrap(), tvec!(tvec![2, 1]));
    }

    #[test]
    fn negative_strides() {
        let s = slice(&[5], &[0], &[-2], 0);
        assert_eq!(s.infer_shape(&[tvec![6, 3]], 1, AxisOrder::Tf).unwrap(), tvec!(tvec![3, 3]));
    }

    #[test]
    fn malformed() {
        assert!(slice(&[0, 0], &[4], &[1, 1], 0).infer_shape(&[tvec![4, 6]], 1, AxisOrder::Tf).is_err());
        assert!(slice(&[0], &[4], &[0], 0).infer_shape(&[tvec![4]], 1, AxisOrder::Tf).is_err());
        assert!(slice(&[4], &[0], &[1], 0).infer_shape(&[tvec![4]], 1, AxisOrder::Tf).is_err());
    }

    #[test]
    fn extreme_bounds_do_not_overflow() {
        let s = slice(&[i64::MIN], &[i64::MAX], &[1], 0);
        assert!(s.infer_shape(&[tvec![4]], 1, AxisOrder::Tf).is_err());
        let s = slice(&[0], &[i64::MIN], &[-1], 0);
        assert!(s.infer_shape(&[tvec![4]], 1, AxisOrder::Tf).is_err());
        let s = slice(&[i64::MAX], &[0], &[-1], 0);
        assert_eq!(s.infer_shape(&[tvec![4]], 1, AxisOrder::Tf).unwrap(), tvec!(tvec![i64::MAX as usize]));
    }
}
