use crate::internal::*;
use crate::model::Buffer;
use crate::ops::input_shape;

op_config! {
    /// Axis transposition: output axis `i` is input axis `order[i]`.
    pub struct Permute {
        order: TVec<usize>,
    }
}

impl IrOp for Permute {
    fn infer_shape(&self, inputs: &[Shape], _n: usize, _ao: AxisOrder) -> ShapeResult<TVec<Shape>> {
        let input = input_shape(inputs, 0)?;
        ensure_shape!(
            self.order.len() == input.len() && self.order.iter().all_unique(),
            "order {:?} is not a permutation of the {} axes of {}",
            self.order,
            input.len(),
            format_shape(input)
        );
        let mut output = Shape::new();
        for &axis in &self.order {
            ensure_shape!(axis < input.len(), "axis {axis} is out of range for rank {}", input.len());
            output.push(input[axis]);
        }
        Ok(tvec!(output))
    }

    fn populate_axis_format(&self, buffer: &mut Buffer, _axis_order: AxisOrder) {
        buffer.axis_format = AxisFormat::NonTrivial;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nchw_to_nhwc() {
        let p = Permute { order: tvec![0, 2, 3, 1] };
        let shapes = p.infer_shape(&[tvec![1, 3, 8, 6]], 1, AxisOrder::Caffe).unwrap();
        assert_eq!(shapes, tvec!(tvec![1, 8, 6, 3]));
    }

    #[test]
    fn rejects_non_permutations() {
        let input = [tvec![1, 3, 8]];
        assert!(Permute { order: tvec![0, 0, 1] }.infer_shape(&input, 1, AxisOrder::Tf).is_err());
        assert!(Permute { order: tvec![0, 1, 3] }.infer_shape(&input, 1, AxisOrder::Tf).is_err());
        assert!(Permute { order: tvec![1, 0] }.infer_shape(&input, 1, AxisOrder::Tf).is_err());
    }

    #[test]
    fn output_layout_is_non_trivial() {
        let mut buffer = Buffer::new("t".into(), tvec![1, 8, 6, 3], "t".into());
        Permute { order: tvec![0, 2, 3, 1] }.populate_axis_format(&mut buffer, AxisOrder::Caffe);
        assert_eq!(buffer.axis_format, AxisFormat::NonTrivial);
    }
}
