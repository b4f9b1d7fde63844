use crate::ops::{const_ints, input_shape, invalid};
use irconv_core::internal::*;
use irconv_core::ops::array::StridedSlice;

/// Resolve one axis of a TensorFlow slice against its dimension: negative
/// bounds count from the end, masked bounds span the whole axis, and bounds
/// are clamped to the axis. The result always has a non-negative length.
pub fn resolve_slice(
    dim: i64,
    begin: i64,
    end: i64,
    stride: i64,
    begin_masked: bool,
    end_masked: bool,
) -> (i64, i64) {
    let wrap = |x: i64| if x < 0 { x + dim } else { x };
    if stride > 0 {
        let begin = if begin_masked { 0 } else { wrap(begin).clamp(0, dim) };
        let end = if end_masked { dim } else { wrap(end).clamp(0, dim) };
        (begin, end.max(begin))
    } else {
        let begin = if begin_masked { dim - 1 } else { wrap(begin).clamp(-1, dim - 1) };
        let end = if end_masked { -1 } else { wrap(end).clamp(-1, dim - 1) };
        (begin, end.min(begin))
    }
}

fn bit(mask: i64, axis: usize) -> bool {
    axis < 64 && (mask >> axis) & 1 == 1
}

pub fn strided_slice(node: &SourceNode, graph: &IrGraph) -> IrResult<Op> {
    let kind = OpType::StridedSlice;
    for unsupported in ["ellipsis_mask", "new_axis_mask"] {
        if node.optional::<i64>(kind, unsupported)?.unwrap_or(0) != 0 {
            return Err(invalid(node, kind, unsupported, "only zero is supported"));
        }
    }
    let input = input_shape(node, graph, 0, kind)?;
    let begin = const_ints(node, graph, 1, kind)?;
    let end = const_ints(node, graph, 2, kind)?;
    let strides = const_ints(node, graph, 3, kind)?;
    if begin.len() != end.len() || end.len() != strides.len() || begin.len() > input.len() {
        return Err(invalid(
            node,
            kind,
            "begin",
            format!("{begin:?}, {end:?} and {strides:?} do not slice {}", format_shape(input)),
        ));
    }
    if let Some(axis) = strides.iter().position(|s| *s == 0) {
        return Err(invalid(node, kind, "strides", format!("stride on axis {axis} is zero")));
    }
    let begin_mask = node.optional::<i64>(kind, "begin_mask")?.unwrap_or(0);
    let end_mask = node.optional::<i64>(kind, "end_mask")?.unwrap_or(0);
    let (begin, end): (TVec<i64>, TVec<i64>) = (0..begin.len())
        .map(|axis| {
            resolve_slice(
                input[axis] as i64,
                begin[axis],
                end[axis],
                strides[axis],
                bit(begin_mask, axis),
                bit(end_mask, axis),
            )
        })
        .unzip();
    let slice = StridedSlice {
        begin,
        end,
        strides: strides.into_iter().collect(),
        shrink_axis_mask: node.optional(kind, "shrink_axis_mask")?.unwrap_or(0),
    };
    Ok(Op::new(node.name.clone(), OpKind::StridedSlice(slice)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::tests::{add_const, graph_with_input};
    use proptest::prelude::*;

    // walks the axis the way TensorFlow does
    fn naive_len(dim: i64, begin: i64, end: i64, stride: i64) -> i64 {
        let (begin, end) = resolve_slice(dim, begin, end, stride, false, false);
        let mut i = begin;
        let mut n = 0;
        while (stride > 0 && i < end) || (stride < 0 && i > end) {
            n += 1;
            i += stride;
        }
        n
    }

    proptest! {
        #[test]
        fn resolved_slices_fit(dim in 1i64..16, begin in -20i64..20, end in -20i64..20, stride in -4i64..4) {
            prop_assume!(stride != 0);
            let (b, e) = resolve_slice(dim, begin, end, stride, false, false);
            let len = naive_len(dim, begin, end, stride);
            prop_assert!(len >= 0 && len <= dim);
            prop_assert_eq!(len, ((e - b) + stride - stride.signum()) / stride);
        }
    }

    #[test]
    fn masks_and_negative_bounds() {
        assert_eq!(resolve_slice(10, 3, 0, 1, true, true), (0, 10));
        assert_eq!(resolve_slice(10, -3, -1, 1, false, false), (7, 9));
        assert_eq!(resolve_slice(10, 0, 0, -1, true, true), (9, -1));
        assert_eq!(resolve_slice(10, 5, 8, 1, false, false), (5, 8));
        assert_eq!(resolve_slice(10, 8, 5, 1, false, false), (8, 8));
    }

    #[test]
    fn slice_from_const_inputs() {
        let mut graph = graph_with_input(&[1, 10, 10, 3]);
        add_const(&mut graph, "begin", tensor1(&[0.0, 2.0, -4.0]));
        add_const(&mut graph, "end", tensor1(&[1.0, 8.0, 0.0]));
        add_const(&mut graph, "strides", tensor1(&[1.0, 2.0, 1.0]));
        let node = SourceNode::new("ss".to_string(), "StridedSlice".to_string())
            .with_inputs(&["x", "begin", "end", "strides"])
            .with_attr("end_mask", 4i64);
        let op = strided_slice(&node, &graph).unwrap();
        assert_eq!(
            op.infer_shape(&[tvec![1, 10, 10, 3]], 1, AxisOrder::Tf).unwrap(),
            tvec!(tvec![1, 3, 4, 3])
        );
    }

    #[test]
    fn new_axis_is_rejected() {
        let graph = graph_with_input(&[4]);
        let node = SourceNode::new("ss".to_string(), "StridedSlice".to_string())
            .with_inputs(&["x"])
            .with_attr("new_axis_mask", 1i64);
        assert!(matches!(strided_slice(&node, &graph), Err(IrError::InvalidAttribute { .. })));
    }
}
