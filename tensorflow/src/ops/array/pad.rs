use crate::ops::{const_input, const_ints, invalid};
use irconv_core::internal::*;
use irconv_core::ops::array::Pad;
use irconv_core::ops::cnn::PadMode;

/// `Pad`, `PadV2` (constant value as third input) and `MirrorPad`.
pub fn pad(node: &SourceNode, graph: &IrGraph) -> IrResult<Op> {
    let kind = OpType::Pad;
    let paddings = const_input(node, graph, 1, kind)?;
    let values = const_ints(node, graph, 1, kind)?;
    if paddings.rank() != 2 || paddings.dim(1) != Some(2) || values.iter().any(|v| *v < 0) {
        let reason = format!("expected non-negative [rank, 2] pairs, got {paddings:?}");
        return Err(invalid(node, kind, "paddings", reason));
    }
    let pads = values.chunks(2).map(|p| [p[0] as usize, p[1] as usize]).collect();
    let mode = match node.optional::<String>(kind, "mode")?.as_deref() {
        None | Some("CONSTANT") => PadMode::Constant,
        Some("REFLECT") => PadMode::Reflect,
        Some(other) => return Err(invalid(node, kind, "mode", format!("unsupported padding mode `{other}`"))),
    };
    let constant_value = if node.inputs.len() > 2 {
        match const_input(node, graph, 2, kind)?.to_vec().as_slice() {
            [value] => *value,
            _ => return Err(invalid(node, kind, "constant_values", "expected a scalar")),
        }
    } else {
        0.0
    };
    Ok(Op::new(node.name.clone(), OpKind::Pad(Pad { pads, mode, constant_value })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::tests::{add_const, graph_with_input};

    fn graph() -> IrGraph {
        let mut graph = graph_with_input(&[1, 4, 4, 3]);
        add_const(&mut graph, "paddings", tensor2(&[[0.0, 0.0], [1.0, 1.0], [2.0, 0.0], [0.0, 0.0]]));
        add_const(&mut graph, "value", tensor0(-1.0));
        graph
    }

    #[test]
    fn pad_v2_with_value() {
        let node = SourceNode::new("p".to_string(), "PadV2".to_string()).with_inputs(&["x", "paddings", "value"]);
        let op = pad(&node, &graph()).unwrap();
        let OpKind::Pad(p) = op.kind() else { panic!() };
        assert_eq!(p.constant_value, -1.0);
        assert_eq!(op.infer_shape(&[tvec![1, 4, 4, 3]], 1, AxisOrder::Tf).unwrap(), tvec!(tvec![1, 6, 6, 3]));
    }

    #[test]
    fn mirror_modes() {
        let node = SourceNode::new("p".to_string(), "MirrorPad".to_string()).with_inputs(&["x", "paddings"]);
        let op = pad(&node.clone().with_attr("mode", "REFLECT"), &graph()).unwrap();
        assert_eq!(op.attr("mode").unwrap(), AttrValue::Str("PADDING_REFLECT".to_string()));
        assert!(pad(&node.with_attr("mode", "SYMMETRIC"), &graph()).is_err());
    }
}
