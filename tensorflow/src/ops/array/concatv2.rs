use crate::ops::{const_ints, invalid};
use irconv_core::internal::*;
use irconv_core::ops::array::Concat;

/// The axis is the trailing input, unless the node carries it as an
/// attribute.
#[derive(Debug, Clone, Copy)]
pub struct ConcatV2;

impl ConcatV2 {
    fn axis_is_input(node: &SourceNode) -> bool {
        !node.attrs.contains("axis")
    }
}

impl Translation for ConcatV2 {
    fn extract_parameters(&self, node: &SourceNode, graph: &IrGraph) -> IrResult<Op> {
        let kind = OpType::Concat;
        let axis = if Self::axis_is_input(node) {
            let last = node.inputs.len().checked_sub(1).ok_or_else(|| IrError::MissingAttribute {
                op: node.name.clone(),
                kind,
                attr: "axis".to_string(),
            })?;
            match const_ints(node, graph, last, kind)?.as_slice() {
                [axis] => *axis,
                other => return Err(invalid(node, kind, "axis", format!("expected a scalar, got {other:?}"))),
            }
        } else {
            node.required(kind, "axis")?
        };
        Ok(Op::new(node.name.clone(), OpKind::Concat(Concat { axis })))
    }

    fn extract_input_names(&self, node: &SourceNode, _graph: &IrGraph) -> IrResult<TVec<String>> {
        let n = if Self::axis_is_input(node) { node.inputs.len().saturating_sub(1) } else { node.inputs.len() };
        Ok(node.inputs.iter().take(n).cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::tests::{add_const, graph_with_input};

    #[test]
    fn trailing_axis_input_is_dropped() {
        let mut graph = graph_with_input(&[2, 3]);
        add_const(&mut graph, "y", Tensor::zeros(&[2, 5]));
        add_const(&mut graph, "axis", tensor0(-1.0));
        let node = SourceNode::new("c".to_string(), "ConcatV2".to_string()).with_inputs(&["x", "y", "axis"]);
        ConcatV2.add_op(&node, &mut graph).unwrap();
        assert_eq!(graph.get_output_shape("c").unwrap().as_slice(), &[2, 8]);
        assert_eq!(graph.node_by_name("c").unwrap().inputs.len(), 2);
    }

    #[test]
    fn axis_attribute() {
        let mut graph = graph_with_input(&[2, 3]);
        let node = SourceNode::new("c".to_string(), "ConcatV2".to_string())
            .with_inputs(&["x", "x"])
            .with_attr("axis", 0i64);
        ConcatV2.add_op(&node, &mut graph).unwrap();
        assert_eq!(graph.get_output_shape("c").unwrap().as_slice(), &[4, 3]);
    }
}
