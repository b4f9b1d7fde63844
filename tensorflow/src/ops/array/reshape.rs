use crate::ops::{const_ints, input_shape, invalid};
use irconv_core::internal::*;
use irconv_core::ops::array::Reshape;

/// Merge every reshape reading a constant that nothing else reads into
/// that constant, reshaping the tensor in place. Returns how many were
/// folded.
///
/// Only sound on a complete graph: a reader added later would see the
/// reshaped tensor.
pub fn fold_reshapes_into_constants(graph: &mut IrGraph) -> IrResult<usize> {
    let reshapes: Vec<String> =
        graph.ops().filter(|op| op.op_type() == OpType::Reshape).map(|op| op.name().to_string()).collect();
    let mut folded = 0;
    for reshape in reshapes {
        let [input] = graph.node_by_name(&reshape)?.inputs.as_slice() else { continue };
        let input = input.clone();
        if fold_into_constant(graph, &reshape, &input)? {
            folded += 1;
        }
    }
    Ok(folded)
}

/// Merge the reshape op `reshape` into the producer of `input` if that is a
/// constant with no other consumer. Returns whether it did.
pub fn fold_into_constant(graph: &mut IrGraph, reshape: &str, input: &str) -> IrResult<bool> {
    let producer = graph.producer(input)?;
    if producer.op_type() != OpType::Constant || graph.buffer(input)?.consumers.len() != 1 {
        return Ok(false);
    }
    let producer = producer.name().to_string();
    graph.merge(reshape, &producer, |reshape, konst| {
        let (OpKind::Reshape(r), OpKind::Constant(c)) = (reshape.kind(), konst.kind()) else {
            return Err(IrError::InvalidMerge {
                absorbed: reshape.name().to_string(),
                survivor: konst.name().to_string(),
                reason: format!("can not fold {} into {}", reshape.op_type(), konst.op_type()),
            });
        };
        let tensor = c.tensor.clone().into_shape(&r.output_shape).map_err(|e| IrError::InvalidAttribute {
            op: reshape.name().to_string(),
            kind: OpType::Reshape,
            attr: "output_shape".to_string(),
            reason: e.to_string(),
        })?;
        konst.set_attr("tensor", tensor)
    })?;
    trace!("folded {reshape} into constant {producer}");
    Ok(true)
}

/// Shape from the second input. One `-1` takes the remaining elements.
pub fn reshape(node: &SourceNode, graph: &IrGraph) -> IrResult<Op> {
    let kind = OpType::Reshape;
    let input = input_shape(node, graph, 0, kind)?;
    let dims = const_ints(node, graph, 1, kind)?;
    let total: usize = input.iter().product();
    let known: usize = dims.iter().filter(|d| **d >= 0).map(|d| *d as usize).product();
    let wildcards = dims.iter().filter(|d| **d < 0).count();
    let output_shape: Shape = match wildcards {
        0 if known == total => dims.iter().map(|d| *d as usize).collect(),
        1 if known > 0 && total % known == 0 => {
            dims.iter().map(|&d| if d < 0 { total / known } else { d as usize }).collect()
        }
        _ => {
            return Err(invalid(
                node,
                kind,
                "shape",
                format!("{dims:?} is not a valid shape for {}", format_shape(input)),
            ));
        }
    };
    Ok(Op::new(node.name.clone(), OpKind::Reshape(Reshape { output_shape })))
}
