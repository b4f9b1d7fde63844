use crate::ops::{const_ints, input_shape, invalid};
use irconv_core::internal::*;
use irconv_core::ops::array::Reshape;

/// Inserts a unit axis at the position held by the second input.
pub fn expand_dims(node: &SourceNode, graph: &IrGraph) -> IrResult<Op> {
    let kind = OpType::Reshape;
    let input = input_shape(node, graph, 0, kind)?;
    let rank = input.len() as i64;
    let dim = match const_ints(node, graph, 1, kind)?.as_slice() {
        [dim] if (-rank - 1..=rank).contains(dim) => {
            if *dim < 0 { (dim + rank + 1) as usize } else { *dim as usize }
        }
        other => return Err(invalid(node, kind, "dim", format!("{other:?} is not an axis for rank {rank}"))),
    };
    let mut output_shape = input.clone();
    output_shape.insert(dim, 1);
    Ok(Op::new(node.name.clone(), OpKind::Reshape(Reshape { output_shape })))
}
