use crate::ops::{input_shape, invalid};
use irconv_core::internal::*;
use irconv_core::ops::array::Reshape;

/// Removes the unit axes listed in `squeeze_dims`, or every unit axis when
/// the list is empty.
pub fn squeeze(node: &SourceNode, graph: &IrGraph) -> IrResult<Op> {
    let kind = OpType::Reshape;
    let input = input_shape(node, graph, 0, kind)?;
    let rank = input.len() as i64;
    let dims: Vec<i64> = match node.optional(kind, "squeeze_dims")? {
        Some(dims) => dims,
        None => node.optional(kind, "axis")?.unwrap_or_default(),
    };
    let mut squeezed = vec![];
    for &d in &dims {
        let axis = if d < 0 { d + rank } else { d };
        if !(0..rank).contains(&axis) || input[axis as usize] != 1 {
            return Err(invalid(
                node,
                kind,
                "squeeze_dims",
                format!("axis {d} of {} is not a unit axis", format_shape(input)),
            ));
        }
        squeezed.push(axis as usize);
    }
    let output_shape = input
        .iter()
        .enumerate()
        .filter(|(ix, d)| if squeezed.is_empty() { **d != 1 } else { !squeezed.contains(ix) })
        .map(|(_, d)| *d)
        .collect();
    Ok(Op::new(node.name.clone(), OpKind::Reshape(Reshape { output_shape })))
}
