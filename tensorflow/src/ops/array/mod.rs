use super::{DataInputs, const_ints, invalid, register};
use irconv_core::framework::Framework;
use irconv_core::internal::*;
use irconv_core::ops::array::{Gather, Permute, Tile};

mod concatv2;
mod expand_dims;
mod pad;
mod reshape;
mod squeeze;
mod strided_slice;

pub use self::concatv2::ConcatV2;
pub use self::reshape::{fold_into_constant, fold_reshapes_into_constants};
pub use self::strided_slice::resolve_slice;

pub fn register_all_ops(reg: &mut TranslationRegistry) -> IrResult<()> {
    reg.register(Framework::Tensorflow, ConcatV2, &["ConcatV2"])?;
    register(reg, expand_dims::expand_dims, DataInputs::Leading(1), &["ExpandDims"])?;
    register(reg, reshape::reshape, DataInputs::Leading(1), &["Reshape"])?;
    register(reg, squeeze::squeeze, DataInputs::Leading(1), &["Squeeze"])?;
    register(reg, gather_v2, DataInputs::Leading(2), &["GatherV2"])?;
    register(reg, pad::pad, DataInputs::Leading(1), &["Pad", "PadV2", "MirrorPad"])?;
    register(reg, strided_slice::strided_slice, DataInputs::Leading(1), &["StridedSlice"])?;
    register(reg, tile, DataInputs::Leading(1), &["Tile"])?;
    register(reg, transpose, DataInputs::Leading(1), &["Transpose"])?;
    Ok(())
}

pub fn gather_v2(node: &SourceNode, graph: &IrGraph) -> IrResult<Op> {
    let axis = match const_ints(node, graph, 2, OpType::Gather)?.as_slice() {
        [axis] => *axis,
        other => return Err(invalid(node, OpType::Gather, "axis", format!("expected a scalar, got {other:?}"))),
    };
    Ok(Op::new(node.name.clone(), OpKind::Gather(Gather { axis })))
}

pub fn tile(node: &SourceNode, graph: &IrGraph) -> IrResult<Op> {
    let multiples = const_ints(node, graph, 1, OpType::Tile)?;
    if multiples.iter().any(|m| *m < 0) {
        return Err(invalid(node, OpType::Tile, "multiples", format!("negative multiple in {multiples:?}")));
    }
    let multiples = multiples.into_iter().map(|m| m as usize).collect();
    Ok(Op::new(node.name.clone(), OpKind::Tile(Tile { multiples })))
}

pub fn transpose(node: &SourceNode, graph: &IrGraph) -> IrResult<Op> {
    let perm = const_ints(node, graph, 1, OpType::Permute)?;
    if perm.iter().any(|p| *p < 0) {
        return Err(invalid(node, OpType::Permute, "perm", format!("negative axis in {perm:?}")));
    }
    let order = perm.into_iter().map(|p| p as usize).collect();
    Ok(Op::new(node.name.clone(), OpKind::Permute(Permute { order })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::tests::{add_const, graph_with_input};

    #[test]
    fn transpose_from_const_perm() {
        let mut graph = graph_with_input(&[1, 3, 8, 8]);
        add_const(&mut graph, "perm", tensor1(&[0.0, 2.0, 3.0, 1.0]));
        let node = SourceNode::new("t".to_string(), "Transpose".to_string()).with_inputs(&["x", "perm"]);
        let op = transpose(&node, &graph).unwrap();
        assert_eq!(op.infer_shape(&[tvec![1, 3, 8, 8]], 1, AxisOrder::Tf).unwrap(), tvec!(tvec![1, 8, 8, 3]));
    }

    #[test]
    fn gather_axis_must_be_scalar() {
        let mut graph = graph_with_input(&[5, 4]);
        add_const(&mut graph, "indices", tensor1(&[0.0, 2.0]));
        add_const(&mut graph, "axis", tensor1(&[0.0, 1.0]));
        let node = SourceNode::new("g".to_string(), "GatherV2".to_string()).with_inputs(&["x", "indices", "axis"]);
        assert!(matches!(gather_v2(&node, &graph), Err(IrError::InvalidAttribute { .. })));
    }
}
