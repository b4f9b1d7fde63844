use super::{DataInputs, const_ints, register};
use irconv_core::framework::Framework;
use irconv_core::internal::*;
use irconv_core::ops::math::{ArgMax, Elementwise, ElementwiseBinary, ElementwiseSum, ElementwiseUnary, Reduce};

pub fn register_all_ops(reg: &mut TranslationRegistry) -> IrResult<()> {
    register(reg, arg_max, DataInputs::Leading(1), &["ArgMax"])?;
    register(reg, binary, DataInputs::All, &["Add", "AddV2", "BiasAdd", "Maximum", "Mul", "RealDiv", "Sub"])?;
    register(reg, reduce, DataInputs::Leading(1), &["Max", "Mean", "Min", "Prod", "Sum"])?;
    register(reg, unary, DataInputs::All, &["Abs", "Exp", "Floor", "Log", "Neg", "Sin", "Sqrt"])?;
    Ok(())
}

fn unsupported(node: &SourceNode) -> IrError {
    IrError::UnsupportedOperator {
        framework: Framework::Tensorflow,
        op_type: node.op_type.clone(),
        node: Some(node.name.clone()),
    }
}

pub fn binary(node: &SourceNode, _graph: &IrGraph) -> IrResult<Op> {
    let kind = match node.op_type.as_str() {
        "Add" | "AddV2" | "BiasAdd" => OpKind::ElementwiseSum(ElementwiseSum { coeffs: vec![] }),
        "Maximum" => OpKind::ElementwiseMax(Elementwise {}),
        "Mul" => OpKind::ElementwiseBinaryProduct(ElementwiseBinary {}),
        "RealDiv" => OpKind::ElementwiseBinaryDiv(ElementwiseBinary {}),
        "Sub" => OpKind::ElementwiseBinarySub(ElementwiseBinary {}),
        _ => return Err(unsupported(node)),
    };
    Ok(Op::new(node.name.clone(), kind))
}

pub fn unary(node: &SourceNode, _graph: &IrGraph) -> IrResult<Op> {
    let kind = match node.op_type.as_str() {
        "Abs" => OpKind::ElementwiseUnaryAbs(ElementwiseUnary {}),
        "Exp" => OpKind::ElementwiseUnaryExp(ElementwiseUnary {}),
        "Floor" => OpKind::ElementwiseUnaryFloor(ElementwiseUnary {}),
        "Log" => OpKind::ElementwiseUnaryLog(ElementwiseUnary {}),
        "Neg" => OpKind::ElementwiseUnaryNeg(ElementwiseUnary {}),
        "Sin" => OpKind::ElementwiseUnarySin(ElementwiseUnary {}),
        "Sqrt" => OpKind::ElementwiseUnarySqrt(ElementwiseUnary {}),
        _ => return Err(unsupported(node)),
    };
    Ok(Op::new(node.name.clone(), kind))
}

/// Reduction axes come from the second input. TensorFlow drops reduced
/// axes unless `keep_dims` is set.
pub fn reduce(node: &SourceNode, graph: &IrGraph) -> IrResult<Op> {
    let op_type = match node.op_type.as_str() {
        "Max" => OpType::ReduceMax,
        "Mean" => OpType::ReduceMean,
        "Min" => OpType::ReduceMin,
        "Prod" => OpType::ReduceProd,
        "Sum" => OpType::ReduceSum,
        _ => return Err(unsupported(node)),
    };
    let reduce = Reduce {
        axes: const_ints(node, graph, 1, op_type)?.into_iter().collect(),
        keep_dims: node.optional(op_type, "keep_dims")?.unwrap_or(false),
    };
    let kind = match op_type {
        OpType::ReduceMax => OpKind::ReduceMax(reduce),
        OpType::ReduceMean => OpKind::ReduceMean(reduce),
        OpType::ReduceMin => OpKind::ReduceMin(reduce),
        OpType::ReduceProd => OpKind::ReduceProd(reduce),
        _ => OpKind::ReduceSum(reduce),
    };
    Ok(Op::new(node.name.clone(), kind))
}

pub fn arg_max(node: &SourceNode, graph: &IrGraph) -> IrResult<Op> {
    let kind = OpType::ArgMax;
    let axis = match const_ints(node, graph, 1, kind)?.as_slice() {
        [axis] => *axis,
        other => return Err(super::invalid(node, kind, "dimension", format!("expected a scalar, got {other:?}"))),
    };
    Ok(Op::new(node.name.clone(), OpKind::ArgMax(ArgMax { axis, keep_dims: false })))
}
