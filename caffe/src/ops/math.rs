use super::{invalid, register};
use irconv_core::internal::*;
use irconv_core::ops::math::{Elementwise, ElementwiseSum, Power};

pub fn register_all_ops(reg: &mut TranslationRegistry) -> IrResult<()> {
    register(reg, eltwise, &["Eltwise"])?;
    register(reg, power, &["Power"])?;
    Ok(())
}

pub fn eltwise(node: &SourceNode, _graph: &IrGraph) -> IrResult<Op> {
    let operation = node.optional::<String>(OpType::ElementwiseSum, "operation")?;
    let kind = match operation.as_deref().unwrap_or("SUM") {
        "SUM" => {
            let coeffs: Vec<f32> = node.optional(OpType::ElementwiseSum, "coeff")?.unwrap_or_default();
            if !coeffs.is_empty() && coeffs.len() != node.inputs.len() {
                return Err(invalid(
                    node,
                    OpType::ElementwiseSum,
                    "coeff",
                    format!("{} coefficients for {} inputs", coeffs.len(), node.inputs.len()),
                ));
            }
            OpKind::ElementwiseSum(ElementwiseSum { coeffs })
        }
        "PROD" => OpKind::ElementwiseProduct(Elementwise {}),
        "MAX" => OpKind::ElementwiseMax(Elementwise {}),
        other => {
            return Err(invalid(
                node,
                OpType::ElementwiseSum,
                "operation",
                format!("unknown eltwise operation `{other}`"),
            ));
        }
    };
    Ok(Op::new(node.name.clone(), kind))
}

pub fn power(node: &SourceNode, _graph: &IrGraph) -> IrResult<Op> {
    let kind = OpType::Power;
    let power = Power {
        scale: node.optional(kind, "scale")?.unwrap_or(1.0),
        shift: node.optional(kind, "shift")?.unwrap_or(0.0),
        power: node.optional(kind, "power")?.unwrap_or(1.0),
    };
    Ok(Op::new(node.name.clone(), OpKind::Power(power)))
}
