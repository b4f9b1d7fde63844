use irconv_core::framework::Framework;
use irconv_core::internal::*;

pub mod array;
pub mod cnn;
pub mod math;
pub mod nn;

pub fn register_all_ops(reg: &mut TranslationRegistry) -> IrResult<()> {
    array::register_all_ops(reg)?;
    cnn::register_all_ops(reg)?;
    math::register_all_ops(reg)?;
    nn::register_all_ops(reg)?;
    Ok(())
}

pub(crate) fn register(reg: &mut TranslationRegistry, builder: OpBuilder, op_types: &[&str]) -> IrResult<()> {
    reg.register_fn(Framework::Caffe, builder, op_types)
}

pub(crate) fn invalid(node: &SourceNode, kind: OpType, attr: &str, reason: impl Into<String>) -> IrError {
    IrError::InvalidAttribute {
        op: node.name.clone(),
        kind,
        attr: attr.to_string(),
        reason: reason.into(),
    }
}

/// Shape of the buffer read by input `ix`.
pub(crate) fn input_shape<'g>(
    node: &SourceNode,
    graph: &'g IrGraph,
    ix: usize,
    kind: OpType,
) -> IrResult<&'g Shape> {
    graph.get_output_shape(node.input(ix, kind)?)
}

/// A spatial parameter given either as `key` (one value for both axes, or
/// `[h, w]`) or as the `key_h` / `key_w` pair.
pub(crate) fn spatial_pair(
    node: &SourceNode,
    kind: OpType,
    (key, key_h, key_w): (&str, &str, &str),
    default: usize,
) -> IrResult<(usize, usize)> {
    if let (Some(h), Some(w)) = (node.optional::<usize>(kind, key_h)?, node.optional::<usize>(kind, key_w)?) {
        return Ok((h, w));
    }
    match node.attrs.get(key) {
        None => Ok((default, default)),
        Some(AttrValue::List(_)) => match node.required::<Vec<usize>>(kind, key)?.as_slice() {
            [] => Ok((default, default)),
            [both] => Ok((*both, *both)),
            [h, w] => Ok((*h, *w)),
            other => Err(invalid(node, kind, key, format!("expected one or two values, got {}", other.len()))),
        },
        Some(_) => {
            let both = node.required::<usize>(kind, key)?;
            Ok((both, both))
        }
    }
}

/// Weight blob `ix`, or zeros sized to `len` when the layer has none.
pub(crate) fn bias_or_zeros(node: &SourceNode, ix: usize, len: usize) -> Tensor {
    node.blobs.get(ix).cloned().unwrap_or_else(|| Tensor::zeros(&[len]))
}
