use super::{input_shape, invalid, register};
use irconv_core::internal::*;
use irconv_core::ops::array::{Concat, Permute, Reshape};
use irconv_core::ops::source::Input;

pub fn register_all_ops(reg: &mut TranslationRegistry) -> IrResult<()> {
    register(reg, input, &["Input", "Data", "DummyData"])?;
    register(reg, concat, &["Concat"])?;
    register(reg, flatten, &["Flatten"])?;
    register(reg, permute, &["Permute"])?;
    register(reg, reshape, &["Reshape"])?;
    Ok(())
}

/// Graph inputs. Caffe data layers carry no encoding, images are BGR.
pub fn input(node: &SourceNode, _graph: &IrGraph) -> IrResult<Op> {
    let kind = OpType::Input;
    let input = Input {
        shape: node.required(kind, "shape")?,
        input_encoding_in: node.optional(kind, "input_encoding_in")?.unwrap_or_else(|| "bgr".to_string()),
        input_encoding_out: node.optional(kind, "input_encoding_out")?.unwrap_or_else(|| "bgr".to_string()),
        input_type: node.optional(kind, "input_type")?.unwrap_or_else(|| "default".to_string()),
    };
    Ok(Op::new(node.name.clone(), OpKind::Input(input)))
}

pub fn concat(node: &SourceNode, _graph: &IrGraph) -> IrResult<Op> {
    let kind = OpType::Concat;
    let axis = match node.optional::<i64>(kind, "axis")? {
        Some(axis) => axis,
        None => node.optional(kind, "concat_dim")?.unwrap_or(1),
    };
    Ok(Op::new(node.name.clone(), OpKind::Concat(Concat { axis })))
}

pub fn permute(node: &SourceNode, _graph: &IrGraph) -> IrResult<Op> {
    let order = node.required(OpType::Permute, "order")?;
    Ok(Op::new(node.name.clone(), OpKind::Permute(Permute { order })))
}

fn resolve_axis(node: &SourceNode, kind: OpType, key: &str, axis: i64, rank: usize) -> IrResult<usize> {
    let resolved = if axis < 0 { axis + rank as i64 } else { axis };
    if (0..rank as i64).contains(&resolved) {
        Ok(resolved as usize)
    } else {
        Err(invalid(node, kind, key, format!("axis {axis} is out of range for rank {rank}")))
    }
}

/// Reshape a span of the input axes. In `shape`, 0 copies the matching
/// input dimension and -1 takes whatever is left.
pub fn reshape(node: &SourceNode, graph: &IrGraph) -> IrResult<Op> {
    let kind = OpType::Reshape;
    let input = input_shape(node, graph, 0, kind)?;
    let dims: Vec<i64> = node.required(kind, "shape")?;
    let axis = node.optional::<i64>(kind, "axis")?.unwrap_or(0);
    let start = resolve_axis(node, kind, "axis", axis, input.len() + 1)?;
    let end = match node.optional::<i64>(kind, "num_axes")?.unwrap_or(-1) {
        -1 => input.len(),
        n if n >= 0 && start + n as usize <= input.len() => start + n as usize,
        n => {
            let reason = format!("{n} axes from axis {start} do not fit in rank {}", input.len());
            return Err(invalid(node, kind, "num_axes", reason));
        }
    };
    let replaced = &input[start..end];
    let mut shape: Shape = input[..start].iter().copied().collect();
    let mut inferred = None;
    for (ix, &dim) in dims.iter().enumerate() {
        match dim {
            0 => match replaced.get(ix) {
                Some(d) => shape.push(*d),
                None => {
                    return Err(invalid(node, kind, "shape", format!("no input axis to copy at position {ix}")));
                }
            },
            -1 if inferred.is_none() => {
                inferred = Some(shape.len());
                shape.push(1);
            }
            d if d > 0 => shape.push(d as usize),
            d => return Err(invalid(node, kind, "shape", format!("invalid dimension {d}"))),
        }
    }
    shape.extend(input[end..].iter().copied());
    let total: usize = input.iter().product();
    if let Some(ix) = inferred {
        let known: usize = shape.iter().product();
        if known == 0 || total % known != 0 {
            let reason =
                format!("can not infer a dimension of {} from {}", format_shape(&shape), format_shape(input));
            return Err(invalid(node, kind, "shape", reason));
        }
        shape[ix] = total / known;
    }
    if shape.iter().product::<usize>() != total {
        let reason =
            format!("{} does not hold the {total} values of {}", format_shape(&shape), format_shape(input));
        return Err(invalid(node, kind, "shape", reason));
    }
    Ok(Op::new(node.name.clone(), OpKind::Reshape(Reshape { output_shape: shape })))
}

/// Collapse axes `axis..=end_axis` into one.
pub fn flatten(node: &SourceNode, graph: &IrGraph) -> IrResult<Op> {
    let kind = OpType::Reshape;
    let input = input_shape(node, graph, 0, kind)?;
    let axis = node.optional::<i64>(kind, "axis")?.unwrap_or(1);
    let end_axis = node.optional::<i64>(kind, "end_axis")?.unwrap_or(-1);
    let start = resolve_axis(node, kind, "axis", axis, input.len())?;
    let end = resolve_axis(node, kind, "end_axis", end_axis, input.len())?;
    if end < start {
        return Err(invalid(node, kind, "end_axis", format!("axis {end} comes before axis {start}")));
    }
    let output_shape = input[..start]
        .iter()
        .copied()
        .chain(std::iter::once(input[start..=end].iter().product()))
        .chain(input[end + 1..].iter().copied())
        .collect();
    Ok(Op::new(node.name.clone(), OpKind::Reshape(Reshape { output_shape })))
}
