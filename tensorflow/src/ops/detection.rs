use super::{const_input, input_shape, invalid};
use irconv_core::framework::Framework;
use irconv_core::internal::*;
use irconv_core::ops::array::Reshape;
use irconv_core::ops::detection::NonMaxSuppression;

pub fn register_all_ops(reg: &mut TranslationRegistry) -> IrResult<()> {
    reg.register(
        Framework::Tensorflow,
        NonMaxSuppressionV2,
        &["NonMaxSuppression", "NonMaxSuppressionV2", "NonMaxSuppressionV3"],
    )
}

/// Boxes `[n, 4]` and scores `[n]` plus constant limits. The unbatched
/// inputs get a leading batch axis through added reshape ops, and the IR
/// op produces boxes, scores and classes as `name`, `name:1` and `name:2`.
#[derive(Debug, Clone, Copy)]
pub struct NonMaxSuppressionV2;

impl NonMaxSuppressionV2 {
    fn scalar(node: &SourceNode, graph: &IrGraph, ix: usize, attr: &str) -> IrResult<Option<f32>> {
        if node.inputs.len() <= ix {
            return Ok(None);
        }
        match const_input(node, graph, ix, OpType::NonMaxSuppression)?.to_vec().as_slice() {
            [v] => Ok(Some(*v)),
            other => {
                Err(invalid(node, OpType::NonMaxSuppression, attr, format!("expected a scalar, got {other:?}")))
            }
        }
    }

    /// Reshape `input` to `[1, ..shape]` unless it already is batched.
    fn batched(node: &SourceNode, graph: &mut IrGraph, ix: usize, rank: usize, suffix: &str) -> IrResult<String> {
        let kind = OpType::NonMaxSuppression;
        let input = node.input(ix, kind)?.to_string();
        let shape = input_shape(node, graph, ix, kind)?;
        if shape.len() == rank + 1 {
            return Ok(input);
        }
        if shape.len() != rank {
            let reason = format!("unexpected shape {}", format_shape(shape));
            return Err(invalid(node, kind, &format!("input #{ix}"), reason));
        }
        let mut output_shape = tvec![1];
        output_shape.extend(shape.iter().copied());
        let name = format!("{}_{suffix}", node.name);
        let reshape = Op::new(name.clone(), OpKind::Reshape(Reshape { output_shape }));
        graph.add(reshape, &[&input], &[&name])?;
        trace!("batched {input} of {} as {name}", node.name);
        Ok(name)
    }
}

impl Translation for NonMaxSuppressionV2 {
    fn extract_parameters(&self, node: &SourceNode, graph: &IrGraph) -> IrResult<Op> {
        let kind = OpType::NonMaxSuppression;
        let max = Self::scalar(node, graph, 2, "max_output_size")?.ok_or_else(|| IrError::MissingAttribute {
            op: node.name.clone(),
            kind,
            attr: "max_output_size".to_string(),
        })?;
        if max < 1.0 {
            return Err(invalid(node, kind, "max_output_size", format!("{max} is not a positive count")));
        }
        let nms = NonMaxSuppression {
            max_total_detections: max as usize,
            max_detections_per_class: max as usize,
            iou_threshold: Self::scalar(node, graph, 3, "iou_threshold")?
                .or(node.optional(kind, "iou_threshold")?)
                .unwrap_or(0.5),
            score_threshold: Self::scalar(node, graph, 4, "score_threshold")?.unwrap_or(f32::NEG_INFINITY),
        };
        Ok(Op::new(node.name.clone(), OpKind::NonMaxSuppression(nms)))
    }

    fn extract_output_names(&self, node: &SourceNode, _graph: &IrGraph) -> IrResult<TVec<String>> {
        Ok(tvec!(node.name.clone(), format!("{}:1", node.name), format!("{}:2", node.name)))
    }

    fn add_op(&self, node: &SourceNode, graph: &mut IrGraph) -> IrResult<()> {
        let op = self.extract_parameters(node, graph)?;
        let boxes = Self::batched(node, graph, 0, 2, "boxes")?;
        let scores = Self::batched(node, graph, 1, 1, "scores")?;
        let outputs = self.extract_output_names(node, graph)?;
        let outputs: TVec<&str> = outputs.iter().map(|s| s.as_str()).collect();
        graph.add(op, &[&boxes, &scores], &outputs)?;
        Ok(())
    }
}
