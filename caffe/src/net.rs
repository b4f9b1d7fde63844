//! Whole-net translation.
use irconv_core::framework::Framework;
use irconv_core::prelude::*;
use std::collections::{HashMap, HashSet};

/// Give every top a buffer name of its own.
///
/// Caffe lets a layer write a top that already exists, most often in place
/// (`ReLU` with `bottom == top`). The IR graph wants each buffer produced
/// once, so a rewritten top is renamed after its layer and later bottoms
/// read the renamed buffer.
pub fn rename_in_place_tops(layers: &[SourceNode]) -> Vec<SourceNode> {
    let mut latest: HashMap<String, String> = HashMap::new();
    let mut produced: HashSet<String> = HashSet::new();
    let mut renamed = Vec::with_capacity(layers.len());
    for layer in layers {
        let mut layer = layer.clone();
        for input in layer.inputs.iter_mut() {
            if let Some(current) = latest.get(input.as_str()) {
                *input = current.clone();
            }
        }
        let tops = if layer.outputs.is_empty() { tvec!(layer.name.clone()) } else { layer.outputs.clone() };
        let mut outputs = TVec::new();
        for top in tops {
            let buffer = if produced.contains(&top) {
                let mut candidate = layer.name.clone();
                let mut suffix = 1;
                while produced.contains(&candidate) {
                    candidate = format!("{}_{suffix}", layer.name);
                    suffix += 1;
                }
                debug!("{}: top `{top}` is rewritten, renamed to `{candidate}`", layer.name);
                candidate
            } else {
                top.clone()
            };
            produced.insert(buffer.clone());
            latest.insert(top, buffer.clone());
            outputs.push(buffer);
        }
        layer.outputs = outputs;
        renamed.push(layer);
    }
    renamed
}

/// Translate a list of Caffe layers, in prototxt order, into `graph`.
pub fn translate_net(registry: &TranslationRegistry, layers: &[SourceNode], graph: &mut IrGraph) -> IrResult<()> {
    let layers = rename_in_place_tops(layers);
    registry.translate_all(Framework::Caffe, &layers, graph)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layer(name: &str, inputs: &[&str], outputs: &[&str]) -> SourceNode {
        SourceNode::new(name.to_string(), "X".to_string()).with_inputs(inputs).with_outputs(outputs)
    }

    #[test]
    fn in_place_relu_is_renamed() {
        crate::setup_test_logger();
        let layers = vec![
            layer("conv1", &["data"], &["conv1"]),
            layer("relu1", &["conv1"], &["conv1"]),
            layer("pool1", &["conv1"], &["pool1"]),
        ];
        let renamed = rename_in_place_tops(&layers);
        assert_eq!(renamed[1].inputs.as_slice(), &["conv1".to_string()]);
        assert_eq!(renamed[1].outputs.as_slice(), &["relu1".to_string()]);
        assert_eq!(renamed[2].inputs.as_slice(), &["relu1".to_string()]);
    }

    #[test]
    fn chained_rewrites_stay_unique() {
        let layers = vec![
            layer("x", &[], &["x"]),
            layer("x", &["x"], &["x"]),
            layer("x", &["x"], &["x"]),
            layer("y", &["x"], &["y"]),
        ];
        let renamed = rename_in_place_tops(&layers);
        let outputs: Vec<&str> = renamed.iter().map(|l| l.outputs[0].as_str()).collect();
        assert_eq!(outputs, vec!["x", "x_1", "x_2", "y"]);
        assert_eq!(renamed[3].inputs.as_slice(), &["x_2".to_string()]);
    }
}
