//! JSON node lists.
//!
//! A model is an array of nodes, in topological order:
//!
//! ```json
//! [
//!   { "name": "data", "type": "Input", "outputs": ["data"], "attrs": { "shape": [1, 3, 224, 224] } },
//!   { "name": "conv1", "type": "Convolution", "inputs": ["data"], "outputs": ["conv1"],
//!     "attrs": { "num_output": 64, "kernel_size": 7, "stride": 2, "pad": 3 },
//!     "blobs": [ { "shape": [64, 3, 7, 7], "fill": 0.0 }, { "shape": [64], "fill": 0.0 } ] }
//! ]
//! ```
//!
//! Attribute objects with a `shape` and either `data` or `fill` are tensors,
//! other objects are maps.
use anyhow::{Context, Result, bail};
use irconv_core::prelude::*;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct JsonNode {
    name: String,
    #[serde(rename = "type")]
    op_type: String,
    #[serde(default)]
    inputs: Vec<String>,
    #[serde(default)]
    outputs: Vec<String>,
    #[serde(default)]
    attrs: BTreeMap<String, Value>,
    #[serde(default)]
    blobs: Vec<JsonTensor>,
}

#[derive(Debug, Deserialize)]
struct JsonTensor {
    shape: Vec<usize>,
    #[serde(default)]
    data: Option<Vec<f32>>,
    #[serde(default)]
    fill: Option<f32>,
}

impl JsonTensor {
    fn into_tensor(self) -> Result<Tensor> {
        match (self.data, self.fill) {
            (Some(data), None) => Tensor::from_shape_vec(&self.shape, data)
                .with_context(|| format!("Tensor data does not fit shape {:?}", self.shape)),
            (None, Some(fill)) => Ok(Tensor::filled(&self.shape, fill)),
            (None, None) => Ok(Tensor::zeros(&self.shape)),
            (Some(_), Some(_)) => bail!("A tensor has either `data` or `fill`, not both"),
        }
    }
}

fn is_tensor(object: &serde_json::Map<String, Value>) -> bool {
    object.contains_key("shape") && (object.contains_key("data") || object.contains_key("fill"))
}

pub fn attr_value(value: Value) -> Result<AttrValue> {
    Ok(match value {
        Value::Null => AttrValue::None,
        Value::Bool(b) => AttrValue::Bool(b),
        Value::Number(n) => match n.as_i64() {
            Some(i) => AttrValue::Int(i),
            None => AttrValue::Float(n.as_f64().context("Number out of range")? as f32),
        },
        Value::String(s) => AttrValue::Str(s),
        Value::Array(items) => AttrValue::List(items.into_iter().map(attr_value).collect::<Result<_>>()?),
        Value::Object(object) if is_tensor(&object) => {
            let tensor: JsonTensor = serde_json::from_value(Value::Object(object))?;
            AttrValue::Tensor(tensor.into_tensor()?)
        }
        Value::Object(object) => AttrValue::Map(
            object.into_iter().map(|(k, v)| attr_value(v).map(|v| (k, v))).collect::<Result<_>>()?,
        ),
    })
}

fn source_node(node: JsonNode) -> Result<SourceNode> {
    let mut source = SourceNode::new(node.name, node.op_type);
    source.inputs = node.inputs.into_iter().collect();
    source.outputs = node.outputs.into_iter().collect();
    for (key, value) in node.attrs {
        let value = attr_value(value).with_context(|| format!("Attribute `{key}` of {}", source.name))?;
        source.attrs.insert(key, value);
    }
    source.blobs = node.blobs.into_iter().map(JsonTensor::into_tensor).collect::<Result<_>>()?;
    Ok(source)
}

pub fn parse_nodes(text: &str) -> Result<Vec<SourceNode>> {
    let nodes: Vec<JsonNode> = serde_json::from_str(text).context("Parsing JSON node list")?;
    nodes.into_iter().map(source_node).collect()
}

pub fn load_nodes(path: &Path) -> Result<Vec<SourceNode>> {
    let text = fs_err::read_to_string(path)?;
    parse_nodes(&text).with_context(|| format!("Loading {path:?}"))
}
