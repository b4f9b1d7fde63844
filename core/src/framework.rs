//! Translation of source framework nodes into IR ops.
//!
//! A [`TranslationRegistry`] maps `(framework, op type)` keys to
//! [`Translation`] handlers. It is built once when a converter starts and
//! handed by reference to whatever translates nodes.
use crate::internal::*;
use crate::model::IrGraph;
use crate::ops::identity::Noop;
use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::Arc;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Framework {
    Caffe,
    Tensorflow,
    /// Node lists already expressed with IR op types and attributes.
    Ir,
}

impl Framework {
    pub fn as_str(&self) -> &'static str {
        match self {
            Framework::Caffe => "caffe",
            Framework::Tensorflow => "tensorflow",
            Framework::Ir => "ir",
        }
    }
}

impl fmt::Display for Framework {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Framework {
    type Err = String;
    fn from_str(s: &str) -> Result<Framework, String> {
        match &*s.to_lowercase() {
            "caffe" => Ok(Framework::Caffe),
            "tf" | "tensorflow" => Ok(Framework::Tensorflow),
            "ir" => Ok(Framework::Ir),
            _ => Err(format!("Unknown framework `{s}` (expected caffe, tf or ir)")),
        }
    }
}

/// A framework node in neutral form, as handed over by a model parser.
///
/// Weights are already materialized in `blobs`.
#[derive(Clone, Debug, Default, PartialEq, new)]
pub struct SourceNode {
    pub name: String,
    pub op_type: String,
    #[new(default)]
    pub inputs: TVec<String>,
    #[new(default)]
    pub outputs: TVec<String>,
    #[new(default)]
    pub attrs: AttrBag,
    #[new(default)]
    pub blobs: Vec<Tensor>,
}

impl SourceNode {
    pub fn with_inputs(mut self, inputs: &[&str]) -> SourceNode {
        self.inputs = inputs.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_outputs(mut self, outputs: &[&str]) -> SourceNode {
        self.outputs = outputs.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_attr(mut self, key: &str, value: impl Into<AttrValue>) -> SourceNode {
        self.attrs.insert(key, value);
        self
    }

    pub fn with_blob(mut self, blob: Tensor) -> SourceNode {
        self.blobs.push(blob);
        self
    }

    /// Weight blob `ix`, failing with a missing attribute on behalf of
    /// `op_type` when the node does not carry it.
    pub fn blob(&self, ix: usize, op_type: OpType, what: &str) -> IrResult<&Tensor> {
        self.blobs.get(ix).ok_or_else(|| IrError::MissingAttribute {
            op: self.name.clone(),
            kind: op_type,
            attr: what.to_string(),
        })
    }

    /// Attribute `key`, reported on behalf of `kind` when missing or ill-typed.
    pub fn required<T: FromAttr>(&self, kind: OpType, key: &str) -> IrResult<T> {
        self.attrs.required(&self.name, kind, key)
    }

    pub fn optional<T: FromAttr>(&self, kind: OpType, key: &str) -> IrResult<Option<T>> {
        self.attrs.optional(&self.name, kind, key)
    }

    /// Name of input `ix`.
    pub fn input(&self, ix: usize, kind: OpType) -> IrResult<&str> {
        self.inputs.get(ix).map(|s| s.as_str()).ok_or_else(|| IrError::MissingAttribute {
            op: self.name.clone(),
            kind,
            attr: format!("input #{ix}"),
        })
    }
}

/// Turns one kind of source node into IR ops.
pub trait Translation: fmt::Debug + Send + Sync {
    /// The IR op for `node`, with its attributes extracted.
    fn extract_parameters(&self, node: &SourceNode, graph: &IrGraph) -> IrResult<Op>;

    fn extract_input_names(&self, node: &SourceNode, _graph: &IrGraph) -> IrResult<TVec<String>> {
        Ok(node.inputs.clone())
    }

    /// Output buffer names. A node that declares none produces one buffer
    /// named after itself.
    fn extract_output_names(&self, node: &SourceNode, _graph: &IrGraph) -> IrResult<TVec<String>> {
        if node.outputs.is_empty() { Ok(tvec!(node.name.clone())) } else { Ok(node.outputs.clone()) }
    }

    fn add_op(&self, node: &SourceNode, graph: &mut IrGraph) -> IrResult<()> {
        let op = self.extract_parameters(node, graph)?;
        let inputs = self.extract_input_names(node, graph)?;
        let outputs = self.extract_output_names(node, graph)?;
        let inputs: TVec<&str> = inputs.iter().map(|s| s.as_str()).collect();
        let outputs: TVec<&str> = outputs.iter().map(|s| s.as_str()).collect();
        graph.add(op, &inputs, &outputs)?;
        Ok(())
    }
}

/// A translation that only needs to build the op. Inputs and outputs are
/// taken from the node as they are.
pub type OpBuilder = fn(&SourceNode, &IrGraph) -> IrResult<Op>;

impl Translation for OpBuilder {
    fn extract_parameters(&self, node: &SourceNode, graph: &IrGraph) -> IrResult<Op> {
        (self)(node, graph)
    }
}

/// What to do with source nodes no translation is registered for.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum UnsupportedPolicy {
    /// Fail the conversion.
    #[default]
    Abort,
    /// Replace the node with a `noop` passing its inputs through.
    Passthrough,
}

#[derive(Clone, Debug, Default)]
pub struct TranslationRegistry {
    translations: BTreeMap<(Framework, String), Arc<dyn Translation>>,
    policy: UnsupportedPolicy,
}

fn normalize(op_type: &str) -> String {
    op_type.to_lowercase()
}

impl TranslationRegistry {
    pub fn new() -> TranslationRegistry {
        TranslationRegistry::default()
    }

    pub fn with_policy(self, policy: UnsupportedPolicy) -> TranslationRegistry {
        TranslationRegistry { policy, ..self }
    }

    pub fn policy(&self) -> UnsupportedPolicy {
        self.policy
    }

    /// Bind one translation to every op type of `op_types`.
    ///
    /// Nothing is registered if any of the keys is already taken.
    pub fn register(
        &mut self,
        framework: Framework,
        translation: impl Translation + 'static,
        op_types: &[&str],
    ) -> IrResult<()> {
        let keys: Vec<(Framework, String)> = op_types.iter().map(|t| (framework, normalize(t))).collect();
        if let Some((_, op_type)) = keys.iter().find(|k| self.translations.contains_key(*k)) {
            return Err(IrError::DuplicateRegistration { framework, op_type: op_type.clone() });
        }
        if let Some((_, op_type)) = keys.iter().duplicates().next() {
            return Err(IrError::DuplicateRegistration { framework, op_type: op_type.clone() });
        }
        let translation: Arc<dyn Translation> = Arc::new(translation);
        for key in keys {
            trace!("registered {} translation for `{}`", key.0, key.1);
            self.translations.insert(key, translation.clone());
        }
        Ok(())
    }

    pub fn register_fn(&mut self, framework: Framework, builder: OpBuilder, op_types: &[&str]) -> IrResult<()> {
        self.register(framework, builder, op_types)
    }

    pub fn lookup(&self, framework: Framework, op_type: &str) -> IrResult<&dyn Translation> {
        self.translations
            .get(&(framework, normalize(op_type)))
            .map(|t| &**t)
            .ok_or_else(|| IrError::UnsupportedOperator {
                framework,
                op_type: op_type.to_string(),
                node: None,
            })
    }

    pub fn contains(&self, framework: Framework, op_type: &str) -> bool {
        self.translations.contains_key(&(framework, normalize(op_type)))
    }

    /// Registered keys, sorted.
    pub fn keys(&self) -> impl Iterator<Item = (Framework, &str)> {
        self.translations.keys().map(|(f, t)| (*f, t.as_str()))
    }

    /// Translate a single node into `graph`, applying the unsupported op
    /// policy.
    pub fn translate(&self, framework: Framework, node: &SourceNode, graph: &mut IrGraph) -> IrResult<()> {
        match self.lookup(framework, &node.op_type) {
            Ok(translation) => translation.add_op(node, graph),
            Err(IrError::UnsupportedOperator { framework, op_type, .. }) => match self.policy {
                UnsupportedPolicy::Abort => {
                    Err(IrError::UnsupportedOperator { framework, op_type, node: Some(node.name.clone()) })
                }
                UnsupportedPolicy::Passthrough => {
                    warn!("{}: unsupported {framework} operator `{op_type}`, passing inputs through", node.name);
                    Passthrough.add_op(node, graph)
                }
            },
            Err(e) => Err(e),
        }
    }

    /// Translate nodes in order. Stops at the first failure.
    pub fn translate_all(&self, framework: Framework, nodes: &[SourceNode], graph: &mut IrGraph) -> IrResult<()> {
        for node in nodes {
            self.translate(framework, node, graph)?;
        }
        info!("translated {} {framework} node(s) into {} IR op(s)", nodes.len(), graph.len());
        Ok(())
    }
}

#[derive(Debug)]
struct Passthrough;

impl Translation for Passthrough {
    fn extract_parameters(&self, node: &SourceNode, _graph: &IrGraph) -> IrResult<Op> {
        Ok(Op::new(node.name.clone(), OpKind::Noop(Noop {})))
    }
}

/// Builds any catalogue op from a node whose type is an IR key and whose
/// attributes are the IR attributes. A `constant` without a `tensor`
/// attribute takes its first blob.
#[derive(Debug)]
struct IrTranslation(OpType);

impl Translation for IrTranslation {
    fn extract_parameters(&self, node: &SourceNode, _graph: &IrGraph) -> IrResult<Op> {
        if self.0 == OpType::Constant && !node.attrs.contains("tensor") {
            let tensor = node.blob(0, self.0, "tensor")?.clone();
            let attrs = node.attrs.clone().with("tensor", tensor);
            return Op::from_attrs(node.name.clone(), self.0, &attrs);
        }
        Op::from_attrs(node.name.clone(), self.0, &node.attrs)
    }
}

/// Register the IR-native translation of every catalogue kind.
pub fn register_ir_translations(registry: &mut TranslationRegistry) -> IrResult<()> {
    for op_type in OpType::ALL {
        registry.register(Framework::Ir, IrTranslation(*op_type), &[op_type.as_str()])?;
    }
    Ok(())
}

/// A registry holding the IR-native translations only.
pub fn ir_translations() -> IrResult<TranslationRegistry> {
    let mut registry = TranslationRegistry::new();
    register_ir_translations(&mut registry)?;
    Ok(registry)
}
