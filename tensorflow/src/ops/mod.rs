use irconv_core::framework::Framework;
use irconv_core::internal::*;
use irconv_core::ops::identity::Noop;
use irconv_core::ops::konst::Constant;
use irconv_core::ops::source::Input;

pub mod array;
pub mod detection;
pub mod math;
pub mod nn;

pub fn register_all_ops(reg: &mut TranslationRegistry) -> IrResult<()> {
    array::register_all_ops(reg)?;
    detection::register_all_ops(reg)?;
    math::register_all_ops(reg)?;
    nn::register_all_ops(reg)?;
    register(reg, konst, DataInputs::All, &["Const"])?;
    register(reg, identity, DataInputs::All, &["Identity", "StopGradient"])?;
    register(reg, placeholder, DataInputs::All, &["Placeholder"])?;
    Ok(())
}

/// Which of the node inputs the IR op reads. The others are constants the
/// builder folds into attributes.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DataInputs {
    All,
    Leading(usize),
}

/// A builder together with the inputs its op keeps.
#[derive(Debug, new)]
pub struct TfTranslation {
    build: OpBuilder,
    inputs: DataInputs,
}

impl Translation for TfTranslation {
    fn extract_parameters(&self, node: &SourceNode, graph: &IrGraph) -> IrResult<Op> {
        (self.build)(node, graph)
    }

    fn extract_input_names(&self, node: &SourceNode, _graph: &IrGraph) -> IrResult<TVec<String>> {
        Ok(match self.inputs {
            DataInputs::All => node.inputs.clone(),
            DataInputs::Leading(n) => node.inputs.iter().take(n).cloned().collect(),
        })
    }
}

pub(crate) fn register(
    reg: &mut TranslationRegistry,
    build: OpBuilder,
    inputs: DataInputs,
    op_types: &[&str],
) -> IrResult<()> {
    reg.register(Framework::Tensorflow, TfTranslation::new(build, inputs), op_types)
}

pub(crate) fn invalid(node: &SourceNode, kind: OpType, attr: &str, reason: impl Into<String>) -> IrError {
    IrError::InvalidAttribute {
        op: node.name.clone(),
        kind,
        attr: attr.to_string(),
        reason: reason.into(),
    }
}

pub(crate) fn input_shape<'g>(
    node: &SourceNode,
    graph: &'g IrGraph,
    ix: usize,
    kind: OpType,
) -> IrResult<&'g Shape> {
    graph.get_output_shape(node.input(ix, kind)?)
}

/// Value of input `ix`, which must be produced by a constant. Reshapes of
/// a constant are looked through: they are only folded once the graph is
/// complete.
pub(crate) fn const_input(node: &SourceNode, graph: &IrGraph, ix: usize, kind: OpType) -> IrResult<Tensor> {
    let name = node.input(ix, kind)?;
    let attr = format!("input #{ix}");
    let not_constant = || invalid(node, kind, &attr, format!("`{name}` is not a constant"));
    let mut producer = graph.producer(name)?;
    let mut reshaped = None;
    while let OpKind::Reshape(r) = producer.kind() {
        reshaped.get_or_insert_with(|| r.output_shape.clone());
        let Some(input) = graph.node_by_name(producer.name())?.inputs.first() else {
            return Err(not_constant());
        };
        producer = graph.producer(input)?;
    }
    let OpKind::Constant(konst) = producer.kind() else {
        return Err(not_constant());
    };
    match reshaped {
        None => Ok(konst.tensor.clone()),
        Some(shape) => {
            konst.tensor.clone().into_shape(&shape).map_err(|e| invalid(node, kind, &attr, e.to_string()))
        }
    }
}

/// Integer values of a constant input.
pub(crate) fn const_ints(node: &SourceNode, graph: &IrGraph, ix: usize, kind: OpType) -> IrResult<Vec<i64>> {
    Ok(const_input(node, graph, ix, kind)?.to_vec().into_iter().map(|v| v as i64).collect())
}

/// The height and width entries of an NHWC attribute like `strides`.
pub(crate) fn nhwc_pair(node: &SourceNode, kind: OpType, key: &str, default: usize) -> IrResult<(usize, usize)> {
    match node.optional::<Vec<usize>>(kind, key)?.as_deref() {
        None => Ok((default, default)),
        Some([_, h, w, _]) => Ok((*h, *w)),
        Some(other) => Err(invalid(node, kind, key, format!("expected 4 values, got {}", other.len()))),
    }
}

/// A scalar constant with a declared shape is materialized to that shape.
pub fn konst(node: &SourceNode, _graph: &IrGraph) -> IrResult<Op> {
    let kind = OpType::Constant;
    let value = match node.optional::<Tensor>(kind, "value")? {
        Some(value) => value,
        None => node.blob(0, kind, "value")?.clone(),
    };
    let shape = node.optional::<Shape>(kind, "shape")?;
    let konst = match shape {
        Some(shape) if value.len() == 1 && value.shape() != shape.as_slice() => {
            Constant::from_scalar(value.to_vec()[0], &shape)
        }
        _ => Constant::new(value),
    };
    Ok(Op::new(node.name.clone(), OpKind::Constant(konst)))
}

pub fn identity(node: &SourceNode, _graph: &IrGraph) -> IrResult<Op> {
    Ok(Op::new(node.name.clone(), OpKind::Noop(Noop {})))
}

/// Unknown dimensions (`-1`, usually the batch) are set to 1.
pub fn placeholder(node: &SourceNode, _graph: &IrGraph) -> IrResult<Op> {
    let kind = OpType::Input;
    let dims: Vec<i64> = node.required(kind, "shape")?;
    if dims.iter().any(|d| *d < 0) {
        debug!("{}: unknown dimensions in {dims:?} set to 1", node.name);
    }
    let input = Input {
        shape: dims.iter().map(|&d| if d < 0 { 1 } else { d as usize }).collect(),
        input_encoding_in: node.optional(kind, "input_encoding_in")?.unwrap_or_else(|| "bgr".to_string()),
        input_encoding_out: node.optional(kind, "input_encoding_out")?.unwrap_or_else(|| "bgr".to_string()),
        input_type: node.optional(kind, "input_type")?.unwrap_or_else(|| "default".to_string()),
    };
    Ok(Op::new(node.name.clone(), OpKind::Input(input)))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub fn graph_with_input(shape: &[usize]) -> IrGraph {
        let mut graph = IrGraph::new(AxisOrder::Tf);
        let x = SourceNode::new("x".to_string(), "Placeholder".to_string()).with_attr("shape", shape.to_vec());
        graph.add(placeholder(&x, &graph).unwrap(), &[], &["x"]).unwrap();
        graph
    }

    pub fn add_const(graph: &mut IrGraph, name: &str, tensor: Tensor) {
        graph.add(Op::new(name, OpKind::Constant(Constant::new(tensor))), &[], &[name]).unwrap();
    }

    #[test]
    fn scalar_const_is_broadcast() {
        let node = SourceNode::new("c".to_string(), "Const".to_string())
            .with_attr("value", 0.5f32)
            .with_attr("shape", vec![2usize, 2]);
        let op = konst(&node, &IrGraph::default()).unwrap();
        let OpKind::Constant(c) = op.kind() else { panic!() };
        assert_eq!(c.tensor.shape(), &[2, 2]);
        assert_eq!(c.tensor.to_vec(), vec![0.5; 4]);
    }

    #[test]
    fn const_from_blob() {
        let node = SourceNode::new("c".to_string(), "Const".to_string()).with_blob(tensor1(&[1.0, 2.0]));
        let op = konst(&node, &IrGraph::default()).unwrap();
        assert_eq!(op.infer_shape(&[], 1, AxisOrder::Tf).unwrap(), tvec!(tvec![2]));
        let empty = SourceNode::new("c".to_string(), "Const".to_string());
        assert!(matches!(konst(&empty, &IrGraph::default()), Err(IrError::MissingAttribute { .. })));
    }

    #[test]
    fn placeholder_with_unknown_batch() {
        let node = SourceNode::new("x".to_string(), "Placeholder".to_string()).with_attr("shape", vec![-1i64, 224, 224, 3]);
        let op = placeholder(&node, &IrGraph::default()).unwrap();
        assert_eq!(op.infer_shape(&[], 1, AxisOrder::Tf).unwrap(), tvec!(tvec![1, 224, 224, 3]));
    }

    #[test]
    fn const_inputs_must_be_constant() {
        let mut graph = graph_with_input(&[2, 3]);
        add_const(&mut graph, "axis", tensor0(1.0));
        let node = SourceNode::new("n".to_string(), "X".to_string()).with_inputs(&["x", "axis"]);
        assert_eq!(const_ints(&node, &graph, 1, OpType::Concat).unwrap(), vec![1]);
        let e = const_input(&node, &graph, 0, OpType::Concat).unwrap_err();
        assert_eq!(e.to_string(), "Op n (concatenation) has an invalid `input #0` attribute: `x` is not a constant");
    }

    #[test]
    fn const_inputs_look_through_reshapes() {
        let mut graph = graph_with_input(&[2, 3]);
        add_const(&mut graph, "w", tensor1(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]));
        let bag = AttrBag::new().with("output_shape", tvec![3usize, 2]);
        graph.add(Op::from_attrs("w/r", OpType::Reshape, &bag).unwrap(), &["w"], &["w/r"]).unwrap();
        let node = SourceNode::new("n".to_string(), "X".to_string()).with_inputs(&["x", "w/r"]);
        let w = const_input(&node, &graph, 1, OpType::FullyConnected).unwrap();
        assert_eq!(w.shape(), &[3, 2]);
        assert_eq!(w.to_vec(), vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    }
}
