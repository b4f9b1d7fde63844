use super::{Buffer, Node};
use crate::internal::*;

/// The IR graph: ops in insertion order, and the buffers connecting them.
///
/// Builders must add producers before consumers. Shapes are inferred as ops
/// are added, so an op can only be added once all of its inputs are known.
/// Merged-away ops and buffers stay reachable through their old names.
#[derive(Clone, Debug, Default)]
pub struct IrGraph {
    axis_order: AxisOrder,
    nodes: Vec<Node>,
    node_ids: HashMap<String, usize>,
    buffers: HashMap<String, Buffer>,
    op_aliases: HashMap<String, String>,
    buffer_aliases: HashMap<String, String>,
}

impl IrGraph {
    pub fn new(axis_order: AxisOrder) -> IrGraph {
        IrGraph { axis_order, ..IrGraph::default() }
    }

    pub fn axis_order(&self) -> AxisOrder {
        self.axis_order
    }

    /// Append `op`, reading the `inputs` buffers and producing the
    /// `outputs` buffers. Infers the output shapes right away.
    ///
    /// Returns the position of the op in the graph.
    pub fn add(&mut self, op: Op, inputs: &[&str], outputs: &[&str]) -> IrResult<usize> {
        if self.node_ids.contains_key(op.name()) || self.op_aliases.contains_key(op.name()) {
            return Err(IrError::DuplicateName(op.name().to_string()));
        }
        if let Some(dup) = outputs
            .iter()
            .find(|o| self.buffers.contains_key(**o) || self.buffer_aliases.contains_key(**o))
        {
            return Err(IrError::DuplicateName(dup.to_string()));
        }
        if let Some(dup) = outputs.iter().duplicates().next() {
            return Err(IrError::DuplicateName(dup.to_string()));
        }
        let inputs: TVec<String> =
            inputs.iter().map(|i| self.resolve_buffer(i).map(str::to_string)).collect::<IrResult<_>>()?;
        let shapes = self.infer_node(&op, &inputs, outputs.len())?;
        debug!(
            "{op}: {} -> {}",
            inputs.iter().map(|i| format_shape(&self.buffers[i].shape)).join(", "),
            shapes.iter().map(|s| format_shape(s)).join(", ")
        );
        for input in &inputs {
            if let Some(buffer) = self.buffers.get_mut(input) {
                buffer.add_consumer(op.name());
            }
        }
        for (name, shape) in outputs.iter().zip(shapes) {
            let mut buffer = Buffer::new(name.to_string(), shape, op.name().to_string());
            op.populate_axis_format(&mut buffer, self.axis_order);
            self.buffers.insert(name.to_string(), buffer);
        }
        let id = self.nodes.len();
        self.node_ids.insert(op.name().to_string(), id);
        self.nodes.push(Node { op, inputs, outputs: outputs.iter().map(|o| o.to_string()).collect() });
        Ok(id)
    }

    fn infer_node(&self, op: &Op, inputs: &[String], num_outputs: usize) -> IrResult<TVec<Shape>> {
        let input_shapes: TVec<Shape> = inputs
            .iter()
            .map(|i| self.buffer(i).map(|b| b.shape.clone()))
            .collect::<IrResult<_>>()?;
        let shapes = op.infer_shape(&input_shapes, num_outputs, self.axis_order)?;
        if shapes.len() != num_outputs {
            return Err(IrError::shape(
                op.name(),
                op.op_type(),
                ShapeError(format!(
                    "inferred {} output shape(s) for {} declared output(s)",
                    shapes.len(),
                    num_outputs
                )),
            ));
        }
        Ok(shapes)
    }

    fn resolve<'a>(aliases: &'a HashMap<String, String>, mut name: &'a str) -> &'a str {
        while let Some(target) = aliases.get(name) {
            name = target.as_str();
        }
        name
    }

    fn resolve_buffer<'a>(&'a self, name: &'a str) -> IrResult<&'a str> {
        let name = Self::resolve(&self.buffer_aliases, name);
        if self.buffers.contains_key(name) { Ok(name) } else { Err(IrError::UnknownName(name.to_string())) }
    }

    fn node_id(&self, name: &str) -> IrResult<usize> {
        let name = Self::resolve(&self.op_aliases, name);
        self.node_ids.get(name).copied().ok_or_else(|| IrError::UnknownName(name.to_string()))
    }

    /// Shape of a buffer. When `name` is not a buffer but an op, the shape of
    /// that op's first output.
    pub fn get_output_shape(&self, name: &str) -> IrResult<&Shape> {
        if let Ok(buffer) = self.buffer(name) {
            return Ok(&buffer.shape);
        }
        let node = &self.nodes[self.node_id(name)?];
        let Some(first) = node.outputs.first() else {
            return Err(IrError::shape(
                node.name(),
                node.op.op_type(),
                ShapeError("op has no outputs".to_string()),
            ));
        };
        Ok(&self.buffer(first)?.shape)
    }

    pub fn op_by_name(&self, name: &str) -> IrResult<&Op> {
        Ok(&self.nodes[self.node_id(name)?].op)
    }

    pub fn node_by_name(&self, name: &str) -> IrResult<&Node> {
        Ok(&self.nodes[self.node_id(name)?])
    }

    pub fn buffer(&self, name: &str) -> IrResult<&Buffer> {
        let name = self.resolve_buffer(name)?;
        self.buffers.get(name).ok_or_else(|| IrError::UnknownName(name.to_string()))
    }

    pub fn contains_buffer(&self, name: &str) -> bool {
        self.resolve_buffer(name).is_ok()
    }

    /// The op producing a buffer.
    pub fn producer(&self, buffer: &str) -> IrResult<&Op> {
        let producer = &self.buffer(buffer)?.producer;
        self.op_by_name(producer)
    }

    /// The ops reading a buffer, in insertion order.
    pub fn consumers(&self, buffer: &str) -> IrResult<Vec<&Op>> {
        self.buffer(buffer)?.consumers.iter().map(|c| self.op_by_name(c)).collect()
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn ops(&self) -> impl Iterator<Item = &Op> {
        self.nodes.iter().map(|n| &n.op)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Buffers produced by graph inputs.
    pub fn input_names(&self) -> Vec<&str> {
        self.nodes
            .iter()
            .filter(|n| n.op.op_type() == OpType::Input)
            .flat_map(|n| n.outputs.iter().map(|o| o.as_str()))
            .collect()
    }

    /// Buffers nothing consumes.
    pub fn output_names(&self) -> Vec<&str> {
        self.nodes
            .iter()
            .flat_map(|n| n.outputs.iter())
            .filter(|o| self.buffers.get(o.as_str()).is_some_and(|b| b.consumers.is_empty()))
            .map(|o| o.as_str())
            .collect()
    }

    /// Re-run shape inference over the whole graph, in insertion order.
    pub fn propagate_shapes(&mut self) -> IrResult<()> {
        for ix in 0..self.nodes.len() {
            let node = &self.nodes[ix];
            let shapes = self.infer_node(&node.op, &node.inputs, node.outputs.len())?;
            let node = &self.nodes[ix];
            for (name, shape) in node.outputs.iter().zip(shapes) {
                if let Some(buffer) = self.buffers.get_mut(name) {
                    if buffer.shape != shape {
                        trace!("{}: {} -> {}", name, format_shape(&buffer.shape), format_shape(&shape));
                    }
                    buffer.shape = shape;
                    node.op.populate_axis_format(buffer, self.axis_order);
                }
            }
        }
        Ok(())
    }

    /// Collapse `absorbed` into `survivor`.
    ///
    /// `patch` sees the absorbed op and may rewrite the survivor's
    /// attributes. Afterwards the absorbed op is gone: its name resolves to
    /// the survivor, each of its output buffers resolves to the survivor's
    /// output at the same position, and its consumers read from there.
    /// Shapes are then propagated again. If anything fails, the graph is
    /// left as it was.
    ///
    /// Both ops must have the same number of outputs, the survivor must not
    /// read the absorbed outputs, and it must come before every consumer of
    /// the absorbed outputs.
    pub fn merge<F>(&mut self, absorbed: &str, survivor: &str, patch: F) -> IrResult<()>
    where
        F: FnOnce(&Op, &mut Op) -> IrResult<()>,
    {
        let absorbed_id = self.node_id(absorbed)?;
        let survivor_id = self.node_id(survivor)?;
        let invalid = |reason: &str| IrError::InvalidMerge {
            absorbed: absorbed.to_string(),
            survivor: survivor.to_string(),
            reason: reason.to_string(),
        };
        if absorbed_id == survivor_id {
            return Err(invalid("an op can not absorb itself"));
        }
        let (absorbed_node, survivor_node) = (&self.nodes[absorbed_id], &self.nodes[survivor_id]);
        if absorbed_node.outputs.len() != survivor_node.outputs.len() {
            return Err(invalid("output counts differ"));
        }
        if survivor_node.inputs.iter().any(|i| absorbed_node.outputs.contains(i)) {
            return Err(invalid("the survivor reads the absorbed outputs"));
        }
        for output in &absorbed_node.outputs {
            for consumer in &self.buffers[output].consumers {
                if self.node_ids.get(consumer).is_some_and(|&c| c < survivor_id) {
                    return Err(invalid("a consumer of the absorbed outputs precedes the survivor"));
                }
            }
        }

        let mut survivor_op = survivor_node.op.clone();
        patch(&absorbed_node.op, &mut survivor_op)?;

        let snapshot = self.clone();
        let absorbed_node = self.nodes.remove(absorbed_id);
        let survivor_id = if absorbed_id < survivor_id { survivor_id - 1 } else { survivor_id };
        self.nodes[survivor_id].op = survivor_op;
        let survivor_name = self.nodes[survivor_id].name().to_string();
        let survivor_outputs = self.nodes[survivor_id].outputs.clone();

        for input in &absorbed_node.inputs {
            if let Some(buffer) = self.buffers.get_mut(input) {
                buffer.remove_consumer(absorbed_node.name());
            }
        }
        for (gone, kept) in absorbed_node.outputs.iter().zip(survivor_outputs.iter()) {
            let Some(gone_buffer) = self.buffers.remove(gone) else { continue };
            for consumer in &gone_buffer.consumers {
                if let Some(node) = self.nodes.iter_mut().find(|n| n.name() == consumer.as_str()) {
                    for input in node.inputs.iter_mut().filter(|i| i.as_str() == gone.as_str()) {
                        *input = kept.clone();
                    }
                }
                if let Some(kept_buffer) = self.buffers.get_mut(kept) {
                    kept_buffer.add_consumer(consumer);
                }
            }
            self.buffer_aliases.insert(gone.clone(), kept.clone());
        }
        self.op_aliases.insert(absorbed_node.name().to_string(), survivor_name.clone());
        self.node_ids = self.nodes.iter().enumerate().map(|(ix, n)| (n.name().to_string(), ix)).collect();
        if let Err(e) = self.propagate_shapes() {
            *self = snapshot;
            return Err(e);
        }
        trace!("merged {} into {}", absorbed_node.op, survivor_name);
        Ok(())
    }

    /// Remove the constants nothing reads, typically the ones a translation
    /// folded into attributes. Returns how many were removed.
    pub fn prune_unused_constants(&mut self) -> usize {
        let unused = |node: &Node, buffers: &HashMap<String, Buffer>| {
            node.op.op_type() == OpType::Constant
                && node.outputs.iter().all(|o| buffers.get(o).is_none_or(|b| b.consumers.is_empty()))
        };
        let (pruned, kept): (Vec<Node>, Vec<Node>) =
            std::mem::take(&mut self.nodes).into_iter().partition(|n| unused(n, &self.buffers));
        self.nodes = kept;
        for node in &pruned {
            trace!("pruned unused {}", node.op);
            for output in &node.outputs {
                self.buffers.remove(output);
            }
        }
        self.node_ids = self.nodes.iter().enumerate().map(|(ix, n)| (n.name().to_string(), ix)).collect();
        let dangling_ops: Vec<String> = self
            .op_aliases
            .keys()
            .filter(|alias| !self.node_ids.contains_key(Self::resolve(&self.op_aliases, alias.as_str())))
            .cloned()
            .collect();
        let dangling_buffers: Vec<String> = self
            .buffer_aliases
            .keys()
            .filter(|alias| !self.buffers.contains_key(Self::resolve(&self.buffer_aliases, alias.as_str())))
            .cloned()
            .collect();
        for alias in &dangling_ops {
            self.op_aliases.remove(alias);
        }
        for alias in &dangling_buffers {
            self.buffer_aliases.remove(alias);
        }
        pruned.len()
    }
}

impl fmt::Display for IrGraph {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for node in &self.nodes {
            writeln!(f, "{node}")?;
            for output in &node.outputs {
                if let Some(buffer) = self.buffers.get(output) {
                    writeln!(f, "  {buffer}")?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::konst::Constant;
    use crate::setup_test_logger;

    fn input(graph: &mut IrGraph, name: &str, shape: Shape) {
        let bag = AttrBag::new()
            .with("shape", shape)
            .with("input_encoding_in", "bgr")
            .with("input_encoding_out", "bgr")
            .with("input_type", "default");
        graph.add(Op::from_attrs(name, OpType::Input, &bag).unwrap(), &[], &[name]).unwrap();
    }

    fn constant(graph: &mut IrGraph, name: &str, tensor: Tensor) {
        graph.add(Op::new(name, OpKind::Constant(Constant::new(tensor))), &[], &[name]).unwrap();
    }

    fn reshape_op(name: &str, shape: Shape) -> Op {
        Op::from_attrs(name, OpType::Reshape, &AttrBag::new().with("output_shape", shape)).unwrap()
    }

    #[test]
    fn shapes_flow_through() {
        setup_test_logger();
        let mut graph = IrGraph::new(AxisOrder::Tf);
        input(&mut graph, "a", tvec![2, 3, 4]);
        input(&mut graph, "b", tvec![2, 5, 4]);
        let concat = Op::from_attrs("cat", OpType::Concat, &AttrBag::new().with("axis", 1i64)).unwrap();
        graph.add(concat, &["a", "b"], &["cat"]).unwrap();
        assert_eq!(graph.get_output_shape("cat").unwrap().as_slice(), &[2, 8, 4]);
        assert_eq!(graph.buffer("cat").unwrap().axis_format, AxisFormat::Btf);
        assert_eq!(graph.producer("cat").unwrap().name(), "cat");
        assert_eq!(graph.consumers("a").unwrap()[0].name(), "cat");
        assert_eq!(graph.input_names(), vec!["a", "b"]);
        assert_eq!(graph.output_names(), vec!["cat"]);
    }

    #[test]
    fn names_are_unique() {
        let mut graph = IrGraph::new(AxisOrder::Tf);
        input(&mut graph, "a", tvec![2]);
        let noop = Op::from_attrs("a", OpType::Noop, &AttrBag::new()).unwrap();
        assert!(matches!(graph.add(noop, &["a"], &["b"]), Err(IrError::DuplicateName(_))));
        let noop = Op::from_attrs("n", OpType::Noop, &AttrBag::new()).unwrap();
        assert!(matches!(graph.add(noop, &["a"], &["a"]), Err(IrError::DuplicateName(_))));
    }

    #[test]
    fn unknown_inputs() {
        let mut graph = IrGraph::new(AxisOrder::Tf);
        let noop = Op::from_attrs("n", OpType::Noop, &AttrBag::new()).unwrap();
        assert!(matches!(graph.add(noop, &["nowhere"], &["n"]), Err(IrError::UnknownName(_))));
        assert!(graph.is_empty());
    }

    #[test]
    fn output_count_must_match() {
        let mut graph = IrGraph::new(AxisOrder::Tf);
        input(&mut graph, "a", tvec![2, 3]);
        let softmax = Op::from_attrs("s", OpType::Softmax, &AttrBag::new()).unwrap();
        let e = graph.add(softmax, &["a"], &["s", "extra"]).unwrap_err();
        assert!(e.is_shape_error());
        assert_eq!(e.op_name(), Some("s"));
    }

    #[test]
    fn constant_layout_is_any() {
        let mut graph = IrGraph::new(AxisOrder::Caffe);
        constant(&mut graph, "w", Tensor::zeros(&[1, 3, 2, 2]));
        assert_eq!(graph.buffer("w").unwrap().axis_format, AxisFormat::Any);
    }

    #[test]
    fn merge_reshape_into_constant() {
        let mut graph = IrGraph::new(AxisOrder::Tf);
        constant(&mut graph, "k", Tensor::zeros(&[6]));
        graph.add(reshape_op("r", tvec![2, 3]), &["k"], &["r"]).unwrap();
        input(&mut graph, "x", tvec![2, 3]);
        let sub = Op::from_attrs("sub", OpType::ElementwiseBinarySub, &AttrBag::new()).unwrap();
        graph.add(sub, &["x", "r"], &["sub"]).unwrap();

        graph
            .merge("r", "k", |reshape, konst| {
                let shape = reshape.attr("output_shape")?;
                let tensor = Tensor::from_attr(&konst.attr("tensor")?).unwrap();
                let shape = Shape::from_attr(&shape).unwrap();
                konst.set_attr("tensor", tensor.into_shape(&shape).unwrap())
            })
            .unwrap();

        assert_eq!(graph.len(), 3);
        assert_eq!(graph.get_output_shape("k").unwrap().as_slice(), &[2, 3]);
        assert_eq!(graph.get_output_shape("r").unwrap().as_slice(), &[2, 3]);
        assert_eq!(graph.op_by_name("r").unwrap().name(), "k");
        assert_eq!(graph.node_by_name("sub").unwrap().inputs.as_slice(), &["x".to_string(), "k".to_string()]);
        assert_eq!(graph.consumers("k").unwrap()[0].name(), "sub");
        assert_eq!(graph.output_names(), vec!["sub"]);
    }

    #[test]
    fn unused_constants_are_pruned() {
        let mut graph = IrGraph::new(AxisOrder::Tf);
        constant(&mut graph, "shape", Tensor::zeros(&[2]));
        constant(&mut graph, "k", Tensor::zeros(&[6]));
        graph.add(reshape_op("r", tvec![2, 3]), &["k"], &["r"]).unwrap();
        assert_eq!(graph.output_names(), vec!["shape", "r"]);
        assert_eq!(graph.prune_unused_constants(), 1);
        assert_eq!(graph.output_names(), vec!["r"]);
        assert!(!graph.contains_buffer("shape"));
        assert_eq!(graph.producer("r").unwrap().name(), "r");
        assert_eq!(graph.producer("k").unwrap().name(), "k");
    }

    #[test]
    fn failed_merge_leaves_graph_untouched() {
        let mut graph = IrGraph::new(AxisOrder::Tf);
        constant(&mut graph, "c", Tensor::zeros(&[2, 3]));
        constant(&mut graph, "d", Tensor::zeros(&[2, 3]));
        graph.add(Op::from_attrs("n", OpType::Noop, &AttrBag::new()).unwrap(), &["c"], &["n"]).unwrap();
        let sub = Op::from_attrs("s", OpType::ElementwiseBinarySub, &AttrBag::new()).unwrap();
        graph.add(sub, &["n", "d"], &["s"]).unwrap();
        let before = graph.to_string();

        let e = graph.merge("n", "c", |_, konst| konst.set_attr("tensor", Tensor::zeros(&[4]))).unwrap_err();
        assert!(e.is_shape_error());
        assert_eq!(graph.len(), 4);
        assert_eq!(graph.to_string(), before);
        assert_eq!(graph.op_by_name("n").unwrap().name(), "n");
        assert_eq!(graph.node_by_name("s").unwrap().inputs.as_slice(), &["n".to_string(), "d".to_string()]);
        assert_eq!(graph.get_output_shape("c").unwrap().as_slice(), &[2, 3]);
    }

    #[test]
    fn pruning_drops_aliases_of_removed_constants() {
        let mut graph = IrGraph::new(AxisOrder::Tf);
        constant(&mut graph, "k", Tensor::zeros(&[6]));
        graph.add(reshape_op("r", tvec![2, 3]), &["k"], &["r"]).unwrap();
        graph.merge("r", "k", |_, _| Ok(())).unwrap();
        assert_eq!(graph.prune_unused_constants(), 1);
        assert!(graph.is_empty());
        assert!(matches!(graph.op_by_name("r"), Err(IrError::UnknownName(n)) if n == "r"));
        assert!(!graph.contains_buffer("r"));
        constant(&mut graph, "r", Tensor::zeros(&[1]));
        assert_eq!(graph.op_by_name("r").unwrap().name(), "r");
    }

    #[test]
    fn merge_rejects_cycles() {
        let mut graph = IrGraph::new(AxisOrder::Tf);
        constant(&mut graph, "k", Tensor::zeros(&[6]));
        graph.add(reshape_op("r", tvec![2, 3]), &["k"], &["r"]).unwrap();
        let e = graph.merge("k", "r", |_, _| Ok(())).unwrap_err();
        assert!(matches!(e, IrError::InvalidMerge { .. }));
        assert!(matches!(graph.merge("k", "k", |_, _| Ok(())), Err(IrError::InvalidMerge { .. })));
        assert!(matches!(graph.merge("k", "nope", |_, _| Ok(())), Err(IrError::UnknownName(_))));
    }
}
