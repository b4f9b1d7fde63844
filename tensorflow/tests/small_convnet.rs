use irconv_tensorflow::prelude::*;
use irconv_tensorflow::{tensorflow_translations, translate_graph};

fn setup_test_logger() {
    let _ = env_logger::Builder::from_env("IRCONV_LOG").is_test(true).try_init();
}

fn node(name: &str, op_type: &str, inputs: &[&str]) -> SourceNode {
    SourceNode::new(name.to_string(), op_type.to_string()).with_inputs(inputs)
}

fn konst(name: &str, value: Tensor) -> SourceNode {
    node(name, "Const", &[]).with_attr("value", value)
}

fn convnet() -> Vec<SourceNode> {
    vec![
        node("x", "Placeholder", &[]).with_attr("shape", vec![-1i64, 28, 28, 1]),
        konst("conv/filter", Tensor::zeros(&[5, 5, 1, 20])),
        node("conv", "Conv2D", &["x:0", "conv/filter"])
            .with_attr("padding", "VALID")
            .with_attr("strides", vec![1usize, 1, 1, 1]),
        konst("conv/bias", Tensor::zeros(&[20])),
        node("conv/add", "BiasAdd", &["conv", "conv/bias"]),
        node("relu", "Relu", &["conv/add"]),
        node("pool", "MaxPool", &["relu", "^relu"])
            .with_attr("ksize", vec![1usize, 2, 2, 1])
            .with_attr("strides", vec![1usize, 2, 2, 1])
            .with_attr("padding", "VALID"),
        konst("flat/shape", tensor1(&[-1.0, 2880.0])),
        node("flat", "Reshape", &["pool", "flat/shape"]),
        konst("fc/w", Tensor::zeros(&[2880, 10])),
        node("fc", "MatMul", &["flat", "fc/w"]),
        node("prob", "Softmax", &["fc"]),
    ]
}

#[test]
fn convnet_shapes() {
    setup_test_logger();
    let registry = tensorflow_translations().unwrap();
    let mut graph = IrGraph::new(AxisOrder::Tf);
    translate_graph(&registry, &convnet(), &mut graph).unwrap();

    assert_eq!(graph.get_output_shape("x").unwrap().as_slice(), &[1, 28, 28, 1]);
    assert_eq!(graph.get_output_shape("conv").unwrap().as_slice(), &[1, 24, 24, 20]);
    assert_eq!(graph.get_output_shape("pool").unwrap().as_slice(), &[1, 12, 12, 20]);
    assert_eq!(graph.get_output_shape("flat").unwrap().as_slice(), &[1, 2880]);
    assert_eq!(graph.get_output_shape("prob").unwrap().as_slice(), &[1, 10]);
    assert_eq!(graph.buffer("pool").unwrap().axis_format, AxisFormat::Nsc);
    assert_eq!(graph.input_names(), vec!["x"]);
    assert_eq!(graph.output_names(), vec!["prob"]);
}

#[test]
fn folded_constants_are_pruned() {
    let registry = tensorflow_translations().unwrap();
    let mut graph = IrGraph::new(AxisOrder::Tf);
    translate_graph(&registry, &convnet(), &mut graph).unwrap();

    for gone in ["conv/filter", "flat/shape", "fc/w"] {
        assert!(!graph.contains_buffer(gone), "{gone} should be pruned");
    }
    assert_eq!(graph.op_by_name("conv/bias").unwrap().op_type(), OpType::Constant);
    assert_eq!(graph.len(), 9);
}

#[test]
fn reshaped_weights_are_folded() {
    let nodes = vec![
        node("x", "Placeholder", &[]).with_attr("shape", vec![3usize, 2]),
        konst("w", tensor1(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0])),
        konst("w/shape", tensor1(&[3.0, 2.0])),
        node("w/reshaped", "Reshape", &["w", "w/shape"]),
        node("y", "Mul", &["x", "w/reshaped"]),
    ];
    let registry = tensorflow_translations().unwrap();
    let mut graph = IrGraph::new(AxisOrder::Tf);
    translate_graph(&registry, &nodes, &mut graph).unwrap();

    assert_eq!(graph.len(), 3);
    assert_eq!(graph.op_by_name("w/reshaped").unwrap().name(), "w");
    assert_eq!(graph.node_by_name("y").unwrap().inputs.as_slice(), &["x".to_string(), "w".to_string()]);
    let OpKind::Constant(w) = graph.op_by_name("w").unwrap().kind() else { panic!() };
    assert_eq!(w.tensor.shape(), &[3, 2]);
    assert_eq!(graph.get_output_shape("y").unwrap().as_slice(), &[3, 2]);
}

#[test]
fn unsupported_nodes() {
    let nodes = vec![
        node("x", "Placeholder", &[]).with_attr("shape", vec![1usize, 4]),
        node("q", "FakeQuantWithMinMaxVars", &["x"]),
        node("y", "Tanh", &["q"]),
    ];
    let registry = tensorflow_translations().unwrap();
    let mut graph = IrGraph::new(AxisOrder::Tf);
    let e = translate_graph(&registry, &nodes, &mut graph).unwrap_err();
    assert!(matches!(e, IrError::UnsupportedOperator { framework: Framework::Tensorflow, .. }));

    let registry = registry.with_policy(UnsupportedPolicy::Passthrough);
    let mut graph = IrGraph::new(AxisOrder::Tf);
    translate_graph(&registry, &nodes, &mut graph).unwrap();
    assert_eq!(graph.op_by_name("q").unwrap().op_type(), OpType::Noop);
    assert_eq!(graph.get_output_shape("y").unwrap().as_slice(), &[1, 4]);
}
