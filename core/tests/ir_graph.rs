use irconv_core::framework::ir_translations;
use irconv_core::prelude::*;

fn setup_test_logger() {
    let _ = env_logger::Builder::from_env("IRCONV_LOG").is_test(true).try_init();
}

fn input(name: &str, shape: Shape) -> SourceNode {
    SourceNode::new(name.to_string(), "input".to_string())
        .with_attr("shape", shape)
        .with_attr("input_encoding_in", "bgr")
        .with_attr("input_encoding_out", "bgr")
        .with_attr("input_type", "image")
}

#[test]
fn small_caffe_style_net() {
    setup_test_logger();
    let registry = ir_translations().unwrap();
    let nodes = vec![
        input("data", tvec![1, 3, 32, 32]),
        SourceNode::new("conv1".to_string(), "convolution".to_string())
            .with_inputs(&["data"])
            .with_attr("weights", Tensor::zeros(&[8, 3, 5, 5]))
            .with_attr("bias", Tensor::zeros(&[8]))
            .with_attr("padx", 0usize)
            .with_attr("pady", 0usize)
            .with_attr("stridex", 1usize)
            .with_attr("stridey", 1usize)
            .with_attr("dilationx", 1usize)
            .with_attr("dilationy", 1usize),
        SourceNode::new("pool1".to_string(), "pool".to_string())
            .with_inputs(&["conv1"])
            .with_attr("pool_type", "POOL_MAX")
            .with_attr("size_x", 3usize)
            .with_attr("size_y", 3usize)
            .with_attr("stride_x", 2usize)
            .with_attr("stride_y", 2usize),
        SourceNode::new("fc".to_string(), "fully_connected".to_string())
            .with_inputs(&["pool1"])
            .with_attr("weights_list", vec![Tensor::zeros(&[8 * 14 * 14, 10])])
            .with_attr("bias", Tensor::zeros(&[10])),
        SourceNode::new("prob".to_string(), "softmax".to_string()).with_inputs(&["fc"]),
    ];
    let mut graph = IrGraph::new(AxisOrder::Caffe);
    registry.translate_all(Framework::Ir, &nodes, &mut graph).unwrap();

    assert_eq!(graph.get_output_shape("conv1").unwrap().as_slice(), &[1, 8, 28, 28]);
    // explicit pooling rounds up
    assert_eq!(graph.get_output_shape("pool1").unwrap().as_slice(), &[1, 8, 14, 14]);
    assert_eq!(graph.get_output_shape("prob").unwrap().as_slice(), &[1, 10]);
    assert_eq!(graph.buffer("pool1").unwrap().axis_format, AxisFormat::Ncs);
    assert_eq!(graph.buffer("prob").unwrap().axis_format, AxisFormat::Feature);
    assert_eq!(graph.input_names(), vec!["data"]);
    assert_eq!(graph.output_names(), vec!["prob"]);
    assert_eq!(
        graph.ops().map(|op| op.op_type()).collect::<Vec<_>>(),
        vec![OpType::Input, OpType::Convolution, OpType::Pool, OpType::FullyConnected, OpType::Softmax]
    );
}

#[test]
fn missing_attribute_is_reported() {
    let registry = ir_translations().unwrap();
    let mut graph = IrGraph::new(AxisOrder::Tf);
    let node = SourceNode::new("drop".to_string(), "dropout".to_string());
    let e = registry.translate(Framework::Ir, &node, &mut graph).unwrap_err();
    assert_eq!(e.to_string(), "Op drop (dropout) is missing required attribute `keep`");
}

#[test]
fn lstm_with_state_inputs() {
    let registry = ir_translations().unwrap();
    let mut graph = IrGraph::new(AxisOrder::Onnx);
    let nodes = vec![
        input("x", tvec![10, 2, 16]),
        input("h0", tvec![1, 2, 32]),
        input("c0", tvec![1, 2, 32]),
        SourceNode::new("lstm".to_string(), "lstm".to_string())
            .with_inputs(&["x", "h0", "c0"])
            .with_outputs(&["y", "c_n", "h_n"])
            .with_attr("input_weights", Tensor::zeros(&[16, 32]))
            .with_attr("gate_bias", Tensor::zeros(&[128]))
            .with_attr("hidden_state_weights", Tensor::zeros(&[32, 128]))
            .with_attr("h_0_input_name", "h0")
            .with_attr("c_0_input_name", "c0"),
    ];
    registry.translate_all(Framework::Ir, &nodes, &mut graph).unwrap();
    assert_eq!(graph.get_output_shape("y").unwrap().as_slice(), &[10, 2, 32]);
    assert_eq!(graph.get_output_shape("h_n").unwrap().as_slice(), &[1, 2, 32]);
    assert_eq!(graph.buffer("y").unwrap().axis_format, AxisFormat::Tbf);
}

#[test]
fn nms_feature_outputs() {
    let registry = ir_translations().unwrap();
    let mut graph = IrGraph::new(AxisOrder::Tf);
    let nodes = vec![
        input("boxes", tvec![1, 50, 4]),
        input("scores", tvec![1, 50]),
        input("features", tvec![50, 8]),
        SourceNode::new("nms".to_string(), "non_max_suppression".to_string())
            .with_inputs(&["boxes", "scores", "features"])
            .with_outputs(&["nms_boxes", "nms_scores", "nms_classes", "nms_features"])
            .with_attr("max_total_detections", 100usize)
            .with_attr("iou_threshold", 0.5f32),
    ];
    registry.translate_all(Framework::Ir, &nodes, &mut graph).unwrap();
    assert_eq!(graph.get_output_shape("nms_boxes").unwrap().as_slice(), &[1, 100, 4]);
    assert_eq!(graph.get_output_shape("nms_classes").unwrap().as_slice(), &[1, 100]);
    assert_eq!(graph.get_output_shape("nms_features").unwrap().as_slice(), &[100, 8]);
}
