use irconv_core::broadcast::multi_broadcast;
use irconv_core::internal::*;
use proptest::prelude::*;
use proptest::test_runner::TestCaseResult;

fn shape_and_axes() -> BoxedStrategy<(Vec<usize>, Vec<i64>)> {
    proptest::collection::vec(1usize..6, 1..6)
        .prop_flat_map(|shape| {
            let rank = shape.len();
            (Just(shape), proptest::sample::subsequence((0..rank as i64).collect::<Vec<_>>(), 0..=rank))
        })
        .boxed()
}

fn reduce(op_type: OpType, shape: &[usize], axes: &[i64], keep_dims: bool) -> IrResult<Shape> {
    let bag = AttrBag::new().with("axes", axes.to_vec()).with("keep_dims", keep_dims);
    let op = Op::from_attrs("r", op_type, &bag)?;
    let num_outputs = if op_type == OpType::Moment { 2 } else { 1 };
    Ok(op.infer_shape(&[shape.into()], num_outputs, AxisOrder::Tf)?.remove(0))
}

fn reduce_rank_law(shape: &[usize], axes: &[i64]) -> TestCaseResult {
    for op_type in [OpType::ReduceSum, OpType::ReduceMax, OpType::ReduceMean, OpType::Moment] {
        let kept = reduce(op_type, shape, axes, true).unwrap();
        prop_assert_eq!(kept.len(), shape.len());
        let dropped = reduce(op_type, shape, axes, false).unwrap();
        prop_assert_eq!(dropped.len(), shape.len() - axes.len());
    }
    Ok(())
}

fn strided_slice(begin: i64, end: i64, stride: i64, shrink: bool) -> Shape {
    let bag = AttrBag::new()
        .with("begin", vec![begin])
        .with("end", vec![end])
        .with("strides", vec![stride])
        .with("shrink_axis_mask", if shrink { 1i64 } else { 0 });
    let op = Op::from_attrs("ss", OpType::StridedSlice, &bag).unwrap();
    op.infer_shape(&[tvec![64, 3]], 1, AxisOrder::Tf).unwrap().remove(0)
}

proptest! {
    #[test]
    fn reduce_rank_prop((shape, axes) in shape_and_axes()) {
        reduce_rank_law(&shape, &axes)?
    }

    #[test]
    fn spatial_round_trip(b in 1usize..8, h in 1usize..64, w in 1usize..64, d in 1usize..64) {
        for axis_order in AxisOrder::ALL {
            let dims = SpatialDims::new(b, h, w, d);
            let shape = axis_order.format_spatial_output_shape(dims);
            prop_assert_eq!(axis_order.extract_spatial_dims(&shape).unwrap(), dims);
        }
    }

    #[test]
    fn time_series_round_trip(b in 1usize..8, t in 1usize..64, f in 1usize..64) {
        for axis_order in AxisOrder::ALL {
            let dims = TimeSeriesDims::new(b, t, f);
            let shape = axis_order.format_time_series_output_shape(dims);
            prop_assert_eq!(axis_order.extract_time_series_dims(&shape).unwrap(), dims);
        }
    }

    #[test]
    fn broadcast_is_symmetric(
        a in proptest::collection::vec(prop_oneof![Just(1usize), Just(3usize)], 0..4),
        b in proptest::collection::vec(prop_oneof![Just(1usize), Just(3usize)], 0..4),
    ) {
        prop_assert_eq!(multi_broadcast(&[&a, &b]).unwrap(), multi_broadcast(&[&b, &a]).unwrap());
    }

    #[test]
    fn strided_slice_ceil(begin in 0i64..32, len in 0i64..32, stride in 1i64..8) {
        let end = begin + len;
        let shape = strided_slice(begin, end, stride, false);
        prop_assert_eq!(shape[0] as i64, (len + stride - 1) / stride);
        prop_assert_eq!(shape[1], 3);
        prop_assert_eq!(strided_slice(begin, end, stride, true)[0], 1);
    }
}

#[test]
fn strided_slice_2d() {
    let bag = AttrBag::new()
        .with("begin", vec![0i64, 0])
        .with("end", vec![4i64, 6])
        .with("strides", vec![2i64, 3]);
    let op = Op::from_attrs("ss", OpType::StridedSlice, &bag).unwrap();
    assert_eq!(op.infer_shape(&[tvec![4, 6]], 1, AxisOrder::Tf).unwrap(), tvec!(tvec![2, 2]));
    let bag = bag.with("shrink_axis_mask", 1i64);
    let op = Op::from_attrs("ss", OpType::StridedSlice, &bag).unwrap();
    assert_eq!(op.infer_shape(&[tvec![4, 6]], 1, AxisOrder::Tf).unwrap(), tvec!(tvec![1, 2]));
}

#[test]
fn explicit_same_conv() {
    let bag = AttrBag::new()
        .with("weights", Tensor::zeros(&[16, 3, 3, 3]))
        .with("bias", Tensor::zeros(&[16]))
        .with("padx", 1usize)
        .with("pady", 1usize)
        .with("stridex", 1usize)
        .with("stridey", 1usize)
        .with("dilationx", 1usize)
        .with("dilationy", 1usize)
        .with("padding_size_strategy", "PADDING_SIZE_EXPLICIT");
    let op = Op::from_attrs("conv", OpType::Convolution, &bag).unwrap();
    assert_eq!(op.infer_shape(&[tvec![1, 3, 32, 32]], 1, AxisOrder::Caffe).unwrap(), tvec!(tvec![1, 16, 32, 32]));
}

#[test]
fn deconv_output_override() {
    let bag = |output_height: usize| {
        AttrBag::new()
            .with("weights", Tensor::zeros(&[8, 4, 4, 4]))
            .with("bias", Tensor::zeros(&[8]))
            .with("stride", 2usize)
            .with("pady", 1usize)
            .with("padx", 1usize)
            .with("output_height", output_height)
            .with("output_width", 0usize)
    };
    let computed = Op::from_attrs("d", OpType::Deconvolution, &bag(0)).unwrap();
    let shape = computed.infer_shape(&[tvec![1, 4, 5, 5]], 1, AxisOrder::Caffe).unwrap();
    assert_eq!(shape, tvec!(tvec![1, 8, 10, 10]));
    let forced = Op::from_attrs("d", OpType::Deconvolution, &bag(10)).unwrap();
    let shape = forced.infer_shape(&[tvec![1, 4, 7, 7]], 1, AxisOrder::Caffe).unwrap();
    assert_eq!(shape[0][2], 10);
}

#[test]
fn concat_on_axis() {
    let op = Op::from_attrs("c", OpType::Concat, &AttrBag::new().with("axis", 1i64)).unwrap();
    assert_eq!(
        op.infer_shape(&[tvec![2, 3, 4], tvec![2, 5, 4]], 1, AxisOrder::Tf).unwrap(),
        tvec!(tvec![2, 8, 4])
    );
}
