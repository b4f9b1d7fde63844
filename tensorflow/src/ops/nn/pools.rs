use super::conv2d::{check_data_format, padding};
use crate::ops::{DataInputs, nhwc_pair, register};
use irconv_core::internal::*;
use irconv_core::ops::cnn::{Pool, PoolType};

pub fn register_all_ops(reg: &mut TranslationRegistry) -> IrResult<()> {
    register(reg, pool, DataInputs::All, &["AvgPool", "MaxPool"])
}

/// Average pools never count the `SAME` padding.
pub fn pool(node: &SourceNode, graph: &IrGraph) -> IrResult<Op> {
    let kind = OpType::Pool;
    check_data_format(node, kind)?;
    let pool_type = if node.op_type == "MaxPool" { PoolType::Max } else { PoolType::Avg };
    let (size_y, size_x) = nhwc_pair(node, kind, "ksize", 1)?;
    let (stride_y, stride_x) = nhwc_pair(node, kind, "strides", 1)?;
    let (padding_size_strategy, pad_x, pad_y) =
        padding(node, graph, kind, (size_y, size_x), (stride_y, stride_x), (1, 1))?;
    let pool = Pool {
        pool_type,
        size_x,
        size_y,
        stride_x,
        stride_y,
        pad_x,
        pad_y,
        padding_size_strategy,
        pool_region_include_padding: false,
    };
    Ok(Op::new(node.name.clone(), OpKind::Pool(pool)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::tests::graph_with_input;

    #[test]
    fn max_pool_valid() {
        let graph = graph_with_input(&[1, 24, 24, 20]);
        let node = SourceNode::new("pool".to_string(), "MaxPool".to_string())
            .with_inputs(&["x"])
            .with_attr("ksize", vec![1usize, 2, 2, 1])
            .with_attr("strides", vec![1usize, 2, 2, 1])
            .with_attr("padding", "VALID");
        let op = pool(&node, &graph).unwrap();
        let OpKind::Pool(p) = op.kind() else { panic!() };
        assert_eq!(p.pool_type, PoolType::Max);
        assert_eq!(op.infer_shape(&[tvec![1, 24, 24, 20]], 1, AxisOrder::Tf).unwrap(), tvec!(tvec![1, 12, 12, 20]));
    }

    #[test]
    fn avg_pool_same() {
        let graph = graph_with_input(&[1, 7, 7, 8]);
        let node = SourceNode::new("pool".to_string(), "AvgPool".to_string())
            .with_inputs(&["x"])
            .with_attr("ksize", vec![1usize, 3, 3, 1])
            .with_attr("strides", vec![1usize, 2, 2, 1])
            .with_attr("padding", "SAME");
        let op = pool(&node, &graph).unwrap();
        let OpKind::Pool(p) = op.kind() else { panic!() };
        assert_eq!((p.pad_x, p.pad_y), (1, 1));
        assert!(!p.pool_region_include_padding);
        assert_eq!(op.infer_shape(&[tvec![1, 7, 7, 8]], 1, AxisOrder::Tf).unwrap(), tvec!(tvec![1, 4, 4, 8]));
    }
}
