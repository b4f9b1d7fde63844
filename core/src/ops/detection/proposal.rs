use crate::internal::*;

op_config! {
    /// Region proposal layer of Faster R-CNN. Emits `max_num_rois` boxes as
    /// `[batch index, x1, y1, x2, y2]` rows.
    pub struct Proposal {
        feat_stride: usize,
        scales: Vec<f32>,
        ratios: Vec<f32>,
        anchor_base_size: usize,
        min_bbox_size: f32,
        max_num_proposals: usize,
        max_num_rois: usize,
        iou_threshold_nms: f32,
    }
}

op_config! {
    pub struct GenerateProposals {
        spatial_scale: f32,
        pre_nms_top_n: usize,
        post_nms_top_n: usize,
        nms_thresh: f32,
        min_size: f32,
        correct_transform_coords: bool = true,
        anchors: Tensor,
        im_info: Tensor,
    }
}

impl IrOp for Proposal {
    fn infer_shape(&self, _inputs: &[Shape], _n: usize, _ao: AxisOrder) -> ShapeResult<TVec<Shape>> {
        Ok(tvec!(tvec![1, 1, self.max_num_rois, 5]))
    }
}

impl IrOp for GenerateProposals {
    fn infer_shape(&self, _inputs: &[Shape], _n: usize, _ao: AxisOrder) -> ShapeResult<TVec<Shape>> {
        bail_shape!("output shapes of generate_proposals can not be inferred")
    }
}
