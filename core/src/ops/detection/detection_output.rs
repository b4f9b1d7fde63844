use crate::internal::*;

attr_enum! {
    /// Encoding of box regressions relative to their prior box.
    pub enum PriorBoxCode {
        Corner => "PRIORBOX_TYPE_CORNER",
        CenterSize => "PRIORBOX_TYPE_CENTER_SIZE",
        CornerSize => "PRIORBOX_TYPE_CORNER_SIZE",
    }
}

op_config! {
    /// SSD style detection head: decodes locations against the prior boxes,
    /// then runs per-class non maximum suppression.
    pub struct DetectionOutput {
        output_dims: Vec<Shape>,
        num_classes: usize,
        share_location: bool,
        background_label_id: i64,
        nms_threshold: f32,
        confidence_threshold: f32,
        nms_top_k: i64,
        nms_eta: f32,
        code_type: PriorBoxCode,
        keep_top_k: i64,
        variance_encoded_in_target: bool,
        priorbox_data: Vec<Tensor> = vec![],
    }
}

op_config! {
    /// Box decoder with the usual center/size scaling factors.
    pub struct Ssd {
        scale_y: f32,
        scale_x: f32,
        scale_h: f32,
        scale_w: f32,
    }
}

impl IrOp for DetectionOutput {
    fn infer_shape(&self, _inputs: &[Shape], _n: usize, _ao: AxisOrder) -> ShapeResult<TVec<Shape>> {
        Ok(self.output_dims.iter().cloned().collect())
    }
}

shape_of_first_input!(Ssd);
