use crate::internal::*;
use crate::ops::input_shape;

op_config! {
    /// Inputs are boxes and scores, then any number of per-box feature
    /// tensors that are gathered along with the kept boxes.
    pub struct NonMaxSuppression {
        max_total_detections: usize,
        max_detections_per_class: usize = max_total_detections,
        iou_threshold: f32,
        score_threshold: f32 = 0.0,
    }
}

impl IrOp for NonMaxSuppression {
    fn infer_shape(&self, inputs: &[Shape], _n: usize, _ao: AxisOrder) -> ShapeResult<TVec<Shape>> {
        let boxes = input_shape(inputs, 0)?;
        input_shape(inputs, 1)?;
        let Some(&batch) = boxes.first() else {
            bail_shape!("boxes input can not be a scalar");
        };
        let max = self.max_total_detections;
        let mut outputs: TVec<Shape> = tvec!(tvec![batch, max, 4], tvec![batch, max], tvec![batch, max]);
        for feature in &inputs[2..] {
            ensure_shape!(!feature.is_empty(), "feature inputs can not be scalars");
            let mut gathered = feature.clone();
            gathered[0] = max;
            outputs.push(gathered);
        }
        Ok(outputs)
    }
}
