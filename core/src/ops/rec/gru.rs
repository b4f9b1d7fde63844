use super::recurrent_output_shapes;
use crate::internal::*;
use crate::ops::input_shape;
use crate::ops::nn::NeuronType;
use std::collections::BTreeMap;

/// Parameters of one GRU gate, carried as a map attribute with the keys
/// `weights`, `rec_weights` and `bias`.
#[derive(Debug, Clone, PartialEq)]
pub struct GruGate {
    pub weights: Tensor,
    pub rec_weights: Tensor,
    pub bias: Tensor,
}

impl FromAttr for GruGate {
    fn from_attr(value: &AttrValue) -> Result<GruGate, String> {
        let AttrValue::Map(map) = value else {
            return Err(format!("expected a gate map, got {}", value.type_name()));
        };
        let field = |key: &str| -> Result<Tensor, String> {
            let value = map.get(key).ok_or_else(|| format!("gate has no `{key}`"))?;
            Tensor::from_attr(value).map_err(|e| format!("gate `{key}`: {e}"))
        };
        Ok(GruGate { weights: field("weights")?, rec_weights: field("rec_weights")?, bias: field("bias")? })
    }
}

impl From<GruGate> for AttrValue {
    fn from(gate: GruGate) -> AttrValue {
        let map: BTreeMap<String, AttrValue> = [
            ("weights", gate.weights),
            ("rec_weights", gate.rec_weights),
            ("bias", gate.bias),
        ]
        .into_iter()
        .map(|(k, t)| (k.to_string(), t.into()))
        .collect();
        AttrValue::Map(map)
    }
}

op_config! {
    pub struct Gru {
        state_gate: GruGate,
        forget_gate: GruGate,
        control_gate: GruGate,
        activation: NeuronType = NeuronType::Logistic,
        gate_activation: NeuronType = NeuronType::Logistic,
        rec_gate_activation: NeuronType = NeuronType::Tanh,
        backwards: bool = false,
        h_0_input_name: String = String::new(),
        c_0_input_name: String = String::new(),
    }
}

impl IrOp for Gru {
    fn infer_shape(&self, inputs: &[Shape], _n: usize, axis_order: AxisOrder) -> ShapeResult<TVec<Shape>> {
        let rec_weights = &self.control_gate.rec_weights;
        let Some(hidden) = rec_weights.dim(1) else {
            bail_shape!(
                "control gate recurrent weights of shape {} have no axis 1",
                format_shape(rec_weights.shape())
            );
        };
        recurrent_output_shapes(
            input_shape(inputs, 0)?,
            hidden,
            axis_order,
            &self.h_0_input_name,
            &self.c_0_input_name,
        )
    }
}
