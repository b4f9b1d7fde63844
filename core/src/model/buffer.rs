use crate::internal::*;

/// A named tensor flowing between ops: the output of exactly one producer.
#[derive(Clone, Debug, PartialEq, new)]
pub struct Buffer {
    pub name: String,
    pub shape: Shape,
    #[new(value = "AxisFormat::Any")]
    pub axis_format: AxisFormat,
    pub producer: String,
    /// Names of the consuming ops, in insertion order.
    #[new(default)]
    pub consumers: Vec<String>,
}

impl Buffer {
    pub fn rank(&self) -> usize {
        self.shape.len()
    }

    /// Default layout tag from the axis order convention.
    pub fn populate_axis_format(&mut self, axis_order: AxisOrder) {
        self.axis_format = axis_order.axis_format_for_rank(self.rank());
    }

    pub(crate) fn add_consumer(&mut self, op: &str) {
        if !self.consumers.iter().any(|c| c == op) {
            self.consumers.push(op.to_string());
        }
    }

    pub(crate) fn remove_consumer(&mut self, op: &str) {
        self.consumers.retain(|c| c != op);
    }
}

impl fmt::Display for Buffer {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {} ({})", self.name, format_shape(&self.shape), self.axis_format)
    }
}
