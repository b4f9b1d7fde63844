use crate::internal::*;

/// An op placed in a graph, with the names of the buffers it reads and
/// writes.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub op: Op,
    pub inputs: TVec<String>,
    pub outputs: TVec<String>,
}

impl Node {
    pub fn name(&self) -> &str {
        self.op.name()
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} [{}] -> [{}]", self.op, self.inputs.join(", "), self.outputs.join(", "))
    }
}
