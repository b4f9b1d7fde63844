//! The IR graph container.
mod buffer;
mod graph;
mod node;

pub use self::buffer::Buffer;
pub use self::graph::IrGraph;
pub use self::node::Node;
