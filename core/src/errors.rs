//! Error types of the IR core.
use crate::framework::Framework;
use crate::ops::OpType;
use thiserror::Error;

/// A shape computation failure, before it is attributed to an op.
///
/// Produced by axis orders, padding arithmetic and broadcasting. `Op`
/// wraps it into [`IrError::Shape`] together with its name and type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ShapeError(pub String);

pub type ShapeResult<T> = Result<T, ShapeError>;

#[derive(Debug, Error)]
pub enum IrError {
    #[error("Op {op} ({kind}) is missing required attribute `{attr}`")]
    MissingAttribute { op: String, kind: OpType, attr: String },

    #[error("Op {op} ({kind}) has an invalid `{attr}` attribute: {reason}")]
    InvalidAttribute { op: String, kind: OpType, attr: String, reason: String },

    #[error("Op {op} ({kind}) has no attribute `{attr}`")]
    UnknownAttribute { op: String, kind: OpType, attr: String },

    #[error("Shape inference failed for op {op} ({kind}): {source}")]
    Shape {
        op: String,
        kind: OpType,
        #[source]
        source: ShapeError,
    },

    #[error("Unsupported {framework} operator `{op_type}`{}", node_suffix(.node))]
    UnsupportedOperator { framework: Framework, op_type: String, node: Option<String> },

    #[error("A translation is already registered for {framework} operator `{op_type}`")]
    DuplicateRegistration { framework: Framework, op_type: String },

    #[error("Name `{0}` is already used in the graph")]
    DuplicateName(String),

    #[error("No op or buffer named `{0}` in the graph")]
    UnknownName(String),

    #[error("Can not merge {absorbed} into {survivor}: {reason}")]
    InvalidMerge { absorbed: String, survivor: String, reason: String },
}

pub type IrResult<T> = Result<T, IrError>;

fn node_suffix(node: &Option<String>) -> String {
    node.as_ref().map(|n| format!(" (node {n})")).unwrap_or_default()
}

impl IrError {
    pub fn shape(op: impl Into<String>, kind: OpType, source: ShapeError) -> IrError {
        IrError::Shape { op: op.into(), kind, source }
    }

    /// Name of the op the error is attributed to, if any.
    pub fn op_name(&self) -> Option<&str> {
        match self {
            IrError::MissingAttribute { op, .. }
            | IrError::InvalidAttribute { op, .. }
            | IrError::UnknownAttribute { op, .. }
            | IrError::Shape { op, .. } => Some(op),
            IrError::UnsupportedOperator { node, .. } => node.as_deref(),
            _ => None,
        }
    }

    pub fn is_shape_error(&self) -> bool {
        matches!(self, IrError::Shape { .. })
    }
}

/// Attach op name and type to a context-free shape failure.
pub trait ShapeResultExt<T> {
    fn in_op(self, op: &str, kind: OpType) -> IrResult<T>;
}

impl<T> ShapeResultExt<T> for ShapeResult<T> {
    fn in_op(self, op: &str, kind: OpType) -> IrResult<T> {
        self.map_err(|e| IrError::shape(op, kind, e))
    }
}
