//! Error types for node construction and control.

use thiserror::Error;

use crate::animation::types::NodeId;

/// Result type for scheduler operations.
pub type Result<T> = std::result::Result<T, AnimationError>;

/// Errors returned by the scheduler.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnimationError {
    /// Duration or delay was negative or not finite.
    #[error("invalid {what}: {value} (must be finite and non-negative)")]
    InvalidTiming { what: &'static str, value: f64 },

    /// No registered applier can animate the property.
    #[error("no applier can animate property `{key}`")]
    NoApplier { key: String },

    /// `from` and `to` are different kinds of value.
    #[error("cannot interpolate `{key}` from {from} to {to}")]
    ValueMismatch {
        key: String,
        from: &'static str,
        to: &'static str,
    },

    /// The handle does not name a live node of this scheduler.
    #[error("unknown node {0}")]
    UnknownNode(NodeId),

    /// The node follows its owner and cannot be driven directly.
    #[error("node {0} is owned by a composite")]
    OwnedNode(NodeId),

    /// The node already belongs to a composite.
    #[error("node {0} already has an owner")]
    AlreadyOwned(NodeId),

    /// The node has already begun and cannot be adopted.
    #[error("node {0} has already started")]
    AlreadyStarted(NodeId),

    /// The same node was listed twice in one composite.
    #[error("node {0} appears more than once")]
    DuplicateChild(NodeId),
}

impl AnimationError {
    pub(crate) fn check_timing(what: &'static str, value: f64) -> Result<f64> {
        if value.is_finite() && value >= 0.0 {
            Ok(value)
        } else {
            Err(Self::InvalidTiming { what, value })
        }
    }
}
