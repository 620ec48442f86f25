//! Cadence core: composable, frame-driven property animation.
//!
//! Build leaf animations against any [`PropertyTarget`], compose them into
//! chains and groups, and drive them with a [`Scheduler`] from a
//! [`FrameClock`].

pub mod animation;
pub mod error;

pub use animation::{
    AnimationEvent, AnimationValue, ApplierPriority, ApplierRegistry, Curve, CurvePreset,
    DirectApplier, EventKind, FixedStepClock, FrameClock, Interpolate, NodeId, NodeState,
    PropertyApplier, PropertyChange, PropertyClass, PropertyTarget, Scheduler, SystemFrameClock,
    TargetRef, Transform2D,
};
pub use error::{AnimationError, Result};
