//! Animation composition and scheduling.
//!
//! This module provides:
//! - **Curves**: easing transforms and their combinators
//! - **Leaf animations**: one property of one target, driven through an applier
//! - **Chains and groups**: sequential and parallel composition
//! - **Scheduler**: the node arena, root registry and per-frame tick
//! - **Events**: per-node listeners and a drainable event queue
//!
//! # Architecture
//!
//! ```text
//! Scheduler
//!   ├── Arena (NodeId → Node)
//!   │     ├── Leaf ──→ PropertyApplier ──→ PropertyTarget
//!   │     ├── Chain / Group (own children by id)
//!   │     └── Wait / Action
//!   ├── RootRegistry (unowned nodes, insertion order)
//!   ├── DeferredStarts (auto-start on next tick)
//!   └── EventQueue
//! ```

pub mod applier;
mod chain;
pub mod clock;
pub mod curve;
pub mod events;
mod group;
pub mod interpolate;
pub mod leaf;
mod node;
mod registry;
pub mod scheduler;
pub mod types;

pub use applier::{
    ApplierPriority, ApplierRegistry, DirectApplier, PropertyApplier, PropertyClass,
    PropertyTarget, TargetRef,
};
pub use clock::{FixedStepClock, FrameClock, SystemFrameClock};
pub use curve::{Curve, CurvePreset, UnknownCurve};
pub use events::{AnimationEvent, EventKind, EventQueue};
pub use interpolate::Interpolate;
pub use leaf::PropertyChange;
pub use scheduler::{Scheduler, MIN_SPEED};
pub use types::{AnimationValue, NodeId, NodeState, Transform2D};
