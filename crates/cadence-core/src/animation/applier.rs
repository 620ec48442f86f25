//! Property appliers: how a value reaches a target.
//!
//! A leaf animation never writes to its target directly. At construction it
//! asks the [`ApplierRegistry`] for the first [`PropertyApplier`] whose
//! `can_animate` probe accepts the `(target, key)` pair, trying strategies in
//! [`ApplierPriority`] order, and routes every per-tick value through it.
//!
//! Render backends plug in `RenderProperty` and `LayoutConstraint`
//! strategies. [`DirectApplier`] is the generic fallback that writes through
//! [`PropertyTarget::set_value`].

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use super::types::AnimationValue;

/// How a target classifies one of its properties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyClass {
    /// Backed by a render layer that can present values without a model write.
    RenderLayer,
    /// A layout constraint constant.
    LayoutConstraint,
    /// Plain stored state.
    Plain,
}

/// An object whose properties can be animated.
pub trait PropertyTarget {
    /// Current value of `key`, or `None` if the target has no such property.
    fn value(&self, key: &str) -> Option<AnimationValue>;

    fn set_value(&mut self, key: &str, value: AnimationValue);

    fn property_class(&self, _key: &str) -> PropertyClass {
        PropertyClass::Plain
    }
}

/// Shared handle to an animated target.
pub type TargetRef = Rc<RefCell<dyn PropertyTarget>>;

/// Strategy for mutating one kind of property.
pub trait PropertyApplier {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    fn can_animate(&self, target: &dyn PropertyTarget, key: &str) -> bool;

    /// Write an intermediate value. Called once per active tick.
    fn apply(&self, target: &mut dyn PropertyTarget, key: &str, value: &AnimationValue);

    /// Snap to the final value. Called exactly once when the leaf completes.
    fn commit_final(&self, target: &mut dyn PropertyTarget, key: &str, value: &AnimationValue);
}

/// Probe order of applier strategies. Lower sorts first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ApplierPriority {
    RenderProperty,
    LayoutConstraint,
    Direct,
}

/// Generic applier that writes values straight into the target.
#[derive(Debug, Default, Clone, Copy)]
pub struct DirectApplier;

impl PropertyApplier for DirectApplier {
    fn name(&self) -> &'static str {
        "direct"
    }

    fn can_animate(&self, target: &dyn PropertyTarget, key: &str) -> bool {
        target.value(key).is_some()
    }

    fn apply(&self, target: &mut dyn PropertyTarget, key: &str, value: &AnimationValue) {
        target.set_value(key, value.clone());
    }

    fn commit_final(&self, target: &mut dyn PropertyTarget, key: &str, value: &AnimationValue) {
        target.set_value(key, value.clone());
    }
}

/// Ordered set of applier strategies.
#[derive(Clone, Default)]
pub struct ApplierRegistry {
    entries: Vec<(ApplierPriority, Rc<dyn PropertyApplier>)>,
}

impl fmt::Debug for ApplierRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|(p, a)| (p, a.name())))
            .finish()
    }
}

impl ApplierRegistry {
    /// An empty registry: no property can be animated.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding only [`DirectApplier`].
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(ApplierPriority::Direct, DirectApplier);
        registry
    }

    /// Add a strategy. Within one priority, earlier registrations win.
    pub fn register<A>(&mut self, priority: ApplierPriority, applier: A)
    where
        A: PropertyApplier + 'static,
    {
        let at = self.entries.partition_point(|(p, _)| *p <= priority);
        self.entries.insert(at, (priority, Rc::new(applier)));
    }

    /// The first strategy able to animate `key` on `target`.
    pub fn select(&self, target: &dyn PropertyTarget, key: &str) -> Option<Rc<dyn PropertyApplier>> {
        self.entries
            .iter()
            .find(|(_, applier)| applier.can_animate(target, key))
            .map(|(_, applier)| Rc::clone(applier))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
