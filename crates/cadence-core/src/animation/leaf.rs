//! Single-property animations.
//!
//! A [`PropertyChange`] names a target, a property key and the value to
//! reach. [`Scheduler::animate`](super::scheduler::Scheduler::animate) turns it
//! into a leaf node that drives one [`PropertyApplier`] over a duration and a
//! curve.

use std::fmt;
use std::rc::Rc;

use tracing::warn;

use super::applier::{ApplierRegistry, PropertyApplier, TargetRef};
use super::curve::Curve;
use super::interpolate::Interpolate;
use super::types::AnimationValue;
use crate::error::{AnimationError, Result};

/// A property change to perform on a target.
#[derive(Clone)]
pub struct PropertyChange {
    pub target: TargetRef,
    pub key: String,
    /// Starting value. When `None`, the target's value at commit time is used.
    pub from: Option<AnimationValue>,
    pub to: AnimationValue,
}

impl fmt::Debug for PropertyChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyChange")
            .field("key", &self.key)
            .field("from", &self.from)
            .field("to", &self.to)
            .finish_non_exhaustive()
    }
}

impl PropertyChange {
    pub fn new(target: TargetRef, key: impl Into<String>, to: impl Into<AnimationValue>) -> Self {
        Self {
            target,
            key: key.into(),
            from: None,
            to: to.into(),
        }
    }

    pub fn from_value(mut self, from: impl Into<AnimationValue>) -> Self {
        self.from = Some(from.into());
        self
    }

    /// Write `to` into the target immediately.
    pub fn apply_now(&self) {
        match self.target.try_borrow_mut() {
            Ok(mut target) => target.set_value(&self.key, self.to.clone()),
            Err(_) => warn!(key = %self.key, "target is borrowed; change dropped"),
        }
    }

    /// The value the target currently holds for this key.
    fn current(&self) -> Option<AnimationValue> {
        self.target
            .try_borrow()
            .ok()
            .and_then(|target| target.value(&self.key))
    }
}

pub(crate) struct LeafAnimation {
    change: PropertyChange,
    applier: Rc<dyn PropertyApplier>,
    curve: Curve,
    /// Resolved starting value, captured at commit.
    from: Option<AnimationValue>,
}

impl LeafAnimation {
    pub(crate) fn new(
        change: PropertyChange,
        curve: Curve,
        appliers: &ApplierRegistry,
    ) -> Result<Self> {
        let applier = {
            let target = change.target.try_borrow().map_err(|_| AnimationError::NoApplier {
                key: change.key.clone(),
            })?;
            appliers.select(&*target, &change.key)
        };
        let Some(applier) = applier else {
            return Err(AnimationError::NoApplier { key: change.key });
        };

        let start = change.from.clone().or_else(|| change.current());
        if let Some(start) = start.filter(|start| !start.same_kind(&change.to)) {
            return Err(AnimationError::ValueMismatch {
                key: change.key,
                from: start.kind_name(),
                to: change.to.kind_name(),
            });
        }

        Ok(Self {
            change,
            applier,
            curve,
            from: None,
        })
    }

    pub(crate) fn key(&self) -> &str {
        &self.change.key
    }

    pub(crate) fn applier_name(&self) -> &'static str {
        self.applier.name()
    }

    /// Resolve the starting value: explicit `from`, else the target's
    /// current value, else `to`.
    pub(crate) fn capture_from(&mut self) {
        if self.from.is_some() {
            return;
        }
        let from = self
            .change
            .from
            .clone()
            .or_else(|| self.change.current())
            .filter(|value| value.same_kind(&self.change.to))
            .unwrap_or_else(|| self.change.to.clone());
        self.from = Some(from);
    }

    pub(crate) fn value_at(&self, progress: f64) -> AnimationValue {
        let eased = self.curve.transform(progress);
        match &self.from {
            Some(from) => from.interpolate(&self.change.to, eased),
            None => self.change.to.clone(),
        }
    }

    /// Push the value at `progress` through the applier.
    pub(crate) fn apply(&self, progress: f64) {
        let value = self.value_at(progress);
        self.with_target(|applier, target, key| applier.apply(target, key, &value));
    }

    /// Snap the target to its final value: `to`, or `from` when reversed.
    pub(crate) fn commit_final(&mut self, reversed: bool) {
        self.capture_from();
        let value = if reversed {
            self.from.clone().unwrap_or_else(|| self.change.to.clone())
        } else {
            self.change.to.clone()
        };
        self.with_target(|applier, target, key| applier.commit_final(target, key, &value));
    }

    fn with_target<F>(&self, f: F)
    where
        F: FnOnce(&dyn PropertyApplier, &mut dyn super::applier::PropertyTarget, &str),
    {
        match self.change.target.try_borrow_mut() {
            Ok(mut target) => f(&*self.applier, &mut *target, &self.change.key),
            Err(_) => warn!(
                key = %self.change.key,
                applier = self.applier.name(),
                "target is borrowed; skipping write"
            ),
        }
    }
}
