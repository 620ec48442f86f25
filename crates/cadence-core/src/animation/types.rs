//! Core animation types.
//!
//! This module defines the fundamental types shared by the node tree:
//! - `NodeId`: handle of a node inside a [`Scheduler`](super::scheduler::Scheduler)
//! - `NodeState`: observable lifecycle state of a node
//! - `AnimationValue`: the values a leaf animation carries between `from` and `to`
//! - `Transform2D`: decomposed 2D transform used by `AnimationValue::Transform`

use std::fmt;

use serde::{Deserialize, Serialize};

/// Handle of a node inside a scheduler arena.
///
/// Handles are only meaningful for the scheduler that issued them. Owner
/// back-references are stored as handles, never as owning pointers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Observable state of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeState {
    /// Constructed but not begun.
    Pending,
    /// Begun, position still before the delay threshold.
    Delayed,
    /// Between `delay` and `delay + duration`.
    Active,
    /// Terminal.
    Completed,
}

impl Default for NodeState {
    fn default() -> Self {
        Self::Pending
    }
}

/// Decomposed 2D transform.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform2D {
    pub translate_x: f64,
    pub translate_y: f64,
    pub scale_x: f64,
    pub scale_y: f64,
    /// Rotation in radians.
    pub rotate: f64,
}

impl Default for Transform2D {
    fn default() -> Self {
        Self {
            translate_x: 0.0,
            translate_y: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            rotate: 0.0,
        }
    }
}

impl Transform2D {
    pub fn translation(x: f64, y: f64) -> Self {
        Self {
            translate_x: x,
            translate_y: y,
            ..Self::default()
        }
    }

    pub fn scale(sx: f64, sy: f64) -> Self {
        Self {
            scale_x: sx,
            scale_y: sy,
            ..Self::default()
        }
    }

    pub fn rotation(radians: f64) -> Self {
        Self {
            rotate: radians,
            ..Self::default()
        }
    }
}

/// A value that can be animated on a target property.
///
/// Two values only blend when they are the same variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AnimationValue {
    Scalar { value: f64 },
    Point { x: f64, y: f64 },
    Size { width: f64, height: f64 },
    Rect { x: f64, y: f64, width: f64, height: f64 },
    /// Linear RGBA.
    Color { rgba: [f32; 4] },
    Transform { transform: Transform2D },
    /// Switches at the midpoint.
    Bool { value: bool },
}

impl AnimationValue {
    pub fn scalar(value: f64) -> Self {
        Self::Scalar { value }
    }

    pub fn point(x: f64, y: f64) -> Self {
        Self::Point { x, y }
    }

    pub fn size(width: f64, height: f64) -> Self {
        Self::Size { width, height }
    }

    pub fn rect(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::Rect {
            x,
            y,
            width,
            height,
        }
    }

    pub fn color(rgba: [f32; 4]) -> Self {
        Self::Color { rgba }
    }

    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            Self::Scalar { value } => Some(*value),
            _ => None,
        }
    }

    pub fn as_point(&self) -> Option<(f64, f64)> {
        match self {
            Self::Point { x, y } => Some((*x, *y)),
            _ => None,
        }
    }

    pub fn as_color(&self) -> Option<[f32; 4]> {
        match self {
            Self::Color { rgba } => Some(*rgba),
            _ => None,
        }
    }

    pub fn as_transform(&self) -> Option<Transform2D> {
        match self {
            Self::Transform { transform } => Some(*transform),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool { value } => Some(*value),
            _ => None,
        }
    }

    /// Whether `self` and `other` are the same variant.
    pub fn same_kind(&self, other: &Self) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }

    /// Variant name, for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Scalar { .. } => "scalar",
            Self::Point { .. } => "point",
            Self::Size { .. } => "size",
            Self::Rect { .. } => "rect",
            Self::Color { .. } => "color",
            Self::Transform { .. } => "transform",
            Self::Bool { .. } => "bool",
        }
    }
}

impl From<f64> for AnimationValue {
    fn from(value: f64) -> Self {
        Self::Scalar { value }
    }
}

impl From<bool> for AnimationValue {
    fn from(value: bool) -> Self {
        Self::Bool { value }
    }
}

impl From<Transform2D> for AnimationValue {
    fn from(transform: Transform2D) -> Self {
        Self::Transform { transform }
    }
}
