//! Interpolation of animatable values.
//!
//! [`Interpolate`] blends a `from` value towards a `to` value by a factor
//! `t`. Factors outside `[0, 1]` extrapolate, which is what overshooting
//! curves rely on.

use tracing::warn;

use super::types::{AnimationValue, Transform2D};

/// Types that can be blended between two values.
pub trait Interpolate: Sized {
    /// Blend from `self` towards `to`.
    ///
    /// `t = 0.0` returns `self`, `t = 1.0` returns `to`.
    fn interpolate(&self, to: &Self, t: f64) -> Self;
}

#[inline]
fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t
}

#[inline]
fn lerp_f32(from: f32, to: f32, t: f64) -> f32 {
    from + (to - from) * t as f32
}

impl Interpolate for f64 {
    fn interpolate(&self, to: &Self, t: f64) -> Self {
        lerp(*self, *to, t)
    }
}

impl Interpolate for f32 {
    fn interpolate(&self, to: &Self, t: f64) -> Self {
        lerp_f32(*self, *to, t)
    }
}

impl Interpolate for bool {
    fn interpolate(&self, to: &Self, t: f64) -> Self {
        if t < 0.5 { *self } else { *to }
    }
}

impl Interpolate for [f32; 4] {
    /// Per-component blend in linear RGB.
    fn interpolate(&self, to: &Self, t: f64) -> Self {
        [
            lerp_f32(self[0], to[0], t),
            lerp_f32(self[1], to[1], t),
            lerp_f32(self[2], to[2], t),
            lerp_f32(self[3], to[3], t),
        ]
    }
}

impl Interpolate for Transform2D {
    fn interpolate(&self, to: &Self, t: f64) -> Self {
        Self {
            translate_x: lerp(self.translate_x, to.translate_x, t),
            translate_y: lerp(self.translate_y, to.translate_y, t),
            scale_x: lerp(self.scale_x, to.scale_x, t),
            scale_y: lerp(self.scale_y, to.scale_y, t),
            rotate: lerp(self.rotate, to.rotate, t),
        }
    }
}

impl Interpolate for AnimationValue {
    /// Blend two values of the same variant.
    ///
    /// Mismatched variants cannot blend; the result is `self` unchanged.
    fn interpolate(&self, to: &Self, t: f64) -> Self {
        match (self, to) {
            (Self::Scalar { value: a }, Self::Scalar { value: b }) => Self::Scalar {
                value: lerp(*a, *b, t),
            },
            (Self::Point { x: x1, y: y1 }, Self::Point { x: x2, y: y2 }) => Self::Point {
                x: lerp(*x1, *x2, t),
                y: lerp(*y1, *y2, t),
            },
            (
                Self::Size {
                    width: w1,
                    height: h1,
                },
                Self::Size {
                    width: w2,
                    height: h2,
                },
            ) => Self::Size {
                width: lerp(*w1, *w2, t),
                height: lerp(*h1, *h2, t),
            },
            (
                Self::Rect {
                    x: x1,
                    y: y1,
                    width: w1,
                    height: h1,
                },
                Self::Rect {
                    x: x2,
                    y: y2,
                    width: w2,
                    height: h2,
                },
            ) => Self::Rect {
                x: lerp(*x1, *x2, t),
                y: lerp(*y1, *y2, t),
                width: lerp(*w1, *w2, t),
                height: lerp(*h1, *h2, t),
            },
            (Self::Color { rgba: a }, Self::Color { rgba: b }) => Self::Color {
                rgba: a.interpolate(b, t),
            },
            (Self::Transform { transform: a }, Self::Transform { transform: b }) => {
                Self::Transform {
                    transform: a.interpolate(b, t),
                }
            }
            (Self::Bool { value: a }, Self::Bool { value: b }) => Self::Bool {
                value: a.interpolate(b, t),
            },
            _ => {
                warn!(
                    from = self.kind_name(),
                    to = to.kind_name(),
                    "cannot interpolate between value kinds"
                );
                self.clone()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn test_scalar_interpolation() {
        assert!(approx_eq(0.0_f64.interpolate(&100.0, 0.25), 25.0));
        assert!(approx_eq(10.0_f64.interpolate(&20.0, 1.0), 20.0));
    }

    #[test]
    fn test_extrapolation() {
        assert!(approx_eq(0.0_f64.interpolate(&100.0, 1.5), 150.0));
        assert!(approx_eq(0.0_f64.interpolate(&100.0, -0.5), -50.0));
    }

    #[test]
    fn test_bool_switches_at_midpoint() {
        assert!(!false.interpolate(&true, 0.49));
        assert!(false.interpolate(&true, 0.5));
    }

    #[test]
    fn test_transform_interpolation() {
        let from = Transform2D::default();
        let to = Transform2D {
            translate_x: 10.0,
            translate_y: -10.0,
            scale_x: 2.0,
            scale_y: 3.0,
            rotate: 1.0,
        };
        let mid = from.interpolate(&to, 0.5);
        assert!(approx_eq(mid.translate_x, 5.0));
        assert!(approx_eq(mid.translate_y, -5.0));
        assert!(approx_eq(mid.scale_x, 1.5));
        assert!(approx_eq(mid.scale_y, 2.0));
        assert!(approx_eq(mid.rotate, 0.5));
    }

    #[test]
    fn test_animation_value_interpolation() {
        let from = AnimationValue::point(0.0, 0.0);
        let to = AnimationValue::point(10.0, 20.0);
        assert_eq!(from.interpolate(&to, 0.5), AnimationValue::point(5.0, 10.0));

        let from = AnimationValue::color([1.0, 0.0, 0.0, 1.0]);
        let to = AnimationValue::color([0.0, 0.0, 1.0, 1.0]);
        let rgba = from.interpolate(&to, 0.5).as_color().unwrap();
        assert!((rgba[0] - 0.5).abs() < 1e-6);
        assert!((rgba[2] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_animation_value_type_mismatch() {
        let from = AnimationValue::scalar(50.0);
        let to = AnimationValue::size(1.0, 1.0);
        assert_eq!(from.interpolate(&to, 0.5), from);
    }
}
