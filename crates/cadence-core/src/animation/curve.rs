//! Timing curves for animation progress.
//!
//! A [`Curve`] maps linear progress in `[0, 1]` to eased progress. Curves are
//! immutable and `Arc`-backed, so one curve can be shared by any number of
//! nodes (and threads).
//!
//! Curves compose:
//! - [`Curve::guarded`] saturates inputs outside `(0, 1)` to exactly 0 or 1
//! - [`Curve::reversed`] mirrors a curve (`t → 1 − f(1 − t)`)
//! - [`Curve::add`] (also `a | b`) runs `a` over the first half and `b` over the second
//! - [`Curve::or`], [`Curve::multiply`] and [`Curve::delta`] blend two curves
//!
//! # Usage
//!
//! ```
//! use cadence_core::animation::curve::{Curve, CurvePreset};
//!
//! let ease = Curve::ease_in_out_cubic();
//! let progress = ease.transform(0.5);
//!
//! let custom = Curve::cubic_bezier(0.4, 0.0, 0.2, 1.0).guarded();
//! let progress = custom.transform(0.5);
//!
//! let named: Curve = "ease_out_bounce".parse::<CurvePreset>().unwrap().into();
//! ```

use std::f64::consts::PI;
use std::fmt;
use std::ops::BitOr;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Fixed number of Newton-Raphson steps used to invert a Bezier x polynomial.
const NEWTON_ITERATIONS: usize = 10;

type CurveFn = dyn Fn(f64) -> f64 + Send + Sync;

/// An immutable progress transform.
#[derive(Clone)]
pub struct Curve {
    f: Arc<CurveFn>,
}

static_assertions::assert_impl_all!(Curve: Send, Sync, Clone);

impl fmt::Debug for Curve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Curve").finish_non_exhaustive()
    }
}

impl Default for Curve {
    fn default() -> Self {
        Self::linear()
    }
}

impl Curve {
    /// Wrap an arbitrary transform.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(f64) -> f64 + Send + Sync + 'static,
    {
        Self { f: Arc::new(f) }
    }

    /// Evaluate the curve at progress `t`.
    ///
    /// The output may leave `[0, 1]` for overshooting curves (elastic, back).
    #[inline]
    pub fn transform(&self, t: f64) -> f64 {
        (self.f)(t)
    }

    // ========================================================================
    // Combinators
    // ========================================================================

    /// Saturate inputs: `t <= 0` yields exactly 0, `t >= 1` yields exactly 1.
    pub fn guarded(&self) -> Self {
        let inner = self.clone();
        Self::new(move |t| {
            if t <= 0.0 {
                0.0
            } else if t >= 1.0 {
                1.0
            } else {
                inner.transform(t)
            }
        })
    }

    /// Mirror the curve around the centre: `t → 1 − f(1 − t)`.
    pub fn reversed(&self) -> Self {
        let inner = self.clone();
        Self::new(move |t| 1.0 - inner.transform(1.0 - t))
    }

    /// Split the domain: `self` drives the first half, `other` the second.
    pub fn add(&self, other: &Curve) -> Self {
        let first = self.clone();
        let second = other.clone();
        Self::new(move |t| {
            if t < 0.5 {
                first.transform(t * 2.0) / 2.0
            } else {
                second.transform((t - 0.5) * 2.0) / 2.0 + 0.5
            }
        })
    }

    /// Sum both curves' deviations from linear on top of a linear baseline.
    pub fn or(&self, other: &Curve) -> Self {
        let linear = Curve::linear();
        let a = self.delta(&linear);
        let b = other.delta(&linear);
        Self::new(move |t| a.transform(t) + b.transform(t) + linear.transform(t))
    }

    /// Feed this curve's output into `other`: `t → other(self(t))`.
    pub fn multiply(&self, other: &Curve) -> Self {
        let inner = self.clone();
        let outer = other.clone();
        Self::new(move |t| outer.transform(inner.transform(t)))
    }

    /// Pointwise difference: `t → self(t) − other(t)`.
    pub fn delta(&self, other: &Curve) -> Self {
        let a = self.clone();
        let b = other.clone();
        Self::new(move |t| a.transform(t) - b.transform(t))
    }

    /// Cubic Bezier with endpoints fixed at `(0, 0)` and `(1, 1)`.
    ///
    /// The result is unguarded: call [`Curve::guarded`] for exact endpoints.
    pub fn cubic_bezier(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        let cx = bezier_coefficients(x1, x2);
        let cy = bezier_coefficients(y1, y2);
        Self::new(move |x| {
            let t = solve_bezier_x(&cx, x);
            polynomial(&cy, t)
        })
    }

    // ========================================================================
    // Presets
    // ========================================================================

    pub fn linear() -> Self {
        Self::new(|t| t).guarded()
    }

    /// Steps from 0 to 1 at the midpoint.
    pub fn boolean() -> Self {
        Self::new(|t| if t < 0.5 { 0.0 } else { 1.0 }).guarded()
    }

    /// `1 − t`. Note that the guard still pins the endpoints to 0 and 1.
    pub fn inverse() -> Self {
        Self::new(|t| 1.0 - t).guarded()
    }

    pub fn ease_default() -> Self {
        Self::cubic_bezier(0.25, 0.1, 0.25, 1.0).guarded()
    }

    pub fn ease_in() -> Self {
        Self::cubic_bezier(0.42, 0.0, 1.0, 1.0).guarded()
    }

    pub fn ease_out() -> Self {
        Self::cubic_bezier(0.0, 0.0, 0.58, 1.0).guarded()
    }

    pub fn ease_in_out() -> Self {
        Self::cubic_bezier(0.42, 0.0, 0.58, 1.0).guarded()
    }

    pub fn ease_in_quad() -> Self {
        Self::new(|t| t.powi(2)).guarded()
    }

    pub fn ease_out_quad() -> Self {
        Self::new(|t| -t * (t - 2.0)).guarded()
    }

    pub fn ease_in_out_quad() -> Self {
        in_out(Self::ease_in_quad(), Self::ease_out_quad())
    }

    pub fn ease_in_cubic() -> Self {
        Self::new(|t| t.powi(3)).guarded()
    }

    pub fn ease_out_cubic() -> Self {
        Self::new(|t| (t - 1.0).powi(3) + 1.0).guarded()
    }

    pub fn ease_in_out_cubic() -> Self {
        in_out(Self::ease_in_cubic(), Self::ease_out_cubic())
    }

    pub fn ease_in_quart() -> Self {
        Self::new(|t| t.powi(4)).guarded()
    }

    pub fn ease_out_quart() -> Self {
        Self::new(|t| -((t - 1.0).powi(4) - 1.0)).guarded()
    }

    pub fn ease_in_out_quart() -> Self {
        in_out(Self::ease_in_quart(), Self::ease_out_quart())
    }

    pub fn ease_in_quint() -> Self {
        Self::new(|t| t.powi(5)).guarded()
    }

    pub fn ease_out_quint() -> Self {
        Self::new(|t| (t - 1.0).powi(5) + 1.0).guarded()
    }

    pub fn ease_in_out_quint() -> Self {
        in_out(Self::ease_in_quint(), Self::ease_out_quint())
    }

    pub fn ease_in_sine() -> Self {
        Self::new(|t| -(t * PI / 2.0).cos() + 1.0).guarded()
    }

    pub fn ease_out_sine() -> Self {
        Self::new(|t| (t * PI / 2.0).sin()).guarded()
    }

    pub fn ease_in_out_sine() -> Self {
        Self::new(|t| -0.5 * (PI * t).cos() + 0.5).guarded()
    }

    pub fn ease_in_expo() -> Self {
        Self::new(|t| if t == 0.0 { 0.0 } else { 2f64.powf(10.0 * (t - 1.0)) }).guarded()
    }

    pub fn ease_out_expo() -> Self {
        Self::new(|t| -(2f64.powf(-10.0 * t)) + 1.0).guarded()
    }

    pub fn ease_in_out_expo() -> Self {
        in_out(Self::ease_in_expo(), Self::ease_out_expo())
    }

    pub fn ease_in_circ() -> Self {
        Self::new(|t| -((1.0 - t.powi(2)).sqrt() - 1.0)).guarded()
    }

    pub fn ease_out_circ() -> Self {
        Self::new(|t| (1.0 - (t - 1.0).powi(2)).sqrt()).guarded()
    }

    pub fn ease_in_out_circ() -> Self {
        in_out(Self::ease_in_circ(), Self::ease_out_circ())
    }

    pub fn ease_in_elastic() -> Self {
        Self::new(|t| {
            let (amplitude, period) = (1.0, 0.3);
            let shift = elastic_shift(amplitude, period);
            let t = t - 1.0;
            -(amplitude * 2f64.powf(10.0 * t) * ((t - shift) * (2.0 * PI) / period).sin())
        })
        .guarded()
    }

    pub fn ease_out_elastic() -> Self {
        Self::new(|t| {
            let (amplitude, period) = (1.0, 0.3);
            let shift = elastic_shift(amplitude, period);
            amplitude * 2f64.powf(-10.0 * t) * ((t - shift) * (2.0 * PI) / period).sin() + 1.0
        })
        .guarded()
    }

    pub fn ease_in_out_elastic() -> Self {
        Self::new(|t| {
            let (amplitude, period) = (1.0, 0.3 * 1.5);
            let shift = elastic_shift(amplitude, period);
            let scaled = t / 0.5;
            let t = scaled - 1.0;
            let wave = ((t - shift) * (2.0 * PI) / period).sin();
            if scaled < 1.0 {
                -0.5 * (amplitude * 2f64.powf(10.0 * t) * wave)
            } else {
                amplitude * 2f64.powf(-10.0 * t) * wave * 0.5 + 1.0
            }
        })
        .guarded()
    }

    pub fn ease_in_back() -> Self {
        Self::new(|t| t * t * (2.70158 * t - 1.70158)).guarded()
    }

    pub fn ease_out_back() -> Self {
        Self::new(|t| {
            let n = t - 1.0;
            n * n * (2.70158 * n + 1.70158) + 1.0
        })
        .guarded()
    }

    pub fn ease_in_out_back() -> Self {
        in_out(Self::ease_in_back(), Self::ease_out_back())
    }

    pub fn ease_in_bounce() -> Self {
        Self::new(|t| 1.0 - bounce_out(1.0 - t)).guarded()
    }

    pub fn ease_out_bounce() -> Self {
        Self::new(bounce_out).guarded()
    }

    pub fn ease_in_out_bounce() -> Self {
        in_out(Self::ease_in_bounce(), Self::ease_out_bounce())
    }
}

/// `a | b` is [`Curve::add`]: `a` over the first half, `b` over the second.
impl BitOr for Curve {
    type Output = Curve;

    fn bitor(self, rhs: Curve) -> Curve {
        self.add(&rhs)
    }
}

impl BitOr for &Curve {
    type Output = Curve;

    fn bitor(self, rhs: &Curve) -> Curve {
        self.add(rhs)
    }
}

fn in_out(ease_in: Curve, ease_out: Curve) -> Curve {
    (ease_in | ease_out).guarded()
}

fn elastic_shift(amplitude: f64, period: f64) -> f64 {
    if amplitude < 1.0 {
        period / 4.0
    } else {
        period / (2.0 * PI) * (1.0 / amplitude).asin()
    }
}

fn bounce_out(t: f64) -> f64 {
    const K: f64 = 7.5625;
    if t < 1.0 / 2.75 {
        K * t * t
    } else if t < 2.0 / 2.75 {
        let t = t - 1.5 / 2.75;
        K * t * t + 0.75
    } else if t < 2.5 / 2.75 {
        let t = t - 2.25 / 2.75;
        K * t * t + 0.9375
    } else {
        let t = t - 2.625 / 2.75;
        K * t * t + 0.984375
    }
}

/// Power-basis coefficients of one Bezier axis with endpoints 0 and 1.
fn bezier_coefficients(p1: f64, p2: f64) -> [f64; 4] {
    let (p0, p3) = (0.0, 1.0);
    [
        p0,
        -3.0 * p0 + 3.0 * p1,
        3.0 * p0 - 6.0 * p1 + 3.0 * p2,
        -p0 + 3.0 * p1 - 3.0 * p2 + p3,
    ]
}

#[inline]
fn polynomial(c: &[f64; 4], t: f64) -> f64 {
    c[0] + t * c[1] + t * t * c[2] + t * t * t * c[3]
}

#[inline]
fn polynomial_derivative(c: &[f64; 4], t: f64) -> f64 {
    c[1] + 2.0 * t * c[2] + 3.0 * t * t * c[3]
}

/// Solve `x(t) = x` with a fixed Newton-Raphson schedule seeded at `t = x`.
///
/// A diverging solve (NaN) resolves to full progress.
fn solve_bezier_x(cx: &[f64; 4], x: f64) -> f64 {
    let mut t = x;
    for _ in 0..NEWTON_ITERATIONS {
        let error = polynomial(cx, t) - x;
        t -= error / polynomial_derivative(cx, t);
    }
    if t.is_nan() { 1.0 } else { t }
}

// ============================================================================
// Named presets
// ============================================================================

/// Serializable name of a built-in curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurvePreset {
    Linear,
    Boolean,
    Inverse,
    EaseDefault,
    EaseIn,
    EaseOut,
    EaseInOut,
    EaseInQuad,
    EaseOutQuad,
    EaseInOutQuad,
    EaseInCubic,
    EaseOutCubic,
    EaseInOutCubic,
    EaseInQuart,
    EaseOutQuart,
    EaseInOutQuart,
    EaseInQuint,
    EaseOutQuint,
    EaseInOutQuint,
    EaseInSine,
    EaseOutSine,
    EaseInOutSine,
    EaseInExpo,
    EaseOutExpo,
    EaseInOutExpo,
    EaseInCirc,
    EaseOutCirc,
    EaseInOutCirc,
    EaseInElastic,
    EaseOutElastic,
    EaseInOutElastic,
    EaseInBack,
    EaseOutBack,
    EaseInOutBack,
    EaseInBounce,
    EaseOutBounce,
    EaseInOutBounce,
}

impl Default for CurvePreset {
    fn default() -> Self {
        Self::Linear
    }
}

impl CurvePreset {
    /// Every preset, in declaration order.
    pub const ALL: [CurvePreset; 37] = [
        Self::Linear,
        Self::Boolean,
        Self::Inverse,
        Self::EaseDefault,
        Self::EaseIn,
        Self::EaseOut,
        Self::EaseInOut,
        Self::EaseInQuad,
        Self::EaseOutQuad,
        Self::EaseInOutQuad,
        Self::EaseInCubic,
        Self::EaseOutCubic,
        Self::EaseInOutCubic,
        Self::EaseInQuart,
        Self::EaseOutQuart,
        Self::EaseInOutQuart,
        Self::EaseInQuint,
        Self::EaseOutQuint,
        Self::EaseInOutQuint,
        Self::EaseInSine,
        Self::EaseOutSine,
        Self::EaseInOutSine,
        Self::EaseInExpo,
        Self::EaseOutExpo,
        Self::EaseInOutExpo,
        Self::EaseInCirc,
        Self::EaseOutCirc,
        Self::EaseInOutCirc,
        Self::EaseInElastic,
        Self::EaseOutElastic,
        Self::EaseInOutElastic,
        Self::EaseInBack,
        Self::EaseOutBack,
        Self::EaseInOutBack,
        Self::EaseInBounce,
        Self::EaseOutBounce,
        Self::EaseInOutBounce,
    ];

    /// The snake_case name used in configuration files.
    pub fn name(self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::Boolean => "boolean",
            Self::Inverse => "inverse",
            Self::EaseDefault => "ease_default",
            Self::EaseIn => "ease_in",
            Self::EaseOut => "ease_out",
            Self::EaseInOut => "ease_in_out",
            Self::EaseInQuad => "ease_in_quad",
            Self::EaseOutQuad => "ease_out_quad",
            Self::EaseInOutQuad => "ease_in_out_quad",
            Self::EaseInCubic => "ease_in_cubic",
            Self::EaseOutCubic => "ease_out_cubic",
            Self::EaseInOutCubic => "ease_in_out_cubic",
            Self::EaseInQuart => "ease_in_quart",
            Self::EaseOutQuart => "ease_out_quart",
            Self::EaseInOutQuart => "ease_in_out_quart",
            Self::EaseInQuint => "ease_in_quint",
            Self::EaseOutQuint => "ease_out_quint",
            Self::EaseInOutQuint => "ease_in_out_quint",
            Self::EaseInSine => "ease_in_sine",
            Self::EaseOutSine => "ease_out_sine",
            Self::EaseInOutSine => "ease_in_out_sine",
            Self::EaseInExpo => "ease_in_expo",
            Self::EaseOutExpo => "ease_out_expo",
            Self::EaseInOutExpo => "ease_in_out_expo",
            Self::EaseInCirc => "ease_in_circ",
            Self::EaseOutCirc => "ease_out_circ",
            Self::EaseInOutCirc => "ease_in_out_circ",
            Self::EaseInElastic => "ease_in_elastic",
            Self::EaseOutElastic => "ease_out_elastic",
            Self::EaseInOutElastic => "ease_in_out_elastic",
            Self::EaseInBack => "ease_in_back",
            Self::EaseOutBack => "ease_out_back",
            Self::EaseInOutBack => "ease_in_out_back",
            Self::EaseInBounce => "ease_in_bounce",
            Self::EaseOutBounce => "ease_out_bounce",
            Self::EaseInOutBounce => "ease_in_out_bounce",
        }
    }

    /// Build the curve this preset names.
    pub fn curve(self) -> Curve {
        match self {
            Self::Linear => Curve::linear(),
            Self::Boolean => Curve::boolean(),
            Self::Inverse => Curve::inverse(),
            Self::EaseDefault => Curve::ease_default(),
            Self::EaseIn => Curve::ease_in(),
            Self::EaseOut => Curve::ease_out(),
            Self::EaseInOut => Curve::ease_in_out(),
            Self::EaseInQuad => Curve::ease_in_quad(),
            Self::EaseOutQuad => Curve::ease_out_quad(),
            Self::EaseInOutQuad => Curve::ease_in_out_quad(),
            Self::EaseInCubic => Curve::ease_in_cubic(),
            Self::EaseOutCubic => Curve::ease_out_cubic(),
            Self::EaseInOutCubic => Curve::ease_in_out_cubic(),
            Self::EaseInQuart => Curve::ease_in_quart(),
            Self::EaseOutQuart => Curve::ease_out_quart(),
            Self::EaseInOutQuart => Curve::ease_in_out_quart(),
            Self::EaseInQuint => Curve::ease_in_quint(),
            Self::EaseOutQuint => Curve::ease_out_quint(),
            Self::EaseInOutQuint => Curve::ease_in_out_quint(),
            Self::EaseInSine => Curve::ease_in_sine(),
            Self::EaseOutSine => Curve::ease_out_sine(),
            Self::EaseInOutSine => Curve::ease_in_out_sine(),
            Self::EaseInExpo => Curve::ease_in_expo(),
            Self::EaseOutExpo => Curve::ease_out_expo(),
            Self::EaseInOutExpo => Curve::ease_in_out_expo(),
            Self::EaseInCirc => Curve::ease_in_circ(),
            Self::EaseOutCirc => Curve::ease_out_circ(),
            Self::EaseInOutCirc => Curve::ease_in_out_circ(),
            Self::EaseInElastic => Curve::ease_in_elastic(),
            Self::EaseOutElastic => Curve::ease_out_elastic(),
            Self::EaseInOutElastic => Curve::ease_in_out_elastic(),
            Self::EaseInBack => Curve::ease_in_back(),
            Self::EaseOutBack => Curve::ease_out_back(),
            Self::EaseInOutBack => Curve::ease_in_out_back(),
            Self::EaseInBounce => Curve::ease_in_bounce(),
            Self::EaseOutBounce => Curve::ease_out_bounce(),
            Self::EaseInOutBounce => Curve::ease_in_out_bounce(),
        }
    }
}

impl From<CurvePreset> for Curve {
    fn from(preset: CurvePreset) -> Self {
        preset.curve()
    }
}

impl fmt::Display for CurvePreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unknown curve name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown curve preset: {0}")]
pub struct UnknownCurve(pub String);

impl FromStr for CurvePreset {
    type Err = UnknownCurve;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().replace('-', "_").to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|preset| preset.name() == wanted)
            .ok_or_else(|| UnknownCurve(s.to_string()))
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
    fn test_guarded_endpoints_are_exact() {
        for preset in CurvePreset::ALL {
            let curve = preset.curve().guarded();
            assert_eq!(curve.transform(0.0), 0.0, "{preset} at 0");
            assert_eq!(curve.transform(1.0), 1.0, "{preset} at 1");
            assert_eq!(curve.transform(-3.0), 0.0, "{preset} below range");
            assert_eq!(curve.transform(7.0), 1.0, "{preset} above range");
        }
    }

    #[test]
    fn test_linear_is_identity() {
        let linear = Curve::linear();
        for i in 0..=100 {
            let t = i as f64 / 100.0;
            assert_eq!(linear.transform(t), t);
        }
    }

    #[test]
    fn test_reversed_twice_restores_curve() {
        let curves = [
            Curve::new(|t| t * t),
            Curve::new(|t| (t * PI / 2.0).sin()),
            Curve::cubic_bezier(0.25, 0.1, 0.25, 1.0),
        ];
        for curve in curves {
            let twice = curve.reversed().reversed();
            for i in 0..=20 {
                let t = i as f64 / 20.0;
                assert!(approx_eq(twice.transform(t), curve.transform(t)));
            }
        }
    }

    #[test]
    fn test_reversed_mirrors() {
        let quad = Curve::new(|t| t * t);
        let mirrored = quad.reversed();
        // 1 - (1 - 0.25)^2
        assert!(approx_eq(mirrored.transform(0.25), 0.4375));
    }

    #[test]
    fn test_add_splits_domain() {
        let first = Curve::new(|_| 0.2);
        let second = Curve::new(|_| 0.6);
        let split = first.add(&second);
        assert!(approx_eq(split.transform(0.1), 0.1));
        assert!(approx_eq(split.transform(0.49), 0.1));
        assert!(approx_eq(split.transform(0.5), 0.8));
        assert!(approx_eq(split.transform(0.9), 0.8));

        let piped = &first | &second;
        assert!(approx_eq(piped.transform(0.75), 0.8));
    }

    #[test]
    fn test_or_keeps_literal_formula() {
        let a = Curve::new(|t| t * t);
        let b = Curve::new(|t| t.sqrt());
        let blended = a.or(&b);
        let t: f64 = 0.25;
        let expected = (t * t - t) + (t.sqrt() - t) + t;
        assert!(approx_eq(blended.transform(t), expected));
    }

    #[test]
    fn test_multiply_composes() {
        let double = Curve::new(|t| t * 2.0);
        let square = Curve::new(|t| t * t);
        assert!(approx_eq(double.multiply(&square).transform(0.3), 0.36));
        assert!(approx_eq(square.multiply(&double).transform(0.3), 0.18));
    }

    #[test]
    fn test_delta() {
        let quad = Curve::new(|t| t * t);
        let diff = quad.delta(&Curve::linear());
        assert!(approx_eq(diff.transform(0.5), -0.25));
    }

    #[test]
    fn test_bezier_identity_control_points() {
        let curve = Curve::cubic_bezier(1.0 / 3.0, 1.0 / 3.0, 2.0 / 3.0, 2.0 / 3.0);
        for t in [0.1, 0.3, 0.5, 0.7, 0.9] {
            assert!((curve.transform(t) - t).abs() < 1e-6);
        }
    }

    #[test]
    fn test_ease_in_out_is_symmetric() {
        let ease = Curve::ease_in_out();
        assert!((ease.transform(0.5) - 0.5).abs() < 1e-6);
        let early = ease.transform(0.25);
        let late = ease.transform(0.75);
        assert!((early + late - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_ease_in_and_out_shapes() {
        assert!(Curve::ease_in().transform(0.25) < 0.25);
        assert!(Curve::ease_out().transform(0.25) > 0.25);
        let mid = Curve::ease_default().transform(0.5);
        assert!(mid > 0.7 && mid < 0.9, "ease default mid-point was {mid}");
    }

    #[test]
    fn test_bezier_nan_falls_back_to_full_progress() {
        // x(t) is flat everywhere, so every Newton step divides by zero.
        let flat = [0.0; 4];
        assert_eq!(solve_bezier_x(&flat, 0.5), 1.0);
    }

    #[test]
    fn test_overshooting_presets() {
        let back = Curve::ease_in_back();
        assert!(back.transform(0.2) < 0.0);
        let out_back = Curve::ease_out_back();
        assert!(out_back.transform(0.8) > 1.0);
        let elastic = Curve::ease_out_elastic();
        assert!(elastic.transform(0.1) > 1.0);
    }

    #[test]
    fn test_polynomial_presets() {
        assert!(approx_eq(Curve::ease_in_quad().transform(0.5), 0.25));
        assert!(approx_eq(Curve::ease_out_quad().transform(0.5), 0.75));
        assert!(approx_eq(Curve::ease_in_cubic().transform(0.5), 0.125));
        assert!(approx_eq(Curve::ease_out_quint().transform(0.5), 0.96875));
        assert!(approx_eq(Curve::ease_in_out_sine().transform(0.5), 0.5));
    }

    #[test]
    fn test_in_out_uses_split() {
        let in_out = Curve::ease_in_out_quad();
        // first half: ease_in_quad(0.5) / 2
        assert!(approx_eq(in_out.transform(0.25), 0.125));
        // second half: ease_out_quad(0.5) / 2 + 0.5
        assert!(approx_eq(in_out.transform(0.75), 0.875));
    }

    #[test]
    fn test_bounce() {
        let bounce = Curve::ease_out_bounce();
        assert!(approx_eq(bounce.transform(0.2), 7.5625 * 0.04));
        let bounce_in = Curve::ease_in_bounce();
        assert!(approx_eq(bounce_in.transform(0.8), 1.0 - 7.5625 * 0.04));
    }

    #[test]
    fn test_boolean_steps_at_half() {
        let boolean = Curve::boolean();
        assert_eq!(boolean.transform(0.49), 0.0);
        assert_eq!(boolean.transform(0.5), 1.0);
    }

    #[test]
    fn test_preset_parse() {
        assert_eq!("ease_in_out_back".parse(), Ok(CurvePreset::EaseInOutBack));
        assert_eq!("Ease-Out-Expo".parse(), Ok(CurvePreset::EaseOutExpo));
        assert!("wobble".parse::<CurvePreset>().is_err());
        for preset in CurvePreset::ALL {
            assert_eq!(preset.name().parse(), Ok(preset));
        }
    }

    #[test]
    fn test_preset_serde_names() {
        let json = serde_json::to_string(&CurvePreset::EaseInOutElastic).unwrap();
        assert_eq!(json, "\"ease_in_out_elastic\"");
        let parsed: CurvePreset = serde_json::from_str("\"ease_out_circ\"").unwrap();
        assert_eq!(parsed, CurvePreset::EaseOutCirc);
    }

    #[test]
    fn test_default() {
        assert_eq!(CurvePreset::default(), CurvePreset::Linear);
        assert_eq!(Curve::default().transform(0.3), 0.3);
    }
}
