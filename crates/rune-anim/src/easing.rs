//! Easing curves for animation timing.
//!
//! Every curve maps normalized progress to normalized progress and satisfies
//! `f(0) = 0` and `f(1) = 1`. Inputs are not clamped and the back and elastic
//! families overshoot, so callers must accept outputs outside `[0, 1]`.
//!
//! ```
//! use rune_anim::easing::{Easing, cubic_out};
//!
//! let eased = Easing::CubicOut.evaluate(0.5);
//! assert_eq!(eased, cubic_out(0.5));
//! ```

use std::f64::consts::PI;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValueError;

pub const DEFAULT_OVERSHOOT: f64 = 1.70158;
pub const DEFAULT_AMPLITUDE: f64 = 1.0;
pub const DEFAULT_PERIOD: f64 = 0.45;

/// A named easing curve.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Easing {
    #[default]
    Linear,
    QuadraticIn,
    QuadraticOut,
    QuadraticInOut,
    CubicIn,
    CubicOut,
    CubicInOut,
    /// Pulls back below 0 before accelerating to 1.
    BackIn { overshoot: f64 },
    /// Shoots past 1 before settling.
    BackOut { overshoot: f64 },
    ElasticIn { amplitude: f64, period: f64 },
    ElasticOut { amplitude: f64, period: f64 },
    /// Caller-supplied curve. Not serializable.
    #[serde(skip)]
    Custom(fn(f64) -> f64),
}

impl Easing {
    pub fn back_in() -> Self {
        Self::BackIn {
            overshoot: DEFAULT_OVERSHOOT,
        }
    }

    pub fn back_out() -> Self {
        Self::BackOut {
            overshoot: DEFAULT_OVERSHOOT,
        }
    }

    pub fn elastic_in() -> Self {
        Self::ElasticIn {
            amplitude: DEFAULT_AMPLITUDE,
            period: DEFAULT_PERIOD,
        }
    }

    pub fn elastic_out() -> Self {
        Self::ElasticOut {
            amplitude: DEFAULT_AMPLITUDE,
            period: DEFAULT_PERIOD,
        }
    }

    /// Evaluate the curve at `p`.
    pub fn evaluate(&self, p: f64) -> f64 {
        match *self {
            Self::Linear => linear(p),
            Self::QuadraticIn => quadratic_in(p),
            Self::QuadraticOut => quadratic_out(p),
            Self::QuadraticInOut => quadratic_in_out(p),
            Self::CubicIn => cubic_in(p),
            Self::CubicOut => cubic_out(p),
            Self::CubicInOut => cubic_in_out(p),
            Self::BackIn { overshoot } => back_in(p, overshoot),
            Self::BackOut { overshoot } => back_out(p, overshoot),
            Self::ElasticIn { amplitude, period } => elastic_in(p, amplitude, period),
            Self::ElasticOut { amplitude, period } => elastic_out(p, amplitude, period),
            Self::Custom(f) => f(p),
        }
    }
}

impl FromStr for Easing {
    type Err = ValueError;

    /// Parse a kebab-case curve name. Parameterized curves get their defaults.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim() {
            "linear" => Self::Linear,
            "quadratic-in" => Self::QuadraticIn,
            "quadratic-out" => Self::QuadraticOut,
            "quadratic-in-out" => Self::QuadraticInOut,
            "cubic-in" => Self::CubicIn,
            "cubic-out" => Self::CubicOut,
            "cubic-in-out" => Self::CubicInOut,
            "back-in" => Self::back_in(),
            "back-out" => Self::back_out(),
            "elastic-in" => Self::elastic_in(),
            "elastic-out" => Self::elastic_out(),
            other => return Err(ValueError::UnknownEasing(other.to_string())),
        })
    }
}

pub fn linear(p: f64) -> f64 {
    p
}

/// `p^n`
pub fn poly_in(p: f64, n: i32) -> f64 {
    p.powi(n)
}

/// `1 − (1 − p)^n`
pub fn poly_out(p: f64, n: i32) -> f64 {
    1.0 - (1.0 - p).powi(n)
}

/// `poly_in` on the first half and `poly_out` on the second, each scaled by ½.
pub fn poly_in_out(p: f64, n: i32) -> f64 {
    if p < 0.5 {
        poly_in(p * 2.0, n) / 2.0
    } else {
        0.5 + poly_out(p * 2.0 - 1.0, n) / 2.0
    }
}

pub fn quadratic_in(p: f64) -> f64 {
    poly_in(p, 2)
}

pub fn quadratic_out(p: f64) -> f64 {
    poly_out(p, 2)
}

pub fn quadratic_in_out(p: f64) -> f64 {
    poly_in_out(p, 2)
}

pub fn cubic_in(p: f64) -> f64 {
    poly_in(p, 3)
}

pub fn cubic_out(p: f64) -> f64 {
    poly_out(p, 3)
}

pub fn cubic_in_out(p: f64) -> f64 {
    poly_in_out(p, 3)
}

/// `p²((s + 1)p − s)` where `s` is the overshoot.
pub fn back_in(p: f64, overshoot: f64) -> f64 {
    if p == 0.0 || p == 1.0 {
        return p;
    }
    p * p * ((overshoot + 1.0) * p - overshoot)
}

pub fn back_out(p: f64, overshoot: f64) -> f64 {
    if p == 0.0 || p == 1.0 {
        return p;
    }
    1.0 - back_in(1.0 - p, overshoot)
}

/// Amplitude and phase shift shared by both elastic curves.
fn elastic_params(amplitude: f64, period: f64) -> (f64, f64) {
    if amplitude < 1.0 {
        (1.0, period / 4.0)
    } else {
        (amplitude, period / (2.0 * PI) * (1.0 / amplitude).asin())
    }
}

/// Exponentially growing sine oscillation that ends at 1.
pub fn elastic_in(p: f64, amplitude: f64, period: f64) -> f64 {
    if p == 0.0 || p == 1.0 {
        return p;
    }
    let (a, s) = elastic_params(amplitude, period);
    let t = p - 1.0;
    -(a * 2f64.powf(10.0 * t) * ((t - s) * (2.0 * PI) / period).sin())
}

/// Exponentially decaying sine oscillation around 1.
pub fn elastic_out(p: f64, amplitude: f64, period: f64) -> f64 {
    if p == 0.0 || p == 1.0 {
        return p;
    }
    let (a, s) = elastic_params(amplitude, period);
    a * 2f64.powf(-10.0 * p) * ((p - s) * (2.0 * PI) / period).sin() + 1.0
}
