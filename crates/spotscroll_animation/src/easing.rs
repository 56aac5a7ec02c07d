//! Easing curves for scroll animation

use serde::{Deserialize, Serialize};

/// Easing curve applied to animation progress
///
/// Deserializes from `"linear"`, `"ease_out"`, ... or
/// `{ cubic_bezier = [x1, y1, x2, y2] }`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    Linear,
    EaseIn,
    /// Cubic ease-out, the default for scroll animations
    #[default]
    EaseOut,
    EaseInOut,
    EaseOutQuart,
    CubicBezier(f32, f32, f32, f32),
}

impl Easing {
    /// Map linear progress `t` in `[0, 1]` to eased progress
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match *self {
            Easing::Linear => t,
            Easing::EaseIn => t * t * t,
            Easing::EaseOut => 1.0 - (1.0 - t).powi(3),
            Easing::EaseInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (2.0 - 2.0 * t).powi(3) / 2.0
                }
            }
            Easing::EaseOutQuart => 1.0 - (1.0 - t).powi(4),
            Easing::CubicBezier(x1, y1, x2, y2) => {
                CubicBezier::new(x1, y1, x2, y2).solve(t as f64) as f32
            }
        }
    }
}

/// CSS `cubic-bezier()` timing function with fixed endpoints (0,0) and (1,1)
struct CubicBezier {
    x: [f64; 3],
    y: [f64; 3],
}

impl CubicBezier {
    fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self {
            x: Self::coefficients(x1 as f64, x2 as f64),
            y: Self::coefficients(y1 as f64, y2 as f64),
        }
    }

    /// Polynomial coefficients of B(s) = a·s³ + b·s² + c·s
    fn coefficients(p1: f64, p2: f64) -> [f64; 3] {
        let c = 3.0 * p1;
        let b = 3.0 * (p2 - p1) - c;
        let a = 1.0 - c - b;
        [a, b, c]
    }

    fn eval(k: &[f64; 3], s: f64) -> f64 {
        ((k[0] * s + k[1]) * s + k[2]) * s
    }

    fn slope(k: &[f64; 3], s: f64) -> f64 {
        (3.0 * k[0] * s + 2.0 * k[1]) * s + k[2]
    }

    /// Find y for the given x
    fn solve(&self, x: f64) -> f64 {
        if x <= 0.0 {
            return 0.0;
        }
        if x >= 1.0 {
            return 1.0;
        }

        // Newton iterations converge quickly for well-formed curves
        let mut s = x;
        for _ in 0..8 {
            let err = Self::eval(&self.x, s) - x;
            if err.abs() < 1e-7 {
                return Self::eval(&self.y, s);
            }
            let d = Self::slope(&self.x, s);
            if d.abs() < 1e-7 {
                break;
            }
            s -= err / d;
        }

        // Bisection for flat regions
        let (mut lo, mut hi) = (0.0_f64, 1.0_f64);
        s = x;
        for _ in 0..32 {
            let v = Self::eval(&self.x, s);
            if (v - x).abs() < 1e-7 {
                break;
            }
            if v < x {
                lo = s;
            } else {
                hi = s;
            }
            s = (lo + hi) / 2.0;
        }
        Self::eval(&self.y, s)
    }
}
