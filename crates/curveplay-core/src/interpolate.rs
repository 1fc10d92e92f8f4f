//! Pure interpolation functions used to turn control points into line segments.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::vector::Point2D;

/// How the curve between successive control points is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CurveKind {
    /// Straight segments between control points
    #[default]
    Linear,
    /// Smooth-step blend of y, linear x
    SmoothStep,
    /// Kochanek–Bartels Hermite spline with tension and bias
    Hermite,
}

impl CurveKind {
    /// Human readable name, used by the on-canvas caption
    pub fn label(self) -> &'static str {
        match self {
            CurveKind::Linear => "Linear",
            CurveKind::SmoothStep => "Smooth Step",
            CurveKind::Hermite => "Hermite",
        }
    }

    /// Cycle to the next kind, wrapping around
    pub fn next(self) -> Self {
        match self {
            CurveKind::Linear => CurveKind::SmoothStep,
            CurveKind::SmoothStep => CurveKind::Hermite,
            CurveKind::Hermite => CurveKind::Linear,
        }
    }
}

impl fmt::Display for CurveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for CurveKind {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "linear" => Ok(CurveKind::Linear),
            "smooth-step" | "smoothstep" | "smooth_step" => Ok(CurveKind::SmoothStep),
            "hermite" => Ok(CurveKind::Hermite),
            _ => Err(crate::Error::UnknownVariant {
                kind: "curve kind",
                value: s.to_string(),
            }),
        }
    }
}

/// Hermite shape parameters, both in `[-1, 1]`
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HermiteParams {
    /// 1 is taut, -1 is loose
    pub tension: f64,
    /// Skews tangents toward the incoming (positive) or outgoing (negative) segment
    pub bias: f64,
}

/// Smooth-step: f(t) = t²(3 - 2t)
#[inline]
pub fn smoothstep(t: f64) -> f64 {
    t * t * (3.0 - 2.0 * t)
}

/// Linear blend between two scalars
#[inline]
pub fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from * (1.0 - t) + to * t
}

/// Kochanek–Bartels Hermite interpolation between `p1` and `p2`
///
/// `p0` and `p3` are the neighbouring control points and only shape the
/// tangents. `mu = 0` yields `p1`, `mu = 1` yields `p2`.
pub fn hermite(
    p0: Point2D,
    p1: Point2D,
    p2: Point2D,
    p3: Point2D,
    mu: f64,
    params: HermiteParams,
) -> Point2D {
    let HermiteParams { tension, bias } = params;
    let mu2 = mu * mu;
    let mu3 = mu2 * mu;

    let incoming = (1.0 + bias) * (1.0 - tension) / 2.0;
    let outgoing = (1.0 - bias) * (1.0 - tension) / 2.0;
    let m0 = (p1 - p0) * incoming + (p2 - p1) * outgoing;
    let m1 = (p2 - p1) * incoming + (p3 - p2) * outgoing;

    let a0 = 2.0 * mu3 - 3.0 * mu2 + 1.0;
    let a1 = mu3 - 2.0 * mu2 + mu;
    let a2 = mu3 - mu2;
    let a3 = -2.0 * mu3 + 3.0 * mu2;

    p1 * a0 + m0 * a1 + m1 * a2 + p2 * a3
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn grid(n: usize) -> impl Iterator<Item = f64> {
        (0..=n).map(move |i| -1.0 + 2.0 * i as f64 / n as f64)
    }

    #[test]
    fn test_smoothstep_boundaries() {
        assert_eq!(smoothstep(0.0), 0.0);
        assert_eq!(smoothstep(1.0), 1.0);
        assert!((smoothstep(0.5) - 0.5).abs() < EPS);
    }

    #[test]
    fn test_smoothstep_monotonic() {
        let mut prev = smoothstep(0.0);
        for i in 1..=100 {
            let v = smoothstep(i as f64 / 100.0);
            assert!(v >= prev, "not monotonic at step {}", i);
            prev = v;
        }
    }

    #[test]
    fn test_hermite_constant_points() {
        let p = Point2D::new(12.5, -3.0);
        for tension in grid(4) {
            for bias in grid(4) {
                for i in 0..=10 {
                    let mu = i as f64 / 10.0;
                    let q = hermite(p, p, p, p, mu, HermiteParams { tension, bias });
                    assert!((q.x - p.x).abs() < EPS && (q.y - p.y).abs() < EPS);
                }
            }
        }
    }

    #[test]
    fn test_hermite_endpoints() {
        let p0 = Point2D::new(0.0, 10.0);
        let p1 = Point2D::new(10.0, 20.0);
        let p2 = Point2D::new(20.0, 30.0);
        let p3 = Point2D::new(30.0, 20.0);
        let params = HermiteParams { tension: 0.3, bias: -0.6 };
        assert_eq!(hermite(p0, p1, p2, p3, 0.0, params), p1);
        let end = hermite(p0, p1, p2, p3, 1.0, params);
        assert!((end.x - p2.x).abs() < EPS && (end.y - p2.y).abs() < EPS);
    }

    #[test]
    fn test_hermite_collinear_is_linear() {
        // Evenly spaced collinear points with zero tension/bias give a straight line
        let pts: Vec<Point2D> = (0..4).map(|i| Point2D::new(i as f64, 2.0 * i as f64)).collect();
        let q = hermite(pts[0], pts[1], pts[2], pts[3], 0.25, HermiteParams::default());
        assert!((q.x - 1.25).abs() < EPS);
        assert!((q.y - 2.5).abs() < EPS);
    }

    #[test]
    fn test_curve_kind_cycle_and_parse() {
        assert_eq!(CurveKind::Linear.next(), CurveKind::SmoothStep);
        assert_eq!(CurveKind::Hermite.next(), CurveKind::Linear);
        assert_eq!("smooth-step".parse::<CurveKind>().unwrap(), CurveKind::SmoothStep);
        assert_eq!("Hermite".parse::<CurveKind>().unwrap(), CurveKind::Hermite);
        assert!("bezier".parse::<CurveKind>().is_err());
    }
}
