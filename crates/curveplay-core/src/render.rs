//! Turns control points into visible line segments.

use tracing::warn;

use crate::canvas::{Canvas, Colour};
use crate::clip::Viewport;
use crate::interpolate::{hermite, lerp, smoothstep, CurveKind, HermiteParams};
use crate::vector::Point2D;

/// How to interpolate between control points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveStyle {
    pub kind: CurveKind,
    /// Micro-segments per section for the smooth kinds
    pub subdivisions: u32,
    pub hermite: HermiteParams,
}

impl CurveStyle {
    pub fn new(kind: CurveKind, subdivisions: u32) -> Self {
        Self {
            kind,
            subdivisions: subdivisions.max(1),
            hermite: HermiteParams::default(),
        }
    }

    pub fn with_hermite(mut self, params: HermiteParams) -> Self {
        self.hermite = params;
        self
    }
}

/// Unclipped segments for the first `sections` sections of `points`.
///
/// Linear emits one segment per section. The smooth kinds skip sections
/// lying entirely outside `viewport` and subdivide the rest.
pub fn curve_segments(
    points: &[Point2D],
    sections: usize,
    style: CurveStyle,
    viewport: Viewport,
) -> Vec<(Point2D, Point2D)> {
    let sections = sections.min(points.len().saturating_sub(1));
    let n = style.subdivisions.max(1);
    let mut segments = Vec::new();

    for i in 0..sections {
        let (p1, p2) = (points[i], points[i + 1]);

        if style.kind == CurveKind::Linear {
            segments.push((p1, p2));
            continue;
        }
        if !viewport.overlaps(p1.x, p2.x) {
            continue;
        }

        let p0 = points[i.saturating_sub(1)];
        let p3 = points[(i + 2).min(points.len() - 1)];

        let mut prev = p1;
        for j in 0..n {
            let t = (j + 1) as f64 / n as f64;
            let next = match style.kind {
                CurveKind::SmoothStep => {
                    Point2D::new(lerp(p1.x, p2.x, t), lerp(p1.y, p2.y, smoothstep(t)))
                }
                _ => hermite(p0, p1, p2, p3, t, style.hermite),
            };
            segments.push((prev, next));
            prev = next;
        }
    }

    segments
}

/// Draw the curve through `points` clipped to `viewport`. Returns the number
/// of line draw calls made.
pub fn render_curve(
    canvas: &mut dyn Canvas,
    points: &[Point2D],
    sections: usize,
    style: CurveStyle,
    viewport: Viewport,
    colour: Colour,
) -> usize {
    let mut drawn = 0;
    for (p0, p1) in curve_segments(points, sections, style, viewport) {
        if !p0.is_finite() || !p1.is_finite() {
            warn!("Skipping non-finite segment {} -> {}", p0, p1);
            continue;
        }
        if let Some((a, b)) = viewport.clip(p0, p1) {
            canvas.draw_line(a, b, colour);
            drawn += 1;
        }
    }
    drawn
}
