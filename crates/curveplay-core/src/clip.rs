//! Horizontal viewport clipping for curve segments.

use crate::vector::Point2D;
use crate::{Error, Result};

/// Segments with a horizontal extent at or below this cannot be clipped
pub const DEGENERATE_DX: f64 = 1e-3;

/// Visible horizontal window `[x0, x1]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub x0: f64,
    pub x1: f64,
}

impl Viewport {
    pub fn new(x0: f64, x1: f64) -> Self {
        Self { x0, x1 }
    }

    /// Whether any part of the span `[a, b]` (in either order) is visible
    pub fn overlaps(&self, a: f64, b: f64) -> bool {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        hi >= self.x0 && lo <= self.x1
    }

    /// Trim a segment to the window. Returns `None` when nothing of it is
    /// visible. Near-vertical segments are returned unclipped.
    pub fn clip(&self, p0: Point2D, p1: Point2D) -> Option<(Point2D, Point2D)> {
        if !self.overlaps(p0.x, p1.x) {
            return None;
        }

        let (mut left, mut right) = if p0.x <= p1.x { (p0, p1) } else { (p1, p0) };
        let swapped = p0.x > p1.x;

        if left.x < self.x0 {
            match clip_to_x(right, left, self.x0) {
                Ok(p) => left = p,
                Err(_) => return Some((p0, p1)),
            }
        }
        if right.x > self.x1 {
            match clip_to_x(left, right, self.x1) {
                Ok(p) => right = p,
                Err(_) => return Some((p0, p1)),
            }
        }

        if swapped {
            Some((right, left))
        } else {
            Some((left, right))
        }
    }
}

/// Move `outside` along the line through `inside` until it sits at `x`
pub fn clip_to_x(inside: Point2D, outside: Point2D, x: f64) -> Result<Point2D> {
    let dx = outside.x - inside.x;
    if dx.abs() <= DEGENERATE_DX {
        return Err(Error::DegenerateSegment { dx: dx.abs() });
    }
    let m = (outside.y - inside.y) / dx;
    let c = inside.y - m * inside.x;
    Ok(Point2D::new(x, m * x + c))
}
