use crate::canvas::{Canvas, Colour, DiscStyle, NORMAL_COLOUR};
use crate::vector::Point2D;

use super::{DragBand, WidgetId};

/// A draggable disc
///
/// A circle either belongs to a parent widget (a slider handle), in which case
/// drags are delegated to the parent, or moves itself vertically within the
/// engine's drag band. Parentless circles may be bound to a curve buffer slot.
#[derive(Debug, Clone)]
pub struct Circle {
    pub centre: Point2D,
    pub radius: f64,
    pub colour: Colour,
    pub style: DiscStyle,
    parent: Option<WidgetId>,
    slot: Option<usize>,
}

impl Circle {
    pub fn new(x: f64, y: f64, radius: f64) -> Self {
        Self {
            centre: Point2D::new(x, y),
            radius,
            colour: NORMAL_COLOUR,
            style: DiscStyle::Filled,
            parent: None,
            slot: None,
        }
    }

    /// A handle owned by `parent`
    pub fn child_of(parent: WidgetId, x: f64, y: f64, radius: f64) -> Self {
        Self {
            parent: Some(parent),
            ..Self::new(x, y, radius)
        }
    }

    /// A control point handle mirroring curve buffer slot `slot`
    pub fn for_slot(slot: usize, x: f64, y: f64, radius: f64) -> Self {
        Self {
            slot: Some(slot),
            ..Self::new(x, y, radius)
        }
    }

    pub fn parent(&self) -> Option<WidgetId> {
        self.parent
    }

    pub fn slot(&self) -> Option<usize> {
        self.slot
    }

    pub fn within(&self, x: f64, y: f64) -> bool {
        self.centre.distance(Point2D::new(x, y)) < self.radius
    }

    pub fn is_active(&self) -> bool {
        self.style == DiscStyle::Outline
    }

    pub fn press(&mut self) {
        self.style = DiscStyle::Outline;
    }

    pub fn release(&mut self) {
        self.style = DiscStyle::Filled;
    }

    /// Move vertically, clamped to `band`. Only meaningful for parentless circles.
    pub fn drag_to(&mut self, y: f64, band: DragBand) -> f64 {
        self.centre.y = band.clamp(y);
        self.centre.y
    }

    pub fn draw(&self, canvas: &mut dyn Canvas) {
        canvas.draw_disc(self.centre, self.radius, self.style, self.colour);
    }
}
