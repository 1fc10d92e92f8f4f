use crate::canvas::{draw_rect_outline, Canvas, TextAnchor, BORDER_COLOUR, NORMAL_COLOUR};
use crate::vector::Point2D;

use super::Rect;

/// What a button does when clicked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonAction {
    /// Re-roll every control point's height
    Randomise,
    /// Switch to the next curve kind
    NextCurveType,
}

/// Clickable rectangle with a centred caption
#[derive(Debug, Clone)]
pub struct Button {
    pub rect: Rect,
    pub label: String,
    pub action: ButtonAction,
    pressed: bool,
}

impl Button {
    pub const DEFAULT_WIDTH: f64 = 80.0;
    pub const DEFAULT_HEIGHT: f64 = 20.0;

    pub fn new(rect: Rect, label: impl Into<String>, action: ButtonAction) -> Self {
        Self {
            rect,
            label: label.into(),
            action,
            pressed: false,
        }
    }

    pub fn within(&self, x: f64, y: f64) -> bool {
        self.rect.contains(x, y)
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    pub fn press(&mut self) {
        self.pressed = true;
    }

    /// Clears the pressed state. Returns the action only if this button was
    /// pressed and the pointer is still over it.
    pub fn release(&mut self, x: f64, y: f64) -> Option<ButtonAction> {
        if !self.pressed {
            return None;
        }
        self.pressed = false;
        self.within(x, y).then_some(self.action)
    }

    pub fn draw(&self, canvas: &mut dyn Canvas) {
        let colour = if self.pressed { BORDER_COLOUR } else { NORMAL_COLOUR };
        let Rect { x, y, width, height } = self.rect;
        draw_rect_outline(canvas, x, y, width, height, colour);
        canvas.draw_text(
            &self.label,
            Point2D::new(x + width / 2.0, y + height / 2.0 + 1.0),
            TextAnchor::Middle,
        );
    }
}
