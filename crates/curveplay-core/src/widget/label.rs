use crate::canvas::{Canvas, TextAnchor};
use crate::vector::Point2D;

/// Static text anchor. Has no extent, so it is never hit.
#[derive(Debug, Clone)]
pub struct Label {
    pub pos: Point2D,
    text: String,
}

impl Label {
    pub fn new(x: f64, y: f64, text: impl Into<String>) -> Self {
        Self {
            pos: Point2D::new(x, y),
            text: text.into(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn draw(&self, canvas: &mut dyn Canvas) {
        canvas.draw_text(&self.text, self.pos, TextAnchor::Center);
    }
}
