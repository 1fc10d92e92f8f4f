//! Draw primitives consumed by the engine.
//!
//! The engine never talks to a graphics backend directly. Everything it
//! renders goes through [`Canvas`]; [`DrawList`] is a recording canvas that
//! front ends replay onto their own surface.

use crate::vector::Point2D;

/// RGBA colour with components in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Colour {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Colour {
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Components scaled to 8 bits, alpha dropped
    pub fn to_rgb8(self) -> (u8, u8, u8) {
        let scale = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        (scale(self.r), scale(self.g), scale(self.b))
    }
}

pub const NORMAL_COLOUR: Colour = Colour::rgba(1.0, 1.0, 1.0, 1.0);
pub const BORDER_COLOUR: Colour = Colour::rgba(0.7, 0.7, 0.7, 1.0);

/// Fill style for discs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DiscStyle {
    #[default]
    Filled,
    /// Drawn while a point is being dragged
    Outline,
}

/// Horizontal/vertical placement of text relative to its position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAnchor {
    /// Centred horizontally, baseline at the position
    #[default]
    Center,
    /// Centred both ways
    Middle,
}

/// Backend-facing draw surface
pub trait Canvas {
    fn draw_line(&mut self, p0: Point2D, p1: Point2D, colour: Colour);

    fn draw_disc(&mut self, centre: Point2D, radius: f64, style: DiscStyle, colour: Colour);

    fn draw_text(&mut self, text: &str, pos: Point2D, anchor: TextAnchor);
}

/// One recorded primitive
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Line {
        p0: Point2D,
        p1: Point2D,
        colour: Colour,
    },
    Disc {
        centre: Point2D,
        radius: f64,
        style: DiscStyle,
        colour: Colour,
    },
    Text {
        text: String,
        pos: Point2D,
        anchor: TextAnchor,
    },
}

/// Canvas that records commands for later replay
#[derive(Debug, Clone, Default)]
pub struct DrawList {
    commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Only the line segments, in draw order
    pub fn lines(&self) -> impl Iterator<Item = (Point2D, Point2D)> + '_ {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Line { p0, p1, .. } => Some((*p0, *p1)),
            _ => None,
        })
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> + '_ {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

impl Canvas for DrawList {
    fn draw_line(&mut self, p0: Point2D, p1: Point2D, colour: Colour) {
        self.commands.push(DrawCommand::Line { p0, p1, colour });
    }

    fn draw_disc(&mut self, centre: Point2D, radius: f64, style: DiscStyle, colour: Colour) {
        self.commands.push(DrawCommand::Disc {
            centre,
            radius,
            style,
            colour,
        });
    }

    fn draw_text(&mut self, text: &str, pos: Point2D, anchor: TextAnchor) {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            pos,
            anchor,
        });
    }
}

/// Axis-aligned rectangle outline as four lines
pub fn draw_rect_outline(canvas: &mut dyn Canvas, x: f64, y: f64, width: f64, height: f64, colour: Colour) {
    let corners = [
        Point2D::new(x, y),
        Point2D::new(x, y + height),
        Point2D::new(x + width, y + height),
        Point2D::new(x + width, y),
    ];
    for i in 0..corners.len() {
        canvas.draw_line(corners[i], corners[(i + 1) % corners.len()], colour);
    }
}
