use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    symbols::Marker,
    text::Span,
    widgets::canvas::{Canvas, Circle, Line, Points},
    widgets::Widget,
};

use curveplay_core::canvas::{DiscStyle, TextAnchor};
use curveplay_core::{DrawCommand, DrawList};

use crate::theme::Theme;

/// Replays an engine [`DrawList`] onto a braille canvas covering
/// `[0, width] × [0, height]` logical units, y up.
pub struct DrawListPainter<'a> {
    list: &'a DrawList,
    width: f64,
    height: f64,
    theme: &'a Theme,
}

impl<'a> DrawListPainter<'a> {
    pub fn new(list: &'a DrawList, width: f64, height: f64, theme: &'a Theme) -> Self {
        Self {
            list,
            width,
            height,
            theme,
        }
    }
}

impl Widget for DrawListPainter<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let unit_x = self.width / area.width as f64;
        let unit_y = self.height / area.height as f64;
        let theme = self.theme;
        let list = self.list;

        let canvas = Canvas::default()
            .background_color(theme.bg0)
            .marker(Marker::Braille)
            .x_bounds([0.0, self.width])
            .y_bounds([0.0, self.height])
            .paint(move |ctx| {
                for command in list.commands() {
                    match command {
                        DrawCommand::Line { p0, p1, colour } => {
                            ctx.draw(&Line::new(p0.x, p0.y, p1.x, p1.y, theme.colour(*colour)));
                        }
                        DrawCommand::Disc {
                            centre,
                            radius,
                            style,
                            colour,
                        } => {
                            let color = theme.colour(*colour);
                            let rings: &[f64] = match style {
                                DiscStyle::Outline => &[1.0],
                                DiscStyle::Filled => &[1.0, 2.0 / 3.0, 1.0 / 3.0],
                            };
                            for ring in rings {
                                ctx.draw(&Circle {
                                    x: centre.x,
                                    y: centre.y,
                                    radius: radius * ring,
                                    color,
                                });
                            }
                            if *style == DiscStyle::Filled {
                                ctx.draw(&Points {
                                    coords: &[(centre.x, centre.y)],
                                    color,
                                });
                            }
                        }
                        DrawCommand::Text { text, pos, anchor } => {
                            let half_width = text.chars().count() as f64 * unit_x / 2.0;
                            let y = match anchor {
                                TextAnchor::Center => pos.y + unit_y / 2.0,
                                TextAnchor::Middle => pos.y,
                            };
                            ctx.print(
                                (pos.x - half_width).max(0.0),
                                y,
                                Span::styled(text.clone(), Style::default().fg(theme.fg0)),
                            );
                        }
                    }
                }
            });
        canvas.render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use curveplay_core::canvas::{Canvas as _, NORMAL_COLOUR};
    use curveplay_core::Point2D;

    fn rendered(list: &DrawList) -> Buffer {
        let area = Rect::new(0, 0, 20, 10);
        let mut buf = Buffer::empty(area);
        let theme = Theme::default();
        DrawListPainter::new(list, 160.0, 160.0, &theme).render(area, &mut buf);
        buf
    }

    fn painted_cells(buf: &Buffer) -> usize {
        buf.content().iter().filter(|c| c.symbol() != " ").count()
    }

    #[test]
    fn test_line_is_painted() {
        let mut list = DrawList::new();
        list.draw_line(Point2D::new(0.0, 0.0), Point2D::new(160.0, 160.0), NORMAL_COLOUR);
        assert!(painted_cells(&rendered(&list)) >= 10);
    }

    #[test]
    fn test_text_is_printed() {
        let mut list = DrawList::new();
        list.draw_text("Hi", Point2D::new(80.0, 80.0), TextAnchor::Middle);
        let text: String = rendered(&list)
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(text.contains("Hi"));
    }

    #[test]
    fn test_empty_list_paints_nothing() {
        assert_eq!(painted_cells(&rendered(&DrawList::new())), 0);
    }
}
