use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyEvent, KeyEventKind, MouseEvent, MouseEventKind};

use curveplay_core::MouseButton;

/// Event handler for terminal events
pub struct EventHandler {
    frame_rate: Duration,
}

impl EventHandler {
    pub fn new(frame_rate_ms: u64) -> Self {
        Self {
            frame_rate: Duration::from_millis(frame_rate_ms.max(1)),
        }
    }

    pub fn frame_rate(&self) -> Duration {
        self.frame_rate
    }

    /// Poll for the next event, waiting at most `timeout` (capped at the frame rate)
    pub fn next(&self, timeout: Duration) -> Result<Option<AppEvent>> {
        if event::poll(timeout.min(self.frame_rate))? {
            match event::read()? {
                Event::Key(key) => {
                    // Only handle key press events, ignore release events
                    // (crossterm 0.27+ sends release events on some systems)
                    if key.kind == KeyEventKind::Press {
                        Ok(Some(AppEvent::Key(key)))
                    } else {
                        Ok(None)
                    }
                }
                Event::Mouse(mouse) => Ok(Some(AppEvent::Mouse(mouse))),
                Event::Resize(w, h) => Ok(Some(AppEvent::Resize(w, h))),
                _ => Ok(None),
            }
        } else {
            Ok(Some(AppEvent::Tick))
        }
    }
}

/// Application events
#[derive(Debug)]
pub enum AppEvent {
    /// A key was pressed
    Key(KeyEvent),
    /// Mouse button or motion
    Mouse(MouseEvent),
    /// Terminal was resized
    Resize(u16, u16),
    /// Nothing happened within the poll timeout
    Tick,
}

/// Pointer gesture in logical engine coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Press { x: f64, y: f64, button: MouseButton },
    Drag { x: f64, y: f64, dx: f64, dy: f64, button: MouseButton },
    Release { x: f64, y: f64, button: MouseButton },
}

/// Maps terminal cells onto the engine's y-up logical plane.
///
/// Each cell covers `cell_width × cell_height` logical units and an event is
/// placed at the centre of its cell. Row 0 is the top of the terminal, so
/// rows are flipped against the canvas height.
#[derive(Debug, Clone)]
pub struct PointerMapper {
    cell_width: f64,
    cell_height: f64,
    canvas_rows: u16,
    last: Option<(f64, f64)>,
}

impl PointerMapper {
    pub fn new(cell_width: f64, cell_height: f64, canvas_rows: u16) -> Self {
        Self {
            cell_width,
            cell_height,
            canvas_rows,
            last: None,
        }
    }

    pub fn set_canvas_rows(&mut self, canvas_rows: u16) {
        self.canvas_rows = canvas_rows;
    }

    pub fn to_logical(&self, column: u16, row: u16) -> (f64, f64) {
        let x = column as f64 * self.cell_width + self.cell_width / 2.0;
        let flipped = self.canvas_rows as f64 - 1.0 - row as f64;
        let y = flipped * self.cell_height + self.cell_height / 2.0;
        (x, y)
    }

    pub fn translate(&mut self, event: &MouseEvent) -> Option<PointerEvent> {
        let (x, y) = self.to_logical(event.column, event.row);
        match event.kind {
            MouseEventKind::Down(button) => {
                self.last = Some((x, y));
                Some(PointerEvent::Press {
                    x,
                    y,
                    button: map_button(button),
                })
            }
            MouseEventKind::Drag(button) => {
                let (lx, ly) = self.last.unwrap_or((x, y));
                self.last = Some((x, y));
                Some(PointerEvent::Drag {
                    x,
                    y,
                    dx: x - lx,
                    dy: y - ly,
                    button: map_button(button),
                })
            }
            MouseEventKind::Up(button) => {
                self.last = None;
                Some(PointerEvent::Release {
                    x,
                    y,
                    button: map_button(button),
                })
            }
            _ => None,
        }
    }
}

fn map_button(button: event::MouseButton) -> MouseButton {
    match button {
        event::MouseButton::Left => MouseButton::Left,
        event::MouseButton::Right => MouseButton::Right,
        event::MouseButton::Middle => MouseButton::Middle,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn test_cells_map_to_y_up_centres() {
        let mapper = PointerMapper::new(8.0, 16.0, 24);
        assert_eq!(mapper.to_logical(0, 23), (4.0, 8.0));
        assert_eq!(mapper.to_logical(10, 0), (84.0, 23.0 * 16.0 + 8.0));
    }

    #[test]
    fn test_gesture_sequence() {
        let mut mapper = PointerMapper::new(8.0, 16.0, 10);
        let left = event::MouseButton::Left;

        let press = mapper.translate(&mouse(MouseEventKind::Down(left), 2, 9));
        assert_eq!(
            press,
            Some(PointerEvent::Press { x: 20.0, y: 8.0, button: MouseButton::Left })
        );

        let drag = mapper.translate(&mouse(MouseEventKind::Drag(left), 3, 8));
        assert_eq!(
            drag,
            Some(PointerEvent::Drag {
                x: 28.0,
                y: 24.0,
                dx: 8.0,
                dy: 16.0,
                button: MouseButton::Left,
            })
        );

        let release = mapper.translate(&mouse(MouseEventKind::Up(left), 3, 8));
        assert!(matches!(release, Some(PointerEvent::Release { .. })));
    }

    #[test]
    fn test_motion_and_scroll_ignored() {
        let mut mapper = PointerMapper::new(8.0, 16.0, 10);
        assert_eq!(mapper.translate(&mouse(MouseEventKind::Moved, 1, 1)), None);
        assert_eq!(mapper.translate(&mouse(MouseEventKind::ScrollUp, 1, 1)), None);
    }

    #[test]
    fn test_right_button_mapped() {
        let mut mapper = PointerMapper::new(8.0, 16.0, 10);
        let event = mapper.translate(&mouse(MouseEventKind::Down(event::MouseButton::Right), 0, 0));
        assert!(matches!(
            event,
            Some(PointerEvent::Press { button: MouseButton::Right, .. })
        ));
    }
}
