use std::time::{Duration, Instant};

use anyhow::Result;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    Frame,
};
use tracing::debug;

use curveplay_core::{AppConfig, DrawList, Engine, KeyOutcome};

use crate::event::{AppEvent, PointerEvent, PointerMapper};
use crate::input::map_key;
use crate::theme::Theme;
use crate::timer::IntervalTimer;
use crate::widgets::{DrawListPainter, StatusBarWidget};

/// Terminal front end state wrapped around the engine
pub struct App {
    pub engine: Engine<IntervalTimer>,
    pub theme: Theme,
    pub should_quit: bool,
    pub show_status_bar: bool,
    cell_width: f64,
    cell_height: f64,
    pointer: PointerMapper,
    draw_list: DrawList,
}

impl App {
    /// Build the app for a terminal of `columns × rows` cells
    pub fn new(config: &AppConfig, columns: u16, rows: u16) -> Result<Self> {
        let show_status_bar = config.ui.show_status_bar;
        let (cell_width, cell_height) = (config.ui.cell_width, config.ui.cell_height);
        let canvas_rows = canvas_rows(rows, show_status_bar);

        let engine = Engine::new(
            config,
            columns as f64 * cell_width,
            canvas_rows as f64 * cell_height,
            IntervalTimer::new(),
        )?;

        Ok(Self {
            engine,
            theme: Theme::default(),
            should_quit: false,
            show_status_bar,
            cell_width,
            cell_height,
            pointer: PointerMapper::new(cell_width, cell_height, canvas_rows),
            draw_list: DrawList::new(),
        })
    }

    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Key(key) => {
                if let Some(key) = map_key(key) {
                    if self.engine.on_key_press(key) == KeyOutcome::Quit {
                        self.should_quit = true;
                    }
                }
            }
            AppEvent::Mouse(mouse) => match self.pointer.translate(&mouse) {
                Some(PointerEvent::Press { x, y, button }) => self.engine.on_mouse_press(x, y, button),
                Some(PointerEvent::Drag { x, y, dx, dy, button }) => {
                    self.engine.on_mouse_drag(x, y, dx, dy, button)
                }
                Some(PointerEvent::Release { x, y, button }) => {
                    self.engine.on_mouse_release(x, y, button)
                }
                None => {}
            },
            AppEvent::Resize(columns, rows) => self.resize(columns, rows),
            AppEvent::Tick => {}
        }
    }

    pub fn resize(&mut self, columns: u16, rows: u16) {
        let canvas_rows = canvas_rows(rows, self.show_status_bar);
        self.pointer.set_canvas_rows(canvas_rows);
        self.engine.on_resize(
            columns as f64 * self.cell_width,
            canvas_rows as f64 * self.cell_height,
        );
        debug!("Terminal resized to {}x{}", columns, rows);
    }

    /// Run the scroll tick if the timer is due
    pub fn update(&mut self, now: Instant) {
        if let Some(dt) = self.engine.scheduler_mut().due(now) {
            self.engine.tick(dt);
        }
    }

    /// Longest the main loop may wait for input before `update` is needed
    pub fn poll_timeout(&self, now: Instant, frame_rate: Duration) -> Duration {
        self.engine
            .scheduler()
            .time_until_due(now)
            .map_or(frame_rate, |due| due.min(frame_rate))
    }

    /// Record this frame's draw commands
    pub fn prepare_frame(&mut self) {
        self.draw_list.clear();
        self.engine.on_draw(&mut self.draw_list);
    }

    pub fn draw_list(&self) -> &DrawList {
        &self.draw_list
    }

    pub fn render(&self, frame: &mut Frame) {
        let size = frame.area();
        let (canvas_area, status_area) = if self.show_status_bar {
            let main_layout = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(1), Constraint::Length(1)])
                .split(size);
            (main_layout[0], Some(main_layout[1]))
        } else {
            (size, None)
        };

        self.render_canvas(frame, canvas_area);
        if let Some(area) = status_area {
            StatusBarWidget::render(frame, area, self);
        }
    }

    fn render_canvas(&self, frame: &mut Frame, area: Rect) {
        let (width, height) = self.engine.size();
        let painter = DrawListPainter::new(&self.draw_list, width, height, &self.theme);
        frame.render_widget(painter, area);
    }
}

fn canvas_rows(rows: u16, show_status_bar: bool) -> u16 {
    if show_status_bar {
        rows.saturating_sub(1).max(1)
    } else {
        rows.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
    use curveplay_core::CurveKind;

    fn app() -> App {
        let mut config = AppConfig::default();
        config.general.seed = Some(1);
        App::new(&config, 80, 25).unwrap()
    }

    fn click(app: &mut App, column: u16, row: u16) {
        for kind in [
            MouseEventKind::Down(MouseButton::Left),
            MouseEventKind::Up(MouseButton::Left),
        ] {
            app.handle_event(AppEvent::Mouse(MouseEvent {
                kind,
                column,
                row,
                modifiers: KeyModifiers::NONE,
            }));
        }
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_event(AppEvent::Key(KeyEvent::new(code, KeyModifiers::NONE)));
    }

    #[test]
    fn test_logical_size_excludes_status_bar() {
        let app = app();
        assert_eq!(app.engine.size(), (640.0, 384.0));
    }

    #[test]
    fn test_keys_drive_engine() {
        let mut app = app();
        press(&mut app, KeyCode::Char('c'));
        assert_eq!(app.engine.curve_kind(), CurveKind::SmoothStep);
        assert!(!app.should_quit);
        press(&mut app, KeyCode::Esc);
        assert!(app.should_quit);
    }

    #[test]
    fn test_clicking_change_curve_button() {
        // Button spans logical x 312..432 and y 5..25: column 45 of the last canvas row
        let mut app = app();
        click(&mut app, 45, 23);
        assert_eq!(app.engine.curve_kind(), CurveKind::SmoothStep);
        assert!(StatusBarWidget::status_text(&app).contains("Smooth Step"));
    }

    #[test]
    fn test_update_ticks_when_due() {
        let start = Instant::now();
        let mut app = app();
        assert_eq!(app.engine.clock().step(), 0);
        app.update(start + Duration::from_millis(100));
        assert!(app.engine.clock().step() > 0);
    }

    #[test]
    fn test_resize_updates_engine() {
        let mut app = app();
        app.handle_event(AppEvent::Resize(100, 41));
        assert_eq!(app.engine.size(), (800.0, 640.0));
    }

    #[test]
    fn test_frame_has_commands() {
        let mut app = app();
        app.prepare_frame();
        assert!(!app.draw_list().is_empty());
    }

    #[test]
    fn test_poll_timeout_bounded_by_frame_rate() {
        let app = app();
        let frame = Duration::from_millis(33);
        assert!(app.poll_timeout(Instant::now(), frame) <= frame);
    }
}
