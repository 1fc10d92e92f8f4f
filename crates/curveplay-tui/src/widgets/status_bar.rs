use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use curveplay_core::{CurveKind, CurveMode};

use crate::app::App;

pub struct StatusBarWidget;

impl StatusBarWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let status_text = Self::status_text(app);
        let help_hint = " q:quit r:randomise c:curve ";
        let padding_len = area
            .width
            .saturating_sub(status_text.chars().count() as u16 + help_hint.len() as u16)
            as usize;

        let theme = &app.theme;
        let line = Line::from(vec![
            Span::styled(status_text, Style::default().fg(theme.fg0).bg(theme.bg2)),
            Span::styled(" ".repeat(padding_len), Style::default().bg(theme.bg2)),
            Span::styled(help_hint, Style::default().fg(theme.grey2).bg(theme.bg2)),
        ]);

        frame.render_widget(Paragraph::new(line), area);
    }

    pub fn status_text(app: &App) -> String {
        let engine = &app.engine;
        let mut text = format!(
            " {} | {}",
            engine.mode().label().to_uppercase(),
            engine.curve_kind()
        );

        if engine.curve_kind() == CurveKind::Hermite {
            let params = engine.hermite_params();
            text.push_str(&format!(
                " | tension {:.1} bias {:.1}",
                params.tension, params.bias
            ));
        }

        if engine.mode() == CurveMode::Scrolling {
            let clock = engine.clock();
            let direction = match clock.direction() {
                d if d > 0.0 => "left",
                d if d < 0.0 => "right",
                _ => "paused",
            };
            text.push_str(&format!(
                " | period {:.2}s {} | {:.0}/s",
                clock.period(),
                direction,
                engine.tick_rate()
            ));
        }
        text
    }
}
