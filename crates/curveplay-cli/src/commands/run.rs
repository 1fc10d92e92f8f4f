use std::io;
use std::time::Instant;

use anyhow::Result;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;

use curveplay_core::AppConfig;
use curveplay_tui::{event::EventHandler, App};

type Backend = CrosstermBackend<io::Stdout>;

pub fn run(config: AppConfig) -> Result<()> {
    config.validate()?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture, SetTitle("Curveplay"))?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = main_loop(&mut terminal, &config);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn main_loop(terminal: &mut Terminal<Backend>, config: &AppConfig) -> Result<()> {
    let size = terminal.size()?;
    let mut app = App::new(config, size.width, size.height)?;
    let event_handler = EventHandler::new(config.ui.frame_rate_ms);
    info!("Started {}x{} terminal session", size.width, size.height);

    loop {
        app.update(Instant::now());

        app.prepare_frame();
        terminal.draw(|frame| app.render(frame))?;

        let timeout = app.poll_timeout(Instant::now(), event_handler.frame_rate());
        if let Some(event) = event_handler.next(timeout)? {
            app.handle_event(event);
        }

        if app.should_quit {
            break;
        }
    }

    info!("Session ended");
    Ok(())
}
