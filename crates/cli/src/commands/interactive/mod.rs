//! Full-screen task window
//!
//! A task list on the first screen; picking a task rebuilds the form below
//! it with that task's inputs. Results show under the form, errors in the
//! status bar, and the window stays open until the user quits.

mod app;
mod input;
mod ui;

use anyhow::{bail, Result};
use crossterm::{
    event::{self, Event as CEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ecoflow_lib::predictor::ForecastService;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, IsTerminal};
use std::sync::Arc;
use std::time::Duration;

use app::App;
use input::Action;

/// Open the task window on the current terminal and run until the user quits
pub fn run(service: Arc<ForecastService>) -> Result<()> {
    if !io::stdout().is_terminal() {
        bail!("Interactive mode needs a terminal");
    }

    let app = App::new(service);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = event_loop(&mut terminal, app);

    // Restore the terminal even when the loop failed
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

fn event_loop(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, mut app: App) -> Result<()> {
    loop {
        terminal.draw(|frame| ui::draw(frame, &app))?;

        if !event::poll(Duration::from_millis(100))? {
            continue;
        }
        let CEvent::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match input::handle_key_event(key, &mut app) {
            Action::Quit => break,
            Action::Submit => app.submit(),
            Action::None => {}
        }
    }

    Ok(())
}
