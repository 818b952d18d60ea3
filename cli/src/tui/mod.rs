pub mod app;
pub mod ui;

use std::io;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use tiffin_core::{OrderService, OrderSink, WeekDate};
use tracing::error;

use crate::tui::app::{App, Focus, InputMode};

pub fn run<S: OrderSink>(service: OrderService<S>, window: Vec<WeekDate>) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(service, window);
    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        error!("order form stopped: {:?}", err);
        println!("{:?}", err);
    }

    Ok(())
}

fn run_app<B: Backend, S: OrderSink>(terminal: &mut Terminal<B>, app: &mut App<S>) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))
            .map_err(|e| io::Error::other(e.to_string()))?;

        // The pending notice is on screen; now make the one blocking call
        if app.submitting {
            app.submit();
            continue;
        }

        if !event::poll(Duration::from_millis(250))? {
            continue;
        }
        let Event::Key(key) = event::read()? else { continue };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match app.input_mode {
            InputMode::Normal => match key.code {
                KeyCode::Char('q') => return Ok(()),
                KeyCode::Tab => app.next_focus(),
                KeyCode::Down | KeyCode::Char('j') => app.next(),
                KeyCode::Up | KeyCode::Char('k') => app.previous(),
                KeyCode::Char('s') => app.request_submit(),
                KeyCode::Char(']') => app.switch_line_date(true),
                KeyCode::Char('[') => app.switch_line_date(false),
                KeyCode::Char(' ') if app.focus == Focus::Dates => app.toggle_date(),
                KeyCode::Char(' ') | KeyCode::Char('+') | KeyCode::Right if app.focus == Focus::Lines => app.adjust(1),
                KeyCode::Char('-') | KeyCode::Left if app.focus == Focus::Lines => app.adjust(-1),
                KeyCode::Enter => match app.focus {
                    Focus::Dates => app.toggle_date(),
                    Focus::Lines => app.adjust(1),
                    Focus::Details => app.enter_edit_mode(),
                },
                _ => {}
            },
            InputMode::Editing => match key.code {
                KeyCode::Enter | KeyCode::Esc => app.exit_input_mode(),
                KeyCode::Char(c) => app.input_char(c),
                KeyCode::Backspace => app.delete_char(),
                KeyCode::Left => app.move_cursor_left(),
                KeyCode::Right => app.move_cursor_right(),
                _ => {}
            },
        }
    }
}
