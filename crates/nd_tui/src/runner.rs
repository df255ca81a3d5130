use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use nd_core::Result;
use tui::backend::CrosstermBackend;
use tui::Terminal;

use crate::app::App;
use crate::ui;

const TICK_INTERVAL: Duration = Duration::from_millis(100);

/// Raw mode + alternate screen, restored on drop so error paths leave
/// the user's terminal usable.
struct TerminalSession {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalSession {
    fn new() -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        if let Err(e) = execute!(stdout, EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(e.into());
        }
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        Ok(Self { terminal })
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

/// Draw, poll, dispatch, tick. Key handlers run to completion before
/// the next event is read; background fetches are picked up by
/// `on_tick` between frames.
pub async fn run(mut app: App) -> Result<()> {
    let mut session = TerminalSession::new()?;

    loop {
        session.terminal.draw(|f| ui::render(f, &app))?;

        if event::poll(TICK_INTERVAL)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key).await;
                }
            }
        }

        app.on_tick();
        if app.should_quit {
            break;
        }
    }

    Ok(())
}
