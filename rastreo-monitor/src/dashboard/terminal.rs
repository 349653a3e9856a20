use std::io::{self, Stdout};
use std::time::Duration;

use crossterm::event::{DisableMouseCapture, EnableMouseCapture, EventStream};
use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use futures::StreamExt;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use time::{OffsetDateTime, UtcOffset};
use tokio::sync::mpsc;

use super::app::{Action, App};
use super::ui;
use crate::services::{PollEvent, Poller};

/// Raw-mode alternate screen with mouse capture, restored on drop.
pub struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalGuard {
    pub fn enter() -> io::Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

        Ok(Self {
            terminal: Terminal::new(CrosstermBackend::new(stdout))?,
        })
    }

    pub fn draw(&mut self, app: &mut App) -> io::Result<()> {
        self.terminal
            .draw(|frame| ui::render(frame, app, OffsetDateTime::now_utc()))
            .map(|_| ())
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if let Err(e) = disable_raw_mode() {
            tracing::error!("Failed to leave raw mode: {}", e);
        }
        if let Err(e) = execute!(self.terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture) {
            tracing::error!("Failed to restore terminal: {}", e);
        }
        let _ = self.terminal.show_cursor();
    }
}

/// Drives the dashboard until the user quits. Redraws on every poll event,
/// input event, and once a second so relative ages keep moving.
pub async fn run(
    poller: Poller,
    mut events: mpsc::UnboundedReceiver<PollEvent>,
    offset: UtcOffset,
) -> io::Result<()> {
    let mut terminal = TerminalGuard::enter()?;
    let mut input = EventStream::new();
    let mut redraw = tokio::time::interval(Duration::from_secs(1));
    let mut app = App::new(offset);

    loop {
        terminal.draw(&mut app)?;

        tokio::select! {
            Some(event) = events.recv() => app.state.apply(event),
            event = input.next() => {
                let Some(event) = event else {
                    break;
                };

                match app.handle(event?, OffsetDateTime::now_utc()) {
                    Action::Quit => break,
                    Action::Refresh => {
                        if !poller.refresh() {
                            tracing::debug!("Refresh already queued");
                        }
                    }
                    Action::None => {}
                }
            }
            _ = redraw.tick() => {}
        }
    }

    poller.shutdown();
    tracing::info!("Dashboard closed");

    Ok(())
}
