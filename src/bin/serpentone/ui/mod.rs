//! TUI module for serpentone
//!
//! Draws whatever the performer reports. Keys are read on the input thread,
//! so this loop only drains events and redraws.

mod header;
mod notes;
pub mod state;
mod status;

use std::time::Duration;

use color_eyre::eyre::Result as EyreResult;
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::Paragraph,
    DefaultTerminal, Frame,
};
use rtrb::Consumer;
use tracing::warn;

use serpentone::engine::PerformanceEvent;

pub use state::UiState;

use header::render_header;
use notes::render_notes;
use status::render_status;

/// ~60 fps
const FRAME_INTERVAL: Duration = Duration::from_millis(16);

const HELP: &str =
    " [a-'] Play  [z/x] Octave  [c/v/b] Patch  [1/2/3] Tuning  [-/=] Key  [Esc] Quit";

/// UI application state
pub struct UiApp {
    /// Ring buffer receiver for performer events
    events: Consumer<PerformanceEvent>,
    state: UiState,
}

impl UiApp {
    pub fn new(events: Consumer<PerformanceEvent>, state: UiState) -> Self {
        Self { events, state }
    }

    /// Redraw until the performer reports it has stopped or `alive` says a
    /// worker thread is gone.
    pub fn run(
        &mut self,
        terminal: &mut DefaultTerminal,
        alive: impl Fn() -> Result<(), &'static str>,
    ) -> EyreResult<()> {
        while self.pump(&alive) {
            terminal.draw(|frame| self.render(frame))?;
            std::thread::sleep(FRAME_INTERVAL);
        }
        Ok(())
    }

    /// Apply pending events. Returns `false` once there is nothing left to
    /// draw for.
    fn pump(&mut self, alive: &impl Fn() -> Result<(), &'static str>) -> bool {
        while let Ok(event) = self.events.pop() {
            self.state.apply(event);
        }
        if !self.state.stopped {
            if let Err(reason) = alive() {
                warn!("leaving UI: {reason}");
                self.state.mark_lost(reason);
            }
        }
        !self.state.stopped
    }

    fn render(&self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(6),    // Notes
                Constraint::Length(8), // Status
                Constraint::Length(1), // Help bar
            ])
            .split(frame.area());

        render_header(frame, chunks[0], &self.state);
        render_notes(frame, chunks[1], &self.state);
        render_status(frame, chunks[2], &self.state);

        let help = Paragraph::new(HELP).style(Style::default().fg(Color::DarkGray));
        frame.render_widget(help, chunks[3]);
    }
}
