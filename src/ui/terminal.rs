//! Interactive terminal UI.

use console::style;

use super::{OutputMode, UserInterface};

/// UI implementation for interactive terminal sessions.
pub struct TerminalUI {
    mode: OutputMode,
}

impl TerminalUI {
    /// Create a new terminal UI.
    pub fn new(mode: OutputMode) -> Self {
        Self { mode }
    }
}

impl UserInterface for TerminalUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        if self.mode.shows_status() {
            eprintln!("{}", msg);
        }
    }

    fn success(&mut self, msg: &str) {
        if self.mode.shows_status() {
            eprintln!("{} {}", style("✓").green(), msg);
        }
    }

    fn warning(&mut self, msg: &str) {
        if self.mode.shows_status() {
            eprintln!("{} {}", style("⚠").yellow(), msg);
        }
    }

    fn error(&mut self, msg: &str) {
        eprintln!("{} {}", style("✗").red(), msg);
    }

    fn is_interactive(&self) -> bool {
        true
    }
}
