//! Terminal output components.
//!
//! This module provides:
//! - [`UserInterface`] trait for UI abstraction
//! - [`TerminalUI`] for interactive terminal usage
//! - [`NonInteractiveUI`] for CI/headless environments and piped output
//! - [`MockUI`] for tests
//! - [`Table`] for box-drawing table rendering
//!
//! The report JSON always goes straight to stdout; the `UserInterface` only
//! carries status and error messages, so `--quiet` output stays pipeable.

pub mod mock;
pub mod non_interactive;
pub mod output;
pub mod table;
pub mod terminal;

pub use mock::MockUI;
pub use non_interactive::NonInteractiveUI;
pub use output::OutputMode;
pub use table::Table;
pub use terminal::TerminalUI;

/// Trait for user interface interactions.
///
/// This trait allows mocking the UI in tests.
pub trait UserInterface {
    /// Get the current output mode.
    fn output_mode(&self) -> OutputMode;

    /// Display a message to the user.
    fn message(&mut self, msg: &str);

    /// Display a success message.
    fn success(&mut self, msg: &str);

    /// Display a warning message.
    fn warning(&mut self, msg: &str);

    /// Display an error message.
    fn error(&mut self, msg: &str);

    /// Check if running in interactive mode.
    fn is_interactive(&self) -> bool;
}

/// Create the appropriate UI for the execution context.
pub fn create_ui(interactive: bool, mode: OutputMode) -> Box<dyn UserInterface> {
    if interactive {
        Box::new(TerminalUI::new(mode))
    } else {
        Box::new(NonInteractiveUI::new(mode))
    }
}
