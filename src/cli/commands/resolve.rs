//! Resolve command implementation.
//!
//! `plugcheck resolve` reads a check report and prints numbered resolution
//! steps for everything that needs attention. As the advisory tail of the
//! pipeline it exits non-zero when required-bucket issues remain, so CI can
//! gate on it.

use crate::cli::args::ResolveArgs;
use crate::error::Result;
use crate::report::advice::{format_steps, generate_steps, has_required_issues};
use crate::report::CheckReport;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};
use super::input::read_report_input;

/// The resolve command implementation.
pub struct ResolveCommand {
    args: ResolveArgs,
}

impl ResolveCommand {
    /// Create a new resolve command.
    pub fn new(args: ResolveArgs) -> Self {
        Self { args }
    }
}

impl Command for ResolveCommand {
    fn execute(&self, _ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let content = read_report_input(self.args.file.as_deref())?;
        let report = CheckReport::from_json(&content)?;

        let steps = generate_steps(&report);
        println!("{}", format_steps(&steps));

        if has_required_issues(&steps) {
            Ok(CommandResult::failure(1))
        } else {
            Ok(CommandResult::success())
        }
    }
}
