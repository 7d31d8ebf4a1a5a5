//! Render command implementation.
//!
//! `plugcheck render` turns a check report into human-readable ASCII tables:
//!
//! ```text
//! plugcheck check | plugcheck render
//! plugcheck render report.json
//! ```

use crate::cli::args::RenderArgs;
use crate::error::Result;
use crate::report::render::render_report;
use crate::report::CheckReport;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};
use super::input::read_report_input;

/// The render command implementation.
pub struct RenderCommand {
    args: RenderArgs,
}

impl RenderCommand {
    /// Create a new render command.
    pub fn new(args: RenderArgs) -> Self {
        Self { args }
    }
}

impl Command for RenderCommand {
    fn execute(&self, _ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let content = read_report_input(self.args.file.as_deref())?;
        let report = CheckReport::from_json(&content)?;

        println!("{}", render_report(&report));

        Ok(CommandResult::success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::MockUI;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn renders_report_from_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("report.json");
        fs::write(
            &path,
            r#"{"checkedScope": "enabled", "checkedPlugin": null,
                "summary": {"satisfiedCount": 0, "missingCount": 0, "mismatchCount": 0},
                "plugins": []}"#,
        )
        .unwrap();

        let cmd = RenderCommand::new(RenderArgs { file: Some(path) });
        let mut ui = MockUI::new();
        let result = cmd.execute(&mut ui).unwrap();
        assert!(result.success);
    }

    #[test]
    fn invalid_json_fails() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("report.json");
        fs::write(&path, "not json").unwrap();

        let cmd = RenderCommand::new(RenderArgs { file: Some(path) });
        let mut ui = MockUI::new();
        assert!(cmd.execute(&mut ui).is_err());
    }
}
