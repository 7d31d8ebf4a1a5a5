//! Scan command implementation.
//!
//! `plugcheck scan` runs the best-effort dependency scanner and prints the
//! matches as a JSON array. The output is review material for deciding what
//! belongs in a plugin's manifest, not a verdict — false positives are
//! expected and fine.

use std::path::{Path, PathBuf};

use crate::cli::args::ScanArgs;
use crate::config::HostConfig;
use crate::error::Result;
use crate::scanner::{ScanMatch, Scanner};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The scan command implementation.
pub struct ScanCommand {
    claude_dir: Option<PathBuf>,
    args: ScanArgs,
}

impl ScanCommand {
    /// Create a new scan command.
    pub fn new(claude_dir: Option<&Path>, args: ScanArgs) -> Self {
        Self {
            claude_dir: claude_dir.map(Path::to_path_buf),
            args,
        }
    }

    /// Run the scan and return the (type-filtered) matches.
    pub fn run(&self, ui: &mut dyn UserInterface) -> Result<Vec<ScanMatch>> {
        let scanner = Scanner::new();

        let mut matches = if let Some(path) = &self.args.plugin_dir {
            scanner.scan_plugin_dir(path)
        } else if let Some(path) = &self.args.marketplace_dir {
            scanner.scan_marketplace_dir(path)
        } else {
            let config = HostConfig::load(self.claude_dir.as_deref());
            if let Some(spec) = &self.args.plugin {
                scanner.scan_specific(&config, spec)
            } else if let Some(marketplace) = &self.args.marketplace {
                scanner.scan_marketplace(&config, marketplace)
            } else {
                scanner.scan_enabled(&config)
            }
        };

        if let Some(pattern_type) = self.args.pattern_type {
            matches.retain(|m| m.pattern_type == pattern_type);
        }

        if ui.output_mode().shows_detail() {
            ui.message(&format!("{} match(es) found", matches.len()));
        }

        Ok(matches)
    }
}

impl Command for ScanCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let matches = self.run(ui)?;

        let json = if self.args.pretty {
            serde_json::to_string_pretty(&matches)
        } else {
            serde_json::to_string(&matches)
        }
        .unwrap_or_default();
        println!("{}", json);

        Ok(CommandResult::success())
    }
}
