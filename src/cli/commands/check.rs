//! Check command implementation.
//!
//! `plugcheck check` is the core of the tool: it loads every manifest in
//! scope, builds the plugin and tool inventories once, resolves each manifest
//! against them, and writes one consolidated JSON report to stdout.
//!
//! The exit code reflects whether the scan itself ran, not whether
//! dependencies are satisfied — unmet dependencies are report content.

use std::path::{Path, PathBuf};

use crate::cli::args::CheckArgs;
use crate::config::HostConfig;
use crate::error::{PlugcheckError, Result};
use crate::inventory::{
    plugins_in_scope, PluginInventory, PluginRef, SystemToolProbe, ToolInventory, ToolProbe,
};
use crate::manifest::{load_manifest, DependencyManifest};
use crate::report::{CheckReport, PluginReport};
use crate::resolver::{declared_tool_names, resolve};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// Outcome of loading one plugin's manifest during a broad scan.
enum LoadedManifest {
    /// Manifest parsed and validated.
    Ok(DependencyManifest),
    /// Plugin declares nothing (no manifest file).
    None,
    /// Manifest unreadable or invalid; reported as an error row.
    Failed(String),
}

/// The check command implementation.
pub struct CheckCommand {
    claude_dir: Option<PathBuf>,
    args: CheckArgs,
}

impl CheckCommand {
    /// Create a new check command.
    pub fn new(claude_dir: Option<&Path>, args: CheckArgs) -> Self {
        Self {
            claude_dir: claude_dir.map(Path::to_path_buf),
            args,
        }
    }

    /// Run the scan with an injected tool probe and return the report.
    ///
    /// Separated from [`Command::execute`] so tests can use a fake probe and
    /// inspect the report without capturing stdout.
    pub fn run(&self, probe: &dyn ToolProbe, ui: &mut dyn UserInterface) -> Result<CheckReport> {
        let scope = self.args.scope();
        let specific = self.args.plugin.as_deref();

        let config = HostConfig::load(self.claude_dir.as_deref());
        let refs = plugins_in_scope(&config, scope, specific)?;

        if ui.output_mode().shows_detail() {
            ui.message(&format!(
                "Checking {} plugin(s) from {}",
                refs.len(),
                config.claude_dir.display()
            ));
        }

        // Load every manifest first so the distinct tool names are known
        // before any probe runs.
        let mut loaded: Vec<(PluginRef, LoadedManifest)> = Vec::new();
        for plugin_ref in refs {
            let outcome = self.load_one(&plugin_ref, specific.is_some())?;
            loaded.push((plugin_ref, outcome));
        }

        let manifests = loaded.iter().filter_map(|(_, m)| match m {
            LoadedManifest::Ok(manifest) => Some(manifest),
            _ => None,
        });
        let tools = ToolInventory::probe_all(probe, declared_tool_names(manifests));
        let plugins = PluginInventory::from_config(&config);

        let mut reports = Vec::new();
        for (plugin_ref, outcome) in &loaded {
            match outcome {
                LoadedManifest::Ok(manifest) => reports.push(PluginReport {
                    plugin: plugin_ref.key.clone(),
                    marketplace: plugin_ref.marketplace.clone(),
                    error: None,
                    results: resolve(manifest, &plugins, &tools),
                }),
                LoadedManifest::Failed(message) => reports.push(PluginReport {
                    plugin: plugin_ref.key.clone(),
                    marketplace: plugin_ref.marketplace.clone(),
                    error: Some(message.clone()),
                    results: Vec::new(),
                }),
                LoadedManifest::None => {}
            }
        }

        Ok(CheckReport::new(
            scope,
            specific.map(str::to_string),
            reports,
        ))
    }

    /// Load one plugin's manifest.
    ///
    /// For a broad scan a bad manifest becomes report data; for an explicitly
    /// named plugin it is fatal, and a plugin without a manifest at all is a
    /// manifest-not-found error.
    fn load_one(&self, plugin_ref: &PluginRef, fatal: bool) -> Result<LoadedManifest> {
        let Some(install_path) = &plugin_ref.install_path else {
            if fatal {
                return Err(PlugcheckError::ManifestNotFound {
                    plugin: plugin_ref.key.clone(),
                });
            }
            return Ok(LoadedManifest::None);
        };

        match load_manifest(install_path) {
            Ok(Some(manifest)) => Ok(LoadedManifest::Ok(manifest)),
            Ok(None) => {
                if fatal {
                    Err(PlugcheckError::ManifestNotFound {
                        plugin: plugin_ref.key.clone(),
                    })
                } else {
                    Ok(LoadedManifest::None)
                }
            }
            Err(e) => {
                if fatal {
                    Err(e)
                } else {
                    tracing::warn!("Skipping {}: {}", plugin_ref.key, e);
                    Ok(LoadedManifest::Failed(e.to_string()))
                }
            }
        }
    }
}

impl Command for CheckCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let report = self.run(&SystemToolProbe::new(), ui)?;

        println!("{}", report.to_json(self.args.pretty));

        if ui.output_mode().shows_detail() {
            let s = &report.summary;
            ui.message(&format!(
                "{} satisfied, {} missing, {} version mismatch",
                s.satisfied_count, s.missing_count, s.mismatch_count
            ));
        }

        Ok(CommandResult::success())
    }
}
