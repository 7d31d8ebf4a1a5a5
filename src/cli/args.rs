//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use crate::inventory::Scope;
use crate::scanner::PatternType;
use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// plugcheck - Dependency checker for Claude Code plugins.
#[derive(Debug, Parser)]
#[command(name = "plugcheck")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Claude config root (overrides ~/.claude)
    #[arg(long, global = true, env = "CLAUDE_CONFIG_DIR", value_name = "DIR")]
    pub claude_dir: Option<PathBuf>,

    /// Show verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Check plugin dependencies (default if no command specified)
    Check(CheckArgs),

    /// Render a check report as ASCII tables
    Render(RenderArgs),

    /// Generate resolution steps from a check report
    Resolve(ResolveArgs),

    /// Scan plugin content for dependency references
    Scan(ScanArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `check` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct CheckArgs {
    /// Check all installed plugins (default: only enabled)
    #[arg(long, group = "scope")]
    pub installed: bool,

    /// Check all plugins in known marketplaces
    #[arg(long, group = "scope")]
    pub all: bool,

    /// Check a specific plugin (format: name or name@marketplace)
    #[arg(long, value_name = "NAME", group = "scope")]
    pub plugin: Option<String>,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,
}

impl CheckArgs {
    /// Scan scope selected by the flags. `--plugin` is handled separately.
    pub fn scope(&self) -> Scope {
        if self.all {
            Scope::All
        } else if self.installed {
            Scope::Installed
        } else {
            Scope::Enabled
        }
    }
}

/// Arguments for the `render` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct RenderArgs {
    /// Report JSON file (reads stdin when omitted)
    pub file: Option<PathBuf>,
}

/// Arguments for the `resolve` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ResolveArgs {
    /// Report JSON file (reads stdin when omitted)
    pub file: Option<PathBuf>,
}

/// Arguments for the `scan` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ScanArgs {
    /// Scan a specific installed plugin (format: name or name@marketplace)
    #[arg(long, value_name = "NAME", group = "target")]
    pub plugin: Option<String>,

    /// Scan all plugins from a known marketplace
    #[arg(long, value_name = "NAME", group = "target")]
    pub marketplace: Option<String>,

    /// Scan a local plugin directory
    #[arg(long, value_name = "PATH", group = "target")]
    pub plugin_dir: Option<PathBuf>,

    /// Scan a local marketplace directory
    #[arg(long, value_name = "PATH", group = "target")]
    pub marketplace_dir: Option<PathBuf>,

    /// Filter results by pattern type
    #[arg(long = "type", value_name = "TYPE")]
    pub pattern_type: Option<PatternType>,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
