//! Best-effort dependency scanner.
//!
//! Walks a plugin's content files (markdown, JSON, Python, shell) and reports
//! every text location that looks like a dependency reference. The output
//! feeds a human review, so precision is traded away for recall: a match is a
//! lead, not a verdict.

pub mod patterns;

pub use patterns::{build_patterns, PatternDefinition, PatternType};

use crate::config::{split_plugin_key, HostConfig};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Characters of context captured on each side of a match.
const CONTEXT_SIZE: usize = 30;

/// Directories never worth scanning.
const SKIP_DIRECTORIES: &[&str] = &[
    ".git",
    "node_modules",
    "__pycache__",
    ".venv",
    "venv",
    ".mypy_cache",
    ".pytest_cache",
    ".ruff_cache",
    "dist",
    "build",
    ".eggs",
];

/// File extensions the scanner reads.
const SCAN_EXTENSIONS: &[&str] = &["md", "json", "py", "sh", "bash"];

/// A single match found during scanning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanMatch {
    pub scanned_plugin: String,
    pub scanned_marketplace: String,
    /// `file:line:column` (1-indexed).
    pub location: String,
    pub matched: String,
    pub context: String,
    #[serde(rename = "type")]
    pub pattern_type: PatternType,
}

/// Scanner for plugin dependency patterns.
pub struct Scanner {
    patterns: Vec<PatternDefinition>,
}

impl Scanner {
    pub fn new() -> Self {
        Self {
            patterns: build_patterns(),
        }
    }

    /// Scan every enabled plugin.
    pub fn scan_enabled(&self, config: &HostConfig) -> Vec<ScanMatch> {
        let mut matches = Vec::new();
        for (key, enabled) in &config.enabled_plugins {
            if !enabled {
                continue;
            }
            let (name, marketplace) = split_plugin_key(key);
            let Some(install) = config.installed_plugins.get(key).and_then(|i| i.first()) else {
                continue;
            };
            if let Some(path) = &install.install_path {
                matches.extend(self.scan_plugin(path, name, marketplace));
            }
        }
        matches
    }

    /// Scan one installed plugin by `name` or `name@marketplace`.
    pub fn scan_specific(&self, config: &HostConfig, spec: &str) -> Vec<ScanMatch> {
        let (name, marketplace) = split_plugin_key(spec);

        for (key, installs) in &config.installed_plugins {
            let (key_name, key_mkt) = split_plugin_key(key);
            if key_name != name || (!marketplace.is_empty() && key_mkt != marketplace) {
                continue;
            }
            if let Some(path) = installs.first().and_then(|i| i.install_path.as_ref()) {
                return self.scan_plugin(path, name, key_mkt);
            }
        }

        tracing::warn!("Plugin not found: {}", spec);
        Vec::new()
    }

    /// Scan every plugin in a known marketplace.
    pub fn scan_marketplace(&self, config: &HostConfig, marketplace: &str) -> Vec<ScanMatch> {
        let Some(info) = config.known_marketplaces.get(marketplace) else {
            tracing::warn!("Marketplace not found: {}", marketplace);
            return Vec::new();
        };
        let Some(location) = &info.install_location else {
            tracing::warn!("No install location for marketplace: {}", marketplace);
            return Vec::new();
        };
        self.scan_marketplace_root(location, marketplace)
    }

    /// Scan a local plugin directory.
    pub fn scan_plugin_dir(&self, path: &Path) -> Vec<ScanMatch> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown");
        self.scan_plugin(path, name, "local")
    }

    /// Scan a local marketplace directory.
    pub fn scan_marketplace_dir(&self, path: &Path) -> Vec<ScanMatch> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("local")
            .to_string();
        self.scan_marketplace_root(path, &name)
    }

    /// Scan a marketplace root: its `plugins/` children, or — for
    /// single-plugin marketplaces — the root itself.
    fn scan_marketplace_root(&self, root: &Path, marketplace: &str) -> Vec<ScanMatch> {
        let plugins_dir = root.join("plugins");
        if !plugins_dir.exists() {
            if root.join(".claude-plugin").exists() {
                let name = root
                    .file_name()
                    .and_then(|n| n.to_str())
                    .unwrap_or("unknown");
                return self.scan_plugin(root, name, marketplace);
            }
            tracing::warn!("No plugins directory found in: {}", root.display());
            return Vec::new();
        }

        let mut matches = Vec::new();
        let mut dirs: Vec<PathBuf> = std::fs::read_dir(&plugins_dir)
            .into_iter()
            .flatten()
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.is_dir() && p.join(".claude-plugin").exists())
            .collect();
        dirs.sort();

        for dir in dirs {
            if let Some(name) = dir.file_name().and_then(|n| n.to_str()) {
                matches.extend(self.scan_plugin(&dir, name, marketplace));
            }
        }
        matches
    }

    /// Scan one plugin directory.
    pub fn scan_plugin(&self, root: &Path, plugin: &str, marketplace: &str) -> Vec<ScanMatch> {
        if !root.exists() {
            tracing::warn!("Plugin path does not exist: {}", root.display());
            return Vec::new();
        }

        let mut matches = Vec::new();
        for file in files_to_scan(root) {
            matches.extend(self.scan_file(&file, plugin, marketplace));
        }
        matches
    }

    fn scan_file(&self, path: &Path, plugin: &str, marketplace: &str) -> Vec<ScanMatch> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!("Could not read {}: {}", path.display(), e);
                return Vec::new();
            }
        };

        let mut matches = Vec::new();
        // One match per (line, col, type); overlapping patterns of the same
        // category would otherwise report the same spot repeatedly.
        let mut seen: HashSet<(usize, usize, PatternType)> = HashSet::new();

        for def in &self.patterns {
            for found in def.pattern.find_iter(&content) {
                let (line, col) = line_col(&content, found.start());
                if !seen.insert((line, col, def.pattern_type)) {
                    continue;
                }
                matches.push(ScanMatch {
                    scanned_plugin: plugin.to_string(),
                    scanned_marketplace: marketplace.to_string(),
                    location: format!("{}:{}:{}", path.display(), line, col),
                    matched: found.as_str().trim().to_string(),
                    context: extract_context(&content, found.start(), found.end()),
                    pattern_type: def.pattern_type,
                });
            }
        }
        matches
    }
}

impl Default for Scanner {
    fn default() -> Self {
        Self::new()
    }
}

/// Collect scannable files under a plugin root, sorted for stable output.
fn files_to_scan(root: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    collect_files(root, &mut files);
    files.sort();
    files
}

fn collect_files(dir: &Path, files: &mut Vec<PathBuf>) {
    let Ok(read_dir) = std::fs::read_dir(dir) else {
        return;
    };
    for entry in read_dir.filter_map(|e| e.ok()) {
        let path = entry.path();
        if path.is_dir() {
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if SKIP_DIRECTORIES.contains(&name.as_ref()) || name.ends_with(".egg-info") {
                continue;
            }
            collect_files(&path, files);
        } else if path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| SCAN_EXTENSIONS.contains(&ext))
        {
            files.push(path);
        }
    }
}

/// 1-indexed line and column for a byte offset.
fn line_col(content: &str, offset: usize) -> (usize, usize) {
    let before = &content[..offset];
    let line = before.matches('\n').count() + 1;
    let col = before
        .rfind('\n')
        .map(|nl| before[nl + 1..].chars().count())
        .unwrap_or_else(|| before.chars().count())
        + 1;
    (line, col)
}

/// Context around a match: `CONTEXT_SIZE` characters each side, whitespace
/// collapsed, ellipses marking truncation.
fn extract_context(content: &str, start: usize, end: usize) -> String {
    let from = snap_back(content, start.saturating_sub(CONTEXT_SIZE));
    let to = snap_forward(content, (end + CONTEXT_SIZE).min(content.len()));

    let mut context = content[from..to].split_whitespace().collect::<Vec<_>>().join(" ");
    if from > 0 {
        context = format!("...{}", context);
    }
    if to < content.len() {
        context = format!("{}...", context);
    }
    context
}

/// Snap a byte index down to the nearest char boundary.
fn snap_back(content: &str, mut idx: usize) -> usize {
    while idx > 0 && !content.is_char_boundary(idx) {
        idx -= 1;
    }
    idx
}

/// Snap a byte index up to the nearest char boundary.
fn snap_forward(content: &str, mut idx: usize) -> usize {
    while idx < content.len() && !content.is_char_boundary(idx) {
        idx += 1;
    }
    idx
}
