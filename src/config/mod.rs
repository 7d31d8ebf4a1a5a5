//! Host configuration discovery and loading.
//!
//! The Claude host records plugin state in three JSON files under the config
//! root (`~/.claude` by default, overridable with `--claude-dir` or
//! `CLAUDE_CONFIG_DIR`):
//!
//! - `plugins/installed_plugins.json` — installed plugins and their versions
//! - `settings.json` — which plugins are enabled
//! - `plugins/known_marketplaces.json` — marketplace install locations
//!
//! A missing or malformed file is logged and treated as empty: the scan should
//! always produce the most complete report possible rather than aborting.
//! Maps are `BTreeMap` so iteration order — and therefore report order — is
//! deterministic across runs.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// One recorded installation of a plugin.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PluginInstall {
    /// Declared plugin version, when the marketplace recorded one.
    #[serde(default)]
    pub version: Option<String>,

    /// Where the plugin is installed on disk.
    #[serde(default, rename = "installPath")]
    pub install_path: Option<PathBuf>,
}

/// A known marketplace and where it lives on disk.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MarketplaceInfo {
    #[serde(default, rename = "installLocation")]
    pub install_location: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
struct InstalledPluginsFile {
    #[serde(default)]
    plugins: BTreeMap<String, Vec<PluginInstall>>,
}

#[derive(Debug, Default, Deserialize)]
struct SettingsFile {
    #[serde(default, rename = "enabledPlugins")]
    enabled_plugins: BTreeMap<String, bool>,
}

/// Plugin state as recorded by the host, loaded once per invocation.
#[derive(Debug, Default)]
pub struct HostConfig {
    /// The config root the state was loaded from.
    pub claude_dir: PathBuf,

    /// Installed plugins keyed by `name@marketplace`.
    pub installed_plugins: BTreeMap<String, Vec<PluginInstall>>,

    /// Enabled flags keyed by `name@marketplace`.
    pub enabled_plugins: BTreeMap<String, bool>,

    /// Known marketplaces keyed by marketplace name.
    pub known_marketplaces: BTreeMap<String, MarketplaceInfo>,
}

impl HostConfig {
    /// Load host configuration from the given config root, or the default
    /// `~/.claude` when none is given.
    pub fn load(claude_dir: Option<&Path>) -> Self {
        let claude_dir = claude_dir
            .map(Path::to_path_buf)
            .unwrap_or_else(default_claude_dir);
        let plugins_dir = claude_dir.join("plugins");

        let installed: InstalledPluginsFile =
            read_json_or_default(&plugins_dir.join("installed_plugins.json"));
        let settings: SettingsFile = read_json_or_default(&claude_dir.join("settings.json"));
        let marketplaces: BTreeMap<String, MarketplaceInfo> =
            read_json_or_default(&plugins_dir.join("known_marketplaces.json"));

        Self {
            claude_dir,
            installed_plugins: installed.plugins,
            enabled_plugins: settings.enabled_plugins,
            known_marketplaces: marketplaces,
        }
    }
}

/// Default Claude config root: `~/.claude`.
pub fn default_claude_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("/"))
        .join(".claude")
}

/// Read and parse a JSON config file, falling back to the default on any
/// failure. A broken host config file should degrade the report, not kill
/// the scan.
fn read_json_or_default<T: serde::de::DeserializeOwned + Default>(path: &Path) -> T {
    if !path.exists() {
        return T::default();
    }
    match fs::read_to_string(path) {
        Ok(content) => match serde_json::from_str(&content) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("Failed to parse {}: {}", path.display(), e);
                T::default()
            }
        },
        Err(e) => {
            tracing::warn!("Failed to read {}: {}", path.display(), e);
            T::default()
        }
    }
}

/// Build the canonical `name@marketplace` plugin key.
pub fn plugin_key(name: &str, marketplace: &str) -> String {
    format!("{}@{}", name, marketplace)
}

/// Split a plugin key into `(name, marketplace)`.
///
/// A key without an `@` has an empty marketplace. The split is at the last
/// `@`, so scoped-looking names survive.
pub fn split_plugin_key(key: &str) -> (&str, &str) {
    match key.rsplit_once('@') {
        Some((name, marketplace)) => (name, marketplace),
        None => (key, ""),
    }
}
