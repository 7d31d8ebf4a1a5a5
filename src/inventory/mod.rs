//! Environment inventory: what plugins exist, at what version, enabled or not.
//!
//! The inventory is built once at the top of an invocation and passed by
//! reference into the resolver, which keeps resolution a pure function over
//! (manifest, inventory). Nothing here mutates after construction.

pub mod probe;

pub use probe::{FakeToolProbe, ProbedTool, SystemToolProbe, ToolInventory, ToolProbe};

use crate::config::{split_plugin_key, HostConfig};
use crate::error::{PlugcheckError, Result};
use crate::version::Version;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Which plugins a scan covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    /// Enabled plugins only (the default).
    #[default]
    Enabled,
    /// All installed plugins.
    Installed,
    /// Installed plugins plus everything in known marketplaces.
    All,
}

/// One installed plugin, as seen by the resolver.
#[derive(Debug, Clone)]
pub struct InventoryEntry {
    pub name: String,
    pub marketplace: String,
    /// Version string as recorded by the host.
    pub raw_version: Option<String>,
    /// Parsed version; `None` when the recorded string is absent or not a
    /// version (git SHA pins, for instance).
    pub version: Option<Version>,
    pub enabled: bool,
    pub install_path: Option<PathBuf>,
}

/// Installed plugin inventory, built once per run from host config.
#[derive(Debug, Default)]
pub struct PluginInventory {
    entries: Vec<InventoryEntry>,
}

impl PluginInventory {
    /// Build the inventory from host configuration.
    ///
    /// Only the first recorded install of each plugin key is considered, as
    /// the host treats later entries as shadowed.
    pub fn from_config(config: &HostConfig) -> Self {
        let mut entries = Vec::new();
        for (key, installs) in &config.installed_plugins {
            let Some(install) = installs.first() else {
                continue;
            };
            let (name, marketplace) = split_plugin_key(key);
            let raw_version = install.version.clone();
            entries.push(InventoryEntry {
                name: name.to_string(),
                marketplace: marketplace.to_string(),
                version: raw_version.as_deref().and_then(Version::parse),
                raw_version,
                enabled: config.enabled_plugins.get(key).copied().unwrap_or(false),
                install_path: install.install_path.clone(),
            });
        }
        Self { entries }
    }

    /// Find an installed plugin.
    ///
    /// When a marketplace is given, an exact `name@marketplace` match wins;
    /// otherwise (and as a fallback) the first install matching the bare name
    /// is returned.
    pub fn lookup(&self, name: &str, marketplace: Option<&str>) -> Option<&InventoryEntry> {
        if let Some(marketplace) = marketplace {
            if let Some(entry) = self
                .entries
                .iter()
                .find(|e| e.name == name && e.marketplace == marketplace)
            {
                return Some(entry);
            }
        }
        self.entries.iter().find(|e| e.name == name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[cfg(test)]
    pub fn from_entries(entries: Vec<InventoryEntry>) -> Self {
        Self { entries }
    }
}

/// A plugin whose manifest will be checked.
#[derive(Debug, Clone)]
pub struct PluginRef {
    /// Canonical `name@marketplace` key.
    pub key: String,
    pub marketplace: String,
    pub install_path: Option<PathBuf>,
}

/// Select the plugins to check for the given scope.
///
/// `specific` overrides `scope`: it names one plugin (`name` or
/// `name@marketplace`) and fails when that plugin is not installed.
pub fn plugins_in_scope(
    config: &HostConfig,
    scope: Scope,
    specific: Option<&str>,
) -> Result<Vec<PluginRef>> {
    if let Some(spec) = specific {
        return specific_plugin(config, spec).map(|p| vec![p]);
    }

    let mut refs = Vec::new();
    match scope {
        Scope::Enabled => {
            for (key, enabled) in &config.enabled_plugins {
                if !enabled {
                    continue;
                }
                let (_, marketplace) = split_plugin_key(key);
                if let Some(install) = config.installed_plugins.get(key).and_then(|i| i.first()) {
                    refs.push(PluginRef {
                        key: key.clone(),
                        marketplace: marketplace.to_string(),
                        install_path: install.install_path.clone(),
                    });
                }
            }
        }
        Scope::Installed => {
            refs.extend(installed_refs(config));
        }
        Scope::All => {
            refs.extend(installed_refs(config));
            let marketplace_only = marketplace_refs(config, &refs);
            refs.extend(marketplace_only);
        }
    }
    Ok(refs)
}

fn installed_refs(config: &HostConfig) -> Vec<PluginRef> {
    let mut refs = Vec::new();
    for (key, installs) in &config.installed_plugins {
        let Some(install) = installs.first() else {
            continue;
        };
        let (_, marketplace) = split_plugin_key(key);
        refs.push(PluginRef {
            key: key.clone(),
            marketplace: marketplace.to_string(),
            install_path: install.install_path.clone(),
        });
    }
    refs
}

/// Plugins present in known marketplaces but not installed.
///
/// Marketplace directory listings are sorted so report order is stable.
fn marketplace_refs(config: &HostConfig, already: &[PluginRef]) -> Vec<PluginRef> {
    let mut refs = Vec::new();
    for (mkt_name, mkt_info) in &config.known_marketplaces {
        let Some(location) = &mkt_info.install_location else {
            continue;
        };
        let plugins_dir = location.join("plugins");
        let Ok(read_dir) = std::fs::read_dir(&plugins_dir) else {
            continue;
        };

        let mut dirs: Vec<PathBuf> = read_dir
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_dir() && path.join(".claude-plugin").exists())
            .collect();
        dirs.sort();

        for dir in dirs {
            let Some(plugin_name) = dir.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            let key = crate::config::plugin_key(plugin_name, mkt_name);
            if already.iter().any(|r| r.key == key) || refs.iter().any(|r: &PluginRef| r.key == key)
            {
                continue;
            }
            refs.push(PluginRef {
                key,
                marketplace: mkt_name.clone(),
                install_path: Some(dir),
            });
        }
    }
    refs
}

fn specific_plugin(config: &HostConfig, spec: &str) -> Result<PluginRef> {
    let (name, marketplace) = split_plugin_key(spec);

    if !marketplace.is_empty() {
        if let Some(install) = config.installed_plugins.get(spec).and_then(|i| i.first()) {
            return Ok(PluginRef {
                key: spec.to_string(),
                marketplace: marketplace.to_string(),
                install_path: install.install_path.clone(),
            });
        }
    } else {
        // Search by bare name across marketplaces.
        for (key, installs) in &config.installed_plugins {
            let (key_name, key_mkt) = split_plugin_key(key);
            if key_name == name {
                if let Some(install) = installs.first() {
                    return Ok(PluginRef {
                        key: key.clone(),
                        marketplace: key_mkt.to_string(),
                        install_path: install.install_path.clone(),
                    });
                }
            }
        }
    }

    Err(PlugcheckError::PluginNotInstalled {
        plugin: spec.to_string(),
    })
}
