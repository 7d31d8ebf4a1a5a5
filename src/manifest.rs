//! Dependency manifest loading and validation.
//!
//! Each plugin declares its dependencies in
//! `.claude-plugin/extends-plugin.json`:
//!
//! ```json
//! {
//!   "dependencies": { "devs": "^1.0.0" },
//!   "optionalDependencies": { "readme-and-co": "*" },
//!   "systemDependencies": { "gh": ">=2.0.0" },
//!   "optionalSystemDependencies": { "jq": "*" }
//! }
//! ```
//!
//! All four keys are optional; an absent key is an empty map. Declaration
//! order matters — it is preserved into the final report — so the maps are
//! Vec-backed rather than hashed.

use crate::error::{PlugcheckError, Result};
use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Relative path of the manifest inside a plugin's install directory.
const MANIFEST_RELATIVE_PATH: &str = ".claude-plugin/extends-plugin.json";

/// An ordered dependency-name → version-range map.
///
/// Preserves JSON declaration order and rejects duplicate keys at parse time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RangeMap {
    entries: Vec<(String, String)>,
}

impl RangeMap {
    /// Iterate entries in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, r)| (n.as_str(), r.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether a dependency name is declared in this map.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(n, _)| n == name)
    }

    #[cfg(test)]
    pub fn from_pairs(pairs: &[(&str, &str)]) -> Self {
        Self {
            entries: pairs
                .iter()
                .map(|(n, r)| (n.to_string(), r.to_string()))
                .collect(),
        }
    }
}

impl<'de> Deserialize<'de> for RangeMap {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct RangeMapVisitor;

        impl<'de> Visitor<'de> for RangeMapVisitor {
            type Value = RangeMap;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of dependency names to version range strings")
            }

            fn visit_map<A>(self, mut access: A) -> std::result::Result<RangeMap, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries: Vec<(String, String)> = Vec::new();
                while let Some((name, range)) = access.next_entry::<String, String>()? {
                    if entries.iter().any(|(n, _)| *n == name) {
                        return Err(de::Error::custom(format!(
                            "duplicate dependency '{}'",
                            name
                        )));
                    }
                    entries.push((name, range));
                }
                Ok(RangeMap { entries })
            }
        }

        deserializer.deserialize_map(RangeMapVisitor)
    }
}

/// One plugin's declared dependencies, parsed from `extends-plugin.json`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DependencyManifest {
    #[serde(default)]
    pub dependencies: RangeMap,

    #[serde(default, rename = "optionalDependencies")]
    pub optional_dependencies: RangeMap,

    #[serde(default, rename = "systemDependencies")]
    pub system_dependencies: RangeMap,

    #[serde(default, rename = "optionalSystemDependencies")]
    pub optional_system_dependencies: RangeMap,
}

impl DependencyManifest {
    /// Whether the manifest declares no dependencies at all.
    pub fn is_empty(&self) -> bool {
        self.dependencies.is_empty()
            && self.optional_dependencies.is_empty()
            && self.system_dependencies.is_empty()
            && self.optional_system_dependencies.is_empty()
    }

    /// Structural invariant: a name must not appear in both the required and
    /// optional map of the same dependency kind.
    fn validate(&self) -> std::result::Result<(), String> {
        for (name, _) in self.dependencies.iter() {
            if self.optional_dependencies.contains(name) {
                return Err(format!(
                    "'{}' declared in both dependencies and optionalDependencies",
                    name
                ));
            }
        }
        for (name, _) in self.system_dependencies.iter() {
            if self.optional_system_dependencies.contains(name) {
                return Err(format!(
                    "'{}' declared in both systemDependencies and optionalSystemDependencies",
                    name
                ));
            }
        }
        Ok(())
    }
}

/// Path of the dependency manifest inside a plugin's install directory.
pub fn manifest_path(install_path: &Path) -> PathBuf {
    install_path.join(MANIFEST_RELATIVE_PATH)
}

/// Load and validate a plugin's dependency manifest.
///
/// Returns `Ok(None)` when the plugin has no manifest — a plugin without an
/// `extends-plugin.json` simply declares nothing.
///
/// # Errors
///
/// Returns `ManifestParse` for unreadable files or invalid JSON, and
/// `ManifestInvalid` when a structural invariant is violated.
pub fn load_manifest(install_path: &Path) -> Result<Option<DependencyManifest>> {
    let path = manifest_path(install_path);
    if !path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(&path).map_err(|e| PlugcheckError::ManifestParse {
        path: path.clone(),
        message: e.to_string(),
    })?;

    let manifest: DependencyManifest =
        serde_json::from_str(&content).map_err(|e| PlugcheckError::ManifestParse {
            path: path.clone(),
            message: e.to_string(),
        })?;

    manifest
        .validate()
        .map_err(|message| PlugcheckError::ManifestInvalid { path, message })?;

    Ok(Some(manifest))
}
