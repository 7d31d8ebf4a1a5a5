//! Check report types and serialization.
//!
//! The report is the tool's sole output contract: one JSON document with
//! top-level summary counts and a per-plugin breakdown. Downstream consumers
//! (`plugcheck render`, `plugcheck resolve`, and anything else reading the
//! JSON) depend on this shape, so field names are fixed camelCase and the
//! document carries no timestamps — two scans of an unchanged environment
//! serialize byte-identically.

pub mod advice;
pub mod render;

use crate::error::{PlugcheckError, Result};
use crate::inventory::Scope;
use serde::{Deserialize, Serialize};

/// Satisfaction status of one declared dependency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    Satisfied,
    Missing,
    VersionMismatch,
}

/// Whether a dependency names a plugin or a system tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DepKind {
    Plugin,
    System,
}

/// One row of the report: a declared dependency and how it resolved.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolutionResult {
    pub name: String,
    pub kind: DepKind,
    pub required: bool,
    pub declared_range: String,

    /// Marketplace the dependency was declared against (plugin deps only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marketplace: Option<String>,

    /// Installed version; `null` when absent or unknown.
    #[serde(default)]
    pub installed_version: Option<String>,

    /// Whether the plugin is enabled (plugin deps only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,

    pub status: Status,

    /// Advisory text for anything other than a clean pass.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
}

/// Results for one scanned plugin.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginReport {
    /// The scanned plugin's `name@marketplace` key.
    pub plugin: String,
    pub marketplace: String,

    /// Manifest loading failed; no results for this plugin.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    #[serde(default)]
    pub results: Vec<ResolutionResult>,
}

/// Top-level summary counts across every plugin and bucket.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub satisfied_count: usize,
    pub missing_count: usize,
    pub mismatch_count: usize,
}

/// The consolidated scan output.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckReport {
    pub checked_scope: Scope,
    pub checked_plugin: Option<String>,
    pub summary: Summary,
    pub plugins: Vec<PluginReport>,
}

impl CheckReport {
    /// Assemble a report, computing summary counts from the plugin results.
    pub fn new(scope: Scope, checked_plugin: Option<String>, plugins: Vec<PluginReport>) -> Self {
        let mut summary = Summary::default();
        for plugin in &plugins {
            for result in &plugin.results {
                match result.status {
                    Status::Satisfied => summary.satisfied_count += 1,
                    Status::Missing => summary.missing_count += 1,
                    Status::VersionMismatch => summary.mismatch_count += 1,
                }
            }
        }
        Self {
            checked_scope: scope,
            checked_plugin,
            summary,
            plugins,
        }
    }

    /// Serialize to the wire JSON.
    pub fn to_json(&self, pretty: bool) -> String {
        // Serialization of these derived types cannot fail.
        if pretty {
            serde_json::to_string_pretty(self).unwrap_or_default()
        } else {
            serde_json::to_string(self).unwrap_or_default()
        }
    }

    /// Parse a report produced by `plugcheck check`.
    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(|e| PlugcheckError::InvalidReport {
            message: e.to_string(),
        })
    }

    /// Iterate every result with its owning plugin key.
    pub fn all_results(&self) -> impl Iterator<Item = (&str, &ResolutionResult)> {
        self.plugins
            .iter()
            .flat_map(|p| p.results.iter().map(move |r| (p.plugin.as_str(), r)))
    }
}
