//! Resolution step generation.
//!
//! Turns a check report into a numbered list of actions that would bring the
//! environment into a satisfied state: install commands for missing plugins,
//! update commands for version mismatches, enable hints for installed-but-
//! disabled plugins, and install/update hints for system tools.

use super::{CheckReport, DepKind, ResolutionResult, Status};
use std::fmt;

/// Which bucket a step's dependency came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepBucket {
    Required,
    Optional,
    RequiredSystem,
    OptionalSystem,
}

impl StepBucket {
    /// Whether unresolved steps in this bucket should fail the pipeline.
    pub fn is_required(&self) -> bool {
        matches!(self, StepBucket::Required | StepBucket::RequiredSystem)
    }
}

impl fmt::Display for StepBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            StepBucket::Required => "Required",
            StepBucket::Optional => "Optional",
            StepBucket::RequiredSystem => "Required System",
            StepBucket::OptionalSystem => "Optional System",
        };
        f.write_str(label)
    }
}

/// A single action resolving one unsatisfied dependency.
#[derive(Debug, Clone)]
pub struct ResolutionStep {
    pub bucket: StepBucket,
    pub name: String,
    pub dependent: String,
    pub issue: String,
    pub resolution: String,
}

/// Generate resolution steps for every dependency that needs attention.
///
/// Besides unsatisfied dependencies, satisfied-but-disabled plugins get an
/// enable step — the dependency is technically met but the dependent plugin
/// will not see it.
pub fn generate_steps(report: &CheckReport) -> Vec<ResolutionStep> {
    report
        .all_results()
        .filter_map(|(dependent, result)| step_for(dependent, result))
        .collect()
}

/// Whether any step concerns a required-bucket dependency.
pub fn has_required_issues(steps: &[ResolutionStep]) -> bool {
    steps.iter().any(|s| s.bucket.is_required())
}

/// Format steps as a numbered markdown-ish list.
pub fn format_steps(steps: &[ResolutionStep]) -> String {
    if steps.is_empty() {
        return "All dependencies satisfied.".to_string();
    }

    let mut lines = vec![format!(
        "## Resolution Steps ({} issue{})",
        steps.len(),
        if steps.len() == 1 { "" } else { "s" }
    )];
    lines.push(String::new());

    for (i, step) in steps.iter().enumerate() {
        lines.push(format!(
            "{}. [{}] {} (required by {})",
            i + 1,
            step.bucket,
            step.name,
            step.dependent
        ));
        lines.push(format!("   {}", step.resolution));
        lines.push(String::new());
    }

    lines.join("\n").trim_end().to_string()
}

fn step_for(dependent: &str, result: &ResolutionResult) -> Option<ResolutionStep> {
    let bucket = match (result.kind, result.required) {
        (DepKind::Plugin, true) => StepBucket::Required,
        (DepKind::Plugin, false) => StepBucket::Optional,
        (DepKind::System, true) => StepBucket::RequiredSystem,
        (DepKind::System, false) => StepBucket::OptionalSystem,
    };

    let (issue, resolution) = match (result.kind, result.status) {
        (_, Status::Satisfied) => {
            // Only disabled plugins warrant a step for a satisfied dependency.
            if result.kind == DepKind::Plugin && result.enabled == Some(false) {
                (
                    "Installed but not enabled".to_string(),
                    "Enable via /plugin TUI".to_string(),
                )
            } else {
                return None;
            }
        }
        (DepKind::Plugin, Status::Missing) => {
            if result.enabled.is_some() {
                // Present in inventory, but the recorded version is unknown.
                (
                    "Installed but version unknown".to_string(),
                    format!("/plugin update {}", plugin_spec(result)),
                )
            } else {
                (
                    "Not installed".to_string(),
                    format!("/plugin install {}", plugin_spec(result)),
                )
            }
        }
        (DepKind::Plugin, Status::VersionMismatch) => (
            mismatch_issue(result),
            format!("/plugin update {}", plugin_spec(result)),
        ),
        (DepKind::System, Status::Missing) => {
            ("Not installed".to_string(), format!("Install {}", result.name))
        }
        (DepKind::System, Status::VersionMismatch) => (
            mismatch_issue(result),
            format!(
                "Update {} to satisfy version {}",
                result.name, result.declared_range
            ),
        ),
    };

    Some(ResolutionStep {
        bucket,
        name: result.name.clone(),
        dependent: dependent.to_string(),
        issue,
        resolution,
    })
}

fn mismatch_issue(result: &ResolutionResult) -> String {
    format!(
        "Version mismatch: {} does not satisfy {}",
        result.installed_version.as_deref().unwrap_or("unknown"),
        result.declared_range
    )
}

fn plugin_spec(result: &ResolutionResult) -> String {
    match &result.marketplace {
        Some(mkt) => format!("{}@{}", result.name, mkt),
        None => result.name.clone(),
    }
}
