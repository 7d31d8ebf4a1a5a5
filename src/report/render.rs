//! Human-readable table rendering of a check report.
//!
//! Produces the four dependency tables (required/optional × plugin/system)
//! with box-drawing borders, a status symbol per row, and a notes column
//! carrying the resolver's advisory text. Empty tables are skipped.

use super::{CheckReport, DepKind, ResolutionResult, Status};
use crate::ui::Table;

/// Rendered table width cap. Terminals narrower than this will wrap, but the
/// notes column stops growing here.
const MAX_TABLE_WIDTH: usize = 120;

/// Render a full report as titled ASCII tables.
pub fn render_report(report: &CheckReport) -> String {
    let mut sections: Vec<String> = Vec::new();

    match &report.checked_plugin {
        Some(plugin) => sections.push(format!("Dependency check for plugin: {}", plugin)),
        None => sections.push(format!(
            "Dependency check scope: {}",
            serde_json::to_value(report.checked_scope)
                .ok()
                .and_then(|v| v.as_str().map(str::to_string))
                .unwrap_or_default()
        )),
    }

    let buckets: [(&str, DepKind, bool); 4] = [
        ("Required Plugin Dependencies", DepKind::Plugin, true),
        ("Optional Plugin Dependencies", DepKind::Plugin, false),
        ("Required System Dependencies", DepKind::System, true),
        ("Optional System Dependencies", DepKind::System, false),
    ];

    let mut any_rows = false;
    for (title, kind, required) in buckets {
        let rows: Vec<(&str, &ResolutionResult)> = report
            .all_results()
            .filter(|(_, r)| r.kind == kind && r.required == required)
            .collect();
        if rows.is_empty() {
            continue;
        }
        any_rows = true;

        let table = match kind {
            DepKind::Plugin => plugin_table(&rows),
            DepKind::System => system_table(&rows),
        };
        sections.push(format!("\n{}\n\n{}", title, table.render()));
    }

    let errors: Vec<String> = report
        .plugins
        .iter()
        .filter_map(|p| p.error.as_ref().map(|e| format!("  {}: {}", p.plugin, e)))
        .collect();
    if !errors.is_empty() {
        sections.push(format!("\nManifest errors:\n{}", errors.join("\n")));
    }

    if !any_rows && errors.is_empty() {
        sections.push("\nNo dependencies found for checked plugins.".to_string());
    } else {
        let s = &report.summary;
        sections.push(format!(
            "\n{} satisfied, {} missing, {} version mismatch",
            s.satisfied_count, s.missing_count, s.mismatch_count
        ));
    }

    sections.join("\n")
}

fn plugin_table(rows: &[(&str, &ResolutionResult)]) -> Table {
    let mut table = Table::new(vec![
        "plugin",
        "marketplace",
        "dependent",
        "range",
        "installed",
        "enabled",
        "status",
        "notes",
    ])
    .with_max_width(MAX_TABLE_WIDTH);

    for (dependent, result) in rows {
        table.add_row(vec![
            result.name.clone(),
            result.marketplace.clone().unwrap_or_default(),
            dependent.to_string(),
            result.declared_range.clone(),
            result.installed_version.clone().unwrap_or_default(),
            match result.enabled {
                Some(true) => "✓".to_string(),
                Some(false) => "✗".to_string(),
                None => String::new(),
            },
            status_cell(result.status),
            result.help.clone().unwrap_or_default(),
        ]);
    }
    table
}

fn system_table(rows: &[(&str, &ResolutionResult)]) -> Table {
    let mut table = Table::new(vec![
        "command",
        "dependent",
        "range",
        "installed",
        "status",
        "notes",
    ])
    .with_max_width(MAX_TABLE_WIDTH);

    for (dependent, result) in rows {
        table.add_row(vec![
            result.name.clone(),
            dependent.to_string(),
            result.declared_range.clone(),
            result.installed_version.clone().unwrap_or_default(),
            status_cell(result.status),
            result.help.clone().unwrap_or_default(),
        ]);
    }
    table
}

fn status_cell(status: Status) -> String {
    match status {
        Status::Satisfied => "✓".to_string(),
        Status::Missing => "✗ missing".to_string(),
        Status::VersionMismatch => "✗ mismatch".to_string(),
    }
}
