//! Dependency resolution.
//!
//! [`resolve`] is a pure function from (manifest, inventories) to a list of
//! [`ResolutionResult`]. The inventories are built once per run and passed in
//! by reference, so resolution itself never touches the filesystem or spawns
//! processes.
//!
//! Output ordering is part of the contract: required buckets come before
//! optional buckets (plugins before system tools within each), and entries
//! keep their manifest declaration order. The renderer and resolution-step
//! generator rely on this and never re-sort.

use crate::inventory::{PluginInventory, ToolInventory};
use crate::manifest::{DependencyManifest, RangeMap};
use crate::report::{DepKind, ResolutionResult, Status};
use crate::version::{Constraint, Version};

/// Resolve every dependency declared in a manifest against the inventories.
pub fn resolve(
    manifest: &DependencyManifest,
    plugins: &PluginInventory,
    tools: &ToolInventory,
) -> Vec<ResolutionResult> {
    let mut results = Vec::new();

    push_plugin_bucket(&mut results, &manifest.dependencies, true, plugins);
    push_system_bucket(&mut results, &manifest.system_dependencies, true, tools);
    push_plugin_bucket(&mut results, &manifest.optional_dependencies, false, plugins);
    push_system_bucket(
        &mut results,
        &manifest.optional_system_dependencies,
        false,
        tools,
    );

    results
}

/// Distinct system tool names a set of manifests declares, in first-seen
/// order. Computed before probing so each tool is probed at most once.
pub fn declared_tool_names<'a, I>(manifests: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a DependencyManifest>,
{
    let mut names: Vec<String> = Vec::new();
    for manifest in manifests {
        for (name, _) in manifest
            .system_dependencies
            .iter()
            .chain(manifest.optional_system_dependencies.iter())
        {
            if !names.iter().any(|n| n == name) {
                names.push(name.to_string());
            }
        }
    }
    names
}

fn push_plugin_bucket(
    results: &mut Vec<ResolutionResult>,
    bucket: &RangeMap,
    required: bool,
    plugins: &PluginInventory,
) {
    for (name, range) in bucket.iter() {
        results.push(resolve_plugin_dep(name, range, required, plugins));
    }
}

fn push_system_bucket(
    results: &mut Vec<ResolutionResult>,
    bucket: &RangeMap,
    required: bool,
    tools: &ToolInventory,
) {
    for (name, range) in bucket.iter() {
        results.push(resolve_system_dep(name, range, required, tools));
    }
}

fn resolve_plugin_dep(
    spec: &str,
    range: &str,
    required: bool,
    plugins: &PluginInventory,
) -> ResolutionResult {
    let (name, marketplace) = crate::config::split_plugin_key(spec);
    let marketplace = (!marketplace.is_empty()).then(|| marketplace.to_string());

    let mut result = ResolutionResult {
        name: name.to_string(),
        kind: DepKind::Plugin,
        required,
        declared_range: range.to_string(),
        marketplace: marketplace.clone(),
        installed_version: None,
        enabled: None,
        status: Status::Missing,
        help: None,
    };

    let Some(entry) = plugins.lookup(name, marketplace.as_deref()) else {
        result.help = Some(match &marketplace {
            Some(mkt) => format!(
                "Plugin {} from {} is not installed. Install with: /plugin install {}@{}",
                name, mkt, name, mkt
            ),
            None => format!(
                "Plugin {} is not installed. Install with: /plugin install {}",
                name, name
            ),
        });
        return result;
    };

    result.enabled = Some(entry.enabled);

    let Some(installed) = &entry.version else {
        // Installed, but the recorded version is absent or not a version
        // (git SHA pin). Presence without a known version cannot be verified
        // against a range.
        result.help = Some(format!(
            "Plugin {} is installed but its version is unknown",
            name
        ));
        return result;
    };

    result.installed_version = entry.raw_version.clone();

    if range_satisfied(installed, range) {
        result.status = Status::Satisfied;
        if !entry.enabled {
            result.help = Some(format!("Plugin {} is installed but not enabled", name));
        }
    } else {
        result.status = Status::VersionMismatch;
        result.help = Some(format!(
            "Installed version {} does not satisfy required version {}",
            installed, range
        ));
    }

    result
}

fn resolve_system_dep(
    name: &str,
    range: &str,
    required: bool,
    tools: &ToolInventory,
) -> ResolutionResult {
    let mut result = ResolutionResult {
        name: name.to_string(),
        kind: DepKind::System,
        required,
        declared_range: range.to_string(),
        marketplace: None,
        installed_version: None,
        enabled: None,
        status: Status::Missing,
        help: None,
    };

    let Some(tool) = tools.lookup(name) else {
        result.help = Some(format!(
            "Command '{}' is not installed or not in PATH. Please install {} to use this plugin.",
            name, name
        ));
        return result;
    };

    let Some(installed) = &tool.version else {
        result.help = Some(format!(
            "Command '{}' was found but its version could not be determined",
            name
        ));
        return result;
    };

    result.installed_version = Some(installed.to_string());

    if range_satisfied(installed, range) {
        result.status = Status::Satisfied;
    } else {
        result.status = Status::VersionMismatch;
        result.help = Some(format!(
            "Installed version {} does not satisfy required version {}",
            installed, range
        ));
    }

    result
}

/// A range that cannot be parsed is treated as satisfied: the dependency is
/// installed, and an unintelligible declaration is the manifest author's
/// problem, not the user's.
fn range_satisfied(installed: &Version, range: &str) -> bool {
    match Constraint::parse(range) {
        Some(constraint) => constraint.satisfied_by(installed),
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::{FakeToolProbe, InventoryEntry, ToolInventory};
    use crate::manifest::DependencyManifest;

    fn plugin_entry(name: &str, marketplace: &str, version: Option<&str>, enabled: bool) -> InventoryEntry {
        InventoryEntry {
            name: name.to_string(),
            marketplace: marketplace.to_string(),
            raw_version: version.map(str::to_string),
            version: version.and_then(Version::parse),
            enabled,
            install_path: None,
        }
    }

    fn manifest(json: &str) -> DependencyManifest {
        serde_json::from_str(json).unwrap()
    }

    fn no_tools() -> ToolInventory {
        ToolInventory::probe_all(&FakeToolProbe::new(), Vec::<String>::new())
    }

    #[test]
    fn empty_manifest_resolves_to_nothing() {
        let results = resolve(
            &DependencyManifest::default(),
            &PluginInventory::default(),
            &no_tools(),
        );
        assert!(results.is_empty());
    }

    #[test]
    fn installed_matching_version_is_satisfied() {
        let plugins =
            PluginInventory::from_entries(vec![plugin_entry("foo", "m", Some("1.3.0"), true)]);
        let results = resolve(
            &manifest(r#"{"dependencies": {"foo": "^1.2.0"}}"#),
            &plugins,
            &no_tools(),
        );
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].status, Status::Satisfied);
        assert_eq!(results[0].installed_version.as_deref(), Some("1.3.0"));
        assert!(results[0].help.is_none());
    }

    #[test]
    fn installed_wrong_version_is_mismatch() {
        let plugins =
            PluginInventory::from_entries(vec![plugin_entry("foo", "m", Some("2.0.0"), true)]);
        let results = resolve(
            &manifest(r#"{"dependencies": {"foo": "^1.2.0"}}"#),
            &plugins,
            &no_tools(),
        );
        assert_eq!(results[0].status, Status::VersionMismatch);
        assert!(results[0].help.as_ref().unwrap().contains("2.0.0"));
    }

    #[test]
    fn absent_plugin_is_missing_regardless_of_range() {
        let results = resolve(
            &manifest(r#"{"dependencies": {"foo": "*"}}"#),
            &PluginInventory::default(),
            &no_tools(),
        );
        assert_eq!(results[0].status, Status::Missing);
        assert!(results[0]
            .help
            .as_ref()
            .unwrap()
            .contains("/plugin install foo"));
    }

    #[test]
    fn unknown_version_is_missing_even_when_installed() {
        // Git-SHA pinned plugin: present, but version unverifiable
        let plugins = PluginInventory::from_entries(vec![plugin_entry(
            "foo",
            "m",
            Some("a1b2c3d4e5f6"),
            true,
        )]);
        let results = resolve(
            &manifest(r#"{"dependencies": {"foo": "*"}}"#),
            &plugins,
            &no_tools(),
        );
        assert_eq!(results[0].status, Status::Missing);
        assert!(results[0].installed_version.is_none());
    }

    #[test]
    fn installed_but_disabled_is_satisfied_with_note() {
        let plugins =
            PluginInventory::from_entries(vec![plugin_entry("foo", "m", Some("1.0.0"), false)]);
        let results = resolve(
            &manifest(r#"{"dependencies": {"foo": "1.0.0"}}"#),
            &plugins,
            &no_tools(),
        );
        assert_eq!(results[0].status, Status::Satisfied);
        assert_eq!(results[0].enabled, Some(false));
        assert!(results[0].help.as_ref().unwrap().contains("not enabled"));
    }

    #[test]
    fn marketplace_qualified_dependency() {
        let plugins =
            PluginInventory::from_entries(vec![plugin_entry("foo", "beta", Some("1.0.0"), true)]);
        let results = resolve(
            &manifest(r#"{"dependencies": {"foo@beta": "*"}}"#),
            &plugins,
            &no_tools(),
        );
        assert_eq!(results[0].status, Status::Satisfied);
        assert_eq!(results[0].marketplace.as_deref(), Some("beta"));
        assert_eq!(results[0].name, "foo");
    }

    #[test]
    fn system_tool_version_mismatch() {
        let probe = FakeToolProbe::new().with_tool("gh", "1.9.0");
        let tools = ToolInventory::probe_all(&probe, ["gh"]);
        let results = resolve(
            &manifest(r#"{"systemDependencies": {"gh": ">=2.0.0"}}"#),
            &PluginInventory::default(),
            &tools,
        );
        assert_eq!(results[0].status, Status::VersionMismatch);
        assert_eq!(results[0].kind, DepKind::System);
        assert_eq!(results[0].installed_version.as_deref(), Some("1.9.0"));
    }

    #[test]
    fn system_tool_absent_is_missing() {
        let results = resolve(
            &manifest(r#"{"systemDependencies": {"gh": ">=2.0.0"}}"#),
            &PluginInventory::default(),
            &no_tools(),
        );
        assert_eq!(results[0].status, Status::Missing);
        assert!(results[0].help.as_ref().unwrap().contains("not in PATH"));
    }

    #[test]
    fn system_tool_without_version_is_missing() {
        let probe = FakeToolProbe::new().with_versionless_tool("make");
        let tools = ToolInventory::probe_all(&probe, ["make"]);
        let results = resolve(
            &manifest(r#"{"systemDependencies": {"make": "*"}}"#),
            &PluginInventory::default(),
            &tools,
        );
        assert_eq!(results[0].status, Status::Missing);
        assert!(results[0]
            .help
            .as_ref()
            .unwrap()
            .contains("could not be determined"));
    }

    #[test]
    fn required_buckets_precede_optional_in_declaration_order() {
        let probe = FakeToolProbe::new()
            .with_tool("gh", "2.0.0")
            .with_tool("jq", "1.7.0");
        let tools = ToolInventory::probe_all(&probe, ["gh", "jq"]);
        let plugins = PluginInventory::from_entries(vec![
            plugin_entry("b", "m", Some("1.0.0"), true),
            plugin_entry("a", "m", Some("1.0.0"), true),
        ]);

        let results = resolve(
            &manifest(
                r#"{
                    "optionalDependencies": {"a": "*"},
                    "optionalSystemDependencies": {"jq": "*"},
                    "dependencies": {"b": "*", "zz": "*"},
                    "systemDependencies": {"gh": "*"}
                }"#,
            ),
            &plugins,
            &tools,
        );

        let order: Vec<(&str, bool)> = results
            .iter()
            .map(|r| (r.name.as_str(), r.required))
            .collect();
        assert_eq!(
            order,
            vec![
                ("b", true),
                ("zz", true),
                ("gh", true),
                ("a", false),
                ("jq", false),
            ]
        );
    }

    #[test]
    fn unparseable_range_is_permissive() {
        let plugins =
            PluginInventory::from_entries(vec![plugin_entry("foo", "m", Some("1.0.0"), true)]);
        let results = resolve(
            &manifest(r#"{"dependencies": {"foo": "whatever"}}"#),
            &plugins,
            &no_tools(),
        );
        assert_eq!(results[0].status, Status::Satisfied);
    }

    #[test]
    fn declared_tool_names_dedups_across_manifests() {
        let a = manifest(r#"{"systemDependencies": {"gh": "*", "git": "*"}}"#);
        let b = manifest(
            r#"{"systemDependencies": {"git": "*"}, "optionalSystemDependencies": {"jq": "*"}}"#,
        );
        let names = declared_tool_names([&a, &b]);
        assert_eq!(names, vec!["gh", "git", "jq"]);
    }
}
