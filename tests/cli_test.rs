//! Integration tests for the CLI surface.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Build a Claude config root with the given plugin manifests.
///
/// Every plugin is installed at `<root>/installs/<name>` under the `market`
/// marketplace and enabled. `version` is the recorded plugin version.
fn setup_claude_dir(plugins: &[(&str, &str, Option<&str>)]) -> TempDir {
    let temp = TempDir::new().unwrap();
    let plugins_dir = temp.path().join("plugins");
    fs::create_dir_all(&plugins_dir).unwrap();

    let mut installed = Vec::new();
    let mut enabled = Vec::new();
    for (name, version, manifest) in plugins {
        let install_dir = temp.path().join("installs").join(name);
        fs::create_dir_all(&install_dir).unwrap();
        if let Some(manifest) = manifest {
            let meta = install_dir.join(".claude-plugin");
            fs::create_dir_all(&meta).unwrap();
            fs::write(meta.join("extends-plugin.json"), manifest).unwrap();
        }
        installed.push(format!(
            r#""{}@market": [{{"version": "{}", "installPath": "{}"}}]"#,
            name,
            version,
            install_dir.display()
        ));
        enabled.push(format!(r#""{}@market": true"#, name));
    }

    fs::write(
        plugins_dir.join("installed_plugins.json"),
        format!(r#"{{"plugins": {{{}}}}}"#, installed.join(", ")),
    )
    .unwrap();
    fs::write(
        temp.path().join("settings.json"),
        format!(r#"{{"enabledPlugins": {{{}}}}}"#, enabled.join(", ")),
    )
    .unwrap();
    temp
}

fn plugcheck(claude_dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("plugcheck").unwrap();
    cmd.env_remove("CLAUDE_CONFIG_DIR");
    cmd.env_remove("RUST_LOG");
    cmd.args(["--claude-dir", &claude_dir.display().to_string()]);
    cmd
}

#[test]
fn cli_shows_help() {
    let mut cmd = Command::cargo_bin("plugcheck").unwrap();
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Dependency checker"));
}

#[test]
fn cli_shows_version() {
    let mut cmd = Command::cargo_bin("plugcheck").unwrap();
    cmd.arg("--version");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn check_empty_environment_emits_empty_report() {
    let temp = TempDir::new().unwrap();
    plugcheck(temp.path())
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""checkedScope":"enabled""#))
        .stdout(predicate::str::contains(r#""satisfiedCount":0"#));
}

#[test]
fn check_is_the_default_subcommand() {
    let temp = TempDir::new().unwrap();
    plugcheck(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""checkedScope":"enabled""#));
}

#[test]
fn check_reports_satisfied_plugin_dependency() {
    let temp = setup_claude_dir(&[
        ("devs", "1.0.0", Some(r#"{"dependencies": {"foo": "^1.2.0"}}"#)),
        ("foo", "1.3.0", None),
    ]);
    plugcheck(temp.path())
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""status":"satisfied""#));
}

#[test]
fn check_reports_version_mismatch() {
    let temp = setup_claude_dir(&[
        ("devs", "1.0.0", Some(r#"{"dependencies": {"foo": "^1.2.0"}}"#)),
        ("foo", "2.0.0", None),
    ]);
    plugcheck(temp.path())
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""status":"version-mismatch""#))
        .stdout(predicate::str::contains(r#""mismatchCount":1"#));
}

#[test]
fn check_exits_zero_with_missing_dependencies() {
    // Unmet dependencies are report content, not an operational failure.
    let temp = setup_claude_dir(&[(
        "devs",
        "1.0.0",
        Some(r#"{"dependencies": {"absent-plugin": "*"}}"#),
    )]);
    plugcheck(temp.path())
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""status":"missing""#))
        .stdout(predicate::str::contains(r#""missingCount":1"#));
}

#[test]
fn check_named_missing_plugin_fails_without_json() {
    let temp = TempDir::new().unwrap();
    plugcheck(temp.path())
        .args(["check", "--plugin", "nonexistent"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("checkedScope").not())
        .stderr(predicate::str::contains("not installed"));
}

#[test]
fn check_broken_manifest_for_named_plugin_fails() {
    let temp = setup_claude_dir(&[("devs", "1.0.0", Some("{broken"))]);
    plugcheck(temp.path())
        .args(["check", "--plugin", "devs@market"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Manifest error"));
}

#[test]
fn check_broken_manifest_in_broad_scan_is_error_row() {
    let temp = setup_claude_dir(&[
        ("broken", "1.0.0", Some("{broken")),
        ("devs", "1.0.0", Some(r#"{"dependencies": {"devs": "*"}}"#)),
    ]);
    plugcheck(temp.path())
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""error":"#))
        .stdout(predicate::str::contains(r#""status":"satisfied""#));
}

#[test]
fn check_scope_flags_are_exclusive() {
    let temp = TempDir::new().unwrap();
    plugcheck(temp.path())
        .args(["check", "--installed", "--all"])
        .assert()
        .failure();
}

#[test]
fn check_output_is_idempotent() {
    let temp = setup_claude_dir(&[
        ("devs", "1.0.0", Some(r#"{"dependencies": {"foo": ">=1.0.0"}}"#)),
        ("foo", "1.3.0", None),
    ]);

    let first = plugcheck(temp.path()).arg("check").output().unwrap();
    let second = plugcheck(temp.path()).arg("check").output().unwrap();
    assert_eq!(first.stdout, second.stdout);
}

#[test]
fn check_pretty_prints_json() {
    let temp = TempDir::new().unwrap();
    plugcheck(temp.path())
        .args(["check", "--pretty"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"checkedScope\": \"enabled\""));
}

#[test]
fn render_produces_tables() {
    let temp = setup_claude_dir(&[
        ("devs", "1.0.0", Some(r#"{"dependencies": {"foo": "^1.2.0"}}"#)),
        ("foo", "1.3.0", None),
    ]);

    let report = plugcheck(temp.path()).arg("check").output().unwrap().stdout;
    let report_path = temp.path().join("report.json");
    fs::write(&report_path, report).unwrap();

    let mut cmd = Command::cargo_bin("plugcheck").unwrap();
    cmd.args(["render", &report_path.display().to_string()]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Required Plugin Dependencies"))
        .stdout(predicate::str::contains("┌"))
        .stdout(predicate::str::contains("devs@market"));
}

#[test]
fn render_rejects_invalid_input() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("bad.json");
    fs::write(&path, "not json").unwrap();

    let mut cmd = Command::cargo_bin("plugcheck").unwrap();
    cmd.args(["render", &path.display().to_string()]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Invalid report input"));
}

#[test]
fn resolve_lists_steps_and_fails_on_required_issues() {
    let temp = setup_claude_dir(&[(
        "devs",
        "1.0.0",
        Some(r#"{"dependencies": {"absent-plugin": "*"}}"#),
    )]);

    let report = plugcheck(temp.path()).arg("check").output().unwrap().stdout;
    let report_path = temp.path().join("report.json");
    fs::write(&report_path, report).unwrap();

    let mut cmd = Command::cargo_bin("plugcheck").unwrap();
    cmd.args(["resolve", &report_path.display().to_string()]);
    cmd.assert()
        .failure()
        .stdout(predicate::str::contains("Resolution Steps"))
        .stdout(predicate::str::contains("/plugin install absent-plugin"));
}

#[test]
fn resolve_passes_when_all_satisfied() {
    let temp = setup_claude_dir(&[
        ("devs", "1.0.0", Some(r#"{"dependencies": {"foo": "*"}}"#)),
        ("foo", "1.0.0", None),
    ]);

    let report = plugcheck(temp.path()).arg("check").output().unwrap().stdout;
    let report_path = temp.path().join("report.json");
    fs::write(&report_path, report).unwrap();

    let mut cmd = Command::cargo_bin("plugcheck").unwrap();
    cmd.args(["resolve", &report_path.display().to_string()]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("All dependencies satisfied."));
}

#[test]
fn scan_plugin_dir_outputs_matches() {
    let temp = TempDir::new().unwrap();
    let plugin = temp.path().join("my-plugin");
    fs::create_dir_all(&plugin).unwrap();
    fs::write(plugin.join("SKILL.md"), "Run /devs:review before `git push`.").unwrap();

    let mut cmd = Command::cargo_bin("plugcheck").unwrap();
    cmd.args(["scan", "--plugin-dir", &plugin.display().to_string()]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains(r#""scannedPlugin":"my-plugin""#))
        .stdout(predicate::str::contains("skillReference"));
}

#[test]
fn scan_type_filter_limits_output() {
    let temp = TempDir::new().unwrap();
    let plugin = temp.path().join("my-plugin");
    fs::create_dir_all(&plugin).unwrap();
    fs::write(plugin.join("SKILL.md"), "Run /devs:review before `git push`.").unwrap();

    let mut cmd = Command::cargo_bin("plugcheck").unwrap();
    cmd.args([
        "scan",
        "--plugin-dir",
        &plugin.display().to_string(),
        "--type",
        "system-command",
    ]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("systemCommand"))
        .stdout(predicate::str::contains("skillReference").not());
}

#[test]
fn completions_generate_for_bash() {
    let mut cmd = Command::cargo_bin("plugcheck").unwrap();
    cmd.args(["completions", "bash"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("plugcheck"));
}
