//! System tool probing.
//!
//! System dependencies (`gh`, `git`, `jq`, ...) are checked by locating the
//! tool on `PATH` and asking it for its version. Probing is an I/O boundary:
//! it is abstracted behind the [`ToolProbe`] trait so tests can substitute
//! [`FakeToolProbe`] without spawning real subprocesses.
//!
//! A probe never fails hard. A tool that cannot be located is absent; a tool
//! that is present but whose version output cannot be parsed has an unknown
//! version. Both outcomes are data for the resolver, not errors.

use crate::version::Version;
use regex::Regex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::OnceLock;

/// Version flags tried in order until one produces parseable output.
const VERSION_FLAGS: &[&str] = &["--version", "-version", "-v", "version"];

/// A tool discovered on the system.
#[derive(Debug, Clone, Default)]
pub struct ProbedTool {
    /// Parsed version, when the tool reported one we could interpret.
    pub version: Option<Version>,
}

/// Abstraction over system tool discovery.
pub trait ToolProbe {
    /// Check whether a tool is available.
    ///
    /// Returns `None` when the tool cannot be located at all, and
    /// `Some(ProbedTool { version: None })` when it exists but its version is
    /// unknown.
    fn check(&self, name: &str) -> Option<ProbedTool>;
}

/// Probes real tools via `PATH` lookup and version-flag invocation.
#[derive(Debug, Default)]
pub struct SystemToolProbe;

impl SystemToolProbe {
    pub fn new() -> Self {
        Self
    }
}

impl ToolProbe for SystemToolProbe {
    fn check(&self, name: &str) -> Option<ProbedTool> {
        let binary = resolve_tool_path(name, &parse_system_path())?;

        for flag in VERSION_FLAGS {
            let output = match Command::new(&binary).arg(flag).output() {
                Ok(output) => output,
                Err(_) => continue,
            };

            // Some tools print their version to stderr (java, for one).
            let text = if output.stdout.is_empty() {
                String::from_utf8_lossy(&output.stderr).to_string()
            } else {
                String::from_utf8_lossy(&output.stdout).to_string()
            };

            if let Some(version) = extract_version(&text) {
                return Some(ProbedTool {
                    version: Version::parse(&version),
                });
            }

            // Flag was accepted but output had no version in it.
            if output.status.success() {
                return Some(ProbedTool { version: None });
            }
        }

        // Binary exists but no flag yielded a version.
        Some(ProbedTool { version: None })
    }
}

/// Resolve a tool's binary path by iterating over PATH entries.
///
/// Returns the first match that exists and is executable. Does NOT shell out
/// to `which` — its behavior varies across systems and it is sometimes a
/// shell builtin with inconsistent error handling.
pub fn resolve_tool_path(tool: &str, path_entries: &[PathBuf]) -> Option<PathBuf> {
    for dir in path_entries {
        let candidate = dir.join(tool);
        if candidate.is_file() && is_executable(&candidate) {
            return Some(candidate);
        }
    }
    None
}

/// Parse the system PATH environment variable into a list of directories.
pub fn parse_system_path() -> Vec<PathBuf> {
    std::env::var_os("PATH")
        .map(|path| std::env::split_paths(&path).collect())
        .unwrap_or_default()
}

/// Check whether a file has executable permission bits set.
#[cfg(unix)]
pub fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

/// On Windows, executability is determined by file extension, not permission bits.
#[cfg(not(unix))]
pub fn is_executable(_path: &Path) -> bool {
    true
}

/// Extract a version number from tool output.
///
/// Matches common shapes: `X.Y.Z`, `vX.Y.Z`, `version X.Y`, with an optional
/// prerelease suffix.
pub fn extract_version(output: &str) -> Option<String> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        Regex::new(r"(?i)(?:version\s*)?v?(\d+\.\d+(?:\.\d+)?(?:-[0-9A-Za-z.-]+)?)").unwrap()
    });

    re.captures(output)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Tool availability, probed once per run.
///
/// The set of distinct tool names is computed before probing begins, so each
/// name is checked at most once no matter how many manifests reference it.
#[derive(Debug, Default)]
pub struct ToolInventory {
    tools: HashMap<String, Option<ProbedTool>>,
}

impl ToolInventory {
    /// Probe every distinct name in `names` exactly once.
    pub fn probe_all<I, S>(probe: &dyn ToolProbe, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut tools = HashMap::new();
        for name in names {
            let name = name.as_ref();
            if !tools.contains_key(name) {
                tracing::debug!("Probing system tool '{}'", name);
                tools.insert(name.to_string(), probe.check(name));
            }
        }
        Self { tools }
    }

    /// Look up a probed tool. `None` means the tool was not found (or never
    /// probed, which only happens for names no manifest declared).
    pub fn lookup(&self, name: &str) -> Option<&ProbedTool> {
        self.tools.get(name).and_then(|t| t.as_ref())
    }

    /// Number of distinct tools probed.
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

/// A scripted probe for tests.
///
/// Configure tool results up front; anything unconfigured is absent. Like the
/// real probe, it never errors.
#[derive(Debug, Default)]
pub struct FakeToolProbe {
    tools: HashMap<String, ProbedTool>,
}

impl FakeToolProbe {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool with a parseable version.
    pub fn with_tool(mut self, name: &str, version: &str) -> Self {
        self.tools.insert(
            name.to_string(),
            ProbedTool {
                version: Version::parse(version),
            },
        );
        self
    }

    /// Register a tool that exists but reports no usable version.
    pub fn with_versionless_tool(mut self, name: &str) -> Self {
        self.tools
            .insert(name.to_string(), ProbedTool { version: None });
        self
    }
}

impl ToolProbe for FakeToolProbe {
    fn check(&self, name: &str) -> Option<ProbedTool> {
        self.tools.get(name).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::fs;
    use tempfile::TempDir;

    fn create_fake_binary(path: &Path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, "#!/bin/sh\n").unwrap();
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
        }
    }

    #[test]
    fn resolve_tool_path_finds_first_match() {
        let temp = TempDir::new().unwrap();
        let dir_a = temp.path().join("a");
        let dir_b = temp.path().join("b");
        create_fake_binary(&dir_a.join("gh"));
        create_fake_binary(&dir_b.join("gh"));

        let result = resolve_tool_path("gh", &[dir_a.clone(), dir_b]);
        assert_eq!(result, Some(dir_a.join("gh")));
    }

    #[test]
    fn resolve_tool_path_returns_none_when_absent() {
        let temp = TempDir::new().unwrap();
        assert!(resolve_tool_path("gh", &[temp.path().to_path_buf()]).is_none());
    }

    #[cfg(unix)]
    #[test]
    fn resolve_tool_path_skips_non_executable() {
        use std::os::unix::fs::PermissionsExt;
        let temp = TempDir::new().unwrap();
        let dir = temp.path().to_path_buf();
        let file = dir.join("gh");
        fs::write(&file, "data").unwrap();
        fs::set_permissions(&file, fs::Permissions::from_mode(0o644)).unwrap();

        assert!(resolve_tool_path("gh", &[dir]).is_none());
    }

    #[test]
    fn extract_version_common_shapes() {
        assert_eq!(
            extract_version("gh version 2.40.1 (2023-12-13)").as_deref(),
            Some("2.40.1")
        );
        assert_eq!(extract_version("git version 2.39").as_deref(), Some("2.39"));
        assert_eq!(extract_version("v1.2.3").as_deref(), Some("1.2.3"));
        assert_eq!(
            extract_version("tool 3.0.0-beta.1 linux/amd64").as_deref(),
            Some("3.0.0-beta.1")
        );
    }

    #[test]
    fn extract_version_none_without_digits() {
        assert!(extract_version("no numbers here").is_none());
        assert!(extract_version("").is_none());
    }

    /// Probe that counts how many times each name is checked.
    struct CountingProbe {
        calls: RefCell<Vec<String>>,
    }

    impl ToolProbe for CountingProbe {
        fn check(&self, name: &str) -> Option<ProbedTool> {
            self.calls.borrow_mut().push(name.to_string());
            Some(ProbedTool { version: None })
        }
    }

    #[test]
    fn tool_inventory_probes_each_name_once() {
        let probe = CountingProbe {
            calls: RefCell::new(Vec::new()),
        };
        let inventory =
            ToolInventory::probe_all(&probe, ["gh", "git", "gh", "jq", "git", "gh"]);

        assert_eq!(inventory.len(), 3);
        assert_eq!(probe.calls.borrow().len(), 3);
    }

    #[test]
    fn tool_inventory_lookup() {
        let probe = FakeToolProbe::new()
            .with_tool("gh", "2.40.1")
            .with_versionless_tool("make");
        let inventory = ToolInventory::probe_all(&probe, ["gh", "make", "jq"]);

        let gh = inventory.lookup("gh").unwrap();
        assert_eq!(gh.version.as_ref().unwrap().to_string(), "2.40.1");

        let make = inventory.lookup("make").unwrap();
        assert!(make.version.is_none());

        assert!(inventory.lookup("jq").is_none());
    }

    #[test]
    fn fake_probe_unconfigured_tool_is_absent() {
        let probe = FakeToolProbe::new();
        assert!(probe.check("anything").is_none());
    }

    #[test]
    fn system_probe_finds_nothing_for_garbage_name() {
        let probe = SystemToolProbe::new();
        assert!(probe.check("plugcheck-no-such-tool-a8f3").is_none());
    }
}
