//! Semantic version parsing and comparison.
//!
//! Versions reported by plugins and CLI tools are messier than strict semver:
//! `gh` prints `2.39`, some tools prefix a `v`, and git-pinned plugins report
//! a commit SHA instead of a version. [`Version::parse`] accepts one-, two-,
//! and three-component versions and returns `None` for anything it cannot
//! interpret — an unknown version, which the resolver treats as unverifiable.
//!
//! Build metadata (`+build`) is parsed but ignored in comparisons.
//! Prerelease versions order below their release counterparts.

pub mod constraint;

pub use constraint::Constraint;

use regex::Regex;
use std::cmp::Ordering;
use std::fmt;
use std::sync::OnceLock;

/// A parsed semantic version.
#[derive(Debug, Clone, Default)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    pub prerelease: String,
    pub build: String,
}

fn version_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(\d+)(?:\.(\d+))?(?:\.(\d+))?(?:-([0-9A-Za-z.-]+))?(?:\+([0-9A-Za-z.-]+))?$")
            .unwrap()
    })
}

fn git_sha_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[0-9a-f]{12}$").unwrap())
}

impl Version {
    /// Parse a version string.
    ///
    /// Accepts an optional leading `v`, missing minor/patch components
    /// (defaulting to 0), a `-prerelease` suffix, and a `+build` suffix.
    /// Returns `None` for empty strings, 12-hex git commit SHAs, and anything
    /// else that does not look like a version.
    pub fn parse(input: &str) -> Option<Version> {
        let cleaned = input.trim().trim_start_matches('v');
        if cleaned.is_empty() {
            return None;
        }

        // Git-pinned plugins report a short commit SHA; that is not a version.
        if git_sha_re().is_match(cleaned) {
            return None;
        }

        let caps = version_re().captures(cleaned)?;

        let component = |i: usize| -> u64 {
            caps.get(i)
                .map(|m| m.as_str().parse().unwrap_or(0))
                .unwrap_or(0)
        };

        Some(Version {
            major: component(1),
            minor: component(2),
            patch: component(3),
            prerelease: caps.get(4).map(|m| m.as_str().to_string()).unwrap_or_default(),
            build: caps.get(5).map(|m| m.as_str().to_string()).unwrap_or_default(),
        })
    }

    /// Construct a release version from numeric components.
    pub fn new(major: u64, minor: u64, patch: u64) -> Version {
        Version {
            major,
            minor,
            patch,
            ..Default::default()
        }
    }

    fn core(&self) -> (u64, u64, u64) {
        (self.major, self.minor, self.patch)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if !self.prerelease.is_empty() {
            write!(f, "-{}", self.prerelease)?;
        }
        if !self.build.is_empty() {
            write!(f, "+{}", self.build)?;
        }
        Ok(())
    }
}

// Build metadata does not participate in equality or ordering.
impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.core() == other.core() && self.prerelease == other.prerelease
    }
}

impl Eq for Version {}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        match self.core().cmp(&other.core()) {
            Ordering::Equal => {}
            ord => return ord,
        }
        // A prerelease orders below the corresponding release.
        match (self.prerelease.is_empty(), other.prerelease.is_empty()) {
            (false, true) => Ordering::Less,
            (true, false) => Ordering::Greater,
            _ => self.prerelease.cmp(&other.prerelease),
        }
    }
}
