//! Version range constraints.
//!
//! Supports the constraint grammar used in `extends-plugin.json`:
//!
//! - `*` — any version
//! - `1.2.3` or `=1.2.3` — exact match
//! - `>=1.2.3`, `<=1.2.3`, `>1.2.3`, `<1.2.3` — comparison operators
//! - `^1.2.3` — caret range (left-most non-zero component fixed)
//! - `~1.2.3` — tilde range (patch-level changes)

use super::Version;

/// A parsed version range constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Constraint {
    /// `*` — matches everything.
    Any,
    /// Exact match (bare version or `=` prefix).
    Exact(Version),
    GreaterEq(Version),
    LessEq(Version),
    Greater(Version),
    Less(Version),
    /// `^` — compatible with the left-most non-zero component.
    Caret(Version),
    /// `~` — allows patch-level changes.
    Tilde(Version),
}

impl Constraint {
    /// Parse a constraint string.
    ///
    /// Returns `None` when the version part cannot be parsed. Callers treat an
    /// unparseable constraint as satisfied: an installed dependency with an
    /// unintelligible range declaration is not worth flagging.
    pub fn parse(input: &str) -> Option<Constraint> {
        let input = input.trim();

        if input == "*" {
            return Some(Constraint::Any);
        }

        // Longest operators first so ">=" is not read as ">".
        for (op, build) in [
            (">=", Constraint::GreaterEq as fn(Version) -> Constraint),
            ("<=", Constraint::LessEq),
            (">", Constraint::Greater),
            ("<", Constraint::Less),
            ("^", Constraint::Caret),
            ("~", Constraint::Tilde),
            ("=", Constraint::Exact),
        ] {
            if let Some(rest) = input.strip_prefix(op) {
                return Version::parse(rest.trim()).map(build);
            }
        }

        // No operator means exact match.
        Version::parse(input).map(Constraint::Exact)
    }

    /// Whether an installed version satisfies this constraint.
    pub fn satisfied_by(&self, installed: &Version) -> bool {
        match self {
            Constraint::Any => true,
            Constraint::Exact(required) => installed == required,
            Constraint::GreaterEq(required) => installed >= required,
            Constraint::LessEq(required) => installed <= required,
            Constraint::Greater(required) => installed > required,
            Constraint::Less(required) => installed < required,
            Constraint::Caret(required) => caret_satisfied(installed, required),
            Constraint::Tilde(required) => {
                installed >= required
                    && installed.major == required.major
                    && installed.minor == required.minor
            }
        }
    }
}

/// Caret range: allows changes that do not modify the left-most non-zero
/// component.
///
/// - `^1.2.3` := `>=1.2.3 <2.0.0`
/// - `^0.2.3` := `>=0.2.3 <0.3.0`
/// - `^0.0.3` := `>=0.0.3 <0.0.4`
fn caret_satisfied(installed: &Version, required: &Version) -> bool {
    if installed < required {
        return false;
    }
    if required.major != 0 {
        installed.major == required.major
    } else if required.minor != 0 {
        installed.major == 0 && installed.minor == required.minor
    } else {
        installed.major == 0 && installed.minor == 0 && installed.patch == required.patch
    }
}
