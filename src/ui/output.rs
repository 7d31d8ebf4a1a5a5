//! Output verbosity mode.

/// Output verbosity mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Show all output including per-plugin progress.
    Verbose,
    /// Show status messages.
    #[default]
    Normal,
    /// Show nothing except errors and the report itself.
    Quiet,
}

impl OutputMode {
    /// Check if this mode shows status messages.
    pub fn shows_status(&self) -> bool {
        !matches!(self, Self::Quiet)
    }

    /// Check if this mode shows debug-level detail.
    pub fn shows_detail(&self) -> bool {
        matches!(self, Self::Verbose)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quiet_hides_status() {
        assert!(!OutputMode::Quiet.shows_status());
        assert!(OutputMode::Normal.shows_status());
        assert!(OutputMode::Verbose.shows_status());
    }

    #[test]
    fn only_verbose_shows_detail() {
        assert!(OutputMode::Verbose.shows_detail());
        assert!(!OutputMode::Normal.shows_detail());
        assert!(!OutputMode::Quiet.shows_detail());
    }

    #[test]
    fn default_is_normal() {
        assert_eq!(OutputMode::default(), OutputMode::Normal);
    }
}
