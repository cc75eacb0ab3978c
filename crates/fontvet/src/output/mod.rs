//! Output formatting for projected reports.

pub mod json;
pub mod text;

/// Output formatting options.
#[derive(Debug, Clone)]
pub struct FormatOptions {
    /// Maximum log lines to show per check (None = unlimited).
    pub max_log_lines: Option<usize>,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            max_log_lines: Some(15),
        }
    }
}

impl FormatOptions {
    /// Create options with no limit.
    pub fn no_limit() -> Self {
        Self {
            max_log_lines: None,
        }
    }

    /// Create options with a specific per-check limit.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            max_log_lines: Some(limit),
        }
    }
}
