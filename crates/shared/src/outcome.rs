//! Result of a collection run, as seen from outside the collector process

use serde::{Deserialize, Serialize};

/// Summary of one collector run.
///
/// The collector prints this as a single JSON line when invoked with `--json`;
/// the dashboard refresh action reads it back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectOutcome {
    pub success: bool,
    /// Records in the saved file (0 on failure)
    pub record_count: usize,
    #[serde(default)]
    pub error_message: Option<String>,
}

impl CollectOutcome {
    pub fn succeeded(record_count: usize) -> Self {
        Self {
            success: true,
            record_count,
            error_message: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            record_count: 0,
            error_message: Some(message.into()),
        }
    }

    /// Parse the last non-empty line of collector stdout as an outcome
    pub fn from_output(stdout: &str) -> Option<Self> {
        stdout
            .lines()
            .rev()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .and_then(|line| serde_json::from_str(line).ok())
    }
}
