//! Error types for a collection run.

use thiserror::Error;

use crate::constants;

/// Everything that can stop or degrade a collection run.
///
/// Transport errors are converted into these variants at the operation that
/// issued the request, so callers never see a raw `reqwest::Error`.
#[derive(Error, Debug)]
pub enum CollectError {
    /// Credentials or base URL missing or unreadable (fatal, before any request)
    #[error("configuration error: {0}")]
    Config(String),

    /// Login request failed at the transport or HTTP level
    #[error("login request failed: {0}")]
    Auth(String),

    /// Login page answered but reported bad credentials
    #[error("login rejected: check the username and password")]
    CredentialRejected,

    /// No anti-forgery token could be found (the run continues without one)
    #[error("no anti-forgery token: {0}")]
    TokenMissing(String),

    /// An export request failed
    #[error("export request (date filter {date}) failed: {message}")]
    Export { date: &'static str, message: String },

    /// The two export batches could not be merged (the first batch is used)
    #[error("could not merge export batches: {0}")]
    Merge(String),

    /// The export could not be written or validated; the previous file is kept
    #[error("could not save {path}: {message}")]
    Persist { path: String, message: String },

    /// The whole run exceeded its time budget
    #[error("collection timed out after {0} seconds")]
    Timeout(u64),

    /// Stopped by Ctrl-C
    #[error("interrupted by user")]
    Interrupted,
}

impl CollectError {
    /// What the operator should do about this failure
    pub fn remediation(&self) -> String {
        match self {
            CollectError::Config(_) => format!(
                "Create {} with your credentials or set {}, {} and {}.\n\n\
                 Example {}:\n\
                 [panel]\n\
                 base_url = \"https://your-site.com\"\n\
                 username = \"your-username\"\n\
                 password = \"your-password\"",
                constants::CONFIG_FILE,
                constants::ENV_BASE_URL,
                constants::ENV_USERNAME,
                constants::ENV_PASSWORD,
                constants::CONFIG_FILE,
            ),
            CollectError::Auth(_) => {
                "Check that base_url points at the WordPress site and that it is reachable, then rerun booking-collector."
                    .to_string()
            }
            CollectError::CredentialRejected => {
                format!("Fix username/password in {} (or the WP_* variables) and rerun.", constants::CONFIG_FILE)
            }
            CollectError::TokenMissing(_) => "No action needed unless the export is refused.".to_string(),
            CollectError::Export { .. } => {
                "Check that the booking plugin export is enabled for this account, then rerun booking-collector."
                    .to_string()
            }
            CollectError::Merge(_) => "The first export batch was saved unmerged; rerun to retry the merge.".to_string(),
            CollectError::Persist { .. } => {
                "The previous file was left in place. Check disk space and permissions, then rerun booking-collector."
                    .to_string()
            }
            CollectError::Timeout(_) => {
                "The previous file was left in place. Raise [timeouts] run_secs or retry when the site is less busy."
                    .to_string()
            }
            CollectError::Interrupted => "The previous file was left in place; rerun booking-collector.".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_remediation_names_every_variable() {
        let hint = CollectError::Config("missing username".into()).remediation();
        assert!(hint.contains("collector.toml"));
        assert!(hint.contains("WP_BASE_URL"));
        assert!(hint.contains("WP_USERNAME"));
        assert!(hint.contains("WP_PASSWORD"));
    }

    #[test]
    fn test_export_error_message_names_date_filter() {
        let err = CollectError::Export {
            date: "null",
            message: "HTTP status 500".into(),
        };
        assert_eq!(
            err.to_string(),
            "export request (date filter null) failed: HTTP status 500"
        );
    }
}
