//! Configuration for the appointments collector
//!
//! Precedence: `collector.toml` when it exists, otherwise the `WP_BASE_URL`,
//! `WP_USERNAME` and `WP_PASSWORD` environment variables. Whichever source is
//! used must be complete; nothing is merged across sources.

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::constants;
use crate::error::CollectError;

// =============================================================================
// File-based Configuration (collector.toml)
// =============================================================================

/// Configuration loaded from collector.toml
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub panel: PanelSection,
    #[serde(default)]
    pub timeouts: Timeouts,
}

/// Admin panel access. Fields are optional here so that missing ones can be
/// reported by name instead of as a parse error.
#[derive(Debug, Default, Deserialize)]
pub struct PanelSection {
    pub base_url: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Request time budgets in seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Timeouts {
    pub page_secs: u64,
    pub export_secs: u64,
    pub run_secs: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            page_secs: constants::DEFAULT_PAGE_TIMEOUT_SECS,
            export_secs: constants::DEFAULT_EXPORT_TIMEOUT_SECS,
            run_secs: constants::DEFAULT_RUN_TIMEOUT_SECS,
        }
    }
}

impl Timeouts {
    pub fn page(&self) -> Duration {
        Duration::from_secs(self.page_secs)
    }

    pub fn export(&self) -> Duration {
        Duration::from_secs(self.export_secs)
    }

    pub fn run(&self) -> Duration {
        Duration::from_secs(self.run_secs)
    }
}

impl FileConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, CollectError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| CollectError::Config(format!("failed to read {}: {}", path.display(), e)))?;

        toml::from_str(&content).map_err(|e| {
            CollectError::Config(format!(
                "failed to parse {}: {}\nCheck for invalid TOML syntax (missing quotes, brackets) \
                 and that credentials live under a [panel] table.",
                path.display(),
                e
            ))
        })
    }
}

// =============================================================================
// Runtime Configuration
// =============================================================================

/// Login credentials for the admin panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Validated collector configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Site root without a trailing slash
    pub base_url: String,
    pub credentials: Credentials,
    pub timeouts: Timeouts,
}

/// Where the configuration came from (for the startup log line)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSource {
    File,
    Environment,
}

impl Config {
    /// Resolve the configuration: the file when present, otherwise `env`.
    ///
    /// `env` is a lookup function so tests don't have to mutate the process
    /// environment.
    pub fn resolve(
        file: Option<FileConfig>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<(Self, ConfigSource), CollectError> {
        match file {
            Some(file) => {
                let panel = file.panel;
                let fields = [
                    ("base_url", panel.base_url),
                    ("username", panel.username),
                    ("password", panel.password),
                ];
                let [base_url, username, password] = require_all(fields, |names| {
                    format!("missing required fields in {}: {}", constants::CONFIG_FILE, names)
                })?;
                Ok((Self::build(base_url, username, password, file.timeouts), ConfigSource::File))
            }
            None => {
                let fields = [
                    (constants::ENV_BASE_URL, env(constants::ENV_BASE_URL)),
                    (constants::ENV_USERNAME, env(constants::ENV_USERNAME)),
                    (constants::ENV_PASSWORD, env(constants::ENV_PASSWORD)),
                ];
                let [base_url, username, password] = require_all(fields, |names| {
                    format!(
                        "{} not found and missing environment variables: {}",
                        constants::CONFIG_FILE,
                        names
                    )
                })?;
                Ok((
                    Self::build(base_url, username, password, Timeouts::default()),
                    ConfigSource::Environment,
                ))
            }
        }
    }

    fn build(base_url: String, username: String, password: String, timeouts: Timeouts) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials: Credentials { username, password },
            timeouts,
        }
    }

    /// Absolute URL for an endpoint path
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Return every value, or a config error listing each blank/missing name
fn require_all<const N: usize>(
    fields: [(&str, Option<String>); N],
    message: impl Fn(&str) -> String,
) -> Result<[String; N], CollectError> {
    let missing: Vec<&str> = fields
        .iter()
        .filter(|(_, value)| value.as_deref().is_none_or(|v| v.trim().is_empty()))
        .map(|(name, _)| *name)
        .collect();

    if !missing.is_empty() {
        return Err(CollectError::Config(message(&missing.join(", "))));
    }

    Ok(fields.map(|(_, value)| value.unwrap_or_default()))
}

/// Load configuration using the documented precedence
pub fn load(path: &Path) -> Result<(Config, ConfigSource), CollectError> {
    let file = if path.exists() {
        Some(FileConfig::load(path)?)
    } else {
        None
    };

    Config::resolve(file, |name| std::env::var(name).ok())
}
