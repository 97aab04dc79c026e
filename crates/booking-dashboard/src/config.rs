//! Dashboard login credentials
//!
//! Precedence: `dashboard.toml` (`[auth]` table) when it exists, otherwise the
//! `DASHBOARD_USERNAME` and `DASHBOARD_PASSWORD` environment variables.

use serde::Deserialize;
use std::path::Path;

use crate::constants;
use crate::error::ConfigError;

/// Configuration loaded from dashboard.toml
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub auth: AuthSection,
}

#[derive(Debug, Default, Deserialize)]
pub struct AuthSection {
    pub username: Option<String>,
    pub password: Option<String>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let read_error = |message: String| ConfigError::Read {
            path: path.display().to_string(),
            message,
        };
        let content = std::fs::read_to_string(path).map_err(|e| read_error(e.to_string()))?;
        toml::from_str(&content).map_err(|e| read_error(e.to_string()))
    }
}

/// The single dashboard account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardCredentials {
    pub username: String,
    pub password: String,
}

impl DashboardCredentials {
    /// Use the file when present, otherwise `env`; either must be complete
    pub fn resolve(file: Option<FileConfig>, env: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let (username, password, names) = match file {
            Some(file) => (file.auth.username, file.auth.password, ["username", "password"]),
            None => (
                env(constants::ENV_USERNAME),
                env(constants::ENV_PASSWORD),
                [constants::ENV_USERNAME, constants::ENV_PASSWORD],
            ),
        };

        let blank = |v: &Option<String>| v.as_deref().is_none_or(|v| v.trim().is_empty());
        let missing: Vec<&str> = [(&username, names[0]), (&password, names[1])]
            .into_iter()
            .filter(|(value, _)| blank(*value))
            .map(|(_, name)| name)
            .collect();

        match (username, password) {
            (Some(username), Some(password)) if missing.is_empty() => Ok(Self { username, password }),
            _ => Err(ConfigError::Missing(missing.join(", "))),
        }
    }
}

/// Load credentials using the documented precedence
pub fn load(path: &Path) -> Result<DashboardCredentials, ConfigError> {
    let file = if path.exists() {
        Some(FileConfig::load(path)?)
    } else {
        None
    };
    DashboardCredentials::resolve(file, |name| std::env::var(name).ok())
}
