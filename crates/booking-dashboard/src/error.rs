//! Error types for the dashboard

use std::path::PathBuf;
use thiserror::Error;

use shared::TableError;
use shared::constants::COLLECTOR_BIN;

use crate::constants;

/// Dashboard credentials missing or unreadable
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {path}: {message}")]
    Read { path: String, message: String },

    #[error("missing required credentials: {0}")]
    Missing(String),
}

impl ConfigError {
    pub fn guidance(&self) -> String {
        format!(
            "Create {} with:\n\
             [auth]\n\
             username = \"your_username\"\n\
             password = \"your_password\"\n\n\
             or set the environment variables:\n\
             export {}=your_username\n\
             export {}=your_password",
            constants::CONFIG_FILE,
            constants::ENV_USERNAME,
            constants::ENV_PASSWORD,
        )
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum LoginError {
    #[error("invalid username or password")]
    InvalidCredentials,
}

/// The appointments file could not be loaded
#[derive(Error, Debug)]
pub enum DataLoadError {
    #[error("{} not found", .0.display())]
    NotFound(PathBuf),

    #[error("error loading {}: {source}", .path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: TableError,
    },
}

impl DataLoadError {
    /// What to do next, shown under the error
    pub fn guidance(&self) -> String {
        match self {
            DataLoadError::NotFound(_) => format!(
                "Getting started:\n\
                 1. Run the collector to fetch your data:  {}\n\
                 2. Run the dashboard again (or pass --refresh to do both).",
                COLLECTOR_BIN
            ),
            DataLoadError::Unreadable { .. } => format!(
                "The file is not valid CSV. Run {} again to replace it.",
                COLLECTOR_BIN
            ),
        }
    }
}

/// The refresh action could not produce a new appointments file
#[derive(Error, Debug)]
pub enum RefreshError {
    #[error("could not start the collector ({program}): {message}")]
    Spawn { program: String, message: String },

    #[error("collector timed out after {0} seconds")]
    Timeout(u64),

    /// `status` reads like "exit code 1"
    #[error("collector failed ({status}): {message}")]
    Failed { status: String, message: String },

    #[error("new appointments file is invalid: {0}")]
    InvalidFile(String),
}
