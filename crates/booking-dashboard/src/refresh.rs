//! Refresh action: run the collector and check what it produced
//!
//! The collector owns the backup/validate/rename sequence, so a failed run
//! leaves the previous appointments file in place. This side only bounds the
//! run in time, reads the outcome line and re-reads the file.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

use shared::constants::COLLECTOR_BIN;
use shared::{CollectOutcome, Table};

use crate::error::RefreshError;

/// How to start the collector
#[derive(Debug, Clone)]
pub struct CollectorCommand {
    pub program: PathBuf,
    /// Arguments placed before `--json --output <file>`
    pub args: Vec<String>,
}

impl CollectorCommand {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// The collector binary next to this executable, else the one on `PATH`
    pub fn locate() -> Self {
        let sibling = std::env::current_exe()
            .ok()
            .map(|exe| exe.with_file_name(COLLECTOR_BIN))
            .filter(|path| path.exists());
        Self::new(sibling.unwrap_or_else(|| PathBuf::from(COLLECTOR_BIN)))
    }
}

/// A refresh that produced a readable, non-empty file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshReport {
    pub record_count: usize,
}

/// Run the collector writing to `output`, then verify the file
pub async fn refresh(
    collector: &CollectorCommand,
    output: &Path,
    timeout: Duration,
) -> Result<RefreshReport, RefreshError> {
    let program = collector.program.display().to_string();
    tracing::info!("running {} to fetch the latest data", program);

    let child = Command::new(&collector.program)
        .args(&collector.args)
        .arg("--json")
        .arg("--output")
        .arg(output)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| RefreshError::Spawn {
            program: program.clone(),
            message: e.to_string(),
        })?;

    let result = tokio::time::timeout(timeout, child.wait_with_output())
        .await
        .map_err(|_| RefreshError::Timeout(timeout.as_secs()))?
        .map_err(|e| RefreshError::Spawn {
            program,
            message: e.to_string(),
        })?;

    let stdout = String::from_utf8_lossy(&result.stdout);
    let outcome = CollectOutcome::from_output(&stdout);

    if !result.status.success() || !outcome.as_ref().is_some_and(|o| o.success) {
        let status = match result.status.code() {
            Some(code) => format!("exit code {}", code),
            None => "terminated by signal".to_string(),
        };
        let message = outcome
            .and_then(|o| o.error_message)
            .or_else(|| last_line(&String::from_utf8_lossy(&result.stderr)))
            .unwrap_or_else(|| "no outcome reported".to_string());
        return Err(RefreshError::Failed { status, message });
    }

    let table = Table::from_path(output).map_err(|e| RefreshError::InvalidFile(e.to_string()))?;
    if table.is_empty() {
        return Err(RefreshError::InvalidFile("new file is empty".to_string()));
    }

    tracing::info!("refresh complete: {} appointments", table.len());
    Ok(RefreshReport {
        record_count: table.len(),
    })
}

fn last_line(text: &str) -> Option<String> {
    text.lines()
        .map(str::trim)
        .rfind(|line| !line.is_empty())
        .map(str::to_string)
}
