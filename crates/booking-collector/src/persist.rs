//! Replacing the appointments file without ever exposing a partial write
//!
//! Sequence: write the new export to a temporary sibling, sync it, read it
//! back and check it parses with at least one record, move the current file
//! aside as a backup, rename the temporary file into place, then drop the
//! backup. A failure at any step removes the temporary file and puts the
//! backup back, so readers only ever see the old file or the new one.

use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use shared::Table;
use shared::constants::BACKUP_SUFFIX;

use crate::constants;
use crate::error::CollectError;

/// What ended up on disk after a successful save
#[derive(Debug, Clone)]
pub struct SavedFile {
    pub path: PathBuf,
    pub size_bytes: u64,
    pub modified: DateTime<Local>,
    pub records: usize,
    pub columns: usize,
    /// First few rows, for the console report
    pub preview: Table,
}

/// Guard that removes a temporary file on drop unless disarmed
struct TempFileGuard {
    path: PathBuf,
    armed: bool,
}

impl TempFileGuard {
    fn new(path: PathBuf) -> Self {
        Self { path, armed: true }
    }

    /// Call after the file has been renamed into place
    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for TempFileGuard {
    fn drop(&mut self) {
        if self.armed {
            // Best effort; we're already on an error path
            let _ = std::fs::remove_file(&self.path);
        }
    }
}

/// `Appointments.csv` -> `Appointments_backup.csv`
pub fn backup_path(destination: &Path) -> PathBuf {
    let stem = destination
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match destination.extension() {
        Some(ext) => format!("{}{}.{}", stem, BACKUP_SUFFIX, ext.to_string_lossy()),
        None => format!("{}{}", stem, BACKUP_SUFFIX),
    };
    destination.with_file_name(name)
}

/// Sibling path the new content is staged in: `Appointments.csv.tmp`.
/// Appending keeps it distinct from the destination whatever its extension.
pub fn temp_path(destination: &Path) -> PathBuf {
    let mut name = destination.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    destination.with_file_name(name)
}

/// Replace `destination` with `contents` (see module docs for the sequence)
pub async fn replace_file(destination: &Path, contents: &[u8]) -> Result<SavedFile, CollectError> {
    let fail = |message: String| CollectError::Persist {
        path: destination.display().to_string(),
        message,
    };

    if let Some(parent) = destination.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .await
            .map_err(|e| fail(format!("creating {}: {}", parent.display(), e)))?;
    }

    let tmp_path = temp_path(destination);
    let mut guard = TempFileGuard::new(tmp_path.clone());

    {
        let mut file = fs::File::create(&tmp_path)
            .await
            .map_err(|e| fail(format!("creating {}: {}", tmp_path.display(), e)))?;
        file.write_all(contents)
            .await
            .map_err(|e| fail(format!("writing {}: {}", tmp_path.display(), e)))?;
        file.sync_all()
            .await
            .map_err(|e| fail(format!("syncing {}: {}", tmp_path.display(), e)))?;
    }

    let table = validate(&tmp_path).await.map_err(fail)?;

    // The swap runs without await points so a cancelled run cannot stop
    // between moving the old file aside and moving the new one in.
    let backup = backup_path(destination);
    let had_previous = destination.exists();
    if had_previous {
        std::fs::rename(destination, &backup)
            .map_err(|e| fail(format!("moving previous file to {}: {}", backup.display(), e)))?;
        debug!("previous export moved to {}", backup.display());
    }

    if let Err(e) = std::fs::rename(&tmp_path, destination) {
        if had_previous {
            restore_backup(&backup, destination);
        }
        return Err(fail(format!("moving new file into place: {}", e)));
    }
    guard.disarm();

    if had_previous {
        if let Err(e) = std::fs::remove_file(&backup) {
            warn!("could not remove backup {}: {}", backup.display(), e);
        }
    }

    let metadata = fs::metadata(destination)
        .await
        .map_err(|e| fail(format!("reading metadata: {}", e)))?;
    let modified = metadata
        .modified()
        .map(DateTime::<Local>::from)
        .unwrap_or_else(|_| Local::now());

    Ok(SavedFile {
        path: destination.to_path_buf(),
        size_bytes: metadata.len(),
        modified,
        records: table.len(),
        columns: table.headers.len(),
        preview: table.head(constants::PREVIEW_ROWS),
    })
}

/// Read the staged file back and require a header plus at least one record
async fn validate(path: &Path) -> Result<Table, String> {
    let bytes = fs::read(path)
        .await
        .map_err(|e| format!("re-reading {}: {}", path.display(), e))?;
    let table = Table::from_csv_bytes(&bytes).map_err(|e| format!("new file is not valid CSV: {}", e))?;

    if table.headers.is_empty() || table.is_empty() {
        return Err("new file is empty".to_string());
    }
    Ok(table)
}

fn restore_backup(backup: &Path, destination: &Path) {
    match std::fs::rename(backup, destination) {
        Ok(()) => warn!("restored previous data from {}", backup.display()),
        Err(e) => warn!(
            "failed to restore backup {} to {}: {}",
            backup.display(),
            destination.display(),
            e
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const PREVIOUS: &[u8] = b"ID,Status\n1,Approved\n";

    #[test]
    fn test_backup_and_temp_paths() {
        let dest = Path::new("/data/Appointments.csv");
        assert_eq!(backup_path(dest), PathBuf::from("/data/Appointments_backup.csv"));
        assert_eq!(temp_path(dest), PathBuf::from("/data/Appointments.csv.tmp"));
        assert_ne!(temp_path(Path::new("out.tmp")), PathBuf::from("out.tmp"));
    }

    #[tokio::test]
    async fn test_replace_creates_new_file() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("Appointments.csv");

        let saved = replace_file(&dest, b"ID,Status\n1,Approved\n2,Done\n").await.unwrap();

        assert_eq!(saved.records, 2);
        assert_eq!(saved.columns, 2);
        assert_eq!(saved.size_bytes, 28);
        assert!(!temp_path(&dest).exists());
        assert!(!backup_path(&dest).exists());
    }

    #[tokio::test]
    async fn test_replace_overwrites_and_drops_backup() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("Appointments.csv");
        std::fs::write(&dest, PREVIOUS).unwrap();

        replace_file(&dest, b"ID,Status\n5,Pending\n").await.unwrap();

        assert_eq!(std::fs::read(&dest).unwrap(), b"ID,Status\n5,Pending\n");
        assert!(!backup_path(&dest).exists());
    }

    #[tokio::test]
    async fn test_replace_destination_with_tmp_extension() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("Appointments.tmp");
        std::fs::write(&dest, PREVIOUS).unwrap();

        let saved = replace_file(&dest, b"ID,Status\n7,Done\n8,Done\n").await.unwrap();

        assert_eq!(saved.records, 2);
        assert_eq!(std::fs::read(&dest).unwrap(), b"ID,Status\n7,Done\n8,Done\n");
        assert!(!temp_path(&dest).exists());
        assert!(!backup_path(&dest).exists());
    }

    #[tokio::test]
    async fn test_empty_export_keeps_previous_file() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("Appointments.csv");
        std::fs::write(&dest, PREVIOUS).unwrap();

        let err = replace_file(&dest, b"ID,Status\n").await.unwrap_err();

        assert!(matches!(err, CollectError::Persist { .. }));
        assert!(err.to_string().contains("empty"));
        assert_eq!(std::fs::read(&dest).unwrap(), PREVIOUS);
        assert!(!temp_path(&dest).exists());
        assert!(!backup_path(&dest).exists());
    }

    #[tokio::test]
    async fn test_unparseable_export_keeps_previous_file() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("Appointments.csv");
        std::fs::write(&dest, PREVIOUS).unwrap();

        let err = replace_file(&dest, &[0xff, 0xfe, b'\n', 0x80, b'\n']).await.unwrap_err();

        assert!(matches!(err, CollectError::Persist { .. }));
        assert_eq!(std::fs::read(&dest).unwrap(), PREVIOUS);
        assert!(!temp_path(&dest).exists());
    }
}
