//! Loading the appointments file

use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};

use shared::Table;

use crate::derive;
use crate::error::DataLoadError;
use crate::frame::Frame;

/// What the file looked like when it was loaded
#[derive(Debug, Clone)]
pub struct FileInfo {
    pub path: PathBuf,
    pub modified: DateTime<Local>,
    pub size_bytes: u64,
}

/// Processed appointments plus the file they came from
#[derive(Debug, Clone)]
pub struct Dataset {
    pub frame: Frame,
    pub info: FileInfo,
}

impl Dataset {
    /// Columns in the processed frame, derived ones included
    pub fn column_count(&self) -> usize {
        self.frame.columns().len()
    }
}

/// Read, type and derive the appointments table
pub fn load_appointments(path: &Path) -> Result<Dataset, DataLoadError> {
    let metadata = std::fs::metadata(path).map_err(|_| DataLoadError::NotFound(path.to_path_buf()))?;

    let table = Table::from_path(path).map_err(|source| DataLoadError::Unreadable {
        path: path.to_path_buf(),
        source,
    })?;

    let mut frame = Frame::from_table(&table);
    derive::process(&mut frame);

    let info = FileInfo {
        path: path.to_path_buf(),
        modified: metadata
            .modified()
            .map(DateTime::<Local>::from)
            .unwrap_or_else(|_| Local::now()),
        size_bytes: metadata.len(),
    };

    tracing::info!(
        "loaded {} appointments with {} columns from {}",
        frame.len(),
        frame.columns().len(),
        path.display()
    );

    Ok(Dataset { frame, info })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_derives_columns() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Appointments.csv");
        std::fs::write(&path, "ID,Payment,Duration\n1,€40,60\n2,€60,90\n").unwrap();

        let dataset = load_appointments(&path).unwrap();

        assert_eq!(dataset.frame.len(), 2);
        assert_eq!(dataset.column_count(), 5);
        assert_eq!(dataset.info.size_bytes, 42);
    }

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = load_appointments(&dir.path().join("Appointments.csv")).unwrap_err();
        assert!(matches!(err, DataLoadError::NotFound(_)));
    }
}
