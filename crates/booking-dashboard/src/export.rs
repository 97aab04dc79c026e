//! Download of the filtered view as CSV

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};

use crate::constants;
use crate::frame::Frame;

/// `appointments_YYYYMMDD_HHMMSS.csv`
pub fn export_file_name(now: DateTime<Local>) -> String {
    format!(
        "{}{}.csv",
        constants::EXPORT_FILE_PREFIX,
        now.format(constants::EXPORT_TIMESTAMP_FORMAT)
    )
}

/// Write `frame` (derived columns included) into `dir` and return the path
pub fn export_csv(frame: &Frame, dir: &Path, now: DateTime<Local>) -> Result<PathBuf> {
    std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;

    let path = dir.join(export_file_name(now));
    frame
        .to_table()
        .write_path(&path)
        .with_context(|| format!("writing {}", path.display()))?;

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use shared::Table;
    use tempfile::TempDir;

    use crate::derive;

    fn moment() -> DateTime<Local> {
        Local.with_ymd_and_hms(2025, 6, 14, 9, 5, 30).unwrap()
    }

    #[test]
    fn test_file_name_timestamp() {
        assert_eq!(export_file_name(moment()), "appointments_20250614_090530.csv");
    }

    #[test]
    fn test_export_includes_derived_columns() {
        let dir = TempDir::new().unwrap();
        let mut frame = Frame::from_table(&Table::from_csv_bytes(b"ID,Payment\n1,\xE2\x82\xAC45.50\n").unwrap());
        derive::process(&mut frame);

        let path = export_csv(&frame, &dir.path().join("exports"), moment()).unwrap();

        let written = Table::from_path(&path).unwrap();
        assert_eq!(written.headers, vec!["ID", "Payment", "Payment_numeric"]);
        assert_eq!(written.rows[0], vec!["1", "€45.50", "45.5"]);
    }
}
