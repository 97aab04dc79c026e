//! File names used by both the collector and the dashboard

/// CSV file the collector writes and the dashboard reads
pub const APPOINTMENTS_FILENAME: &str = "Appointments.csv";

/// Suffix appended to the file stem while the previous export is held as a backup
pub const BACKUP_SUFFIX: &str = "_backup";

/// Name of the collector binary (used by the dashboard refresh action)
pub const COLLECTOR_BIN: &str = "booking-collector";
