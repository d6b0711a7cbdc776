/// Standard date format used throughout the codebase: "2025-01-15"
pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";

/// Header row of the session log, written once when the file is new
pub(crate) const CSV_HEADER: [&str; 4] = ["Date", "Shift", "Topic", "Duration"];

/// File name of the session log inside the data directory
pub(crate) const LOG_FILE_NAME: &str = "sessions.csv";

/// Backup directory name inside the data directory
pub(crate) const BACKUP_DIR_NAME: &str = "backups";

/// Timestamp suffix for backup copies. Sorts lexicographically in time order.
pub(crate) const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S_%6f";

/// Refresh interval of the interactive timer display
pub(crate) const DEFAULT_TICK_MS: u64 = 500;
