use serde::Serialize;
use std::path::PathBuf;

use crate::cli::SortOrder;
use crate::core::SessionRecord;

#[derive(Serialize)]
struct BackupEntry {
    name: String,
    path: String,
    size: u64,
}

fn to_pretty<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| {
        eprintln!("Failed to serialize JSON output: {}", e);
        "[]".to_string()
    })
}

pub(crate) fn output_session_json(records: &[SessionRecord], order: SortOrder) -> String {
    let mut rows: Vec<_> = records.iter().collect();
    if order == SortOrder::Desc {
        rows.reverse();
    }
    to_pretty(&rows)
}

pub(crate) fn output_backup_json(backups: &[PathBuf]) -> String {
    let entries: Vec<BackupEntry> = backups
        .iter()
        .map(|path| BackupEntry {
            name: path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            path: path.display().to_string(),
            size: std::fs::metadata(path).map(|m| m.len()).unwrap_or(0),
        })
        .collect();
    to_pretty(&entries)
}
