//! Timestamped snapshot copies of the session log

use chrono::{DateTime, Local};
use glob::Pattern;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::consts::BACKUP_TIMESTAMP_FORMAT;
use crate::error::AppError;
use crate::utils::debug_enabled;

/// Highest `_NNN` suffix; a wider counter would sort before `_999`
const MAX_COLLISIONS: u32 = 999;

/// Directory of `<stem>_<timestamp>.csv` copies
#[derive(Debug, Clone)]
pub(crate) struct BackupDir {
    dir: PathBuf,
    stem: String,
}

impl BackupDir {
    pub(crate) fn new(dir: PathBuf, stem: impl Into<String>) -> Self {
        Self {
            dir,
            stem: stem.into(),
        }
    }

    pub(crate) fn path(&self) -> &Path {
        &self.dir
    }

    /// Copy `source` into a new backup named after `now`.
    ///
    /// A name already taken gets a `_NNN` counter so it still sorts after
    /// the existing file. Fails once all 999 counters are used.
    pub(crate) fn create(&self, source: &Path, now: DateTime<Local>) -> Result<PathBuf, AppError> {
        fs::create_dir_all(&self.dir).map_err(|e| AppError::io(&self.dir, e))?;

        let base = format!("{}_{}", self.stem, now.format(BACKUP_TIMESTAMP_FORMAT));
        let mut target = self.dir.join(format!("{base}.csv"));
        let mut counter = 1u32;
        while target.exists() {
            if counter > MAX_COLLISIONS {
                return Err(AppError::io(
                    &target,
                    io::Error::new(
                        io::ErrorKind::AlreadyExists,
                        "all backup names for this timestamp are taken",
                    ),
                ));
            }
            target = self.dir.join(format!("{base}_{counter:03}.csv"));
            counter += 1;
        }

        fs::copy(source, &target).map_err(|e| AppError::io(&target, e))?;
        if debug_enabled() {
            eprintln!("Backup written to {}", target.display());
        }
        Ok(target)
    }

    /// All backups, oldest first
    pub(crate) fn list(&self) -> Vec<PathBuf> {
        let pattern = format!(
            "{}/{}_*.csv",
            Pattern::escape(&self.dir.to_string_lossy()),
            Pattern::escape(&self.stem)
        );
        let mut files: Vec<PathBuf> = match glob::glob(&pattern) {
            Ok(paths) => paths.filter_map(Result::ok).filter(|p| p.is_file()).collect(),
            Err(err) => {
                if debug_enabled() {
                    eprintln!("Invalid backup pattern {pattern}: {err}");
                }
                Vec::new()
            }
        };
        files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        files
    }

    /// Lexicographically greatest backup name, which is also the newest
    pub(crate) fn latest(&self) -> Option<PathBuf> {
        self.list().pop()
    }
}
