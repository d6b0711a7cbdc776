//! Session log persistence
//!
//! The log is an append-only CSV file. Every successful append is followed
//! by a full backup copy, and the newest backup can be copied back over the
//! live log.

mod backup;

use chrono::{DateTime, Local};
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

use crate::consts::{BACKUP_DIR_NAME, CSV_HEADER, LOG_FILE_NAME};
use crate::core::{DateFilter, LoadResult, SessionRecord};
use crate::error::AppError;
use crate::utils::debug_enabled;

pub(crate) use backup::BackupDir;

#[derive(Debug, Clone)]
pub(crate) struct SessionLog {
    path: PathBuf,
    backups: BackupDir,
}

impl SessionLog {
    /// Log and backup directory inside `data_dir`
    pub(crate) fn in_dir(data_dir: &Path) -> Self {
        let path = data_dir.join(LOG_FILE_NAME);
        let stem = Path::new(LOG_FILE_NAME)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| LOG_FILE_NAME.to_string());
        Self {
            path,
            backups: BackupDir::new(data_dir.join(BACKUP_DIR_NAME), stem),
        }
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    pub(crate) fn backups(&self) -> &BackupDir {
        &self.backups
    }

    /// Append one record and snapshot the log. Returns the new backup path.
    ///
    /// Either both the row and its backup land, or the log is truncated back
    /// to its previous length and the error is returned.
    pub(crate) fn append(&self, record: &SessionRecord) -> Result<PathBuf, AppError> {
        self.append_at(record, Local::now())
    }

    fn append_at(&self, record: &SessionRecord, now: DateTime<Local>) -> Result<PathBuf, AppError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| AppError::io(parent, e))?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| AppError::io(&self.path, e))?;
        let len = file
            .metadata()
            .map_err(|e| AppError::io(&self.path, e))?
            .len();

        let result = self
            .write_row(file, record, len == 0)
            .and_then(|()| self.backups.create(&self.path, now));
        if result.is_err() {
            self.truncate_to(len)?;
        }
        result
    }

    fn write_row(&self, file: File, record: &SessionRecord, with_header: bool) -> Result<(), AppError> {
        let mut wtr = csv::WriterBuilder::new()
            .has_headers(false)
            .terminator(csv::Terminator::CRLF)
            .from_writer(file);

        if with_header {
            wtr.write_record(CSV_HEADER)
                .map_err(|e| AppError::csv(&self.path, e))?;
        }
        wtr.write_record(record.to_fields())
            .map_err(|e| AppError::csv(&self.path, e))?;
        wtr.flush().map_err(|e| AppError::io(&self.path, e))?;

        if debug_enabled() {
            eprintln!(
                "Appended {} ({}) to {}",
                record.topic,
                record.duration,
                self.path.display()
            );
        }
        Ok(())
    }

    /// Undo a partial append
    fn truncate_to(&self, len: u64) -> Result<(), AppError> {
        if debug_enabled() {
            eprintln!("Rolling {} back to {} bytes", self.path.display(), len);
        }
        OpenOptions::new()
            .write(true)
            .open(&self.path)
            .and_then(|f| f.set_len(len))
            .map_err(|e| AppError::io(&self.path, e))
    }

    /// Read records matching `filter`, in file order.
    /// A log that does not exist yet reads as empty.
    pub(crate) fn read(&self, filter: &DateFilter) -> Result<LoadResult, AppError> {
        let file = match File::open(&self.path) {
            Ok(f) => f,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(LoadResult::default());
            }
            Err(e) => return Err(AppError::io(&self.path, e)),
        };
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(file);

        let mut result = LoadResult::default();
        for (idx, row) in rdr.records().enumerate() {
            let fields: Vec<String> = match row {
                Ok(row) => row.iter().map(str::to_string).collect(),
                Err(e) if e.is_io_error() => return Err(AppError::csv(&self.path, e)),
                Err(e) => {
                    if debug_enabled() {
                        eprintln!("Unreadable row {} in {}: {}", idx + 1, self.path.display(), e);
                    }
                    result.skipped += 1;
                    continue;
                }
            };
            if idx == 0 && is_header(&fields) {
                continue;
            }
            match SessionRecord::from_fields(&fields) {
                Some(record) => {
                    if filter.contains(record.date) {
                        result.records.push(record);
                    }
                }
                None => {
                    if debug_enabled() {
                        eprintln!(
                            "Skipping malformed row {} in {}: {:?}",
                            idx + 1,
                            self.path.display(),
                            fields
                        );
                    }
                    result.skipped += 1;
                }
            }
        }
        Ok(result)
    }

    /// Copy the newest backup over the live log. Returns the backup used.
    pub(crate) fn restore_latest(&self) -> Result<PathBuf, AppError> {
        let Some(latest) = self.backups.latest() else {
            return Err(AppError::MissingFile {
                path: self.backups.path().to_path_buf(),
            });
        };
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| AppError::io(parent, e))?;
        }
        fs::copy(&latest, &self.path).map_err(|e| AppError::io(&self.path, e))?;
        Ok(latest)
    }

    /// Copy the live log to `dest`. Returns the number of bytes copied.
    ///
    /// `dest` naming the log itself is refused; copying would truncate it.
    pub(crate) fn export(&self, dest: &Path) -> Result<u64, AppError> {
        if !self.path.is_file() {
            return Err(AppError::MissingFile {
                path: self.path.clone(),
            });
        }
        if dest.exists() && same_file(&self.path, dest)? {
            return Err(AppError::SameFile {
                path: dest.to_path_buf(),
            });
        }
        fs::copy(&self.path, dest).map_err(|e| AppError::io(dest, e))
    }
}

fn same_file(a: &Path, b: &Path) -> Result<bool, AppError> {
    let a = fs::canonicalize(a).map_err(|e| AppError::io(a, e))?;
    let b = fs::canonicalize(b).map_err(|e| AppError::io(b, e))?;
    Ok(a == b)
}

fn is_header(fields: &[String]) -> bool {
    fields.len() == CSV_HEADER.len()
        && fields
            .iter()
            .zip(CSV_HEADER)
            .all(|(f, h)| f.trim().eq_ignore_ascii_case(h))
}
