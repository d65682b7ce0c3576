//! Writes generated schemas to disk
//!
//! An existing file is copied to `<file>.<unix-timestamp>.bak` before being
//! overwritten, unless backups are disabled.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;

use super::errors::{ScaffoldError, ScaffoldResult};
use crate::observability::{Event, Logger};

/// Outcome of one write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteReport {
    pub path: PathBuf,
    pub backup: Option<PathBuf>,
}

/// Writes generated files into one output directory
#[derive(Debug, Clone)]
pub struct ScaffoldWriter {
    output_dir: PathBuf,
    backup: bool,
}

impl ScaffoldWriter {
    pub fn new(output_dir: impl Into<PathBuf>, backup: bool) -> Self {
        Self {
            output_dir: output_dir.into(),
            backup,
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Writes `contents` to `<output_dir>/<file_name>`
    pub fn write(&self, file_name: &str, contents: &str) -> ScaffoldResult<WriteReport> {
        fs::create_dir_all(&self.output_dir)
            .map_err(|e| ScaffoldError::io(&self.output_dir, e))?;

        let path = self.output_dir.join(file_name);
        let backup = if self.backup && path.exists() {
            Some(backup_file(&path)?)
        } else {
            None
        };

        fs::write(&path, contents).map_err(|e| ScaffoldError::io(&path, e))?;

        let path_str = path.display().to_string();
        Logger::event(Event::ScaffoldWritten, &[("path", path_str.as_str())]);

        Ok(WriteReport { path, backup })
    }
}

fn backup_file(path: &Path) -> ScaffoldResult<PathBuf> {
    let mut name = path.as_os_str().to_owned();
    name.push(format!(".{}.bak", Utc::now().timestamp()));
    let backup = PathBuf::from(name);

    fs::copy(path, &backup).map_err(|e| ScaffoldError::io(&backup, e))?;

    let source = path.display().to_string();
    let target = backup.display().to_string();
    Logger::event(
        Event::BackupCreated,
        &[("backup", target.as_str()), ("path", source.as_str())],
    );
    Ok(backup)
}
