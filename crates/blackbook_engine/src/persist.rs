//! Whole-file replacement for the files the engine owns: the draft slot, the
//! autosave snapshot and downloaded reports.
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use serde::Serialize;
use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("cannot write into {path:?}: {reason}")]
    OutputDir { path: PathBuf, reason: String },
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("serialize error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Writes files into one directory through a temp file and a rename, so a
/// reader sees either the previous content or the new one.
#[derive(Debug, Clone)]
pub struct AtomicFileWriter {
    dir: PathBuf,
}

impl AtomicFileWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_of(&self, filename: &str) -> PathBuf {
        self.dir.join(filename)
    }

    /// Pretty-printed JSON, as drafts and autosave snapshots are stored.
    pub fn write_json<T: Serialize + ?Sized>(
        &self,
        filename: &str,
        value: &T,
    ) -> Result<PathBuf, PersistError> {
        let json = serde_json::to_vec_pretty(value)?;
        self.write_bytes(filename, &json)
    }

    pub fn write_bytes(&self, filename: &str, content: &[u8]) -> Result<PathBuf, PersistError> {
        self.prepare_dir()?;

        let target = self.path_of(filename);
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(content)?;
        tmp.as_file_mut().sync_all()?;
        tmp.persist(&target).map_err(|err| PersistError::Io(err.error))?;
        Ok(target)
    }

    /// Creates the directory on first use.
    fn prepare_dir(&self) -> Result<(), PersistError> {
        match fs::metadata(&self.dir) {
            Ok(meta) if meta.is_dir() => Ok(()),
            Ok(_) => Err(self.dir_error("not a directory")),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                fs::create_dir_all(&self.dir).map_err(|err| self.dir_error(err))
            }
            Err(err) => Err(self.dir_error(err)),
        }
    }

    fn dir_error(&self, reason: impl ToString) -> PersistError {
        PersistError::OutputDir {
            path: self.dir.clone(),
            reason: reason.to_string(),
        }
    }
}
