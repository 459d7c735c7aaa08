//! Local draft slot: one JSON file named after the draft schema tag.
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use blackbook_core::{Draft, DRAFT_SCHEMA};
use blackbook_logging::{bb_info, bb_warn};
use thiserror::Error;

use crate::persist::{AtomicFileWriter, PersistError};

#[derive(Debug, Error)]
pub enum DraftError {
    /// The stored draft was unreadable and has been discarded.
    #[error("stored draft discarded: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("io error reading draft: {0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, Clone)]
pub struct DraftStore {
    writer: AtomicFileWriter,
}

impl DraftStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            writer: AtomicFileWriter::new(dir),
        }
    }

    pub fn file_name() -> String {
        format!("{DRAFT_SCHEMA}.json")
    }

    pub fn path(&self) -> PathBuf {
        self.writer.path_of(&Self::file_name())
    }

    /// Load the stored draft, if any. A draft that fails to parse is deleted
    /// and reported as [`DraftError::Parse`].
    pub fn load(&self) -> Result<Option<Draft>, DraftError> {
        let path = self.path();
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(DraftError::Io(err)),
        };
        match Draft::from_json(&raw) {
            Ok(draft) => {
                bb_info!("Loaded draft from {:?}", path);
                Ok(Some(draft))
            }
            Err(err) => {
                bb_warn!("Discarding unreadable draft {:?}: {}", path, err);
                discard(&path);
                Err(DraftError::Parse(err))
            }
        }
    }

    pub fn save(&self, draft: &Draft) -> Result<PathBuf, PersistError> {
        self.writer.write_json(&Self::file_name(), draft)
    }
}

fn discard(path: &Path) {
    if let Err(err) = fs::remove_file(path) {
        bb_warn!("Could not remove {:?}: {}", path, err);
    }
}
