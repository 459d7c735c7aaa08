use std::path::PathBuf;

use async_trait::async_trait;
use blackbook_core::DocumentModel;

use crate::persist::{AtomicFileWriter, PersistError};

pub const AUTOSAVE_FILE: &str = "blackbook-autosave.json";

/// Destination for debounced autosaves.
#[async_trait]
pub trait AutosaveTarget: Send + Sync {
    async fn save(&self, doc: &DocumentModel) -> Result<(), PersistError>;
}

/// Keeps the latest autosaved document next to the draft.
#[derive(Debug, Clone)]
pub struct SnapshotFile {
    writer: AtomicFileWriter,
}

impl SnapshotFile {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            writer: AtomicFileWriter::new(dir),
        }
    }

    pub fn path(&self) -> PathBuf {
        self.writer.path_of(AUTOSAVE_FILE)
    }
}

#[async_trait]
impl AutosaveTarget for SnapshotFile {
    async fn save(&self, doc: &DocumentModel) -> Result<(), PersistError> {
        let snapshot = doc.without_files();
        let writer = self.writer.clone();
        tokio::task::spawn_blocking(move || writer.write_json(AUTOSAVE_FILE, &snapshot))
            .await
            .map_err(|err| PersistError::Io(std::io::Error::other(err)))??;
        Ok(())
    }
}
