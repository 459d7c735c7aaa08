use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::document::DocumentModel;

pub const HISTORY_LIMIT: usize = 20;
pub const AUTOSAVE_NOTE: &str = "Autosave";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionEntry {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub note: String,
    pub snapshot: DocumentModel,
}

/// Snapshots of the document, most recent first, capped at [`HISTORY_LIMIT`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VersionHistory {
    entries: Vec<VersionEntry>,
}

impl VersionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(mut entries: Vec<VersionEntry>) -> Self {
        entries.truncate(HISTORY_LIMIT);
        Self { entries }
    }

    /// Record a snapshot and return its id.
    pub fn record(
        &mut self,
        note: impl Into<String>,
        created_at: DateTime<Utc>,
        snapshot: DocumentModel,
    ) -> String {
        let id = Uuid::new_v4().to_string();
        self.entries.insert(
            0,
            VersionEntry {
                id: id.clone(),
                created_at,
                note: note.into(),
                snapshot,
            },
        );
        self.entries.truncate(HISTORY_LIMIT);
        id
    }

    pub fn find(&self, id: &str) -> Option<&VersionEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    pub fn entries(&self) -> &[VersionEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
