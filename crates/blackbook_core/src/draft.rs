//! Serializable subset of the application state kept between sessions.
use serde::{Deserialize, Serialize};

use crate::document::DocumentModel;
use crate::history::VersionHistory;

/// Schema tag; also names the local storage slot.
pub const DRAFT_SCHEMA: &str = "blackbook-draft-v2";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Draft {
    pub schema: String,
    #[serde(default)]
    pub document: DocumentModel,
    #[serde(default)]
    pub version_history: VersionHistory,
}

impl Draft {
    pub fn new(document: DocumentModel, version_history: VersionHistory) -> Self {
        Self {
            schema: DRAFT_SCHEMA.to_string(),
            document,
            version_history,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Parse a stored draft. Drafts written under another schema tag are
    /// rejected like malformed ones.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        let draft: Draft = serde_json::from_str(raw)?;
        if draft.schema != DRAFT_SCHEMA {
            return Err(serde::de::Error::custom(format!(
                "unexpected draft schema {:?}",
                draft.schema
            )));
        }
        Ok(Draft {
            document: draft.document.normalized(),
            ..draft
        })
    }
}
