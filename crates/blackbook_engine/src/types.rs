use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use blackbook_core::{
    CodeFile, DiagramKind, DocumentModel, Figure, GenerationResult, PlagiarismReport,
    PreviewSource, TemplateInfo,
};
use chrono::{DateTime, Utc};

/// Results reported back from the engine thread, one per executed effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    TemplatesLoaded(Result<Vec<TemplateInfo>, BackendError>),
    PreviewRendered {
        html: String,
        source: PreviewSource,
    },
    Autosaved {
        document: Box<DocumentModel>,
        at: DateTime<Utc>,
        result: Result<(), String>,
    },
    AiContent(Result<BTreeMap<String, String>, BackendError>),
    SectionImproved {
        section_id: String,
        improved: ImprovedSection,
    },
    DiagramGenerated {
        kind: DiagramKind,
        result: Result<GeneratedDiagram, BackendError>,
    },
    CodeFilesReady(Vec<CodeFile>),
    ScreenshotsReady(Vec<Figure>),
    PlagiarismChecked(PlagiarismReport),
    DocumentGenerated(Result<GenerationResult, BackendError>),
    Downloaded(Result<PathBuf, String>),
}

/// Outcome of a section rewrite. Never an error: failures keep the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImprovedSection {
    pub text: String,
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedDiagram {
    pub filename: String,
    pub preview_url: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message} ({kind})")]
pub struct BackendError {
    pub kind: FailureKind,
    pub message: String,
}

impl BackendError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    Network,
    /// The backend answered but reported failure in its payload.
    Rejected,
    Decode,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::Rejected => write!(f, "rejected"),
            FailureKind::Decode => write!(f, "malformed response"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("failed to start async runtime: {0}")]
    Runtime(#[from] std::io::Error),
    #[error(transparent)]
    Backend(#[from] BackendError),
}
