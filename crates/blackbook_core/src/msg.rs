use std::collections::BTreeMap;
use std::path::PathBuf;

use chrono::{DateTime, Utc};

use crate::document::{
    CodeFile, Diagram, DiagramKind, DocumentModel, FileHandle, Figure, MetaField, TemplateKind,
};
use crate::draft::Draft;
use crate::flat::StudentField;
use crate::plagiarism::PlagiarismReport;
use crate::references::ReferenceField;
use crate::state::{GenerationResult, PreviewSource, TemplateInfo};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Host finished start-up (draft already restored, if any).
    SessionStarted,
    /// Replace the live state with a stored draft.
    RestoreDraft(Draft),

    // Project details.
    MetaEdited { field: MetaField, value: String },
    StudentFieldEdited { field: StudentField, value: String },
    TemplateSelected(String),
    TemplateKindSelected(TemplateKind),
    DarkPreviewToggled(bool),

    // Documentation.
    SectionEdited { id: String, content: String },
    DocumentationFieldEdited { key: String, value: String },

    // Assets.
    DiagramUploaded { kind: DiagramKind, file: FileHandle },
    DiagramsReplaced(Vec<Diagram>),
    CodeUploadRequested(Vec<PathBuf>),
    CodeFilesReceived(Vec<CodeFile>),
    ScreenshotUploadRequested(Vec<PathBuf>),
    ScreenshotsReceived(Vec<Figure>),
    ScreenshotCaptionEdited { index: usize, caption: String },
    ScreenshotRemoved(usize),
    PlagiarismReportTitleEdited(String),
    PlagiarismReportAttached(Option<FileHandle>),

    // References editor.
    ReferenceEdited { index: usize, field: ReferenceField, value: String },
    ReferenceAdded,
    ReferenceRemoved(usize),

    // Backend results.
    TemplatesLoaded(Vec<TemplateInfo>),
    TemplatesFailed(String),
    PreviewRendered { html: String, source: PreviewSource },
    AutosaveSucceeded { document: Box<DocumentModel>, at: DateTime<Utc> },
    AutosaveFailed(String),

    // AI assistance.
    AiGenerateClicked,
    AiContentReceived(BTreeMap<String, String>),
    AiFailed(String),
    ImproveSectionClicked(String),
    SectionImproved { id: String, text: String, summary: String },
    DiagramGenerateClicked(DiagramKind),
    DiagramGenerated {
        kind: DiagramKind,
        filename: String,
        preview_url: String,
        file: Option<FileHandle>,
    },
    DiagramGenerationFailed { kind: DiagramKind, message: String },

    // Plagiarism.
    PlagiarismCheckClicked,
    PlagiarismChecked(PlagiarismReport),

    // Export.
    GenerateClicked,
    DocumentGenerated(GenerationResult),
    GenerationFailed(String),
    DownloadClicked,
    DownloadCompleted(PathBuf),
    DownloadFailed(String),

    // History.
    SnapshotRequested { note: String, at: DateTime<Utc> },
    VersionRestoreRequested(String),
    ResetRequested,

    /// User closed a toast.
    NotificationDismissed(u64),
    /// Clock tick in milliseconds since session start; expires toasts.
    Tick { now_ms: u64 },
    /// Fallback for placeholder wiring.
    NoOp,
}
