use std::path::PathBuf;

use crate::document::{DiagramKind, DocumentModel};
use crate::state::GenerationResult;

/// Side effects requested by [`crate::update`]; executed by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Load the backend's template list.
    FetchTemplates,
    /// Debounced preview render of this snapshot.
    SchedulePreview(Box<DocumentModel>),
    /// Debounced autosave of this snapshot.
    ScheduleAutosave(Box<DocumentModel>),
    RequestAiContent { project_title: String },
    ImproveSection { section_id: String, content: String },
    GenerateDiagram { kind: DiagramKind, project_title: String },
    UploadCode(Vec<PathBuf>),
    UploadScreenshots(Vec<PathBuf>),
    CheckPlagiarism(Box<DocumentModel>),
    GenerateDocument(Box<DocumentModel>),
    Download(GenerationResult),
}

impl Effect {
    /// Both debounced pipelines for an edited snapshot.
    pub(crate) fn sync(doc: &DocumentModel) -> [Effect; 2] {
        [
            Effect::SchedulePreview(Box::new(doc.clone())),
            Effect::ScheduleAutosave(Box::new(doc.clone())),
        ]
    }
}
