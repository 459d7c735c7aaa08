use chrono::{DateTime, Utc};

use crate::completion::{FlatTabCompletion, StructuredTabCompletion};
use crate::document::TocEntry;
use crate::notification::Notification;
use crate::plagiarism::PlagiarismReport;
use crate::state::{Busy, GenerationResult, PreviewSource, TemplateInfo};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionRow {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub note: String,
}

/// Everything a host needs to draw the wizard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppViewModel {
    pub completion: u8,
    pub completion_by_tab: FlatTabCompletion,
    pub structured_completion: u8,
    pub structured_by_tab: StructuredTabCompletion,
    pub ready_to_generate: bool,
    pub project_title: String,
    pub toc: Vec<TocEntry>,
    pub preview_html: String,
    pub preview_source: PreviewSource,
    pub dark_preview: bool,
    pub templates: Vec<TemplateInfo>,
    pub selected_template: String,
    pub notifications: Vec<Notification>,
    pub plagiarism: Option<PlagiarismReport>,
    pub generation: Option<GenerationResult>,
    pub versions: Vec<VersionRow>,
    pub busy: Busy,
    pub dirty: bool,
}
