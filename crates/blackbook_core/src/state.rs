use serde::{Deserialize, Serialize};

use crate::completion::{
    flat_completion, flat_completion_by_tab, ready_to_generate, structured_completion,
    structured_completion_by_tab, TabContext,
};
use crate::document::{DiagramKind, DocumentModel};
use crate::draft::Draft;
use crate::history::VersionHistory;
use crate::notification::{NotificationLevel, Notifications};
use crate::plagiarism::PlagiarismReport;
use crate::preview::PREVIEW_PLACEHOLDER;
use crate::view_model::{AppViewModel, VersionRow};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateInfo {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationResult {
    pub download_url: String,
    #[serde(default)]
    pub file_name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PreviewSource {
    #[default]
    Placeholder,
    Server,
    Local,
}

/// Requests currently in flight, for spinners and button guards.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Busy {
    pub ai: bool,
    pub improving: Option<String>,
    pub diagram: Option<DiagramKind>,
    pub plagiarism: bool,
    pub generating: bool,
    pub downloading: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    document: DocumentModel,
    history: VersionHistory,
    templates: Vec<TemplateInfo>,
    preview_html: String,
    preview_source: PreviewSource,
    notifications: Notifications,
    plagiarism: Option<PlagiarismReport>,
    generation: Option<GenerationResult>,
    busy: Busy,
    clock_ms: u64,
    dirty: bool,
    draft_dirty: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            document: DocumentModel::default(),
            history: VersionHistory::default(),
            templates: Vec::new(),
            preview_html: PREVIEW_PLACEHOLDER.to_string(),
            preview_source: PreviewSource::Placeholder,
            notifications: Notifications::default(),
            plagiarism: None,
            generation: None,
            busy: Busy::default(),
            clock_ms: 0,
            dirty: false,
            draft_dirty: false,
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn document(&self) -> &DocumentModel {
        &self.document
    }

    pub fn history(&self) -> &VersionHistory {
        &self.history
    }

    pub fn view(&self) -> AppViewModel {
        let ctx = TabContext {
            preview_html: Some(&self.preview_html),
            has_export_result: self.generation.is_some(),
        };
        AppViewModel {
            completion: flat_completion(&self.document),
            completion_by_tab: flat_completion_by_tab(&self.document, ctx),
            structured_completion: structured_completion(&self.document),
            structured_by_tab: structured_completion_by_tab(&self.document),
            ready_to_generate: ready_to_generate(&self.document),
            project_title: self.document.meta.project_title.clone(),
            toc: self.document.toc(),
            preview_html: self.preview_html.clone(),
            preview_source: self.preview_source,
            dark_preview: self.document.template_settings.dark_preview,
            templates: self.templates.clone(),
            selected_template: self.document.selected_template.clone(),
            notifications: self.notifications.items().to_vec(),
            plagiarism: self.plagiarism.clone(),
            generation: self.generation.clone(),
            versions: self
                .history
                .entries()
                .iter()
                .map(|entry| VersionRow {
                    id: entry.id.clone(),
                    created_at: entry.created_at,
                    note: entry.note.clone(),
                })
                .collect(),
            busy: self.busy.clone(),
            dirty: self.dirty,
        }
    }

    /// Serializable subset for the local draft slot.
    pub fn draft(&self) -> Draft {
        Draft::new(self.document.without_files(), self.history.clone())
    }

    /// Returns and clears the re-render flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// Returns and clears the flag set whenever persisted data changed.
    pub fn consume_draft_dirty(&mut self) -> bool {
        std::mem::take(&mut self.draft_dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn mark_document_changed(&mut self) {
        self.dirty = true;
        self.draft_dirty = true;
    }

    pub(crate) fn document_mut(&mut self) -> &mut DocumentModel {
        &mut self.document
    }

    pub(crate) fn replace_document(&mut self, document: DocumentModel) {
        self.document = document;
        self.mark_document_changed();
    }

    pub(crate) fn replace_history(&mut self, history: VersionHistory) {
        self.history = history;
        self.mark_document_changed();
    }

    pub(crate) fn history_mut(&mut self) -> &mut VersionHistory {
        self.draft_dirty = true;
        self.dirty = true;
        &mut self.history
    }

    pub(crate) fn set_templates(&mut self, templates: Vec<TemplateInfo>) {
        self.templates = templates;
        self.mark_dirty();
    }

    pub(crate) fn first_template_id(&self) -> Option<&str> {
        self.templates.first().map(|t| t.id.as_str())
    }

    pub(crate) fn set_preview(&mut self, html: String, source: PreviewSource) {
        if self.preview_html != html || self.preview_source != source {
            self.preview_html = html;
            self.preview_source = source;
            self.mark_dirty();
        }
    }

    pub(crate) fn notify(&mut self, level: NotificationLevel, message: impl Into<String>) {
        self.notifications.push(level, message, self.clock_ms);
        self.mark_dirty();
    }

    pub(crate) fn dismiss_notification(&mut self, id: u64) {
        if self.notifications.dismiss(id) {
            self.mark_dirty();
        }
    }

    pub(crate) fn advance_clock(&mut self, now_ms: u64) {
        self.clock_ms = self.clock_ms.max(now_ms);
        if self.notifications.expire(self.clock_ms) {
            self.mark_dirty();
        }
    }

    pub(crate) fn set_plagiarism(&mut self, report: Option<PlagiarismReport>) {
        self.plagiarism = report;
        self.mark_dirty();
    }

    pub(crate) fn generation(&self) -> Option<&GenerationResult> {
        self.generation.as_ref()
    }

    pub(crate) fn set_generation(&mut self, result: Option<GenerationResult>) {
        self.generation = result;
        self.mark_dirty();
    }

    pub(crate) fn busy(&self) -> &Busy {
        &self.busy
    }

    pub(crate) fn busy_mut(&mut self) -> &mut Busy {
        self.mark_dirty();
        &mut self.busy
    }
}
