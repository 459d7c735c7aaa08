//! Black Book core: report model, scoring, preview compositor and the pure
//! wizard state machine.
mod completion;
mod document;
mod draft;
mod effect;
mod flat;
mod history;
mod msg;
mod notification;
mod plagiarism;
mod preview;
mod references;
mod state;
mod update;
mod view_model;

pub use completion::{
    flat_completion, flat_completion_by_tab, ready_to_generate, structured_completion,
    structured_completion_by_tab, FlatTabCompletion, StructuredTabCompletion, TabContext,
    FLAT_TRACKED_ITEMS, REQUIRED_META,
};
pub use document::{
    heading_for, CodeFile, Diagram, DiagramKind, DiagramSource, DocumentModel, FileHandle, Figure,
    Margins, MetaField, PlagiarismReportRef, ProjectMeta, Reference, Section, TemplateKind,
    TemplateSettings, TocEntry, DEFAULT_SECTION_KEYS,
};
pub use draft::{Draft, DRAFT_SCHEMA};
pub use effect::Effect;
pub use flat::{
    merge_documentation, section_id_for, set_documentation_field, set_student_field, FlatForm,
    StudentDetails, StudentField, DOCUMENTATION_KEYS,
};
pub use history::{VersionEntry, VersionHistory, AUTOSAVE_NOTE, HISTORY_LIMIT};
pub use msg::Msg;
pub use notification::{Notification, NotificationLevel, Notifications, NOTIFICATION_TTL_MS};
pub use plagiarism::{
    estimate_originality, is_low_diversity, originality_score, repeated_token_count,
    FlaggedSection, PlagiarismReport, LOW_LEXICAL_DIVERSITY,
};
pub use preview::{
    escape_attr, escape_text, render_preview_html, DEFAULT_CAPTION, PREVIEW_PLACEHOLDER,
    UNTITLED_PROJECT,
};
pub use references::{
    add_row, editable_rows, remove_row, submission_references, update_row, ReferenceField,
};
pub use state::{AppState, Busy, GenerationResult, PreviewSource, TemplateInfo};
pub use update::update;
pub use view_model::{AppViewModel, VersionRow};
