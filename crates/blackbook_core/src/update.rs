use crate::document::{Diagram, DiagramSource, DocumentModel, Reference};
use crate::flat;
use crate::history::AUTOSAVE_NOTE;
use crate::notification::NotificationLevel;
use crate::references;
use crate::{AppState, Effect, Msg};

const MSG_TEMPLATES_FAILED: &str = "Failed to fetch templates.";
const MSG_AI_NEEDS_TITLE: &str = "Enter project title before AI generation.";
const MSG_AI_DONE: &str = "AI content generated successfully.";
const MSG_AI_FAILED: &str = "AI generation failed.";
const MSG_DIAGRAM_NEEDS_TITLE: &str = "Enter Project Title first.";
const MSG_DIAGRAM_DONE: &str = "Diagram generated successfully.";
const MSG_DIAGRAM_FAILED: &str = "Diagram generation failed.";
const MSG_DIAGRAM_MANUAL: &str = "Manual upload selected. AI version overridden.";
const MSG_NOT_READY: &str = "Complete required fields before generating.";
const MSG_GENERATED: &str = "Black Book generated successfully.";
const MSG_GENERATION_FAILED: &str = "Document generation failed.";
const MSG_DOWNLOAD_MISSING: &str = "Download URL missing.";
const MSG_DOWNLOAD_FAILED: &str = "Download failed.";

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::SessionStarted => vec![
            Effect::FetchTemplates,
            Effect::SchedulePreview(Box::new(state.document().clone())),
        ],
        Msg::RestoreDraft(draft) => {
            state.replace_document(draft.document.normalized());
            state.replace_history(draft.version_history);
            vec![Effect::SchedulePreview(Box::new(state.document().clone()))]
        }

        Msg::MetaEdited { field, value } => {
            let changed = state.document_mut().set_meta(field, value);
            edited(&mut state, changed)
        }
        Msg::StudentFieldEdited { field, value } => {
            let changed = flat::set_student_field(state.document_mut(), field, &value);
            edited(&mut state, changed)
        }
        Msg::TemplateSelected(id) => {
            let doc = state.document_mut();
            let changed = doc.selected_template != id;
            doc.selected_template = id;
            edited(&mut state, changed)
        }
        Msg::TemplateKindSelected(kind) => {
            let settings = &mut state.document_mut().template_settings;
            let before = settings.clone();
            settings.apply_template(kind);
            let changed = *settings != before;
            edited(&mut state, changed)
        }
        Msg::DarkPreviewToggled(dark) => {
            let settings = &mut state.document_mut().template_settings;
            let changed = settings.dark_preview != dark;
            settings.dark_preview = dark;
            edited(&mut state, changed)
        }

        Msg::SectionEdited { id, content } => {
            let changed = state.document_mut().set_section_content(&id, content);
            edited(&mut state, changed)
        }
        Msg::DocumentationFieldEdited { key, value } => {
            let changed = flat::set_documentation_field(state.document_mut(), &key, &value);
            edited(&mut state, changed)
        }

        Msg::DiagramUploaded { kind, file } => {
            state
                .document_mut()
                .upsert_diagram(Diagram::manual(kind, file));
            state.notify(NotificationLevel::Success, MSG_DIAGRAM_MANUAL);
            edited(&mut state, true)
        }
        Msg::DiagramsReplaced(diagrams) => {
            let doc = state.document_mut();
            let before = doc.diagrams.clone();
            doc.set_diagrams(diagrams);
            let changed = doc.diagrams != before;
            edited(&mut state, changed)
        }
        Msg::CodeUploadRequested(paths) => {
            if paths.is_empty() {
                Vec::new()
            } else {
                vec![Effect::UploadCode(paths)]
            }
        }
        Msg::CodeFilesReceived(files) => {
            let changed = !files.is_empty();
            for file in files {
                state.document_mut().upsert_code_file(file);
            }
            edited(&mut state, changed)
        }
        Msg::ScreenshotUploadRequested(paths) => {
            if paths.is_empty() {
                Vec::new()
            } else {
                vec![Effect::UploadScreenshots(paths)]
            }
        }
        Msg::ScreenshotsReceived(figures) => {
            let changed = !figures.is_empty();
            state.document_mut().figures.extend(figures);
            edited(&mut state, changed)
        }
        Msg::ScreenshotCaptionEdited { index, caption } => {
            let changed = state.document_mut().set_figure_caption(index, caption);
            edited(&mut state, changed)
        }
        Msg::ScreenshotRemoved(index) => {
            let changed = state.document_mut().remove_figure(index);
            edited(&mut state, changed)
        }
        Msg::PlagiarismReportTitleEdited(title) => {
            let report = &mut state.document_mut().plagiarism_report;
            let changed = report.title != title;
            report.title = title;
            edited(&mut state, changed)
        }
        Msg::PlagiarismReportAttached(file) => {
            let report = &mut state.document_mut().plagiarism_report;
            report.file_name = file.as_ref().map(|f| f.file_name()).unwrap_or_default();
            report.file = file;
            edited(&mut state, true)
        }

        Msg::ReferenceEdited {
            index,
            field,
            value,
        } => {
            let next = references::update_row(&state.document().references, index, field, &value);
            set_references(&mut state, next)
        }
        Msg::ReferenceAdded => {
            let next = references::add_row(&state.document().references);
            set_references(&mut state, next)
        }
        Msg::ReferenceRemoved(index) => {
            let next = references::remove_row(&state.document().references, index);
            set_references(&mut state, next)
        }

        Msg::TemplatesLoaded(templates) => {
            state.set_templates(templates);
            let first = state.first_template_id().map(ToOwned::to_owned);
            match first {
                Some(id) if state.document().selected_template.is_empty() => {
                    state.document_mut().selected_template = id;
                    edited(&mut state, true)
                }
                _ => Vec::new(),
            }
        }
        Msg::TemplatesFailed(_) => {
            state.notify(NotificationLevel::Error, MSG_TEMPLATES_FAILED);
            Vec::new()
        }
        Msg::PreviewRendered { html, source } => {
            state.set_preview(html, source);
            Vec::new()
        }
        Msg::AutosaveSucceeded { document, at } => {
            state.history_mut().record(AUTOSAVE_NOTE, at, *document);
            Vec::new()
        }
        Msg::AutosaveFailed(_) => Vec::new(),

        Msg::AiGenerateClicked => {
            let title = state.document().meta.project_title.trim().to_string();
            if title.is_empty() {
                state.notify(NotificationLevel::Error, MSG_AI_NEEDS_TITLE);
                Vec::new()
            } else if state.busy().ai {
                Vec::new()
            } else {
                state.busy_mut().ai = true;
                vec![Effect::RequestAiContent {
                    project_title: title,
                }]
            }
        }
        Msg::AiContentReceived(documentation) => {
            state.busy_mut().ai = false;
            let changed = flat::merge_documentation(state.document_mut(), &documentation);
            state.notify(NotificationLevel::Success, MSG_AI_DONE);
            edited(&mut state, changed)
        }
        Msg::AiFailed(message) => {
            state.busy_mut().ai = false;
            state.notify(NotificationLevel::Error, or_default(message, MSG_AI_FAILED));
            Vec::new()
        }
        Msg::ImproveSectionClicked(id) => {
            let content = state
                .document()
                .section(&id)
                .map(|section| section.content.clone())
                .unwrap_or_default();
            if content.trim().is_empty() || state.busy().improving.is_some() {
                Vec::new()
            } else {
                state.busy_mut().improving = Some(id.clone());
                vec![Effect::ImproveSection {
                    section_id: id,
                    content,
                }]
            }
        }
        Msg::SectionImproved { id, text, summary } => {
            state.busy_mut().improving = None;
            if !summary.is_empty() {
                state.notify(NotificationLevel::Info, summary);
            }
            let changed = !text.is_empty() && state.document_mut().set_section_content(&id, text);
            edited(&mut state, changed)
        }
        Msg::DiagramGenerateClicked(kind) => {
            let title = state.document().meta.project_title.trim().to_string();
            if title.is_empty() {
                state.notify(NotificationLevel::Error, MSG_DIAGRAM_NEEDS_TITLE);
                Vec::new()
            } else if state.busy().diagram.is_some() {
                Vec::new()
            } else {
                state.busy_mut().diagram = Some(kind);
                vec![Effect::GenerateDiagram {
                    kind,
                    project_title: title,
                }]
            }
        }
        Msg::DiagramGenerated {
            kind,
            filename,
            preview_url,
            file,
        } => {
            state.busy_mut().diagram = None;
            state.document_mut().upsert_diagram(Diagram {
                diagram_key: kind,
                name: kind.display_name().to_string(),
                file,
                source: DiagramSource::Ai,
                preview_url,
                ai_filename: Some(filename),
            });
            state.notify(NotificationLevel::Success, MSG_DIAGRAM_DONE);
            edited(&mut state, true)
        }
        Msg::DiagramGenerationFailed { message, .. } => {
            state.busy_mut().diagram = None;
            state.notify(
                NotificationLevel::Error,
                or_default(message, MSG_DIAGRAM_FAILED),
            );
            Vec::new()
        }

        Msg::PlagiarismCheckClicked => {
            state.busy_mut().plagiarism = true;
            vec![Effect::CheckPlagiarism(Box::new(state.document().clone()))]
        }
        Msg::PlagiarismChecked(report) => {
            state.busy_mut().plagiarism = false;
            state.set_plagiarism(Some(report));
            Vec::new()
        }

        Msg::GenerateClicked => {
            if !crate::completion::ready_to_generate(state.document()) {
                state.notify(NotificationLevel::Error, MSG_NOT_READY);
                Vec::new()
            } else if state.busy().generating {
                Vec::new()
            } else {
                state.busy_mut().generating = true;
                state.set_generation(None);
                vec![Effect::GenerateDocument(Box::new(state.document().clone()))]
            }
        }
        Msg::DocumentGenerated(result) => {
            state.busy_mut().generating = false;
            state.set_generation(Some(result));
            state.notify(NotificationLevel::Success, MSG_GENERATED);
            Vec::new()
        }
        Msg::GenerationFailed(message) => {
            state.busy_mut().generating = false;
            state.notify(NotificationLevel::Error, or_default(message, MSG_GENERATION_FAILED));
            Vec::new()
        }
        Msg::DownloadClicked => match state.generation().cloned() {
            Some(result) if !result.download_url.is_empty() => {
                state.busy_mut().downloading = true;
                vec![Effect::Download(result)]
            }
            _ => {
                state.notify(NotificationLevel::Error, MSG_DOWNLOAD_MISSING);
                Vec::new()
            }
        },
        Msg::DownloadCompleted(path) => {
            state.busy_mut().downloading = false;
            state.notify(
                NotificationLevel::Success,
                format!("Saved {}", path.display()),
            );
            Vec::new()
        }
        Msg::DownloadFailed(message) => {
            state.busy_mut().downloading = false;
            state.notify(NotificationLevel::Error, or_default(message, MSG_DOWNLOAD_FAILED));
            Vec::new()
        }

        Msg::SnapshotRequested { note, at } => {
            let snapshot = state.document().clone();
            state.history_mut().record(note, at, snapshot);
            Vec::new()
        }
        Msg::VersionRestoreRequested(id) => {
            let snapshot = state.history().find(&id).map(|entry| entry.snapshot.clone());
            match snapshot {
                Some(snapshot) => {
                    state.replace_document(snapshot);
                    Effect::sync(state.document()).into()
                }
                None => Vec::new(),
            }
        }
        Msg::ResetRequested => {
            state.replace_document(DocumentModel::default());
            state.set_generation(None);
            state.set_plagiarism(None);
            Effect::sync(state.document()).into()
        }

        Msg::NotificationDismissed(id) => {
            state.dismiss_notification(id);
            Vec::new()
        }
        Msg::Tick { now_ms } => {
            state.advance_clock(now_ms);
            Vec::new()
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

/// Mark a document edit and schedule preview and autosave for it.
fn edited(state: &mut AppState, changed: bool) -> Vec<Effect> {
    if !changed {
        return Vec::new();
    }
    state.mark_document_changed();
    Effect::sync(state.document()).into()
}

fn set_references(state: &mut AppState, next: Vec<Reference>) -> Vec<Effect> {
    let changed = state.document().references != next;
    state.document_mut().references = next;
    edited(state, changed)
}

fn or_default(message: String, fallback: &str) -> String {
    if message.trim().is_empty() {
        fallback.to_string()
    } else {
        message
    }
}

