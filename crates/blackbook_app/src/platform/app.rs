use std::fs;
use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use blackbook_core::{
    update, AppState, FileHandle, MetaField, Msg, NotificationLevel, ReferenceField, StudentField,
    DOCUMENTATION_KEYS,
};
use blackbook_engine::{ConfigError, DraftStore, EngineConfig, EngineError, EngineHandle};
use blackbook_logging::{bb_info, bb_warn};
use chrono::Utc;
use thiserror::Error;

use super::effects::event_to_msg;
use super::persistence::{load_draft, save_draft};
use crate::cli::Command;

const POLL_INTERVAL: Duration = Duration::from_millis(50);
/// Upper bound on waiting for the engine after one command.
const SETTLE_TIMEOUT: Duration = Duration::from_secs(180);

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error("{0}")]
    Usage(String),
    #[error("failed to read {path:?}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to write {path:?}: {source}")]
    Write { path: PathBuf, source: io::Error },
}

pub fn run_app(command: Command) -> Result<(), AppError> {
    let mut config = EngineConfig::from_env()?;
    if let Command::Generate(dir) = &command {
        config.download_dir = dir.clone();
    }
    bb_info!(
        "Starting against {} (drafts in {:?})",
        config.api_base_url,
        config.draft_dir
    );

    let mut app = App::new(&config)?;
    if let Some(draft) = load_draft(&app.drafts) {
        app.dispatch(Msg::RestoreDraft(draft));
    }
    app.dispatch(Msg::SessionStarted);
    app.settle();
    app.execute(command)
}

struct App {
    state: AppState,
    engine: EngineHandle,
    drafts: DraftStore,
    started: Instant,
    last_notified: u64,
}

impl App {
    fn new(config: &EngineConfig) -> Result<Self, AppError> {
        Ok(Self {
            state: AppState::new(),
            engine: EngineHandle::new(config)?,
            drafts: DraftStore::new(config.draft_dir.clone()),
            started: Instant::now(),
            last_notified: 0,
        })
    }

    fn execute(&mut self, command: Command) -> Result<(), AppError> {
        let report = command_view(&command);
        let preview_out = match &command {
            Command::Preview(path) => Some(path.clone()),
            _ => None,
        };
        match command {
            Command::Status => {}
            Command::Set { field, value } => {
                let msg = field_msg(&field, value)
                    .ok_or_else(|| AppError::Usage(format!("unknown field {field:?}")))?;
                self.dispatch(msg);
            }
            Command::Section { id, text } => self.dispatch(Msg::SectionEdited { id, content: text }),
            Command::Reference { label, url } => {
                let index = self.free_reference_row();
                self.dispatch(Msg::ReferenceEdited {
                    index,
                    field: ReferenceField::Label,
                    value: label,
                });
                self.dispatch(Msg::ReferenceEdited {
                    index,
                    field: ReferenceField::Url,
                    value: url,
                });
            }
            Command::Code(paths) => self.dispatch(Msg::CodeUploadRequested(paths)),
            Command::Screenshot(paths) => self.dispatch(Msg::ScreenshotUploadRequested(paths)),
            Command::Diagram {
                kind,
                image: Some(path),
            } => {
                let bytes = fs::read(&path).map_err(|source| AppError::Read {
                    path: path.clone(),
                    source,
                })?;
                self.dispatch(Msg::DiagramUploaded {
                    kind,
                    file: FileHandle::with_bytes(path, bytes),
                });
            }
            Command::Diagram { kind, image: None } => {
                self.dispatch(Msg::DiagramGenerateClicked(kind))
            }
            Command::Improve(id) => self.dispatch(Msg::ImproveSectionClicked(id)),
            Command::Template(kind) => self.dispatch(Msg::TemplateKindSelected(kind)),
            Command::Check => self.dispatch(Msg::PlagiarismCheckClicked),
            Command::Preview(_) | Command::History => {}
            Command::Ai => self.dispatch(Msg::AiGenerateClicked),
            Command::Generate(_) => {
                self.dispatch(Msg::GenerateClicked);
                self.settle();
                if self.state.view().generation.is_some() {
                    self.dispatch(Msg::DownloadClicked);
                }
            }
            Command::Snapshot(note) => self.dispatch(Msg::SnapshotRequested {
                note,
                at: Utc::now(),
            }),
            Command::Restore(id) => {
                if self.state.history().find(&id).is_none() {
                    return Err(AppError::Usage(format!("no version {id:?}")));
                }
                self.dispatch(Msg::VersionRestoreRequested(id));
            }
            Command::Reset => self.dispatch(Msg::ResetRequested),
        }
        self.settle();
        self.report(&report);
        if let Some(path) = preview_out {
            let html = self.state.view().preview_html;
            fs::write(&path, html).map_err(|source| AppError::Write {
                path: path.clone(),
                source,
            })?;
            println!("Preview written to {}", path.display());
        }
        Ok(())
    }

    fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        if state.consume_draft_dirty() {
            save_draft(&self.drafts, &state.draft());
        }
        state.consume_dirty();
        self.state = state;
        for effect in effects {
            self.engine.dispatch(effect);
        }
    }

    /// Feed engine events back into the core until nothing is in flight.
    fn settle(&mut self) {
        let deadline = Instant::now() + SETTLE_TIMEOUT;
        loop {
            if let Some(event) = self.engine.recv_timeout(POLL_INTERVAL) {
                self.dispatch(event_to_msg(event));
                continue;
            }
            if self.engine.is_idle() {
                while let Some(event) = self.engine.try_recv() {
                    self.dispatch(event_to_msg(event));
                }
                if self.engine.is_idle() {
                    break;
                }
            }
            if Instant::now() >= deadline {
                bb_warn!("Gave up waiting for the engine after {:?}", SETTLE_TIMEOUT);
                break;
            }
        }
        self.print_notifications();
        let now_ms = u64::try_from(self.started.elapsed().as_millis()).unwrap_or(u64::MAX);
        self.dispatch(Msg::Tick { now_ms });
    }

    fn print_notifications(&mut self) {
        let view = self.state.view();
        let seen = self.last_notified;
        for note in view.notifications.iter().filter(|n| n.id > seen) {
            let tag = match note.level {
                NotificationLevel::Success => "ok",
                NotificationLevel::Error => "error",
                NotificationLevel::Info => "info",
            };
            println!("[{tag}] {}", note.message);
            self.last_notified = note.id;
        }
    }

    /// Index of the row a new reference goes into, adding one if needed.
    fn free_reference_row(&mut self) -> usize {
        let refs = &self.state.document().references;
        let len = refs.len();
        let last_is_blank = refs
            .last()
            .is_some_and(|last| last.label.trim().is_empty() && last.url.trim().is_empty());
        if last_is_blank {
            len - 1
        } else {
            self.dispatch(Msg::ReferenceAdded);
            len
        }
    }

    fn report(&self, what: &Report) {
        let view = self.state.view();
        match what {
            Report::Status => {
                let title = if view.project_title.is_empty() {
                    "(untitled)"
                } else {
                    view.project_title.as_str()
                };
                println!("Project:    {title}");
                println!("Template:   {}", display_or_dash(&view.selected_template));
                println!(
                    "Completion: {}% (sections {}%)",
                    view.completion, view.structured_completion
                );
                let tabs = &view.completion_by_tab;
                println!(
                    "  details {}%  documentation {}%  code {}%  screenshots {}%  diagrams {}%",
                    tabs.details, tabs.documentation, tabs.code, tabs.screenshots, tabs.diagrams
                );
                println!(
                    "  references {}%  preview {}%  export {}%",
                    tabs.references, tabs.preview, tabs.export
                );
                println!(
                    "Ready:      {}",
                    if view.ready_to_generate { "yes" } else { "no" }
                );
                println!("Contents:");
                for entry in &view.toc {
                    println!("  {:<40} {}", entry.title, entry.page);
                }
                println!("Versions:   {}", view.versions.len());
            }
            Report::Plagiarism => match &view.plagiarism {
                Some(report) => {
                    println!("Originality: {}%", report.originality_percentage);
                    for flagged in &report.flagged_sections {
                        println!("  {}: {}", flagged.section_id, flagged.reason);
                    }
                }
                None => println!("No originality report."),
            },
            Report::History => {
                if view.versions.is_empty() {
                    println!("No versions recorded.");
                }
                for row in &view.versions {
                    println!(
                        "{}  {}  {}",
                        row.id,
                        row.created_at.format("%Y-%m-%d %H:%M:%S"),
                        row.note
                    );
                }
            }
            Report::Generation => match &view.generation {
                Some(result) => println!("Generated {}", display_or_dash(&result.file_name)),
                None => println!("No document generated."),
            },
            Report::Quiet => {}
        }
    }
}

enum Report {
    Status,
    Plagiarism,
    History,
    Generation,
    Quiet,
}

fn command_view(command: &Command) -> Report {
    match command {
        Command::Status | Command::Reset | Command::Restore(_) => Report::Status,
        Command::Check => Report::Plagiarism,
        Command::History | Command::Snapshot(_) => Report::History,
        Command::Generate(_) => Report::Generation,
        _ => Report::Quiet,
    }
}

/// Message for `set <field> <value>`: project meta keys, student detail keys,
/// documentation keys, or `template` for the backend template id.
fn field_msg(field: &str, value: String) -> Option<Msg> {
    if let Some(field) = MetaField::from_key(field) {
        return Some(Msg::MetaEdited { field, value });
    }
    if let Some(field) = StudentField::from_key(field) {
        return Some(Msg::StudentFieldEdited { field, value });
    }
    if DOCUMENTATION_KEYS.iter().any(|(key, _)| *key == field) {
        return Some(Msg::DocumentationFieldEdited {
            key: field.to_string(),
            value,
        });
    }
    match field {
        "template" | "selectedTemplate" => Some(Msg::TemplateSelected(value)),
        _ => None,
    }
}

fn display_or_dash(value: &str) -> &str {
    if value.trim().is_empty() {
        "-"
    } else {
        value
    }
}
