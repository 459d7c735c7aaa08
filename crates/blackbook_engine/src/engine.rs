use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use blackbook_core::{estimate_originality, DocumentModel, Effect, GenerationResult};
use blackbook_logging::{bb_debug, bb_info, bb_warn};
use chrono::Utc;
use futures_util::future::{BoxFuture, FutureExt};

use crate::autosave::{AutosaveTarget, SnapshotFile};
use crate::debounce::Debouncer;
use crate::filename::download_file_name;
use crate::http::HttpSettings;
use crate::persist::AtomicFileWriter;
use crate::plagiarism::{HeuristicChecker, PlagiarismChecker};
use crate::preview::{render_with_fallback, PreviewRenderer};
use crate::submission::Submission;
use crate::uploads::{upload_code_files, upload_screenshots};
use crate::{
    ApiClient, Backend, EngineConfig, EngineError, EngineEvent, LegacyClient, PreviewContract,
};

/// Collaborators the engine executes effects against.
pub struct Services {
    pub backend: Arc<dyn Backend>,
    pub legacy: Arc<LegacyClient>,
    /// `None` renders every preview locally.
    pub preview: Option<Arc<dyn PreviewRenderer>>,
    pub plagiarism: Arc<dyn PlagiarismChecker>,
    pub autosave: Arc<dyn AutosaveTarget>,
    pub download_dir: PathBuf,
}

impl Services {
    pub fn from_config(config: &EngineConfig) -> Result<Self, EngineError> {
        let settings = HttpSettings::from(config);
        let api = Arc::new(ApiClient::new(&settings)?);
        let legacy = Arc::new(LegacyClient::new(&settings)?);
        let preview: Arc<dyn PreviewRenderer> = match config.preview_contract {
            PreviewContract::Envelope => api.clone(),
            PreviewContract::Legacy => legacy.clone(),
        };
        Ok(Self {
            backend: api,
            legacy,
            preview: Some(preview),
            plagiarism: Arc::new(HeuristicChecker),
            autosave: Arc::new(SnapshotFile::new(config.draft_dir.clone())),
            download_dir: config.download_dir.clone(),
        })
    }
}

struct Worker {
    services: Services,
    preview_debounce: Debouncer,
    autosave_debounce: Debouncer,
}

enum EngineCommand {
    Run(Effect),
}

/// Runs effects on a background tokio runtime and reports results as
/// [`EngineEvent`]s.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
    in_flight: Arc<AtomicUsize>,
}

impl EngineHandle {
    pub fn new(config: &EngineConfig) -> Result<Self, EngineError> {
        let services = Services::from_config(config)?;
        Self::with_services(
            services,
            config.preview_debounce,
            config.autosave_debounce,
        )
    }

    pub fn with_services(
        services: Services,
        preview_quiet: Duration,
        autosave_quiet: Duration,
    ) -> Result<Self, EngineError> {
        let runtime = tokio::runtime::Runtime::new()?;
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let in_flight = Arc::new(AtomicUsize::new(0));

        let worker = Arc::new(Worker {
            services,
            preview_debounce: Debouncer::new(preview_quiet),
            autosave_debounce: Debouncer::new(autosave_quiet),
        });
        let counter = in_flight.clone();

        thread::spawn(move || {
            // Debounced jobs are scheduled here, in command order.
            let _entered = runtime.enter();
            while let Ok(command) = cmd_rx.recv() {
                let guard = InFlight(counter.clone());
                let EngineCommand::Run(effect) = command;
                let task = start_effect(worker.clone(), effect, event_tx.clone());
                runtime.spawn(async move {
                    task.await;
                    drop(guard);
                });
            }
            worker.preview_debounce.shutdown();
            worker.autosave_debounce.shutdown();
        });

        Ok(Self {
            cmd_tx,
            event_rx,
            in_flight,
        })
    }

    pub fn dispatch(&self, effect: Effect) {
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        if self.cmd_tx.send(EngineCommand::Run(effect)).is_err() {
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            bb_warn!("Engine thread has stopped; effect dropped");
        }
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }

    /// No effect is queued, waiting out a quiet period, or running.
    pub fn is_idle(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) == 0
    }
}

struct InFlight(Arc<AtomicUsize>);

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

fn start_effect(
    worker: Arc<Worker>,
    effect: Effect,
    event_tx: mpsc::Sender<EngineEvent>,
) -> BoxFuture<'static, ()> {
    match effect {
        Effect::SchedulePreview(doc) => {
            let job_worker = worker.clone();
            let handle = worker.preview_debounce.schedule(move || async move {
                let renderer = job_worker.services.preview.as_deref();
                let (html, source) = render_with_fallback(renderer, &doc).await;
                let _ = event_tx.send(EngineEvent::PreviewRendered { html, source });
            });
            async move {
                if let Ok(false) = handle.await {
                    bb_debug!("Preview superseded");
                }
            }
            .boxed()
        }
        Effect::ScheduleAutosave(doc) => {
            let job_worker = worker.clone();
            let handle = worker.autosave_debounce.schedule(move || async move {
                let result = autosave(job_worker.services.autosave.as_ref(), &doc).await;
                let _ = event_tx.send(EngineEvent::Autosaved {
                    document: doc,
                    at: Utc::now(),
                    result,
                });
            });
            async move {
                let _ = handle.await;
            }
            .boxed()
        }
        effect => async move {
            if let Some(event) = execute(&worker.services, effect).await {
                let _ = event_tx.send(event);
            }
        }
        .boxed(),
    }
}

async fn execute(services: &Services, effect: Effect) -> Option<EngineEvent> {
    let event = match effect {
        Effect::FetchTemplates => EngineEvent::TemplatesLoaded(services.backend.templates().await),
        Effect::SchedulePreview(_) | Effect::ScheduleAutosave(_) => return None,
        Effect::RequestAiContent { project_title } => {
            EngineEvent::AiContent(services.backend.generate_ai(&project_title).await)
        }
        Effect::ImproveSection {
            section_id,
            content,
        } => {
            let improved = services.legacy.improve_section(&section_id, &content).await;
            EngineEvent::SectionImproved {
                section_id,
                improved,
            }
        }
        Effect::GenerateDiagram {
            kind,
            project_title,
        } => EngineEvent::DiagramGenerated {
            kind,
            result: services.legacy.generate_diagram(&project_title, kind).await,
        },
        Effect::UploadCode(paths) => {
            EngineEvent::CodeFilesReady(upload_code_files(services.backend.as_ref(), &paths).await)
        }
        Effect::UploadScreenshots(paths) => {
            let legacy = services.legacy.clone();
            let figures = upload_screenshots(services.backend.as_ref(), &paths, move |name| {
                legacy.upload_url(name).ok().map(|url| url.to_string())
            })
            .await;
            EngineEvent::ScreenshotsReady(figures)
        }
        Effect::CheckPlagiarism(doc) => {
            let report = match services.plagiarism.check(&doc).await {
                Ok(report) => report,
                Err(err) => {
                    bb_warn!("Plagiarism service failed: {}; using local estimate", err);
                    estimate_originality(&doc)
                }
            };
            EngineEvent::PlagiarismChecked(report)
        }
        Effect::GenerateDocument(doc) => {
            let submission = Submission::collect(&doc).await;
            EngineEvent::DocumentGenerated(services.backend.generate_document(submission).await)
        }
        Effect::Download(result) => EngineEvent::Downloaded(download(services, &result).await),
    };
    Some(event)
}

async fn autosave(target: &dyn AutosaveTarget, doc: &DocumentModel) -> Result<(), String> {
    match target.save(doc).await {
        Ok(()) => {
            bb_debug!("Autosaved \"{}\"", doc.meta.project_title);
            Ok(())
        }
        Err(err) => {
            bb_warn!("Autosave failed: {}", err);
            Err(err.to_string())
        }
    }
}

async fn download(services: &Services, result: &GenerationResult) -> Result<PathBuf, String> {
    let bytes = services
        .backend
        .download(&result.download_url)
        .await
        .map_err(|err| err.message)?;
    let name = download_file_name(&result.file_name, &result.download_url);
    let writer = AtomicFileWriter::new(services.download_dir.clone());
    let path = tokio::task::spawn_blocking(move || writer.write_bytes(&name, &bytes))
        .await
        .map_err(|err| err.to_string())?
        .map_err(|err| err.to_string())?;
    bb_info!("Saved {:?}", path);
    Ok(path)
}
