//! Black Book engine: backend clients, debounced preview and autosave, local
//! persistence and effect execution.
mod api_client;
mod autosave;
mod config;
mod debounce;
mod draft_store;
mod engine;
mod envelope;
mod filename;
mod http;
mod legacy_client;
mod persist;
mod plagiarism;
mod preview;
mod submission;
mod types;
mod uploads;

pub use api_client::{ApiClient, Backend, StoredFile, UploadedCode, UploadedFiles};
pub use autosave::{AutosaveTarget, SnapshotFile, AUTOSAVE_FILE};
pub use config::{normalize_base_url, ConfigError, EngineConfig, PreviewContract, DEFAULT_API_BASE_URL};
pub use debounce::Debouncer;
pub use draft_store::{DraftError, DraftStore};
pub use engine::{EngineHandle, Services};
pub use envelope::error_message;
pub use filename::download_file_name;
pub use http::{resolve_segments, resolve_url, HttpSettings};
pub use legacy_client::{
    LegacyClient, LegacyPreviewPayload, DIAGRAM_FAILED, DIAGRAM_FETCH_FAILED, IMPROVE_SUMMARY,
    IMPROVE_UNAVAILABLE,
};
pub use persist::{AtomicFileWriter, PersistError};
pub use plagiarism::{HeuristicChecker, PlagiarismChecker};
pub use preview::{render_with_fallback, PreviewRenderer};
pub use submission::{Submission, UploadField, UploadPart, DEFAULT_REPORT_TITLE};
pub use types::{
    BackendError, EngineError, EngineEvent, FailureKind, GeneratedDiagram, ImprovedSection,
};
pub use uploads::{guess_language, upload_code_files, upload_screenshots};
