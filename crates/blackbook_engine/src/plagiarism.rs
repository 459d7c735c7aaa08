use async_trait::async_trait;
use blackbook_core::{estimate_originality, DocumentModel, PlagiarismReport};

use crate::BackendError;

/// Originality check. A remote service can stand in for the local heuristic
/// as long as it returns the same report.
#[async_trait]
pub trait PlagiarismChecker: Send + Sync {
    async fn check(&self, doc: &DocumentModel) -> Result<PlagiarismReport, BackendError>;
}

/// Word-frequency estimate computed in process.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicChecker;

#[async_trait]
impl PlagiarismChecker for HeuristicChecker {
    async fn check(&self, doc: &DocumentModel) -> Result<PlagiarismReport, BackendError> {
        Ok(estimate_originality(doc))
    }
}
