use async_trait::async_trait;
use blackbook_core::{render_preview_html, DocumentModel, FlatForm, PreviewSource};
use blackbook_logging::{bb_debug, bb_warn};

use crate::{ApiClient, BackendError, LegacyClient};

/// Authoritative preview renderer.
#[async_trait]
pub trait PreviewRenderer: Send + Sync {
    async fn render(&self, doc: &DocumentModel) -> Result<String, BackendError>;
}

#[async_trait]
impl PreviewRenderer for ApiClient {
    async fn render(&self, doc: &DocumentModel) -> Result<String, BackendError> {
        self.render_preview(&FlatForm::from_document(doc)).await
    }
}

#[async_trait]
impl PreviewRenderer for LegacyClient {
    async fn render(&self, doc: &DocumentModel) -> Result<String, BackendError> {
        self.render_preview(doc).await
    }
}

/// Server render when available, otherwise the local compositor. A blank
/// server response also falls back.
pub async fn render_with_fallback(
    renderer: Option<&dyn PreviewRenderer>,
    doc: &DocumentModel,
) -> (String, PreviewSource) {
    if let Some(renderer) = renderer {
        match renderer.render(doc).await {
            Ok(html) if !html.trim().is_empty() => {
                bb_debug!("Server preview rendered ({} bytes)", html.len());
                return (html, PreviewSource::Server);
            }
            Ok(_) => bb_warn!("Server preview was empty; rendering locally"),
            Err(err) => bb_warn!("Server preview failed: {}; rendering locally", err),
        }
    }
    (render_preview_html(doc), PreviewSource::Local)
}
