//! Client for the enveloped `/api` backend contract.
use std::collections::BTreeMap;

use async_trait::async_trait;
use blackbook_core::{FlatForm, GenerationResult, TemplateInfo};
use blackbook_logging::{bb_debug, bb_info, bb_warn};
use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use serde_json::Value;
use url::Url;

use crate::envelope::{error_message, read_envelope};
use crate::http::{build_client, map_reqwest_error, resolve_url, HttpSettings};
use crate::submission::{Submission, UploadPart};
use crate::{BackendError, FailureKind};

pub const TEMPLATES_FAILED: &str = "Failed to fetch templates";
pub const PREVIEW_FAILED: &str = "Failed to render preview";
pub const AI_FAILED: &str = "AI generation failed";
pub const UPLOAD_FAILED: &str = "File upload failed";
pub const GENERATION_FAILED: &str = "Document generation failed";
pub const DOWNLOAD_FAILED: &str = "Download failed";

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct UploadedCode {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub filename: String,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub content: String,
}

/// A file the backend stored under its uploads directory.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StoredFile {
    #[serde(default)]
    pub original_name: String,
    pub filename: String,
    #[serde(default)]
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedFiles {
    #[serde(default)]
    pub code_files: Vec<UploadedCode>,
    #[serde(default)]
    pub screenshots: Vec<StoredFile>,
    #[serde(default)]
    pub diagrams: Vec<StoredFile>,
}

#[async_trait]
pub trait Backend: Send + Sync {
    async fn templates(&self) -> Result<Vec<TemplateInfo>, BackendError>;

    async fn generate_ai(&self, project_title: &str)
        -> Result<BTreeMap<String, String>, BackendError>;

    async fn upload_files(&self, parts: Vec<UploadPart>) -> Result<UploadedFiles, BackendError>;

    async fn generate_document(
        &self,
        submission: Submission,
    ) -> Result<GenerationResult, BackendError>;

    async fn download(&self, download_url: &str) -> Result<Bytes, BackendError>;
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Deserialize)]
struct TemplatesData {
    #[serde(default)]
    templates: Vec<TemplateInfo>,
}

#[derive(Deserialize)]
struct PreviewData {
    #[serde(default)]
    html: String,
}

#[derive(Deserialize)]
struct AiData {
    #[serde(default)]
    documentation: BTreeMap<String, Value>,
}

impl ApiClient {
    pub fn new(settings: &HttpSettings) -> Result<Self, BackendError> {
        Ok(Self {
            client: build_client(settings)?,
            base_url: settings.base_url.clone(),
        })
    }

    fn api_url(&self, path: &str) -> Result<Url, BackendError> {
        resolve_url(&format!("{}/api", self.base_url), path)
    }

    /// Download links come back as `/api/download/...`; the `/api` prefix is
    /// tolerated and not doubled.
    pub fn download_url(&self, raw: &str) -> Result<Url, BackendError> {
        let path = raw
            .strip_prefix("/api")
            .filter(|rest| rest.starts_with('/'))
            .unwrap_or(raw);
        self.api_url(path)
    }

    /// Server-rendered preview of the flat form.
    pub async fn render_preview(&self, form: &FlatForm) -> Result<String, BackendError> {
        let response = self
            .client
            .post(self.api_url("/preview")?)
            .json(form)
            .send()
            .await
            .map_err(|err| map_reqwest_error(err, PREVIEW_FAILED))?;
        let data: PreviewData = read_envelope(response, PREVIEW_FAILED).await?;
        Ok(data.html)
    }
}

#[async_trait]
impl Backend for ApiClient {
    async fn templates(&self) -> Result<Vec<TemplateInfo>, BackendError> {
        let response = self
            .client
            .get(self.api_url("/templates")?)
            .send()
            .await
            .map_err(|err| map_reqwest_error(err, TEMPLATES_FAILED))?;
        let data: TemplatesData = read_envelope(response, TEMPLATES_FAILED).await?;
        bb_info!("Loaded {} templates", data.templates.len());
        Ok(data.templates)
    }

    async fn generate_ai(
        &self,
        project_title: &str,
    ) -> Result<BTreeMap<String, String>, BackendError> {
        let response = self
            .client
            .post(self.api_url("/generate-ai")?)
            .json(&serde_json::json!({ "project_title": project_title }))
            .send()
            .await
            .map_err(|err| map_reqwest_error(err, AI_FAILED))?;
        let data: AiData = read_envelope(response, AI_FAILED).await?;
        Ok(data
            .documentation
            .into_iter()
            .filter_map(|(key, value)| match value {
                Value::String(text) => Some((key, text)),
                Value::Null => None,
                other => Some((key, other.to_string())),
            })
            .collect())
    }

    async fn upload_files(&self, parts: Vec<UploadPart>) -> Result<UploadedFiles, BackendError> {
        let mut form = Form::new();
        for part in parts {
            bb_debug!("Uploading {} as {}", part.file_name, part.field.as_str());
            form = form.part(
                part.field.as_str(),
                Part::bytes(part.bytes).file_name(part.file_name),
            );
        }
        let response = self
            .client
            .post(self.api_url("/upload-files")?)
            .multipart(form)
            .send()
            .await
            .map_err(|err| map_reqwest_error(err, UPLOAD_FAILED))?;
        read_envelope(response, UPLOAD_FAILED).await
    }

    async fn generate_document(
        &self,
        submission: Submission,
    ) -> Result<GenerationResult, BackendError> {
        let mut form = Form::new();
        for (name, value) in submission.fields {
            form = form.text(name, value);
        }
        for part in submission.files {
            form = form.part(
                part.field.as_str(),
                Part::bytes(part.bytes).file_name(part.file_name),
            );
        }
        let response = self
            .client
            .post(self.api_url("/generate-document")?)
            .multipart(form)
            .send()
            .await
            .map_err(|err| map_reqwest_error(err, GENERATION_FAILED))?;
        let result: GenerationResult = read_envelope(response, GENERATION_FAILED).await?;
        bb_info!("Document generated: {}", result.file_name);
        Ok(result)
    }

    async fn download(&self, download_url: &str) -> Result<Bytes, BackendError> {
        if download_url.trim().is_empty() {
            return Err(BackendError::new(FailureKind::InvalidUrl, "Download URL missing."));
        }
        let url = self.download_url(download_url)?;
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|err| map_reqwest_error(err, DOWNLOAD_FAILED))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.bytes().await.unwrap_or_default();
            let payload: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
            bb_warn!("Download of {} failed with {}", url, status);
            return Err(BackendError::new(
                FailureKind::HttpStatus(status.as_u16()),
                error_message(&payload, DOWNLOAD_FAILED),
            ));
        }
        response
            .bytes()
            .await
            .map_err(|err| map_reqwest_error(err, DOWNLOAD_FAILED))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> ApiClient {
        ApiClient::new(&HttpSettings {
            base_url: "http://127.0.0.1:5000".to_string(),
            ..HttpSettings::default()
        })
        .unwrap()
    }

    #[test]
    fn api_prefix_on_download_url_is_not_doubled() {
        let client = client();
        assert_eq!(
            client.download_url("/api/download/report.docx").unwrap().as_str(),
            "http://127.0.0.1:5000/api/download/report.docx"
        );
        assert_eq!(
            client.download_url("/download/report.docx").unwrap().as_str(),
            "http://127.0.0.1:5000/api/download/report.docx"
        );
    }

    #[test]
    fn absolute_download_url_is_kept() {
        assert_eq!(
            client()
                .download_url("https://files.example.org/r.pdf")
                .unwrap()
                .as_str(),
            "https://files.example.org/r.pdf"
        );
    }
}
