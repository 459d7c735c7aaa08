//! Client for the bare-JSON routes: `/preview`, `/generate_diagrams`,
//! `/generate_project_content` and `/uploads/{filename}`.
use blackbook_core::{DiagramKind, DocumentModel};
use blackbook_logging::{bb_info, bb_warn};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use url::Url;

use crate::http::{build_client, map_reqwest_error, resolve_segments, resolve_url, HttpSettings};
use crate::{BackendError, FailureKind, GeneratedDiagram, ImprovedSection};

pub const LEGACY_TEMPLATE_FILE: &str = "proj.docx";
pub const DIAGRAM_FAILED: &str = "Diagram generation failed.";
pub const DIAGRAM_FETCH_FAILED: &str = "Generated image could not be fetched.";
pub const IMPROVE_SUMMARY: &str = "Generated from AI service.";
pub const IMPROVE_UNAVAILABLE: &str = "AI service unavailable. Returned original content.";

/// Keys checked, in order, for a rewritten section.
const IMPROVE_CANDIDATES: [&str; 4] = ["doc_introduction", "doc_objective", "doc_scope", "doc_techstack"];

/// Flat payload for `POST /preview`, with placeholders for blank metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LegacyPreviewPayload {
    pub template_file: String,
    pub student_name: String,
    pub project_title: String,
    pub professor_name: String,
    pub guide_name: String,
    pub year: String,
    pub doc_introduction: String,
    pub doc_objective: String,
    pub doc_scope: String,
    pub doc_techstack: String,
    pub doc_modules: String,
}

impl LegacyPreviewPayload {
    pub fn from_document(doc: &DocumentModel) -> Self {
        let meta = &doc.meta;
        let section = |id: &str| {
            doc.section(id)
                .map(|s| s.content.clone())
                .unwrap_or_default()
        };
        Self {
            template_file: LEGACY_TEMPLATE_FILE.to_string(),
            student_name: or_placeholder(&meta.student_name, "Student"),
            project_title: or_placeholder(&meta.project_title, "Untitled Project"),
            professor_name: or_placeholder(&meta.professor_name, "Professor"),
            guide_name: or_placeholder(&meta.guide_name, "Guide"),
            year: or_placeholder(&meta.year, "2025-2026"),
            doc_introduction: section("introduction"),
            doc_objective: section("objective"),
            doc_scope: section("scope"),
            doc_techstack: section("techStack"),
            doc_modules: section("modules"),
        }
    }
}

fn or_placeholder(value: &str, placeholder: &str) -> String {
    if value.is_empty() {
        placeholder.to_string()
    } else {
        value.to_string()
    }
}

#[derive(Deserialize)]
struct HtmlBody {
    #[serde(default)]
    html: String,
}

#[derive(Deserialize)]
struct DiagramBody {
    #[serde(default)]
    status: String,
    #[serde(default)]
    filename: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Clone)]
pub struct LegacyClient {
    client: reqwest::Client,
    base_url: String,
}

impl LegacyClient {
    pub fn new(settings: &HttpSettings) -> Result<Self, BackendError> {
        Ok(Self {
            client: build_client(settings)?,
            base_url: settings.base_url.clone(),
        })
    }

    /// Public url of an uploaded file.
    pub fn upload_url(&self, filename: &str) -> Result<Url, BackendError> {
        resolve_segments(&self.base_url, &["uploads", filename])
    }

    pub async fn render_preview(&self, doc: &DocumentModel) -> Result<String, BackendError> {
        let response = self
            .client
            .post(resolve_url(&self.base_url, "/preview")?)
            .json(&LegacyPreviewPayload::from_document(doc))
            .send()
            .await
            .map_err(|err| map_reqwest_error(err, "Failed to render preview"))?;
        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }
        let body: HtmlBody = response
            .json()
            .await
            .map_err(|err| BackendError::new(FailureKind::Decode, err.to_string()))?;
        Ok(body.html)
    }

    /// Ask the generator for `kind`, then fetch the rendered image.
    pub async fn generate_diagram(
        &self,
        project_title: &str,
        kind: DiagramKind,
    ) -> Result<GeneratedDiagram, BackendError> {
        let response = self
            .client
            .post(resolve_url(&self.base_url, "/generate_diagrams")?)
            .json(&serde_json::json!({
                "project_title": project_title,
                "diagram_type": kind.display_name(),
            }))
            .send()
            .await
            .map_err(|err| map_reqwest_error(err, DIAGRAM_FAILED))?;

        let status = response.status();
        let body: Option<DiagramBody> = response.json().await.ok();
        let (ok, filename, error) = match body {
            Some(body) => (body.status == "success", body.filename, body.error),
            None => (false, None, None),
        };
        let filename = match filename.filter(|name| !name.is_empty()) {
            Some(name) if ok && status.is_success() => name,
            _ => {
                let message = error.unwrap_or_else(|| DIAGRAM_FAILED.to_string());
                let kind = if status.is_success() {
                    FailureKind::Rejected
                } else {
                    FailureKind::HttpStatus(status.as_u16())
                };
                return Err(BackendError::new(kind, message));
            }
        };

        let url = self.upload_url(&filename)?;
        let image = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|err| map_reqwest_error(err, DIAGRAM_FETCH_FAILED))?;
        if !image.status().is_success() {
            return Err(BackendError::new(
                FailureKind::HttpStatus(image.status().as_u16()),
                DIAGRAM_FETCH_FAILED,
            ));
        }
        let bytes = image
            .bytes()
            .await
            .map_err(|err| map_reqwest_error(err, DIAGRAM_FETCH_FAILED))?;
        bb_info!("Generated {} diagram as {}", kind, filename);

        Ok(GeneratedDiagram {
            filename,
            preview_url: url.to_string(),
            bytes: bytes.to_vec(),
        })
    }

    /// Rewrite a section through `/generate_project_content`. Any failure
    /// keeps `content` unchanged.
    pub async fn improve_section(&self, section_key: &str, content: &str) -> ImprovedSection {
        match self.project_content(section_key).await {
            Ok(fields) => {
                let text = IMPROVE_CANDIDATES
                    .iter()
                    .filter_map(|key| fields.get(*key).and_then(Value::as_str))
                    .find(|text| !text.is_empty())
                    .unwrap_or(content)
                    .to_string();
                ImprovedSection {
                    text,
                    summary: IMPROVE_SUMMARY.to_string(),
                }
            }
            Err(err) => {
                bb_warn!("Improve {} failed: {}", section_key, err);
                ImprovedSection {
                    text: content.to_string(),
                    summary: IMPROVE_UNAVAILABLE.to_string(),
                }
            }
        }
    }

    async fn project_content(&self, section_key: &str) -> Result<Map<String, Value>, BackendError> {
        let title = if section_key.is_empty() {
            "Project Section"
        } else {
            section_key
        };
        let response = self
            .client
            .post(resolve_url(&self.base_url, "/generate_project_content")?)
            .json(&serde_json::json!({ "project_title": title }))
            .send()
            .await
            .map_err(|err| map_reqwest_error(err, IMPROVE_UNAVAILABLE))?;
        if !response.status().is_success() {
            return Err(BackendError::new(
                FailureKind::HttpStatus(response.status().as_u16()),
                IMPROVE_UNAVAILABLE,
            ));
        }
        response
            .json()
            .await
            .map_err(|err| BackendError::new(FailureKind::Decode, err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use blackbook_core::MetaField;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn blank_meta_gets_placeholders() {
        let mut doc = DocumentModel::default();
        doc.set_meta(MetaField::GuideName, "Prof. Iyer");
        doc.set_section_content("techStack", "Rust");

        let payload = LegacyPreviewPayload::from_document(&doc);
        assert_eq!(payload.template_file, "proj.docx");
        assert_eq!(payload.student_name, "Student");
        assert_eq!(payload.project_title, "Untitled Project");
        assert_eq!(payload.professor_name, "Professor");
        assert_eq!(payload.guide_name, "Prof. Iyer");
        assert_eq!(payload.year, "2025-2026");
        assert_eq!(payload.doc_techstack, "Rust");
        assert_eq!(payload.doc_modules, "");
    }
}
