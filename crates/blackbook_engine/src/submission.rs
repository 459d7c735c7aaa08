//! Multipart payload for `POST /api/generate-document`.
use std::path::{Path, PathBuf};

use blackbook_core::{submission_references, DocumentModel, FileHandle, FlatForm};
use blackbook_logging::bb_warn;
use serde_json::json;

pub const DEFAULT_REPORT_TITLE: &str = "Plagiarism Report";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadField {
    CodeFiles,
    Screenshots,
    Diagrams,
    PlagiarismReport,
}

impl UploadField {
    pub fn as_str(self) -> &'static str {
        match self {
            UploadField::CodeFiles => "codeFiles",
            UploadField::Screenshots => "screenshots",
            UploadField::Diagrams => "diagrams",
            UploadField::PlagiarismReport => "plagiarism_report",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadPart {
    pub field: UploadField,
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl UploadPart {
    /// Read `path` into a part named after the file.
    pub async fn from_path(field: UploadField, path: &Path) -> std::io::Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        Ok(Self {
            field,
            file_name: file_name_of(path),
            bytes,
        })
    }
}

/// Text fields plus file parts, in submission order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Submission {
    pub fields: Vec<(&'static str, String)>,
    pub files: Vec<UploadPart>,
}

impl Submission {
    /// Build the submission for `doc`. File-backed entries are read from
    /// their handle, or from a local preview path when the handle did not
    /// survive a reload; unreadable files are skipped.
    pub async fn collect(doc: &DocumentModel) -> Self {
        let form = FlatForm::from_document(doc);

        let diagrams_meta: Vec<_> = doc
            .diagrams
            .iter()
            .map(|d| json!({ "name": non_blank(&d.name).unwrap_or("Diagram") }))
            .collect();
        let screenshots_meta: Vec<_> = doc
            .figures
            .iter()
            .map(|f| {
                let file_name = f.file.as_ref().map(FileHandle::file_name).unwrap_or_default();
                let name = non_blank(&f.caption)
                    .or_else(|| non_blank(&file_name))
                    .unwrap_or("Screenshot");
                json!({ "name": name.trim() })
            })
            .collect();
        let code_meta: Vec<_> = doc
            .code_files
            .iter()
            .map(|c| json!({ "name": c.filename }))
            .collect();

        let fields = vec![
            ("selectedTemplate", form.selected_template.clone()),
            ("studentDetails", to_json(&form.student_details)),
            ("documentation", to_json(&form.documentation)),
            ("diagramsMeta", to_json(&diagrams_meta)),
            ("screenshotsMeta", to_json(&screenshots_meta)),
            ("references", to_json(&submission_references(&doc.references))),
            ("codeFilesMeta", to_json(&code_meta)),
            (
                "plagiarism_report_title",
                non_blank(&doc.plagiarism_report.title)
                    .unwrap_or(DEFAULT_REPORT_TITLE)
                    .to_string(),
            ),
        ];

        let mut files = Vec::new();
        for code in &doc.code_files {
            files.push(UploadPart {
                field: UploadField::CodeFiles,
                file_name: code.filename.clone(),
                bytes: code.content_text.clone().into_bytes(),
            });
        }
        for figure in &doc.figures {
            push_local(
                &mut files,
                UploadField::Screenshots,
                figure.file.as_ref(),
                &figure.preview_url,
            )
            .await;
        }
        for diagram in &doc.diagrams {
            push_local(
                &mut files,
                UploadField::Diagrams,
                diagram.file.as_ref(),
                &diagram.preview_url,
            )
            .await;
        }
        if let Some(report) = &doc.plagiarism_report.file {
            push_local(&mut files, UploadField::PlagiarismReport, Some(report), "").await;
        }

        Self { fields, files }
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }
}

async fn push_local(
    files: &mut Vec<UploadPart>,
    field: UploadField,
    handle: Option<&FileHandle>,
    preview_url: &str,
) {
    if let Some(FileHandle {
        path,
        bytes: Some(bytes),
    }) = handle
    {
        files.push(UploadPart {
            field,
            file_name: file_name_of(path),
            bytes: bytes.clone(),
        });
        return;
    }

    let path = match handle {
        Some(handle) => handle.path.clone(),
        None if is_local_file(preview_url).await => PathBuf::from(preview_url),
        None => return,
    };
    match UploadPart::from_path(field, &path).await {
        Ok(part) => files.push(part),
        Err(err) => bb_warn!("Skipping {:?} from {}: {}", path, field.as_str(), err),
    }
}

async fn is_local_file(value: &str) -> bool {
    if value.is_empty() || value.contains("://") {
        return false;
    }
    tokio::fs::metadata(value)
        .await
        .is_ok_and(|meta| meta.is_file())
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload".to_string())
}

fn non_blank(value: &str) -> Option<&str> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "null".to_string())
}

#[cfg(test)]
mod tests {
    use blackbook_core::{Diagram, DiagramKind, Figure, MetaField, Reference};
    use serde_json::Value;

    use super::*;

    #[tokio::test]
    async fn fields_follow_the_flat_form() {
        let mut doc = DocumentModel::default();
        doc.selected_template = "proj".to_string();
        doc.set_meta(MetaField::StudentName, "Asha");
        doc.set_section_content("scope", "Campus");
        doc.references = vec![
            Reference {
                label: " Rust ".to_string(),
                url: " https://www.rust-lang.org ".to_string(),
            },
            Reference::default(),
        ];

        let submission = Submission::collect(&doc).await;
        assert_eq!(submission.field("selectedTemplate"), Some("proj"));
        assert_eq!(
            submission.field("plagiarism_report_title"),
            Some(DEFAULT_REPORT_TITLE)
        );

        let student: Value =
            serde_json::from_str(submission.field("studentDetails").unwrap()).unwrap();
        assert_eq!(student["name"], "Asha");
        let docs: Value = serde_json::from_str(submission.field("documentation").unwrap()).unwrap();
        assert_eq!(docs["doc_scope"], "Campus");
        let refs: Value = serde_json::from_str(submission.field("references").unwrap()).unwrap();
        assert_eq!(
            refs,
            serde_json::json!([{ "label": "Rust", "url": "https://www.rust-lang.org" }])
        );
    }

    #[tokio::test]
    async fn in_memory_files_become_parts() {
        let mut doc = DocumentModel::default();
        doc.upsert_diagram(Diagram::manual(
            DiagramKind::Class,
            FileHandle::with_bytes("/nowhere/class.png", vec![1, 2, 3]),
        ));
        doc.figures.push(Figure {
            preview_url: "http://127.0.0.1:5000/uploads/a.png".to_string(),
            ..Default::default()
        });

        let submission = Submission::collect(&doc).await;
        assert_eq!(submission.files.len(), 1);
        assert_eq!(submission.files[0].field, UploadField::Diagrams);
        assert_eq!(submission.files[0].file_name, "class.png");

        let meta: Value =
            serde_json::from_str(submission.field("screenshotsMeta").unwrap()).unwrap();
        assert_eq!(meta, serde_json::json!([{ "name": "Screenshot" }]));
    }

    #[tokio::test]
    async fn reloaded_figures_are_read_from_their_preview_path() {
        let temp = tempfile::TempDir::new().unwrap();
        let on_disk = temp.path().join("home.png");
        std::fs::write(&on_disk, [0x89, b'P', b'N', b'G']).unwrap();

        let mut doc = DocumentModel::default();
        for preview_url in [
            on_disk.to_string_lossy().into_owned(),
            temp.path().join("gone.png").to_string_lossy().into_owned(),
            temp.path().to_string_lossy().into_owned(),
        ] {
            doc.figures.push(Figure {
                preview_url,
                ..Default::default()
            });
        }

        let submission = Submission::collect(&doc).await;
        assert_eq!(
            submission.files,
            vec![UploadPart {
                field: UploadField::Screenshots,
                file_name: "home.png".to_string(),
                bytes: vec![0x89, b'P', b'N', b'G'],
            }]
        );
    }
}
