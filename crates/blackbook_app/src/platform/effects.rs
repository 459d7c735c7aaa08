use std::path::PathBuf;

use blackbook_core::{FileHandle, Msg};
use blackbook_engine::EngineEvent;
use blackbook_logging::bb_warn;

/// Translate an engine result into the message the core expects.
pub(crate) fn event_to_msg(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::TemplatesLoaded(Ok(templates)) => Msg::TemplatesLoaded(templates),
        EngineEvent::TemplatesLoaded(Err(err)) => {
            bb_warn!("Template list unavailable: {}", err);
            Msg::TemplatesFailed(err.message)
        }
        EngineEvent::PreviewRendered { html, source } => Msg::PreviewRendered { html, source },
        EngineEvent::Autosaved {
            document,
            at,
            result: Ok(()),
        } => Msg::AutosaveSucceeded { document, at },
        EngineEvent::Autosaved {
            result: Err(message),
            ..
        } => Msg::AutosaveFailed(message),
        EngineEvent::AiContent(Ok(documentation)) => Msg::AiContentReceived(documentation),
        EngineEvent::AiContent(Err(err)) => Msg::AiFailed(err.message),
        EngineEvent::SectionImproved {
            section_id,
            improved,
        } => Msg::SectionImproved {
            id: section_id,
            text: improved.text,
            summary: improved.summary,
        },
        EngineEvent::DiagramGenerated {
            kind,
            result: Ok(diagram),
        } => {
            let file = if diagram.bytes.is_empty() {
                None
            } else {
                Some(FileHandle::with_bytes(
                    PathBuf::from(&diagram.filename),
                    diagram.bytes,
                ))
            };
            Msg::DiagramGenerated {
                kind,
                filename: diagram.filename,
                preview_url: diagram.preview_url,
                file,
            }
        }
        EngineEvent::DiagramGenerated {
            kind,
            result: Err(err),
        } => Msg::DiagramGenerationFailed {
            kind,
            message: err.message,
        },
        EngineEvent::CodeFilesReady(files) => Msg::CodeFilesReceived(files),
        EngineEvent::ScreenshotsReady(figures) => Msg::ScreenshotsReceived(figures),
        EngineEvent::PlagiarismChecked(report) => Msg::PlagiarismChecked(report),
        EngineEvent::DocumentGenerated(Ok(result)) => Msg::DocumentGenerated(result),
        EngineEvent::DocumentGenerated(Err(err)) => {
            bb_warn!("Generation failed: {}", err);
            Msg::GenerationFailed(err.message)
        }
        EngineEvent::Downloaded(Ok(path)) => Msg::DownloadCompleted(path),
        EngineEvent::Downloaded(Err(message)) => Msg::DownloadFailed(message),
    }
}

#[cfg(test)]
mod tests {
    use blackbook_core::{DiagramKind, DocumentModel};
    use blackbook_engine::{BackendError, FailureKind, GeneratedDiagram, ImprovedSection};
    use chrono::Utc;
    use pretty_assertions::assert_eq;

    use super::*;

    fn backend_error(message: &str) -> BackendError {
        BackendError {
            kind: FailureKind::Rejected,
            message: message.to_string(),
        }
    }

    #[test]
    fn failures_carry_the_backend_message() {
        assert_eq!(
            event_to_msg(EngineEvent::DocumentGenerated(Err(backend_error(
                "Invalid template selected"
            )))),
            Msg::GenerationFailed("Invalid template selected".to_string())
        );
        assert_eq!(
            event_to_msg(EngineEvent::TemplatesLoaded(Err(backend_error("offline")))),
            Msg::TemplatesFailed("offline".to_string())
        );
    }

    #[test]
    fn autosave_outcome_is_split() {
        let at = Utc::now();
        let document = Box::new(DocumentModel::default());
        assert_eq!(
            event_to_msg(EngineEvent::Autosaved {
                document: document.clone(),
                at,
                result: Ok(()),
            }),
            Msg::AutosaveSucceeded { document: document.clone(), at }
        );
        assert_eq!(
            event_to_msg(EngineEvent::Autosaved {
                document,
                at,
                result: Err("disk full".to_string()),
            }),
            Msg::AutosaveFailed("disk full".to_string())
        );
    }

    #[test]
    fn generated_diagram_keeps_its_image() {
        let msg = event_to_msg(EngineEvent::DiagramGenerated {
            kind: DiagramKind::Class,
            result: Ok(GeneratedDiagram {
                filename: "class_1.png".to_string(),
                preview_url: "http://127.0.0.1:5000/uploads/class_1.png".to_string(),
                bytes: vec![1, 2],
            }),
        });
        assert_eq!(
            msg,
            Msg::DiagramGenerated {
                kind: DiagramKind::Class,
                filename: "class_1.png".to_string(),
                preview_url: "http://127.0.0.1:5000/uploads/class_1.png".to_string(),
                file: Some(FileHandle::with_bytes("class_1.png", vec![1, 2])),
            }
        );
    }

    #[test]
    fn improved_section_maps_fields() {
        assert_eq!(
            event_to_msg(EngineEvent::SectionImproved {
                section_id: "scope".to_string(),
                improved: ImprovedSection {
                    text: "Better".to_string(),
                    summary: "Generated from AI service.".to_string(),
                },
            }),
            Msg::SectionImproved {
                id: "scope".to_string(),
                text: "Better".to_string(),
                summary: "Generated from AI service.".to_string(),
            }
        );
    }
}
