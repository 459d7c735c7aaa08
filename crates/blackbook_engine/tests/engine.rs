use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use blackbook_core::{
    DocumentModel, Effect, GenerationResult, MetaField, PreviewSource,
};
use blackbook_engine::{
    ApiClient, EngineEvent, EngineHandle, HeuristicChecker, HttpSettings, LegacyClient,
    PreviewRenderer, Services, SnapshotFile,
};
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const WAIT: Duration = Duration::from_secs(10);

fn engine(server: &MockServer, dir: &Path) -> EngineHandle {
    engine_with(server, dir, false)
}

fn engine_with(server: &MockServer, dir: &Path, server_preview: bool) -> EngineHandle {
    let settings = HttpSettings {
        base_url: server.uri(),
        ..HttpSettings::default()
    };
    let api = Arc::new(ApiClient::new(&settings).expect("api client"));
    let preview: Option<Arc<dyn PreviewRenderer>> = if server_preview {
        Some(api.clone())
    } else {
        None
    };
    let services = Services {
        backend: api,
        legacy: Arc::new(LegacyClient::new(&settings).expect("legacy client")),
        preview,
        plagiarism: Arc::new(HeuristicChecker),
        autosave: Arc::new(SnapshotFile::new(dir)),
        download_dir: dir.to_path_buf(),
    };
    EngineHandle::with_services(services, Duration::from_millis(30), Duration::from_millis(30))
        .expect("engine")
}

/// Collect events until the engine has nothing in flight.
fn drain(engine: &EngineHandle) -> Vec<EngineEvent> {
    let deadline = Instant::now() + WAIT;
    let mut events = Vec::new();
    while Instant::now() < deadline {
        if let Some(event) = engine.recv_timeout(Duration::from_millis(20)) {
            events.push(event);
            continue;
        }
        if engine.is_idle() {
            while let Some(event) = engine.try_recv() {
                events.push(event);
            }
            break;
        }
    }
    events
}

fn titled(title: &str) -> DocumentModel {
    let mut doc = DocumentModel::default();
    doc.set_meta(MetaField::ProjectTitle, title);
    doc
}

#[tokio::test(flavor = "multi_thread")]
async fn fetch_templates_reports_the_list() {
    blackbook_logging::initialize_for_tests();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/templates"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": { "templates": [{ "id": "proj", "name": "Project" }] }
        })))
        .mount(&server)
        .await;
    let temp = TempDir::new().unwrap();
    let engine = engine(&server, temp.path());

    engine.dispatch(Effect::FetchTemplates);
    let events = drain(&engine);
    assert_eq!(events.len(), 1);
    match &events[0] {
        EngineEvent::TemplatesLoaded(Ok(templates)) => {
            assert_eq!(templates.len(), 1);
            assert_eq!(templates[0].id, "proj");
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn rapid_previews_render_once_with_the_latest_document() {
    let server = MockServer::start().await;
    let temp = TempDir::new().unwrap();
    let engine = engine(&server, temp.path());

    for title in ["L", "Li", "Library"] {
        engine.dispatch(Effect::SchedulePreview(Box::new(titled(title))));
    }
    let events = drain(&engine);
    let previews: Vec<_> = events
        .iter()
        .filter_map(|event| match event {
            EngineEvent::PreviewRendered { html, source } => Some((html, *source)),
            _ => None,
        })
        .collect();
    assert_eq!(previews.len(), 1);
    assert_eq!(previews[0].1, PreviewSource::Local);
    assert!(previews[0].0.contains("Library"));
}

#[tokio::test(flavor = "multi_thread")]
async fn rapid_edits_reach_the_preview_endpoint_once() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/preview"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": { "html": "<p>Server</p>" }
        })))
        .expect(1)
        .mount(&server)
        .await;
    let temp = TempDir::new().unwrap();
    let engine = engine_with(&server, temp.path(), true);

    for scope in ["C", "Ca", "Cam", "Campus", "Campus wide"] {
        let mut doc = titled("Library");
        doc.set_section_content("scope", scope);
        engine.dispatch(Effect::SchedulePreview(Box::new(doc)));
    }
    let events = drain(&engine);
    let previews: Vec<_> = events
        .iter()
        .filter_map(|event| match event {
            EngineEvent::PreviewRendered { html, source } => Some((html.as_str(), *source)),
            _ => None,
        })
        .collect();
    assert_eq!(previews, vec![("<p>Server</p>", PreviewSource::Server)]);

    let requests = server.received_requests().await.expect("recorded requests");
    assert_eq!(requests.len(), 1);
    let body = String::from_utf8_lossy(&requests[0].body);
    assert!(body.contains("\"doc_scope\":\"Campus wide\""), "{body}");
    server.verify().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn autosave_writes_the_snapshot_and_reports_the_document() {
    let server = MockServer::start().await;
    let temp = TempDir::new().unwrap();
    let engine = engine(&server, temp.path());

    engine.dispatch(Effect::ScheduleAutosave(Box::new(titled("Draft one"))));
    engine.dispatch(Effect::ScheduleAutosave(Box::new(titled("Draft two"))));
    let events = drain(&engine);

    let saved: Vec<_> = events
        .into_iter()
        .filter_map(|event| match event {
            EngineEvent::Autosaved {
                document, result, ..
            } => Some((document, result)),
            _ => None,
        })
        .collect();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].0.meta.project_title, "Draft two");
    assert_eq!(saved[0].1, Ok(()));

    let snapshot = fs::read_to_string(temp.path().join("blackbook-autosave.json")).unwrap();
    assert!(snapshot.contains("Draft two"));
}

#[tokio::test(flavor = "multi_thread")]
async fn plagiarism_check_uses_the_heuristic() {
    let server = MockServer::start().await;
    let temp = TempDir::new().unwrap();
    let engine = engine(&server, temp.path());

    let mut doc = titled("Library");
    doc.set_section_content("scope", "abcdefghi ".repeat(20).trim());
    engine.dispatch(Effect::CheckPlagiarism(Box::new(doc)));

    let events = drain(&engine);
    match events.as_slice() {
        [EngineEvent::PlagiarismChecked(report)] => {
            assert_eq!(report.originality_percentage, 98);
            assert_eq!(report.flagged_sections.len(), 1);
            assert_eq!(report.flagged_sections[0].section_id, "scope");
        }
        other => panic!("unexpected events {other:?}"),
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn download_saves_the_document_locally() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/download/Library_blackbook.docx"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"docx-bytes".to_vec()))
        .mount(&server)
        .await;
    let temp = TempDir::new().unwrap();
    let engine = engine(&server, temp.path());

    engine.dispatch(Effect::Download(GenerationResult {
        download_url: "/api/download/Library_blackbook.docx".to_string(),
        file_name: "Library_blackbook.docx".to_string(),
    }));

    let events = drain(&engine);
    match events.as_slice() {
        [EngineEvent::Downloaded(Ok(path))] => {
            assert_eq!(path, &temp.path().join("Library_blackbook.docx"));
            assert_eq!(fs::read(path).unwrap(), b"docx-bytes");
        }
        other => panic!("unexpected events {other:?}"),
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn failed_generation_carries_the_backend_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate-document"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "success": false,
            "message": "Invalid template selected"
        })))
        .mount(&server)
        .await;
    let temp = TempDir::new().unwrap();
    let engine = engine(&server, temp.path());

    engine.dispatch(Effect::GenerateDocument(Box::new(titled("Library"))));
    let events = drain(&engine);
    match events.as_slice() {
        [EngineEvent::DocumentGenerated(Err(err))] => {
            assert_eq!(err.message, "Invalid template selected");
        }
        other => panic!("unexpected events {other:?}"),
    }
}
