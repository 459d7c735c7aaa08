use blackbook_core::{render_preview_html, DocumentModel, MetaField, PreviewSource};
use blackbook_engine::{render_with_fallback, ApiClient, HttpSettings, PreviewRenderer};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn document() -> DocumentModel {
    let mut doc = DocumentModel::default();
    doc.set_meta(MetaField::ProjectTitle, "Library System");
    doc.set_section_content("introduction", "Books and members.");
    doc
}

async fn server_returning(status: u16, html: &str) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/preview"))
        .respond_with(ResponseTemplate::new(status).set_body_json(json!({
            "success": status == 200,
            "data": { "html": html }
        })))
        .mount(&server)
        .await;
    server
}

fn client(server: &MockServer) -> ApiClient {
    ApiClient::new(&HttpSettings {
        base_url: server.uri(),
        ..HttpSettings::default()
    })
    .expect("client")
}

#[tokio::test]
async fn server_render_wins_when_available() {
    let server = server_returning(200, "<h1>From server</h1>").await;
    let client = client(&server);
    let renderer: &dyn PreviewRenderer = &client;

    let (html, source) = render_with_fallback(Some(renderer), &document()).await;
    assert_eq!(source, PreviewSource::Server);
    assert_eq!(html, "<h1>From server</h1>");
}

#[tokio::test]
async fn blank_server_html_falls_back_to_local() {
    let server = server_returning(200, "   ").await;
    let client = client(&server);
    let renderer: &dyn PreviewRenderer = &client;
    let doc = document();

    let (html, source) = render_with_fallback(Some(renderer), &doc).await;
    assert_eq!(source, PreviewSource::Local);
    assert_eq!(html, render_preview_html(&doc));
}

#[tokio::test]
async fn server_error_falls_back_to_local() {
    let server = server_returning(500, "<h1>ignored</h1>").await;
    let client = client(&server);
    let renderer: &dyn PreviewRenderer = &client;
    let doc = document();

    let (html, source) = render_with_fallback(Some(renderer), &doc).await;
    assert_eq!(source, PreviewSource::Local);
    assert!(html.contains("Library System"));
}

#[tokio::test]
async fn no_renderer_renders_locally() {
    let doc = document();
    let (html, source) = render_with_fallback(None, &doc).await;
    assert_eq!(source, PreviewSource::Local);
    assert_eq!(html, render_preview_html(&doc));
}
