use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use axum::Router;
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;

use folio_export::error::ExportError;
use folio_export::generator::{PdfConfig, PdfGenerator};
use folio_export::pdf::{DocumentRenderer, RenderOptions};
use folio_export::render::TeraTemplates;
use folio_server::state::AppState;
use folio_storage::media::{LocalMediaStore, MediaStore};

const FAKE_PDF: &[u8] = b"%PDF-1.7\n%fake\n";

struct FakeRenderer;

#[async_trait]
impl DocumentRenderer for FakeRenderer {
    async fn render_pdf(&self, _source: &str, options: &RenderOptions) -> Result<(), ExportError> {
        tokio::fs::write(options.path.as_ref().unwrap(), FAKE_PDF)
            .await
            .unwrap();
        Ok(())
    }
}

fn test_app(dir: &Path) -> Router {
    let templates = Arc::new(
        TeraTemplates::from_raw([("invoice.tera", "<p>{{ amount }}</p>")]).unwrap(),
    );
    let media: Arc<dyn MediaStore> =
        Arc::new(LocalMediaStore::new(dir.join("media")).unwrap());
    let generator = PdfGenerator::new(
        PdfConfig {
            output_dir: dir.join("pdf"),
            tmp_dir: dir.join("tmp"),
            ..Default::default()
        },
        templates,
        Arc::new(FakeRenderer),
        media.clone(),
    );
    folio_server::app(AppState {
        generator: Arc::new(generator),
        media,
    })
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn scratch() -> TempDir {
    tempfile::tempdir().unwrap()
}

#[tokio::test]
async fn health() {
    let dir = scratch();
    let response = test_app(dir.path()).oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({ "status": "ok" }));
}

#[tokio::test]
async fn pdf_returns_bytes_and_cleans_up() {
    let dir = scratch();
    let response = test_app(dir.path())
        .oneshot(post_json(
            "/pdf",
            json!({ "template": "invoice", "context": { "amount": 10 } }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/pdf"
    );
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], FAKE_PDF);
    assert_eq!(std::fs::read_dir(dir.path().join("pdf")).unwrap().count(), 0);
}

#[tokio::test]
async fn client_cannot_choose_output_path() {
    let dir = scratch();
    let target = dir.path().join("escape.pdf");
    let response = test_app(dir.path())
        .oneshot(post_json(
            "/pdf",
            json!({
                "template": "invoice",
                "context": { "amount": 1 },
                "options": { "path": target }
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(!target.exists());
}

#[tokio::test]
async fn unknown_template_is_404() {
    let dir = scratch();
    let response = test_app(dir.path())
        .oneshot(post_json("/pdf", json!({ "template": "nope" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn bad_format_is_400() {
    let dir = scratch();
    let response = test_app(dir.path())
        .oneshot(post_json(
            "/pdf",
            json!({
                "template": "invoice",
                "context": { "amount": 1 },
                "options": { "format": "napkin" }
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(std::fs::read_dir(dir.path().join("tmp")).unwrap().count(), 0);
}

#[tokio::test]
async fn media_lifecycle() {
    let dir = scratch();
    let app = test_app(dir.path());
    let owner = uuid::Uuid::new_v4();

    let response = app
        .clone()
        .oneshot(post_json(
            "/media/directories",
            json!({ "name": "invoices", "owner": owner }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let folder = body_json(response).await;
    assert_eq!(folder["is_directory"], json!(true));

    let response = app
        .clone()
        .oneshot(post_json(
            "/media",
            json!({
                "template": "invoice",
                "context": { "amount": 10 },
                "owner": owner,
                "directory": folder["id"],
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let media = body_json(response).await;
    assert_eq!(media["parent"], folder["id"]);
    assert_eq!(media["owner"], json!(owner));
    assert_eq!(media["content_type"], "application/pdf");

    let id = media["id"].as_str().unwrap();
    let response = app
        .clone()
        .oneshot(get(&format!("/media/{id}")))
        .await
        .unwrap();
    assert_eq!(body_json(response).await, media);

    let response = app
        .oneshot(get(&format!("/media/{id}/content")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/pdf"
    );
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], FAKE_PDF);
}

#[tokio::test]
async fn media_into_missing_directory_is_400() {
    let dir = scratch();
    let response = test_app(dir.path())
        .oneshot(post_json(
            "/media",
            json!({
                "template": "invoice",
                "context": { "amount": 1 },
                "directory": uuid::Uuid::new_v4(),
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_media_is_404() {
    let dir = scratch();
    let response = test_app(dir.path())
        .oneshot(get(&format!("/media/{}", uuid::Uuid::new_v4())))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
