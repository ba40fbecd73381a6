use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::Value;

use folio_export::pdf::RenderOptions;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct PdfRequest {
    pub template: String,
    #[serde(default)]
    pub context: Value,
    #[serde(default)]
    pub options: RenderOptions,
}

/// Render a template to PDF and return the bytes.
///
/// The generated file is deleted once it has been read.
pub async fn render_pdf(
    State(state): State<AppState>,
    Json(mut req): Json<PdfRequest>,
) -> Result<Response, ApiError> {
    // Output location is the server's decision, never the client's.
    req.options.path = None;

    let path = state
        .generator
        .generate_from_template(&req.template, &req.context, req.options)
        .await?;

    let bytes = tokio::fs::read(&path).await;
    if let Err(e) = tokio::fs::remove_file(&path).await {
        tracing::warn!(path = %path.display(), error = %e, "failed to remove served pdf");
    }
    let bytes = bytes?;

    Ok(([(header::CONTENT_TYPE, "application/pdf")], bytes).into_response())
}
