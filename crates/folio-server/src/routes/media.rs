use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use folio_core::models::media::Media;
use folio_export::pdf::RenderOptions;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct MediaRequest {
    pub template: String,
    #[serde(default)]
    pub context: Value,
    #[serde(default)]
    pub options: RenderOptions,
    pub owner: Option<Uuid>,
    pub directory: Option<Uuid>,
}

/// Render a template to PDF and register it as media.
pub async fn create_media(
    State(state): State<AppState>,
    Json(mut req): Json<MediaRequest>,
) -> Result<Json<Media>, ApiError> {
    req.options.path = None;

    let media = state
        .generator
        .generate_media_from_template(
            &req.template,
            &req.context,
            req.options,
            req.owner,
            req.directory,
        )
        .await?;
    Ok(Json(media))
}

#[derive(Deserialize)]
pub struct DirectoryRequest {
    pub name: String,
    pub owner: Option<Uuid>,
    pub parent: Option<Uuid>,
}

pub async fn create_directory(
    State(state): State<AppState>,
    Json(req): Json<DirectoryRequest>,
) -> Result<Json<Media>, ApiError> {
    let media = state
        .media
        .create_directory(&req.name, req.owner, req.parent)
        .await?;
    Ok(Json(media))
}

pub async fn get_media(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Media>, ApiError> {
    Ok(Json(state.media.get(id).await?))
}

pub async fn get_media_content(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let media = state.media.get(id).await?;
    let bytes = state.media.read(id).await?;
    Ok(([(header::CONTENT_TYPE, media.content_type)], bytes).into_response())
}
