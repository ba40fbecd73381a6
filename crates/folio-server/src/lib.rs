//! folio-server
//!
//! HTTP surface over the PDF pipeline. Runs as a plain server, or inside AWS
//! Lambda when the runtime API is present.

use std::sync::Arc;

use axum::middleware as axum_mw;
use axum::routing::{get, post};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};

use folio_export::generator::PdfGenerator;
use folio_export::pdf::ChromiumRenderer;
use folio_export::render::TeraTemplates;
use folio_storage::media::{LocalMediaStore, MediaStore, S3MediaStore};
use folio_storage::objects::Bucket;

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;

use config::{MediaBackend, ServerConfig};
use state::AppState;

/// Wire templates, browser and media store from configuration.
pub async fn build_state(config: &ServerConfig) -> eyre::Result<AppState> {
    let templates = Arc::new(TeraTemplates::from_dir(&config.template_dir)?);
    let renderer = Arc::new(ChromiumRenderer::new(config.browser.clone()));

    let media: Arc<dyn MediaStore> = match &config.media {
        MediaBackend::Local { root } => {
            tracing::info!(root = %root.display(), "using local media store");
            Arc::new(LocalMediaStore::new(root.clone())?)
        }
        MediaBackend::S3 { bucket } => {
            tracing::info!(bucket = %bucket, "using s3 media store");
            let s3 = folio_storage::client::build_client().await;
            Arc::new(S3MediaStore::new(Bucket::new(s3, bucket.clone())))
        }
    };

    let generator = PdfGenerator::new(config.pdf.clone(), templates, renderer, media.clone());

    Ok(AppState {
        generator: Arc::new(generator),
        media,
    })
}

pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/pdf", post(routes::pdf::render_pdf))
        .route("/media", post(routes::media::create_media))
        .route("/media/directories", post(routes::media::create_directory))
        .route("/media/{id}", get(routes::media::get_media))
        .route("/media/{id}/content", get(routes::media::get_media_content))
        .layer(
            ServiceBuilder::new()
                .layer(axum_mw::from_fn(middleware::audit::audit_log))
                .layer(cors),
        )
        .with_state(state)
}
