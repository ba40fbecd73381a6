use std::sync::Arc;

use folio_export::generator::PdfGenerator;
use folio_storage::media::MediaStore;

/// Shared application state, injected into all route handlers via Axum state.
#[derive(Clone)]
pub struct AppState {
    pub generator: Arc<PdfGenerator>,
    pub media: Arc<dyn MediaStore>,
}
