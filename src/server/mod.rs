//! HTTP surface: the upload form and the conversion endpoint.

mod handlers;

pub use handlers::{ErrorResponse, DOWNLOAD_FILENAME, IMAGE_FIELD};

use std::error::Error;
use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use log::info;
use tokio::net::TcpListener;

use crate::builder::LabelImporter;

/// Application state shared across routes
#[derive(Clone)]
pub struct AppState {
    pub importer: Arc<LabelImporter>,
}

/// Build the router.
///
/// `max_request_bytes` caps the whole request body; keep it above the
/// importer's image limit so oversize images reach validation.
pub fn create_router(importer: LabelImporter, max_request_bytes: usize) -> Router {
    let state = AppState {
        importer: Arc::new(importer),
    };

    Router::new()
        .route("/", get(handlers::index_handler))
        .route("/upload", post(handlers::upload_handler))
        .route("/health", get(handlers::health_handler))
        .layer(DefaultBodyLimit::max(max_request_bytes))
        .with_state(state)
}

/// Serve the router on `bind` until the process is stopped
pub async fn serve(
    bind: &str,
    importer: LabelImporter,
    max_request_bytes: usize,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let app = create_router(importer, max_request_bytes);

    let listener = TcpListener::bind(bind).await?;
    info!("Listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
