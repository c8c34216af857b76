use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use std::sync::Arc;

use crate::presentation::http::handlers::DocumentHandler;

/// Room for multipart boundaries and headers around the file itself.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

pub fn document_routes(document_handler: Arc<DocumentHandler>) -> Router {
    let upload_limit = document_handler
        .max_upload_bytes()
        .saturating_add(MULTIPART_OVERHEAD_BYTES);

    Router::new()
        .route(
            "/pdf/upload",
            post(DocumentHandler::upload).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/pdf", get(DocumentHandler::list))
        .route(
            "/pdf/{id}",
            get(DocumentHandler::get).delete(DocumentHandler::delete),
        )
        .route("/pdf/{id}/chunks", get(DocumentHandler::chunks))
        .with_state(document_handler)
}
