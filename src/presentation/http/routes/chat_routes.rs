use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use crate::presentation::http::handlers::ChatHandler;

pub fn chat_routes(chat_handler: Arc<ChatHandler>) -> Router {
    Router::new()
        .route("/pdf/{id}/chat", post(ChatHandler::ask))
        .route("/pdf/{id}/history", get(ChatHandler::history))
        .with_state(chat_handler)
}
