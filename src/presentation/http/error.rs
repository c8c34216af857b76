use axum::{
    Json,
    http::{HeaderValue, StatusCode, header::RETRY_AFTER},
    response::{IntoResponse, Response},
};
use tracing::{error, warn};

use crate::application::errors::AssistantError;
use crate::presentation::http::dto::ApiResponse;

impl AssistantError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AssistantError::UnsupportedFileType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            AssistantError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            AssistantError::ParseError(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AssistantError::DecodeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AssistantError::EmbeddingServiceError(_) => StatusCode::BAD_GATEWAY,
            AssistantError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            AssistantError::GenerationError(_) => StatusCode::BAD_GATEWAY,
            AssistantError::NotFound(_) => StatusCode::NOT_FOUND,
            AssistantError::Unauthorized => StatusCode::UNAUTHORIZED,
            AssistantError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AssistantError::PersistenceError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AssistantError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!("Request failed with {}: {}", self.code(), self);
        } else {
            warn!("Request rejected with {}: {}", self.code(), self);
        }

        let retry_after = match &self {
            AssistantError::RateLimited {
                retry_after_secs: Some(secs),
            } => HeaderValue::from_str(&secs.to_string()).ok(),
            _ => None,
        };

        let body = ApiResponse::failure(&self);
        let mut response = (status, Json(body)).into_response();
        if let Some(value) = retry_after {
            response.headers_mut().insert(RETRY_AFTER, value);
        }
        response
    }
}
