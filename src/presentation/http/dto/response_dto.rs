use serde::Serialize;
use uuid::Uuid;

use crate::application::errors::AssistantError;

/// Envelope shared by every endpoint; exactly one of `data` and `error` is set.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<ApiError>,
    pub timestamp: String,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
    pub details: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

impl ApiResponse<()> {
    pub fn failure(error: &AssistantError) -> Self {
        let details = match error {
            AssistantError::RateLimited {
                retry_after_secs: Some(secs),
            } => Some(format!("Retry after {} seconds", secs)),
            AssistantError::PayloadTooLarge { limit } => {
                Some(format!("Maximum upload size is {} bytes", limit))
            }
            _ => None,
        };

        Self {
            success: false,
            data: None,
            error: Some(ApiError {
                code: error.code().to_string(),
                message: error.to_string(),
                details,
            }),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponseDto {
    pub status: String,
    pub service: String,
    pub version: String,
}

#[derive(Debug, Serialize)]
pub struct DeletedDocumentDto {
    pub id: Uuid,
    pub message: String,
}
