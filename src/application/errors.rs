use thiserror::Error;
use uuid::Uuid;

use crate::application::ports::chat_model::ChatModelError;
use crate::application::ports::document_extractor::DocumentExtractionError;
use crate::application::ports::embedding_provider::EmbeddingProviderError;
use crate::domain::repositories::RepositoryError;
use crate::domain::value_objects::PayloadError;

/// Every failure the assistant reports to callers.
#[derive(Debug, Error)]
pub enum AssistantError {
    #[error("Only PDF files are allowed: {0}")]
    UnsupportedFileType(String),
    #[error("File exceeds the upload limit of {limit} bytes")]
    PayloadTooLarge { limit: usize },
    #[error("Failed to process PDF document: {0}")]
    ParseError(String),
    #[error("Stored PDF data is corrupt: {0}")]
    DecodeError(String),
    #[error("Embedding service error: {0}")]
    EmbeddingServiceError(String),
    #[error("The language model is rate limited, please try again later")]
    RateLimited { retry_after_secs: Option<u64> },
    #[error("Answer generation failed: {0}")]
    GenerationError(String),
    #[error("Document not found: {0}")]
    NotFound(Uuid),
    #[error("User ID is required")]
    Unauthorized,
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("Persistence error: {0}")]
    PersistenceError(String),
}

impl AssistantError {
    pub fn code(&self) -> &'static str {
        match self {
            AssistantError::UnsupportedFileType(_) => "UNSUPPORTED_FILE_TYPE",
            AssistantError::PayloadTooLarge { .. } => "PAYLOAD_TOO_LARGE",
            AssistantError::ParseError(_) => "PARSE_ERROR",
            AssistantError::DecodeError(_) => "DECODE_ERROR",
            AssistantError::EmbeddingServiceError(_) => "EMBEDDING_SERVICE_ERROR",
            AssistantError::RateLimited { .. } => "RATE_LIMITED",
            AssistantError::GenerationError(_) => "GENERATION_ERROR",
            AssistantError::NotFound(_) => "NOT_FOUND",
            AssistantError::Unauthorized => "UNAUTHORIZED",
            AssistantError::ValidationError(_) => "VALIDATION_ERROR",
            AssistantError::PersistenceError(_) => "PERSISTENCE_ERROR",
        }
    }
}

impl From<RepositoryError> for AssistantError {
    fn from(error: RepositoryError) -> Self {
        match error {
            RepositoryError::NotFound(id) => AssistantError::NotFound(id),
            _ => AssistantError::PersistenceError(error.to_string()),
        }
    }
}

impl From<PayloadError> for AssistantError {
    fn from(error: PayloadError) -> Self {
        AssistantError::DecodeError(error.to_string())
    }
}

impl From<DocumentExtractionError> for AssistantError {
    fn from(error: DocumentExtractionError) -> Self {
        AssistantError::ParseError(error.to_string())
    }
}

impl From<EmbeddingProviderError> for AssistantError {
    fn from(error: EmbeddingProviderError) -> Self {
        AssistantError::EmbeddingServiceError(error.to_string())
    }
}

impl From<ChatModelError> for AssistantError {
    fn from(error: ChatModelError) -> Self {
        match error {
            ChatModelError::RateLimited { retry_after_secs } => {
                AssistantError::RateLimited { retry_after_secs }
            }
            _ => AssistantError::GenerationError(error.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_not_found_keeps_kind() {
        let id = Uuid::new_v4();
        let error = AssistantError::from(RepositoryError::NotFound(id));
        assert!(matches!(error, AssistantError::NotFound(found) if found == id));
    }

    #[test]
    fn test_chat_rate_limit_keeps_hint() {
        let error = AssistantError::from(ChatModelError::RateLimited {
            retry_after_secs: Some(12),
        });
        assert_eq!(error.code(), "RATE_LIMITED");
        assert!(matches!(
            error,
            AssistantError::RateLimited {
                retry_after_secs: Some(12)
            }
        ));
    }

    #[test]
    fn test_other_chat_failures_are_generation_errors() {
        let error = AssistantError::from(ChatModelError::EmptyResponse);
        assert_eq!(error.code(), "GENERATION_ERROR");
    }

    #[test]
    fn test_payload_errors_are_decode_errors() {
        let error = AssistantError::from(PayloadError::InvalidFormat);
        assert_eq!(error.code(), "DECODE_ERROR");
    }
}
