use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum ChatModelError {
    #[error("Rate limit exceeded")]
    RateLimited { retry_after_secs: Option<u64> },
    #[error("Request failed: {0}")]
    RequestFailed(String),
    #[error("API error ({status}): {message}")]
    ApiError { status: u16, message: String },
    #[error("Model returned no content")]
    EmptyResponse,
}

#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// Sent as a single user message.
    pub prompt: String,
    pub temperature: f32,
}

#[derive(Debug, Clone)]
pub struct CompletionResponse {
    pub content: String,
    pub model: String,
}

/// A hosted chat-completion model, called without streaming.
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn complete(&self, request: CompletionRequest)
    -> Result<CompletionResponse, ChatModelError>;

    fn model_name(&self) -> &str;
}
