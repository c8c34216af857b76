use axum::{extract::FromRequestParts, http::request::Parts};

use crate::application::errors::AssistantError;

pub const OWNER_HEADER: &str = "x-user-id";

/// Caller identity, taken verbatim from the `x-user-id` header.
#[derive(Debug, Clone)]
pub struct OwnerId(pub String);

impl<S> FromRequestParts<S> for OwnerId
where
    S: Send + Sync,
{
    type Rejection = AssistantError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(OWNER_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(|value| OwnerId(value.to_string()))
            .ok_or(AssistantError::Unauthorized)
    }
}
