use std::sync::Arc;

use uuid::Uuid;

use super::require_owner;
use crate::application::errors::AssistantError;
use crate::domain::entities::ContentChunk;
use crate::domain::repositories::DocumentRepository;

pub const DEFAULT_CHUNK_PAGE_SIZE: i64 = 50;
pub const MAX_CHUNK_PAGE_SIZE: i64 = 100;

#[derive(Debug, Clone)]
pub struct GetDocumentChunksRequest {
    pub document_id: Uuid,
    pub owner_id: String,
    pub skip: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct GetDocumentChunksResponse {
    pub document_id: Uuid,
    pub chunks: Vec<ContentChunk>,
    pub total_chunks: i64,
    pub skip: i64,
    pub limit: i64,
}

pub struct GetDocumentChunksUseCase {
    document_repository: Arc<dyn DocumentRepository>,
}

impl GetDocumentChunksUseCase {
    pub fn new(document_repository: Arc<dyn DocumentRepository>) -> Self {
        Self { document_repository }
    }

    pub async fn execute(
        &self,
        request: GetDocumentChunksRequest,
    ) -> Result<GetDocumentChunksResponse, AssistantError> {
        let owner_id = require_owner(&request.owner_id)?;
        self.document_repository
            .find_owned(request.document_id, owner_id)
            .await?
            .ok_or(AssistantError::NotFound(request.document_id))?;

        let skip = request.skip.unwrap_or(0);
        if skip < 0 {
            return Err(AssistantError::ValidationError(
                "skip must not be negative".to_string(),
            ));
        }
        let limit = request
            .limit
            .unwrap_or(DEFAULT_CHUNK_PAGE_SIZE)
            .clamp(1, MAX_CHUNK_PAGE_SIZE);

        let chunks = self
            .document_repository
            .find_chunks_paginated(request.document_id, skip, limit)
            .await?;
        let total_chunks = self
            .document_repository
            .count_chunks(request.document_id)
            .await?;

        Ok(GetDocumentChunksResponse {
            document_id: request.document_id,
            chunks,
            total_chunks,
            skip,
            limit,
        })
    }
}
