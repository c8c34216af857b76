use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::entities::{ContentChunk, Document};

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Record not found: {0}")]
    NotFound(Uuid),
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Validation error: {0}")]
    ValidationError(String),
}

/// Documents and the chunks stored with them at ingestion time.
///
/// Every lookup is scoped by owner: a document that exists but belongs to
/// someone else is reported exactly like a missing one.
#[async_trait]
pub trait DocumentRepository: Send + Sync {
    /// Inserts the document and its chunks in one transaction.
    async fn save_with_chunks(
        &self,
        document: &Document,
        chunks: &[ContentChunk],
    ) -> Result<(), RepositoryError>;

    async fn find_owned(
        &self,
        id: Uuid,
        owner_id: &str,
    ) -> Result<Option<Document>, RepositoryError>;

    /// Newest first.
    async fn list_by_owner(&self, owner_id: &str) -> Result<Vec<Document>, RepositoryError>;

    /// Removes the document together with its chunks and history.
    async fn delete_owned(&self, id: Uuid, owner_id: &str) -> Result<bool, RepositoryError>;

    async fn find_chunks_paginated(
        &self,
        document_id: Uuid,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<ContentChunk>, RepositoryError>;

    async fn count_chunks(&self, document_id: Uuid) -> Result<i64, RepositoryError>;
}
