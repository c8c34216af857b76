use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::{ContentChunk, ConversationTurn, Document};
use crate::domain::repositories::{ConversationRepository, DocumentRepository, RepositoryError};

#[derive(Default)]
struct Tables {
    documents: HashMap<Uuid, Document>,
    /// Document ids in insertion order, for a stable newest-first listing.
    insertion_order: Vec<Uuid>,
    chunks: HashMap<Uuid, Vec<ContentChunk>>,
    turns: HashMap<Uuid, Vec<ConversationTurn>>,
    next_sequence: i64,
}

/// Process-local store used when no database is configured. Documents, chunks
/// and turns share one lock, so deletes remove all three at once.
#[derive(Default)]
pub struct InMemoryRepository {
    tables: RwLock<Tables>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentRepository for InMemoryRepository {
    async fn save_with_chunks(
        &self,
        document: &Document,
        chunks: &[ContentChunk],
    ) -> Result<(), RepositoryError> {
        let mut tables = self.tables.write().await;
        if tables.documents.contains_key(&document.id()) {
            return Err(RepositoryError::ValidationError(format!(
                "Document {} already exists",
                document.id()
            )));
        }

        tables.documents.insert(document.id(), document.clone());
        tables.insertion_order.push(document.id());
        tables.chunks.insert(document.id(), chunks.to_vec());
        Ok(())
    }

    async fn find_owned(
        &self,
        id: Uuid,
        owner_id: &str,
    ) -> Result<Option<Document>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables
            .documents
            .get(&id)
            .filter(|document| document.is_owned_by(owner_id))
            .cloned())
    }

    async fn list_by_owner(&self, owner_id: &str) -> Result<Vec<Document>, RepositoryError> {
        let tables = self.tables.read().await;
        let mut owned: Vec<Document> = tables
            .insertion_order
            .iter()
            .rev()
            .filter_map(|id| tables.documents.get(id))
            .filter(|document| document.is_owned_by(owner_id))
            .cloned()
            .collect();
        // Stable, so equal timestamps keep newest-inserted first.
        owned.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        Ok(owned)
    }

    async fn delete_owned(&self, id: Uuid, owner_id: &str) -> Result<bool, RepositoryError> {
        let mut tables = self.tables.write().await;
        let owned = tables
            .documents
            .get(&id)
            .is_some_and(|document| document.is_owned_by(owner_id));
        if !owned {
            return Ok(false);
        }

        tables.documents.remove(&id);
        tables.insertion_order.retain(|existing| *existing != id);
        tables.chunks.remove(&id);
        tables.turns.remove(&id);
        Ok(true)
    }

    async fn find_chunks_paginated(
        &self,
        document_id: Uuid,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<ContentChunk>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables
            .chunks
            .get(&document_id)
            .map(|chunks| {
                chunks
                    .iter()
                    .skip(skip.max(0) as usize)
                    .take(limit.max(0) as usize)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn count_chunks(&self, document_id: Uuid) -> Result<i64, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables
            .chunks
            .get(&document_id)
            .map_or(0, |chunks| chunks.len() as i64))
    }
}

#[async_trait]
impl ConversationRepository for InMemoryRepository {
    async fn append(&self, turn: &ConversationTurn) -> Result<ConversationTurn, RepositoryError> {
        let mut tables = self.tables.write().await;
        if !tables.documents.contains_key(&turn.document_id()) {
            return Err(RepositoryError::NotFound(turn.document_id()));
        }

        tables.next_sequence += 1;
        let stored = turn.clone().with_sequence(tables.next_sequence);
        tables
            .turns
            .entry(turn.document_id())
            .or_default()
            .push(stored.clone());
        Ok(stored)
    }

    async fn history(&self, document_id: Uuid) -> Result<Vec<ConversationTurn>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables.turns.get(&document_id).cloned().unwrap_or_default())
    }
}
