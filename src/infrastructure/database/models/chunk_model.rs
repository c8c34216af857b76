use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::entities::ContentChunk as DomainChunk;
use crate::infrastructure::database::schema::document_chunks;

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Associations)]
#[diesel(belongs_to(super::DocumentModel, foreign_key = document_id))]
#[diesel(table_name = document_chunks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ChunkModel {
    pub id: Uuid,
    pub document_id: Uuid,
    pub chunk_text: String,
    pub chunk_index: i32,
    pub page_number: i32,
    pub location: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = document_chunks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewChunkModel {
    pub id: Uuid,
    pub document_id: Uuid,
    pub chunk_text: String,
    pub chunk_index: i32,
    pub page_number: i32,
    pub location: String,
    pub created_at: DateTime<Utc>,
}

impl From<&DomainChunk> for NewChunkModel {
    fn from(chunk: &DomainChunk) -> Self {
        Self {
            id: chunk.id(),
            document_id: chunk.document_id(),
            chunk_text: chunk.chunk_text().to_string(),
            chunk_index: chunk.chunk_index(),
            page_number: chunk.page_number(),
            location: chunk.location().to_string(),
            created_at: chunk.created_at(),
        }
    }
}

impl From<ChunkModel> for DomainChunk {
    fn from(model: ChunkModel) -> Self {
        DomainChunk::restore(
            model.id,
            model.document_id,
            model.chunk_text,
            model.chunk_index,
            model.page_number,
            model.location,
            model.created_at,
        )
    }
}
