use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::use_cases::{
    DocumentSummary, GetDocumentChunksResponse, GetDocumentResponse,
};
use crate::domain::entities::ContentChunk;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSummaryDto {
    pub id: Uuid,
    pub title: String,
    pub page_count: i32,
    pub created_at: String,
}

impl From<DocumentSummary> for DocumentSummaryDto {
    fn from(summary: DocumentSummary) -> Self {
        Self {
            id: summary.id,
            title: summary.title,
            page_count: summary.page_count,
            created_at: summary.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentContentDto {
    pub data: String,
    pub title: String,
    pub page_count: i32,
}

impl From<GetDocumentResponse> for DocumentContentDto {
    fn from(response: GetDocumentResponse) -> Self {
        Self {
            data: response.data,
            title: response.title,
            page_count: response.page_count,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PaginationDto {
    pub skip: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct PaginationMetaDto {
    pub offset: i64,
    pub limit: i64,
    pub total: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChunkDto {
    pub id: Uuid,
    pub chunk_index: i32,
    pub page_number: i32,
    pub location: String,
    pub text: String,
    pub character_count: usize,
}

impl From<ContentChunk> for ChunkDto {
    fn from(chunk: ContentChunk) -> Self {
        Self {
            id: chunk.id(),
            chunk_index: chunk.chunk_index(),
            page_number: chunk.page_number(),
            location: chunk.location().to_string(),
            character_count: chunk.character_count(),
            text: chunk.chunk_text().to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentChunksDto {
    pub document_id: Uuid,
    pub chunks: Vec<ChunkDto>,
    pub meta: PaginationMetaDto,
}

impl From<GetDocumentChunksResponse> for DocumentChunksDto {
    fn from(response: GetDocumentChunksResponse) -> Self {
        Self {
            document_id: response.document_id,
            chunks: response.chunks.into_iter().map(ChunkDto::from).collect(),
            meta: PaginationMetaDto {
                offset: response.skip,
                limit: response.limit,
                total: response.total_chunks,
            },
        }
    }
}
