use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A contiguous span of one page's text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentChunk {
    id: Uuid,
    document_id: Uuid,
    chunk_text: String,
    chunk_index: i32,
    page_number: i32,
    location: String,
    created_at: DateTime<Utc>,
}

impl ContentChunk {
    pub fn new(document_id: Uuid, chunk_text: String, chunk_index: i32, page_number: i32) -> Self {
        Self {
            id: Uuid::new_v4(),
            document_id,
            chunk_text,
            chunk_index,
            page_number,
            location: Self::location_label(page_number),
            created_at: Utc::now(),
        }
    }

    pub fn restore(
        id: Uuid,
        document_id: Uuid,
        chunk_text: String,
        chunk_index: i32,
        page_number: i32,
        location: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            document_id,
            chunk_text,
            chunk_index,
            page_number,
            location,
            created_at,
        }
    }

    pub fn location_label(page_number: i32) -> String {
        format!("page_{}", page_number)
    }

    // Getters
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn document_id(&self) -> Uuid {
        self.document_id
    }

    pub fn chunk_text(&self) -> &str {
        &self.chunk_text
    }

    pub fn chunk_index(&self) -> i32 {
        self.chunk_index
    }

    pub fn page_number(&self) -> i32 {
        self.page_number
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn is_empty(&self) -> bool {
        self.chunk_text.trim().is_empty()
    }

    pub fn character_count(&self) -> usize {
        self.chunk_text.chars().count()
    }

    /// Same text at the same place, regardless of identity.
    pub fn same_span(&self, other: &ContentChunk) -> bool {
        self.chunk_index == other.chunk_index
            && self.page_number == other.page_number
            && self.chunk_text == other.chunk_text
    }
}
