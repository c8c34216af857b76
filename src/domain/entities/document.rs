use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::value_objects::{ContentHash, PdfPayload};

/// One uploaded PDF. Chunks and conversation turns are kept by their own stores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    id: Uuid,
    owner_id: String,
    title: String,
    payload: PdfPayload,
    page_count: i32,
    content_hash: ContentHash,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Document {
    pub fn new(
        owner_id: String,
        title: String,
        payload: PdfPayload,
        page_count: i32,
        content_hash: ContentHash,
    ) -> Self {
        Self::with_id(
            Uuid::new_v4(),
            owner_id,
            title,
            payload,
            page_count,
            content_hash,
        )
    }

    /// A new document whose id was allocated up front, so chunks can point at
    /// it before the document itself exists.
    pub fn with_id(
        id: Uuid,
        owner_id: String,
        title: String,
        payload: PdfPayload,
        page_count: i32,
        content_hash: ContentHash,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            owner_id,
            title,
            payload,
            page_count,
            content_hash,
            created_at: now,
            updated_at: now,
        }
    }

    /// Rebuilds a document read back from storage.
    #[allow(clippy::too_many_arguments)]
    pub fn restore(
        id: Uuid,
        owner_id: String,
        title: String,
        payload: PdfPayload,
        page_count: i32,
        content_hash: ContentHash,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            owner_id,
            title,
            payload,
            page_count,
            content_hash,
            created_at,
            updated_at,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn owner_id(&self) -> &str {
        &self.owner_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn payload(&self) -> &PdfPayload {
        &self.payload
    }

    pub fn page_count(&self) -> i32 {
        self.page_count
    }

    pub fn content_hash(&self) -> &ContentHash {
        &self.content_hash
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn is_owned_by(&self, owner_id: &str) -> bool {
        self.owner_id == owner_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Document {
        let bytes = b"%PDF-1.5 sample";
        Document::new(
            "user-1".to_string(),
            "notes.pdf".to_string(),
            PdfPayload::store(bytes),
            3,
            ContentHash::from_bytes(bytes),
        )
    }

    #[test]
    fn test_document_creation() {
        let document = sample();

        assert_eq!(document.title(), "notes.pdf");
        assert_eq!(document.page_count(), 3);
        assert_eq!(document.created_at(), document.updated_at());
        assert!(document.is_owned_by("user-1"));
        assert!(!document.is_owned_by("user-2"));
    }

    #[test]
    fn test_restore_keeps_identity() {
        let document = sample();
        let restored = Document::restore(
            document.id(),
            document.owner_id().to_string(),
            document.title().to_string(),
            document.payload().clone(),
            document.page_count(),
            document.content_hash().clone(),
            document.created_at(),
            document.updated_at(),
        );

        assert_eq!(restored, document);
    }
}
