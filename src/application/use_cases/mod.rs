pub mod ask_question;
pub mod delete_document;
pub mod get_conversation;
pub mod get_document;
pub mod get_document_chunks;
pub mod ingest_document;
pub mod list_documents;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::application::errors::AssistantError;
use crate::domain::entities::Document;

pub use ask_question::{AskQuestionRequest, AskQuestionResponse, AskQuestionUseCase};
pub use delete_document::DeleteDocumentUseCase;
pub use get_conversation::GetConversationUseCase;
pub use get_document::{GetDocumentResponse, GetDocumentUseCase};
pub use get_document_chunks::{
    GetDocumentChunksRequest, GetDocumentChunksResponse, GetDocumentChunksUseCase,
};
pub use ingest_document::{IngestDocumentRequest, IngestDocumentUseCase};
pub use list_documents::ListDocumentsUseCase;

#[derive(Debug, Clone, PartialEq)]
pub struct DocumentSummary {
    pub id: Uuid,
    pub title: String,
    pub page_count: i32,
    pub created_at: DateTime<Utc>,
}

impl From<&Document> for DocumentSummary {
    fn from(document: &Document) -> Self {
        Self {
            id: document.id(),
            title: document.title().to_string(),
            page_count: document.page_count(),
            created_at: document.created_at(),
        }
    }
}

pub(crate) fn require_owner(owner_id: &str) -> Result<&str, AssistantError> {
    let owner_id = owner_id.trim();
    if owner_id.is_empty() {
        return Err(AssistantError::Unauthorized);
    }
    Ok(owner_id)
}
