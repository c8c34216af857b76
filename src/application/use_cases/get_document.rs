use std::sync::Arc;

use uuid::Uuid;

use super::require_owner;
use crate::application::errors::AssistantError;
use crate::domain::repositories::DocumentRepository;

#[derive(Debug, Clone)]
pub struct GetDocumentResponse {
    /// The stored data URL, handed back as is.
    pub data: String,
    pub title: String,
    pub page_count: i32,
}

pub struct GetDocumentUseCase {
    document_repository: Arc<dyn DocumentRepository>,
}

impl GetDocumentUseCase {
    pub fn new(document_repository: Arc<dyn DocumentRepository>) -> Self {
        Self { document_repository }
    }

    pub async fn execute(
        &self,
        document_id: Uuid,
        owner_id: &str,
    ) -> Result<GetDocumentResponse, AssistantError> {
        let owner_id = require_owner(owner_id)?;
        let document = self
            .document_repository
            .find_owned(document_id, owner_id)
            .await?
            .ok_or(AssistantError::NotFound(document_id))?;

        if !document.payload().is_well_formed() {
            return Err(AssistantError::DecodeError(format!(
                "stored content of document {} is not a PDF data URL",
                document_id
            )));
        }

        Ok(GetDocumentResponse {
            data: document.payload().as_str().to_string(),
            title: document.title().to_string(),
            page_count: document.page_count(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::PdfPayload;
    use crate::test_support::{
        BIOLOGY_PAGES, Pipeline, ScriptedChatModel, pdf_request, pdf_with_pages,
    };

    #[tokio::test]
    async fn test_fetch_returns_original_bytes_as_data_url() {
        let pipeline = Pipeline::new(ScriptedChatModel::answering("unused"));
        let pdf = pdf_with_pages(BIOLOGY_PAGES);
        let document = pipeline
            .ingest()
            .execute(pdf_request("alice", "notes.pdf", pdf.clone()))
            .await
            .unwrap();

        let fetched = pipeline.get().execute(document.id, "alice").await.unwrap();

        assert_eq!(fetched.title, "notes.pdf");
        assert_eq!(fetched.page_count, 3);
        assert!(fetched.data.starts_with("data:application/pdf;base64,"));
        let bytes = PdfPayload::from_stored(fetched.data).load().unwrap();
        assert_eq!(bytes, pdf);
    }

    #[tokio::test]
    async fn test_unknown_document_is_not_found() {
        let pipeline = Pipeline::new(ScriptedChatModel::answering("unused"));

        let result = pipeline.get().execute(Uuid::new_v4(), "alice").await;

        assert!(matches!(result, Err(AssistantError::NotFound(_))));
    }
}
