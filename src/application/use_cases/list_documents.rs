use std::sync::Arc;

use super::{DocumentSummary, require_owner};
use crate::application::errors::AssistantError;
use crate::domain::repositories::DocumentRepository;

pub struct ListDocumentsUseCase {
    document_repository: Arc<dyn DocumentRepository>,
}

impl ListDocumentsUseCase {
    pub fn new(document_repository: Arc<dyn DocumentRepository>) -> Self {
        Self { document_repository }
    }

    /// Newest first.
    pub async fn execute(&self, owner_id: &str) -> Result<Vec<DocumentSummary>, AssistantError> {
        let owner_id = require_owner(owner_id)?;
        let documents = self.document_repository.list_by_owner(owner_id).await?;

        Ok(documents.iter().map(DocumentSummary::from).collect())
    }
}
