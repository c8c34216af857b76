use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use super::require_owner;
use crate::application::errors::AssistantError;
use crate::domain::repositories::DocumentRepository;

pub struct DeleteDocumentUseCase {
    document_repository: Arc<dyn DocumentRepository>,
}

impl DeleteDocumentUseCase {
    pub fn new(document_repository: Arc<dyn DocumentRepository>) -> Self {
        Self { document_repository }
    }

    pub async fn execute(&self, document_id: Uuid, owner_id: &str) -> Result<(), AssistantError> {
        let owner_id = require_owner(owner_id)?;
        let deleted = self
            .document_repository
            .delete_owned(document_id, owner_id)
            .await?;

        if !deleted {
            return Err(AssistantError::NotFound(document_id));
        }

        info!("Deleted document {}", document_id);
        Ok(())
    }
}
