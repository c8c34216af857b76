use std::sync::Arc;

use uuid::Uuid;

use super::require_owner;
use crate::application::errors::AssistantError;
use crate::application::services::ConversationStore;
use crate::domain::entities::ConversationTurn;
use crate::domain::repositories::DocumentRepository;

pub struct GetConversationUseCase {
    document_repository: Arc<dyn DocumentRepository>,
    conversation_store: Arc<ConversationStore>,
}

impl GetConversationUseCase {
    pub fn new(
        document_repository: Arc<dyn DocumentRepository>,
        conversation_store: Arc<ConversationStore>,
    ) -> Self {
        Self {
            document_repository,
            conversation_store,
        }
    }

    pub async fn execute(
        &self,
        document_id: Uuid,
        owner_id: &str,
    ) -> Result<Vec<ConversationTurn>, AssistantError> {
        let owner_id = require_owner(owner_id)?;
        self.document_repository
            .find_owned(document_id, owner_id)
            .await?
            .ok_or(AssistantError::NotFound(document_id))?;

        Ok(self.conversation_store.history(document_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{BIOLOGY_PAGES, Pipeline, ScriptedChatModel};

    #[tokio::test]
    async fn test_new_document_has_empty_history() {
        let pipeline = Pipeline::new(ScriptedChatModel::answering("unused"));
        let document = pipeline.upload("alice", BIOLOGY_PAGES).await;

        let history = pipeline.history().execute(document.id, "alice").await.unwrap();

        assert!(history.is_empty());
    }

    #[tokio::test]
    async fn test_history_requires_ownership() {
        let pipeline = Pipeline::new(ScriptedChatModel::answering("unused"));
        let document = pipeline.upload("alice", BIOLOGY_PAGES).await;

        let result = pipeline.history().execute(document.id, "bob").await;

        assert!(matches!(result, Err(AssistantError::NotFound(_))));
    }
}
