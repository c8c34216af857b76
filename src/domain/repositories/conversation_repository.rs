use async_trait::async_trait;
use uuid::Uuid;

use super::document_repository::RepositoryError;
use crate::domain::entities::ConversationTurn;

#[async_trait]
pub trait ConversationRepository: Send + Sync {
    /// Appends one turn and returns it with its assigned sequence number.
    async fn append(&self, turn: &ConversationTurn) -> Result<ConversationTurn, RepositoryError>;

    /// All turns of a document in append order.
    async fn history(&self, document_id: Uuid) -> Result<Vec<ConversationTurn>, RepositoryError>;
}
