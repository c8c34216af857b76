use std::sync::Arc;

use uuid::Uuid;

use crate::domain::entities::{ConversationTurn, SourceSnippet};
use crate::domain::repositories::{ConversationRepository, RepositoryError};

pub const DEFAULT_PREVIEW_CHARS: usize = 150;

/// Append-only chat history per document. Every append is a single write.
pub struct ConversationStore {
    repository: Arc<dyn ConversationRepository>,
    preview_chars: usize,
}

impl ConversationStore {
    pub fn new(repository: Arc<dyn ConversationRepository>, preview_chars: usize) -> Self {
        Self {
            repository,
            preview_chars,
        }
    }

    pub async fn append_user_turn(
        &self,
        document_id: Uuid,
        text: &str,
    ) -> Result<ConversationTurn, RepositoryError> {
        let turn = ConversationTurn::user(document_id, text.to_string());
        self.repository.append(&turn).await
    }

    /// `sources` are (page, full chunk text) pairs; only a preview is kept.
    pub async fn append_assistant_turn(
        &self,
        document_id: Uuid,
        text: &str,
        cited_pages: Vec<i32>,
        sources: &[(i32, &str)],
    ) -> Result<ConversationTurn, RepositoryError> {
        let snippets = sources
            .iter()
            .map(|(page, chunk_text)| SourceSnippet::preview(*page, chunk_text, self.preview_chars))
            .collect();

        let turn = ConversationTurn::assistant(document_id, text.to_string(), cited_pages, snippets);
        self.repository.append(&turn).await
    }

    pub async fn history(&self, document_id: Uuid) -> Result<Vec<ConversationTurn>, RepositoryError> {
        self.repository.history(document_id).await
    }
}
