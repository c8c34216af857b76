use std::sync::Arc;

use tracing::{debug, info, warn};
use uuid::Uuid;

use super::require_owner;
use crate::application::errors::AssistantError;
use crate::application::services::{
    AnswerGenerator, ConversationStore, DocumentProcessorService, EmbeddingService,
};
use crate::domain::entities::{ConversationTurn, SourceSnippet};
use crate::domain::repositories::DocumentRepository;

#[derive(Debug, Clone)]
pub struct AskQuestionRequest {
    pub document_id: Uuid,
    pub owner_id: String,
    pub question: String,
}

#[derive(Debug, Clone)]
pub struct AskQuestionResponse {
    pub answer: String,
    pub cited_pages: Vec<i32>,
    pub sources: Vec<SourceSnippet>,
    pub chat_history: Vec<ConversationTurn>,
}

pub struct AskQuestionUseCase {
    document_repository: Arc<dyn DocumentRepository>,
    document_processor: Arc<DocumentProcessorService>,
    embedding_service: Arc<EmbeddingService>,
    answer_generator: Arc<AnswerGenerator>,
    conversation_store: Arc<ConversationStore>,
    top_k: usize,
}

impl AskQuestionUseCase {
    pub fn new(
        document_repository: Arc<dyn DocumentRepository>,
        document_processor: Arc<DocumentProcessorService>,
        embedding_service: Arc<EmbeddingService>,
        answer_generator: Arc<AnswerGenerator>,
        conversation_store: Arc<ConversationStore>,
        top_k: usize,
    ) -> Self {
        Self {
            document_repository,
            document_processor,
            embedding_service,
            answer_generator,
            conversation_store,
            top_k,
        }
    }

    pub async fn execute(
        &self,
        request: AskQuestionRequest,
    ) -> Result<AskQuestionResponse, AssistantError> {
        let owner_id = require_owner(&request.owner_id)?;
        let question = request.question.trim();
        if question.is_empty() {
            return Err(AssistantError::ValidationError(
                "Question must not be empty".to_string(),
            ));
        }

        let document = self
            .document_repository
            .find_owned(request.document_id, owner_id)
            .await?
            .ok_or(AssistantError::NotFound(request.document_id))?;

        let pdf_bytes = document.payload().load()?;
        let processed = self
            .document_processor
            .process(document.id(), &pdf_bytes)
            .await?;

        let index = self.embedding_service.build_index(processed.chunks).await?;
        let matches = self
            .embedding_service
            .query(&index, question, self.top_k)
            .await?;
        debug!(
            "Retrieved {} of {} chunks for document {}",
            matches.len(),
            index.len(),
            document.id()
        );
        drop(index);

        let mut cited_pages: Vec<i32> = matches.iter().map(|m| m.chunk.page_number()).collect();
        cited_pages.sort_unstable();
        cited_pages.dedup();

        let context: Vec<&str> = matches.iter().map(|m| m.chunk.chunk_text()).collect();
        let answer = self.answer_generator.generate(question, &context).await?;

        self.conversation_store
            .append_user_turn(document.id(), question)
            .await?;

        let sources: Vec<(i32, &str)> = matches
            .iter()
            .map(|m| (m.chunk.page_number(), m.chunk.chunk_text()))
            .collect();
        let assistant_turn = self
            .conversation_store
            .append_assistant_turn(document.id(), &answer, cited_pages.clone(), &sources)
            .await
            .map_err(|e| {
                warn!(
                    "Assistant turn for document {} was not saved after the question was: {}",
                    document.id(),
                    e
                );
                AssistantError::from(e)
            })?;

        let chat_history = self.conversation_store.history(document.id()).await?;

        info!(
            "Answered question on document {} citing pages {:?}",
            document.id(),
            cited_pages
        );

        Ok(AskQuestionResponse {
            answer,
            cited_pages,
            sources: assistant_turn.sources().to_vec(),
            chat_history,
        })
    }
}
