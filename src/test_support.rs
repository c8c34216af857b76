//! Fakes and fixtures shared by unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, dictionary};
use pgvector::Vector;
use uuid::Uuid;

use crate::application::ports::chat_model::{
    ChatModel, ChatModelError, CompletionRequest, CompletionResponse,
};
use crate::application::ports::document_extractor::{
    DocumentExtractionError, DocumentExtractor, ExtractedDocument,
};
use crate::application::ports::embedding_provider::{
    BatchEmbeddingRequest, BatchEmbeddingResponse, EmbeddingProvider, EmbeddingProviderError,
    EmbeddingRequest, EmbeddingResponse,
};
use crate::application::services::{
    AnswerGenerator, ConversationStore, DocumentProcessorService, EmbeddingService,
    RecursiveSplitter,
};
use crate::application::use_cases::{
    AskQuestionUseCase, DeleteDocumentUseCase, DocumentSummary, GetConversationUseCase,
    GetDocumentChunksUseCase, GetDocumentUseCase, IngestDocumentRequest, IngestDocumentUseCase,
    ListDocumentsUseCase,
};
use crate::config::AppConfig;
use crate::domain::entities::ConversationTurn;
use crate::domain::repositories::{ConversationRepository, RepositoryError};
use crate::domain::value_objects::TurnRole;
use crate::infrastructure::AppContainer;
use crate::infrastructure::external_services::PdfExtractor;
use crate::infrastructure::memory::InMemoryRepository;

/// A PDF with one Courier text block per page; `\n` starts a new line.
pub fn pdf_with_pages(pages: &[&str]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let mut kids: Vec<Object> = Vec::new();
    for text in pages {
        let mut operations = vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec![Object::Name(b"F1".to_vec()), Object::Integer(12)]),
            Operation::new("Td", vec![Object::Integer(72), Object::Integer(720)]),
        ];
        for (i, line) in text.lines().enumerate() {
            if i > 0 {
                operations.push(Operation::new("Td", vec![Object::Integer(0), Object::Integer(-14)]));
            }
            operations.push(Operation::new("Tj", vec![Object::string_literal(line)]));
        }
        operations.push(Operation::new("ET", vec![]));

        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let pages_dict = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => pages.len() as i64,
        "Resources" => resources_id,
        "MediaBox" => vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Integer(595),
            Object::Integer(842),
        ],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

/// Returns fixed page texts whatever bytes it is given.
pub struct StaticExtractor {
    pages: Vec<String>,
}

impl StaticExtractor {
    pub fn new(pages: Vec<&str>) -> Self {
        Self {
            pages: pages.into_iter().map(str::to_string).collect(),
        }
    }
}

#[async_trait]
impl DocumentExtractor for StaticExtractor {
    async fn extract_pages(&self, _data: &[u8]) -> Result<ExtractedDocument, DocumentExtractionError> {
        Ok(ExtractedDocument::from_pages(self.pages.clone()))
    }
}

const KEYWORDS: &[&str] = &[
    "photosynthesis",
    "chlorophyll",
    "light",
    "mitochondria",
    "atp",
    "energy",
    "rivers",
    "erosion",
    "valleys",
    "alpha",
    "one",
    "heap",
    "osmosis",
    "water",
];

/// Bag-of-keywords vectors plus a constant component, so no vector is zero.
#[derive(Default)]
pub struct KeywordEmbeddings {
    calls: AtomicUsize,
}

impl KeywordEmbeddings {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn embed(text: &str) -> Vec<f32> {
        let lowered = text.to_lowercase();
        let words: Vec<&str> = lowered
            .split(|c: char| !c.is_alphanumeric())
            .filter(|word| !word.is_empty())
            .collect();

        let mut vector: Vec<f32> = KEYWORDS
            .iter()
            .map(|keyword| words.iter().filter(|word| *word == keyword).count() as f32)
            .collect();
        vector.push(1.0);
        vector
    }
}

#[async_trait]
impl EmbeddingProvider for KeywordEmbeddings {
    async fn generate_embedding(
        &self,
        request: EmbeddingRequest,
    ) -> Result<EmbeddingResponse, EmbeddingProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(EmbeddingResponse {
            embedding: Vector::from(Self::embed(&request.text)),
        })
    }

    async fn generate_embeddings(
        &self,
        request: BatchEmbeddingRequest,
    ) -> Result<BatchEmbeddingResponse, EmbeddingProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(BatchEmbeddingResponse {
            embeddings: request
                .texts
                .iter()
                .map(|text| Vector::from(Self::embed(text)))
                .collect(),
        })
    }

    fn model_info(&self) -> (String, Option<String>) {
        ("keywords".to_string(), None)
    }
}

/// Answers every batch with the same fixed vectors.
pub struct ScriptedEmbeddings {
    vectors: Vec<Vec<f32>>,
}

impl ScriptedEmbeddings {
    pub fn new(vectors: Vec<Vec<f32>>) -> Self {
        Self { vectors }
    }
}

#[async_trait]
impl EmbeddingProvider for ScriptedEmbeddings {
    async fn generate_embedding(
        &self,
        _request: EmbeddingRequest,
    ) -> Result<EmbeddingResponse, EmbeddingProviderError> {
        let first = self.vectors.first().cloned().unwrap_or_default();
        Ok(EmbeddingResponse {
            embedding: Vector::from(first),
        })
    }

    async fn generate_embeddings(
        &self,
        _request: BatchEmbeddingRequest,
    ) -> Result<BatchEmbeddingResponse, EmbeddingProviderError> {
        Ok(BatchEmbeddingResponse {
            embeddings: self.vectors.iter().cloned().map(Vector::from).collect(),
        })
    }

    fn model_info(&self) -> (String, Option<String>) {
        ("scripted".to_string(), None)
    }
}

pub struct ScriptedChatModel {
    outcome: Result<String, ChatModelError>,
    calls: AtomicUsize,
    last_prompt: Mutex<Option<String>>,
}

impl ScriptedChatModel {
    pub fn answering(answer: &str) -> Self {
        Self {
            outcome: Ok(answer.to_string()),
            calls: AtomicUsize::new(0),
            last_prompt: Mutex::new(None),
        }
    }

    pub fn failing(error: ChatModelError) -> Self {
        Self {
            outcome: Err(error),
            calls: AtomicUsize::new(0),
            last_prompt: Mutex::new(None),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.last_prompt.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatModel for ScriptedChatModel {
    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionResponse, ChatModelError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_prompt.lock().unwrap() = Some(request.prompt);
        self.outcome.clone().map(|content| CompletionResponse {
            content,
            model: "scripted".to_string(),
        })
    }

    fn model_name(&self) -> &str {
        "scripted"
    }
}

/// Stores user turns but refuses assistant turns.
pub struct RejectingAssistantTurns {
    inner: Arc<InMemoryRepository>,
}

impl RejectingAssistantTurns {
    pub fn new(inner: Arc<InMemoryRepository>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl ConversationRepository for RejectingAssistantTurns {
    async fn append(&self, turn: &ConversationTurn) -> Result<ConversationTurn, RepositoryError> {
        if turn.role() == TurnRole::Assistant {
            return Err(RepositoryError::DatabaseError("disk full".to_string()));
        }
        self.inner.append(turn).await
    }

    async fn history(&self, document_id: Uuid) -> Result<Vec<ConversationTurn>, RepositoryError> {
        self.inner.history(document_id).await
    }
}

/// The wired application over an in-memory store, real PDF parsing and
/// keyword embeddings.
pub fn test_app(chat: ScriptedChatModel) -> AppContainer {
    test_app_with_upload_limit(chat, AppConfig::default().max_upload_bytes)
}

pub fn test_app_with_upload_limit(chat: ScriptedChatModel, max_upload_bytes: usize) -> AppContainer {
    let repository = Arc::new(InMemoryRepository::new());
    let config = AppConfig {
        max_upload_bytes,
        ..AppConfig::default()
    };

    AppContainer::from_parts(
        &config,
        repository.clone(),
        repository,
        Arc::new(PdfExtractor::new(config.max_upload_bytes)),
        Arc::new(KeywordEmbeddings::default()),
        Arc::new(chat),
    )
    .unwrap()
}

/// Services and use cases over an in-memory store, real PDF parsing and
/// keyword embeddings.
pub struct Pipeline {
    pub repository: Arc<InMemoryRepository>,
    pub processor: Arc<DocumentProcessorService>,
    pub embeddings: Arc<KeywordEmbeddings>,
    pub chat: Arc<ScriptedChatModel>,
    pub conversations: Arc<ConversationStore>,
}

impl Pipeline {
    pub fn new(chat: ScriptedChatModel) -> Self {
        let repository = Arc::new(InMemoryRepository::new());
        Self::with_conversations(chat, repository.clone(), repository)
    }

    pub fn with_conversations(
        chat: ScriptedChatModel,
        repository: Arc<InMemoryRepository>,
        conversations: Arc<dyn ConversationRepository>,
    ) -> Self {
        let processor = Arc::new(DocumentProcessorService::new(
            Arc::new(PdfExtractor::default()),
            RecursiveSplitter::default(),
        ));

        Self {
            repository,
            processor,
            embeddings: Arc::new(KeywordEmbeddings::default()),
            chat: Arc::new(chat),
            conversations: Arc::new(ConversationStore::new(conversations, 150)),
        }
    }

    pub fn ingest(&self) -> IngestDocumentUseCase {
        IngestDocumentUseCase::new(
            self.repository.clone(),
            self.processor.clone(),
            10 * 1024 * 1024,
        )
    }

    pub fn ask(&self) -> AskQuestionUseCase {
        AskQuestionUseCase::new(
            self.repository.clone(),
            self.processor.clone(),
            Arc::new(EmbeddingService::new(self.embeddings.clone(), 512).unwrap()),
            Arc::new(AnswerGenerator::new(self.chat.clone(), 0.3)),
            self.conversations.clone(),
            3,
        )
    }

    pub fn list(&self) -> ListDocumentsUseCase {
        ListDocumentsUseCase::new(self.repository.clone())
    }

    pub fn get(&self) -> GetDocumentUseCase {
        GetDocumentUseCase::new(self.repository.clone())
    }

    pub fn delete(&self) -> DeleteDocumentUseCase {
        DeleteDocumentUseCase::new(self.repository.clone())
    }

    pub fn chunks(&self) -> GetDocumentChunksUseCase {
        GetDocumentChunksUseCase::new(self.repository.clone())
    }

    pub fn history(&self) -> GetConversationUseCase {
        GetConversationUseCase::new(self.repository.clone(), self.conversations.clone())
    }

    /// Ingests `pages` as `notes.pdf` for `owner`.
    pub async fn upload(&self, owner: &str, pages: &[&str]) -> DocumentSummary {
        self.ingest()
            .execute(pdf_request(owner, "notes.pdf", pdf_with_pages(pages)))
            .await
            .unwrap()
    }
}

pub fn pdf_request(owner: &str, file_name: &str, file_data: Vec<u8>) -> IngestDocumentRequest {
    IngestDocumentRequest {
        owner_id: owner.to_string(),
        file_name: file_name.to_string(),
        content_type: Some("application/pdf".to_string()),
        file_data,
    }
}

pub const BIOLOGY_PAGES: &[&str] = &[
    "Photosynthesis uses light and chlorophyll",
    "Mitochondria produce ATP energy",
    "Rivers cause erosion of valleys",
];
