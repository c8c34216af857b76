use std::sync::Arc;

use tracing::{info, warn};

use crate::{
    application::{
        ports::{ChatModel, DocumentExtractor, EmbeddingProvider},
        services::{
            AnswerGenerator, ConversationStore, DocumentProcessorService, EmbeddingService,
            RecursiveSplitter,
        },
        use_cases::{
            AskQuestionUseCase, DeleteDocumentUseCase, GetConversationUseCase,
            GetDocumentChunksUseCase, GetDocumentUseCase, IngestDocumentUseCase,
            ListDocumentsUseCase,
        },
    },
    config::AppConfig,
    domain::repositories::{ConversationRepository, DocumentRepository},
    infrastructure::{
        database::{
            create_connection_pool,
            repositories::{PostgresConversationRepository, PostgresDocumentRepository},
            run_migrations,
        },
        external_services::{
            ChatClientConfig, GroqChatClient, HuggingFaceConfig, HuggingFaceEmbeddingProvider,
            PdfExtractor,
        },
        memory::InMemoryRepository,
    },
    presentation::http::handlers::{ChatHandler, DocumentHandler},
};

pub struct AppContainer {
    pub document_handler: Arc<DocumentHandler>,
    pub chat_handler: Arc<ChatHandler>,
}

impl AppContainer {
    pub fn new(config: &AppConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let (document_repository, conversation_repository) = build_repositories(config)?;

        let embedding_provider: Arc<dyn EmbeddingProvider> =
            Arc::new(HuggingFaceEmbeddingProvider::new(HuggingFaceConfig {
                base_url: config.embeddings.base_url.clone(),
                model: config.embeddings.model.clone(),
                api_key: config.embeddings.api_key.clone(),
                max_retries: config.embeddings.max_retries,
                timeout_secs: config.embeddings.timeout_secs,
                ..HuggingFaceConfig::default()
            })?);
        info!("Embedding model: {}", embedding_provider.model_info().0);
        if config.embeddings.api_key.is_none() {
            warn!("HUGGINGFACE_API_KEY is not set; embedding requests will be anonymous");
        }

        let chat_model: Arc<dyn ChatModel> = Arc::new(GroqChatClient::new(ChatClientConfig {
            api_key: config.chat.api_key.clone(),
            base_url: config.chat.base_url.clone(),
            model: config.chat.model.clone(),
            timeout_secs: config.chat.timeout_secs,
        })?);
        info!("Chat model: {}", chat_model.model_name());
        if config.chat.api_key.is_empty() {
            warn!("GROQ_API_KEY is not set; chat requests will be rejected by the provider");
        }

        let document_extractor: Arc<dyn DocumentExtractor> =
            Arc::new(PdfExtractor::new(config.max_upload_bytes));

        Self::from_parts(
            config,
            document_repository,
            conversation_repository,
            document_extractor,
            embedding_provider,
            chat_model,
        )
    }

    /// Wires use cases and handlers around already built adapters.
    pub fn from_parts(
        config: &AppConfig,
        document_repository: Arc<dyn DocumentRepository>,
        conversation_repository: Arc<dyn ConversationRepository>,
        document_extractor: Arc<dyn DocumentExtractor>,
        embedding_provider: Arc<dyn EmbeddingProvider>,
        chat_model: Arc<dyn ChatModel>,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let splitter = RecursiveSplitter::new(config.chunk_size, config.chunk_overlap)?;
        let document_processor = Arc::new(DocumentProcessorService::new(document_extractor, splitter));
        let embedding_service = Arc::new(EmbeddingService::new(
            embedding_provider,
            config.embeddings.batch_size,
        )?);
        let answer_generator = Arc::new(AnswerGenerator::new(chat_model, config.chat.temperature));
        let conversation_store = Arc::new(ConversationStore::new(
            conversation_repository,
            config.source_preview_chars,
        ));

        let ingest_use_case = Arc::new(IngestDocumentUseCase::new(
            document_repository.clone(),
            document_processor.clone(),
            config.max_upload_bytes,
        ));
        let list_use_case = Arc::new(ListDocumentsUseCase::new(document_repository.clone()));
        let get_use_case = Arc::new(GetDocumentUseCase::new(document_repository.clone()));
        let delete_use_case = Arc::new(DeleteDocumentUseCase::new(document_repository.clone()));
        let chunks_use_case = Arc::new(GetDocumentChunksUseCase::new(document_repository.clone()));
        let ask_use_case = Arc::new(AskQuestionUseCase::new(
            document_repository.clone(),
            document_processor,
            embedding_service,
            answer_generator,
            conversation_store.clone(),
            config.retrieval_top_k,
        ));
        let history_use_case = Arc::new(GetConversationUseCase::new(
            document_repository,
            conversation_store,
        ));

        let document_handler = Arc::new(DocumentHandler::new(
            ingest_use_case,
            list_use_case,
            get_use_case,
            delete_use_case,
            chunks_use_case,
        ));
        let chat_handler = Arc::new(ChatHandler::new(ask_use_case, history_use_case));

        Ok(Self {
            document_handler,
            chat_handler,
        })
    }
}

type Repositories = (Arc<dyn DocumentRepository>, Arc<dyn ConversationRepository>);

fn build_repositories(config: &AppConfig) -> Result<Repositories, Box<dyn std::error::Error>> {
    match &config.database_url {
        Some(database_url) => {
            let db_pool = create_connection_pool(database_url, config.database_pool_size)?;
            run_migrations(&db_pool)
                .map_err(|e| format!("Failed to run database migrations: {}", e))?;
            info!("Connected to PostgreSQL and applied migrations");

            let document_repository: Arc<dyn DocumentRepository> =
                Arc::new(PostgresDocumentRepository::new(db_pool.clone()));
            let conversation_repository: Arc<dyn ConversationRepository> =
                Arc::new(PostgresConversationRepository::new(db_pool));
            Ok((document_repository, conversation_repository))
        }
        None => {
            warn!("DATABASE_URL is not set; documents are kept in memory and lost on restart");
            let repository = Arc::new(InMemoryRepository::new());
            let document_repository: Arc<dyn DocumentRepository> = repository.clone();
            let conversation_repository: Arc<dyn ConversationRepository> = repository;
            Ok((document_repository, conversation_repository))
        }
    }
}
