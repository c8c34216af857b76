pub mod answer_generator;
pub mod conversation_store;
pub mod document_processor;
pub mod embedding_service;
pub mod text_splitter;

pub use answer_generator::AnswerGenerator;
pub use conversation_store::ConversationStore;
pub use document_processor::DocumentProcessorService;
pub use embedding_service::EmbeddingService;
pub use text_splitter::RecursiveSplitter;
