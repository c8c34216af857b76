pub mod postgres_conversation_repository;
pub mod postgres_document_repository;

pub use postgres_conversation_repository::PostgresConversationRepository;
pub use postgres_document_repository::PostgresDocumentRepository;
