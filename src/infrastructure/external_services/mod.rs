pub mod document_extractors;
pub mod groq_chat_client;
pub mod huggingface_embeddings;

pub use document_extractors::PdfExtractor;
pub use groq_chat_client::{ChatClientConfig, GroqChatClient};
pub use huggingface_embeddings::{HuggingFaceConfig, HuggingFaceEmbeddingProvider};
