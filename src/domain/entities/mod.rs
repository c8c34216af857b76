pub mod content_chunk;
pub mod conversation_turn;
pub mod document;

pub use content_chunk::ContentChunk;
pub use conversation_turn::{ConversationTurn, SourceSnippet};
pub use document::Document;
