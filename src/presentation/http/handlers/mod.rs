pub mod chat_handler;
pub mod document_handler;

pub use chat_handler::ChatHandler;
pub use document_handler::DocumentHandler;
