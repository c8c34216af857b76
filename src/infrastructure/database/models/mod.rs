pub mod chunk_model;
pub mod document_model;
pub mod turn_model;

pub use chunk_model::*;
pub use document_model::*;
pub use turn_model::*;
