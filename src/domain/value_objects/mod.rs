pub mod content_hash;
pub mod pdf_payload;
pub mod turn_role;

pub use content_hash::ContentHash;
pub use pdf_payload::{PayloadError, PdfPayload};
pub use turn_role::TurnRole;
