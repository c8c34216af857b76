use async_trait::async_trait;
use thiserror::Error;

/// Separates pages in the joined extraction output.
pub const PAGE_BREAK: char = '\u{000C}';

#[derive(Debug, Error)]
pub enum DocumentExtractionError {
    #[error("Corrupted file: {0}")]
    CorruptedFile(String),
    #[error("No text could be extracted from this PDF. It may be a scanned, image-only document")]
    NoExtractableText,
    #[error("Extraction failed: {0}")]
    ExtractionFailed(String),
}

/// Text of every page joined by [`PAGE_BREAK`], in page order.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedDocument {
    pub text: String,
    pub page_count: i32,
}

impl ExtractedDocument {
    pub fn from_pages(pages: Vec<String>) -> Self {
        let page_count = pages.len() as i32;
        let text = pages
            .into_iter()
            .map(|page| page.replace(PAGE_BREAK, ""))
            .collect::<Vec<_>>()
            .join(&PAGE_BREAK.to_string());

        Self { text, page_count }
    }

    /// Per-page texts; the length always equals `page_count`.
    pub fn pages(&self) -> Vec<&str> {
        if self.page_count == 0 {
            return Vec::new();
        }
        self.text.split(PAGE_BREAK).collect()
    }

    pub fn has_text(&self) -> bool {
        self.pages().iter().any(|page| !page.trim().is_empty())
    }
}

#[async_trait]
pub trait DocumentExtractor: Send + Sync {
    async fn extract_pages(&self, data: &[u8]) -> Result<ExtractedDocument, DocumentExtractionError>;
}
