use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use crate::application::ports::DocumentExtractor;
use crate::application::ports::document_extractor::{DocumentExtractionError, ExtractedDocument};
use crate::application::services::text_splitter::{RecursiveSplitter, TextSplitter};
use crate::domain::entities::ContentChunk;

#[derive(Debug)]
pub struct ProcessedDocument {
    pub page_count: i32,
    pub chunks: Vec<ContentChunk>,
}

/// Turns raw PDF bytes into page-tagged chunks. Used both at ingestion and
/// when chunks are re-derived for a question, so both paths agree.
pub struct DocumentProcessorService {
    document_extractor: Arc<dyn DocumentExtractor>,
    splitter: RecursiveSplitter,
}

impl DocumentProcessorService {
    pub fn new(document_extractor: Arc<dyn DocumentExtractor>, splitter: RecursiveSplitter) -> Self {
        Self {
            document_extractor,
            splitter,
        }
    }

    pub async fn process(
        &self,
        document_id: Uuid,
        data: &[u8],
    ) -> Result<ProcessedDocument, DocumentExtractionError> {
        let extracted = self.document_extractor.extract_pages(data).await?;
        if !extracted.has_text() {
            return Err(DocumentExtractionError::NoExtractableText);
        }

        let chunks = self.create_chunks(document_id, &extracted);
        debug!(
            "Split {} pages into {} chunks",
            extracted.page_count,
            chunks.len()
        );

        Ok(ProcessedDocument {
            page_count: extracted.page_count,
            chunks,
        })
    }

    pub fn create_chunks(&self, document_id: Uuid, extracted: &ExtractedDocument) -> Vec<ContentChunk> {
        let mut chunks = Vec::new();
        let mut chunk_index = 0;

        for (page_index, page_text) in extracted.pages().into_iter().enumerate() {
            if page_text.trim().is_empty() {
                continue;
            }

            let page_number = page_index as i32 + 1;
            for text in self.splitter.split_text(page_text) {
                chunks.push(ContentChunk::new(document_id, text, chunk_index, page_number));
                chunk_index += 1;
            }
        }

        chunks
    }
}
