use std::path::Path;
use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use super::{DocumentSummary, require_owner};
use crate::application::errors::AssistantError;
use crate::application::services::DocumentProcessorService;
use crate::domain::entities::Document;
use crate::domain::repositories::DocumentRepository;
use crate::domain::value_objects::{ContentHash, PdfPayload};

pub const PDF_CONTENT_TYPE: &str = "application/pdf";
pub const PDF_MAGIC: &[u8] = b"%PDF";
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct IngestDocumentRequest {
    pub owner_id: String,
    pub file_name: String,
    pub content_type: Option<String>,
    pub file_data: Vec<u8>,
}

pub struct IngestDocumentUseCase {
    document_repository: Arc<dyn DocumentRepository>,
    document_processor: Arc<DocumentProcessorService>,
    max_upload_bytes: usize,
}

impl IngestDocumentUseCase {
    pub fn new(
        document_repository: Arc<dyn DocumentRepository>,
        document_processor: Arc<DocumentProcessorService>,
        max_upload_bytes: usize,
    ) -> Self {
        Self {
            document_repository,
            document_processor,
            max_upload_bytes,
        }
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_bytes
    }

    pub async fn execute(
        &self,
        request: IngestDocumentRequest,
    ) -> Result<DocumentSummary, AssistantError> {
        let owner_id = require_owner(&request.owner_id)?;
        self.validate(&request)?;

        let document_id = Uuid::new_v4();
        let processed = self
            .document_processor
            .process(document_id, &request.file_data)
            .await
            .map_err(|e| {
                warn!("Failed to parse {}: {}", request.file_name, e);
                AssistantError::from(e)
            })?;

        let document = Document::with_id(
            document_id,
            owner_id.to_string(),
            request.file_name.clone(),
            PdfPayload::store(&request.file_data),
            processed.page_count,
            ContentHash::from_bytes(&request.file_data),
        );

        self.document_repository
            .save_with_chunks(&document, &processed.chunks)
            .await?;

        info!(
            "Ingested document {} ({}, {} pages, {} chunks)",
            document.id(),
            document.title(),
            document.page_count(),
            processed.chunks.len()
        );

        Ok(DocumentSummary::from(&document))
    }

    fn validate(&self, request: &IngestDocumentRequest) -> Result<(), AssistantError> {
        let content_type = request
            .content_type
            .as_deref()
            .map(|value| value.split(';').next().unwrap_or(value).trim().to_ascii_lowercase());
        if content_type.as_deref() != Some(PDF_CONTENT_TYPE) {
            return Err(AssistantError::UnsupportedFileType(format!(
                "content type {} is not {}",
                request.content_type.as_deref().unwrap_or("(none)"),
                PDF_CONTENT_TYPE
            )));
        }

        let has_pdf_extension = Path::new(&request.file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
        if !has_pdf_extension {
            return Err(AssistantError::UnsupportedFileType(format!(
                "{} does not have a .pdf extension",
                request.file_name
            )));
        }

        if request.file_data.is_empty() {
            return Err(AssistantError::UnsupportedFileType("file is empty".to_string()));
        }

        if request.file_data.len() > self.max_upload_bytes {
            return Err(AssistantError::PayloadTooLarge {
                limit: self.max_upload_bytes,
            });
        }

        if !request.file_data.starts_with(PDF_MAGIC) {
            return Err(AssistantError::UnsupportedFileType(
                "file content is not a PDF".to_string(),
            ));
        }

        Ok(())
    }
}
