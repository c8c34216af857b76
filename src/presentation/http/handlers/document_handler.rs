use axum::{
    Json,
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::application::errors::AssistantError;
use crate::application::use_cases::{
    DeleteDocumentUseCase, GetDocumentChunksRequest, GetDocumentChunksUseCase, GetDocumentUseCase,
    IngestDocumentRequest, IngestDocumentUseCase, ListDocumentsUseCase,
};
use crate::presentation::http::dto::{
    ApiResponse, DeletedDocumentDto, DocumentChunksDto, DocumentContentDto, DocumentSummaryDto,
    PaginationDto,
};
use crate::presentation::http::extractors::OwnerId;

/// Multipart field carrying the uploaded file.
pub const UPLOAD_FIELD: &str = "pdf";

pub fn parse_document_id(raw: &str) -> Result<Uuid, AssistantError> {
    Uuid::parse_str(raw)
        .map_err(|_| AssistantError::ValidationError(format!("Invalid document id: {}", raw)))
}

pub struct DocumentHandler {
    ingest_use_case: Arc<IngestDocumentUseCase>,
    list_use_case: Arc<ListDocumentsUseCase>,
    get_use_case: Arc<GetDocumentUseCase>,
    delete_use_case: Arc<DeleteDocumentUseCase>,
    chunks_use_case: Arc<GetDocumentChunksUseCase>,
}

impl DocumentHandler {
    pub fn new(
        ingest_use_case: Arc<IngestDocumentUseCase>,
        list_use_case: Arc<ListDocumentsUseCase>,
        get_use_case: Arc<GetDocumentUseCase>,
        delete_use_case: Arc<DeleteDocumentUseCase>,
        chunks_use_case: Arc<GetDocumentChunksUseCase>,
    ) -> Self {
        Self {
            ingest_use_case,
            list_use_case,
            get_use_case,
            delete_use_case,
            chunks_use_case,
        }
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.ingest_use_case.max_upload_bytes()
    }

    pub async fn upload(
        State(handler): State<Arc<DocumentHandler>>,
        OwnerId(owner_id): OwnerId,
        mut multipart: Multipart,
    ) -> Result<impl IntoResponse, AssistantError> {
        let limit = handler.max_upload_bytes();
        let multipart_error = |e: axum::extract::multipart::MultipartError| {
            if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
                AssistantError::PayloadTooLarge { limit }
            } else {
                AssistantError::ValidationError(format!("Invalid multipart body: {}", e.body_text()))
            }
        };

        while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
            if field.name() != Some(UPLOAD_FIELD) {
                continue;
            }

            let file_name = field.file_name().unwrap_or_default().to_string();
            let content_type = field.content_type().map(|ct| ct.to_string());
            let file_data = field.bytes().await.map_err(multipart_error)?.to_vec();

            let request = IngestDocumentRequest {
                owner_id,
                file_name,
                content_type,
                file_data,
            };
            let summary = handler.ingest_use_case.execute(request).await?;

            return Ok((
                StatusCode::CREATED,
                Json(ApiResponse::success(DocumentSummaryDto::from(summary))),
            ));
        }

        Err(AssistantError::ValidationError(format!(
            "No file provided in the '{}' field",
            UPLOAD_FIELD
        )))
    }

    pub async fn list(
        State(handler): State<Arc<DocumentHandler>>,
        OwnerId(owner_id): OwnerId,
    ) -> Result<impl IntoResponse, AssistantError> {
        let documents: Vec<DocumentSummaryDto> = handler
            .list_use_case
            .execute(&owner_id)
            .await?
            .into_iter()
            .map(DocumentSummaryDto::from)
            .collect();

        Ok((StatusCode::OK, Json(ApiResponse::success(documents))))
    }

    pub async fn get(
        State(handler): State<Arc<DocumentHandler>>,
        OwnerId(owner_id): OwnerId,
        Path(document_id): Path<String>,
    ) -> Result<impl IntoResponse, AssistantError> {
        let document_id = parse_document_id(&document_id)?;
        let response = handler.get_use_case.execute(document_id, &owner_id).await?;

        Ok((
            StatusCode::OK,
            Json(ApiResponse::success(DocumentContentDto::from(response))),
        ))
    }

    pub async fn delete(
        State(handler): State<Arc<DocumentHandler>>,
        OwnerId(owner_id): OwnerId,
        Path(document_id): Path<String>,
    ) -> Result<impl IntoResponse, AssistantError> {
        let document_id = parse_document_id(&document_id)?;
        handler.delete_use_case.execute(document_id, &owner_id).await?;

        Ok((
            StatusCode::OK,
            Json(ApiResponse::success(DeletedDocumentDto {
                id: document_id,
                message: "PDF deleted successfully".to_string(),
            })),
        ))
    }

    pub async fn chunks(
        State(handler): State<Arc<DocumentHandler>>,
        OwnerId(owner_id): OwnerId,
        Path(document_id): Path<String>,
        Query(pagination): Query<PaginationDto>,
    ) -> Result<impl IntoResponse, AssistantError> {
        let request = GetDocumentChunksRequest {
            document_id: parse_document_id(&document_id)?,
            owner_id,
            skip: pagination.skip,
            limit: pagination.limit,
        };
        let response = handler.chunks_use_case.execute(request).await?;

        Ok((
            StatusCode::OK,
            Json(ApiResponse::success(DocumentChunksDto::from(response))),
        ))
    }
}
