use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use std::sync::Arc;

use super::document_handler::parse_document_id;
use crate::application::errors::AssistantError;
use crate::application::use_cases::{
    AskQuestionRequest, AskQuestionUseCase, GetConversationUseCase,
};
use crate::presentation::http::dto::{ApiResponse, AskResponseDto, ChatRequestDto, TurnDto};
use crate::presentation::http::extractors::OwnerId;

pub struct ChatHandler {
    ask_use_case: Arc<AskQuestionUseCase>,
    history_use_case: Arc<GetConversationUseCase>,
}

impl ChatHandler {
    pub fn new(
        ask_use_case: Arc<AskQuestionUseCase>,
        history_use_case: Arc<GetConversationUseCase>,
    ) -> Self {
        Self {
            ask_use_case,
            history_use_case,
        }
    }

    pub async fn ask(
        State(handler): State<Arc<ChatHandler>>,
        OwnerId(owner_id): OwnerId,
        Path(document_id): Path<String>,
        body: Result<Json<ChatRequestDto>, JsonRejection>,
    ) -> Result<impl IntoResponse, AssistantError> {
        let document_id = parse_document_id(&document_id)?;
        let Json(body) = body.map_err(|e| AssistantError::ValidationError(e.body_text()))?;

        let request = AskQuestionRequest {
            document_id,
            owner_id,
            question: body.content,
        };
        let response = handler.ask_use_case.execute(request).await?;

        Ok((
            StatusCode::OK,
            Json(ApiResponse::success(AskResponseDto::from(response))),
        ))
    }

    pub async fn history(
        State(handler): State<Arc<ChatHandler>>,
        OwnerId(owner_id): OwnerId,
        Path(document_id): Path<String>,
    ) -> Result<impl IntoResponse, AssistantError> {
        let document_id = parse_document_id(&document_id)?;
        let turns: Vec<TurnDto> = handler
            .history_use_case
            .execute(document_id, &owner_id)
            .await?
            .into_iter()
            .map(TurnDto::from)
            .collect();

        Ok((StatusCode::OK, Json(ApiResponse::success(turns))))
    }
}
