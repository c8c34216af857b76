use serde::{Deserialize, Serialize};

use crate::application::use_cases::AskQuestionResponse;
use crate::domain::entities::{ConversationTurn, SourceSnippet};

#[derive(Debug, Deserialize)]
pub struct ChatRequestDto {
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct SourceDto {
    pub page: i32,
    pub content: String,
}

impl From<SourceSnippet> for SourceDto {
    fn from(snippet: SourceSnippet) -> Self {
        Self {
            page: snippet.page,
            content: snippet.content,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnDto {
    pub role: String,
    pub content: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub cited_pages: Vec<i32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<SourceDto>,
    pub timestamp: String,
}

impl From<ConversationTurn> for TurnDto {
    fn from(turn: ConversationTurn) -> Self {
        Self {
            role: turn.role().to_string(),
            content: turn.content().to_string(),
            cited_pages: turn.cited_pages().to_vec(),
            sources: turn.sources().iter().cloned().map(SourceDto::from).collect(),
            timestamp: turn.created_at().to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AskResponseDto {
    pub answer: String,
    pub cited_pages: Vec<i32>,
    pub sources: Vec<SourceDto>,
    pub chat_history: Vec<TurnDto>,
}

impl From<AskQuestionResponse> for AskResponseDto {
    fn from(response: AskQuestionResponse) -> Self {
        Self {
            answer: response.answer,
            cited_pages: response.cited_pages,
            sources: response.sources.into_iter().map(SourceDto::from).collect(),
            chat_history: response.chat_history.into_iter().map(TurnDto::from).collect(),
        }
    }
}
