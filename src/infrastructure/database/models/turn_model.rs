use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::entities::{ConversationTurn, SourceSnippet};
use crate::domain::value_objects::TurnRole;
use crate::infrastructure::database::schema::conversation_turns;

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Associations)]
#[diesel(belongs_to(super::DocumentModel, foreign_key = document_id))]
#[diesel(table_name = conversation_turns)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TurnModel {
    pub id: Uuid,
    pub sequence: i64,
    pub document_id: Uuid,
    pub role: String,
    pub content: String,
    pub cited_pages: serde_json::Value,
    pub sources: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

/// `sequence` is omitted; the database assigns it.
#[derive(Debug, Insertable)]
#[diesel(table_name = conversation_turns)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewTurnModel {
    pub id: Uuid,
    pub document_id: Uuid,
    pub role: String,
    pub content: String,
    pub cited_pages: serde_json::Value,
    pub sources: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<&ConversationTurn> for NewTurnModel {
    type Error = serde_json::Error;

    fn try_from(turn: &ConversationTurn) -> Result<Self, Self::Error> {
        Ok(Self {
            id: turn.id(),
            document_id: turn.document_id(),
            role: turn.role().as_str().to_string(),
            content: turn.content().to_string(),
            cited_pages: serde_json::to_value(turn.cited_pages())?,
            sources: serde_json::to_value(turn.sources())?,
            created_at: turn.created_at(),
        })
    }
}

impl TryFrom<TurnModel> for ConversationTurn {
    type Error = String;

    fn try_from(model: TurnModel) -> Result<Self, Self::Error> {
        let role = TurnRole::from_string(&model.role)?;
        let cited_pages: Vec<i32> = serde_json::from_value(model.cited_pages)
            .map_err(|e| format!("Invalid cited pages: {}", e))?;
        let sources: Vec<SourceSnippet> = serde_json::from_value(model.sources)
            .map_err(|e| format!("Invalid sources: {}", e))?;

        Ok(ConversationTurn::restore(
            model.id,
            model.document_id,
            model.sequence,
            role,
            model.content,
            cited_pages,
            sources,
            model.created_at,
        ))
    }
}
