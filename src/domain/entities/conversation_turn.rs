use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::value_objects::TurnRole;

/// A cited chunk, reduced to a short preview of its text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceSnippet {
    pub page: i32,
    pub content: String,
}

impl SourceSnippet {
    pub fn preview(page: i32, text: &str, max_chars: usize) -> Self {
        let mut content: String = text.chars().take(max_chars).collect();
        content.push_str("...");
        Self { page, content }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationTurn {
    id: Uuid,
    document_id: Uuid,
    sequence: i64,
    role: TurnRole,
    content: String,
    cited_pages: Vec<i32>,
    sources: Vec<SourceSnippet>,
    created_at: DateTime<Utc>,
}

impl ConversationTurn {
    pub fn user(document_id: Uuid, content: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            document_id,
            sequence: 0,
            role: TurnRole::User,
            content,
            cited_pages: Vec::new(),
            sources: Vec::new(),
            created_at: Utc::now(),
        }
    }

    pub fn assistant(
        document_id: Uuid,
        content: String,
        cited_pages: Vec<i32>,
        sources: Vec<SourceSnippet>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            document_id,
            sequence: 0,
            role: TurnRole::Assistant,
            content,
            cited_pages,
            sources,
            created_at: Utc::now(),
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub fn restore(
        id: Uuid,
        document_id: Uuid,
        sequence: i64,
        role: TurnRole,
        content: String,
        cited_pages: Vec<i32>,
        sources: Vec<SourceSnippet>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            document_id,
            sequence,
            role,
            content,
            cited_pages,
            sources,
            created_at,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn document_id(&self) -> Uuid {
        self.document_id
    }

    /// Position in the document's history; assigned by the store on append.
    pub fn sequence(&self) -> i64 {
        self.sequence
    }

    pub fn role(&self) -> TurnRole {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn cited_pages(&self) -> &[i32] {
        &self.cited_pages
    }

    pub fn sources(&self) -> &[SourceSnippet] {
        &self.sources
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn with_sequence(mut self, sequence: i64) -> Self {
        self.sequence = sequence;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_is_bounded() {
        let text = "a".repeat(400);
        let snippet = SourceSnippet::preview(3, &text, 150);

        assert_eq!(snippet.page, 3);
        assert_eq!(snippet.content.chars().count(), 153);
        assert!(snippet.content.ends_with("..."));
    }

    #[test]
    fn test_preview_of_short_text() {
        let snippet = SourceSnippet::preview(1, "Short", 150);
        assert_eq!(snippet.content, "Short...");
    }

    #[test]
    fn test_user_turn_has_no_citations() {
        let turn = ConversationTurn::user(Uuid::new_v4(), "What is osmosis?".to_string());

        assert_eq!(turn.role(), TurnRole::User);
        assert!(turn.cited_pages().is_empty());
        assert!(turn.sources().is_empty());
        assert_eq!(turn.sequence(), 0);
    }

    #[test]
    fn test_assistant_turn_keeps_citations() {
        let turn = ConversationTurn::assistant(
            Uuid::new_v4(),
            "Osmosis is ...".to_string(),
            vec![1, 4],
            vec![SourceSnippet::preview(1, "Osmosis", 150)],
        )
        .with_sequence(7);

        assert_eq!(turn.role(), TurnRole::Assistant);
        assert_eq!(turn.cited_pages(), &[1, 4]);
        assert_eq!(turn.sequence(), 7);
    }
}
