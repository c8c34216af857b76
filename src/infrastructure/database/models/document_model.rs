use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::entities::Document as DomainDocument;
use crate::domain::value_objects::{ContentHash, PdfPayload};
use crate::infrastructure::database::schema::documents;

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = documents)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct DocumentModel {
    pub id: Uuid,
    pub owner_id: String,
    pub title: String,
    pub content: String,
    pub page_count: i32,
    pub content_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = documents)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewDocumentModel {
    pub id: Uuid,
    pub owner_id: String,
    pub title: String,
    pub content: String,
    pub page_count: i32,
    pub content_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&DomainDocument> for NewDocumentModel {
    fn from(document: &DomainDocument) -> Self {
        Self {
            id: document.id(),
            owner_id: document.owner_id().to_string(),
            title: document.title().to_string(),
            content: document.payload().as_str().to_string(),
            page_count: document.page_count(),
            content_hash: document.content_hash().as_str().to_string(),
            created_at: document.created_at(),
            updated_at: document.updated_at(),
        }
    }
}

impl TryFrom<DocumentModel> for DomainDocument {
    type Error = String;

    fn try_from(model: DocumentModel) -> Result<Self, Self::Error> {
        let content_hash =
            ContentHash::new(model.content_hash).map_err(|e| format!("Invalid content hash: {}", e))?;

        Ok(DomainDocument::restore(
            model.id,
            model.owner_id,
            model.title,
            PdfPayload::from_stored(model.content),
            model.page_count,
            content_hash,
            model.created_at,
            model.updated_at,
        ))
    }
}
