use async_trait::async_trait;
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::entities::{ContentChunk, Document};
use crate::domain::repositories::{DocumentRepository, RepositoryError};
use crate::infrastructure::database::DbPool;
use crate::infrastructure::database::connection::with_connection;
use crate::infrastructure::database::models::{
    ChunkModel, DocumentModel, NewChunkModel, NewDocumentModel,
};
use crate::infrastructure::database::schema::{document_chunks, documents};

pub struct PostgresDocumentRepository {
    pool: DbPool,
}

impl PostgresDocumentRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn database_error(e: diesel::result::Error) -> RepositoryError {
    RepositoryError::DatabaseError(e.to_string())
}

fn to_domain(model: DocumentModel) -> Result<Document, RepositoryError> {
    Document::try_from(model).map_err(RepositoryError::ValidationError)
}

#[async_trait]
impl DocumentRepository for PostgresDocumentRepository {
    async fn save_with_chunks(
        &self,
        document: &Document,
        chunks: &[ContentChunk],
    ) -> Result<(), RepositoryError> {
        let new_document = NewDocumentModel::from(document);
        let new_chunks: Vec<NewChunkModel> = chunks.iter().map(NewChunkModel::from).collect();

        with_connection(&self.pool, move |conn| {
            conn.transaction::<_, diesel::result::Error, _>(|conn| {
                diesel::insert_into(documents::table)
                    .values(&new_document)
                    .execute(conn)?;

                // Postgres caps bind parameters per statement.
                for batch in new_chunks.chunks(1000) {
                    diesel::insert_into(document_chunks::table)
                        .values(batch)
                        .execute(conn)?;
                }
                Ok(())
            })
            .map_err(database_error)
        })
        .await
    }

    async fn find_owned(
        &self,
        id: Uuid,
        owner_id: &str,
    ) -> Result<Option<Document>, RepositoryError> {
        let owner_id = owner_id.to_string();

        let model = with_connection(&self.pool, move |conn| {
            documents::table
                .filter(documents::id.eq(id))
                .filter(documents::owner_id.eq(owner_id))
                .select(DocumentModel::as_select())
                .first::<DocumentModel>(conn)
                .optional()
                .map_err(database_error)
        })
        .await?;

        model.map(to_domain).transpose()
    }

    async fn list_by_owner(&self, owner_id: &str) -> Result<Vec<Document>, RepositoryError> {
        let owner_id = owner_id.to_string();

        let models = with_connection(&self.pool, move |conn| {
            documents::table
                .filter(documents::owner_id.eq(owner_id))
                .order((documents::created_at.desc(), documents::id.asc()))
                .select(DocumentModel::as_select())
                .load::<DocumentModel>(conn)
                .map_err(database_error)
        })
        .await?;

        models.into_iter().map(to_domain).collect()
    }

    async fn delete_owned(&self, id: Uuid, owner_id: &str) -> Result<bool, RepositoryError> {
        let owner_id = owner_id.to_string();

        // Chunks and turns go with the row through ON DELETE CASCADE.
        let deleted_count = with_connection(&self.pool, move |conn| {
            diesel::delete(
                documents::table
                    .filter(documents::id.eq(id))
                    .filter(documents::owner_id.eq(owner_id)),
            )
            .execute(conn)
            .map_err(database_error)
        })
        .await?;

        Ok(deleted_count > 0)
    }

    async fn find_chunks_paginated(
        &self,
        document_id: Uuid,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<ContentChunk>, RepositoryError> {
        let models = with_connection(&self.pool, move |conn| {
            document_chunks::table
                .filter(document_chunks::document_id.eq(document_id))
                .order(document_chunks::chunk_index.asc())
                .offset(skip)
                .limit(limit)
                .select(ChunkModel::as_select())
                .load::<ChunkModel>(conn)
                .map_err(database_error)
        })
        .await?;

        Ok(models.into_iter().map(ContentChunk::from).collect())
    }

    async fn count_chunks(&self, document_id: Uuid) -> Result<i64, RepositoryError> {
        with_connection(&self.pool, move |conn| {
            document_chunks::table
                .filter(document_chunks::document_id.eq(document_id))
                .count()
                .get_result::<i64>(conn)
                .map_err(database_error)
        })
        .await
    }
}
