use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error::DatabaseError};
use uuid::Uuid;

use crate::domain::entities::ConversationTurn;
use crate::domain::repositories::{ConversationRepository, RepositoryError};
use crate::infrastructure::database::DbPool;
use crate::infrastructure::database::connection::with_connection;
use crate::infrastructure::database::models::{NewTurnModel, TurnModel};
use crate::infrastructure::database::schema::conversation_turns;

pub struct PostgresConversationRepository {
    pool: DbPool,
}

impl PostgresConversationRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ConversationRepository for PostgresConversationRepository {
    async fn append(&self, turn: &ConversationTurn) -> Result<ConversationTurn, RepositoryError> {
        let new_turn = NewTurnModel::try_from(turn)
            .map_err(|e| RepositoryError::ValidationError(e.to_string()))?;

        let document_id = turn.document_id();
        let model = with_connection(&self.pool, move |conn| {
            diesel::insert_into(conversation_turns::table)
                .values(&new_turn)
                .returning(TurnModel::as_returning())
                .get_result::<TurnModel>(conn)
                .map_err(|e| match e {
                    // The document was deleted between lookup and append.
                    DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
                        RepositoryError::NotFound(document_id)
                    }
                    e => RepositoryError::DatabaseError(e.to_string()),
                })
        })
        .await?;

        ConversationTurn::try_from(model).map_err(RepositoryError::ValidationError)
    }

    async fn history(&self, document_id: Uuid) -> Result<Vec<ConversationTurn>, RepositoryError> {
        let models = with_connection(&self.pool, move |conn| {
            conversation_turns::table
                .filter(conversation_turns::document_id.eq(document_id))
                .order(conversation_turns::sequence.asc())
                .select(TurnModel::as_select())
                .load::<TurnModel>(conn)
                .map_err(|e| RepositoryError::DatabaseError(e.to_string()))
        })
        .await?;

        models
            .into_iter()
            .map(|model| ConversationTurn::try_from(model).map_err(RepositoryError::ValidationError))
            .collect()
    }
}
