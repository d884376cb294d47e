// src/db/session_repo.rs

use chrono::{DateTime, Utc};
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{common::error::AppError, models::auth::Session};

// Sessões de refresh token. Uma linha por par emitido; o refresh consome a
// linha antiga e grava uma nova (rotação).
#[derive(Clone)]
pub struct SessionRepository {
    pool: PgPool,
}

impl SessionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        refresh_token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<Session, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let session = sqlx::query_as::<_, Session>(
            r#"
            INSERT INTO sessions (user_id, refresh_token, expires_at)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(refresh_token)
        .bind(expires_at)
        .fetch_one(executor)
        .await?;
        Ok(session)
    }

    // Consome a sessão de forma atômica: dois refreshes concorrentes com o
    // mesmo token fazem só um DELETE devolver a linha.
    pub async fn take_by_token<'e, E>(
        &self,
        executor: E,
        refresh_token: &str,
    ) -> Result<Option<Session>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let session = sqlx::query_as::<_, Session>(
            "DELETE FROM sessions WHERE refresh_token = $1 RETURNING *",
        )
        .bind(refresh_token)
        .fetch_optional(executor)
        .await?;
        Ok(session)
    }

    pub async fn delete_by_token(&self, refresh_token: &str) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM sessions WHERE refresh_token = $1")
            .bind(refresh_token)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    // Limpeza oportunista das sessões vencidas
    pub async fn delete_expired(&self) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at < NOW()")
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
