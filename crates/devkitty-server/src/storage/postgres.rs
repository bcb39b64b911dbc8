//! PostgreSQL backend

use super::{database_error, schema_error, QuestionRow};
use async_trait::async_trait;
use devkitty_core::{DevKittyError, Question, QuestionBackend, QuestionId, Result};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode};
use sqlx::PgPool;
use std::str::FromStr;
use std::time::Duration;

pub struct PostgresBackend {
    pool: PgPool,
}

impl PostgresBackend {
    /// Open a pool for a `postgres://` URL.
    ///
    /// With `accept_invalid_certs` the connection is encrypted but the server
    /// certificate is not validated (`sslmode=require`).
    pub async fn connect(
        url: &str,
        accept_invalid_certs: bool,
        acquire_timeout: Duration,
    ) -> Result<Self> {
        let options = connect_options(url, accept_invalid_certs)?;

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .acquire_timeout(acquire_timeout)
            .connect_with(options)
            .await
            .map_err(|e| DevKittyError::ConnectionUnavailable(e.to_string()))?;

        Ok(Self { pool })
    }
}

fn connect_options(url: &str, accept_invalid_certs: bool) -> Result<PgConnectOptions> {
    let options = PgConnectOptions::from_str(url)
        .map_err(|e| DevKittyError::ConnectionUnavailable(e.to_string()))?;

    Ok(if accept_invalid_certs {
        options.ssl_mode(PgSslMode::Require)
    } else {
        options
    })
}

#[async_trait]
impl QuestionBackend for PostgresBackend {
    fn kind(&self) -> &'static str {
        "postgres"
    }

    async fn ensure_schema(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS questions (
                id TEXT PRIMARY KEY,
                category TEXT NOT NULL,
                content TEXT NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT now()
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(schema_error)?;

        Ok(())
    }

    async fn insert(&self, question: &Question) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO questions (id, category, content, created_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(question.id.as_str())
        .bind(&question.category)
        .bind(&question.content)
        .bind(question.created_at)
        .execute(&self.pool)
        .await
        .map_err(database_error)?;

        Ok(())
    }

    async fn list(&self) -> Result<Vec<Question>> {
        let rows: Vec<QuestionRow> = sqlx::query_as(
            r#"
            SELECT id, category, content, created_at
            FROM questions
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(database_error)?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    async fn count(&self) -> Result<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM questions")
            .fetch_one(&self.pool)
            .await
            .map_err(database_error)?;

        Ok(count.max(0) as u64)
    }

    async fn update(&self, id: &QuestionId, category: &str, content: &str) -> Result<u64> {
        let result = sqlx::query(
            r#"
            UPDATE questions SET category = $1, content = $2
            WHERE id = $3
            "#,
        )
        .bind(category)
        .bind(content)
        .bind(id.as_str())
        .execute(&self.pool)
        .await
        .map_err(database_error)?;

        Ok(result.rows_affected())
    }

    async fn delete(&self, id: &QuestionId) -> Result<u64> {
        let result = sqlx::query("DELETE FROM questions WHERE id = $1")
            .bind(id.as_str())
            .execute(&self.pool)
            .await
            .map_err(database_error)?;

        Ok(result.rows_affected())
    }
}
