//! SQLite backend (embedded, no external dependencies)

use super::{database_error, schema_error, QuestionRow};
use async_trait::async_trait;
use devkitty_core::{DevKittyError, Question, QuestionBackend, QuestionId, Result};
use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
};
use sqlx::SqlitePool;
use std::str::FromStr;

pub struct SqliteBackend {
    pool: SqlitePool,
}

impl SqliteBackend {
    /// Open a pool for a `sqlite:` URL, creating the database file if missing.
    pub async fn connect(url: &str) -> Result<Self> {
        let mut options = SqliteConnectOptions::from_str(url)
            .map_err(|e| DevKittyError::ConnectionUnavailable(e.to_string()))?
            .create_if_missing(true);

        let pool_options = if is_memory_url(url) {
            // One connection that is never recycled: an in-memory database
            // lives exactly as long as its connection.
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            options = options
                .journal_mode(SqliteJournalMode::Wal)
                .synchronous(SqliteSynchronous::Normal);
            SqlitePoolOptions::new().max_connections(5)
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(|e| DevKittyError::ConnectionUnavailable(e.to_string()))?;

        Ok(Self { pool })
    }

    /// Close the pool; every later call fails.
    #[cfg(test)]
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

fn is_memory_url(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}

#[async_trait]
impl QuestionBackend for SqliteBackend {
    fn kind(&self) -> &'static str {
        "sqlite"
    }

    async fn ensure_schema(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS questions (
                id TEXT PRIMARY KEY,
                category TEXT NOT NULL,
                content TEXT NOT NULL,
                created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
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
            VALUES (?1, ?2, ?3, ?4)
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
            UPDATE questions SET category = ?1, content = ?2
            WHERE id = ?3
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
        let result = sqlx::query("DELETE FROM questions WHERE id = ?1")
            .bind(id.as_str())
            .execute(&self.pool)
            .await
            .map_err(database_error)?;

        Ok(result.rows_affected())
    }
}
