//! Storage layer
//!
//! Live backends (SQLite embedded, PostgreSQL hosted) chosen once at startup
//! by the resolver, plus the in-memory fallback store.

pub mod memory;
pub mod postgres;
pub mod resolver;
pub mod sqlite;

pub use memory::MemoryStore;
pub use postgres::PostgresBackend;
pub use resolver::{BackendResolver, Resolution};
pub use sqlite::SqliteBackend;

use chrono::{DateTime, Utc};
use devkitty_core::{DevKittyError, Question};

// Helper struct for sqlx query_as
#[derive(sqlx::FromRow)]
struct QuestionRow {
    id: String,
    category: String,
    content: String,
    created_at: DateTime<Utc>,
}

impl From<QuestionRow> for Question {
    fn from(r: QuestionRow) -> Self {
        Question {
            id: r.id.into(),
            category: r.category,
            content: r.content,
            created_at: r.created_at,
        }
    }
}

fn database_error(e: sqlx::Error) -> DevKittyError {
    DevKittyError::Database(e.to_string())
}

fn schema_error(e: sqlx::Error) -> DevKittyError {
    DevKittyError::Schema(e.to_string())
}
