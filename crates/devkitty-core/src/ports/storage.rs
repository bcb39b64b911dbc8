//! Storage trait for live question backends

use crate::Result;
use async_trait::async_trait;
use devkitty_types::{Question, QuestionId};

/// A live persistence backend (relational or document store).
///
/// Implementations report every failure as an error; absorbing failures into
/// fail-soft results is the caller's job.
#[async_trait]
pub trait QuestionBackend: Send + Sync {
    /// Short driver name used in logs
    fn kind(&self) -> &'static str;

    /// Create the `questions` container if it does not exist
    async fn ensure_schema(&self) -> Result<()>;

    /// Check that the `questions` container exists and is readable
    async fn probe(&self) -> Result<()> {
        self.count().await.map(|_| ())
    }

    async fn insert(&self, question: &Question) -> Result<()>;

    /// All records, most recently created first
    async fn list(&self) -> Result<Vec<Question>>;

    async fn count(&self) -> Result<u64>;

    /// Replace category and content. Returns the number of records touched.
    async fn update(&self, id: &QuestionId, category: &str, content: &str) -> Result<u64>;

    /// Returns the number of records removed.
    async fn delete(&self, id: &QuestionId) -> Result<u64>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DevKittyError;

    struct MissingTable;

    #[async_trait]
    impl QuestionBackend for MissingTable {
        fn kind(&self) -> &'static str {
            "missing-table"
        }

        async fn ensure_schema(&self) -> Result<()> {
            Err(DevKittyError::Schema("permission denied".into()))
        }

        async fn insert(&self, _question: &Question) -> Result<()> {
            Err(DevKittyError::Database("no such table: questions".into()))
        }

        async fn list(&self) -> Result<Vec<Question>> {
            Err(DevKittyError::Database("no such table: questions".into()))
        }

        async fn count(&self) -> Result<u64> {
            Err(DevKittyError::Database("no such table: questions".into()))
        }

        async fn update(&self, _id: &QuestionId, _category: &str, _content: &str) -> Result<u64> {
            Err(DevKittyError::Database("no such table: questions".into()))
        }

        async fn delete(&self, _id: &QuestionId) -> Result<u64> {
            Err(DevKittyError::Database("no such table: questions".into()))
        }
    }

    #[test]
    fn test_default_probe_uses_count() {
        let backend: Box<dyn QuestionBackend> = Box::new(MissingTable);
        let result = tokio_test::block_on(backend.probe());
        assert!(matches!(result, Err(DevKittyError::Database(_))));
    }
}
