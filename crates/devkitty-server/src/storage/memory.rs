//! In-memory fallback store
//!
//! Process-lifetime collection used when no live backend is reachable, or
//! after a live write has failed.

use devkitty_core::{Question, QuestionId};
use tokio::sync::RwLock;

/// Ordered in-memory question collection.
///
/// Records are kept in insertion order; every mutation happens under the
/// write lock, so readers never observe a half-applied change.
#[derive(Default)]
pub struct MemoryStore {
    questions: RwLock<Vec<Question>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, question: Question) {
        self.questions.write().await.push(question);
    }

    /// Snapshot of all records, most recently created first
    pub async fn list(&self) -> Vec<Question> {
        self.questions.read().await.iter().rev().cloned().collect()
    }

    pub async fn count(&self) -> u64 {
        self.questions.read().await.len() as u64
    }

    /// Returns false when no record has the given id
    pub async fn update(&self, id: &QuestionId, category: &str, content: &str) -> bool {
        let mut questions = self.questions.write().await;
        match questions.iter_mut().find(|q| &q.id == id) {
            Some(question) => {
                question.revise(category, content);
                true
            }
            None => false,
        }
    }

    /// Returns false when no record has the given id
    pub async fn delete(&self, id: &QuestionId) -> bool {
        let mut questions = self.questions.write().await;
        let before = questions.len();
        questions.retain(|q| &q.id != id);
        questions.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_basic_operations() {
        let store = MemoryStore::new();

        let first = Question::new("HTML", "What does <!DOCTYPE html> do?");
        let second = Question::new("CSS", "Explain CSS specificity.");
        store.insert(first.clone()).await;
        store.insert(second.clone()).await;

        assert_eq!(store.count().await, 2);
        assert_eq!(store.list().await, vec![second.clone(), first.clone()]);

        assert!(store.delete(&first.id).await);
        assert!(!store.delete(&first.id).await);
        assert_eq!(store.list().await, vec![second]);
    }

    #[tokio::test]
    async fn test_update_in_place() {
        let store = MemoryStore::new();
        let question = Question::new("JavaScript", "What is a closure?");
        store.insert(question.clone()).await;

        assert!(store.update(&question.id, "React", "What is a hook?").await);

        let stored = store.list().await.remove(0);
        assert_eq!(stored.id, question.id);
        assert_eq!(stored.created_at, question.created_at);
        assert_eq!(stored.category, "React");
        assert_eq!(stored.content, "What is a hook?");
    }

    #[tokio::test]
    async fn test_missing_id_is_noop() {
        let store = MemoryStore::new();
        let question = Question::new("JavaScript", "What is a closure?");
        store.insert(question.clone()).await;

        let missing = QuestionId::from("does-not-exist");
        assert!(!store.update(&missing, "HTML", "Unused").await);
        assert!(!store.delete(&missing).await);
        assert_eq!(store.list().await, vec![question]);
    }

    #[test]
    fn test_list_is_restartable() {
        tokio_test::block_on(async {
            let store = MemoryStore::new();
            store.insert(Question::new("HTML", "What is srcset?")).await;

            let first = store.list().await;
            let second = store.list().await;
            assert_eq!(first, second);
        });
    }
}
