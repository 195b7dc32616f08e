//! In-memory task store (tests, dry runs).

use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use crate::domain::Task;
use crate::error::StoreError;
use crate::ports::TaskStore;

#[derive(Debug, Default)]
pub struct MemoryStore {
    saved: Mutex<Option<Vec<Task>>>,
    saves: Mutex<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-filled with `tasks`, as if saved by an earlier run.
    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        Self {
            saved: Mutex::new(Some(tasks)),
            saves: Mutex::new(0),
        }
    }

    /// Number of `save` calls so far.
    pub fn save_count(&self) -> usize {
        *self.saves.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn saved(&self) -> Option<Vec<Task>> {
        self.saved
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl TaskStore for MemoryStore {
    async fn save(&self, tasks: &[Task]) -> Result<(), StoreError> {
        *self.saved.lock().unwrap_or_else(PoisonError::into_inner) = Some(tasks.to_vec());
        *self.saves.lock().unwrap_or_else(PoisonError::into_inner) += 1;
        Ok(())
    }

    async fn load(&self) -> Result<Option<Vec<Task>>, StoreError> {
        Ok(self.saved())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn empty_store_loads_nothing() {
        assert!(MemoryStore::new().load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn save_replaces_previous_collection() {
        let store = MemoryStore::with_tasks(vec![Task::new(1, "a", 3)]);
        store.save(&[Task::new(2, "b", 3)]).await.unwrap();

        let loaded = store.load().await.unwrap().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].description, "b");
        assert_eq!(store.save_count(), 1);
    }
}
