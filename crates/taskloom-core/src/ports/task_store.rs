//! TaskStore port - persistence collaborator.

use async_trait::async_trait;

use crate::domain::Task;
use crate::error::StoreError;

/// TaskStore persists the whole task collection.
///
/// Dependencies are stored as ids, so `load` returns tasks whose links
/// resolve against each other once they are back on a board.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Replace the stored collection with `tasks`.
    async fn save(&self, tasks: &[Task]) -> Result<(), StoreError>;

    /// `Ok(None)` when nothing has been saved yet.
    async fn load(&self) -> Result<Option<Vec<Task>>, StoreError>;
}
