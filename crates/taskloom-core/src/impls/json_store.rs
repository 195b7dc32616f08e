//! JSON file task store.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;

use crate::domain::Task;
use crate::error::StoreError;
use crate::ports::TaskStore;

/// Stores the task collection as a pretty-printed JSON array.
///
/// Writes go to `<path>.tmp` first and are renamed over the target, so a
/// crash mid-write leaves the previous state intact.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.clone().into_os_string();
        name.push(".tmp");
        PathBuf::from(name)
    }
}

#[async_trait]
impl TaskStore for JsonFileStore {
    async fn save(&self, tasks: &[Task]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_string_pretty(tasks)?;
        let tmp = self.temp_path();
        fs::write(&tmp, json).await?;
        fs::rename(&tmp, &self.path).await?;
        tracing::debug!(path = %self.path.display(), tasks = tasks.len(), "task state saved");
        Ok(())
    }

    async fn load(&self) -> Result<Option<Vec<Task>>, StoreError> {
        match fs::read_to_string(&self.path).await {
            Ok(json) => Ok(Some(serde_json::from_str(&json)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{TaskStatus, WorkerName};
    use chrono::NaiveDate;

    #[tokio::test]
    async fn missing_file_loads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("state.json"));
        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn save_then_load_keeps_lifecycle_fields() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("nested").join("state.json"));

        let mut done = Task::new(1, "analyze data", 1)
            .with_deadline(NaiveDate::from_ymd_opt(2024, 9, 1).unwrap());
        done.try_assign(WorkerName::new("Jexi"));
        done.mark_completed();
        let mut failed = Task::new(2, "automation", 1);
        failed.try_assign(WorkerName::new("Nova"));
        failed.mark_error();
        let waiting = Task::new(3, "market research", 2).depends_on(1).depends_on(2);

        let tasks = vec![done, failed, waiting];
        store.save(&tasks).await.unwrap();

        let loaded = store.load().await.unwrap().unwrap();
        assert_eq!(loaded, tasks);
        assert_eq!(loaded[0].status, TaskStatus::Completed);
        assert!(loaded[0].is_completed);
        assert_eq!(loaded[1].status, TaskStatus::Error);
        assert!(!loaded[1].is_completed);
        assert_eq!(loaded[2].dependencies.len(), 2);
        assert!(!store.temp_path().exists());
    }

    #[tokio::test]
    async fn corrupt_file_is_a_json_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, "{not json").unwrap();
        let err = JsonFileStore::new(path).load().await.unwrap_err();
        assert!(matches!(err, StoreError::Json(_)));
    }
}
