use crate::error::CoreError;
use crate::models::Task;
use async_trait::async_trait;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Fixed key under which the whole task collection is stored.
pub const TASKS_KEY: &str = "TASKS";

/// Key-value persistence the planner writes through.
#[async_trait]
pub trait StorageProvider: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, CoreError>;
    async fn set(&self, key: &str, value: &str) -> Result<(), CoreError>;
}

/// Stores each key as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

#[async_trait]
impl StorageProvider for FileStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, CoreError> {
        match tokio::fs::read_to_string(self.path_for(key)).await {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), CoreError> {
        if !self.dir.exists() {
            tokio::fs::create_dir_all(&self.dir).await?;
        }
        tokio::fs::write(self.path_for(key), value).await?;
        Ok(())
    }
}

/// In-process storage; nothing outlives the value.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StorageProvider for MemoryStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, CoreError> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), CoreError> {
        self.entries
            .lock()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Reads the persisted collection. Any read or parse failure is logged and
/// yields an empty collection.
pub async fn load_tasks(storage: &impl StorageProvider) -> Vec<Task> {
    let raw = match storage.get(TASKS_KEY).await {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(e) => {
            warn!("cannot read stored tasks: {e}");
            return Vec::new();
        }
    };

    match serde_json::from_str::<Vec<Task>>(&raw) {
        Ok(tasks) => {
            debug!("loaded {} tasks", tasks.len());
            tasks
        }
        Err(e) => {
            warn!("stored tasks are not readable, starting empty: {e}");
            Vec::new()
        }
    }
}

/// Writes the entire collection. Returns `false` when the write failed;
/// the failure is logged, never propagated.
pub async fn save_tasks(storage: &impl StorageProvider, tasks: &[Task]) -> bool {
    let serialized = match serde_json::to_string(tasks) {
        Ok(s) => s,
        Err(e) => {
            warn!("cannot serialize tasks: {e}");
            return false;
        }
    };
    match storage.set(TASKS_KEY, &serialized).await {
        Ok(()) => true,
        Err(e) => {
            warn!("cannot persist tasks: {e}");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewTaskData;
    use crate::store::TaskStore;
    use tempfile::TempDir;

    /// Provider whose every call fails.
    struct Unavailable;

    #[async_trait]
    impl StorageProvider for Unavailable {
        async fn get(&self, _key: &str) -> Result<Option<String>, CoreError> {
            Err(CoreError::Io(std::io::Error::other("disk gone")))
        }

        async fn set(&self, _key: &str, _value: &str) -> Result<(), CoreError> {
            Err(CoreError::Io(std::io::Error::other("disk gone")))
        }
    }

    #[tokio::test]
    async fn test_file_storage_missing_key_is_none() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path().join("not-yet"));
        assert_eq!(storage.get(TASKS_KEY).await.unwrap(), None);

        storage.set(TASKS_KEY, "[]").await.unwrap();
        assert!(storage.path_for(TASKS_KEY).ends_with("not-yet/TASKS.json"));
        assert_eq!(storage.get(TASKS_KEY).await.unwrap().as_deref(), Some("[]"));
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let storage = MemoryStorage::new();
        let mut store = TaskStore::new();
        store.add(NewTaskData::titled("one"));
        store.add(NewTaskData::titled("two"));

        assert!(save_tasks(&storage, store.tasks()).await);
        assert_eq!(load_tasks(&storage).await, store.tasks());
    }

    #[tokio::test]
    async fn test_failures_are_swallowed() {
        assert!(load_tasks(&Unavailable).await.is_empty());
        assert!(!save_tasks(&Unavailable, &[]).await);

        let storage = MemoryStorage::new();
        storage.set(TASKS_KEY, r#"{"id": 1}"#).await.unwrap();
        assert!(load_tasks(&storage).await.is_empty());
    }
}
