//! Persistence backends for the serialized tree.

mod file;
mod sqlite;

use std::path::Path;

pub use file::FileStorage;
pub use sqlite::SqliteStorage;

use crate::config::Backend;
use crate::db;
use crate::error::AppError;
use crate::store::Persistence;

/// In-process storage, used by tests and as a scratch backend.
#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    text: Option<String>,
    writes: usize,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            writes: 0,
        }
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl Persistence for MemoryStorage {
    async fn read(&self) -> Result<Option<String>, AppError> {
        Ok(self.text.clone())
    }

    async fn write(&mut self, text: &str) -> Result<(), AppError> {
        self.text = Some(text.to_string());
        self.writes += 1;
        Ok(())
    }
}

/// Backend chosen at runtime from the configuration.
pub enum StateStorage {
    File(FileStorage),
    Sqlite(SqliteStorage),
}

impl StateStorage {
    pub async fn open(backend: Backend, data_dir: &Path) -> Result<Self, AppError> {
        match backend {
            Backend::File => Ok(Self::File(FileStorage::new(db::resolve_state_path(data_dir)))),
            Backend::Sqlite => Ok(Self::Sqlite(
                SqliteStorage::open(&db::resolve_db_path(data_dir)).await?,
            )),
        }
    }

    pub fn backend(&self) -> Backend {
        match self {
            Self::File(_) => Backend::File,
            Self::Sqlite(_) => Backend::Sqlite,
        }
    }
}

impl Persistence for StateStorage {
    async fn read(&self) -> Result<Option<String>, AppError> {
        match self {
            Self::File(storage) => storage.read().await,
            Self::Sqlite(storage) => storage.read().await,
        }
    }

    async fn write(&mut self, text: &str) -> Result<(), AppError> {
        match self {
            Self::File(storage) => storage.write(text).await,
            Self::Sqlite(storage) => storage.write(text).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[tokio::test]
    async fn memory_storage_counts_writes() {
        let mut storage = MemoryStorage::new();
        assert_eq!(storage.read().await.expect("read"), None);
        storage.write("{}").await.expect("write");
        assert_eq!(storage.text(), Some("{}"));
        assert_eq!(storage.writes(), 1);
    }

    #[tokio::test]
    async fn state_storage_selects_backend() {
        let dir = TempDir::new().expect("temp dir");
        for backend in [Backend::File, Backend::Sqlite] {
            let mut storage = StateStorage::open(backend, dir.path()).await.expect("open");
            assert_eq!(storage.backend(), backend);
            assert_eq!(storage.read().await.expect("read"), None);
            storage.write("{\"roles\":[]}").await.expect("write");
            assert_eq!(
                storage.read().await.expect("read").as_deref(),
                Some("{\"roles\":[]}")
            );
        }
        assert!(dir.path().join("covey.json").exists());
        assert!(dir.path().join("covey.db").exists());
    }
}
