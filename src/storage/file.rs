use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::fs;

use crate::error::AppError;
use crate::store::Persistence;

/// JSON document on disk, replaced atomically on every write.
#[derive(Clone, Debug)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl Persistence for FileStorage {
    async fn read(&self) -> Result<Option<String>, AppError> {
        match fs::read_to_string(&self.path).await {
            Ok(text) => Ok(Some(text)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    async fn write(&mut self, text: &str) -> Result<(), AppError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }
        let temp = self.temp_path();
        fs::write(&temp, text).await?;
        fs::rename(&temp, &self.path).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[tokio::test]
    async fn missing_file_reads_as_none() {
        let dir = TempDir::new().expect("temp dir");
        let storage = FileStorage::new(dir.path().join("covey.json"));
        assert_eq!(storage.read().await.expect("read"), None);
    }

    #[tokio::test]
    async fn write_replaces_contents_without_leftovers() {
        let dir = TempDir::new().expect("temp dir");
        let mut storage = FileStorage::new(dir.path().join("nested").join("covey.json"));
        storage.write("first").await.expect("first write");
        storage.write("second").await.expect("second write");

        assert_eq!(storage.read().await.expect("read").as_deref(), Some("second"));
        assert!(!dir.path().join("nested").join("covey.json.tmp").exists());
        assert_eq!(storage.path().file_name().and_then(|name| name.to_str()), Some("covey.json"));
    }
}
