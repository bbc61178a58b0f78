//! Remote document drive contract and a folder-backed implementation.
//!
//! Everything fetched from a drive goes through the same validation as a
//! file import, so a bad remote document never reaches the live tree.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use log::info;
use tokio::fs;

use crate::error::AppError;
use crate::store::{Persistence, Store};

pub const DEFAULT_DOCUMENT_NAME: &str = "kanban-covey.json";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DriveDocument {
    pub id: String,
    pub name: String,
    pub modified: DateTime<Utc>,
}

#[allow(async_fn_in_trait)]
pub trait RemoteDrive {
    /// JSON documents only, most recently modified first.
    async fn list_documents(&self) -> Result<Vec<DriveDocument>, AppError>;
    async fn fetch(&self, id: &str) -> Result<String, AppError>;
    /// Updates `existing_id` in place when given, otherwise creates a new document.
    async fn upload(
        &self,
        name: &str,
        content: &str,
        existing_id: Option<&str>,
    ) -> Result<String, AppError>;
}

/// Drive backed by a local directory; document ids are file names.
#[derive(Clone, Debug)]
pub struct FolderDrive {
    root: PathBuf,
}

impl FolderDrive {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn document_path(&self, id: &str) -> Result<PathBuf, AppError> {
        let trimmed = id.trim();
        let plain = !trimmed.is_empty()
            && trimmed != "."
            && trimmed != ".."
            && !trimmed.contains(['/', '\\']);
        if !plain {
            return Err(AppError::InvalidInput(format!(
                "invalid drive document id `{id}`"
            )));
        }
        Ok(self.root.join(trimmed))
    }

    async fn unused_name(&self, name: &str) -> Result<String, AppError> {
        let base = name.trim().trim_end_matches(".json");
        let base = if base.is_empty() {
            DEFAULT_DOCUMENT_NAME.trim_end_matches(".json")
        } else {
            base
        };
        let mut candidate = format!("{base}.json");
        let mut counter = 1;
        while fs::try_exists(self.document_path(&candidate)?).await? {
            counter += 1;
            candidate = format!("{base}-{counter}.json");
        }
        Ok(candidate)
    }
}

impl RemoteDrive for FolderDrive {
    async fn list_documents(&self) -> Result<Vec<DriveDocument>, AppError> {
        let mut entries = match fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };

        let mut documents = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name().to_string_lossy().into_owned();
            if !name.ends_with(".json") {
                continue;
            }
            let metadata = entry.metadata().await?;
            if !metadata.is_file() {
                continue;
            }
            documents.push(DriveDocument {
                id: name.clone(),
                name,
                modified: DateTime::<Utc>::from(metadata.modified()?),
            });
        }
        documents.sort_by(|a, b| b.modified.cmp(&a.modified).then_with(|| a.name.cmp(&b.name)));
        Ok(documents)
    }

    async fn fetch(&self, id: &str) -> Result<String, AppError> {
        let path = self.document_path(id)?;
        match fs::read_to_string(&path).await {
            Ok(text) => Ok(text),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                Err(AppError::NotFound(format!("drive document {id}")))
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn upload(
        &self,
        name: &str,
        content: &str,
        existing_id: Option<&str>,
    ) -> Result<String, AppError> {
        fs::create_dir_all(&self.root).await?;
        let id = match existing_id {
            Some(id) => {
                if !fs::try_exists(self.document_path(id)?).await? {
                    return Err(AppError::NotFound(format!("drive document {id}")));
                }
                id.trim().to_string()
            }
            None => self.unused_name(name).await?,
        };
        let path = self.document_path(&id)?;
        let temp = self.root.join(format!(".{id}.tmp"));
        fs::write(&temp, content).await?;
        fs::rename(&temp, &path).await?;
        Ok(id)
    }
}

/// Replaces the store's tree with a drive document.
pub async fn open_from_drive<P, D>(store: &mut Store<P>, drive: &D, id: &str) -> Result<(), AppError>
where
    P: Persistence,
    D: RemoteDrive,
{
    let text = drive.fetch(id).await?;
    store.import_document(&text).await?;
    info!("event=drive_opened module=drive status=ok id={}", id);
    Ok(())
}

/// Uploads the pretty-printed tree and returns the document id.
pub async fn save_to_drive<P, D>(
    store: &Store<P>,
    drive: &D,
    name: &str,
    existing_id: Option<&str>,
) -> Result<String, AppError>
where
    P: Persistence,
    D: RemoteDrive,
{
    let text = store.serialize(true)?;
    let id = drive.upload(name, &text, existing_id).await?;
    info!(
        "event=drive_saved module=drive status=ok id={} bytes={}",
        id,
        text.len()
    );
    Ok(id)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use tempfile::TempDir;

    use super::*;
    use crate::edit::set_title;
    use crate::schema::create_seed_state;
    use crate::storage::MemoryStorage;
    use crate::store::MutateOptions;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 10).expect("date")
    }

    async fn open_store() -> Store<MemoryStorage> {
        let (store, _) = Store::open_on(MemoryStorage::new(), day())
            .await
            .expect("open store");
        store
    }

    #[tokio::test]
    async fn missing_folder_lists_nothing() {
        let dir = TempDir::new().expect("temp dir");
        let drive = FolderDrive::new(dir.path().join("drive"));
        assert!(drive.list_documents().await.expect("list").is_empty());
    }

    #[tokio::test]
    async fn save_then_open_round_trips() {
        let dir = TempDir::new().expect("temp dir");
        let drive = FolderDrive::new(dir.path());
        let mut store = open_store().await;
        let id = save_to_drive(&store, &drive, DEFAULT_DOCUMENT_NAME, None)
            .await
            .expect("save");
        assert_eq!(id, DEFAULT_DOCUMENT_NAME);

        store
            .try_mutate(|tree| set_title(tree, "1", "Changed"), MutateOptions::default())
            .await
            .expect("edit");
        open_from_drive(&mut store, &drive, &id).await.expect("open");
        assert_eq!(store.tree(), &create_seed_state(day()));
    }

    #[tokio::test]
    async fn new_uploads_never_overwrite() {
        let dir = TempDir::new().expect("temp dir");
        let drive = FolderDrive::new(dir.path());
        let first = drive.upload("plan", "{}", None).await.expect("first");
        let second = drive.upload("plan.json", "{}", None).await.expect("second");
        assert_eq!(first, "plan.json");
        assert_eq!(second, "plan-2.json");

        let updated = drive
            .upload("ignored", "{\"x\":1}", Some(&first))
            .await
            .expect("update");
        assert_eq!(updated, first);
        assert_eq!(drive.fetch(&first).await.expect("fetch"), "{\"x\":1}");
        assert_eq!(drive.list_documents().await.expect("list").len(), 2);
    }

    #[tokio::test]
    async fn invalid_remote_document_is_rejected() {
        let dir = TempDir::new().expect("temp dir");
        let drive = FolderDrive::new(dir.path());
        let id = drive.upload("broken", "{\"nextId\": 1}", None).await.expect("upload");
        let mut store = open_store().await;
        let before = store.snapshot();

        assert!(matches!(
            open_from_drive(&mut store, &drive, &id).await,
            Err(AppError::Invalid(_))
        ));
        assert_eq!(store.tree(), &before);
    }

    #[tokio::test]
    async fn ids_cannot_escape_the_folder() {
        let dir = TempDir::new().expect("temp dir");
        let drive = FolderDrive::new(dir.path());
        assert!(matches!(
            drive.fetch("../secret.json").await,
            Err(AppError::InvalidInput(_))
        ));
        assert!(matches!(
            drive.fetch("absent.json").await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            drive.upload("x", "{}", Some("absent.json")).await,
            Err(AppError::NotFound(_))
        ));
    }
}
