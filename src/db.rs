use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};
use url::Url;

use crate::entities::document;
use crate::error::AppError;

pub fn resolve_state_path(data_dir: &Path) -> PathBuf {
    data_dir.join("covey.json")
}

pub fn resolve_db_path(data_dir: &Path) -> PathBuf {
    data_dir.join("covey.db")
}

pub fn resolve_drive_dir(data_dir: &Path) -> PathBuf {
    data_dir.join("drive")
}

pub fn ensure_parent_dir(path: &Path) -> Result<(), AppError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

/// Advisory lock file next to `path`, shared by every backend in the same directory.
pub fn open_lock(path: &Path) -> Result<fd_lock::RwLock<File>, AppError> {
    let lock_path = path.with_extension("lock");
    let file = OpenOptions::new()
        .create(true)
        .read(true)
        .write(true)
        .truncate(false)
        .open(lock_path)?;
    Ok(fd_lock::RwLock::new(file))
}

pub async fn connect(path: &Path) -> Result<DatabaseConnection, AppError> {
    let mut url = Url::from_file_path(path)
        .map_err(|_| AppError::InvalidInput(format!("invalid sqlite path: {}", path.display())))?;
    url.set_query(Some("mode=rwc"));
    let sqlite_url = url.as_str().replacen("file://", "sqlite://", 1);
    Ok(Database::connect(&sqlite_url).await?)
}

pub async fn ensure_schema(db: &DatabaseConnection) -> Result<(), AppError> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut document_stmt = schema.create_table_from_entity(document::Entity);
    document_stmt.if_not_exists();
    db.execute(builder.build(&document_stmt)).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn backends_share_one_lock_file() {
        let dir = TempDir::new().expect("temp dir");
        let state = resolve_state_path(dir.path());
        let db = resolve_db_path(dir.path());
        assert_eq!(state.with_extension("lock"), db.with_extension("lock"));

        let mut lock = open_lock(&state).expect("open lock");
        let _guard = lock.write().expect("write lock");
        assert!(dir.path().join("covey.lock").exists());
    }

    #[tokio::test]
    async fn schema_creation_is_repeatable() {
        let dir = TempDir::new().expect("temp dir");
        let path = resolve_db_path(&dir.path().join("nested"));
        ensure_parent_dir(&path).expect("ensure parent");
        let db = connect(&path).await.expect("connect db");
        ensure_schema(&db).await.expect("first schema");
        ensure_schema(&db).await.expect("second schema");
        assert!(path.exists());
    }
}
