use std::path::Path;

use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::{DatabaseConnection, EntityTrait, Set};

use crate::db;
use crate::entities::document;
use crate::error::AppError;
use crate::store::{Persistence, STORAGE_KEY};

/// Tree stored as one row of the `documents` table.
pub struct SqliteStorage {
    db: DatabaseConnection,
    key: String,
}

impl SqliteStorage {
    pub async fn open(path: &Path) -> Result<Self, AppError> {
        db::ensure_parent_dir(path)?;
        let db = db::connect(path).await?;
        db::ensure_schema(&db).await?;
        Ok(Self::new(db))
    }

    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            key: STORAGE_KEY.to_string(),
        }
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }
}

impl Persistence for SqliteStorage {
    async fn read(&self) -> Result<Option<String>, AppError> {
        let row = document::Entity::find_by_id(self.key.clone())
            .one(&self.db)
            .await?;
        Ok(row.map(|row| row.body))
    }

    async fn write(&mut self, text: &str) -> Result<(), AppError> {
        let active = document::ActiveModel {
            key: Set(self.key.clone()),
            body: Set(text.to_string()),
            updated_at: Set(Utc::now()),
        };
        document::Entity::insert(active)
            .on_conflict(
                OnConflict::column(document::Column::Key)
                    .update_columns([document::Column::Body, document::Column::UpdatedAt])
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await?;
        Ok(())
    }
}
