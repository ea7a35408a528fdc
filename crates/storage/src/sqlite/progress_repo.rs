use async_trait::async_trait;
use sqlx::Row;

use super::{
    SqliteRepository,
    mapping::{conn, ser},
};
use crate::repository::{ProgressRepository, StorageError};

#[async_trait]
impl ProgressRepository for SqliteRepository {
    async fn get_progress(&self, key: &str) -> Result<Option<f64>, StorageError> {
        let row = sqlx::query("SELECT value FROM progress_values WHERE key = ?1")
            .bind(key)
            .fetch_optional(self.pool())
            .await
            .map_err(conn)?;

        match row {
            Some(row) => Ok(Some(row.try_get("value").map_err(ser)?)),
            None => Ok(None),
        }
    }

    async fn put_progress(&self, key: &str, value: f64) -> Result<(), StorageError> {
        sqlx::query(
            r"
                INSERT INTO progress_values (key, value)
                VALUES (?1, ?2)
                ON CONFLICT (key) DO UPDATE SET value = excluded.value
            ",
        )
        .bind(key)
        .bind(value)
        .execute(self.pool())
        .await
        .map_err(conn)?;
        Ok(())
    }
}
