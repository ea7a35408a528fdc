use async_trait::async_trait;
use board_core::model::ProjectId;
use chrono::{DateTime, Utc};
use sqlx::Row;

use super::{
    SqliteRepository,
    mapping::{conn, ser},
};
use crate::repository::{StorageError, TrackingSessionRepository};

#[async_trait]
impl TrackingSessionRepository for SqliteRepository {
    async fn get_session(
        &self,
        project_id: &ProjectId,
    ) -> Result<Option<DateTime<Utc>>, StorageError> {
        let row = sqlx::query("SELECT started_at FROM tracking_sessions WHERE project_id = ?1")
            .bind(project_id.as_str())
            .fetch_optional(self.pool())
            .await
            .map_err(conn)?;

        match row {
            Some(row) => Ok(Some(row.try_get("started_at").map_err(ser)?)),
            None => Ok(None),
        }
    }

    async fn put_session(
        &self,
        project_id: &ProjectId,
        started_at: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        sqlx::query(
            r"
                INSERT INTO tracking_sessions (project_id, started_at)
                VALUES (?1, ?2)
                ON CONFLICT (project_id) DO UPDATE SET started_at = excluded.started_at
            ",
        )
        .bind(project_id.as_str())
        .bind(started_at)
        .execute(self.pool())
        .await
        .map_err(conn)?;
        Ok(())
    }

    async fn clear_session(&self, project_id: &ProjectId) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM tracking_sessions WHERE project_id = ?1")
            .bind(project_id.as_str())
            .execute(self.pool())
            .await
            .map_err(conn)?;
        Ok(())
    }
}
