use async_trait::async_trait;
use board_core::model::{ProjectId, TimeEntry};

use super::{
    SqliteRepository,
    mapping::{conn, map_entry_row},
};
use crate::repository::{StorageError, TimeEntryRecord, TimeEntryRepository};

#[async_trait]
impl TimeEntryRepository for SqliteRepository {
    async fn list_entries(&self, project_id: &ProjectId) -> Result<Vec<TimeEntry>, StorageError> {
        let rows = sqlx::query(
            r"
                SELECT id, started_at, ended_at
                FROM time_entries
                WHERE project_id = ?1
                ORDER BY started_at ASC, id ASC
            ",
        )
        .bind(project_id.as_str())
        .fetch_all(self.pool())
        .await
        .map_err(conn)?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            out.push(map_entry_row(&row)?);
        }
        Ok(out)
    }

    async fn put_entries(
        &self,
        project_id: &ProjectId,
        entries: &[TimeEntry],
    ) -> Result<(), StorageError> {
        let mut tx = self.pool().begin().await.map_err(conn)?;

        sqlx::query("DELETE FROM time_entries WHERE project_id = ?1")
            .bind(project_id.as_str())
            .execute(&mut *tx)
            .await
            .map_err(conn)?;

        for entry in entries {
            let record = TimeEntryRecord::from_entry(entry);
            sqlx::query(
                r"
                    INSERT INTO time_entries (project_id, id, started_at, ended_at)
                    VALUES (?1, ?2, ?3, ?4)
                ",
            )
            .bind(project_id.as_str())
            .bind(&record.id)
            .bind(record.started_at)
            .bind(record.ended_at)
            .execute(&mut *tx)
            .await
            .map_err(conn)?;
        }

        tx.commit().await.map_err(conn)
    }
}
