use async_trait::async_trait;
use board_core::model::{EntryId, ProjectId, TimeEntry, TimeEntryError};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Persisted shape for a time entry.
///
/// Mirrors the domain `TimeEntry` so backends can serialize without leaking
/// storage concerns into the domain layer; rehydration re-checks the
/// interval invariant.
#[derive(Debug, Clone)]
pub struct TimeEntryRecord {
    pub id: String,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
}

impl TimeEntryRecord {
    #[must_use]
    pub fn from_entry(entry: &TimeEntry) -> Self {
        Self {
            id: entry.id().as_str().to_owned(),
            started_at: entry.started_at(),
            ended_at: entry.ended_at(),
        }
    }

    /// Convert the record back into a domain `TimeEntry`.
    ///
    /// # Errors
    ///
    /// Returns `TimeEntryError` if the persisted interval is inverted.
    pub fn into_entry(self) -> Result<TimeEntry, TimeEntryError> {
        TimeEntry::new(EntryId::new(self.id), self.started_at, self.ended_at)
    }
}

/// Repository contract for per-project time entry collections.
///
/// `put_entries` replaces the whole collection; the in-memory list owned by
/// the tracker service is the unit of persistence, matching how it mirrors
/// state on every change.
#[async_trait]
pub trait TimeEntryRepository: Send + Sync {
    /// Fetch all entries for a project, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the collection cannot be read.
    async fn list_entries(&self, project_id: &ProjectId) -> Result<Vec<TimeEntry>, StorageError>;

    /// Replace the stored collection for a project. An empty slice clears it.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the collection cannot be written.
    async fn put_entries(
        &self,
        project_id: &ProjectId,
        entries: &[TimeEntry],
    ) -> Result<(), StorageError>;
}

/// Repository contract for in-progress tracking session descriptors.
///
/// A stored start timestamp means tracking was active; its absence means
/// idle. This is what lets an interrupted session resume after a restart.
#[async_trait]
pub trait TrackingSessionRepository: Send + Sync {
    /// Fetch the active session start for a project, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the descriptor cannot be read.
    async fn get_session(
        &self,
        project_id: &ProjectId,
    ) -> Result<Option<DateTime<Utc>>, StorageError>;

    /// Record the start of a tracking session.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the descriptor cannot be written.
    async fn put_session(
        &self,
        project_id: &ProjectId,
        started_at: DateTime<Utc>,
    ) -> Result<(), StorageError>;

    /// Remove the session descriptor. Clearing an absent descriptor is fine.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the descriptor cannot be removed.
    async fn clear_session(&self, project_id: &ProjectId) -> Result<(), StorageError>;
}

/// Repository contract for persisted progress values, keyed by a
/// caller-supplied persistence key.
#[async_trait]
pub trait ProgressRepository: Send + Sync {
    /// Fetch the stored value for a key, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the value cannot be read.
    async fn get_progress(&self, key: &str) -> Result<Option<f64>, StorageError>;

    /// Store a value under a key, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the value cannot be written.
    async fn put_progress(&self, key: &str, value: f64) -> Result<(), StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    entries: Arc<Mutex<HashMap<ProjectId, Vec<TimeEntry>>>>,
    sessions: Arc<Mutex<HashMap<ProjectId, DateTime<Utc>>>>,
    progress: Arc<Mutex<HashMap<String, f64>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TimeEntryRepository for InMemoryRepository {
    async fn list_entries(&self, project_id: &ProjectId) -> Result<Vec<TimeEntry>, StorageError> {
        let guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(project_id).cloned().unwrap_or_default())
    }

    async fn put_entries(
        &self,
        project_id: &ProjectId,
        entries: &[TimeEntry],
    ) -> Result<(), StorageError> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(project_id.clone(), entries.to_vec());
        Ok(())
    }
}

#[async_trait]
impl TrackingSessionRepository for InMemoryRepository {
    async fn get_session(
        &self,
        project_id: &ProjectId,
    ) -> Result<Option<DateTime<Utc>>, StorageError> {
        let guard = self
            .sessions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(project_id).copied())
    }

    async fn put_session(
        &self,
        project_id: &ProjectId,
        started_at: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        let mut guard = self
            .sessions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(project_id.clone(), started_at);
        Ok(())
    }

    async fn clear_session(&self, project_id: &ProjectId) -> Result<(), StorageError> {
        let mut guard = self
            .sessions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.remove(project_id);
        Ok(())
    }
}

#[async_trait]
impl ProgressRepository for InMemoryRepository {
    async fn get_progress(&self, key: &str) -> Result<Option<f64>, StorageError> {
        let guard = self
            .progress
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(key).copied())
    }

    async fn put_progress(&self, key: &str, value: f64) -> Result<(), StorageError> {
        let mut guard = self
            .progress
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(key.to_owned(), value);
        Ok(())
    }
}

/// Aggregates the tracker repositories behind trait objects for easy
/// backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub time_entries: Arc<dyn TimeEntryRepository>,
    pub sessions: Arc<dyn TrackingSessionRepository>,
    pub progress: Arc<dyn ProgressRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        let time_entries: Arc<dyn TimeEntryRepository> = Arc::new(repo.clone());
        let sessions: Arc<dyn TrackingSessionRepository> = Arc::new(repo.clone());
        let progress: Arc<dyn ProgressRepository> = Arc::new(repo);
        Self {
            time_entries,
            sessions,
            progress,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use board_core::time::fixed_now;
    use chrono::Duration;

    fn build_entry(offset_secs: i64, len_secs: i64) -> TimeEntry {
        let started_at = fixed_now() + Duration::seconds(offset_secs);
        let ended_at = started_at + Duration::seconds(len_secs);
        TimeEntry::new(EntryId::from_timestamp(ended_at), started_at, ended_at).unwrap()
    }

    #[tokio::test]
    async fn entries_round_trip_per_project() {
        let repo = InMemoryRepository::new();
        let project_a = ProjectId::new("a");
        let project_b = ProjectId::new("b");

        repo.put_entries(&project_a, &[build_entry(0, 60), build_entry(120, 30)])
            .await
            .unwrap();

        let fetched = repo.list_entries(&project_a).await.unwrap();
        assert_eq!(fetched.len(), 2);
        assert_eq!(fetched[0].duration_seconds(), 60);

        assert!(repo.list_entries(&project_b).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn put_entries_with_empty_slice_clears_collection() {
        let repo = InMemoryRepository::new();
        let project = ProjectId::new("a");
        repo.put_entries(&project, &[build_entry(0, 10)])
            .await
            .unwrap();
        repo.put_entries(&project, &[]).await.unwrap();
        assert!(repo.list_entries(&project).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn session_descriptor_lifecycle() {
        let repo = InMemoryRepository::new();
        let project = ProjectId::new("a");
        assert_eq!(repo.get_session(&project).await.unwrap(), None);

        repo.put_session(&project, fixed_now()).await.unwrap();
        assert_eq!(repo.get_session(&project).await.unwrap(), Some(fixed_now()));

        repo.clear_session(&project).await.unwrap();
        assert_eq!(repo.get_session(&project).await.unwrap(), None);

        // clearing again stays silent
        repo.clear_session(&project).await.unwrap();
    }

    #[tokio::test]
    async fn progress_values_overwrite_by_key() {
        let repo = InMemoryRepository::new();
        assert_eq!(repo.get_progress("onboarding").await.unwrap(), None);

        repo.put_progress("onboarding", 40.0).await.unwrap();
        repo.put_progress("onboarding", 75.0).await.unwrap();
        assert_eq!(repo.get_progress("onboarding").await.unwrap(), Some(75.0));
    }

    #[test]
    fn record_rejects_inverted_interval() {
        let record = TimeEntryRecord {
            id: "x".to_string(),
            started_at: fixed_now(),
            ended_at: fixed_now() - Duration::seconds(1),
        };
        assert!(record.into_entry().is_err());
    }
}
