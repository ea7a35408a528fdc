use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use board_core::Clock;
use board_core::model::{EntryId, ProjectId, TimeEntry, TrackingState};
use storage::repository::{TimeEntryRepository, TrackingSessionRepository};

use crate::error::TimeTrackerError;

/// Stopwatch over a per-project collection of immutable time entries.
///
/// The entry collection and the in-progress session descriptor are mirrored
/// to durable storage, so stopping, reloading, and even interrupting the
/// process mid-session all reconstruct the same state. Elapsed time is
/// always derived from the clock and the session start, never accumulated.
pub struct TimeTrackerService {
    clock: Clock,
    project_id: ProjectId,
    entries_repo: Arc<dyn TimeEntryRepository>,
    sessions_repo: Arc<dyn TrackingSessionRepository>,
    entries: Vec<TimeEntry>,
    state: TrackingState,
}

impl TimeTrackerService {
    /// Hydrate the tracker for a project.
    ///
    /// If storage holds a session descriptor, tracking resumes from the
    /// stored start timestamp: elapsed time picks up where it left off
    /// rather than resetting to zero.
    ///
    /// # Errors
    ///
    /// Returns `TimeTrackerError::Storage` if entries or the session
    /// descriptor cannot be read.
    pub async fn load(
        project_id: ProjectId,
        entries_repo: Arc<dyn TimeEntryRepository>,
        sessions_repo: Arc<dyn TrackingSessionRepository>,
        clock: Clock,
    ) -> Result<Self, TimeTrackerError> {
        let entries = entries_repo.list_entries(&project_id).await?;
        let state = match sessions_repo.get_session(&project_id).await? {
            Some(started_at) => {
                tracing::debug!(project = %project_id, %started_at, "resuming tracking session");
                TrackingState::Tracking { started_at }
            }
            None => TrackingState::Idle,
        };

        Ok(Self {
            clock,
            project_id,
            entries_repo,
            sessions_repo,
            entries,
            state,
        })
    }

    #[must_use]
    pub fn project_id(&self) -> &ProjectId {
        &self.project_id
    }

    #[must_use]
    pub fn is_tracking(&self) -> bool {
        self.state.is_tracking()
    }

    #[must_use]
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.state.started_at()
    }

    /// Seconds elapsed in the current session, `0` while idle.
    #[must_use]
    pub fn elapsed_seconds(&self) -> i64 {
        self.state.elapsed_seconds(self.clock.now())
    }

    #[must_use]
    pub fn entries(&self) -> &[TimeEntry] {
        &self.entries
    }

    /// Total seconds across all closed entries.
    #[must_use]
    pub fn total_tracked_seconds(&self) -> i64 {
        self.entries.iter().map(TimeEntry::duration_seconds).sum()
    }

    /// Begin a tracking session and persist its descriptor.
    ///
    /// Calling while already tracking is a silent no-op returning the
    /// existing session start.
    ///
    /// # Errors
    ///
    /// Returns `TimeTrackerError::Storage` if the descriptor write fails;
    /// the tracker stays idle in that case.
    pub async fn start_tracking(&mut self) -> Result<DateTime<Utc>, TimeTrackerError> {
        if let Some(started_at) = self.state.started_at() {
            return Ok(started_at);
        }

        let started_at = self.clock.now();
        self.sessions_repo
            .put_session(&self.project_id, started_at)
            .await?;
        self.state = TrackingState::Tracking { started_at };
        Ok(started_at)
    }

    /// Close the current session into an immutable entry.
    ///
    /// Returns `Ok(None)` while idle, leaving the collection untouched.
    /// Otherwise the new entry is appended, the collection is persisted,
    /// and the session descriptor is cleared.
    ///
    /// # Errors
    ///
    /// Returns `TimeTrackerError` if the entry is invalid or a storage
    /// write fails.
    pub async fn stop_tracking(&mut self) -> Result<Option<TimeEntry>, TimeTrackerError> {
        let TrackingState::Tracking { started_at } = self.state else {
            return Ok(None);
        };

        let ended_at = self.clock.now();
        let entry = TimeEntry::new(EntryId::from_timestamp(ended_at), started_at, ended_at)?;

        self.entries.push(entry.clone());
        self.entries_repo
            .put_entries(&self.project_id, &self.entries)
            .await?;
        self.sessions_repo.clear_session(&self.project_id).await?;
        self.state = TrackingState::Idle;

        Ok(Some(entry))
    }

    /// Remove one entry by id and persist the collection.
    ///
    /// Deleting an id that is not present is a silent no-op returning
    /// `Ok(false)`; nothing is written.
    ///
    /// # Errors
    ///
    /// Returns `TimeTrackerError::Storage` if the collection write fails.
    pub async fn delete_entry(&mut self, id: &EntryId) -> Result<bool, TimeTrackerError> {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.id() != id);
        if self.entries.len() == before {
            return Ok(false);
        }

        // the collection is persisted even when it just became empty
        self.entries_repo
            .put_entries(&self.project_id, &self.entries)
            .await?;
        Ok(true)
    }

    /// Periodic elapsed-seconds recomputation for the current session.
    ///
    /// Returns `None` while idle. The returned handle owns a background
    /// task on a 1-second interval; dropping the handle cancels it.
    #[must_use]
    pub fn elapsed_ticker(&self) -> Option<ElapsedTicker> {
        self.ticker_with_period(Duration::from_secs(1))
    }

    fn ticker_with_period(&self, period: Duration) -> Option<ElapsedTicker> {
        let TrackingState::Tracking { started_at } = self.state else {
            return None;
        };

        let clock = self.clock;
        let (tx, rx) = watch::channel(self.elapsed_seconds());
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.tick().await; // first tick resolves immediately
            loop {
                interval.tick().await;
                let elapsed = (clock.now() - started_at).num_seconds().max(0);
                if tx.send(elapsed).is_err() {
                    break;
                }
            }
        });

        Some(ElapsedTicker {
            elapsed: rx,
            handle,
        })
    }
}

impl fmt::Debug for TimeTrackerService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimeTrackerService")
            .field("project_id", &self.project_id)
            .field("entries_len", &self.entries.len())
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

/// Handle for a running elapsed-time recomputation.
///
/// The underlying task is aborted when the handle drops, which scopes the
/// repeating timer to the lifetime of whatever displays the elapsed time.
pub struct ElapsedTicker {
    elapsed: watch::Receiver<i64>,
    handle: JoinHandle<()>,
}

impl ElapsedTicker {
    /// Most recently published elapsed seconds.
    #[must_use]
    pub fn elapsed_seconds(&self) -> i64 {
        *self.elapsed.borrow()
    }

    /// A receiver for awaiting updates as they are published.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<i64> {
        self.elapsed.clone()
    }
}

impl Drop for ElapsedTicker {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use board_core::time::{fixed_clock, fixed_now};
    use chrono::Duration as ChronoDuration;
    use storage::repository::{InMemoryRepository, TimeEntryRepository, TrackingSessionRepository};

    async fn build_tracker(repo: &InMemoryRepository, clock: Clock) -> TimeTrackerService {
        TimeTrackerService::load(
            ProjectId::new("proj-1"),
            Arc::new(repo.clone()),
            Arc::new(repo.clone()),
            clock,
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn start_then_stop_produces_exactly_one_entry() {
        let repo = InMemoryRepository::new();
        let mut tracker = build_tracker(&repo, fixed_clock()).await;

        let started_at = tracker.start_tracking().await.unwrap();
        assert!(tracker.is_tracking());
        assert_eq!(started_at, fixed_now());

        let entry = tracker.stop_tracking().await.unwrap().expect("entry");
        assert!(entry.ended_at() >= entry.started_at());
        assert!(!tracker.is_tracking());
        assert_eq!(tracker.entries().len(), 1);

        // collection mirrored to storage, descriptor cleared
        let stored = repo.list_entries(&ProjectId::new("proj-1")).await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(
            repo.get_session(&ProjectId::new("proj-1")).await.unwrap(),
            None
        );
    }

    #[tokio::test]
    async fn stop_while_idle_is_a_silent_no_op() {
        let repo = InMemoryRepository::new();
        let mut tracker = build_tracker(&repo, fixed_clock()).await;

        assert_eq!(tracker.stop_tracking().await.unwrap(), None);
        assert!(tracker.entries().is_empty());
    }

    #[tokio::test]
    async fn start_while_tracking_returns_the_existing_start() {
        let repo = InMemoryRepository::new();
        let mut tracker = build_tracker(&repo, fixed_clock()).await;

        let first = tracker.start_tracking().await.unwrap();
        let second = tracker.start_tracking().await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn delete_of_unknown_id_leaves_collection_unchanged() {
        let repo = InMemoryRepository::new();
        let mut tracker = build_tracker(&repo, fixed_clock()).await;
        tracker.start_tracking().await.unwrap();
        tracker.stop_tracking().await.unwrap();

        let removed = tracker
            .delete_entry(&EntryId::new("not-there"))
            .await
            .unwrap();
        assert!(!removed);
        assert_eq!(tracker.entries().len(), 1);
    }

    #[tokio::test]
    async fn delete_persists_the_emptied_collection() {
        let repo = InMemoryRepository::new();
        let project = ProjectId::new("proj-1");
        let mut tracker = build_tracker(&repo, fixed_clock()).await;
        tracker.start_tracking().await.unwrap();
        let entry = tracker.stop_tracking().await.unwrap().expect("entry");

        let removed = tracker.delete_entry(entry.id()).await.unwrap();
        assert!(removed);
        assert!(tracker.entries().is_empty());
        assert!(repo.list_entries(&project).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn load_resumes_a_persisted_session_with_recomputed_elapsed() {
        let repo = InMemoryRepository::new();
        let project = ProjectId::new("proj-1");
        let session_start = fixed_now();
        repo.put_session(&project, session_start).await.unwrap();

        // "now" is 90 seconds after the persisted start
        let clock = Clock::fixed(session_start + ChronoDuration::seconds(90));
        let tracker = TimeTrackerService::load(
            project,
            Arc::new(repo.clone()),
            Arc::new(repo.clone()),
            clock,
        )
        .await
        .unwrap();

        assert!(tracker.is_tracking());
        assert_eq!(tracker.started_at(), Some(session_start));
        assert_eq!(tracker.elapsed_seconds(), 90);
    }

    #[tokio::test]
    async fn stopping_a_resumed_session_spans_the_full_interval() {
        let repo = InMemoryRepository::new();
        let project = ProjectId::new("proj-1");
        repo.put_session(&project, fixed_now()).await.unwrap();

        let clock = Clock::fixed(fixed_now() + ChronoDuration::seconds(90));
        let mut tracker = TimeTrackerService::load(
            project,
            Arc::new(repo.clone()),
            Arc::new(repo.clone()),
            clock,
        )
        .await
        .unwrap();

        let entry = tracker.stop_tracking().await.unwrap().expect("entry");
        assert_eq!(entry.duration_seconds(), 90);
        assert_eq!(tracker.total_tracked_seconds(), 90);
    }

    #[tokio::test]
    async fn ticker_publishes_elapsed_and_stops_on_drop() {
        let repo = InMemoryRepository::new();
        let mut tracker = build_tracker(&repo, fixed_clock()).await;
        assert!(tracker.elapsed_ticker().is_none());

        tracker.start_tracking().await.unwrap();
        let ticker = tracker
            .ticker_with_period(Duration::from_millis(5))
            .expect("ticker");
        assert_eq!(ticker.elapsed_seconds(), 0);

        let mut rx = ticker.subscribe();
        tokio::time::timeout(Duration::from_secs(1), rx.changed())
            .await
            .expect("tick before timeout")
            .expect("sender alive");

        let handle_finished = {
            drop(ticker);
            tokio::time::sleep(Duration::from_millis(20)).await;
            rx.has_changed().is_err()
        };
        assert!(handle_finished);
    }
}
