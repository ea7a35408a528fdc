use chrono::{DateTime, Utc};

/// Transient stopwatch state for one project.
///
/// Tracking holds exactly when a start timestamp exists; elapsed time is
/// always derived from the clock, never accumulated, so a restart can pick
/// the session back up from a persisted start timestamp.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TrackingState {
    #[default]
    Idle,
    Tracking { started_at: DateTime<Utc> },
}

impl TrackingState {
    #[must_use]
    pub fn is_tracking(&self) -> bool {
        matches!(self, TrackingState::Tracking { .. })
    }

    #[must_use]
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        match self {
            TrackingState::Idle => None,
            TrackingState::Tracking { started_at } => Some(*started_at),
        }
    }

    /// Seconds elapsed since the session started, `0` while idle.
    ///
    /// Clock drift that would make the result negative clamps to `0`.
    #[must_use]
    pub fn elapsed_seconds(&self, now: DateTime<Utc>) -> i64 {
        match self {
            TrackingState::Idle => 0,
            TrackingState::Tracking { started_at } => (now - *started_at).num_seconds().max(0),
        }
    }
}
