use std::fmt;
use std::sync::Arc;

use board_core::{ProgressConfig, ProgressFactor, ProgressTracker};
use storage::repository::ProgressRepository;

use crate::error::ProgressServiceError;

/// Bounds-checked progress state with optional durable persistence.
///
/// Mutations clamp silently and update in-memory state only; writing the
/// value through the configured persistence key is an explicit [`persist`]
/// step so side effects stay testable in isolation.
///
/// [`persist`]: ProgressService::persist
pub struct ProgressService {
    tracker: ProgressTracker,
    persist_key: Option<String>,
    progress: Arc<dyn ProgressRepository>,
    on_change: Option<Arc<dyn Fn(f64) + Send + Sync>>,
}

impl ProgressService {
    /// Build a service, preferring a stored value over the configured
    /// initial when a persistence key is set.
    ///
    /// The stored value is clamped into the configured bounds on the way in.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::Storage` if the stored value cannot be
    /// read. A missing value is not an error; the configured initial applies.
    pub async fn hydrate(
        config: ProgressConfig,
        persist_key: Option<String>,
        progress: Arc<dyn ProgressRepository>,
    ) -> Result<Self, ProgressServiceError> {
        let mut tracker = ProgressTracker::new(config);
        if let Some(key) = &persist_key {
            if let Some(stored) = progress.get_progress(key).await? {
                tracker.set(stored);
                tracing::debug!(key = %key, stored, "hydrated progress from storage");
            }
        }

        Ok(Self {
            tracker,
            persist_key,
            progress,
            on_change: None,
        })
    }

    /// Registers a callback invoked with the clamped value after each change.
    #[must_use]
    pub fn with_on_change(mut self, on_change: impl Fn(f64) + Send + Sync + 'static) -> Self {
        self.on_change = Some(Arc::new(on_change));
        self
    }

    #[must_use]
    pub fn value(&self) -> f64 {
        self.tracker.value()
    }

    #[must_use]
    pub fn persist_key(&self) -> Option<&str> {
        self.persist_key.as_deref()
    }

    /// Sets the value, clamping into bounds; returns the stored value.
    pub fn set(&mut self, value: f64) -> f64 {
        let value = self.tracker.set(value);
        self.notify(value);
        value
    }

    /// Adds `amount` to the current value, clamping the result.
    pub fn increment(&mut self, amount: f64) -> f64 {
        let value = self.tracker.increment(amount);
        self.notify(value);
        value
    }

    /// Single-step increment, the common case for checklists.
    pub fn increment_one(&mut self) -> f64 {
        self.increment(1.0)
    }

    /// Restores the configured initial value.
    pub fn reset(&mut self) -> f64 {
        let value = self.tracker.reset();
        self.notify(value);
        value
    }

    /// Replaces the bounds, re-clamping the current value into them.
    pub fn set_bounds(&mut self, min: f64, max: f64) -> f64 {
        let before = self.tracker.value();
        let value = self.tracker.set_bounds(min, max);
        if (value - before).abs() > f64::EPSILON {
            self.notify(value);
        }
        value
    }

    /// Share of `current` in `total` as a rounded percentage within bounds.
    #[must_use]
    pub fn percentage(&self, current: f64, total: f64) -> f64 {
        self.tracker.percentage(current, total)
    }

    /// Weighted average of the factors within bounds.
    #[must_use]
    pub fn weighted(&self, factors: &[ProgressFactor]) -> f64 {
        self.tracker.weighted(factors)
    }

    /// Writes the current value under the configured key. Without a key this
    /// is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::Storage` if the write fails.
    pub async fn persist(&self) -> Result<(), ProgressServiceError> {
        let Some(key) = &self.persist_key else {
            return Ok(());
        };
        self.progress.put_progress(key, self.tracker.value()).await?;
        Ok(())
    }

    fn notify(&self, value: f64) {
        if let Some(on_change) = &self.on_change {
            on_change(value);
        }
    }
}

impl fmt::Debug for ProgressService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProgressService")
            .field("value", &self.tracker.value())
            .field("persist_key", &self.persist_key)
            .finish_non_exhaustive()
    }
}
