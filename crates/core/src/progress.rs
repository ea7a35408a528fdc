use serde::{Deserialize, Serialize};

/// Inclusive bounds and starting value for a [`ProgressTracker`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressConfig {
    pub min: f64,
    pub max: f64,
    pub initial: f64,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            min: 0.0,
            max: 100.0,
            initial: 0.0,
        }
    }
}

/// One weighted contribution to an aggregate progress value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProgressFactor {
    pub value: f64,
    pub weight: f64,
}

/// Bounds-checked progress value.
///
/// Out-of-range writes are clamped into `[min, max]`, never rejected —
/// a permissive numeric API. `initial` is retained so `reset` works after
/// arbitrary mutation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressTracker {
    value: f64,
    min: f64,
    max: f64,
    initial: f64,
}

impl ProgressTracker {
    /// Creates a tracker, clamping an out-of-range `initial` into bounds.
    ///
    /// A `max` below `min` is normalized up to `min`, collapsing the range
    /// to a single point rather than panicking on a later clamp.
    #[must_use]
    pub fn new(config: ProgressConfig) -> Self {
        let min = config.min;
        let max = config.max.max(min);
        Self {
            value: config.initial.clamp(min, max),
            min,
            max,
            initial: config.initial,
        }
    }

    #[must_use]
    pub fn value(&self) -> f64 {
        self.value
    }

    #[must_use]
    pub fn min(&self) -> f64 {
        self.min
    }

    #[must_use]
    pub fn max(&self) -> f64 {
        self.max
    }

    /// Sets the value, silently clamping into bounds; returns the stored value.
    pub fn set(&mut self, value: f64) -> f64 {
        self.value = value.clamp(self.min, self.max);
        self.value
    }

    /// Adds `amount` to the current value, clamping the result.
    pub fn increment(&mut self, amount: f64) -> f64 {
        let current = self.value;
        self.set(current + amount)
    }

    /// Restores the configured initial value (clamped into current bounds).
    pub fn reset(&mut self) -> f64 {
        let initial = self.initial;
        self.set(initial)
    }

    /// Replaces the bounds and re-clamps the current value into them.
    pub fn set_bounds(&mut self, min: f64, max: f64) -> f64 {
        self.min = min;
        self.max = max.max(min);
        let current = self.value;
        self.set(current)
    }

    /// Share of `current` in `total` as a rounded percentage, clamped into
    /// this tracker's bounds. Returns `0` when `total <= 0`.
    #[must_use]
    pub fn percentage(&self, current: f64, total: f64) -> f64 {
        if total <= 0.0 {
            return 0.0;
        }
        (current / total * 100.0).round().clamp(self.min, self.max)
    }

    /// Weighted average of the factors, rounded and clamped into bounds.
    /// Returns `0` for an empty slice or a non-positive total weight.
    #[must_use]
    pub fn weighted(&self, factors: &[ProgressFactor]) -> f64 {
        let total_weight: f64 = factors.iter().map(|f| f.weight).sum();
        if factors.is_empty() || total_weight <= 0.0 {
            return 0.0;
        }
        let weighted_sum: f64 = factors.iter().map(|f| f.value * f.weight).sum();
        (weighted_sum / total_weight)
            .round()
            .clamp(self.min, self.max)
    }
}

impl Default for ProgressTracker {
    fn default() -> Self {
        Self::new(ProgressConfig::default())
    }
}
