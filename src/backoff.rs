use std::time::Duration;

/// Ordered waits consumed one per failed transport attempt.
///
/// A schedule of length `N` allows `N` attempts; an empty schedule still
/// makes a single attempt and never waits.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BackoffSchedule {
    waits: Vec<Duration>,
}

impl BackoffSchedule {
    pub fn new(waits: impl IntoIterator<Item = Duration>) -> Self {
        Self {
            waits: waits.into_iter().collect(),
        }
    }

    /// Builds a schedule from millisecond values.
    pub fn from_millis(waits: impl IntoIterator<Item = u64>) -> Self {
        Self::new(waits.into_iter().map(Duration::from_millis))
    }

    /// `attempts` attempts with no wait between them.
    pub fn immediate(attempts: usize) -> Self {
        Self::new(std::iter::repeat(Duration::ZERO).take(attempts))
    }

    pub fn waits(&self) -> &[Duration] {
        &self.waits
    }

    pub fn len(&self) -> usize {
        self.waits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waits.is_empty()
    }

    /// Number of send attempts this schedule allows.
    pub fn attempts(&self) -> usize {
        self.waits.len().max(1)
    }

    /// Wait after the given zero-based failed attempt.
    pub fn wait_after(&self, attempt: usize) -> Duration {
        self.waits.get(attempt).copied().unwrap_or_default()
    }

    /// Sum of every wait, the upper bound on time spent sleeping per call.
    pub fn total(&self) -> Duration {
        self.waits.iter().sum()
    }
}

impl Default for BackoffSchedule {
    fn default() -> Self {
        Self::from_millis([2_000, 3_000, 5_000])
    }
}
