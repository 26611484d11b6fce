use crate::BackoffSchedule;

/// Configures HTTP timeout and retry behavior.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ClientOptions {
    /// Per-attempt timeout in milliseconds.
    pub timeout_ms: u64,
    /// Waits between attempts that failed at the transport level.
    pub backoff: BackoffSchedule,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout_ms: 10_000,
            backoff: BackoffSchedule::default(),
        }
    }
}
