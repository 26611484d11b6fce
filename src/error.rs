/// Error type returned by this crate.
#[derive(Debug, thiserror::Error)]
pub enum AccountApiError {
    /// Caller-supplied input rejected before any request was sent.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// Network or request execution error from `reqwest`.
    ///
    /// Surfaced only after the backoff schedule is exhausted.
    #[error("transport error: {0}")]
    Transport(reqwest::Error),
    /// HTTP 400.
    #[error("bad request: {message}")]
    BadRequest { message: String },
    /// HTTP 404.
    #[error("not found: {message}")]
    NotFound { message: String },
    /// HTTP 409, usually a duplicate or a stale version.
    #[error("conflict: {message}")]
    Conflict { message: String },
    /// Any HTTP 5xx.
    #[error("internal server error: {message}")]
    InternalServerError { message: String },
    /// Any other status outside the success range.
    #[error("unexpected status {status}: {message}")]
    Unknown { status: u16, message: String },
    /// Response body was not the JSON shape the call expected.
    #[error("decode error: {0}")]
    Decode(String),
}

impl AccountApiError {
    /// Replaces the message of a status-classified variant.
    ///
    /// Other variants are returned unchanged.
    pub fn with_message(self, message: impl Into<String>) -> Self {
        let message = message.into();
        match self {
            Self::BadRequest { .. } => Self::BadRequest { message },
            Self::NotFound { .. } => Self::NotFound { message },
            Self::Conflict { .. } => Self::Conflict { message },
            Self::InternalServerError { .. } => Self::InternalServerError { message },
            Self::Unknown { status, .. } => Self::Unknown { status, message },
            other => other,
        }
    }

    /// Server-provided message of a status-classified variant.
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::BadRequest { message }
            | Self::NotFound { message }
            | Self::Conflict { message }
            | Self::InternalServerError { message }
            | Self::Unknown { message, .. } => Some(message.as_str()),
            _ => None,
        }
    }

    /// HTTP status behind this error, when one was received.
    ///
    /// `InternalServerError` covers the whole 5xx range, so it reports 500.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::BadRequest { .. } => Some(400),
            Self::NotFound { .. } => Some(404),
            Self::Conflict { .. } => Some(409),
            Self::InternalServerError { .. } => Some(500),
            Self::Unknown { status, .. } => Some(*status),
            Self::Transport(err) => err.status().map(|status| status.as_u16()),
            Self::InvalidInput(_) | Self::Decode(_) => None,
        }
    }
}
