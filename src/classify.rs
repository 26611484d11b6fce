use reqwest::StatusCode;

use crate::AccountApiError;

/// Maps an error status onto its domain variant with an empty message.
///
/// Callers only reach this for statuses outside `200..400`; anything not
/// listed falls through to [`AccountApiError::Unknown`].
pub fn classify_status(status: StatusCode) -> AccountApiError {
    let message = String::new();
    match status {
        StatusCode::BAD_REQUEST => AccountApiError::BadRequest { message },
        StatusCode::NOT_FOUND => AccountApiError::NotFound { message },
        StatusCode::CONFLICT => AccountApiError::Conflict { message },
        s if s.as_u16() >= 500 => AccountApiError::InternalServerError { message },
        s => AccountApiError::Unknown {
            status: s.as_u16(),
            message,
        },
    }
}

/// Whether a status is handled as success (`200..400`).
pub(crate) fn is_success(status: StatusCode) -> bool {
    (200..400).contains(&status.as_u16())
}
