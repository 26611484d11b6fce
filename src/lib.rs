//! `accountapi-http` is an async HTTP client for the organisation accounts API.
//!
//! The crate wraps `/v1/organisation/accounts` with three operations:
//! - [`AccountApiClient::fetch`]
//! - [`AccountApiClient::create`]
//! - [`AccountApiClient::delete`]
//!
//! Requests that fail before any response arrives are retried along a
//! [`BackoffSchedule`]. Error statuses are mapped onto [`AccountApiError`]
//! variants carrying the server's `error_message`.

mod backoff;
mod classify;
mod client;
mod error;
mod options;
mod request;
mod types;
mod wire;

pub use backoff::BackoffSchedule;
pub use classify::classify_status;
pub use client::{AccountApiClient, ACCOUNTS_PATH};
pub use error::AccountApiError;
pub use options::ClientOptions;
pub use request::{ApiRequest, Decoded, ResponseShape, API_CONTENT_TYPE};
pub use types::AccountData;

pub type Result<T> = std::result::Result<T, AccountApiError>;
