use serde::{Deserialize, Serialize};

use crate::AccountData;

/// POST body: `{"data": <account>}`.
#[derive(Debug, Serialize)]
pub struct AccountDataRequest<'a> {
    pub data: &'a AccountData,
}

/// GET/POST response: `{"data": <account> | null}`.
#[derive(Debug, Deserialize)]
pub struct AccountDataResponse {
    #[serde(default)]
    pub data: Option<AccountData>,
}

/// Error body sent with non-success statuses.
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error_message: String,
}
