use std::time::Duration;

use reqwest::{
    header::{self, HeaderValue},
    Method, Response, StatusCode, Url,
};
use serde::de::DeserializeOwned;
use tokio::time::sleep;

use crate::{
    classify::{classify_status, is_success},
    request::API_CONTENT_TYPE,
    wire, AccountApiError, AccountData, ApiRequest, ClientOptions, Decoded, ResponseShape, Result,
};

/// Accounts resource path, appended to the base URL.
pub const ACCOUNTS_PATH: &str = "/v1/organisation/accounts";

#[derive(Clone, Debug)]
/// HTTP client for the organisation accounts API.
pub struct AccountApiClient {
    http: reqwest::Client,
    base_url: String,
    options: ClientOptions,
}

impl AccountApiClient {
    /// Creates a client for the API host at `base_url`.
    ///
    /// A trailing `/` is ignored.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_owned(),
            options: ClientOptions::default(),
        }
    }

    /// Creates a client from environment variables.
    ///
    /// Reads `ACCOUNT_API_HOST_URL`, falling back to `HOST_URL`.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use accountapi_http::AccountApiClient;
    ///
    /// let client = AccountApiClient::from_env().expect("missing ACCOUNT_API_HOST_URL");
    /// ```
    pub fn from_env() -> std::result::Result<Self, String> {
        let url = std::env::var("ACCOUNT_API_HOST_URL")
            .or_else(|_| std::env::var("HOST_URL"))
            .map_err(|_| {
                "missing ACCOUNT_API_HOST_URL (or HOST_URL) environment variable".to_owned()
            })?;
        if url.trim().is_empty() {
            return Err("account API host URL is set but empty".to_owned());
        }
        Ok(Self::new(url.trim()))
    }

    /// Applies client options such as timeout and backoff schedule.
    pub fn with_options(mut self, opts: ClientOptions) -> Self {
        self.options = opts;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    /// Fetches a single account by ID.
    ///
    /// An empty ID fails with [`AccountApiError::InvalidInput`] without
    /// touching the network.
    pub async fn fetch(&self, id: &str) -> Result<AccountData> {
        let id = validate_account_id(id)?;
        let request = ApiRequest::from_url(Method::GET, self.account_url(id)?);
        let response: wire::AccountDataResponse = self
            .execute(&request, ResponseShape::Json)
            .await?
            .into_payload()?;
        into_account(response)
    }

    /// Creates (or registers) an account and returns the server's copy.
    pub async fn create(&self, account: &AccountData) -> Result<AccountData> {
        let body = serde_json::to_vec(&wire::AccountDataRequest { data: account }).map_err(
            |err| AccountApiError::InvalidInput(format!("account payload could not be encoded: {err}")),
        )?;
        let request = ApiRequest::from_url(Method::POST, self.accounts_url()?).with_body(body);
        let response: wire::AccountDataResponse = self
            .execute(&request, ResponseShape::Json)
            .await?
            .into_payload()?;
        into_account(response)
    }

    /// Deletes an account at the given version.
    ///
    /// A 404 without a JSON error body surfaces as
    /// [`AccountApiError::Decode`], not [`AccountApiError::NotFound`].
    pub async fn delete(&self, id: &str, version: i64) -> Result<()> {
        let id = validate_account_id(id)?;
        let mut url = self.account_url(id)?;
        url.query_pairs_mut()
            .append_pair("version", &version.to_string());
        let request = ApiRequest::from_url(Method::DELETE, url);
        self.execute::<()>(&request, ResponseShape::NoContent).await?;
        Ok(())
    }

    /// Sends `request` with retries and interprets the response.
    ///
    /// Transport failures are retried along the backoff schedule. The first
    /// response obtained ends the loop whatever its status: `200..400` is
    /// decoded according to `shape`, anything else becomes a classified
    /// error carrying the body's `error_message`.
    pub async fn execute<T: DeserializeOwned>(
        &self,
        request: &ApiRequest,
        shape: ResponseShape,
    ) -> Result<Decoded<T>> {
        let response = self.send_with_retry(request).await?;
        read_response(response, shape).await
    }

    async fn send_with_retry(&self, request: &ApiRequest) -> Result<Response> {
        let attempts = self.options.backoff.attempts();
        let mut attempt = 0usize;
        loop {
            #[cfg(feature = "tracing")]
            tracing::debug!(
                method = %request.method(),
                url = %request.url(),
                attempt,
                "sending request"
            );

            match self.build_request(request).send().await {
                Ok(response) => return Ok(response),
                Err(err) => {
                    if !should_retry_transport(&err) {
                        return Err(AccountApiError::Transport(err));
                    }
                    self.wait_before_retry(attempt, &err).await;
                    attempt += 1;
                    if attempt >= attempts {
                        return Err(AccountApiError::Transport(err));
                    }
                }
            }
        }
    }

    fn build_request(&self, request: &ApiRequest) -> reqwest::RequestBuilder {
        let mut headers = request.headers().clone();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static(API_CONTENT_TYPE),
        );
        headers.insert(header::ACCEPT, HeaderValue::from_static(API_CONTENT_TYPE));

        let builder = self
            .http
            .request(request.method().clone(), request.url().clone())
            .headers(headers)
            .timeout(Duration::from_millis(self.options.timeout_ms));

        match request.body() {
            Some(body) => builder.body(body.to_vec()),
            None => builder,
        }
    }

    /// Waits out the schedule entry for a failed attempt.
    ///
    /// The entry is consumed even after the final attempt.
    async fn wait_before_retry(&self, attempt: usize, err: &reqwest::Error) {
        let delay = self.options.backoff.wait_after(attempt);

        #[cfg(feature = "tracing")]
        tracing::warn!(
            attempt,
            error = %err,
            delay = ?delay,
            "request failed before a response, backing off"
        );
        #[cfg(not(feature = "tracing"))]
        let _ = err;

        if !delay.is_zero() {
            sleep(delay).await;
        }
    }

    fn accounts_url(&self) -> Result<Url> {
        let raw = format!("{}{ACCOUNTS_PATH}", self.base_url);
        Url::parse(&raw)
            .map_err(|err| AccountApiError::InvalidInput(format!("invalid base url '{raw}': {err}")))
    }

    fn account_url(&self, id: &str) -> Result<Url> {
        let mut url = self.accounts_url()?;
        url.path_segments_mut()
            .map_err(|()| {
                AccountApiError::InvalidInput(format!(
                    "base url '{}' cannot carry a path",
                    self.base_url
                ))
            })?
            .push(id);
        Ok(url)
    }
}

async fn read_response<T: DeserializeOwned>(
    response: Response,
    shape: ResponseShape,
) -> Result<Decoded<T>> {
    let status = response.status();
    if !is_success(status) {
        let body = response.bytes().await.map_err(AccountApiError::Transport)?;
        return Err(classified_error(status, &body));
    }

    match shape {
        ResponseShape::NoContent => Ok(Decoded::NoContent),
        ResponseShape::Json => {
            let body = response.bytes().await.map_err(AccountApiError::Transport)?;
            serde_json::from_slice(&body)
                .map(Decoded::Payload)
                .map_err(|err| {
                    AccountApiError::Decode(format!(
                        "invalid response JSON: {err}; body: {}",
                        String::from_utf8_lossy(&body)
                    ))
                })
        }
    }
}

/// Builds the error for a non-success response.
///
/// A body that is not an `{"error_message": ...}` object wins over the
/// status classification and comes back as [`AccountApiError::Decode`].
fn classified_error(status: StatusCode, body: &[u8]) -> AccountApiError {
    let error = classify_status(status);

    #[cfg(feature = "tracing")]
    tracing::debug!(status = status.as_u16(), "server returned error status");

    match serde_json::from_slice::<wire::ErrorBody>(body) {
        Ok(body) => error.with_message(body.error_message),
        Err(err) => AccountApiError::Decode(format!(
            "invalid error response JSON for status {}: {err}",
            status.as_u16()
        )),
    }
}

fn should_retry_transport(err: &reqwest::Error) -> bool {
    err.is_timeout() || err.is_connect() || err.is_request() || err.is_body()
}

fn validate_account_id(id: &str) -> Result<&str> {
    if id.trim().is_empty() {
        return Err(AccountApiError::InvalidInput("invalid account id".to_owned()));
    }
    Ok(id)
}

fn into_account(response: wire::AccountDataResponse) -> Result<AccountData> {
    response
        .data
        .ok_or_else(|| AccountApiError::Decode("response envelope carried no data".to_owned()))
}
