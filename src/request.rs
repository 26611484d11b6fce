use reqwest::{
    header::{HeaderMap, HeaderName, HeaderValue},
    Method, Url,
};

use crate::{AccountApiError, Result};

/// Media type sent as both `Content-Type` and `Accept`.
pub const API_CONTENT_TYPE: &str = "application/vnd.api+json";

/// A request described as plain data.
///
/// Built once per call and only borrowed by the executor, so every retry
/// attempt sends the same method, URL, headers and body.
#[derive(Clone, Debug)]
pub struct ApiRequest {
    method: Method,
    url: Url,
    body: Option<Vec<u8>>,
    headers: HeaderMap,
}

impl ApiRequest {
    /// Creates a request, rejecting URLs that do not parse.
    pub fn new(method: Method, url: &str) -> Result<Self> {
        let parsed = Url::parse(url)
            .map_err(|err| AccountApiError::InvalidInput(format!("invalid url '{url}': {err}")))?;
        Ok(Self::from_url(method, parsed))
    }

    pub fn from_url(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            body: None,
            headers: HeaderMap::new(),
        }
    }

    pub fn get(url: &str) -> Result<Self> {
        Self::new(Method::GET, url)
    }

    pub fn post(url: &str, body: impl Into<Vec<u8>>) -> Result<Self> {
        Ok(Self::new(Method::POST, url)?.with_body(body))
    }

    pub fn delete(url: &str) -> Result<Self> {
        Self::new(Method::DELETE, url)
    }

    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Adds an extra header. `Content-Type` and `Accept` are always
    /// overwritten at send time.
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }
}

/// What a successful response is expected to carry.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ResponseShape {
    /// Decode the body as JSON into the caller's type.
    Json,
    /// Ignore the body entirely.
    NoContent,
}

/// Result of a successful [`execute`](crate::AccountApiClient::execute).
#[derive(Clone, Debug, PartialEq)]
pub enum Decoded<T> {
    Payload(T),
    NoContent,
}

impl<T> Decoded<T> {
    /// Returns the payload, or a decode error if none was expected.
    pub fn into_payload(self) -> Result<T> {
        match self {
            Self::Payload(value) => Ok(value),
            Self::NoContent => Err(AccountApiError::Decode(
                "expected a response payload, request was sent as no-content".to_owned(),
            )),
        }
    }
}
