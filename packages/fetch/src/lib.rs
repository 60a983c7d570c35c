#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Outbound HTTP plumbing shared by the geocoder and the crime data
//! aggregator.
//!
//! Every request goes through [`HttpClient`], which wraps an
//! [`HttpTransport`] with the linear-backoff retry loop in [`retry`].
//! Endpoint base URLs come from the embedded TOML files in `services/`
//! (see [`service_registry`]).

pub mod retry;
pub mod service_registry;
#[cfg(any(test, feature = "testing"))]
pub mod testing;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

pub use retry::{RetryPolicy, fetch_with_retry};

/// `User-Agent` sent with every request. Nominatim rejects anonymous
/// clients.
pub const USER_AGENT: &str = "guardian/0.1 (https://github.com/BSteffaniak/guardian)";

/// Per-request timeout for the reqwest transport.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors from outbound HTTP calls.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// reqwest failed to send the request or read the body.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// A non-reqwest transport failed to connect.
    #[error("Connection failed: {message}")]
    Connection {
        /// Description of the failure.
        message: String,
    },

    /// The server answered with a non-2xx status.
    #[error("HTTP {status} from {url}")]
    Status {
        /// Requested URL.
        url: String,
        /// Response status code.
        status: u16,
    },

    /// The retry budget was used up. Carries the last failure.
    #[error("Fetch exhausted after {attempts} attempt(s) for {url}: {last}")]
    Exhausted {
        /// Requested URL.
        url: String,
        /// Number of attempts made.
        attempts: u32,
        /// Failure from the final attempt.
        #[source]
        last: Box<Self>,
    },

    /// The response body was not the expected JSON.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// A URL could not be built from the configured base.
    #[error("Invalid URL {url}: {message}")]
    InvalidUrl {
        /// The offending URL.
        url: String,
        /// Parser message.
        message: String,
    },

    /// Service configuration is missing or malformed.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the problem.
        message: String,
    },
}

/// A fully-read HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// Final request URL.
    pub url: String,
    /// Status code.
    pub status: u16,
    /// Body text.
    pub body: String,
}

impl HttpResponse {
    /// Whether the status is 2xx.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Parses the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Json`] if the body does not deserialize into `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, FetchError> {
        Ok(serde_json::from_str(&self.body)?)
    }
}

/// Performs a single GET request. Implementations do not retry.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Sends a GET request to `url` and reads the whole body.
    ///
    /// Non-2xx statuses are returned as responses, not errors.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] on transport-level failures.
    async fn get(&self, url: &str) -> Result<HttpResponse, FetchError>;
}

/// [`HttpTransport`] backed by a shared [`reqwest::Client`].
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Builds a client with the Guardian user agent and `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Http`] if the TLS backend cannot be initialised.
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get(&self, url: &str) -> Result<HttpResponse, FetchError> {
        let response = self.client.get(url).send().await?;
        let final_url = response.url().to_string();
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(HttpResponse {
            url: final_url,
            status,
            body,
        })
    }
}

/// Retrying HTTP client handed to every service in the workspace.
#[derive(Clone)]
pub struct HttpClient {
    transport: Arc<dyn HttpTransport>,
    policy: RetryPolicy,
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl HttpClient {
    /// Wraps `transport` with `policy`.
    #[must_use]
    pub fn new(transport: Arc<dyn HttpTransport>, policy: RetryPolicy) -> Self {
        Self { transport, policy }
    }

    /// Builds a reqwest-backed client with the retry policy from the
    /// environment (see [`RetryPolicy::from_env`]).
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] if the reqwest client cannot be built.
    pub fn from_env() -> Result<Self, FetchError> {
        let transport = ReqwestTransport::new(DEFAULT_REQUEST_TIMEOUT)?;
        Ok(Self::new(Arc::new(transport), RetryPolicy::from_env()))
    }

    /// GET with retry. Only a 2xx response counts as success.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Exhausted`] once the retry budget is spent.
    pub async fn get(&self, url: &str) -> Result<HttpResponse, FetchError> {
        fetch_with_retry(self.transport.as_ref(), url, &self.policy).await
    }

    /// GET with retry, then parse the body as JSON. A body that fails to
    /// parse is not retried.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Exhausted`] if every attempt failed, or
    /// [`FetchError::Json`] if the successful body is not valid `T`.
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, FetchError> {
        self.get(url).await?.json()
    }
}

/// Joins `segments` onto `base` (each percent-encoded as a single path
/// segment) and appends `query` pairs.
///
/// # Errors
///
/// Returns [`FetchError::InvalidUrl`] if `base` is not an absolute URL
/// that can carry a path.
pub fn build_url(base: &str, segments: &[&str], query: &[(&str, &str)]) -> Result<String, FetchError> {
    let mut url = reqwest::Url::parse(base).map_err(|e| FetchError::InvalidUrl {
        url: base.to_string(),
        message: e.to_string(),
    })?;

    if !segments.is_empty() {
        url.path_segments_mut()
            .map_err(|()| FetchError::InvalidUrl {
                url: base.to_string(),
                message: "URL cannot be a base".to_string(),
            })?
            .pop_if_empty()
            .extend(segments);
    }

    if !query.is_empty() {
        url.query_pairs_mut().extend_pairs(query);
    }

    Ok(url.into())
}
