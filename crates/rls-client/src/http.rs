//! HTTP request execution for the RocketLeagueStats API
//!
//! All outbound calls funnel through [`HttpClient::execute`], which holds a
//! single mutex for the whole request/retry cycle so at most one HTTP call
//! per client is in flight at a time. The service tracks its rate limit per
//! API key, not per endpoint, so serializing requests keeps the header-derived
//! budget authoritative for the next call. Rate-limit and throttle sleeps
//! happen inside the locked section; a throttled call blocks every other
//! operation on the same client until its window resets.

use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::header::{AUTHORIZATION, HeaderMap};
use reqwest::{Client, Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;
use tokio::time::sleep;
use tracing::{debug, trace, warn};

use crate::{Error, Result};

/// Base URL of the RocketLeagueStats API
pub const API_BASE: &str = "https://api.rocketleaguestats.com/v1";

/// Default request timeout
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Remaining-request budget header
const HEADER_REMAINING: &str = "x-rate-limit-remaining";

/// Milliseconds left in the current window header
const HEADER_RESET_REMAINING: &str = "x-rate-limit-reset-remaining";

/// Absolute reset time header
const HEADER_RESET: &str = "x-rate-limit-reset";

/// Rate-limit state derived from the most recent response's headers.
///
/// Replaced wholesale after every request; only read and written while the
/// request mutex is held.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RateLimits {
    /// Requests left in the current window, -1 when the header was absent
    remaining: i64,
    /// Absolute reset time, if the service reported a parseable one
    reset_at: Option<DateTime<Utc>>,
    /// Time left in the current window, zero when the header was absent
    reset_remaining: Duration,
}

impl RateLimits {
    fn from_headers(headers: &HeaderMap) -> Self {
        let remaining = header_i64(headers, HEADER_REMAINING).unwrap_or(-1);
        let reset_remaining = header_i64(headers, HEADER_RESET_REMAINING)
            .map_or(Duration::ZERO, |ms| Duration::from_millis(ms.max(0) as u64));
        let reset_at = headers
            .get(HEADER_RESET)
            .and_then(|value| value.to_str().ok())
            .and_then(parse_reset_time);

        Self {
            remaining,
            reset_at,
            reset_remaining,
        }
    }

    /// How long to wait before the next request may be issued, or `None` if
    /// it can be sent immediately.
    ///
    /// Only a budget the service explicitly reported as exhausted blocks a
    /// request: an unknown budget (-1) or a reset time already in the past
    /// means no wait.
    fn delay(&self) -> Option<Duration> {
        if self.remaining != 0 {
            return None;
        }
        let reset_at = self.reset_at?;
        if reset_at > Utc::now() {
            Some(self.reset_remaining)
        } else {
            None
        }
    }
}

fn header_i64(headers: &HeaderMap, name: &str) -> Option<i64> {
    headers.get(name)?.to_str().ok()?.trim().parse().ok()
}

/// Parse the absolute reset header, which the service sends as an HTTP date.
fn parse_reset_time(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(value)
        .or_else(|_| DateTime::parse_from_rfc3339(value))
        .map(|time| time.with_timezone(&Utc))
        .ok()
}

/// Low-level HTTP client for the RocketLeagueStats API
pub struct HttpClient {
    client: Client,
    base_url: String,
    api_key: String,
    max_retries: Option<u32>,
    limits: Mutex<Option<RateLimits>>,
}

impl HttpClient {
    /// Create a new client authenticating with the given API key
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()?;

        Ok(Self::with_client(client, api_key))
    }

    /// Create a new client with a custom reqwest client
    pub fn with_client(client: Client, api_key: impl Into<String>) -> Self {
        Self {
            client,
            base_url: API_BASE.to_owned(),
            api_key: api_key.into(),
            max_retries: None,
            limits: Mutex::new(None),
        }
    }

    /// Override the API base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Cap the number of retries after throttled responses
    ///
    /// Default is no cap: a throttled request sleeps out the reported reset
    /// window and retries until the service accepts it.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = Some(max_retries);
        self
    }

    /// Issue a GET request and decode the JSON response
    pub async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        self.execute(Method::GET, endpoint, query, None::<&()>).await
    }

    /// Issue a POST request with a JSON body and decode the JSON response
    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<T> {
        self.execute(Method::POST, endpoint, &[], Some(body)).await
    }

    /// Execute a request against `{base_url}/{endpoint}`.
    ///
    /// Serialized per client: the lock covers the pre-flight budget wait,
    /// the call itself, any throttle retries, and the rate-limit state
    /// replacement. Fails with [`Error::MissingCredential`] before taking
    /// the lock when no API key is configured.
    async fn execute<T, B>(
        &self,
        method: Method,
        endpoint: &str,
        query: &[(&str, String)],
        body: Option<&B>,
    ) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        if self.api_key.is_empty() {
            return Err(Error::MissingCredential);
        }

        let url = format!("{}/{}", self.base_url.trim_end_matches('/'), endpoint);

        let mut limits = self.limits.lock().await;

        // The first call is optimistic: with no prior response there is no
        // budget to consult.
        if let Some(delay) = limits.as_ref().and_then(RateLimits::delay) {
            debug!("Request budget exhausted, waiting {:?} for window reset", delay);
            sleep(delay).await;
        }

        let mut attempts = 0u32;
        loop {
            debug!("{} {} (attempt {})", method, url, attempts + 1);

            let mut request = self
                .client
                .request(method.clone(), &url)
                .header(AUTHORIZATION, self.api_key.as_str());
            if !query.is_empty() {
                request = request.query(query);
            }
            if let Some(body) = body {
                request = request.json(body);
            }

            let response = request.send().await?;
            let status = response.status();
            trace!("Response status: {}", status);

            *limits = Some(RateLimits::from_headers(response.headers()));

            match status {
                StatusCode::UNAUTHORIZED => return Err(Error::InvalidCredential),
                StatusCode::TOO_MANY_REQUESTS => {
                    attempts += 1;
                    if let Some(max_retries) = self.max_retries {
                        if attempts > max_retries {
                            return Err(Error::rate_limited(attempts));
                        }
                    }
                    let delay = limits
                        .as_ref()
                        .map_or(Duration::ZERO, |limits| limits.reset_remaining);
                    warn!(
                        "Throttled by the service (attempt {}), retrying in {:?}",
                        attempts, delay
                    );
                    sleep(delay).await;
                }
                status if status.is_success() => {
                    let bytes = response.bytes().await?;
                    return Ok(serde_json::from_slice(&bytes)?);
                }
                status => return Err(Error::HttpStatus(status)),
            }
        }
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("max_retries", &self.max_retries)
            .finish_non_exhaustive()
    }
}
