//! Error types for RocketLeagueStats API operations

use thiserror::Error;

/// Error types for RocketLeagueStats API operations
#[derive(Error, Debug)]
pub enum Error {
    /// No API key was configured for the client
    #[error("no API key configured")]
    MissingCredential,

    /// The service rejected the configured API key
    #[error("the service rejected the configured API key")]
    InvalidCredential,

    /// Batch lookup exceeded the service's per-request limit
    #[error("batch lookups are limited to {limit} players, got {count}")]
    BatchTooLarge {
        /// Number of entries that were supplied
        count: usize,
        /// The service's per-request limit
        limit: usize,
    },

    /// Throttle retries exhausted
    ///
    /// Only reachable when a retry ceiling has been configured with
    /// `with_max_retries`; by default throttled requests are retried until
    /// they succeed.
    #[error("still throttled by the service after {attempts} attempts")]
    RateLimited {
        /// Number of attempts that were throttled
        attempts: u32,
    },

    /// Unexpected HTTP status from the service
    #[error("unexpected HTTP status: {0}")]
    HttpStatus(reqwest::StatusCode),

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Malformed JSON response body
    #[error("malformed response body: {0}")]
    Json(#[from] serde_json::Error),
}

// Helper methods for common error construction
impl Error {
    /// Create a batch too large error
    pub fn batch_too_large(count: usize, limit: usize) -> Self {
        Self::BatchTooLarge { count, limit }
    }

    /// Create a rate limited error
    pub fn rate_limited(attempts: u32) -> Self {
        Self::RateLimited { attempts }
    }
}

/// Result type for RocketLeagueStats API operations
pub type Result<T> = std::result::Result<T, Error>;
