// src/error.rs
// =============================================================================
// Error types for the analyzer and the link prober.
//
// Two families live here:
// - AnalyzeError: fatal to a whole analysis (bad page URL, page fetch failed)
// - TransportFailure: one probe attempt could not get an HTTP response.
//   These never escape the prober; they end up as data in a ValidationResult.
//
// Rust concepts:
// - thiserror: derives std::error::Error and Display from attributes
// - #[from]: lets the ? operator convert a reqwest::Error automatically
// =============================================================================

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyzeError {
    #[error("Invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("Failed to fetch page: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("Page {url} returned HTTP {status}")]
    PageStatus { url: String, status: u16 },

    #[error("Invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, AnalyzeError>;

/// Why a single probe attempt produced no HTTP response.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportFailure {
    #[error("request timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("too many redirects")]
    TooManyRedirects,

    #[error("{0}")]
    Other(String),
}

impl TransportFailure {
    /// Timeouts and connection-level errors are worth another attempt.
    /// A redirect loop or a malformed request will fail the same way again.
    pub fn is_transient(&self) -> bool {
        matches!(self, TransportFailure::Timeout | TransportFailure::Connect(_))
    }
}

impl From<reqwest::Error> for TransportFailure {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            TransportFailure::Timeout
        } else if error.is_redirect() {
            TransportFailure::TooManyRedirects
        } else if error.is_connect() || error.is_request() {
            // Connection resets mid-request surface as request errors
            TransportFailure::Connect(error.to_string())
        } else {
            TransportFailure::Other(error.to_string())
        }
    }
}
