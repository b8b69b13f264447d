//! Quota source trait and error types
//!
//! Defines the interface the refresh loop polls.

use async_trait::async_trait;
use thiserror::Error;

use super::types::{QuotaResponse, UsageResponse};

// ============================================================================
// Error Types
// ============================================================================

/// Errors that can occur when fetching quota information
#[derive(Error, Debug)]
pub enum QuotaError {
    /// No credential in the environment; raised before any request is made
    #[error("Configuration error: ZAI_PROJECT_KEY or ZAI_API_KEY environment variable not set")]
    MissingCredential,

    /// Endpoint answered with a non-2xx status
    #[error("{endpoint} API error: {status}")]
    Status { endpoint: &'static str, status: u16 },

    /// Failed to parse API response
    #[error("Parse error: {0}")]
    Parse(String),

    /// Network request failed
    #[error("Network error: {0}")]
    Network(String),
}

impl QuotaError {
    /// Whether this is a configuration problem rather than a request failure
    pub fn is_config(&self) -> bool {
        matches!(self, QuotaError::MissingCredential)
    }
}

impl From<reqwest::Error> for QuotaError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            QuotaError::Network(format!("Request timed out: {}", err))
        } else if err.is_connect() {
            QuotaError::Network(format!("Connection failed: {}", err))
        } else if err.is_decode() {
            QuotaError::Parse(err.to_string())
        } else {
            QuotaError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for QuotaError {
    fn from(err: serde_json::Error) -> Self {
        QuotaError::Parse(err.to_string())
    }
}

// ============================================================================
// Source Trait
// ============================================================================

/// Anything that can produce quota snapshots
///
/// `ZaiClient` is the production implementation; tests swap in fakes.
#[async_trait]
pub trait QuotaSource: Send + Sync {
    /// Fetch the current limits
    async fn fetch_quota(&self) -> Result<QuotaResponse, QuotaError>;

    /// Fetch model usage between two `YYYY-MM-DD HH:MM:SS` timestamps
    async fn fetch_usage(&self, start: &str, end: &str) -> Result<UsageResponse, QuotaError>;
}

// ============================================================================
// Tests
// ============================================================================
