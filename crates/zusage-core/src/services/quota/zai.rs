//! Z.ai quota client
//!
//! Implements `QuotaSource` against the Z.ai monitor API:
//!
//! - `GET {base}/monitor/usage/quota/limit` for the current limits
//! - `GET {base}/monitor/usage/model-usage?startTime=&endTime=` for usage history
//!
//! Both endpoints take `Authorization: Bearer <key>` and wrap their payload in
//! `{ "data": ... }`. There is no retry and no client-side timeout; every
//! failure is handed back to the caller as a `QuotaError`.

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;

use super::provider::{QuotaError, QuotaSource};
use super::types::{ApiEnvelope, QuotaResponse, UsageResponse};
use crate::config::WidgetConfig;

// ============================================================================
// Constants
// ============================================================================

/// Default API base URL
pub const DEFAULT_API_BASE: &str = "https://api.z.ai/api";

const QUOTA_PATH: &str = "/monitor/usage/quota/limit";
const USAGE_PATH: &str = "/monitor/usage/model-usage";

// ============================================================================
// Client
// ============================================================================

/// HTTP client for the Z.ai monitor endpoints
#[derive(Debug, Clone)]
pub struct ZaiClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl ZaiClient {
    /// Create a client for `base_url`; a missing key is only reported on first use
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: Client::new(),
            base_url,
            api_key: api_key.filter(|k| !k.trim().is_empty()),
        }
    }

    /// Create a client from the widget configuration
    pub fn from_config(config: &WidgetConfig) -> Self {
        Self::new(config.api_base.clone(), config.api_key.clone())
    }

    /// Base URL requests are sent to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Whether a credential is configured
    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }

    fn api_key(&self) -> Result<&str, QuotaError> {
        self.api_key.as_deref().ok_or(QuotaError::MissingCredential)
    }

    async fn get_data<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, QuotaError> {
        // No request leaves without a credential
        let key = self.api_key()?;
        let url = format!("{}{}", self.base_url, path);
        log::debug!("[quota:zai] GET {}", url);

        let mut request = self
            .client
            .get(&url)
            .header("Authorization", format!("Bearer {}", key))
            .header("Content-Type", "application/json");
        if !query.is_empty() {
            request = request.query(query);
        }

        let response = request.send().await?;
        let status = response.status();
        log::debug!("[quota:zai] {} API response status: {}", endpoint, status);

        if !status.is_success() {
            log::warn!("[quota:zai] {} API failed: HTTP {}", endpoint, status);
            return Err(QuotaError::Status {
                endpoint,
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let envelope: ApiEnvelope<T> = serde_json::from_str(&body).map_err(|e| {
            log::error!("[quota:zai] Failed to parse {} response: {}", endpoint, e);
            QuotaError::Parse(format!("Invalid {} response: {}", endpoint, e))
        })?;

        Ok(envelope.data)
    }
}

#[async_trait]
impl QuotaSource for ZaiClient {
    async fn fetch_quota(&self) -> Result<QuotaResponse, QuotaError> {
        let quota: QuotaResponse = self.get_data("Quota", QUOTA_PATH, &[]).await?;
        log::info!(
            "[quota:zai] Fetched {} limits (level: {})",
            quota.limits.len(),
            quota.level
        );
        Ok(quota)
    }

    async fn fetch_usage(&self, start: &str, end: &str) -> Result<UsageResponse, QuotaError> {
        self.get_data("Usage", USAGE_PATH, &[("startTime", start), ("endTime", end)])
            .await
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn quota_body() -> serde_json::Value {
        json!({
            "code": 200,
            "data": {
                "limits": [
                    {"type": "TOKENS_LIMIT", "unit": 3, "number": 5, "percentage": 12.5, "nextResetTime": 1760000000000i64},
                    {"type": "TIME_LIMIT", "unit": 5, "number": 1, "percentage": 3, "nextResetTime": 1760000000000i64}
                ],
                "level": "lite"
            }
        })
    }

    #[tokio::test]
    async fn test_fetch_quota_sends_bearer_and_parses() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/monitor/usage/quota/limit"))
            .and(header("Authorization", "Bearer test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(quota_body()))
            .expect(1)
            .mount(&server)
            .await;

        let client = ZaiClient::new(server.uri(), Some("test-key".to_string()));
        let quota = client.fetch_quota().await.unwrap();

        assert_eq!(quota.level, "lite");
        assert_eq!(quota.limits.len(), 2);
        assert_eq!(quota.limits[0].percentage, 12.5);
    }

    #[tokio::test]
    async fn test_fetch_quota_non_success_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/monitor/usage/quota/limit"))
            .respond_with(ResponseTemplate::new(401).set_body_string("unauthorized"))
            .mount(&server)
            .await;

        let client = ZaiClient::new(server.uri(), Some("bad".to_string()));
        let err = client.fetch_quota().await.unwrap_err();

        assert!(matches!(
            err,
            QuotaError::Status {
                endpoint: "Quota",
                status: 401
            }
        ));
        assert_eq!(err.to_string(), "Quota API error: 401");
    }

    #[tokio::test]
    async fn test_fetch_quota_malformed_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/monitor/usage/quota/limit"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let client = ZaiClient::new(server.uri(), Some("k".to_string()));
        let err = client.fetch_quota().await.unwrap_err();

        assert!(matches!(err, QuotaError::Parse(_)));
    }

    #[tokio::test]
    async fn test_missing_credential_makes_no_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(quota_body()))
            .expect(0)
            .mount(&server)
            .await;

        let client = ZaiClient::new(server.uri(), None);
        let err = client.fetch_quota().await.unwrap_err();
        assert!(err.is_config());

        let err = client.fetch_usage("a", "b").await.unwrap_err();
        assert!(err.is_config());
    }

    #[tokio::test]
    async fn test_blank_credential_counts_as_missing() {
        let client = ZaiClient::new("http://127.0.0.1:9", Some("   ".to_string()));
        assert!(!client.has_credential());
        assert!(client.fetch_quota().await.unwrap_err().is_config());
    }

    #[tokio::test]
    async fn test_fetch_usage_passes_range() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/monitor/usage/model-usage"))
            .and(query_param("startTime", "2026-10-18 12:00:00"))
            .and(query_param("endTime", "2026-10-19 12:00:00"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {
                    "x_time": ["2026-10-19 11:00"],
                    "modelCallCount": [4],
                    "tokensUsage": [900],
                    "totalUsage": {"totalModelCallCount": 4, "totalTokensUsage": 900}
                }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = ZaiClient::new(format!("{}/", server.uri()), Some("k".to_string()));
        let usage = client
            .fetch_usage("2026-10-18 12:00:00", "2026-10-19 12:00:00")
            .await
            .unwrap();

        assert_eq!(usage.total_usage.total_model_call_count, 4);
        assert_eq!(usage.x_time.len(), 1);
    }

    #[tokio::test]
    async fn test_fetch_usage_non_success_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/monitor/usage/model-usage"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = ZaiClient::new(server.uri(), Some("k".to_string()));
        let err = client.fetch_usage("a", "b").await.unwrap_err();
        assert_eq!(err.to_string(), "Usage API error: 500");
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = ZaiClient::new("https://example.test/api/", None);
        assert_eq!(client.base_url(), "https://example.test/api");
    }
}
