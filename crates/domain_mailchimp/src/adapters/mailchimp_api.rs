//! MailChimp API Adapter
//!
//! This module provides the [`RemoteDirectory`] implementation backed by the
//! MailChimp Marketing API v3.
//!
//! # Configuration
//!
//! ```rust,ignore
//! let config = MailChimpConfig {
//!     api_key: std::env::var("API_MAILCHIMP_API_KEY")?,
//!     base_url: None,
//!     timeout_secs: 30,
//! };
//! let adapter = MailChimpAdapter::new(config)?;
//! ```
//!
//! Without an explicit `base_url` the data center is taken from the API key
//! suffix: a key ending in `-us6` talks to `https://us6.api.mailchimp.com/3.0`.
//!
//! # Error Handling
//!
//! MailChimp answers errors with `application/problem+json` bodies. The
//! `detail` (or `title`) of the body becomes the error message, classified as:
//! - 401/403 -> `PortError::Unauthorized`
//! - 429 -> `PortError::RateLimited`
//! - 5xx -> `PortError::ServiceUnavailable`
//! - other 4xx -> `PortError::Rejected`
//! - timeouts -> `PortError::Timeout`
//! - connection failures -> `PortError::Connection`

use async_trait::async_trait;
use reqwest::{Method, StatusCode};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::fmt;
use std::time::{Duration, Instant};
use tracing::{debug, instrument};
use validator::Validate;

use core_kernel::{
    AdapterHealth, CoreError, DomainPort, HealthCheckResult, HealthCheckable, PortError,
};

use crate::ports::{RemoteDirectory, RemoteMember, UpdateMode};

const ADAPTER_ID: &str = "mailchimp-api-adapter";

/// Configuration for the MailChimp adapter
#[derive(Clone, Deserialize, Validate)]
pub struct MailChimpConfig {
    /// API key, `<key>-<data center>`
    #[validate(length(min = 1, message = "MailChimp API key must not be empty"))]
    pub api_key: String,

    /// Overrides the API root derived from the key's data center
    #[validate(url)]
    pub base_url: Option<String>,

    /// Request timeout in seconds
    #[validate(range(min = 1, max = 300))]
    pub timeout_secs: u64,
}

impl Default for MailChimpConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: None,
            timeout_secs: 30,
        }
    }
}

impl fmt::Debug for MailChimpConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MailChimpConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl MailChimpConfig {
    /// Returns the API root without a trailing slash
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Configuration` if no base URL is configured and the
    /// API key carries no data center suffix.
    pub fn api_root(&self) -> Result<String, CoreError> {
        if let Some(base_url) = &self.base_url {
            return Ok(base_url.trim_end_matches('/').to_string());
        }

        match self.api_key.rsplit_once('-') {
            Some((_, dc)) if !dc.is_empty() && dc.chars().all(|c| c.is_ascii_alphanumeric()) => {
                Ok(format!("https://{}.api.mailchimp.com/3.0", dc))
            }
            _ => Err(CoreError::Configuration(
                "MailChimp API key has no data center suffix and no base URL is set".to_string(),
            )),
        }
    }
}

/// Error body returned by MailChimp
#[derive(Debug, Default, Deserialize)]
struct ProblemDetail {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    detail: Option<String>,
}

/// MailChimp adapter implementing the RemoteDirectory trait
#[derive(Debug)]
pub struct MailChimpAdapter {
    client: reqwest::Client,
    config: MailChimpConfig,
    api_root: String,
}

impl MailChimpAdapter {
    /// Creates a new adapter with the given configuration
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Configuration` if the configuration is invalid or
    /// the HTTP client cannot be built.
    pub fn new(config: MailChimpConfig) -> Result<Self, CoreError> {
        config
            .validate()
            .map_err(|e| CoreError::Configuration(e.to_string()))?;
        let api_root = config.api_root()?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("mailchimp-mirror/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| CoreError::Configuration(e.to_string()))?;

        Ok(Self {
            client,
            config,
            api_root,
        })
    }

    /// Returns the API root requests are sent to
    pub fn api_root(&self) -> &str {
        &self.api_root
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.api_root, path.trim_start_matches('/'))
    }

    /// Sends a request and returns the decoded JSON object, if any
    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&Map<String, Value>>,
    ) -> Result<Option<Map<String, Value>>, PortError> {
        let mut request = self
            .client
            .request(method.clone(), self.url(path))
            .basic_auth("apikey", Some(&self.config.api_key));
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| self.transport_error(&method, path, e))?;

        let status = response.status();
        debug!(%method, path, status = status.as_u16(), "MailChimp responded");

        if !status.is_success() {
            let retry_after = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok());
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status, &body, retry_after));
        }

        if status == StatusCode::NO_CONTENT {
            return Ok(None);
        }

        let text = response
            .text()
            .await
            .map_err(|e| self.transport_error(&method, path, e))?;
        if text.trim().is_empty() {
            return Ok(None);
        }

        match serde_json::from_str::<Value>(&text) {
            Ok(Value::Object(map)) => Ok(Some(map)),
            Ok(_) => Err(PortError::transformation(format!(
                "MailChimp {} {} did not return a JSON object",
                method, path
            ))),
            Err(e) => Err(PortError::transformation(format!(
                "MailChimp {} {} returned invalid JSON: {}",
                method, path, e
            ))),
        }
    }

    fn transport_error(&self, method: &Method, path: &str, error: reqwest::Error) -> PortError {
        if error.is_timeout() {
            PortError::Timeout {
                operation: format!("{} {}", method, path),
                duration_ms: self.config.timeout_secs * 1000,
            }
        } else if error.is_connect() {
            PortError::Connection {
                message: format!("Could not reach MailChimp: {}", error),
                source: Some(Box::new(error)),
            }
        } else {
            PortError::Internal {
                message: format!("MailChimp request failed: {}", error),
                source: Some(Box::new(error)),
            }
        }
    }
}

/// Classifies an unsuccessful MailChimp response
fn status_error(status: StatusCode, body: &str, retry_after: Option<u64>) -> PortError {
    let problem = serde_json::from_str::<ProblemDetail>(body).unwrap_or_default();
    let message = problem
        .detail
        .filter(|d| !d.trim().is_empty())
        .or(problem.title)
        .or_else(|| (!body.trim().is_empty()).then(|| body.trim().to_string()))
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("Unknown error")
                .to_string()
        });

    match status.as_u16() {
        401 | 403 => PortError::Unauthorized { message },
        429 => PortError::RateLimited {
            retry_after_secs: retry_after.unwrap_or(0),
        },
        500..=599 => PortError::ServiceUnavailable {
            service: format!("MailChimp ({}): {}", status.as_u16(), message),
        },
        code => PortError::rejected(code, message),
    }
}

fn member_path(list_id: &str, member_id: &str) -> String {
    format!("lists/{}/members/{}", list_id, member_id)
}

impl DomainPort for MailChimpAdapter {}

#[async_trait]
impl HealthCheckable for MailChimpAdapter {
    /// Calls the `/ping` endpoint
    async fn health_check(&self) -> HealthCheckResult {
        let start = Instant::now();
        let result = self.send(Method::GET, "ping", None).await;
        let latency_ms = start.elapsed().as_millis() as u64;

        match result {
            Ok(body) => {
                let status = body
                    .as_ref()
                    .and_then(|b| b.get("health_status"))
                    .and_then(Value::as_str)
                    .unwrap_or("ok")
                    .to_string();
                HealthCheckResult::new(ADAPTER_ID, AdapterHealth::Healthy, latency_ms)
                    .with_message(status)
            }
            Err(e) => HealthCheckResult::new(ADAPTER_ID, AdapterHealth::Unhealthy, latency_ms)
                .with_message(e.to_string()),
        }
    }
}

#[async_trait]
impl RemoteDirectory for MailChimpAdapter {
    #[instrument(skip(self, fields))]
    async fn create_member(
        &self,
        list_id: &str,
        fields: &Map<String, Value>,
    ) -> Result<RemoteMember, PortError> {
        let path = format!("lists/{}/members", list_id);
        self.send(Method::POST, &path, Some(fields))
            .await
            .map(|body| RemoteMember::new(body.unwrap_or_default()))
    }

    #[instrument(skip(self, fields))]
    async fn update_member(
        &self,
        list_id: &str,
        member_id: &str,
        fields: &Map<String, Value>,
        mode: UpdateMode,
    ) -> Result<RemoteMember, PortError> {
        let method = match mode {
            UpdateMode::Patch => Method::PATCH,
            UpdateMode::Replace => Method::PUT,
        };
        self.send(method, &member_path(list_id, member_id), Some(fields))
            .await
            .map(|body| RemoteMember::new(body.unwrap_or_default()))
    }

    #[instrument(skip(self))]
    async fn delete_member(&self, list_id: &str, member_id: &str) -> Result<(), PortError> {
        self.send(Method::DELETE, &member_path(list_id, member_id), None)
            .await
            .map(|_| ())
    }

    #[instrument(skip(self))]
    async fn delete_member_permanent(&self, list_id: &str, member_id: &str) -> Result<(), PortError> {
        let path = format!("{}/actions/delete-permanent", member_path(list_id, member_id));
        self.send(Method::POST, &path, None).await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(api_key: &str) -> MailChimpConfig {
        MailChimpConfig {
            api_key: api_key.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_config_defaults() {
        let config = MailChimpConfig::default();
        assert_eq!(config.timeout_secs, 30);
        assert!(config.base_url.is_none());
    }

    #[test]
    fn test_api_root_from_data_center() {
        let root = config("0123456789abcdef0123456789abcdef-us6").api_root().unwrap();
        assert_eq!(root, "https://us6.api.mailchimp.com/3.0");
    }

    #[test]
    fn test_api_root_override() {
        let config = MailChimpConfig {
            base_url: Some("http://localhost:4010/3.0/".to_string()),
            ..config("no-dc-needed")
        };
        assert_eq!(config.api_root().unwrap(), "http://localhost:4010/3.0");
    }

    #[test]
    fn test_api_root_requires_data_center() {
        assert!(config("0123456789abcdef").api_root().is_err());
        assert!(config("0123456789abcdef-").api_root().is_err());
    }

    #[test]
    fn test_adapter_rejects_invalid_config() {
        assert!(MailChimpAdapter::new(config("")).is_err());

        let bad_url = MailChimpConfig {
            base_url: Some("not a url".to_string()),
            ..config("key-us1")
        };
        assert!(MailChimpAdapter::new(bad_url).is_err());

        let bad_timeout = MailChimpConfig {
            timeout_secs: 0,
            ..config("key-us1")
        };
        assert!(MailChimpAdapter::new(bad_timeout).is_err());
    }

    #[test]
    fn test_adapter_builds_urls() {
        let adapter = MailChimpAdapter::new(config("key-us19")).unwrap();
        assert_eq!(adapter.api_root(), "https://us19.api.mailchimp.com/3.0");
        assert_eq!(
            adapter.url(&member_path("9e67587f52", "62eeb292278cc15f5817cb78f7790b08")),
            "https://us19.api.mailchimp.com/3.0/lists/9e67587f52/members/62eeb292278cc15f5817cb78f7790b08"
        );
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let rendered = format!("{:?}", config("secret-us1"));
        assert!(!rendered.contains("secret"));
    }

    #[test]
    fn test_problem_detail_becomes_message() {
        let body = r#"{"type":"https://mailchimp.com/developer/marketing/docs/errors/","title":"Member Exists","status":400,"detail":"ada@example.com is already a list member. Use PUT to insert or update list members.","instance":"4b0b4a0e"}"#;
        let error = status_error(StatusCode::BAD_REQUEST, body, None);

        match error {
            PortError::Rejected { status, message } => {
                assert_eq!(status, 400);
                assert!(message.starts_with("ada@example.com is already a list member."));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_title_used_when_detail_missing() {
        let error = status_error(StatusCode::NOT_FOUND, r#"{"title":"Resource Not Found"}"#, None);
        assert_eq!(error.detail(), "Resource Not Found");
    }

    #[test]
    fn test_status_classification() {
        assert!(matches!(
            status_error(StatusCode::UNAUTHORIZED, "", None),
            PortError::Unauthorized { .. }
        ));
        assert!(matches!(
            status_error(StatusCode::TOO_MANY_REQUESTS, "", Some(12)),
            PortError::RateLimited { retry_after_secs: 12 }
        ));
        let unavailable = status_error(StatusCode::SERVICE_UNAVAILABLE, "", None);
        assert!(unavailable.is_transient());
        assert!(unavailable.to_string().contains("Service Unavailable"));
    }

    #[test]
    fn test_plain_text_body_is_kept() {
        let error = status_error(StatusCode::BAD_REQUEST, "bad things", None);
        assert_eq!(error.detail(), "bad things");
    }
}
