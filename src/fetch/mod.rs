//! Upstream data API access.
//!
//! One POST per call, no retries. Request bodies are wrapped as
//! `{"payload": {...}}` and authenticated with the `x-discord-id` and
//! `api-key` headers.

mod refresh;

pub use refresh::*;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE, USER_AGENT};
use reqwest::Client;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{debug, info};
use url::Url;

use crate::config::ApiConfig;
use crate::storage::StorageError;

/// Errors that can occur during fetching.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("API credentials missing: set api.api_key and api.discord_id")]
    MissingCredentials,

    #[error("HTTP {status}: {message}")]
    HttpStatus { status: u16, message: String },

    #[error("Upstream API error {code}: {message}")]
    Upstream { code: i64, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Something that can produce raw upstream documents.
#[async_trait]
pub trait LogSource: Send + Sync {
    /// TW log document for the guild of `ally_code`.
    async fn tw_logs(&self, ally_code: &str) -> Result<Value, FetchError>;

    /// Guild profile document including the member list.
    async fn guild(&self, guild_id: &str) -> Result<Value, FetchError>;
}

/// Client for the upstream data API.
pub struct ApiClient {
    client: Client,
    base_url: String,
    api_key: String,
    discord_id: String,
}

impl ApiClient {
    pub fn new(config: &ApiConfig) -> Result<Self, FetchError> {
        if !config.has_credentials() {
            return Err(FetchError::MissingCredentials);
        }
        Url::parse(&config.base_url)
            .map_err(|e| FetchError::InvalidUrl(format!("{}: {}", config.base_url, e)))?;

        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("twlog-analyzer/", env!("CARGO_PKG_VERSION"))),
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            discord_id: config.discord_id.clone(),
        })
    }

    /// Full URL for an endpoint name such as `twlogs`.
    pub fn endpoint_url(&self, endpoint: &str) -> Result<Url, FetchError> {
        let raw = format!("{}/api/{}", self.base_url, endpoint.trim_start_matches('/'));
        Url::parse(&raw).map_err(|e| FetchError::InvalidUrl(format!("{}: {}", raw, e)))
    }

    async fn post(&self, endpoint: &str, payload: Value) -> Result<Value, FetchError> {
        let url = self.endpoint_url(endpoint)?;
        info!("POST {}", url);
        debug!("Payload: {}", payload);

        let response = self
            .client
            .post(url)
            .header("x-discord-id", &self.discord_id)
            .header("api-key", &self.api_key)
            .json(&json!({ "payload": payload }))
            .send()
            .await?;

        let status = response.status();
        info!("Response status: {}", status);
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = if body.is_empty() {
                status.canonical_reason().unwrap_or("Unknown").to_string()
            } else {
                body.chars().take(500).collect()
            };
            return Err(FetchError::HttpStatus {
                status: status.as_u16(),
                message,
            });
        }

        let document: Value = response.json().await?;
        check_upstream_code(&document)?;
        Ok(document)
    }

    /// Player profile document.
    pub async fn player(&self, ally_code: &str) -> Result<Value, FetchError> {
        self.post("player", json!({ "allyCode": ally_code, "enums": false }))
            .await
    }
}

#[async_trait]
impl LogSource for ApiClient {
    async fn tw_logs(&self, ally_code: &str) -> Result<Value, FetchError> {
        self.post("twlogs", json!({ "allyCode": ally_code, "enums": false }))
            .await
    }

    async fn guild(&self, guild_id: &str) -> Result<Value, FetchError> {
        self.post("guild", json!({ "guildId": guild_id, "enums": false }))
            .await
    }
}

/// Reject bodies that carry a non-zero `code` field.
pub fn check_upstream_code(document: &Value) -> Result<(), FetchError> {
    match document.get("code").and_then(Value::as_i64) {
        Some(code) if code != 0 => Err(FetchError::Upstream {
            code,
            message: document
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("no message")
                .to_string(),
        }),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderMap as AxumHeaders, StatusCode};
    use axum::routing::post;
    use axum::{Json, Router};

    fn api_config(base_url: &str) -> ApiConfig {
        ApiConfig {
            base_url: base_url.to_string(),
            api_key: "secret".to_string(),
            discord_id: "1234".to_string(),
            timeout_seconds: 5,
        }
    }

    async fn echo(headers: AxumHeaders, Json(body): Json<Value>) -> Json<Value> {
        let header = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default()
                .to_string()
        };
        Json(json!({
            "discord": header("x-discord-id"),
            "key": header("api-key"),
            "body": body,
        }))
    }

    async fn spawn_upstream() -> String {
        let app = Router::new()
            .route("/api/twlogs", post(echo))
            .route(
                "/api/guild",
                post(|| async { Json(json!({"code": 401, "message": "bad key"})) }),
            )
            .route(
                "/api/player",
                post(|| async { (StatusCode::SERVICE_UNAVAILABLE, "down") }),
            );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[test]
    fn test_new_requires_credentials() {
        let result = ApiClient::new(&ApiConfig::default());
        assert!(matches!(result, Err(FetchError::MissingCredentials)));
    }

    #[test]
    fn test_new_rejects_bad_base_url() {
        let result = ApiClient::new(&api_config("not a url"));
        assert!(matches!(result, Err(FetchError::InvalidUrl(_))));
    }

    #[test]
    fn test_endpoint_url() {
        let client = ApiClient::new(&api_config("https://example.com/")).unwrap();
        assert_eq!(
            client.endpoint_url("twlogs").unwrap().as_str(),
            "https://example.com/api/twlogs"
        );
        assert_eq!(
            client.endpoint_url("/guild").unwrap().as_str(),
            "https://example.com/api/guild"
        );
    }

    #[test]
    fn test_check_upstream_code() {
        assert!(check_upstream_code(&json!({"data": []})).is_ok());
        assert!(check_upstream_code(&json!({"code": 0})).is_ok());
        assert!(matches!(
            check_upstream_code(&json!({"code": 500, "message": "boom"})),
            Err(FetchError::Upstream { code: 500, .. })
        ));
    }

    #[tokio::test]
    async fn test_post_wraps_payload_and_sends_headers() {
        let base_url = spawn_upstream().await;
        let client = ApiClient::new(&api_config(&base_url)).unwrap();

        let echoed = client.tw_logs("123456789").await.unwrap();
        assert_eq!(echoed["discord"], "1234");
        assert_eq!(echoed["key"], "secret");
        assert_eq!(echoed["body"]["payload"]["allyCode"], "123456789");
        assert_eq!(echoed["body"]["payload"]["enums"], false);
    }

    #[tokio::test]
    async fn test_upstream_error_code_and_status() {
        let base_url = spawn_upstream().await;
        let client = ApiClient::new(&api_config(&base_url)).unwrap();

        let err = client.guild("G1").await.unwrap_err();
        assert!(matches!(err, FetchError::Upstream { code: 401, .. }));

        let err = client.player("123456789").await.unwrap_err();
        match err {
            FetchError::HttpStatus { status, message } => {
                assert_eq!(status, 503);
                assert_eq!(message, "down");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
