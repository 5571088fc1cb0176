// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 textflow contributors

//! HTTP provider
//!
//! Sends each transformation to a JSON endpoint:
//!
//! ```text
//! POST {endpoint}/v1/transform
//! { "type": "translate", "text": "...", "parameters": { "language": "es" } }
//!
//! 200 { "text": "..." }
//! ```
//!
//! Non-success statuses are mapped onto [`ProviderError`] kinds so the
//! caller's retry policy can tell transient failures from bad requests.

use async_trait::async_trait;
use reqwest::header::RETRY_AFTER;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::TransformationProvider;
use crate::errors::ProviderError;
use crate::pipeline::{StepConfig, StepParameters, StepType};

#[derive(Serialize)]
struct TransformRequest<'a> {
    #[serde(rename = "type")]
    step_type: StepType,
    text: &'a str,
    parameters: StepParameters,
}

#[derive(Deserialize)]
struct TransformResponse {
    text: String,
}

/// Provider backed by a remote HTTP service
pub struct HttpProvider {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
    request_timeout: Option<Duration>,
}

impl HttpProvider {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            api_key: None,
            request_timeout: None,
        }
    }

    /// Send `Authorization: Bearer <key>` with every request
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Bound each HTTP request independently of the engine's step timeout
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    fn transform_url(&self) -> String {
        format!("{}/v1/transform", self.endpoint)
    }
}

#[async_trait]
impl TransformationProvider for HttpProvider {
    fn name(&self) -> &str {
        "http"
    }

    async fn transform(&self, text: &str, config: &StepConfig) -> Result<String, ProviderError> {
        let payload = TransformRequest {
            step_type: config.step_type(),
            text,
            parameters: config.parameters(),
        };

        let mut request = self.client.post(self.transform_url()).json(&payload);
        if let Some(ref key) = self.api_key {
            request = request.bearer_auth(key);
        }
        if let Some(timeout) = self.request_timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await.map_err(map_send_error)?;
        let status = response.status();

        if status.is_success() {
            let body: TransformResponse = response.json().await.map_err(|e| {
                ProviderError::unavailable(format!("malformed provider response: {}", e))
            })?;
            return Ok(body.text);
        }

        let retry_after_secs = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok());

        let body = response.text().await.unwrap_or_default();
        let message = if body.trim().is_empty() {
            format!("provider returned status {}", status)
        } else {
            format!("provider returned status {}: {}", status, body.trim())
        };

        Err(classify_status(status, message, retry_after_secs))
    }
}

fn classify_status(
    status: StatusCode,
    message: String,
    retry_after_secs: Option<u64>,
) -> ProviderError {
    match status {
        StatusCode::TOO_MANY_REQUESTS => ProviderError::rate_limited(message, retry_after_secs),
        StatusCode::BAD_REQUEST
        | StatusCode::UNPROCESSABLE_ENTITY
        | StatusCode::PAYLOAD_TOO_LARGE => ProviderError::invalid_input(message),
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => ProviderError::timeout(message),
        _ => ProviderError::unavailable(message),
    }
}

fn map_send_error(e: reqwest::Error) -> ProviderError {
    if e.is_timeout() {
        ProviderError::timeout(e.to_string())
    } else {
        ProviderError::unavailable(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::FailureKind;
    use crate::pipeline::{Language, Tone};
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_sends_normalized_parameters() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/transform"))
            .and(header("authorization", "Bearer secret"))
            .and(body_json(json!({
                "type": "translate",
                "text": "hello",
                "parameters": { "language": "es" }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "text": "hola" })))
            .expect(1)
            .mount(&server)
            .await;

        let provider = HttpProvider::new(format!("{}/", server.uri())).with_api_key("secret");
        let output = provider
            .transform(
                "hello",
                &StepConfig::Translate {
                    language: Language::Es,
                },
            )
            .await
            .unwrap();

        assert_eq!(output, "hola");
    }

    #[tokio::test]
    async fn test_rate_limit_with_retry_after() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "12"))
            .mount(&server)
            .await;

        let provider = HttpProvider::new(server.uri());
        let err = provider
            .transform("x", &StepConfig::Extract)
            .await
            .unwrap_err();

        match err {
            ProviderError::RateLimited {
                retry_after_secs, ..
            } => assert_eq!(retry_after_secs, Some(12)),
            other => panic!("Expected RateLimited, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unprocessable_is_invalid_input() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(422).set_body_string("text too long"))
            .mount(&server)
            .await;

        let provider = HttpProvider::new(server.uri());
        let err = provider
            .transform(
                "x",
                &StepConfig::Rewrite {
                    tone: Tone::Casual,
                },
            )
            .await
            .unwrap_err();

        assert_eq!(err.kind(), FailureKind::InvalidInput);
        assert!(err.to_string().contains("text too long"));
    }

    #[tokio::test]
    async fn test_server_error_is_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let provider = HttpProvider::new(server.uri());
        let err = provider
            .transform("x", &StepConfig::Extract)
            .await
            .unwrap_err();

        assert_eq!(err.kind(), FailureKind::Unavailable);
    }

    #[tokio::test]
    async fn test_gateway_timeout_is_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(504))
            .mount(&server)
            .await;

        let provider = HttpProvider::new(server.uri());
        let err = provider
            .transform("x", &StepConfig::Extract)
            .await
            .unwrap_err();

        assert_eq!(err.kind(), FailureKind::Timeout);
    }

    #[tokio::test]
    async fn test_connection_refused_is_unavailable() {
        let provider = HttpProvider::new("http://127.0.0.1:9");
        let err = provider
            .transform("x", &StepConfig::Extract)
            .await
            .unwrap_err();

        assert_eq!(err.kind(), FailureKind::Unavailable);
    }
}
