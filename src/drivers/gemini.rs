//! Gemini generateContent 驱动：结构化输出请求与错误分类
//!
//! Google Gemini `generateContent` driver. Key points:
//! - One `user` turn holding the whole prompt as a single text part.
//! - `generationConfig` carries `responseMimeType`, `responseSchema`,
//!   `temperature` and `maxOutputTokens`.
//! - Reply text is `candidates[0].content.parts[*].text`; parts flagged
//!   `thought: true` are skipped.
//! - The API key travels in the `x-goog-api-key` header.
//! - Error bodies look like `{ "error": { "code", "message", "status" } }`.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::time::{Duration, Instant};
use tracing::{info, warn};
use url::Url;

use crate::config::QaConfig;
use crate::error::{Error, ErrorContext};
use crate::error_code::ProviderErrorKind;
use crate::transport::{HttpReply, HttpTransport};
use crate::Result;

use super::{GenerationRequest, ModelDriver};

/// Gemini v1beta REST API base.
pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

pub struct GeminiDriver {
    transport: HttpTransport,
    base_url: Url,
    api_key: Option<String>,
}

impl std::fmt::Debug for GeminiDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiDriver")
            .field("base_url", &self.base_url.as_str())
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl GeminiDriver {
    pub fn new(api_key: Option<String>, base_url: &str, timeout: Duration) -> Result<Self> {
        // Url::join drops the last segment unless the base ends with '/'.
        let normalized = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalized).map_err(|e| {
            Error::configuration_with_context(
                format!("invalid Gemini base URL: {}", e),
                ErrorContext::new()
                    .with_field_path("base_url")
                    .with_details(base_url.to_string())
                    .with_source("gemini_driver"),
            )
        })?;

        Ok(Self {
            transport: HttpTransport::new(timeout)?,
            base_url,
            api_key: api_key.filter(|k| !k.trim().is_empty()),
        })
    }

    pub fn from_config(config: &QaConfig) -> Result<Self> {
        Self::new(config.api_key.clone(), &config.base_url, config.timeout())
    }

    fn endpoint(&self, model: &str) -> Result<Url> {
        self.base_url
            .join(&format!("models/{}:generateContent", model))
            .map_err(|e| {
                Error::configuration_with_context(
                    format!("cannot build endpoint for model '{}': {}", model, e),
                    ErrorContext::new()
                        .with_field_path("model")
                        .with_source("gemini_driver"),
                )
            })
    }

    /// Request body for `generateContent`.
    pub fn build_body(request: &GenerationRequest) -> Value {
        json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": request.prompt }],
            }],
            "generationConfig": request.config,
        })
    }

    /// Turn an HTTP reply into the model's text or a classified error.
    pub fn parse_reply(reply: &HttpReply) -> Result<String> {
        if !reply.is_success() {
            return Err(Self::classify_error(reply));
        }

        let body: Value = serde_json::from_str(&reply.body).map_err(|e| {
            Error::malformed(format!("Gemini reply is not JSON: {}", e), reply.body.as_str())
        })?;

        let text: String = body
            .pointer("/candidates/0/content/parts")
            .and_then(|p| p.as_array())
            .map(|parts| {
                parts
                    .iter()
                    .filter(|p| !p.get("thought").and_then(Value::as_bool).unwrap_or(false))
                    .filter_map(|p| p.get("text").and_then(Value::as_str))
                    .collect()
            })
            .unwrap_or_default();

        if text.is_empty() {
            let reason = body
                .pointer("/promptFeedback/blockReason")
                .or_else(|| body.pointer("/candidates/0/finishReason"))
                .and_then(Value::as_str)
                .unwrap_or("unknown");
            return Err(Error::malformed(
                format!("Gemini reply has no candidate text (reason: {})", reason),
                reply.body.as_str(),
            ));
        }

        Ok(text)
    }

    /// Classify a non-2xx reply.
    ///
    /// Structured fields of the error body decide first, then the HTTP status.
    /// Anything unmatched is [`ProviderErrorKind::Other`].
    pub fn classify_error(reply: &HttpReply) -> Error {
        let body: Option<Value> = serde_json::from_str(&reply.body).ok();
        let error = body.as_ref().and_then(|b| b.get("error"));

        let message = error
            .and_then(|e| e.get("message"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| {
                let trimmed = reply.body.trim();
                if trimmed.is_empty() {
                    format!("HTTP {}", reply.status)
                } else {
                    trimmed.to_string()
                }
            });

        // `details[].reason` (e.g. API_KEY_INVALID) is more specific than `status`.
        let detail_kind = error
            .and_then(|e| e.get("details"))
            .and_then(Value::as_array)
            .and_then(|details| {
                details
                    .iter()
                    .filter_map(|d| d.get("reason").and_then(Value::as_str))
                    .find_map(ProviderErrorKind::from_provider_status)
            });
        let status_kind = error
            .and_then(|e| e.get("status"))
            .and_then(Value::as_str)
            .and_then(ProviderErrorKind::from_provider_status);
        let kind = detail_kind
            .or(status_kind)
            .unwrap_or_else(|| ProviderErrorKind::from_http_status(reply.status));

        Error::provider(kind, Some(reply.status), message)
    }
}

#[async_trait]
impl ModelDriver for GeminiDriver {
    fn provider_id(&self) -> &str {
        "gemini"
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<String> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| Error::not_configured("no Gemini API key is configured"))?;
        let url = self.endpoint(&request.model)?;
        let body = Self::build_body(request);

        let started = Instant::now();
        let reply = self
            .transport
            .post_json(url.as_str(), &[("x-goog-api-key", api_key)], &body)
            .await?;
        info!(
            model = %request.model,
            status = reply.status,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "gemini generateContent completed"
        );

        Self::parse_reply(&reply).map_err(|e| {
            if let Error::Provider { kind, message, .. } = &e {
                warn!(kind = %kind, status = reply.status, "gemini error: {}", message);
            }
            e
        })
    }
}
