//! 模型驱动抽象层：编排器通过 trait 调用外部模型，测试可用替身完全替换
//!
//! Model driver abstraction. The client only ever talks to an
//! `Arc<dyn ModelDriver>`, so the hosted provider can be swapped for a test
//! double without any network access.

pub mod gemini;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::Result;

pub use gemini::GeminiDriver;

/// MIME type requested for structured replies.
pub const JSON_MIME_TYPE: &str = "application/json";

/// Generation knobs sent with every structured request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub response_mime_type: String,
    pub response_schema: Value,
    pub temperature: f32,
    pub max_output_tokens: u32,
}

impl GenerationConfig {
    /// JSON output constrained to `schema`.
    pub fn json(schema: Value, temperature: f32, max_output_tokens: u32) -> Self {
        Self {
            response_mime_type: JSON_MIME_TYPE.to_string(),
            response_schema: schema,
            temperature,
            max_output_tokens,
        }
    }
}

/// One outbound structured-output call.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub model: String,
    pub prompt: String,
    pub config: GenerationConfig,
}

/// Capability to run one structured generation against a hosted model.
///
/// Implementations return the model's raw reply text; interpreting it is the
/// caller's job. Failures must be reported as
/// [`Error::Provider`](crate::Error::Provider) with a
/// [`ProviderErrorKind`](crate::error_code::ProviderErrorKind) already
/// decided, or as [`Error::Transport`](crate::Error::Transport) when the
/// provider was never reached.
#[async_trait]
pub trait ModelDriver: Send + Sync {
    fn provider_id(&self) -> &str;

    /// Whether a credential is available. Clients refuse to start without one.
    fn is_configured(&self) -> bool;

    async fn generate(&self, request: &GenerationRequest) -> Result<String>;
}
