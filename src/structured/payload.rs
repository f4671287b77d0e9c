//! The `{ "answers": [...] }` reply contract.

use crate::structured::schema::{json_schema_from_type, to_response_schema};
use crate::{Error, Result};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Structured reply requested from the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct AnswerPayload {
    /// One answer per question, in the order the questions were asked.
    pub answers: Vec<String>,
}

impl AnswerPayload {
    /// Schema sent as the provider's `responseSchema`.
    pub fn response_schema() -> serde_json::Value {
        to_response_schema(json_schema_from_type::<Self>())
    }

    /// Parse a raw model reply.
    ///
    /// The reply must be a bare JSON document; text around it or markdown
    /// fences are rejected rather than guessed at.
    pub fn parse_strict(raw: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(raw.trim())
            .map_err(|e| Error::malformed(format!("reply is not valid JSON: {}", e), raw))?;
        serde_json::from_value(value).map_err(|e| {
            Error::malformed(
                format!("reply does not match {{\"answers\": [string]}}: {}", e),
                raw,
            )
        })
    }
}
