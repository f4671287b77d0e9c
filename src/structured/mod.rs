//! Structured output module for grounded-qa.
//!
//! - `AnswerPayload`: the JSON reply contract and its strict parser
//! - `json_schema_from_type` / `to_response_schema`: schema generation for the
//!   provider's structured-output mode
//!
//! # Examples
//!
//! ```
//! use grounded_qa::structured::AnswerPayload;
//!
//! let payload = AnswerPayload::parse_strict(r#"{"answers": ["Thirty days."]}"#)?;
//! assert_eq!(payload.answers.len(), 1);
//! assert!(AnswerPayload::parse_strict("Thirty days.").is_err());
//! # Ok::<(), grounded_qa::Error>(())
//! ```

pub mod payload;
pub mod schema;

pub use payload::AnswerPayload;
pub use schema::{json_schema_from_type, to_response_schema};
