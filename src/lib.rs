//! # grounded-qa
//!
//! 基于单个文档回答问题：一次模型调用，答案按指纹缓存。
//!
//! Document-grounded question answering over a hosted large language model.
//!
//! ## Overview
//!
//! A caller pastes a document and a list of questions; [`QaClient`] asks the
//! model to answer every question strictly from that document, in one
//! structured-output call, and caches the answer set under a fingerprint of
//! the request so that repeating the same request within the TTL costs
//! nothing.
//!
//! ## Core Philosophy
//!
//! - **Grounded**: the prompt forbids outside knowledge and asks the model to
//!   say when the document is silent
//! - **Content-addressed**: cache keys are SHA-256 digests of the document and
//!   the ordered questions
//! - **Injectable**: the cache and the model driver are explicit values, so
//!   tests replace the provider entirely
//! - **Typed failures**: invalid input, missing configuration, malformed
//!   replies and provider errors are distinct [`Error`] variants
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use grounded_qa::{QaClient, QaConfig};
//!
//! #[tokio::main]
//! async fn main() -> grounded_qa::Result<()> {
//!     let client = QaClient::from_config(&QaConfig::from_env()?)?;
//!
//!     let results = client
//!         .ask("Grace period is thirty days.", &["What is the grace period?"])
//!         .await?;
//!     for r in results {
//!         println!("{}: {}", r.question, r.answer);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`client`] | The orchestrating client, its builder and prompt construction |
//! | [`cache`] | Fingerprints and the TTL-bounded answer cache |
//! | [`drivers`] | Model driver trait and the Gemini implementation |
//! | [`structured`] | Reply contract, strict parsing and response schema |
//! | [`types`] | Query request and result types |
//! | [`config`] | File and environment configuration |
//! | [`error_code`] | Provider failure categories |
//! | [`transport`] | HTTP transport used by drivers |

pub mod cache;
pub mod client;
pub mod config;
pub mod drivers;
pub mod error_code;
pub mod structured;
pub mod transport;
pub mod types;

// Re-export main types for convenience
pub use cache::{AnswerCache, CacheConfig, Fingerprint};
pub use client::{GenerationSettings, QaClient, QaClientBuilder};
pub use config::QaConfig;
pub use drivers::{GenerationRequest, ModelDriver};
pub use error_code::ProviderErrorKind;
pub use types::{QueryRequest, QueryResult, NO_ANSWER};

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the library
pub mod error;
pub use error::{Error, ErrorContext};
