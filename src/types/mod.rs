//! 类型模块：问答请求与结果。
//!
//! # Types Module
//!
//! | Type | Description |
//! |------|-------------|
//! | [`QueryRequest`] | Validated document plus ordered questions |
//! | [`QueryResult`] | One (question, answer) pair for display |
//! | [`NO_ANSWER`] | Sentinel used for questions the model skipped |
//!
//! ## Example
//!
//! ```rust
//! use grounded_qa::types::{QueryRequest, NO_ANSWER};
//!
//! let request = QueryRequest::new("Grace period is thirty days.", &["What is the grace period?", "Who pays?"])?;
//! let answers = request.align_answers(vec!["Thirty days.".to_string()]);
//! assert_eq!(answers[1], NO_ANSWER);
//! # Ok::<(), grounded_qa::Error>(())
//! ```

pub mod query;

pub use query::{QueryRequest, QueryResult, NO_ANSWER};
