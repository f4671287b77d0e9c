//! Query request and result types.

use crate::cache::Fingerprint;
use crate::{Error, ErrorContext, Result};
use serde::{Deserialize, Serialize};

/// Placeholder for positions the model left unanswered.
pub const NO_ANSWER: &str = "No answer found.";

/// A validated request: one document and the questions to ask about it.
///
/// Construction trims the document and every question and drops blank
/// questions, so two requests that differ only in surrounding whitespace are
/// the same request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryRequest {
    document: String,
    questions: Vec<String>,
}

impl QueryRequest {
    pub fn new<Q: AsRef<str>>(document: &str, questions: &[Q]) -> Result<Self> {
        let document = document.trim();
        if document.is_empty() {
            return Err(Error::invalid_input_with_context(
                "Please provide the document text to answer from.",
                ErrorContext::new()
                    .with_field_path("document")
                    .with_source("input_validator"),
            ));
        }

        let questions: Vec<String> = questions
            .iter()
            .map(|q| q.as_ref().trim())
            .filter(|q| !q.is_empty())
            .map(str::to_string)
            .collect();
        if questions.is_empty() {
            return Err(Error::invalid_input_with_context(
                "Please provide at least one question.",
                ErrorContext::new()
                    .with_field_path("questions")
                    .with_source("input_validator"),
            ));
        }

        Ok(Self {
            document: document.to_string(),
            questions,
        })
    }

    pub fn document(&self) -> &str {
        &self.document
    }

    pub fn questions(&self) -> &[String] {
        &self.questions
    }

    pub fn fingerprint(&self) -> Fingerprint {
        Fingerprint::compute(&self.document, &self.questions)
    }

    /// Fit a model's answer list to this request: pad with [`NO_ANSWER`] or
    /// drop extras so there is exactly one answer per question.
    pub fn align_answers(&self, mut answers: Vec<String>) -> Vec<String> {
        answers.resize_with(self.questions.len(), || NO_ANSWER.to_string());
        answers
    }

    /// Pair each question with its answer, in order.
    pub fn results(&self, answers: &[String]) -> Vec<QueryResult> {
        self.questions
            .iter()
            .enumerate()
            .map(|(index, question)| QueryResult {
                index,
                question: question.clone(),
                answer: answers
                    .get(index)
                    .cloned()
                    .unwrap_or_else(|| NO_ANSWER.to_string()),
            })
            .collect()
    }
}

/// One answered question, ready for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryResult {
    pub index: usize,
    pub question: String,
    pub answer: String,
}

impl QueryResult {
    /// Identifier that stays stable across re-renders of the same result list.
    pub fn display_id(&self) -> String {
        format!("{}-{}", self.index, self.question)
    }
}
