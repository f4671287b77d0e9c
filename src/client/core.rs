use crate::cache::AnswerCache;
use crate::client::prompt::build_prompt;
use crate::drivers::{GenerationConfig, GenerationRequest, ModelDriver};
use crate::structured::AnswerPayload;
use crate::types::{QueryRequest, QueryResult};
use crate::{Error, Result};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

/// Model parameters applied to every outbound call.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationSettings {
    pub model: String,
    pub temperature: f32,
    pub max_output_tokens: u32,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            model: crate::config::DEFAULT_MODEL.to_string(),
            temperature: crate::config::DEFAULT_TEMPERATURE,
            max_output_tokens: crate::config::DEFAULT_MAX_OUTPUT_TOKENS,
        }
    }
}

/// Answers questions about a document, one model call per distinct request.
///
/// Holds no state of its own between calls; everything reusable lives in the
/// [`AnswerCache`], which may be shared with other clients.
pub struct QaClient {
    pub(crate) driver: Arc<dyn ModelDriver>,
    pub(crate) cache: AnswerCache,
    pub(crate) settings: GenerationSettings,
}

impl QaClient {
    pub fn builder() -> crate::client::builder::QaClientBuilder {
        crate::client::builder::QaClientBuilder::new()
    }

    /// Gemini-backed client configured from `config`.
    pub fn from_config(config: &crate::config::QaConfig) -> Result<Self> {
        crate::client::builder::QaClientBuilder::from_config(config)?.build()
    }

    /// Answer `questions` strictly from `document`.
    ///
    /// Returns exactly one answer per non-blank question, in order. Questions
    /// the model skipped are answered with [`NO_ANSWER`](crate::types::NO_ANSWER).
    pub async fn answer<Q: AsRef<str>>(&self, document: &str, questions: &[Q]) -> Result<Vec<String>> {
        let request = QueryRequest::new(document, questions)?;
        self.answer_request(&request).await
    }

    /// Same as [`answer`](Self::answer), paired with the questions for display.
    pub async fn ask<Q: AsRef<str>>(&self, document: &str, questions: &[Q]) -> Result<Vec<QueryResult>> {
        let request = QueryRequest::new(document, questions)?;
        let answers = self.answer_request(&request).await?;
        Ok(request.results(&answers))
    }

    pub async fn answer_request(&self, request: &QueryRequest) -> Result<Vec<String>> {
        let fingerprint = request.fingerprint();
        let span = info_span!(
            "answer",
            request_id = %Uuid::new_v4(),
            fingerprint = fingerprint.short(),
            questions = request.questions().len(),
        );

        async move {
            self.cache.sweep().await;
            if let Some(answers) = self.cache.get(&fingerprint).await {
                return Ok(answers);
            }

            let raw = self.call_model(request).await?;
            let payload = AnswerPayload::parse_strict(&raw).map_err(|e| {
                warn!(reply_len = raw.len(), "model reply rejected: {}", e);
                e
            })?;

            let expected = request.questions().len();
            let returned = payload.answers.len();
            if returned != expected {
                warn!(expected, returned, "model answer count differs from question count");
            }
            let answers = request.align_answers(payload.answers);

            self.cache.put(&fingerprint, &answers).await;
            debug!("answer set cached");
            Ok::<_, Error>(answers)
        }
        .instrument(span)
        .await
    }

    async fn call_model(&self, request: &QueryRequest) -> Result<String> {
        let generation = GenerationRequest {
            model: self.settings.model.clone(),
            prompt: build_prompt(request),
            config: GenerationConfig::json(
                AnswerPayload::response_schema(),
                self.settings.temperature,
                self.settings.max_output_tokens,
            ),
        };

        let started = Instant::now();
        let result = self.driver.generate(&generation).await;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        match &result {
            Ok(_) => info!(
                provider = self.driver.provider_id(),
                model = %generation.model,
                elapsed_ms,
                "model call succeeded"
            ),
            Err(e) => warn!(
                provider = self.driver.provider_id(),
                model = %generation.model,
                elapsed_ms,
                kind = e.provider_kind().map(|k| k.name()).unwrap_or("none"),
                "model call failed: {}",
                e
            ),
        }
        result
    }

    pub fn cache(&self) -> &AnswerCache {
        &self.cache
    }

    pub fn cache_stats(&self) -> crate::cache::CacheStats {
        self.cache.stats()
    }

    pub fn settings(&self) -> &GenerationSettings {
        &self.settings
    }

    pub fn provider_id(&self) -> &str {
        self.driver.provider_id()
    }
}

impl std::fmt::Debug for QaClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QaClient")
            .field("provider", &self.driver.provider_id())
            .field("cache", &self.cache.backend_name())
            .field("settings", &self.settings)
            .finish()
    }
}

/// Reject a driver that cannot authenticate before any request is made.
pub(crate) fn ensure_configured(driver: &dyn ModelDriver) -> Result<()> {
    if driver.is_configured() {
        Ok(())
    } else {
        Err(Error::not_configured(format!(
            "no API key is configured for provider '{}'; set GEMINI_API_KEY",
            driver.provider_id()
        )))
    }
}
