//! End-to-end behaviour of QaClient against a scripted model driver.

use async_trait::async_trait;
use grounded_qa::cache::{CacheConfig, DEFAULT_TTL};
use grounded_qa::{
    AnswerCache, Error, GenerationRequest, ModelDriver, ProviderErrorKind, QaClient, NO_ANSWER,
};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Barrier;

enum Reply {
    Text(String),
    Fail(ProviderErrorKind, u16),
}

/// Pops scripted replies in order; repeats the last text once the script runs out.
struct ScriptedDriver {
    calls: Arc<AtomicUsize>,
    script: Mutex<VecDeque<Reply>>,
    fallback: String,
    configured: bool,
    last_request: Mutex<Option<GenerationRequest>>,
    gate: Option<Arc<Barrier>>,
}

impl ScriptedDriver {
    fn answering(reply: &str) -> Self {
        Self {
            calls: Arc::new(AtomicUsize::new(0)),
            script: Mutex::new(VecDeque::new()),
            fallback: reply.to_string(),
            configured: true,
            last_request: Mutex::new(None),
            gate: None,
        }
    }

    /// Hold every call until `n` calls are in flight at once.
    fn gated(self, n: usize) -> Self {
        Self {
            gate: Some(Arc::new(Barrier::new(n))),
            ..self
        }
    }

    fn then(self, reply: Reply) -> Self {
        self.script.lock().unwrap().push_back(reply);
        self
    }

    fn unconfigured() -> Self {
        Self {
            configured: false,
            ..Self::answering(r#"{"answers":[]}"#)
        }
    }
}

#[async_trait]
impl ModelDriver for ScriptedDriver {
    fn provider_id(&self) -> &str {
        "scripted"
    }

    fn is_configured(&self) -> bool {
        self.configured
    }

    async fn generate(&self, request: &GenerationRequest) -> grounded_qa::Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some(request.clone());
        if let Some(gate) = &self.gate {
            gate.wait().await;
        }
        match self.script.lock().unwrap().pop_front() {
            Some(Reply::Text(text)) => Ok(text),
            Some(Reply::Fail(kind, status)) => {
                Err(Error::provider(kind, Some(status), "scripted failure"))
            }
            None => Ok(self.fallback.clone()),
        }
    }
}

fn client_with(driver: ScriptedDriver) -> (QaClient, Arc<AtomicUsize>) {
    let calls = driver.calls.clone();
    let client = QaClient::builder()
        .driver(Arc::new(driver))
        .build()
        .expect("client should build");
    (client, calls)
}

#[tokio::test]
async fn test_grace_period_scenario() {
    let (client, calls) =
        client_with(ScriptedDriver::answering(r#"{"answers":["The grace period is thirty days."]}"#));

    let results = client
        .ask("Grace period is thirty days.", &["What is the grace period?"])
        .await
        .unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].question, "What is the grace period?");
    assert_eq!(results[0].answer, "The grace period is thirty days.");
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    let again = client
        .ask("Grace period is thirty days.", &["What is the grace period?"])
        .await
        .unwrap();
    assert_eq!(again, results);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_repeat_request_is_served_from_cache() {
    let (client, calls) = client_with(ScriptedDriver::answering(r#"{"answers":["A1","A2"]}"#));
    let questions = ["Q1?", "Q2?"];

    let first = client.answer("Some document.", &questions).await.unwrap();
    let second = client.answer("Some document.", &questions).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(client.cache_stats().hits, 1);
}

#[tokio::test]
async fn test_whitespace_variants_share_a_cache_entry() {
    let (client, calls) = client_with(ScriptedDriver::answering(r#"{"answers":["A1"]}"#));

    client.answer("Some document.", &["Q1?"]).await.unwrap();
    client
        .answer("  Some document.\n", &["", "  Q1? ", "   "])
        .await
        .unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_question_order_is_part_of_the_key() {
    let (client, calls) = client_with(ScriptedDriver::answering(r#"{"answers":["A","B"]}"#));

    client.answer("Doc.", &["Q1?", "Q2?"]).await.unwrap();
    client.answer("Doc.", &["Q2?", "Q1?"]).await.unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn test_expired_entry_triggers_a_new_call() {
    let (client, calls) = client_with(ScriptedDriver::answering(r#"{"answers":["A1"]}"#));

    client.answer("Doc.", &["Q1?"]).await.unwrap();
    tokio::time::advance(DEFAULT_TTL - Duration::from_secs(1)).await;
    client.answer("Doc.", &["Q1?"]).await.unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    tokio::time::advance(Duration::from_secs(2)).await;
    client.answer("Doc.", &["Q1?"]).await.unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_short_answer_list_is_padded() {
    let (client, _) = client_with(ScriptedDriver::answering(r#"{"answers":["A1"]}"#));

    let answers = client.answer("Doc.", &["Q1?", "Q2?", "Q3?"]).await.unwrap();
    assert_eq!(answers, vec!["A1", NO_ANSWER, NO_ANSWER]);
}

#[tokio::test]
async fn test_long_answer_list_is_truncated() {
    let (client, _) = client_with(ScriptedDriver::answering(r#"{"answers":["A1","A2","A3"]}"#));

    let answers = client.answer("Doc.", &["Q1?"]).await.unwrap();
    assert_eq!(answers, vec!["A1"]);
}

#[tokio::test]
async fn test_malformed_reply_is_not_cached() {
    let driver = ScriptedDriver::answering(r#"{"answers":["A1"]}"#)
        .then(Reply::Text("Sure! The grace period is thirty days.".to_string()));
    let (client, calls) = client_with(driver);

    let err = client.answer("Doc.", &["Q1?"]).await.unwrap_err();
    assert!(matches!(err, Error::MalformedResponse { .. }), "got {:?}", err);
    assert!(client.cache().is_empty().await);

    let answers = client.answer("Doc.", &["Q1?"]).await.unwrap();
    assert_eq!(answers, vec!["A1"]);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_reply_without_answers_field_is_malformed() {
    let (client, _) = client_with(ScriptedDriver::answering(r#"{"result":["A1"]}"#));

    let err = client.answer("Doc.", &["Q1?"]).await.unwrap_err();
    assert!(matches!(err, Error::MalformedResponse { .. }));
}

#[tokio::test]
async fn test_blank_input_never_reaches_the_model() {
    let (client, calls) = client_with(ScriptedDriver::answering(r#"{"answers":["A1"]}"#));

    let err = client.answer("   ", &["Q1?"]).await.unwrap_err();
    assert!(matches!(err, Error::InvalidInput { .. }));
    let err = client.answer("Doc.", &["", "  "]).await.unwrap_err();
    assert!(matches!(err, Error::InvalidInput { .. }));
    let none: [&str; 0] = [];
    let err = client.answer("Doc.", &none).await.unwrap_err();
    assert!(matches!(err, Error::InvalidInput { .. }));

    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_provider_error_keeps_its_kind_and_is_not_cached() {
    let driver = ScriptedDriver::answering(r#"{"answers":["A1"]}"#)
        .then(Reply::Fail(ProviderErrorKind::QuotaExhausted, 429))
        .then(Reply::Fail(ProviderErrorKind::Authentication, 401));
    let (client, calls) = client_with(driver);

    let err = client.answer("Doc.", &["Q1?"]).await.unwrap_err();
    assert_eq!(err.provider_kind(), Some(ProviderErrorKind::QuotaExhausted));
    let err = client.answer("Doc.", &["Q1?"]).await.unwrap_err();
    assert_eq!(err.provider_kind(), Some(ProviderErrorKind::Authentication));

    assert!(client.cache().is_empty().await);
    client.answer("Doc.", &["Q1?"]).await.unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_missing_credential_fails_at_build() {
    let err = QaClient::builder()
        .driver(Arc::new(ScriptedDriver::unconfigured()))
        .build()
        .unwrap_err();
    assert!(matches!(err, Error::NotConfigured { .. }));
}

#[tokio::test]
async fn test_builder_requires_a_driver() {
    let err = QaClient::builder().build().unwrap_err();
    assert!(matches!(err, Error::Configuration { .. }));
}

#[tokio::test]
async fn test_concurrent_identical_misses_each_call_out() {
    let (client, calls) =
        client_with(ScriptedDriver::answering(r#"{"answers":["A1"]}"#).gated(3));

    let results = futures::future::join_all(
        (0..3).map(|_| client.answer("Doc.", &["Q1?"])),
    )
    .await;

    for result in &results {
        assert_eq!(result.as_ref().unwrap(), &vec!["A1".to_string()]);
    }
    assert_eq!(calls.load(Ordering::SeqCst), 3);
    assert_eq!(client.cache().len().await, 1);
    assert_eq!(client.cache_stats().stores, 3);
}

#[tokio::test]
async fn test_clients_can_share_one_cache() {
    let cache = AnswerCache::from_config(&CacheConfig::new().with_max_entries(8));
    let first = ScriptedDriver::answering(r#"{"answers":["A1"]}"#);
    let second = ScriptedDriver::answering(r#"{"answers":["other"]}"#);
    let second_calls = second.calls.clone();

    let a = QaClient::builder()
        .driver(Arc::new(first))
        .cache(cache.clone())
        .build()
        .unwrap();
    let b = QaClient::builder()
        .driver(Arc::new(second))
        .cache(cache)
        .build()
        .unwrap();

    a.answer("Doc.", &["Q1?"]).await.unwrap();
    let answers = b.answer("Doc.", &["Q1?"]).await.unwrap();

    assert_eq!(answers, vec!["A1"]);
    assert_eq!(second_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_request_carries_prompt_and_generation_settings() {
    let driver = Arc::new(ScriptedDriver::answering(r#"{"answers":["A1","A2"]}"#));
    let client = QaClient::builder()
        .driver(driver.clone())
        .model("gemini-test")
        .temperature(0.1)
        .max_output_tokens(512)
        .build()
        .unwrap();

    client
        .answer("Grace period is thirty days.", &["What is the grace period?", "Who pays?"])
        .await
        .unwrap();

    let request = driver.last_request.lock().unwrap().clone().unwrap();
    assert_eq!(request.model, "gemini-test");
    assert_eq!(request.config.response_mime_type, "application/json");
    assert_eq!(request.config.max_output_tokens, 512);
    assert!((request.config.temperature - 0.1).abs() < f32::EPSILON);
    assert!(request.prompt.contains("Grace period is thirty days."));
    assert!(request.prompt.contains("1. What is the grace period?"));
    assert!(request.prompt.contains("2. Who pays?"));
    assert!(request.config.response_schema["properties"]["answers"].is_object());
}

#[tokio::test]
async fn test_ask_pairs_answers_with_questions() {
    let (client, _) = client_with(ScriptedDriver::answering(r#"{"answers":["A1"]}"#));

    let results = client.ask("Doc.", &[" Q1? ", "Q2?"]).await.unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].question, "Q1?");
    assert_eq!(results[0].answer, "A1");
    assert_eq!(results[1].display_id(), "1-Q2?");
    assert_eq!(results[1].answer, NO_ANSWER);
}
