use crate::cache::AnswerCache;
use crate::client::core::{ensure_configured, GenerationSettings, QaClient};
use crate::config::QaConfig;
use crate::drivers::{GeminiDriver, ModelDriver};
use crate::{Error, ErrorContext, Result};
use std::sync::Arc;

/// Builder for creating clients with custom configuration.
///
/// Keep this surface area small and predictable: a driver, a cache and the
/// generation knobs.
pub struct QaClientBuilder {
    driver: Option<Arc<dyn ModelDriver>>,
    cache: Option<AnswerCache>,
    settings: GenerationSettings,
}

impl QaClientBuilder {
    pub fn new() -> Self {
        Self {
            driver: None,
            cache: None,
            settings: GenerationSettings::default(),
        }
    }

    /// Gemini driver, cache and generation knobs taken from `config`.
    pub fn from_config(config: &QaConfig) -> Result<Self> {
        config.validate()?;
        let driver = GeminiDriver::from_config(config)?;
        Ok(Self::new()
            .driver(Arc::new(driver))
            .cache(AnswerCache::from_config(&config.cache_config()))
            .model(config.model.clone())
            .temperature(config.temperature)
            .max_output_tokens(config.max_output_tokens))
    }

    /// Inject the model driver (a test double in tests).
    pub fn driver(mut self, driver: Arc<dyn ModelDriver>) -> Self {
        self.driver = Some(driver);
        self
    }

    /// Share an existing cache. Default is a fresh in-memory cache.
    pub fn cache(mut self, cache: AnswerCache) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.settings.model = model.into();
        self
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.settings.temperature = temperature;
        self
    }

    pub fn max_output_tokens(mut self, n: u32) -> Self {
        self.settings.max_output_tokens = n.max(1);
        self
    }

    /// Fails with [`Error::NotConfigured`] when the driver has no credential.
    pub fn build(self) -> Result<QaClient> {
        let driver = self.driver.ok_or_else(|| {
            Error::configuration_with_context(
                "a model driver is required",
                ErrorContext::new()
                    .with_field_path("driver")
                    .with_source("client_builder"),
            )
        })?;
        ensure_configured(driver.as_ref())?;

        Ok(QaClient {
            driver,
            cache: self.cache.unwrap_or_default(),
            settings: self.settings,
        })
    }
}

impl Default for QaClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
