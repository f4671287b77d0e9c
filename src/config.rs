//! Runtime configuration.
//!
//! Values come from an optional YAML file and are then overridden by
//! environment variables, in the spirit of the `GROUNDED_QA_*` knobs below.
//! The API key is resolved from the file, `GEMINI_API_KEY`, `GOOGLE_API_KEY`
//! and finally the OS keyring (service `grounded-qa`, user `gemini`).

use crate::cache::{CacheConfig, DEFAULT_MAX_ENTRIES, DEFAULT_TTL};
use crate::drivers::gemini::GEMINI_API_BASE;
use crate::transport::http::DEFAULT_TIMEOUT_SECS;
use crate::{Error, ErrorContext, Result};
use keyring::Entry;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use std::time::Duration;
use url::Url;

pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_TEMPERATURE: f32 = 0.2;
pub const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 2048;

const KEYRING_SERVICE: &str = "grounded-qa";
const KEYRING_USER: &str = "gemini";

#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QaConfig {
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub temperature: f32,
    pub max_output_tokens: u32,
    pub timeout_secs: u64,
    pub cache_enabled: bool,
    pub cache_ttl_secs: u64,
    pub cache_max_entries: usize,
}

impl Default for QaConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: GEMINI_API_BASE.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_output_tokens: DEFAULT_MAX_OUTPUT_TOKENS,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            cache_enabled: true,
            cache_ttl_secs: DEFAULT_TTL.as_secs(),
            cache_max_entries: DEFAULT_MAX_ENTRIES,
        }
    }
}

impl std::fmt::Debug for QaConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QaConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("temperature", &self.temperature)
            .field("max_output_tokens", &self.max_output_tokens)
            .field("timeout_secs", &self.timeout_secs)
            .field("cache_enabled", &self.cache_enabled)
            .field("cache_ttl_secs", &self.cache_ttl_secs)
            .field("cache_max_entries", &self.cache_max_entries)
            .finish()
    }
}

impl QaConfig {
    /// Defaults overridden by the environment, with keyring fallback for the key.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env(|name| env::var(name).ok())?;
        config.resolve_keyring();
        config.validate()?;
        Ok(config)
    }

    /// A YAML file overridden by the environment.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let mut config = Self::from_yaml_str(&text).map_err(|e| match e {
            Error::Configuration { message, context } => Error::Configuration {
                message,
                context: context.with_details(path.display().to_string()),
            },
            other => other,
        })?;
        config.apply_env(|name| env::var(name).ok())?;
        config.resolve_keyring();
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(text).map_err(|e| {
            Error::configuration_with_context(
                format!("cannot parse configuration: {}", e),
                ErrorContext::new().with_source("config_loader"),
            )
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `GROUNDED_QA_*` overrides and the API key variables.
    ///
    /// `lookup` abstracts the environment so tests do not mutate process state.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(key) = non_empty("GEMINI_API_KEY").or_else(|| non_empty("GOOGLE_API_KEY")) {
            self.api_key = Some(key);
        }
        if let Some(model) = non_empty("GROUNDED_QA_MODEL") {
            self.model = model;
        }
        if let Some(base_url) = non_empty("GROUNDED_QA_BASE_URL") {
            self.base_url = base_url;
        }
        if let Some(v) = non_empty("GROUNDED_QA_TEMPERATURE") {
            self.temperature = parse_env("GROUNDED_QA_TEMPERATURE", &v)?;
        }
        if let Some(v) = non_empty("GROUNDED_QA_MAX_OUTPUT_TOKENS") {
            self.max_output_tokens = parse_env("GROUNDED_QA_MAX_OUTPUT_TOKENS", &v)?;
        }
        if let Some(v) = non_empty("GROUNDED_QA_HTTP_TIMEOUT_SECS") {
            self.timeout_secs = parse_env("GROUNDED_QA_HTTP_TIMEOUT_SECS", &v)?;
        }
        if let Some(v) = non_empty("GROUNDED_QA_CACHE_ENABLED") {
            self.cache_enabled = parse_env("GROUNDED_QA_CACHE_ENABLED", &v)?;
        }
        if let Some(v) = non_empty("GROUNDED_QA_CACHE_TTL_SECS") {
            self.cache_ttl_secs = parse_env("GROUNDED_QA_CACHE_TTL_SECS", &v)?;
        }
        if let Some(v) = non_empty("GROUNDED_QA_CACHE_MAX_ENTRIES") {
            self.cache_max_entries = parse_env("GROUNDED_QA_CACHE_MAX_ENTRIES", &v)?;
        }
        Ok(())
    }

    fn resolve_keyring(&mut self) {
        if self.has_api_key() {
            return;
        }
        if let Ok(entry) = Entry::new(KEYRING_SERVICE, KEYRING_USER) {
            if let Ok(key) = entry.get_password() {
                self.api_key = Some(key);
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(invalid_field(
                "temperature",
                format!("must be between 0 and 2, got {}", self.temperature),
            ));
        }
        if self.max_output_tokens == 0 {
            return Err(invalid_field("max_output_tokens", "must be positive"));
        }
        if self.timeout_secs == 0 {
            return Err(invalid_field("timeout_secs", "must be positive"));
        }
        if self.model.trim().is_empty() {
            return Err(invalid_field("model", "must not be empty"));
        }
        Url::parse(&self.base_url)
            .map_err(|e| invalid_field("base_url", format!("not a valid URL: {}", e)))?;
        Ok(())
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.trim().is_empty())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn cache_config(&self) -> CacheConfig {
        CacheConfig::new()
            .with_ttl(Duration::from_secs(self.cache_ttl_secs))
            .with_max_entries(self.cache_max_entries)
            .with_enabled(self.cache_enabled)
    }
}

fn parse_env<T: std::str::FromStr>(name: &str, value: &str) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    value.trim().parse::<T>().map_err(|e| {
        Error::configuration_with_context(
            format!("cannot parse {}: {}", name, e),
            ErrorContext::new()
                .with_field_path(name)
                .with_details(value.to_string())
                .with_source("config_loader"),
        )
    })
}

fn invalid_field(field: &str, msg: impl Into<String>) -> Error {
    Error::configuration_with_context(
        msg,
        ErrorContext::new()
            .with_field_path(format!("config.{}", field))
            .with_source("config_validator"),
    )
}
