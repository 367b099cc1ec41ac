//! Configuration for valuation lookups

use crate::acquisition::{DEFAULT_MAX_TOKENS, LlmDataSource};
use crate::error::ConfigError;
use crate::language::Language;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use valuation_llm::LLMProvider;
use valuation_llm::providers::{GeminiConfig, GeminiProvider, OpenAIConfig, OpenAIProvider};
use valuation_utils::{EnvLookup, flag, non_empty, parse_var, process_env};

type Result<T> = std::result::Result<T, ConfigError>;

/// Generative-AI service that supplies financial data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Google Gemini with Google Search grounding (default)
    #[default]
    Gemini,
    /// OpenAI or any Chat Completions compatible endpoint
    OpenAI,
}

impl ProviderKind {
    /// Model used when none is configured
    pub fn default_model(&self) -> &'static str {
        match self {
            Self::Gemini => "gemini-3-pro-preview",
            Self::OpenAI => "gpt-4o-search-preview",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Gemini => "gemini",
            Self::OpenAI => "openai",
        })
    }
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "gemini" | "google" => Ok(Self::Gemini),
            "openai" => Ok(Self::OpenAI),
            other => Err(format!("unknown provider: {other}")),
        }
    }
}

/// Configuration for valuation lookups
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValuationConfig {
    /// Data provider
    pub provider: ProviderKind,

    /// Model name; the provider's default when unset
    pub model: Option<String>,

    /// API key for the provider
    #[serde(skip_serializing)]
    pub api_key: Option<String>,

    /// Override for the provider's API base URL
    pub api_base: Option<String>,

    /// Request timeout
    pub request_timeout: Duration,

    /// Output token budget per lookup
    pub max_tokens: usize,

    /// Sampling temperature; provider default when unset
    pub temperature: Option<f32>,

    /// Ask the provider to ground its answer with web search
    pub web_search: bool,

    /// Language of prompts and reports
    pub language: Language,
}

impl Default for ValuationConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::Gemini,
            model: None,
            api_key: None,
            api_base: None,
            request_timeout: Duration::from_secs(120),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: None,
            web_search: true,
            language: Language::English,
        }
    }
}

impl ValuationConfig {
    /// Create a new configuration builder
    pub fn builder() -> ValuationConfigBuilder {
        ValuationConfigBuilder::default()
    }

    /// Load from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(&process_env)
    }

    /// Load from an environment lookup
    ///
    /// Unset variables keep their defaults. The result is not validated, so
    /// callers can still apply overrides before [`validate`](Self::validate).
    pub fn from_lookup(env: EnvLookup<'_>) -> Result<Self> {
        let defaults = Self::default();
        let provider = parse_var::<ProviderKind>(env, "VALUATION_PROVIDER")
            .map_err(ConfigError)?
            .unwrap_or(defaults.provider);

        let (api_key, api_base) = match provider {
            ProviderKind::Gemini => (
                non_empty(env, "GEMINI_API_KEY").or_else(|| non_empty(env, "API_KEY")),
                None,
            ),
            ProviderKind::OpenAI => (
                non_empty(env, "OPENAI_API_KEY"),
                non_empty(env, "OPENAI_API_BASE"),
            ),
        };

        Ok(Self {
            provider,
            model: non_empty(env, "VALUATION_MODEL"),
            api_key,
            api_base,
            request_timeout: parse_var::<u64>(env, "VALUATION_TIMEOUT_SECS")
                .map_err(ConfigError)?
                .map_or(defaults.request_timeout, Duration::from_secs),
            language: parse_var::<Language>(env, "VALUATION_LANGUAGE")
                .map_err(ConfigError)?
                .unwrap_or(defaults.language),
            web_search: flag(env, "VALUATION_WEB_SEARCH")
                .map_err(ConfigError)?
                .unwrap_or(defaults.web_search),
            ..defaults
        })
    }

    /// Model name, falling back to the provider default
    pub fn model(&self) -> &str {
        self.model
            .as_deref()
            .unwrap_or_else(|| self.provider.default_model())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.api_key.as_deref().is_none_or(str::is_empty) {
            let var = match self.provider {
                ProviderKind::Gemini => "GEMINI_API_KEY",
                ProviderKind::OpenAI => "OPENAI_API_KEY",
            };
            return Err(ConfigError(format!(
                "API key required for the {} provider (set {var})",
                self.provider
            )));
        }

        if self.request_timeout.is_zero() {
            return Err(ConfigError(
                "request_timeout must be greater than 0".to_string(),
            ));
        }

        if self.max_tokens == 0 {
            return Err(ConfigError("max_tokens must be greater than 0".to_string()));
        }

        Ok(())
    }

    /// Create the configured provider
    pub fn build_provider(&self) -> Result<Arc<dyn LLMProvider>> {
        self.validate()?;
        let api_key = self.api_key.clone().unwrap_or_default();
        let timeout_secs = self.request_timeout.as_secs().max(1);

        let provider: Arc<dyn LLMProvider> = match self.provider {
            ProviderKind::Gemini => {
                let mut config = GeminiConfig::new(api_key).with_timeout(timeout_secs);
                if let Some(base) = &self.api_base {
                    config = config.with_api_base(base.clone());
                }
                Arc::new(GeminiProvider::with_config(config)?)
            }
            ProviderKind::OpenAI => {
                let mut config = OpenAIConfig::new(api_key).with_timeout(timeout_secs);
                if let Some(base) = &self.api_base {
                    config = config.with_api_base(base.clone());
                }
                Arc::new(OpenAIProvider::with_config(config)?)
            }
        };
        Ok(provider)
    }

    /// Create a data source over the configured provider
    pub fn data_source(&self) -> Result<LlmDataSource<Arc<dyn LLMProvider>>> {
        Ok(LlmDataSource::new(self.build_provider()?, self.model())?
            .language(self.language)
            .max_tokens(self.max_tokens)
            .temperature(self.temperature)
            .web_search(self.web_search))
    }
}

/// Builder for ValuationConfig
#[derive(Debug, Default)]
pub struct ValuationConfigBuilder {
    provider: Option<ProviderKind>,
    model: Option<String>,
    api_key: Option<String>,
    api_base: Option<String>,
    request_timeout: Option<Duration>,
    max_tokens: Option<usize>,
    temperature: Option<f32>,
    web_search: Option<bool>,
    language: Option<Language>,
}

impl ValuationConfigBuilder {
    pub fn provider(mut self, provider: ProviderKind) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = Some(base.into());
        self
    }

    pub fn request_timeout(mut self, duration: Duration) -> Self {
        self.request_timeout = Some(duration);
        self
    }

    pub fn max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn web_search(mut self, enabled: bool) -> Self {
        self.web_search = Some(enabled);
        self
    }

    pub fn language(mut self, language: Language) -> Self {
        self.language = Some(language);
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<ValuationConfig> {
        let defaults = ValuationConfig::default();

        let config = ValuationConfig {
            provider: self.provider.unwrap_or(defaults.provider),
            model: self.model,
            api_key: self.api_key,
            api_base: self.api_base,
            request_timeout: self.request_timeout.unwrap_or(defaults.request_timeout),
            max_tokens: self.max_tokens.unwrap_or(defaults.max_tokens),
            temperature: self.temperature,
            web_search: self.web_search.unwrap_or(defaults.web_search),
            language: self.language.unwrap_or(defaults.language),
        };

        config.validate()?;
        Ok(config)
    }
}
