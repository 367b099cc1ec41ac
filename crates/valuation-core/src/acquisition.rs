//! Data acquisition adapter
//!
//! [`FinancialDataSource`] is the seam between the valuation core and
//! whatever supplies raw financial data. [`LlmDataSource`] implements it on
//! top of any [`LLMProvider`]: one grounded completion per fetch, parsed and
//! validated into a [`FinancialRecord`]. Every failure is mapped into the
//! [`AcquisitionError`] taxonomy; retries are left to the caller.

use crate::contract::{FinancialRecord, financial_record_schema, validate};
use crate::error::{AcquisitionError, ConfigError};
use crate::language::Language;
use crate::prompts::AcquisitionPrompt;
use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, info, warn};
use valuation_llm::{
    CompletionRequest, GroundingSource, LLMProvider, Message, ResponseFormat, dedup_sources,
};

/// Default output token budget for one record
pub const DEFAULT_MAX_TOKENS: usize = 4096;

/// A validated record and the citations that informed it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Acquired {
    pub record: FinancialRecord,
    pub sources: Vec<GroundingSource>,
}

/// Anything that can supply a financial record for a ticker
#[async_trait]
pub trait FinancialDataSource: Send + Sync {
    /// Fetch and validate the record for an already-normalized ticker
    async fn fetch(&self, ticker: &str) -> Result<Acquired, AcquisitionError>;
}

/// Data source backed by a generative-AI provider with web search
pub struct LlmDataSource<P> {
    provider: P,
    model: String,
    prompts: AcquisitionPrompt,
    language: Language,
    max_tokens: usize,
    temperature: Option<f32>,
    web_search: bool,
}

impl<P: LLMProvider> LlmDataSource<P> {
    pub fn new(provider: P, model: impl Into<String>) -> Result<Self, ConfigError> {
        let prompts = AcquisitionPrompt::new()
            .map_err(|e| ConfigError(format!("invalid prompt template: {e}")))?;
        Ok(Self {
            provider,
            model: model.into(),
            prompts,
            language: Language::default(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: None,
            web_search: true,
        })
    }

    pub fn language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    pub fn max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn web_search(mut self, enabled: bool) -> Self {
        self.web_search = enabled;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn build_request(&self, ticker: &str) -> Result<CompletionRequest, AcquisitionError> {
        let prompt = self.prompts.user(ticker, self.language).map_err(|e| {
            AcquisitionError::provider_unavailable(format!("failed to render prompt: {e}"))
        })?;

        Ok(CompletionRequest::builder(&self.model)
            .system(self.prompts.system(self.language))
            .add_message(Message::user(prompt))
            .max_tokens(self.max_tokens)
            .maybe_temperature(self.temperature)
            .response_format(ResponseFormat::json_schema(
                "financial_record",
                financial_record_schema(),
            ))
            .web_search(self.web_search)
            .build())
    }
}

#[async_trait]
impl<P: LLMProvider> FinancialDataSource for LlmDataSource<P> {
    async fn fetch(&self, ticker: &str) -> Result<Acquired, AcquisitionError> {
        let request = self.build_request(ticker)?;
        debug!(
            ticker,
            provider = self.provider.name(),
            model = %self.model,
            web_search = self.web_search,
            "Requesting financial data"
        );

        let response = self.provider.complete(request).await.map_err(|err| {
            warn!(ticker, error = %err, "Provider request failed");
            AcquisitionError::from(err)
        })?;

        let record = parse_record(response.text()).inspect_err(|err| {
            warn!(ticker, kind = %err.kind, error = %err.message, "Rejected provider answer");
        })?;
        let sources = dedup_sources(response.sources);

        info!(ticker, sources = sources.len(), "Financial data acquired");
        Ok(Acquired { record, sources })
    }
}

/// Parse model text into a validated record
///
/// A Markdown code fence around the JSON is tolerated.
pub fn parse_record(text: &str) -> Result<FinancialRecord, AcquisitionError> {
    let body = strip_code_fence(text);
    if body.is_empty() {
        return Err(AcquisitionError::malformed_response("empty response"));
    }
    let value: serde_json::Value =
        serde_json::from_str(body).map_err(AcquisitionError::malformed_response)?;
    validate(&value).map_err(AcquisitionError::from)
}

fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string ("json") on the opening line
    let body = rest.split_once('\n').map_or("", |(_, body)| body);
    body.strip_suffix("```").unwrap_or(body).trim()
}
