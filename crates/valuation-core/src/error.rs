//! Error types for valuation lookups

use serde::Serialize;
use std::fmt;
use thiserror::Error;
use valuation_llm::LLMError;

/// A raw financial record failed the data contract
///
/// `field` names the first missing or invalid field, in contract order.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("invalid field `{field}`: {reason}")]
pub struct ValidationError {
    pub field: String,
    pub reason: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn missing(field: impl Into<String>) -> Self {
        Self::new(field, "required field is missing")
    }
}

/// Category of an acquisition failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AcquisitionErrorKind {
    /// Network, quota, timeout, authentication or any provider-side refusal
    ProviderUnavailable,
    /// The provider answered with something that is not the expected JSON
    MalformedResponse,
    /// The JSON was well-formed but broke the data contract
    InvalidData,
}

impl fmt::Display for AcquisitionErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::ProviderUnavailable => "provider unavailable",
            Self::MalformedResponse => "malformed response",
            Self::InvalidData => "invalid data",
        };
        f.write_str(s)
    }
}

/// Failure to obtain a validated record for a ticker
///
/// Every variant carries a human-readable message. `detail` holds the
/// provider's own description for [`AcquisitionErrorKind::ProviderUnavailable`];
/// `field` names the offending field for [`AcquisitionErrorKind::InvalidData`].
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{kind}: {message}")]
pub struct AcquisitionError {
    pub kind: AcquisitionErrorKind,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl AcquisitionError {
    pub fn provider_unavailable(detail: impl Into<String>) -> Self {
        let detail = detail.into();
        Self {
            kind: AcquisitionErrorKind::ProviderUnavailable,
            message: format!("the data provider could not be reached: {detail}"),
            detail: Some(detail),
            field: None,
        }
    }

    pub fn malformed_response(reason: impl fmt::Display) -> Self {
        Self {
            kind: AcquisitionErrorKind::MalformedResponse,
            message: format!("failed to process the data returned by the model: {reason}"),
            detail: None,
            field: None,
        }
    }

    pub fn invalid_data(error: &ValidationError) -> Self {
        Self {
            kind: AcquisitionErrorKind::InvalidData,
            message: format!("the returned data is incomplete or inconsistent: {error}"),
            detail: None,
            field: Some(error.field.clone()),
        }
    }
}

impl From<LLMError> for AcquisitionError {
    fn from(err: LLMError) -> Self {
        if err.is_malformed_response() {
            Self::malformed_response(&err)
        } else {
            Self::provider_unavailable(err.to_string())
        }
    }
}

impl From<ValidationError> for AcquisitionError {
    fn from(err: ValidationError) -> Self {
        Self::invalid_data(&err)
    }
}

/// Invalid or incomplete configuration
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Configuration error: {0}")]
pub struct ConfigError(pub String);

impl From<LLMError> for ConfigError {
    fn from(err: LLMError) -> Self {
        Self(err.to_string())
    }
}
