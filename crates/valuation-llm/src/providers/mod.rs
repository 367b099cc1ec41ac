//! Concrete LLM provider implementations
//!
//! This module contains implementations of the LLMProvider trait for
//! various LLM services.

use crate::error::{LLMError, Result};
use serde::de::DeserializeOwned;

#[cfg(feature = "gemini")]
pub mod gemini;

#[cfg(feature = "openai")]
pub mod openai;

#[cfg(feature = "gemini")]
pub use gemini::{GeminiConfig, GeminiProvider};

#[cfg(feature = "openai")]
pub use openai::{OpenAIConfig, OpenAIProvider};

/// Decode a response body that has already been read in full
///
/// Only a body that is not the expected JSON is an unexpected response.
/// Failures while reading the body stay `HttpError`.
pub(crate) fn decode_body<T: DeserializeOwned>(body: &str) -> Result<T> {
    serde_json::from_str(body)
        .map_err(|e| LLMError::UnexpectedResponse(format!("Failed to parse response: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn test_decode_body() {
        let value: Value = decode_body(r#"{"candidates": []}"#).unwrap();
        assert_eq!(value["candidates"], Value::Array(vec![]));
    }

    #[test]
    fn test_undecodable_body_is_malformed() {
        let err = decode_body::<Value>("<html>502 Bad Gateway</html>").unwrap_err();
        assert!(matches!(err, LLMError::UnexpectedResponse(_)));
        assert!(err.is_malformed_response());
    }
}
