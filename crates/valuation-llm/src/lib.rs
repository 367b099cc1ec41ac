//! Generative-AI provider layer for stock-valuation
//!
//! This crate provides provider-agnostic abstractions for asking a Large
//! Language Model for a structured JSON answer grounded by web search. It
//! includes:
//!
//! - Message types for LLM communication
//! - Completion request/response types with an optional output schema
//! - Grounding sources (citations) returned alongside an answer
//! - Provider trait for LLM implementations
//! - Concrete provider implementations (behind feature flags)

pub mod completion;
pub mod error;
pub mod grounding;
pub mod messages;
pub mod provider;

// Re-export main types
pub use completion::{
    CompletionRequest, CompletionResponse, ResponseFormat, StopReason, TokenUsage,
};
pub use error::{LLMError, Result};
pub use grounding::{GroundingSource, dedup_sources};
pub use messages::{Message, Role};
pub use provider::LLMProvider;

// Provider implementations (feature-gated)
#[cfg(any(feature = "gemini", feature = "openai"))]
pub mod providers;
