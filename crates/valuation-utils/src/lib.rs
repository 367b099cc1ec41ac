//! Shared utilities for stock-valuation
//!
//! This crate provides common functionality used across the workspace,
//! including logging setup and environment-variable helpers.

pub mod env;
pub mod logging;

pub use env::{EnvLookup, flag, non_empty, parse_var, process_env};
pub use logging::{DEFAULT_FILTER, LogFormat, init_tracing, init_tracing_with};
