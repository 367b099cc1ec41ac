//! Stock valuation core
//!
//! Turns a ticker into fair-value estimates using data supplied by a
//! generative-AI provider with web search. It includes:
//!
//! - The data contract that validates raw provider JSON into a [`FinancialRecord`]
//! - The valuation engine: Bazin and Graham fair prices, upside and a [`Diagnosis`]
//! - The acquisition adapter mapping provider answers and failures into
//!   [`AcquisitionError`]
//! - A last-request-wins [`LookupController`] for interactive front ends
//! - A localized [`Report`] view model and its terminal rendering
//!
//! # Architecture
//!
//! ```text
//! ticker ─▶ normalize_ticker ─▶ FinancialDataSource::fetch ─▶ validate ─▶ evaluate ─▶ Report
//!                                      │
//!                                      └─ LlmDataSource<P: LLMProvider>
//! ```
//!
//! The engine and the contract do no I/O and can be exercised with fixture
//! records; the provider sits behind [`FinancialDataSource`].
//!
//! # Example
//!
//! ```rust,no_run
//! use valuation_core::{Analyzer, Report, ValuationConfig, render_text};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ValuationConfig::from_env()?;
//!     let analyzer = Analyzer::new(config.data_source()?);
//!
//!     let analysis = analyzer.analyze("BBAS3.SA").await?;
//!     println!("{}", render_text(&Report::from_analysis(&analysis, config.language)));
//!     Ok(())
//! }
//! ```

pub mod acquisition;
pub mod analysis;
pub mod config;
pub mod contract;
pub mod engine;
pub mod error;
pub mod language;
pub mod lookup;
pub mod prompts;
pub mod report;
pub mod ticker;

pub use acquisition::{Acquired, FinancialDataSource, LlmDataSource, parse_record};
pub use analysis::{Analysis, Analyzer};
pub use config::{ProviderKind, ValuationConfig, ValuationConfigBuilder};
pub use contract::{
    DividendPayment, FinancialRecord, REQUIRED_FIELDS, financial_record_schema, validate,
};
pub use engine::{
    BAZIN_TARGET_YIELD, Diagnosis, GRAHAM_MULTIPLIER, Signal, ValuationResult, bazin_fair_price,
    diagnose, evaluate, graham_fair_price, signal, upside,
};
pub use error::{AcquisitionError, AcquisitionErrorKind, ConfigError, ValidationError};
pub use language::Language;
pub use lookup::{LookupController, LookupState, RequestId};
pub use report::{Report, render_text};
pub use ticker::{POPULAR_TICKERS, normalize_ticker};
