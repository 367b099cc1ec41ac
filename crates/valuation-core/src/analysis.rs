//! Ticker lookup: normalize, fetch, evaluate

use crate::acquisition::{Acquired, FinancialDataSource};
use crate::contract::FinancialRecord;
use crate::engine::{Diagnosis, ValuationResult, evaluate};
use crate::error::AcquisitionError;
use crate::ticker::normalize_ticker;
use chrono::{DateTime, Utc};
use futures::future::join_all;
use serde::Serialize;
use tracing::instrument;
use valuation_llm::GroundingSource;

/// Everything known about one ticker after a successful lookup
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Analysis {
    pub record: FinancialRecord,
    pub valuation: ValuationResult,
    pub diagnosis: Diagnosis,
    pub sources: Vec<GroundingSource>,
    pub fetched_at: DateTime<Utc>,
}

impl Analysis {
    /// Derive the valuation for an acquired record
    pub fn from_acquired(acquired: Acquired, fetched_at: DateTime<Utc>) -> Self {
        let valuation = evaluate(&acquired.record);
        Self {
            diagnosis: valuation.diagnosis(),
            record: acquired.record,
            valuation,
            sources: acquired.sources,
            fetched_at,
        }
    }
}

/// Runs lookups against a data source
///
/// Holds no mutable state, so any number of lookups may run at once.
pub struct Analyzer<S> {
    source: S,
}

impl<S: FinancialDataSource> Analyzer<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Look up one ticker as typed by a user
    #[instrument(skip(self), fields(ticker = %input))]
    pub async fn analyze(&self, input: &str) -> Result<Analysis, AcquisitionError> {
        let ticker = normalize_ticker(input).map_err(|e| AcquisitionError::invalid_data(&e))?;
        let acquired = self.source.fetch(&ticker).await?;
        Ok(Analysis::from_acquired(acquired, Utc::now()))
    }

    /// Look up several tickers concurrently, results in input order
    pub async fn analyze_all<T: AsRef<str>>(
        &self,
        inputs: &[T],
    ) -> Vec<Result<Analysis, AcquisitionError>> {
        join_all(inputs.iter().map(|input| self.analyze(input.as_ref()))).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::validate;
    use crate::error::AcquisitionErrorKind;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    /// Fixture source: answers from a fixed table and records what it was asked
    struct FixtureSource {
        asked: Mutex<Vec<String>>,
    }

    impl FixtureSource {
        fn new() -> Self {
            Self {
                asked: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl FinancialDataSource for FixtureSource {
        async fn fetch(&self, ticker: &str) -> Result<Acquired, AcquisitionError> {
            self.asked.lock().unwrap().push(ticker.to_string());
            let (price, eps) = match ticker {
                "BBAS3.SA" => (30.0, 3.0),
                "MGLU3.SA" => (5.0, -1.5),
                _ => return Err(AcquisitionError::provider_unavailable("unknown ticker")),
            };
            let avg_dividend = if eps > 0.0 { 2.4 } else { 0.0 };
            let record = validate(&json!({
                "ticker": ticker,
                "name": "Fixture",
                "currency": "BRL",
                "currentPrice": price,
                "eps": eps,
                "bvps": 20.0,
                "avgDividend5Years": avg_dividend,
            }))?;
            Ok(Acquired {
                record,
                sources: vec![GroundingSource::new("B3", "https://www.b3.com.br")],
            })
        }
    }

    #[tokio::test]
    async fn test_analyze_normalizes_and_evaluates() {
        let analyzer = Analyzer::new(FixtureSource::new());
        let analysis = analyzer.analyze("  bbas3.sa ").await.unwrap();

        assert_eq!(analyzer.source().asked.lock().unwrap().as_slice(), ["BBAS3.SA"]);
        assert_eq!(analysis.diagnosis, Diagnosis::StrongBuy);
        assert_eq!(analysis.sources.len(), 1);
        approx::assert_relative_eq!(analysis.valuation.bazin_fair_price, 40.0, epsilon = 1e-9);
    }

    #[tokio::test]
    async fn test_invalid_ticker_never_reaches_source() {
        let analyzer = Analyzer::new(FixtureSource::new());
        let err = analyzer.analyze("   ").await.unwrap_err();

        assert_eq!(err.kind, AcquisitionErrorKind::InvalidData);
        assert_eq!(err.field.as_deref(), Some("ticker"));
        assert!(analyzer.source().asked.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_analyze_all_keeps_order_and_isolates_failures() {
        let analyzer = Analyzer::new(FixtureSource::new());
        let results = analyzer
            .analyze_all(&["MGLU3.SA", "NOPE", "BBAS3.SA"])
            .await;

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].as_ref().unwrap().diagnosis, Diagnosis::Caution);
        assert_eq!(
            results[1].as_ref().unwrap_err().kind,
            AcquisitionErrorKind::ProviderUnavailable
        );
        assert_eq!(results[2].as_ref().unwrap().record.ticker, "BBAS3.SA");
    }

    #[test]
    fn test_serialized_analysis_keeps_sentinel() {
        let record = validate(&json!({
            "ticker": "MGLU3.SA", "name": "Magalu", "currency": "BRL",
            "currentPrice": 5.0, "eps": -1.5, "bvps": 10.0, "avgDividend5Years": 0.0
        }))
        .unwrap();
        let analysis = Analysis::from_acquired(
            Acquired {
                record,
                sources: vec![],
            },
            Utc::now(),
        );
        let json = serde_json::to_value(&analysis).unwrap();
        assert_eq!(json["valuation"]["grahamFairPrice"], 0.0);
        assert_eq!(json["valuation"]["upsideGraham"], -100.0);
        assert_eq!(json["diagnosis"], "Caution");
        assert!(json["fetchedAt"].is_string());
    }
}
