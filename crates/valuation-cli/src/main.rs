//! Command-line front end for stock valuation
//!
//! # Usage
//!
//! ```bash
//! export GEMINI_API_KEY="your-key"
//!
//! # One-shot: look up tickers concurrently and print their reports
//! stock-valuation BBAS3.SA ITSA4.SA MC.PA
//!
//! # Machine-readable output
//! stock-valuation --json SAP.DE
//!
//! # Interactive mode
//! stock-valuation --language pt
//! ```

mod repl;

use anyhow::bail;
use clap::Parser;
use serde_json::json;
use std::sync::Arc;
use tracing::{error, info};
use valuation_core::{
    Analyzer, Language, ProviderKind, Report, ValuationConfig, render_text,
};
use valuation_utils::{LogFormat, init_tracing_with, process_env};

#[derive(Parser, Debug)]
#[command(name = "stock-valuation", version)]
#[command(about = "Bazin and Graham fair-value estimates from AI-sourced financial data", long_about = None)]
struct Args {
    /// Tickers to analyze; starts the interactive mode when omitted
    tickers: Vec<String>,

    /// Data provider (gemini, openai)
    #[arg(long)]
    provider: Option<ProviderKind>,

    /// Model name
    #[arg(long)]
    model: Option<String>,

    /// Language of prompts and reports (en, pt)
    #[arg(long)]
    language: Option<Language>,

    /// Do not ask the provider to ground answers with web search
    #[arg(long)]
    no_web_search: bool,

    /// Print JSON instead of the text report
    #[arg(long)]
    json: bool,

    /// Log output format (pretty, json)
    #[arg(long, default_value = "pretty")]
    log_format: LogFormat,
}

impl Args {
    fn config(&self) -> anyhow::Result<ValuationConfig> {
        let provider = self.provider.map(|p| p.to_string());
        let env = |name: &str| match name {
            "VALUATION_PROVIDER" if provider.is_some() => provider.clone(),
            _ => process_env(name),
        };

        let mut config = ValuationConfig::from_lookup(&env)?;
        if let Some(model) = &self.model {
            config.model = Some(model.clone());
        }
        if let Some(language) = self.language {
            config.language = language;
        }
        if self.no_web_search {
            config.web_search = false;
        }
        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing_with(args.log_format);

    let config = args.config()?;
    info!(
        provider = %config.provider,
        model = config.model(),
        language = config.language.code(),
        "Starting stock-valuation"
    );
    let analyzer = Arc::new(Analyzer::new(config.data_source()?));

    if args.tickers.is_empty() {
        return repl::run(analyzer, config.language).await;
    }

    let results = analyzer.analyze_all(&args.tickers).await;
    let mut failed = 0;
    let mut documents = Vec::with_capacity(results.len());

    for (ticker, result) in args.tickers.iter().zip(results) {
        match result {
            Ok(analysis) if args.json => {
                documents.push(json!({ "ticker": analysis.record.ticker, "analysis": analysis }));
            }
            Ok(analysis) => {
                println!("{}", render_text(&Report::from_analysis(&analysis, config.language)));
            }
            Err(err) => {
                failed += 1;
                error!(%ticker, kind = %err.kind, "Lookup failed");
                if args.json {
                    documents.push(json!({ "ticker": ticker, "error": err }));
                } else {
                    eprintln!("{ticker}: {}", err.message);
                }
            }
        }
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&documents)?);
    }

    if failed > 0 {
        bail!("{failed} of {} lookups failed", args.tickers.len());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_args() {
        let args = Args::try_parse_from([
            "stock-valuation",
            "--provider",
            "openai",
            "--language",
            "pt",
            "--json",
            "BBAS3.SA",
            "MC.PA",
        ])
        .unwrap();

        assert_eq!(args.provider, Some(ProviderKind::OpenAI));
        assert_eq!(args.language, Some(Language::Portuguese));
        assert!(args.json);
        assert_eq!(args.tickers, ["BBAS3.SA", "MC.PA"]);
        assert_eq!(args.log_format, LogFormat::Pretty);
    }

    #[test]
    fn test_interactive_when_no_tickers() {
        let args = Args::try_parse_from(["stock-valuation", "--log-format", "json"]).unwrap();
        assert!(args.tickers.is_empty());
        assert_eq!(args.log_format, LogFormat::Json);
    }

    #[test]
    fn test_rejects_unknown_provider() {
        assert!(Args::try_parse_from(["stock-valuation", "--provider", "anthropic"]).is_err());
    }
}
