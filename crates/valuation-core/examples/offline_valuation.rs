//! Valuation of a fixture record, no provider needed
//!
//! ```bash
//! cargo run -p valuation-core --example offline_valuation
//! ```

use chrono::Utc;
use serde_json::json;
use valuation_core::acquisition::Acquired;
use valuation_core::{Analysis, Language, Report, render_text, validate};

fn main() -> anyhow::Result<()> {
    let record = validate(&json!({
        "ticker": "bbas3.sa",
        "name": "Banco do Brasil",
        "currency": "BRL",
        "region": "Brasil",
        "currentPrice": 30.0,
        "eps": 3.0,
        "bvps": 20.0,
        "dividendYield": 8.0,
        "avgDividend5Years": 2.4,
        "payoutFrequency": "Trimestral",
        "dividendHistory": [
            {"date": "2026-09-01", "amount": 0.52, "type": "JCP"},
            {"date": "2026-06-01", "amount": 0.47, "type": "Dividendo"}
        ]
    }))?;

    let analysis = Analysis::from_acquired(
        Acquired {
            record,
            sources: vec![],
        },
        Utc::now(),
    );

    println!("{}", render_text(&Report::from_analysis(&analysis, Language::English)));
    println!("{}", serde_json::to_string_pretty(&analysis.valuation)?);
    Ok(())
}
