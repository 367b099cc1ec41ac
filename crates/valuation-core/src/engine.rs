//! Valuation engine
//!
//! Pure functions from a validated [`FinancialRecord`] to fair prices,
//! upside percentages and a diagnosis. Every function here is total over
//! records accepted by [`crate::contract::validate`]: the contract
//! guarantees `current_price > 0` and rejects magnitudes whose estimates
//! would not be finite.

use crate::contract::FinancialRecord;
use crate::language::Language;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use std::fmt;

/// Dividend yield at which Bazin's method considers a stock fairly priced
pub const BAZIN_TARGET_YIELD: f64 = 0.06;

/// Graham's P/E ceiling (15) times his P/B ceiling (1.5)
pub const GRAHAM_MULTIPLIER: f64 = 22.5;

/// Upside reported when Graham's formula does not apply
pub const GRAHAM_NOT_APPLICABLE_UPSIDE: f64 = -100.0;

/// Fair-value estimates for one record
///
/// `graham_fair_price` is `None` when earnings or book value are not both
/// positive. The serialized form keeps the numeric contract consumers
/// expect: `grahamFairPrice` is `0` and `upsideGraham` is exactly `-100`
/// in that case.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValuationResult {
    pub bazin_fair_price: f64,
    pub graham_fair_price: Option<f64>,
    pub upside_bazin: f64,
    pub upside_graham: f64,
}

impl ValuationResult {
    /// Graham fair price with `0` standing in for "not applicable"
    pub fn graham_or_zero(&self) -> f64 {
        self.graham_fair_price.unwrap_or(0.0)
    }

    pub fn diagnosis(&self) -> Diagnosis {
        diagnose(self.upside_bazin, self.upside_graham)
    }
}

impl Serialize for ValuationResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ValuationResult", 4)?;
        state.serialize_field("bazinFairPrice", &self.bazin_fair_price)?;
        state.serialize_field("grahamFairPrice", &self.graham_or_zero())?;
        state.serialize_field("upsideBazin", &self.upside_bazin)?;
        state.serialize_field("upsideGraham", &self.upside_graham)?;
        state.end()
    }
}

/// Fair price at which the average dividend yields [`BAZIN_TARGET_YIELD`]
pub fn bazin_fair_price(avg_dividend_5_years: f64) -> f64 {
    avg_dividend_5_years / BAZIN_TARGET_YIELD
}

/// Graham's intrinsic value, defined only for positive EPS and BVPS
pub fn graham_fair_price(eps: f64, bvps: f64) -> Option<f64> {
    (eps > 0.0 && bvps > 0.0).then(|| (GRAHAM_MULTIPLIER * eps * bvps).sqrt())
}

/// Percentage difference between a fair price and the market price
pub fn upside(fair_price: f64, current_price: f64) -> f64 {
    (fair_price / current_price - 1.0) * 100.0
}

/// Compute every estimate for a validated record
pub fn evaluate(record: &FinancialRecord) -> ValuationResult {
    let bazin = bazin_fair_price(record.avg_dividend_5_years);
    let graham = graham_fair_price(record.eps, record.bvps);

    ValuationResult {
        bazin_fair_price: bazin,
        graham_fair_price: graham,
        upside_bazin: upside(bazin, record.current_price),
        upside_graham: graham.map_or(GRAHAM_NOT_APPLICABLE_UPSIDE, |g| {
            upside(g, record.current_price)
        }),
    }
}

/// Overall reading of both models
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Diagnosis {
    /// Both models see upside
    StrongBuy,
    /// Only the dividend model sees upside
    IncomeFocus,
    /// The dividend model sees no upside
    Caution,
}

/// Classify a pair of upsides; zero counts as no upside
pub fn diagnose(upside_bazin: f64, upside_graham: f64) -> Diagnosis {
    if upside_bazin > 0.0 && upside_graham > 0.0 {
        Diagnosis::StrongBuy
    } else if upside_bazin > 0.0 {
        Diagnosis::IncomeFocus
    } else {
        Diagnosis::Caution
    }
}

impl Diagnosis {
    pub fn headline(&self, language: Language) -> &'static str {
        match self {
            Diagnosis::StrongBuy => language.pick("Strong buy", "Compra forte"),
            Diagnosis::IncomeFocus => language.pick("Income focus", "Foco em renda"),
            Diagnosis::Caution => language.pick("Caution", "Cautela"),
        }
    }

    /// Explanatory paragraph shown under the headline
    pub fn narrative(
        &self,
        ticker: &str,
        currency: &str,
        avg_dividend: f64,
        language: Language,
    ) -> String {
        match (self, language) {
            (Diagnosis::StrongBuy, Language::English) => format!(
                "Full analysis complete: {ticker} shows a wide margin of safety under both \
                 classic models. The 5-year average dividend ({currency} {avg_dividend:.2}) \
                 supports the Bazin thesis."
            ),
            (Diagnosis::StrongBuy, Language::Portuguese) => format!(
                "Análise completa concluída: {ticker} apresenta excelente margem de segurança \
                 em ambos os modelos clássicos. A média de dividendos dos últimos 5 anos \
                 ({currency} {avg_dividend:.2}) sustenta a tese de Bazin."
            ),
            (Diagnosis::IncomeFocus, Language::English) => "Income focus: the Bazin model \
                 points to an attractive yield based on the 5-year history, but the equity may \
                 be overvalued according to Graham. Watch your average entry price."
                .to_string(),
            (Diagnosis::IncomeFocus, Language::Portuguese) => "Foco em Renda: O modelo de \
                 Bazin indica um yield atrativo baseado no histórico de 5 anos, mas o \
                 patrimônio pode estar sobrevalorizado segundo Graham. Atenção ao preço médio."
                .to_string(),
            (Diagnosis::Caution, Language::English) => "The models suggest caution. Dividend \
                 monitoring is vital here to make sure the investment thesis stays intact."
                .to_string(),
            (Diagnosis::Caution, Language::Portuguese) => "Os modelos sugerem cautela. O \
                 monitoramento de dividendos é vital aqui para garantir que a tese de \
                 investimento se mantenha íntegra."
                .to_string(),
        }
    }
}

impl fmt::Display for Diagnosis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.headline(Language::English))
    }
}

/// Per-model label, independent of the other model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Signal {
    Opportunity,
    Overvalued,
}

impl Signal {
    pub fn label(&self, language: Language) -> &'static str {
        match self {
            Signal::Opportunity => language.pick("Opportunity", "Oportunidade"),
            Signal::Overvalued => language.pick("Overvalued", "Sobrevalorizado"),
        }
    }
}

/// `Opportunity` only when the fair price is strictly above the market price
pub fn signal(fair_price: f64, current_price: f64) -> Signal {
    if fair_price > current_price {
        Signal::Opportunity
    } else {
        Signal::Overvalued
    }
}
