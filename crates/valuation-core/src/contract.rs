//! Data contract for financial records
//!
//! The provider returns loosely-typed JSON. [`validate`] turns it into a
//! [`FinancialRecord`] or names the first field that breaks the contract.
//! Nothing downstream of this module ever sees unchecked provider data.

use crate::engine::evaluate;
use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

/// Fields a record must carry, in the order they are checked
pub const REQUIRED_FIELDS: [&str; 7] = [
    "ticker",
    "name",
    "currency",
    "currentPrice",
    "eps",
    "bvps",
    "avgDividend5Years",
];

/// Field name reported when the payload is not a JSON object at all
pub const ROOT_FIELD: &str = "$";

/// One dividend payment as reported by the provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DividendPayment {
    pub date: String,
    pub amount: f64,
    /// Category such as "Dividend" or "Interest on equity"
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

/// A validated financial record for one ticker
///
/// Optional fields are `None` when the provider had no data, which is kept
/// distinct from a zero value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialRecord {
    pub ticker: String,
    pub name: String,
    pub currency: String,
    /// Market price, always strictly positive
    pub current_price: f64,
    /// Earnings per share, any sign
    pub eps: f64,
    /// Book value per share, any sign
    pub bvps: f64,
    /// Average annual dividend over the trailing five years, never negative
    #[serde(rename = "avgDividend5Years")]
    pub avg_dividend_5_years: f64,
    /// Current dividend yield in percent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dividend_yield: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_dividend_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payout_frequency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dividend_history: Option<Vec<DividendPayment>>,
}

impl FinancialRecord {
    /// The first `n` payments of the history, in provider order
    pub fn recent_dividends(&self, n: usize) -> &[DividendPayment] {
        match &self.dividend_history {
            Some(history) => &history[..history.len().min(n)],
            None => &[],
        }
    }

    /// Dividend per share implied by the current yield and price
    pub fn estimated_current_dividend(&self) -> Option<f64> {
        self.dividend_yield
            .map(|yield_pct| self.current_price * (yield_pct / 100.0))
    }
}

/// Validate a raw provider payload against the data contract
///
/// Required fields are checked in [`REQUIRED_FIELDS`] order, then the
/// optional fields in schema order. The error names the first failure.
pub fn validate(raw: &Value) -> Result<FinancialRecord, ValidationError> {
    let Some(map) = raw.as_object() else {
        return Err(ValidationError::new(ROOT_FIELD, "expected a JSON object"));
    };
    let fields = Fields(map);

    let ticker = fields.required_string("ticker")?.to_uppercase();
    if ticker.is_empty() {
        return Err(ValidationError::new("ticker", "must not be empty"));
    }
    let name = fields.required_string("name")?;
    let currency = fields.required_string("currency")?;

    let current_price = fields.required_number("currentPrice")?;
    if current_price <= 0.0 {
        return Err(ValidationError::new(
            "currentPrice",
            "must be greater than zero",
        ));
    }

    let eps = fields.required_number("eps")?;
    let bvps = fields.required_number("bvps")?;

    let avg_dividend_5_years = fields.required_number("avgDividend5Years")?;
    if avg_dividend_5_years < 0.0 {
        return Err(ValidationError::new(
            "avgDividend5Years",
            "must not be negative",
        ));
    }

    let record = FinancialRecord {
        ticker,
        name,
        currency,
        current_price,
        eps,
        bvps,
        avg_dividend_5_years,
        dividend_yield: fields.optional_number("dividendYield")?,
        region: fields.optional_string("region")?,
        last_updated: fields.optional_string("lastUpdated")?,
        next_dividend_date: fields.optional_string("nextDividendDate")?,
        payout_frequency: fields.optional_string("payoutFrequency")?,
        dividend_history: validate_history(map.get("dividendHistory"))?,
    };
    check_valuation_range(&record)?;
    Ok(record)
}

/// Reject finite inputs whose fair prices or upsides would overflow
fn check_valuation_range(record: &FinancialRecord) -> Result<(), ValidationError> {
    const REASON: &str = "out of range for valuation";

    let valuation = evaluate(record);
    if !valuation.bazin_fair_price.is_finite() {
        return Err(ValidationError::new("avgDividend5Years", REASON));
    }
    if valuation.graham_fair_price.is_some_and(|g| !g.is_finite()) {
        return Err(ValidationError::new("eps", REASON));
    }
    if !valuation.upside_bazin.is_finite() || !valuation.upside_graham.is_finite() {
        return Err(ValidationError::new("currentPrice", REASON));
    }
    Ok(())
}

fn validate_history(raw: Option<&Value>) -> Result<Option<Vec<DividendPayment>>, ValidationError> {
    let entries = match raw {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Array(entries)) => entries,
        Some(_) => {
            return Err(ValidationError::new(
                "dividendHistory",
                "expected an array",
            ));
        }
    };

    entries
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let prefix = format!("dividendHistory[{i}]");
            let Some(map) = entry.as_object() else {
                return Err(ValidationError::new(prefix, "expected an object"));
            };
            let fields = Fields(map).nested(&prefix);

            let date = fields.required_string("date")?;
            let amount = fields.required_number("amount")?;
            if amount < 0.0 {
                return Err(ValidationError::new(
                    format!("{prefix}.amount"),
                    "must not be negative",
                ));
            }
            Ok(DividendPayment {
                date,
                amount,
                kind: fields.optional_string("type")?,
            })
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Some)
}

/// Typed accessors over a JSON object, reporting errors by field path
struct Fields<'a>(&'a Map<String, Value>);

impl<'a> Fields<'a> {
    fn nested(self, prefix: &str) -> NestedFields<'a> {
        NestedFields {
            inner: self,
            prefix: prefix.to_string(),
        }
    }

    fn present(&self, name: &str) -> Option<&'a Value> {
        self.0.get(name).filter(|v| !v.is_null())
    }

    fn required_string(&self, name: &str) -> Result<String, ValidationError> {
        match self.present(name) {
            None => Err(ValidationError::missing(name)),
            Some(Value::String(s)) => Ok(s.trim().to_string()),
            Some(_) => Err(ValidationError::new(name, "expected a string")),
        }
    }

    fn required_number(&self, name: &str) -> Result<f64, ValidationError> {
        let value = self.present(name).ok_or_else(|| ValidationError::missing(name))?;
        as_finite(name, value)
    }

    fn optional_string(&self, name: &str) -> Result<Option<String>, ValidationError> {
        match self.present(name) {
            None => Ok(None),
            Some(Value::String(s)) => {
                let trimmed = s.trim();
                Ok((!trimmed.is_empty()).then(|| trimmed.to_string()))
            }
            Some(_) => Err(ValidationError::new(name, "expected a string")),
        }
    }

    fn optional_number(&self, name: &str) -> Result<Option<f64>, ValidationError> {
        self.present(name)
            .map(|value| as_finite(name, value))
            .transpose()
    }
}

/// Same accessors with errors reported as `prefix.field`
struct NestedFields<'a> {
    inner: Fields<'a>,
    prefix: String,
}

impl NestedFields<'_> {
    fn qualify(&self, mut err: ValidationError) -> ValidationError {
        err.field = format!("{}.{}", self.prefix, err.field);
        err
    }

    fn required_string(&self, name: &str) -> Result<String, ValidationError> {
        self.inner.required_string(name).map_err(|e| self.qualify(e))
    }

    fn required_number(&self, name: &str) -> Result<f64, ValidationError> {
        self.inner.required_number(name).map_err(|e| self.qualify(e))
    }

    fn optional_string(&self, name: &str) -> Result<Option<String>, ValidationError> {
        self.inner.optional_string(name).map_err(|e| self.qualify(e))
    }
}

fn as_finite(name: &str, value: &Value) -> Result<f64, ValidationError> {
    let number = value
        .as_f64()
        .ok_or_else(|| ValidationError::new(name, "expected a number"))?;
    if number.is_finite() {
        Ok(number)
    } else {
        Err(ValidationError::new(name, "must be a finite number"))
    }
}

/// JSON Schema the provider's answer must follow
pub fn financial_record_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "ticker": { "type": "string" },
            "name": { "type": "string" },
            "currency": { "type": "string" },
            "currentPrice": { "type": "number" },
            "eps": { "type": "number", "description": "Earnings per share" },
            "bvps": { "type": "number", "description": "Book value per share" },
            "dividendYield": { "type": "number", "description": "Current dividend yield in percent" },
            "avgDividend5Years": { "type": "number", "description": "Average annual dividend per share over the last 5 years" },
            "region": { "type": "string" },
            "lastUpdated": { "type": "string" },
            "nextDividendDate": { "type": "string", "description": "Date of the next dividend payment" },
            "payoutFrequency": { "type": "string", "description": "Payment frequency" },
            "dividendHistory": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "date": { "type": "string" },
                        "amount": { "type": "number" },
                        "type": { "type": "string" }
                    }
                }
            }
        },
        "required": REQUIRED_FIELDS
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn fixture() -> Value {
        json!({
            "ticker": "bbas3.sa",
            "name": "Banco do Brasil",
            "currency": "BRL",
            "currentPrice": 27.5,
            "eps": 6.1,
            "bvps": 32.4,
            "dividendYield": 9.2,
            "avgDividend5Years": 2.15,
            "region": "Brazil",
            "lastUpdated": "2026-10-14",
            "nextDividendDate": "2026-11-28",
            "payoutFrequency": "Quarterly",
            "dividendHistory": [
                {"date": "2026-08-29", "amount": 0.41, "type": "Dividend"},
                {"date": "2026-06-13", "amount": 0.38, "type": "Interest on equity"},
                {"date": "2026-03-14", "amount": 0.52}
            ]
        })
    }

    fn without(mut raw: Value, fields: &[&str]) -> Value {
        let map = raw.as_object_mut().unwrap();
        for field in fields {
            map.remove(*field);
        }
        raw
    }

    #[test]
    fn test_valid_record() {
        let record = validate(&fixture()).unwrap();
        assert_eq!(record.ticker, "BBAS3.SA");
        assert_eq!(record.current_price, 27.5);
        assert_eq!(record.dividend_yield, Some(9.2));
        assert_eq!(record.payout_frequency.as_deref(), Some("Quarterly"));

        let history = record.dividend_history.as_ref().unwrap();
        assert_eq!(history.len(), 3);
        assert_eq!(history[1].kind.as_deref(), Some("Interest on equity"));
        assert_eq!(history[2].kind, None);
    }

    #[test]
    fn test_each_required_field_is_reported() {
        for field in REQUIRED_FIELDS {
            let err = validate(&without(fixture(), &[field])).unwrap_err();
            assert_eq!(err.field, field);
            assert_eq!(err.reason, "required field is missing");
        }
    }

    #[test]
    fn test_first_missing_field_in_order() {
        let err = validate(&without(fixture(), &["avgDividend5Years", "eps", "name"])).unwrap_err();
        assert_eq!(err.field, "name");
    }

    #[test]
    fn test_null_required_field_is_missing() {
        let mut raw = fixture();
        raw["bvps"] = Value::Null;
        assert_eq!(validate(&raw).unwrap_err().field, "bvps");
    }

    #[test]
    fn test_rejects_non_positive_price() {
        for price in [0.0, -3.5] {
            let mut raw = fixture();
            raw["currentPrice"] = json!(price);
            let err = validate(&raw).unwrap_err();
            assert_eq!(err.field, "currentPrice");
            assert_eq!(err.reason, "must be greater than zero");
        }
    }

    #[test]
    fn test_rejects_numeric_string() {
        let mut raw = fixture();
        raw["currentPrice"] = json!("27.50");
        let err = validate(&raw).unwrap_err();
        assert_eq!(err.field, "currentPrice");
        assert_eq!(err.reason, "expected a number");
    }

    #[test]
    fn test_rejects_negative_average_dividend() {
        let mut raw = fixture();
        raw["avgDividend5Years"] = json!(-0.1);
        assert_eq!(validate(&raw).unwrap_err().field, "avgDividend5Years");
    }

    #[test]
    fn test_rejects_values_that_overflow_valuation() {
        let mut raw = fixture();
        raw["avgDividend5Years"] = json!(f64::MAX);
        let err = validate(&raw).unwrap_err();
        assert_eq!(err.field, "avgDividend5Years");
        assert_eq!(err.reason, "out of range for valuation");

        let mut raw = fixture();
        raw["eps"] = json!(1.0e200);
        raw["bvps"] = json!(1.0e200);
        assert_eq!(validate(&raw).unwrap_err().field, "eps");

        let mut raw = fixture();
        raw["currentPrice"] = json!(1.0);
        raw["avgDividend5Years"] = json!(1.0e307);
        assert_eq!(validate(&raw).unwrap_err().field, "currentPrice");

        let mut raw = fixture();
        raw["currentPrice"] = json!(1.0e-307);
        assert_eq!(validate(&raw).unwrap_err().field, "currentPrice");
    }

    #[test]
    fn test_accepts_negative_earnings_and_equity() {
        let mut raw = fixture();
        raw["eps"] = json!(-1.5);
        raw["bvps"] = json!(-0.2);
        let record = validate(&raw).unwrap();
        assert_eq!(record.eps, -1.5);
        assert_eq!(record.bvps, -0.2);
    }

    #[test]
    fn test_empty_ticker() {
        let mut raw = fixture();
        raw["ticker"] = json!("   ");
        let err = validate(&raw).unwrap_err();
        assert_eq!(err.field, "ticker");
        assert_eq!(err.reason, "must not be empty");
    }

    #[test]
    fn test_root_must_be_object() {
        let err = validate(&json!([1, 2, 3])).unwrap_err();
        assert_eq!(err.field, ROOT_FIELD);
    }

    #[test]
    fn test_optional_fields_absent_not_zero() {
        let raw = without(
            fixture(),
            &["dividendYield", "region", "nextDividendDate", "dividendHistory"],
        );
        let mut raw = raw;
        raw["payoutFrequency"] = json!("  ");
        raw["lastUpdated"] = Value::Null;

        let record = validate(&raw).unwrap();
        assert_eq!(record.dividend_yield, None);
        assert_eq!(record.region, None);
        assert_eq!(record.last_updated, None);
        assert_eq!(record.next_dividend_date, None);
        assert_eq!(record.payout_frequency, None);
        assert_eq!(record.dividend_history, None);
        assert_eq!(record.estimated_current_dividend(), None);
    }

    #[test]
    fn test_empty_history_is_not_absent() {
        let mut raw = fixture();
        raw["dividendHistory"] = json!([]);
        let record = validate(&raw).unwrap();
        assert_eq!(record.dividend_history, Some(vec![]));
        assert!(record.recent_dividends(3).is_empty());
    }

    #[test]
    fn test_zero_yield_is_kept() {
        let mut raw = fixture();
        raw["dividendYield"] = json!(0);
        let record = validate(&raw).unwrap();
        assert_eq!(record.dividend_yield, Some(0.0));
        assert_eq!(record.estimated_current_dividend(), Some(0.0));
    }

    #[test]
    fn test_wrong_type_on_optional_field() {
        let mut raw = fixture();
        raw["dividendYield"] = json!("9%");
        assert_eq!(validate(&raw).unwrap_err().field, "dividendYield");
    }

    #[test]
    fn test_history_entry_errors_are_indexed() {
        let mut raw = fixture();
        raw["dividendHistory"][1]["amount"] = json!(-0.5);
        let err = validate(&raw).unwrap_err();
        assert_eq!(err.field, "dividendHistory[1].amount");

        let mut raw = fixture();
        raw["dividendHistory"][2] = json!({"amount": 1.0});
        assert_eq!(validate(&raw).unwrap_err().field, "dividendHistory[2].date");

        let mut raw = fixture();
        raw["dividendHistory"][0] = json!("2026-08-29");
        assert_eq!(validate(&raw).unwrap_err().field, "dividendHistory[0]");

        let mut raw = fixture();
        raw["dividendHistory"] = json!({"date": "x"});
        assert_eq!(validate(&raw).unwrap_err().field, "dividendHistory");
    }

    #[test]
    fn test_recent_dividends() {
        let mut raw = fixture();
        raw["dividendHistory"]
            .as_array_mut()
            .unwrap()
            .push(json!({"date": "2025-12-01", "amount": 0.3}));
        let record = validate(&raw).unwrap();
        assert_eq!(record.recent_dividends(3).len(), 3);
        assert_eq!(record.recent_dividends(3)[0].date, "2026-08-29");
        assert_eq!(record.recent_dividends(10).len(), 4);
    }

    #[test]
    fn test_estimated_current_dividend() {
        let record = validate(&fixture()).unwrap();
        let estimate = record.estimated_current_dividend().unwrap();
        approx::assert_relative_eq!(estimate, 27.5 * 0.092, epsilon = 1e-12);
    }

    #[test]
    fn test_serializes_contract_field_names() {
        let record = validate(&fixture()).unwrap();
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["currentPrice"], 27.5);
        assert_eq!(json["avgDividend5Years"], 2.15);
        assert_eq!(json["dividendHistory"][0]["type"], "Dividend");
        assert!(json["dividendHistory"][2].get("type").is_none());
    }

    #[test]
    fn test_schema_required_matches_contract() {
        let schema = financial_record_schema();
        assert_eq!(schema["required"], json!(REQUIRED_FIELDS));
        for field in REQUIRED_FIELDS {
            assert!(schema["properties"].get(field).is_some(), "{field} missing from schema");
        }
        assert_eq!(
            schema["properties"]["dividendHistory"]["items"]["properties"]["type"]["type"],
            "string"
        );
    }

    proptest! {
        #[test]
        fn prop_valid_numbers_are_accepted(
            price in 0.01f64..1.0e6,
            eps in -1.0e3f64..1.0e3,
            bvps in -1.0e3f64..1.0e3,
            avg in 0.0f64..1.0e3,
        ) {
            let mut raw = fixture();
            raw["currentPrice"] = json!(price);
            raw["eps"] = json!(eps);
            raw["bvps"] = json!(bvps);
            raw["avgDividend5Years"] = json!(avg);

            let record = validate(&raw).unwrap();
            prop_assert_eq!(record.current_price, price);
            prop_assert_eq!(record.avg_dividend_5_years, avg);
        }

        #[test]
        fn prop_accepted_records_value_finitely(
            price_exp in -310i32..310,
            eps_exp in -10i32..310,
            bvps_exp in -10i32..310,
            avg_exp in -10i32..310,
        ) {
            let mut raw = fixture();
            raw["currentPrice"] = json!(10f64.powi(price_exp));
            raw["eps"] = json!(10f64.powi(eps_exp));
            raw["bvps"] = json!(10f64.powi(bvps_exp));
            raw["avgDividend5Years"] = json!(10f64.powi(avg_exp));

            if let Ok(record) = validate(&raw) {
                let valuation = evaluate(&record);
                prop_assert!(valuation.bazin_fair_price.is_finite());
                prop_assert!(valuation.graham_or_zero().is_finite());
                prop_assert!(valuation.upside_bazin.is_finite());
                prop_assert!(valuation.upside_graham.is_finite());
            }
        }

        #[test]
        fn prop_non_positive_price_is_rejected(price in -1.0e6f64..=0.0) {
            let mut raw = fixture();
            raw["currentPrice"] = json!(price);
            let err = validate(&raw).unwrap_err();
            prop_assert_eq!(err.field, "currentPrice");
        }
    }
}
