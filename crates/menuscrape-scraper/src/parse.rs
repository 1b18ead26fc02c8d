//! Price parsing and formatting.
//!
//! Amounts are carried as [`Decimal`] and only rendered to strings at the
//! canonical boundary, always as `$` plus exactly two decimals.

use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::{Decimal, RoundingStrategy};

static CURRENCY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\s*(\d[\d,]*(?:\.\d+)?)").expect("valid regex"));
static NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d[\d,]*(?:\.\d+)?").expect("valid regex"));

/// Parses the first currency-like amount in `text`.
///
/// A `$`-prefixed amount wins over a bare number appearing earlier.
/// Thousands separators are ignored.
#[must_use]
pub fn parse_price(text: &str) -> Option<Decimal> {
    let raw = CURRENCY_RE
        .captures(text)
        .and_then(|c| c.get(1))
        .or_else(|| NUMBER_RE.find(text))?
        .as_str()
        .replace(',', "");
    Decimal::from_str(&raw).ok()
}

/// Reads a price from a JSON string or number.
#[must_use]
pub fn json_price(value: &serde_json::Value) -> Option<Decimal> {
    match value {
        serde_json::Value::Number(n) => {
            let text = n.to_string();
            Decimal::from_str(&text)
                .or_else(|_| Decimal::from_scientific(&text))
                .ok()
        }
        serde_json::Value::String(s) => parse_price(s),
        _ => None,
    }
}

/// Converts an amount in minor units (cents) to major units.
#[must_use]
pub fn from_minor_units(amount: Decimal) -> Decimal {
    amount / Decimal::ONE_HUNDRED
}

/// Treats amounts above 100 as cents.
///
/// This is a range heuristic, not a type signal: a genuine $150 item is
/// misread as $1.50.
#[must_use]
pub fn normalize_cents_heuristic(amount: Decimal) -> Decimal {
    if amount > Decimal::ONE_HUNDRED {
        from_minor_units(amount)
    } else {
        amount
    }
}

/// Rounds half away from zero to whole cents.
#[must_use]
pub fn round_cents(amount: Decimal) -> Decimal {
    let mut rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded
}

/// Formats a price as `$X.XX`. Missing or negative amounts become `$0.00`.
#[must_use]
pub fn format_price(amount: Option<Decimal>) -> String {
    match amount {
        Some(value) if value >= Decimal::ZERO => format!("${}", round_cents(value)),
        _ => "$0.00".to_string(),
    }
}

/// Formats a price increment as `+$X.XX`.
#[must_use]
pub fn format_modifier(amount: Decimal) -> String {
    format!("+{}", format_price(Some(amount)))
}

#[cfg(test)]
#[path = "parse_test.rs"]
mod tests;
