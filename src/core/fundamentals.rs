//! Normalizes the provider's raw fundamentals mapping into a fixed record.
//!
//! Missing data is normal here: every field is independently nullable and
//! is represented by [`FieldValue::NotAvailable`] instead of an error.

use crate::core::error::ViewerError;
use crate::core::market::RawFundamentals;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt::Display;

/// Text used by the provider, and by us, for a missing value.
pub const NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FundamentalField {
    CompanyName,
    MarketCap,
    PeRatio,
    Eps,
    DividendYield,
    Beta,
    FiftyTwoWeekHigh,
    FiftyTwoWeekLow,
    Sector,
    Industry,
    InstitutionalHoldings,
}

impl FundamentalField {
    /// All recognized fields, in display order.
    pub const ALL: [FundamentalField; 11] = [
        FundamentalField::CompanyName,
        FundamentalField::MarketCap,
        FundamentalField::PeRatio,
        FundamentalField::Eps,
        FundamentalField::DividendYield,
        FundamentalField::Beta,
        FundamentalField::FiftyTwoWeekHigh,
        FundamentalField::FiftyTwoWeekLow,
        FundamentalField::Sector,
        FundamentalField::Industry,
        FundamentalField::InstitutionalHoldings,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FundamentalField::CompanyName => "Company Name",
            FundamentalField::MarketCap => "Market Cap",
            FundamentalField::PeRatio => "PE Ratio",
            FundamentalField::Eps => "EPS",
            FundamentalField::DividendYield => "Dividend Yield",
            FundamentalField::Beta => "Beta",
            FundamentalField::FiftyTwoWeekHigh => "52 Week High",
            FundamentalField::FiftyTwoWeekLow => "52 Week Low",
            FundamentalField::Sector => "Sector",
            FundamentalField::Industry => "Industry",
            FundamentalField::InstitutionalHoldings => "Institutional Holdings",
        }
    }

    /// Key of this field in the provider's raw mapping.
    pub fn source_key(&self) -> &'static str {
        match self {
            FundamentalField::CompanyName => "longName",
            FundamentalField::MarketCap => "marketCap",
            FundamentalField::PeRatio => "trailingPE",
            FundamentalField::Eps => "trailingEps",
            FundamentalField::DividendYield => "dividendYield",
            FundamentalField::Beta => "beta",
            FundamentalField::FiftyTwoWeekHigh => "fiftyTwoWeekHigh",
            FundamentalField::FiftyTwoWeekLow => "fiftyTwoWeekLow",
            FundamentalField::Sector => "sector",
            FundamentalField::Industry => "industry",
            FundamentalField::InstitutionalHoldings => "heldPercentInstitutions",
        }
    }
}

impl Display for FundamentalField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Number(f64),
    Text(String),
    NotAvailable,
}

impl FieldValue {
    fn from_raw(value: Option<&Value>) -> Self {
        match value {
            None | Some(Value::Null) => FieldValue::NotAvailable,
            Some(Value::String(s)) if s == NOT_AVAILABLE => FieldValue::NotAvailable,
            Some(Value::String(s)) => FieldValue::Text(s.clone()),
            Some(Value::Number(n)) => n
                .as_f64()
                .map_or(FieldValue::NotAvailable, FieldValue::Number),
            Some(other) => FieldValue::Text(other.to_string()),
        }
    }

    /// Truthiness of a present value: non-zero numbers and non-empty text.
    pub fn is_truthy(&self) -> bool {
        match self {
            FieldValue::Number(n) => *n != 0.0,
            FieldValue::Text(s) => !s.is_empty(),
            FieldValue::NotAvailable => false,
        }
    }

    /// Reads the value as a number. `Ok(None)` for the sentinel, an error for
    /// text that does not parse.
    pub fn as_number(&self, field: FundamentalField) -> Result<Option<f64>, ViewerError> {
        match self {
            FieldValue::NotAvailable => Ok(None),
            FieldValue::Number(n) => Ok(Some(*n)),
            FieldValue::Text(s) => {
                s.trim()
                    .parse::<f64>()
                    .map(Some)
                    .map_err(|_| ViewerError::MalformedNumeric {
                        field: field.label(),
                        value: s.clone(),
                    })
            }
        }
    }
}

impl Display for FieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => write!(f, "{n:.0}"),
            FieldValue::Number(n) => write!(f, "{n}"),
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::NotAvailable => f.write_str(NOT_AVAILABLE),
        }
    }
}

static MISSING: FieldValue = FieldValue::NotAvailable;

/// Every [`FundamentalField`] mapped to a value or the sentinel.
#[derive(Debug, Clone, PartialEq)]
pub struct FundamentalsRecord {
    values: BTreeMap<FundamentalField, FieldValue>,
}

impl FundamentalsRecord {
    pub fn get(&self, field: FundamentalField) -> &FieldValue {
        self.values.get(&field).unwrap_or(&MISSING)
    }

    /// Fields and values in display order.
    pub fn iter(&self) -> impl Iterator<Item = (FundamentalField, &FieldValue)> {
        self.values.iter().map(|(k, v)| (*k, v))
    }
}

pub fn normalize(raw: &RawFundamentals) -> FundamentalsRecord {
    let values = FundamentalField::ALL
        .into_iter()
        .map(|field| (field, FieldValue::from_raw(raw.get(field.source_key()))))
        .collect();
    FundamentalsRecord { values }
}
