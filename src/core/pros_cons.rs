//! Canned pros and cons picked by fixed thresholds on a fundamentals record.

use crate::core::error::ViewerError;
use crate::core::fundamentals::{FundamentalField, FundamentalsRecord};

const HIGH_INSTITUTIONAL_HOLDINGS: f64 = 0.5;
const HIGH_PE_RATIO: f64 = 30.0;
const VOLATILE_BETA: f64 = 1.0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProsCons {
    pub pros: Vec<&'static str>,
    pub cons: Vec<&'static str>,
}

impl ProsCons {
    /// `(type, description)` rows, pros first.
    pub fn rows(&self) -> Vec<(&'static str, &'static str)> {
        self.pros
            .iter()
            .map(|p| ("Pros", *p))
            .chain(self.cons.iter().map(|c| ("Cons", *c)))
            .collect()
    }
}

fn exceeds(
    record: &FundamentalsRecord,
    field: FundamentalField,
    threshold: f64,
) -> Result<bool, ViewerError> {
    Ok(record
        .get(field)
        .as_number(field)?
        .is_some_and(|v| v > threshold))
}

/// Evaluates each rule independently.
///
/// A numeric field holding unparseable text fails the whole derivation with
/// [`ViewerError::MalformedNumeric`]; the sentinel simply selects the fallback.
pub fn derive(record: &FundamentalsRecord) -> Result<ProsCons, ViewerError> {
    let holdings = if exceeds(
        record,
        FundamentalField::InstitutionalHoldings,
        HIGH_INSTITUTIONAL_HOLDINGS,
    )? {
        "High Institutional Holdings"
    } else {
        "Strong market position"
    };

    let dividend = if record.get(FundamentalField::DividendYield).is_truthy() {
        "Stable Dividend Yield"
    } else {
        "Positive earnings growth"
    };

    let pe = if exceeds(record, FundamentalField::PeRatio, HIGH_PE_RATIO)? {
        "High PE Ratio"
    } else {
        "Low Dividend Yield"
    };

    let beta = if exceeds(record, FundamentalField::Beta, VOLATILE_BETA)? {
        "Volatile stock"
    } else {
        "Sector-specific risks"
    };

    Ok(ProsCons {
        pros: vec![holdings, dividend],
        cons: vec![pe, beta],
    })
}
