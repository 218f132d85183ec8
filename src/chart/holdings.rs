use crate::chart::{Figure, Trace};
use crate::core::fundamentals::{FundamentalField, FundamentalsRecord};
use tracing::warn;

pub const TITLE: &str = "Stock Holding Pattern";
const DONUT_HOLE: f64 = 0.3;

/// Institutional holdings as a fraction; the sentinel and unparseable text read as 0.
///
/// No clamping is applied: a fraction above 1 is returned unchanged.
pub fn institutional_fraction(record: &FundamentalsRecord) -> f64 {
    let field = FundamentalField::InstitutionalHoldings;
    match record.get(field).as_number(field) {
        Ok(value) => value.unwrap_or(0.0),
        Err(e) => {
            warn!(error = %e, "Treating institutional holdings as 0");
            0.0
        }
    }
}

/// Two-slice donut: institutional versus everything else.
pub fn render(record: &FundamentalsRecord) -> Figure {
    let institutional = institutional_fraction(record);
    Figure {
        title: TITLE.to_string(),
        x_label: None,
        y_label: None,
        traces: vec![Trace::Pie {
            labels: vec![
                "Institutional Holdings".to_string(),
                "Retail/Other Holdings".to_string(),
            ],
            values: vec![institutional, 1.0 - institutional],
            hole: DONUT_HOLE,
        }],
    }
}
