//! Domain errors that callers inspect or report to the user.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ViewerError {
    #[error("Unknown index: {0}")]
    UnknownIndex(String),

    #[error("{symbol} is not a member of {index}")]
    UnknownInstrument { index: String, symbol: String },

    #[error("Unknown chart style: {0}")]
    UnknownChartStyle(String),

    #[error("Unknown lookback period: {0}")]
    UnknownPeriod(String),

    /// A field expected to hold a number contains text that does not parse.
    #[error("{field} holds a non-numeric value: {value}")]
    MalformedNumeric { field: &'static str, value: String },
}
