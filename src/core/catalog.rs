//! Static index to instrument lookup.

use crate::core::config::IndexConfig;
use crate::core::error::ViewerError;

/// NIFTY 50 components (as of 2024).
const NIFTY_50: [&str; 50] = [
    "RELIANCE.NS",
    "TCS.NS",
    "HDFCBANK.NS",
    "INFY.NS",
    "HINDUNILVR.NS",
    "ICICIBANK.NS",
    "KOTAKBANK.NS",
    "ITC.NS",
    "SBIN.NS",
    "LT.NS",
    "AXISBANK.NS",
    "BHARTIARTL.NS",
    "ASIANPAINT.NS",
    "HDFC.NS",
    "BAJFINANCE.NS",
    "HCLTECH.NS",
    "WIPRO.NS",
    "MARUTI.NS",
    "HDFCLIFE.NS",
    "ADANIGREEN.NS",
    "TECHM.NS",
    "ULTRACEMCO.NS",
    "SUNPHARMA.NS",
    "NTPC.NS",
    "TITAN.NS",
    "NESTLEIND.NS",
    "POWERGRID.NS",
    "JSWSTEEL.NS",
    "GRASIM.NS",
    "TATAMOTORS.NS",
    "TATASTEEL.NS",
    "INDUSINDBK.NS",
    "HEROMOTOCO.NS",
    "ONGC.NS",
    "COALINDIA.NS",
    "BPCL.NS",
    "UPL.NS",
    "DRREDDY.NS",
    "DIVISLAB.NS",
    "APOLLOHOSP.NS",
    "BRITANNIA.NS",
    "CIPLA.NS",
    "M&M.NS",
    "BAJAJFINSV.NS",
    "ADANIPORTS.NS",
    "EICHERMOT.NS",
    "SBILIFE.NS",
    "TATACONSUM.NS",
    "HINDALCO.NS",
    "SHREECEM.NS",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexListing {
    pub name: String,
    pub symbols: Vec<String>,
}

/// Ordered, read-only mapping from index name to its instruments.
#[derive(Debug, Clone)]
pub struct InstrumentCatalog {
    indices: Vec<IndexListing>,
}

impl InstrumentCatalog {
    pub fn builtin() -> Self {
        Self {
            indices: vec![IndexListing {
                name: "NIFTY 50".to_string(),
                symbols: NIFTY_50.iter().map(|s| s.to_string()).collect(),
            }],
        }
    }

    /// Uses the configured indices, or the built-in catalog when none are configured.
    pub fn from_config(indices: &[IndexConfig]) -> Self {
        if indices.is_empty() {
            return Self::builtin();
        }
        Self {
            indices: indices
                .iter()
                .map(|i| IndexListing {
                    name: i.name.clone(),
                    symbols: i.symbols.clone(),
                })
                .collect(),
        }
    }

    pub fn index_names(&self) -> Vec<&str> {
        self.indices.iter().map(|i| i.name.as_str()).collect()
    }

    pub fn listings(&self) -> &[IndexListing] {
        &self.indices
    }

    pub fn instruments(&self, index: &str) -> Result<&[String], ViewerError> {
        self.indices
            .iter()
            .find(|i| i.name == index)
            .map(|i| i.symbols.as_slice())
            .ok_or_else(|| ViewerError::UnknownIndex(index.to_string()))
    }

    pub fn validate(&self, index: &str, symbol: &str) -> Result<(), ViewerError> {
        if self.instruments(index)?.iter().any(|s| s == symbol) {
            Ok(())
        } else {
            Err(ViewerError::UnknownInstrument {
                index: index.to_string(),
                symbol: symbol.to_string(),
            })
        }
    }
}
