//! Core business logic abstractions

pub mod catalog;
pub mod config;
pub mod error;
pub mod fundamentals;
pub mod log;
pub mod market;
pub mod pros_cons;

// Re-export main types for cleaner imports
pub use catalog::InstrumentCatalog;
pub use error::ViewerError;
pub use fundamentals::{FieldValue, FundamentalField, FundamentalsRecord};
pub use market::{LookbackPeriod, MarketDataProvider, PriceBar, PriceHistory, RawFundamentals};
pub use pros_cons::ProsCons;
