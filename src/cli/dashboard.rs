//! The fetch-and-render pipeline behind every selection change.

use crate::chart::{ChartStyle, Figure, holdings, price};
use crate::core::{
    InstrumentCatalog, LookbackPeriod, MarketDataProvider, PriceHistory, ProsCons,
    fundamentals::{self, FundamentalsRecord},
    pros_cons,
};
use anyhow::{Context, Result};
use tracing::debug;

/// What the user has picked: index, instrument within it, and chart style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub index: String,
    pub symbol: String,
    pub style: ChartStyle,
}

/// Everything shown for one selection, derived from a single fetch.
#[derive(Debug, Clone)]
pub struct Render {
    pub selection: Selection,
    pub history: PriceHistory,
    pub fundamentals: FundamentalsRecord,
    pub price_chart: Figure,
    pub holdings_chart: Figure,
    pub pros_cons: ProsCons,
}

pub struct Dashboard<'a> {
    catalog: &'a InstrumentCatalog,
    provider: &'a dyn MarketDataProvider,
    period: LookbackPeriod,
    current: Option<Render>,
    last_error: Option<String>,
}

impl<'a> Dashboard<'a> {
    pub fn new(
        catalog: &'a InstrumentCatalog,
        provider: &'a dyn MarketDataProvider,
        period: LookbackPeriod,
    ) -> Self {
        Self {
            catalog,
            provider,
            period,
            current: None,
            last_error: None,
        }
    }

    pub fn current(&self) -> Option<&Render> {
        self.current.as_ref()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Re-runs the whole pipeline for `selection`.
    ///
    /// On success the displayed render is replaced as a whole. On failure the
    /// previous render stays untouched and the error is remembered for display.
    pub async fn select(&mut self, selection: Selection) -> Result<&Render> {
        let result = self.build(selection).await;
        match result {
            Ok(render) => {
                self.last_error = None;
                Ok(&*self.current.insert(render))
            }
            Err(e) => {
                self.last_error = Some(format!("{e:#}"));
                Err(e)
            }
        }
    }

    async fn build(&self, selection: Selection) -> Result<Render> {
        self.catalog.validate(&selection.index, &selection.symbol)?;
        let symbol = selection.symbol.as_str();

        debug!(%symbol, period = %self.period, "Fetching price history");
        let history = self
            .provider
            .fetch_price_history(symbol, self.period)
            .await
            .with_context(|| format!("Failed to fetch price history for {symbol}"))?;

        debug!(%symbol, "Fetching fundamentals");
        let raw = self
            .provider
            .fetch_fundamentals(symbol)
            .await
            .with_context(|| format!("Failed to fetch fundamentals for {symbol}"))?;
        let fundamentals = fundamentals::normalize(&raw);

        let price_chart = price::render(
            &history,
            selection.style,
            &format!("{symbol} Stock Prices"),
        );
        let holdings_chart = holdings::render(&fundamentals);
        let pros_cons = pros_cons::derive(&fundamentals)?;

        Ok(Render {
            selection,
            history,
            fundamentals,
            price_chart,
            holdings_chart,
            pros_cons,
        })
    }
}
