use super::dashboard::{Dashboard, Selection};
use super::{page, report, terminal, ui};
use crate::chart::ChartStyle;
use crate::core::config::AppConfig;
use crate::core::{InstrumentCatalog, LookbackPeriod, MarketDataProvider};
use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct ViewOptions {
    pub symbol: String,
    /// Defaults to the first index in the catalog.
    pub index: Option<String>,
    pub style: ChartStyle,
    /// Overrides the configured lookback period.
    pub period: Option<LookbackPeriod>,
    /// Also write the page as an HTML report.
    pub html: Option<PathBuf>,
}

/// Renders a single selection to the terminal, and optionally to an HTML report.
pub async fn run(
    catalog: &InstrumentCatalog,
    provider: &dyn MarketDataProvider,
    config: &AppConfig,
    options: ViewOptions,
) -> Result<()> {
    let index = match options.index {
        Some(index) => index,
        None => catalog
            .index_names()
            .first()
            .map(|s| s.to_string())
            .context("No indices configured")?,
    };
    let period = options.period.unwrap_or(config.period);
    debug!(%index, symbol = %options.symbol, style = %options.style, %period, "Viewing stock");

    let mut dashboard = Dashboard::new(catalog, provider, period);
    let spinner = ui::new_spinner(format!("Fetching data for {}", options.symbol));
    let result = dashboard
        .select(Selection {
            index,
            symbol: options.symbol,
            style: options.style,
        })
        .await;
    spinner.finish_and_clear();

    let page = page::build(result?);
    println!("{}", terminal::render(&page, config.history_rows));

    if let Some(path) = options.html {
        report::write_report(&page, path)?;
    }
    Ok(())
}
