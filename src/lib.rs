pub mod chart;
pub mod cli;
pub mod core;
pub mod providers;

use crate::cli::view::ViewOptions;
use crate::core::InstrumentCatalog;
use crate::core::config::AppConfig;
use crate::providers::YahooFinanceProvider;
use anyhow::Result;
use tracing::{debug, info};

pub enum AppCommand {
    Indices,
    Stocks { index: String },
    View(ViewOptions),
    Browse,
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("Stock viewer starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let catalog = InstrumentCatalog::from_config(&config.indices);
    let provider =
        YahooFinanceProvider::with_cookie_url(config.yahoo_base_url(), config.yahoo_cookie_url())?;

    match command {
        AppCommand::Indices => {
            println!("{}", cli::listing::indices_table(&catalog));
            Ok(())
        }
        AppCommand::Stocks { index } => {
            println!("{}", cli::listing::stocks_table(&catalog, &index)?);
            Ok(())
        }
        AppCommand::View(options) => cli::view::run(&catalog, &provider, &config, options).await,
        AppCommand::Browse => cli::browse::run(&catalog, &provider, &config).await,
    }
}
