use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;
use stockview::chart::ChartStyle;
use stockview::cli::view::ViewOptions;
use stockview::core::LookbackPeriod;
use stockview::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl From<Commands> for stockview::AppCommand {
    fn from(cmd: Commands) -> stockview::AppCommand {
        match cmd {
            Commands::Indices => stockview::AppCommand::Indices,
            Commands::Stocks { index } => stockview::AppCommand::Stocks { index },
            Commands::View {
                symbol,
                index,
                chart,
                period,
                html,
            } => stockview::AppCommand::View(ViewOptions {
                symbol,
                index,
                style: chart,
                period,
                html,
            }),
            Commands::Browse => stockview::AppCommand::Browse,
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// List the available indices
    Indices,
    /// List the stocks of an index
    Stocks {
        /// Index name, e.g. "NIFTY 50"
        index: String,
    },
    /// Display price history, charts, fundamentals and pros/cons for one stock
    View {
        /// Stock symbol, e.g. RELIANCE.NS
        #[arg(short, long)]
        symbol: String,

        /// Index the stock belongs to; defaults to the first index
        #[arg(short, long)]
        index: Option<String>,

        /// Chart style: line, candlestick, bar or area
        #[arg(long, default_value = "line")]
        chart: ChartStyle,

        /// Lookback period, e.g. 1y or 5y; defaults to the configured period
        #[arg(short, long)]
        period: Option<LookbackPeriod>,

        /// Also write the page as an HTML report to this path
        #[arg(long)]
        html: Option<PathBuf>,
    },
    /// Interactively browse indices and stocks
    Browse,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => stockview::cli::setup::setup(),
        Some(cmd) => stockview::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
