//! Command-line entry point: assemble, refresh, search, report.

use carousel::analyzer::Analyzer;
use carousel::balance::Balance;
use carousel::catalog::NodeCatalog;
use carousel::currency::Currency;
use carousel::refresh::RateRefresher;
use carousel::search::CycleSearch;
use carousel::utils::logger::setup_logger;
use clap::Parser;
use eyre::Result;
use log::info;

/// Command-line options for one search run.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Largest loop length to search; every length from 2 up is tried
    #[arg(long, default_value_t = 3)]
    max_size: usize,

    /// Starting amount for the simulation
    #[arg(long, default_value_t = 1000.0)]
    amount: f64,

    /// Currency the simulation starts and ends in
    #[arg(long, default_value = "USD")]
    currency: String,

    /// Include volatile crypto markets in the catalog
    #[arg(long)]
    crypto: bool,

    /// Concurrent refresh workers
    #[arg(long, default_value_t = 25)]
    workers: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_logger()?;
    let cli = Cli::parse();

    let target: Currency = cli.currency.parse()?;
    let start = Balance::new(cli.amount, target);

    let catalog = NodeCatalog::assemble(cli.crypto);
    info!("assembled {} venue nodes", catalog.len());

    let live = RateRefresher::new(cli.workers, true).refresh(&catalog).await;

    // Candidates from every length are merged into one ranking pass
    let mut routes = Vec::new();
    for size in 2..=cli.max_size {
        routes.extend(CycleSearch::new(&live, target, size));
    }
    info!("found {} candidate loops returning to {target}", routes.len());

    Analyzer::new(start).run(routes)?;

    Ok(())
}
