mod config;
mod loader;
mod models;
mod pipeline;
mod report;
mod scraper;
mod selector;
mod utils;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::AppConfig;
use crate::pipeline::Pipeline;

#[derive(Parser)]
#[command(
    name = "sector-treemap",
    about = "Top companies per sector for USA and Europe, rendered as treemaps",
    version
)]
struct Cli {
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "sector_treemap=info,warn",
        1 => "sector_treemap=debug,info",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(fmt::layer().compact().with_target(false))
        .with(EnvFilter::new(filter))
        .init();

    let config = AppConfig::load();

    let _t = utils::Timer::start("Sector treemap report");
    let stats = Pipeline::new(&config)?.run().await?;

    info!(
        "Done: {} tickers, {} companies enriched, {} skipped",
        stats.tickers_processed, stats.companies_enriched, stats.skipped
    );
    info!(
        "Selected {} USA / {} Europe companies → {:?}",
        stats.usa_selected, stats.europe_selected, stats.files
    );

    Ok(())
}
