//! Pipeline orchestrator: ticker lists → fundamentals → top-N → HTML report.
//!
//! ## Steps
//!
//!   1. Load the static Europe list, fetch the USA index members, merge, apply the denylist.
//!   2. Fetch fundamentals one symbol at a time, in order. A symbol that errors or lacks
//!      sector/market cap is skipped; nothing here aborts the run.
//!   3. Keep the largest `TOP_N` companies per sector, per region.
//!   4. Render both treemaps and the wrapper page, then write the three files.
//!
//! Only steps 1 and 4 can fail the run.

use crate::config::AppConfig;
use crate::loader::{load_region_csv, merge_tickers};
use crate::models::{CompanyRecord, Region, TickerEntry};
use crate::report::Report;
use crate::scraper::cleaner::fundamentals_to_record;
use crate::scraper::{MarketDataSource, WebDataSource};
use crate::selector::{select_top_n, TOP_N};
use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::{debug, info};

pub struct Pipeline<S> {
    source: S,
    europe_csv: PathBuf,
    output_dir: PathBuf,
}

impl Pipeline<WebDataSource> {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let source = WebDataSource::new(&config.http, &config.sources)
            .context("Failed to build data source")?;
        Ok(Self::with_source(source, config.sources.europe_csv.clone()))
    }
}

impl<S: MarketDataSource> Pipeline<S> {
    pub fn with_source(source: S, europe_csv: PathBuf) -> Self {
        Self {
            source,
            europe_csv,
            output_dir: PathBuf::from("."),
        }
    }

    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub async fn run(&self) -> Result<PipelineStats> {
        // ── 1. Ticker lists ───────────────────────────────────────────────────
        info!("=== Step 1: Loading tickers ===");
        let europe = load_region_csv(&self.europe_csv)?;
        let usa = self
            .source
            .fetch_index_members()
            .await
            .context("Index member fetch failed")?;
        let tickers = merge_tickers(usa, europe);
        info!("{} tickers to enrich", tickers.len());

        // ── 2. Fundamentals ───────────────────────────────────────────────────
        info!("=== Step 2: Fetching fundamentals ({} tickers) ===", tickers.len());
        let outcome = enrich(&self.source, &tickers).await;
        info!(
            "Collected data for {} companies ({} skipped)",
            outcome.records.len(),
            outcome.skipped
        );

        // ── 3. Selection ──────────────────────────────────────────────────────
        info!("=== Step 3: Selecting top {} per sector ===", TOP_N);
        let usa_top = select_top_n(&outcome.records, Region::Usa, TOP_N);
        let europe_top = select_top_n(&outcome.records, Region::Europe, TOP_N);
        info!("USA: {} companies | Europe: {} companies", usa_top.len(), europe_top.len());

        // ── 4. Report ─────────────────────────────────────────────────────────
        info!("=== Step 4: Rendering report ===");
        let files = Report::render(&usa_top, &europe_top).write_to(&self.output_dir)?;

        Ok(PipelineStats {
            tickers_processed: tickers.len(),
            companies_enriched: outcome.records.len(),
            skipped: outcome.skipped,
            usa_selected: usa_top.len(),
            europe_selected: europe_top.len(),
            files,
        })
    }
}

/// Result of the fundamentals pass.
#[derive(Debug, Default)]
pub struct EnrichOutcome {
    pub records: Vec<CompanyRecord>,
    pub skipped: usize,
}

/// Fetch fundamentals for every ticker sequentially and keep the usable ones.
pub async fn enrich<S: MarketDataSource + ?Sized>(source: &S, tickers: &[TickerEntry]) -> EnrichOutcome {
    let mut outcome = EnrichOutcome::default();

    for entry in tickers {
        let record = match source.fetch_fundamentals(&entry.symbol).await {
            Ok(Some(f)) => fundamentals_to_record(entry, &f),
            Ok(None) => None,
            Err(e) => {
                debug!("{}: {}", entry.symbol, e);
                None
            }
        };

        match record {
            Some(rec) => {
                debug!("{}: {} / {:.1}B", rec.symbol, rec.sector, rec.market_cap_billions);
                outcome.records.push(rec);
            }
            None => {
                debug!("{}: skipped", entry.symbol);
                outcome.skipped += 1;
            }
        }
    }

    outcome
}

#[derive(Debug)]
pub struct PipelineStats {
    pub tickers_processed: usize,
    pub companies_enriched: usize,
    pub skipped: usize,
    pub usa_selected: usize,
    pub europe_selected: usize,
    pub files: Vec<PathBuf>,
}
