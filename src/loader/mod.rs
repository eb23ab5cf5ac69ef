//! Ticker list loading: the static regional CSV and the merge with index members.

use crate::models::{Region, TickerEntry};
use crate::scraper::cleaner::normalise_symbol;
use anyhow::{Context, Result};
use std::path::Path;
use tracing::{debug, info, warn};

/// Symbols never reported. GOOG duplicates GOOGL under the same company name.
pub const DENYLIST: &[&str] = &["GOOG"];

fn find_column(headers: &csv::StringRecord, names: &[&str]) -> Option<usize> {
    headers
        .iter()
        .position(|h| names.iter().any(|n| h.trim().eq_ignore_ascii_case(n)))
}

/// Parse a ticker CSV with `Ticker` and `Region` columns (any order, extra columns ignored).
pub fn load_region_csv(path: &Path) -> Result<Vec<TickerEntry>> {
    debug!("Loading tickers from {:?}", path);

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Cannot open ticker file {:?}", path))?;

    let headers = reader.headers()?.clone();
    let ticker_idx = find_column(&headers, &["ticker", "symbol"])
        .with_context(|| format!("No Ticker column in {:?}", path))?;
    let region_idx = find_column(&headers, &["region"])
        .with_context(|| format!("No Region column in {:?}", path))?;

    let mut entries = Vec::new();

    for (i, result) in reader.records().enumerate() {
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                warn!("Row {} in {:?}: {}", i + 1, path, e);
                continue;
            }
        };

        let symbol = normalise_symbol(record.get(ticker_idx).unwrap_or_default());
        if symbol.is_empty() {
            warn!("Row {} in {:?}: empty ticker", i + 1, path);
            continue;
        }

        let region = match record.get(region_idx).unwrap_or_default().parse::<Region>() {
            Ok(r) => r,
            Err(e) => {
                warn!("Row {} in {:?}: {}", i + 1, path, e);
                continue;
            }
        };

        entries.push(TickerEntry { symbol, region });
    }

    info!("{:?}: {} tickers loaded", path, entries.len());
    Ok(entries)
}

/// Index members first, then the static list; denylisted symbols dropped.
pub fn merge_tickers(index: Vec<TickerEntry>, listed: Vec<TickerEntry>) -> Vec<TickerEntry> {
    let before = index.len() + listed.len();

    let merged: Vec<TickerEntry> = index
        .into_iter()
        .chain(listed)
        .filter(|t| !DENYLIST.contains(&t.symbol.as_str()))
        .collect();

    debug!("Merged {} tickers, {} denylisted", merged.len(), before - merged.len());
    merged
}
