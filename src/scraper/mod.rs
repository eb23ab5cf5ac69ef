pub mod cleaner;
pub mod http_client;
pub mod parsers;

use crate::config::{HttpConfig, SourceConfig};
use crate::models::{Fundamentals, Region, TickerEntry};
use anyhow::{Context, Result};
use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info};
use url::Url;

use self::cleaner::index_symbol_to_yahoo;
use self::http_client::HttpClient;
use self::parsers::{parse_constituents_table, parse_quote_summary, QuoteSummary};

const YAHOO_REFERER: &str = "https://finance.yahoo.com/";
const QUOTE_SUMMARY_MODULES: &str = "assetProfile,price";

// ── Errors ────────────────────────────────────────────────────────────────────

/// Why fundamentals for one symbol could not be fetched. Never fatal to a run.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP status {0}")]
    Status(u16),

    #[error("malformed response: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("provider error {code}: {description}")]
    Provider { code: String, description: String },

    #[error("authentication failed: {0}")]
    Auth(String),
}

// ── Source trait ──────────────────────────────────────────────────────────────

/// Swappable data source abstraction.
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// Members of the USA index, already tagged with their region.
    async fn fetch_index_members(&self) -> Result<Vec<TickerEntry>>;

    /// `Ok(None)` when the provider has nothing for this symbol.
    async fn fetch_fundamentals(&self, symbol: &str) -> Result<Option<Fundamentals>, FetchError>;
}

// ── Wikipedia + Yahoo ─────────────────────────────────────────────────────────

pub struct WebDataSource {
    client: HttpClient,
    index_url: String,
    quote_summary_url: Url,
    cookie_url: String,
    crumb_url: String,
    crumb: Mutex<Option<String>>,
}

impl WebDataSource {
    pub fn new(http: &HttpConfig, sources: &SourceConfig) -> Result<Self> {
        let quote_summary_url = Url::parse(&sources.quote_summary_url)
            .with_context(|| format!("Invalid quoteSummary URL {:?}", sources.quote_summary_url))?;
        if quote_summary_url.cannot_be_a_base() {
            anyhow::bail!("quoteSummary URL {} cannot take a symbol path", quote_summary_url);
        }

        Ok(Self {
            client: HttpClient::new(http)?,
            index_url: sources.index_url.clone(),
            quote_summary_url,
            cookie_url: sources.cookie_url.clone(),
            crumb_url: sources.crumb_url.clone(),
            crumb: Mutex::new(None),
        })
    }

    /// URL for one symbol, e.g. …/quoteSummary/BRK-B?modules=assetProfile,price&crumb=…
    fn fundamentals_url(&self, symbol: &str, crumb: &str) -> Url {
        let mut url = self.quote_summary_url.clone();
        // new() rejected cannot-be-a-base URLs
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(symbol);
        }
        url.query_pairs_mut()
            .append_pair("modules", QUOTE_SUMMARY_MODULES)
            .append_pair("crumb", crumb);
        url
    }

    /// Cached crumb, fetched on first use and again after the provider rejects it.
    async fn crumb(&self) -> Result<String, FetchError> {
        let mut cached = self.crumb.lock().await;
        if let Some(crumb) = cached.as_ref() {
            return Ok(crumb.clone());
        }

        // The cookie page answers 404 but still sets the session cookie
        if let Err(e) = self.client.get(&self.cookie_url, Some(YAHOO_REFERER)).await {
            debug!("Cookie request failed: {}", e);
        }

        let resp = self.client.get(&self.crumb_url, Some(YAHOO_REFERER)).await?;
        if !resp.is_success() {
            return Err(FetchError::Auth(format!("crumb endpoint returned {}", resp.status)));
        }

        let crumb = validate_crumb(&resp.body)
            .ok_or_else(|| FetchError::Auth("crumb endpoint returned an unusable body".into()))?;
        debug!("Obtained crumb");
        *cached = Some(crumb.clone());
        Ok(crumb)
    }

    /// Forget the crumb so the next symbol fetches a fresh one.
    async fn invalidate_crumb(&self) {
        *self.crumb.lock().await = None;
    }
}

/// How a quoteSummary HTTP status is handled before the body is looked at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StatusOutcome {
    /// 2xx: decode the body
    Body,
    /// Unknown symbol
    Absent,
    /// Cookie or crumb no longer accepted
    Rejected,
    Failed,
}

fn classify_status(status: u16) -> StatusOutcome {
    match status {
        200..=299 => StatusOutcome::Body,
        404 => StatusOutcome::Absent,
        401 | 403 => StatusOutcome::Rejected,
        _ => StatusOutcome::Failed,
    }
}

fn validate_crumb(body: &str) -> Option<String> {
    let body = body.trim();
    let looks_like_html = body.contains("<html") || body.contains("<!DOCTYPE");
    if body.is_empty() || body.len() >= 100 || body.contains(' ') || looks_like_html {
        return None;
    }
    Some(body.to_string())
}

#[async_trait]
impl MarketDataSource for WebDataSource {
    async fn fetch_index_members(&self) -> Result<Vec<TickerEntry>> {
        info!("Fetching index constituents ({})", self.index_url);

        let html = self
            .client
            .get_text(&self.index_url)
            .await
            .context("Failed to fetch index constituents page")?;

        let entries: Vec<TickerEntry> = parse_constituents_table(&html)?
            .iter()
            .map(|s| TickerEntry::new(index_symbol_to_yahoo(s), Region::Usa))
            .collect();

        info!("  {} index members", entries.len());
        Ok(entries)
    }

    async fn fetch_fundamentals(&self, symbol: &str) -> Result<Option<Fundamentals>, FetchError> {
        let crumb = self.crumb().await?;
        let url = self.fundamentals_url(symbol, &crumb);

        let resp = self.client.get(url.as_str(), Some(YAHOO_REFERER)).await?;
        match classify_status(resp.status) {
            StatusOutcome::Body => {}
            StatusOutcome::Absent => return Ok(None),
            StatusOutcome::Rejected => {
                self.invalidate_crumb().await;
                return Err(FetchError::Status(resp.status));
            }
            StatusOutcome::Failed => return Err(FetchError::Status(resp.status)),
        }

        match parse_quote_summary(&resp.body)? {
            QuoteSummary::Found(f) => Ok(Some(f)),
            QuoteSummary::NotFound => Ok(None),
            QuoteSummary::Error(code, description) => Err(FetchError::Provider { code, description }),
        }
    }
}
