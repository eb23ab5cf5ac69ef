use crate::models::Fundamentals;
use anyhow::Result;
use scraper::{ElementRef, Html, Selector};
use serde::Deserialize;

// ── Index constituents page ───────────────────────────────────────────────────

/// Extract the raw symbol column from an index-membership page.
///
/// Looks for `table#constituents` first (Wikipedia's S&P 500 list), then the
/// first `table.wikitable`, then any table. The symbol column is found from the
/// header row; column 0 is assumed when no header says "symbol" or "ticker".
pub fn parse_constituents_table(html: &str) -> Result<Vec<String>> {
    let doc = Html::parse_document(html);

    let table = ["table#constituents", "table.wikitable", "table"]
        .iter()
        .filter_map(|s| Selector::parse(s).ok())
        .find_map(|sel| doc.select(&sel).next())
        .ok_or_else(|| anyhow::anyhow!("No table found on index page"))?;

    let tr_sel = Selector::parse("tr").map_err(|e| anyhow::anyhow!("tr selector: {:?}", e))?;
    let th_sel = Selector::parse("th").map_err(|e| anyhow::anyhow!("th selector: {:?}", e))?;
    let td_sel = Selector::parse("td").map_err(|e| anyhow::anyhow!("td selector: {:?}", e))?;

    let headers: Vec<String> = table
        .select(&tr_sel)
        .map(|tr| tr.select(&th_sel).map(cell_text).collect::<Vec<_>>())
        .find(|ths| !ths.is_empty())
        .unwrap_or_default();

    let symbol_idx = headers
        .iter()
        .position(|h| {
            let h = h.to_lowercase();
            h.contains("symbol") || h.contains("ticker")
        })
        .unwrap_or(0);

    let mut symbols = Vec::new();
    for tr in table.select(&tr_sel) {
        let cells: Vec<String> = tr.select(&td_sel).map(cell_text).collect();

        // Header rows carry only <th>
        let Some(symbol) = cells.get(symbol_idx) else { continue };
        if symbol.is_empty() {
            continue;
        }
        symbols.push(symbol.clone());
    }

    Ok(symbols)
}

fn cell_text(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

// ── Yahoo quoteSummary ────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct QuoteSummaryResponse {
    #[serde(rename = "quoteSummary")]
    quote_summary: QuoteSummaryData,
}

#[derive(Debug, Deserialize)]
struct QuoteSummaryData {
    #[serde(default)]
    result: Option<Vec<QuoteSummaryResult>>,
    #[serde(default)]
    error: Option<QuoteSummaryError>,
}

#[derive(Debug, Deserialize)]
struct QuoteSummaryError {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct QuoteSummaryResult {
    #[serde(rename = "assetProfile", default)]
    asset_profile: Option<AssetProfile>,
    #[serde(default)]
    price: Option<PriceModule>,
}

#[derive(Debug, Deserialize)]
struct AssetProfile {
    #[serde(default)]
    sector: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PriceModule {
    #[serde(rename = "marketCap", default)]
    market_cap: Option<RawValue>,
    #[serde(rename = "shortName", default)]
    short_name: Option<String>,
    #[serde(rename = "longName", default)]
    long_name: Option<String>,
}

/// Yahoo wraps numbers as `{"raw": 1.0, "fmt": "1.00"}`; an empty object means no value.
#[derive(Debug, Deserialize)]
struct RawValue {
    #[serde(default)]
    raw: Option<f64>,
}

/// Outcome of decoding a quoteSummary body.
#[derive(Debug, PartialEq)]
pub enum QuoteSummary {
    Found(Fundamentals),
    NotFound,
    /// Provider reported an error: (code, description)
    Error(String, String),
}

pub fn parse_quote_summary(body: &str) -> serde_json::Result<QuoteSummary> {
    let resp: QuoteSummaryResponse = serde_json::from_str(body)?;

    if let Some(err) = resp.quote_summary.error {
        let code = err.code.unwrap_or_default();
        let description = err.description.unwrap_or_default();
        if code.eq_ignore_ascii_case("not found") {
            return Ok(QuoteSummary::NotFound);
        }
        return Ok(QuoteSummary::Error(code, description));
    }

    let Some(result) = resp.quote_summary.result.and_then(|r| r.into_iter().next()) else {
        return Ok(QuoteSummary::NotFound);
    };

    let (market_cap, short_name) = match result.price {
        Some(p) => (
            p.market_cap.and_then(|v| v.raw),
            p.short_name
                .filter(|n| !n.trim().is_empty())
                .or(p.long_name),
        ),
        None => (None, None),
    };

    Ok(QuoteSummary::Found(Fundamentals {
        sector: result.asset_profile.and_then(|a| a.sector),
        market_cap,
        short_name,
    }))
}
