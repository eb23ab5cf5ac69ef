use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ── Region ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Region {
    #[serde(rename = "USA")]
    Usa,
    Europe,
}

impl Region {
    pub const ALL: [Region; 2] = [Region::Usa, Region::Europe];

    pub fn label(self) -> &'static str {
        match self {
            Region::Usa => "USA",
            Region::Europe => "Europe",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Region {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "usa" | "us" => Ok(Region::Usa),
            "europe" | "eu" => Ok(Region::Europe),
            other => anyhow::bail!("unknown region label {:?}", other),
        }
    }
}

// ── Ticker ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TickerEntry {
    pub symbol: String,
    pub region: Region,
}

impl TickerEntry {
    pub fn new(symbol: impl Into<String>, region: Region) -> Self {
        Self {
            symbol: symbol.into(),
            region,
        }
    }
}

// ── Provider answer ───────────────────────────────────────────────────────────

/// What the fundamentals provider knows about one symbol. Every field may be missing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fundamentals {
    pub sector: Option<String>,
    pub market_cap: Option<f64>, // raw currency units
    pub short_name: Option<String>,
}

// ── Company record ────────────────────────────────────────────────────────────

/// An enriched ticker. Only built through `scraper::cleaner::fundamentals_to_record`,
/// which guarantees a non-empty sector and a positive market cap.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompanyRecord {
    pub symbol: String,
    pub display_name: String,
    pub sector: String,
    pub market_cap_billions: f64,
    pub region: Region,
}
