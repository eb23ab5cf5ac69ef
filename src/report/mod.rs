//! HTML report: one treemap document per region plus a page framing both.
//!
//! Everything is rendered in memory first; `write_to` only touches the
//! filesystem once all three documents exist.

pub mod treemap;

use crate::models::{CompanyRecord, Region};
use anyhow::{Context, Result};
use maud::{html, Markup, PreEscaped, DOCTYPE};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use self::treemap::{render_chart, Treemap};

pub const USA_FILE: &str = "usa.html";
pub const EUROPE_FILE: &str = "europe.html";
pub const COMBINED_FILE: &str = "combined_treemap.html";

const PAGE_TITLE: &str = "Top 5 companies by sector";

const PAGE_CSS: &str = "
    body { font-family: Arial; background: #f4f4f4; padding: 40px; }
    h1 { text-align: center; }
    iframe { border: none; width: 100%; height: 600px; margin-bottom: 50px; box-shadow: 0 0 10px rgba(0,0,0,0.1); }
";

pub fn chart_file(region: Region) -> &'static str {
    match region {
        Region::Usa => USA_FILE,
        Region::Europe => EUROPE_FILE,
    }
}

pub fn chart_title(region: Region) -> String {
    format!("{} – {}", PAGE_TITLE, region)
}

/// The three rendered documents.
#[derive(Debug, Clone)]
pub struct Report {
    pub usa: String,
    pub europe: String,
    pub combined: String,
}

impl Report {
    /// Render from each region's selected records.
    pub fn render(usa: &[CompanyRecord], europe: &[CompanyRecord]) -> Self {
        Self {
            usa: render_region(Region::Usa, usa),
            europe: render_region(Region::Europe, europe),
            combined: render_wrapper().into_string(),
        }
    }

    /// Write all documents into `dir` under their fixed names, overwriting.
    pub fn write_to(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        let docs = [
            (USA_FILE, &self.usa),
            (EUROPE_FILE, &self.europe),
            (COMBINED_FILE, &self.combined),
        ];

        let mut written = Vec::with_capacity(docs.len());
        for (name, contents) in docs {
            let path = dir.join(name);
            std::fs::write(&path, contents).with_context(|| format!("Failed to write {:?}", path))?;
            info!("Wrote {:?}", path);
            written.push(path);
        }
        Ok(written)
    }
}

fn render_region(region: Region, records: &[CompanyRecord]) -> String {
    let treemap = Treemap::from_records(chart_title(region), records);
    if treemap.is_empty() {
        warn!("{}: no companies to chart", region);
    }
    render_chart(&treemap)
}

/// Static page embedding both chart documents by relative path, USA first.
pub fn render_wrapper() -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                title { (PAGE_TITLE) }
                style { (PreEscaped(PAGE_CSS)) }
            }
            body {
                h1 { (PAGE_TITLE) }
                @for region in Region::ALL {
                    iframe src=(chart_file(region)) title=(chart_title(region)) {}
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(symbol: &str, sector: &str, cap: f64, region: Region) -> CompanyRecord {
        CompanyRecord {
            symbol: symbol.to_string(),
            display_name: symbol.to_string(),
            sector: sector.to_string(),
            market_cap_billions: cap,
            region,
        }
    }

    #[test]
    fn test_wrapper_frames_usa_then_europe() {
        let html = render_wrapper().into_string();

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains(r#"<meta charset="UTF-8">"#));
        assert!(html.contains("<title>Top 5 companies by sector</title>"));
        assert!(html.contains("<h1>Top 5 companies by sector</h1>"));

        let usa = html.find(r#"src="usa.html""#).unwrap();
        let europe = html.find(r#"src="europe.html""#).unwrap();
        assert!(usa < europe);
    }

    #[test]
    fn test_chart_titles() {
        assert_eq!(chart_title(Region::Usa), "Top 5 companies by sector – USA");
        assert_eq!(chart_title(Region::Europe), "Top 5 companies by sector – Europe");
    }

    #[test]
    fn test_write_to_creates_three_files() {
        let dir = tempfile::tempdir().unwrap();
        let report = Report::render(&[rec("AAPL", "Technology", 3000.0, Region::Usa)], &[]);

        let written = report.write_to(dir.path()).unwrap();
        assert_eq!(written.len(), 3);

        let usa = std::fs::read_to_string(dir.path().join(USA_FILE)).unwrap();
        assert!(usa.contains(r#""labels":["Technology","AAPL"]"#));

        let europe = std::fs::read_to_string(dir.path().join(EUROPE_FILE)).unwrap();
        assert!(europe.contains("\"ids\":[]"));

        let combined = std::fs::read_to_string(dir.path().join(COMBINED_FILE)).unwrap();
        assert!(combined.contains("iframe"));
    }

    #[test]
    fn test_write_to_missing_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let report = Report::render(&[], &[]);
        assert!(report.write_to(&dir.path().join("missing")).is_err());
    }
}
