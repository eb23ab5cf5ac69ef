use crate::models::CompanyRecord;
use crate::utils::fmt_billions;
use maud::{html, Markup, PreEscaped, DOCTYPE};
use std::collections::HashMap;

const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

/// plotly.js treemap trace: sector nodes under an implicit root, companies under sectors.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TreemapTrace {
    pub ids: Vec<String>,
    pub labels: Vec<String>,
    pub parents: Vec<String>,
    pub values: Vec<f64>,
    pub text: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Treemap {
    pub title: String,
    pub trace: TreemapTrace,
}

impl Treemap {
    /// Build the sector → company hierarchy. Sectors appear in first-seen order;
    /// companies sharing a display name inside one sector become a single leaf.
    pub fn from_records(title: impl Into<String>, records: &[CompanyRecord]) -> Self {
        let mut sectors: Vec<(&str, f64)> = Vec::new();
        let mut leaves: Vec<(&str, &str, f64)> = Vec::new();
        let mut leaf_idx: HashMap<(&str, &str), usize> = HashMap::new();

        for rec in records {
            let sector = rec.sector.as_str();
            let name = rec.display_name.as_str();
            let cap = rec.market_cap_billions;

            match sectors.iter().position(|(s, _)| *s == sector) {
                Some(i) => sectors[i].1 += cap,
                None => sectors.push((sector, cap)),
            }

            let i = *leaf_idx.entry((sector, name)).or_insert_with(|| {
                leaves.push((sector, name, 0.0));
                leaves.len() - 1
            });
            leaves[i].2 += cap;
        }

        let mut trace = TreemapTrace::default();
        for (sector, total) in &sectors {
            trace.push(sector.to_string(), sector.to_string(), String::new(), *total);
        }
        for (sector, name, cap) in &leaves {
            trace.push(leaf_id(sector, name), name.to_string(), sector.to_string(), *cap);
        }

        Self {
            title: title.into(),
            trace,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.trace.ids.is_empty()
    }
}

/// Unit separator: never part of a sector or company name, so leaf ids stay
/// unique and never equal a sector id.
const ID_SEP: char = '\u{1f}';

fn leaf_id(sector: &str, name: &str) -> String {
    format!("{sector}{ID_SEP}{name}")
}

impl TreemapTrace {
    fn push(&mut self, id: String, label: String, parent: String, value: f64) {
        self.text.push(fmt_billions(value));
        self.ids.push(id);
        self.labels.push(label);
        self.parents.push(parent);
        self.values.push(value);
    }
}

/// JSON for embedding inside a <script> element.
fn script_json(value: &serde_json::Value) -> String {
    value.to_string().replace("</", "<\\/")
}

/// Standalone HTML document rendering one treemap.
pub fn render_chart(treemap: &Treemap) -> String {
    let t = &treemap.trace;
    let data = serde_json::json!([{
        "type": "treemap",
        "ids": t.ids,
        "labels": t.labels,
        "parents": t.parents,
        "values": t.values,
        "text": t.text,
        "branchvalues": "total",
        "textinfo": "label+text",
        "hovertemplate": "<b>%{label}</b><br>Market cap: %{text}<extra></extra>",
        "root": { "color": "lightgrey" },
    }]);
    let layout = serde_json::json!({
        "title": { "text": treemap.title },
        "margin": { "t": 50, "l": 25, "r": 25, "b": 25 },
    });

    let script = format!(
        "Plotly.newPlot('treemap', {}, {}, {{\"responsive\": true}});",
        script_json(&data),
        script_json(&layout)
    );

    let page: Markup = html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                title { (treemap.title) }
                script src=(PLOTLY_CDN) charset="utf-8" {}
                style { (PreEscaped("html, body { margin: 0; height: 100%; } #treemap { width: 100%; height: 100%; }")) }
            }
            body {
                div id="treemap" {}
                script { (PreEscaped(script)) }
            }
        }
    };
    page.into_string()
}
