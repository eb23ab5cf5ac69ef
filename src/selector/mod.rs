//! Top-N selection: the largest companies per sector within one region.

use crate::models::{CompanyRecord, Region};
use std::collections::BTreeMap;

pub const TOP_N: usize = 5;

/// Keep the `n` largest records by market cap in every sector of `region`.
///
/// Sectors come out in lexicographic order, companies by descending market cap.
/// Equal market caps keep their input order, so the selection is stable and
/// running it again on its own output changes nothing.
pub fn select_top_n(records: &[CompanyRecord], region: Region, n: usize) -> Vec<CompanyRecord> {
    let mut by_sector: BTreeMap<&str, Vec<&CompanyRecord>> = BTreeMap::new();

    for rec in records.iter().filter(|r| r.region == region) {
        by_sector.entry(rec.sector.as_str()).or_default().push(rec);
    }

    by_sector
        .into_values()
        .flat_map(|mut group| {
            group.sort_by(|a, b| b.market_cap_billions.total_cmp(&a.market_cap_billions));
            group.truncate(n);
            group
        })
        .cloned()
        .collect()
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

    fn symbols(records: &[CompanyRecord]) -> Vec<&str> {
        records.iter().map(|r| r.symbol.as_str()).collect()
    }

    #[test]
    fn test_smallest_dropped_from_six() {
        let records = vec![
            rec("C", "Tech", 100.0, Region::Usa),
            rec("F", "Tech", 5.0, Region::Usa),
            rec("A", "Tech", 500.0, Region::Usa),
            rec("E", "Tech", 10.0, Region::Usa),
            rec("B", "Tech", 300.0, Region::Usa),
            rec("D", "Tech", 50.0, Region::Usa),
        ];

        let top = select_top_n(&records, Region::Usa, TOP_N);
        assert_eq!(symbols(&top), vec!["A", "B", "C", "D", "E"]);
    }

    #[test]
    fn test_small_groups_kept_whole() {
        let records = vec![
            rec("XOM", "Energy", 400.0, Region::Usa),
            rec("CVX", "Energy", 280.0, Region::Usa),
            rec("JPM", "Financial Services", 600.0, Region::Usa),
        ];

        let top = select_top_n(&records, Region::Usa, TOP_N);
        assert_eq!(symbols(&top), vec!["XOM", "CVX", "JPM"]);
    }

    #[test]
    fn test_regions_never_mix() {
        let mut records: Vec<CompanyRecord> = (0..5)
            .map(|i| rec(&format!("EU{i}"), "Tech", 1000.0 + i as f64, Region::Europe))
            .collect();
        records.push(rec("US0", "Tech", 1.0, Region::Usa));

        let usa = select_top_n(&records, Region::Usa, TOP_N);
        assert_eq!(symbols(&usa), vec!["US0"]);

        let europe = select_top_n(&records, Region::Europe, TOP_N);
        assert_eq!(europe.len(), 5);
        assert!(europe.iter().all(|r| r.region == Region::Europe));
    }

    #[test]
    fn test_sector_names_are_exact_keys() {
        let records = vec![
            rec("A", "Technology", 10.0, Region::Usa),
            rec("B", "technology", 20.0, Region::Usa),
        ];
        let top = select_top_n(&records, Region::Usa, 1);
        assert_eq!(top.len(), 2);
    }

    #[test]
    fn test_at_most_n_per_sector_and_largest_kept() {
        let mut records = Vec::new();
        for (s, sector) in ["Energy", "Healthcare", "Utilities"].iter().enumerate() {
            for i in 0..(3 + 2 * s) {
                records.push(rec(&format!("{sector}{i}"), sector, (i * 7 % 11) as f64 + 0.5, Region::Usa));
            }
        }

        let top = select_top_n(&records, Region::Usa, TOP_N);
        for sector in ["Energy", "Healthcare", "Utilities"] {
            let picked: Vec<f64> = top
                .iter()
                .filter(|r| r.sector == sector)
                .map(|r| r.market_cap_billions)
                .collect();
            let mut all: Vec<f64> = records
                .iter()
                .filter(|r| r.sector == sector)
                .map(|r| r.market_cap_billions)
                .collect();
            all.sort_by(|a, b| b.total_cmp(a));
            all.truncate(TOP_N);

            assert!(picked.len() <= TOP_N);
            assert_eq!(picked, all);
        }
    }

    #[test]
    fn test_ties_keep_input_order() {
        let records = vec![
            rec("A", "Tech", 10.0, Region::Usa),
            rec("B", "Tech", 10.0, Region::Usa),
            rec("C", "Tech", 10.0, Region::Usa),
        ];
        let top = select_top_n(&records, Region::Usa, 2);
        assert_eq!(symbols(&top), vec!["A", "B"]);
    }

    #[test]
    fn test_idempotent() {
        let records = vec![
            rec("A", "Tech", 5.0, Region::Usa),
            rec("B", "Energy", 3.0, Region::Usa),
            rec("C", "Tech", 9.0, Region::Usa),
            rec("D", "Tech", 9.0, Region::Usa),
            rec("E", "Energy", 7.0, Region::Usa),
        ];
        let once = select_top_n(&records, Region::Usa, 2);
        let twice = select_top_n(&once, Region::Usa, 2);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_empty_region() {
        let records = vec![rec("A", "Tech", 5.0, Region::Usa)];
        assert!(select_top_n(&records, Region::Europe, TOP_N).is_empty());
    }
}
