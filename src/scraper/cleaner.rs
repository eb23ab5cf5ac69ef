use crate::models::{CompanyRecord, Fundamentals, TickerEntry};

// ── Symbols ───────────────────────────────────────────────────────────────────

pub fn normalise_symbol(s: &str) -> String {
    s.trim().to_uppercase()
}

/// Index pages write class shares with a dot, Yahoo wants a dash.
/// "brk.b" → "BRK-B" | "BF.B" → "BF-B"
pub fn index_symbol_to_yahoo(s: &str) -> String {
    normalise_symbol(s).replace('.', "-")
}

// ── Fundamentals → CompanyRecord ──────────────────────────────────────────────

pub fn market_cap_to_billions(raw: f64) -> f64 {
    raw / 1e9
}

fn non_blank(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

/// Build a record iff the provider gave both a sector and a usable market cap.
/// A zero, negative or non-finite market cap counts as missing.
pub fn fundamentals_to_record(entry: &TickerEntry, f: &Fundamentals) -> Option<CompanyRecord> {
    let sector = non_blank(f.sector.as_deref())?;
    let market_cap = f.market_cap.filter(|m| m.is_finite() && *m > 0.0)?;

    let display_name = non_blank(f.short_name.as_deref()).unwrap_or(entry.symbol.as_str());

    Some(CompanyRecord {
        symbol: entry.symbol.clone(),
        display_name: display_name.to_string(),
        sector: sector.to_string(),
        market_cap_billions: market_cap_to_billions(market_cap),
        region: entry.region,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Region;

    fn fundamentals(sector: Option<&str>, cap: Option<f64>, name: Option<&str>) -> Fundamentals {
        Fundamentals {
            sector: sector.map(String::from),
            market_cap: cap,
            short_name: name.map(String::from),
        }
    }

    #[test]
    fn test_index_symbol_to_yahoo() {
        assert_eq!(index_symbol_to_yahoo(" brk.b "), "BRK-B");
        assert_eq!(index_symbol_to_yahoo("AAPL"), "AAPL");
    }

    #[test]
    fn test_normalise_symbol_keeps_exchange_suffix() {
        assert_eq!(normalise_symbol("asml.as"), "ASML.AS");
    }

    #[test]
    fn test_record_built_when_both_present() {
        let entry = TickerEntry::new("SAP.DE", Region::Europe);
        let rec = fundamentals_to_record(&entry, &fundamentals(Some("Technology"), Some(250e9), Some("SAP SE")))
            .unwrap();

        assert_eq!(rec.display_name, "SAP SE");
        assert_eq!(rec.sector, "Technology");
        assert_eq!(rec.region, Region::Europe);
        assert!((rec.market_cap_billions - 250.0).abs() < 1e-9);
    }

    #[test]
    fn test_record_requires_sector_and_market_cap() {
        let entry = TickerEntry::new("XYZ", Region::Usa);
        assert!(fundamentals_to_record(&entry, &fundamentals(None, Some(1e9), None)).is_none());
        assert!(fundamentals_to_record(&entry, &fundamentals(Some("  "), Some(1e9), None)).is_none());
        assert!(fundamentals_to_record(&entry, &fundamentals(Some("Energy"), None, None)).is_none());
        assert!(fundamentals_to_record(&entry, &fundamentals(Some("Energy"), Some(0.0), None)).is_none());
        assert!(fundamentals_to_record(&entry, &fundamentals(Some("Energy"), Some(f64::NAN), None)).is_none());
    }

    #[test]
    fn test_display_name_falls_back_to_symbol() {
        let entry = TickerEntry::new("XOM", Region::Usa);
        let rec = fundamentals_to_record(&entry, &fundamentals(Some("Energy"), Some(4e11), Some(""))).unwrap();
        assert_eq!(rec.display_name, "XOM");

        let rec = fundamentals_to_record(&entry, &fundamentals(Some("Energy"), Some(4e11), None)).unwrap();
        assert_eq!(rec.display_name, "XOM");
    }
}
