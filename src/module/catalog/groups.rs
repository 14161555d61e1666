///! Constellation group filtering
///!
///! Pure post-processing over a fetched catalog: keep entries whose name
///! matches any of the group's name patterns. Order is preserved and
///! duplicates are kept.

use super::types::GpRecord;

/// Name substrings for a logical constellation group.
///
/// An unmapped group falls back to the uppercased group name itself as the
/// sole pattern, so e.g. "TIANQI" still works without an explicit entry.
fn group_patterns(group_upper: &str) -> Vec<String> {
    let patterns: &[&str] = match group_upper {
        "GPS" => &["GPS", "NAVSTAR"],
        "GALILEO" => &["GALILEO"],
        "GLONASS" => &["GLONASS"],
        "BEIDOU" => &["BEIDOU"],
        "STARLINK" => &["STARLINK"],
        "ONEWEB" => &["ONEWEB"],
        "KUIPER" => &["KUIPER", "LEO (KUIPER)"],
        "GUOWANG" => &["GUOWANG"],
        "SWARM" => &["SWARM"],
        "ORBCOMM" => &["ORBCOMM"],
        "SPIRE" => &["SPIRE"],
        "PLANET" => &["PLANET"],
        "JILIN" => &["JILIN"],
        "IRIDIUM" => &["IRIDIUM"],
        other => return vec![other.to_string()],
    };
    patterns.iter().map(|p| p.to_string()).collect()
}

/// Keep catalog entries whose name contains at least one of the group's
/// patterns (case-insensitive).
pub fn filter_by_group(catalog: Vec<GpRecord>, group: &str) -> Vec<GpRecord> {
    let group_upper = group.trim().to_uppercase();
    let patterns = group_patterns(&group_upper);

    catalog
        .into_iter()
        .filter(|record| {
            let name_upper = record.name.to_uppercase();
            patterns.iter().any(|p| name_upper.contains(p))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, norad_id: u32) -> GpRecord {
        GpRecord {
            name: name.to_string(),
            norad_id,
            line1: format!("1 {}U 98067A   24001.0", norad_id),
            line2: format!("2 {}  51.6424", norad_id),
            epoch: None,
        }
    }

    #[test]
    fn test_gps_matches_navstar_alias() {
        let catalog = vec![record("NAVSTAR 81 (USA 319)", 48859), record("IRIDIUM 1", 24792)];
        let filtered = filter_by_group(catalog, "GPS");
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].name, "NAVSTAR 81 (USA 319)");
    }

    #[test]
    fn test_group_lookup_is_case_insensitive() {
        let catalog = vec![record("STARLINK-3001", 49141)];
        assert_eq!(filter_by_group(catalog.clone(), "starlink").len(), 1);
        assert_eq!(filter_by_group(catalog, "Starlink").len(), 1);
    }

    #[test]
    fn test_unmapped_group_uses_raw_name_as_pattern() {
        let catalog = vec![record("TIANQI-19", 55000), record("ISS (ZARYA)", 25544)];
        let filtered = filter_by_group(catalog, "tianqi");
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].norad_id, 55000);
    }

    #[test]
    fn test_order_and_duplicates_preserved() {
        let catalog = vec![
            record("STARLINK-3001", 49141),
            record("ISS (ZARYA)", 25544),
            record("STARLINK-1007", 44713),
            record("STARLINK-3001", 49141),
        ];
        let filtered = filter_by_group(catalog, "STARLINK");
        let ids: Vec<_> = filtered.iter().map(|r| r.norad_id).collect();
        assert_eq!(ids, vec![49141, 44713, 49141]);
    }

    #[test]
    fn test_no_match_yields_empty() {
        let catalog = vec![record("ISS (ZARYA)", 25544)];
        assert!(filter_by_group(catalog, "ONEWEB").is_empty());
    }
}
