///! TLE text parsers
///!
///! Two scanning modes over the same output type:
///! - two-line: CelesTrak group dumps (`FORMAT=tle`, name line optional)
///! - three-line: Space-Track `format/3le` (strict name/line1/line2 triplets)

use super::types::{GpRecord, NoradId};

/// Name used when a two-line pair has no preceding name line.
const UNKNOWN_NAME: &str = "UNKNOWN";

/// Extract the NORAD catalog number from a TLE line 1.
///
/// The second whitespace token is the catalog number, optionally followed
/// by a classification letter (e.g. `25544U`).
pub fn norad_id_from_line1(line1: &str) -> Option<NoradId> {
    let token = line1.split_whitespace().nth(1)?;
    let digits = token.trim_end_matches(|c: char| c.is_ascii_alphabetic());
    digits.parse().ok()
}

/// Normalize line endings, strip trailing whitespace, drop blank lines.
fn clean_lines(text: &str) -> Vec<&str> {
    text.lines()
        .map(|line| line.trim_end())
        .filter(|line| !line.trim().is_empty())
        .collect()
}

/// Parse two-line element text.
///
/// A record is recognized wherever a `"1 "` line is immediately followed by
/// a `"2 "` line. The line before the pair (if any) is the object name.
/// A `"1 "` line without a `"2 "` successor is noise and skipped.
pub fn parse_two_line(text: &str) -> Vec<GpRecord> {
    let lines = clean_lines(text);
    let mut records = Vec::new();

    let mut i = 0;
    while i < lines.len() {
        let line = lines[i];
        if line.starts_with("1 ") && i + 1 < lines.len() && lines[i + 1].starts_with("2 ") {
            let name = if i > 0 {
                lines[i - 1].trim().to_string()
            } else {
                UNKNOWN_NAME.to_string()
            };
            let line1 = line.trim().to_string();
            let line2 = lines[i + 1].trim().to_string();

            match norad_id_from_line1(&line1) {
                Some(norad_id) => records.push(GpRecord {
                    name,
                    norad_id,
                    line1,
                    line2,
                    epoch: None,
                }),
                None => {
                    tracing::warn!("Dropping TLE with unparseable catalog number: {}", line1);
                }
            }
            i += 2;
        } else {
            i += 1;
        }
    }

    records
}

/// Parse three-line element text (name, line1, line2 triplets).
///
/// A triplet whose line1/line2 prefixes are wrong is rejected and the scan
/// resumes one line ahead, so a single stray line re-syncs instead of
/// shifting every following triplet. A prefix-valid triplet whose catalog
/// number cannot be parsed is dropped and the scan advances the full
/// triplet stride.
pub fn parse_three_line(text: &str) -> Vec<GpRecord> {
    let lines = clean_lines(text);
    let mut records = Vec::new();

    let mut i = 0;
    while i < lines.len() {
        if i + 2 >= lines.len() {
            break;
        }
        let name = lines[i].trim();
        let line1 = lines[i + 1].trim();
        let line2 = lines[i + 2].trim();

        if !line1.starts_with("1 ") || !line2.starts_with("2 ") {
            i += 1;
            continue;
        }

        match norad_id_from_line1(line1) {
            Some(norad_id) => {
                records.push(GpRecord {
                    name: name.to_string(),
                    norad_id,
                    line1: line1.to_string(),
                    line2: line2.to_string(),
                    epoch: None,
                });
            }
            None => {
                tracing::warn!("Dropping 3LE record with unparseable catalog number: {}", line1);
            }
        }
        i += 3;
    }

    records
}

#[cfg(test)]
mod tests {
    use super::*;

    const ISS_3LE: &str = "ISS (ZARYA)\n\
        1 25544U 98067A   24001.00000000  .00016717  00000+0  10270-3 0  9009\n\
        2 25544  51.6424  22.2174 0005660 262.2182  97.7706 15.49717953    08\n";

    #[test]
    fn test_norad_id_extraction() {
        assert_eq!(norad_id_from_line1("1 25544U 98067A   24001.0"), Some(25544));
        assert_eq!(norad_id_from_line1("1 48859 21054A    24001.0"), Some(48859));
        assert_eq!(norad_id_from_line1("1 XYZ 98067A"), None);
        assert_eq!(norad_id_from_line1("1"), None);
    }

    #[test]
    fn test_two_line_with_name() {
        let records = parse_two_line(ISS_3LE);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "ISS (ZARYA)");
        assert_eq!(records[0].norad_id, 25544);
        assert!(records[0].line2.starts_with("2 25544"));
        assert_eq!(records[0].epoch, None);
    }

    #[test]
    fn test_two_line_without_name() {
        let text = "1 25544U 98067A   24001.00000000  .00016717  00000+0  10270-3 0  9009\n\
                    2 25544  51.6424  22.2174 0005660 262.2182  97.7706 15.49717953    08\n";
        let records = parse_two_line(text);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "UNKNOWN");
    }

    #[test]
    fn test_two_line_orphan_line1_is_noise() {
        let text = "1 11111U 98067A   24001.0\n\
                    SOME COMMENT\n\
                    ISS (ZARYA)\n\
                    1 25544U 98067A   24001.0\n\
                    2 25544  51.6424\n";
        let records = parse_two_line(text);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].norad_id, 25544);
    }

    #[test]
    fn test_two_line_crlf_and_blank_lines() {
        let text = "ISS (ZARYA)\r\n1 25544U 98067A   24001.0\r\n\r\n2 25544  51.6424\r\n";
        let records = parse_two_line(text);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].norad_id, 25544);
    }

    #[test]
    fn test_three_line_basic() {
        let records = parse_three_line(ISS_3LE);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "ISS (ZARYA)");
        assert_eq!(records[0].norad_id, 25544);
    }

    #[test]
    fn test_three_line_corrupt_triplet_does_not_lose_neighbors() {
        // Middle triplet's line2 lost its prefix; the ones around it survive.
        let text = "SAT A\n\
                    1 10001U 98067A   24001.0\n\
                    2 10001  51.0\n\
                    SAT B\n\
                    1 10002U 98067A   24001.0\n\
                    X 10002  51.0\n\
                    SAT C\n\
                    1 10003U 98067A   24001.0\n\
                    2 10003  51.0\n";
        let records = parse_three_line(text);
        let ids: Vec<_> = records.iter().map(|r| r.norad_id).collect();
        assert!(ids.contains(&10001));
        assert!(ids.contains(&10003));
        assert!(!ids.contains(&10002));
    }

    #[test]
    fn test_three_line_bad_norad_advances_full_stride() {
        let text = "SAT A\n\
                    1 BADID 98067A   24001.0\n\
                    2 BADID  51.0\n\
                    SAT B\n\
                    1 10002U 98067A   24001.0\n\
                    2 10002  51.0\n";
        let records = parse_three_line(text);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].norad_id, 10002);
    }

    #[test]
    fn test_empty_and_garbage_input() {
        assert!(parse_two_line("").is_empty());
        assert!(parse_three_line("").is_empty());
        assert!(parse_two_line("hello\nworld\n").is_empty());
        assert!(parse_three_line("hello\nworld\n").is_empty());
    }
}
