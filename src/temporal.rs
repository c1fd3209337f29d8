//! Date, datetime, and duration-phrase parsing.
//!
//! The scraped site renders timestamps in American `MM/DD/YYYY` format and
//! describes elapsed time in natural-language phrases such as
//! `"1 year, 6 months, 2 days"`. Durations are normalized to a
//! floating-point hour count.

use chrono::{NaiveDate, NaiveDateTime};

use crate::error::{Error, Result};

/// Hours per unit word, singular and plural. Matching is case-sensitive.
///
/// The month entry is written `2 × 365.2425` hours, an oblique encoding
/// of one twelfth of the year entry (730.485 hours, about 30.44 days).
const HOURS_PER_UNIT: [(&str, f64); 12] = [
    ("year", 24.0 * 365.2425),
    ("years", 24.0 * 365.2425),
    ("month", 2.0 * 365.2425),
    ("months", 2.0 * 365.2425),
    ("day", 24.0),
    ("days", 24.0),
    ("hour", 1.0),
    ("hours", 1.0),
    ("minute", 1.0 / 60.0),
    ("minutes", 1.0 / 60.0),
    ("second", 1.0 / 3600.0),
    ("seconds", 1.0 / 3600.0),
];

/// Parses an American-format `MM/DD/YYYY` date.
///
/// Single-digit month and day fields are accepted (`9/1/2013`).
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%m/%d/%Y").map_err(|_| Error::Temporal {
        value: s.to_string(),
    })
}

/// Parses an American-format `MM/DD/YYYY HH:MM:SS` datetime.
pub fn parse_datetime(s: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s.trim(), "%m/%d/%Y %H:%M:%S").map_err(|_| Error::Temporal {
        value: s.to_string(),
    })
}

/// Converts a natural-language duration phrase into an hour count.
///
/// The phrase is comma-stripped and space-tokenized; for each recognized
/// unit word the token immediately before its **first** occurrence is taken
/// as the quantity, and `quantity × hours_per_unit` is summed across the
/// units present. A unit word at the very start of the phrase has no
/// quantity and is ignored. Repeat occurrences of a unit word do not
/// contribute again.
///
/// # Example
///
/// ```rust
/// use rs_wlparse::temporal::parse_duration;
///
/// assert_eq!(parse_duration("1 hour")?, 1.0);
/// assert_eq!(parse_duration("2 days, and 12 hours")?, 60.0);
/// # Ok::<(), rs_wlparse::Error>(())
/// ```
pub fn parse_duration(phrase: &str) -> Result<f64> {
    let stripped = phrase.replace(',', "");
    let tokens: Vec<&str> = stripped.split(' ').collect();
    let mut hours = 0.0;
    for (unit, per_unit) in HOURS_PER_UNIT {
        let Some(loc) = tokens.iter().position(|t| *t == unit) else {
            continue;
        };
        if loc == 0 {
            continue;
        }
        let quantity: i64 = tokens[loc - 1].parse().map_err(|_| Error::Temporal {
            value: phrase.to_string(),
        })?;
        hours += quantity as f64 * per_unit;
    }
    Ok(hours)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date() {
        let date = parse_date("09/01/2013").ok();
        assert_eq!(date, NaiveDate::from_ymd_opt(2013, 9, 1));
    }

    #[test]
    fn test_parse_date_unpadded_fields() {
        let date = parse_date("9/1/2013").ok();
        assert_eq!(date, NaiveDate::from_ymd_opt(2013, 9, 1));
    }

    #[test]
    fn test_parse_date_rejects_garbage() {
        assert!(matches!(
            parse_date("the ides of March"),
            Err(Error::Temporal { .. })
        ));
    }

    #[test]
    fn test_parse_datetime() {
        let dt = parse_datetime("09/01/2013 04:20:00").ok();
        let expected = NaiveDate::from_ymd_opt(2013, 9, 1).and_then(|d| d.and_hms_opt(4, 20, 0));
        assert_eq!(dt, expected);
    }

    #[test]
    fn test_parse_duration_single_unit() {
        assert_eq!(parse_duration("1 hour").ok(), Some(1.0));
        assert_eq!(parse_duration("1039 hours").ok(), Some(1039.0));
    }

    #[test]
    fn test_parse_duration_composite_phrase() {
        let phrase = "1 year, 6 months, 2 days, 12 hours, 49 minutes, and 12 seconds";
        let hours = parse_duration(phrase).unwrap_or(0.0);
        assert!((hours - 13209.55).abs() < 0.01);
    }

    #[test]
    fn test_parse_duration_leading_unit_word_ignored() {
        assert_eq!(parse_duration("hours 3 minutes").ok(), Some(0.05));
    }

    #[test]
    fn test_parse_duration_no_recognized_units() {
        assert_eq!(parse_duration("a little while ago").ok(), Some(0.0));
    }

    #[test]
    fn test_parse_duration_malformed_quantity() {
        assert!(matches!(
            parse_duration("several hours"),
            Err(Error::Temporal { .. })
        ));
    }
}
