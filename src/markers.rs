//! Marker-based extraction primitives.
//!
//! Every field this crate pulls out of a page is located the same way: by
//! literal marker strings that bracket the value, or by an anchor marker
//! followed by a maximal run of characters from a fixed alphabet. This
//! module provides those two primitives; the entity modules supply the
//! marker vocabularies.
//!
//! Marker searches use leftmost-occurrence semantics. If two plausible
//! occurrences exist, the leftmost wins, so callers must pick markers
//! specific enough that the leftmost occurrence is the desired one.

use crate::error::{context_snippet, Error, MarkerSide, Result};

/// Alphabet for numeric scans: digits plus decimal point and sign.
pub const NUMERIC_CHARS: &str = "0123456789.+-";

/// Alphabet for integer scans: digits plus sign.
pub const INTEGER_CHARS: &str = "0123456789+-";

/// Alphabet for letter scans: ASCII letters, both cases.
pub const LETTER_CHARS: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Extracts the substring strictly between two literal markers.
///
/// The window starts immediately after the leftmost occurrence of `before`
/// and ends immediately before the leftmost occurrence of `after` within
/// the remaining text. An empty `before` means "start of text"; an empty
/// `after` means "end of text".
///
/// Fails with [`Error::MissingMarker`] naming whichever marker is absent.
/// There is no partial or best-effort result: a page missing an expected
/// marker signals a schema mismatch the caller must decide how to handle.
///
/// # Example
///
/// ```rust
/// use rs_wlparse::markers::extract_between;
///
/// let window = extract_between("<td>1507</td>", "<td>", "</td>")?;
/// assert_eq!(window, "1507");
/// # Ok::<(), rs_wlparse::Error>(())
/// ```
pub fn extract_between<'t>(text: &'t str, before: &str, after: &str) -> Result<&'t str> {
    let start = match text.find(before) {
        Some(loc) => loc + before.len(),
        None => {
            return Err(Error::MissingMarker {
                side: MarkerSide::Before,
                marker: before.to_string(),
                context: context_snippet(text),
            })
        }
    };
    let rest = &text[start..];
    if after.is_empty() {
        return Ok(rest);
    }
    match rest.find(after) {
        Some(end) => Ok(&rest[..end]),
        None => Err(Error::MissingMarker {
            side: MarkerSide::After,
            marker: after.to_string(),
            context: context_snippet(text),
        }),
    }
}

/// Scans the maximal run of `alphabet` characters following a marker.
///
/// Starting immediately after the leftmost occurrence of `marker`,
/// accumulates characters while each belongs to `alphabet`, stopping at the
/// first character outside it or at end of text.
///
/// Fails with [`Error::MissingMarker`] if `marker` is absent. If the run is
/// empty, fails with [`Error::EmptyScan`] when `must_match` is true and
/// returns `""` when it is false.
pub fn scan_after<'t>(
    text: &'t str,
    marker: &str,
    alphabet: &str,
    must_match: bool,
) -> Result<&'t str> {
    let start = match text.find(marker) {
        Some(loc) => loc + marker.len(),
        None => {
            return Err(Error::MissingMarker {
                side: MarkerSide::Scan,
                marker: marker.to_string(),
                context: context_snippet(text),
            })
        }
    };
    let rest = &text[start..];
    let end = rest
        .char_indices()
        .find(|(_, c)| !alphabet.contains(*c))
        .map_or(rest.len(), |(i, _)| i);
    if end == 0 && must_match {
        return Err(Error::EmptyScan {
            marker: marker.to_string(),
        });
    }
    Ok(&rest[..end])
}

/// Scans and parses a floating-point value following a marker.
///
/// The scanned alphabet is [`NUMERIC_CHARS`]; runs like `"23.90"` or
/// `"-7"` parse, while degenerate runs like `"+-"` surface as
/// [`Error::Number`].
pub fn numeric_after(text: &str, marker: &str) -> Result<f64> {
    let run = scan_after(text, marker, NUMERIC_CHARS, true)?;
    run.parse().map_err(|_| Error::Number {
        value: run.to_string(),
    })
}

/// Scans and parses an integer value following a marker.
///
/// The scanned alphabet is [`INTEGER_CHARS`], so a decimal point terminates
/// the run: `"23.90"` after the marker parses as `23`.
pub fn integer_after(text: &str, marker: &str) -> Result<i64> {
    let run = scan_after(text, marker, INTEGER_CHARS, true)?;
    run.parse().map_err(|_| Error::Number {
        value: run.to_string(),
    })
}

/// Scans the run of ASCII letters following a marker.
pub fn letters_after<'t>(text: &'t str, marker: &str) -> Result<&'t str> {
    scan_after(text, marker, LETTER_CHARS, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MarkerSide;

    #[test]
    fn test_extract_between_leftmost_occurrences() {
        assert_eq!(extract_between("abacus", "a", "a").ok(), Some("b"));
        assert_eq!(extract_between("abacus", "a", "cus").ok(), Some("ba"));
        assert_eq!(extract_between("abacus", "", "cus").ok(), Some("aba"));
        assert_eq!(extract_between("abacus", "", "").ok(), Some("abacus"));
    }

    #[test]
    fn test_extract_between_missing_before_marker() {
        let err = extract_between("abacus", "z", "a");
        assert!(matches!(
            err,
            Err(Error::MissingMarker {
                side: MarkerSide::Before,
                ..
            })
        ));
    }

    #[test]
    fn test_extract_between_missing_after_marker() {
        let err = extract_between("abacus", "a", "z");
        assert!(matches!(
            err,
            Err(Error::MissingMarker {
                side: MarkerSide::After,
                ..
            })
        ));
    }

    #[test]
    fn test_extract_between_after_searched_in_remaining_text() {
        // The after-marker occurs before the before-marker too; only the
        // occurrence within the remaining text counts.
        assert_eq!(extract_between("xyx", "y", "x").ok(), Some(""));
    }

    #[test]
    fn test_scan_after_maximal_run() {
        assert_eq!(scan_after("abc123", "c", "bc12", true).ok(), Some("12"));
        assert_eq!(scan_after("abc123", "a", "bc12", true).ok(), Some("bc12"));
        assert_eq!(scan_after("abc123", "c", "123", true).ok(), Some("123"));
    }

    #[test]
    fn test_scan_after_empty_run() {
        assert_eq!(scan_after("abc123", "c", "c", false).ok(), Some(""));
        assert!(matches!(
            scan_after("abc123", "c", "c", true),
            Err(Error::EmptyScan { .. })
        ));
    }

    #[test]
    fn test_scan_after_missing_marker() {
        assert!(matches!(
            scan_after("abc123", "z", "123", true),
            Err(Error::MissingMarker {
                side: MarkerSide::Scan,
                ..
            })
        ));
    }

    #[test]
    fn test_numeric_after() {
        let text = "aksjdflakvlkajsdlfj2390vkj;sadfkj;vaglskdfj";
        assert_eq!(numeric_after(text, "sdlfj").ok(), Some(2390.0));
        let text = "aksjdflakvlkajsdlfj23.90vkj;sadfkj;vaglskdfj";
        assert_eq!(numeric_after(text, "sdlfj").ok(), Some(23.90));
    }

    #[test]
    fn test_integer_after_stops_at_decimal_point() {
        let text = "aksjdflakvlkajsdlfj2390vkj";
        assert_eq!(integer_after(text, "sdlfj").ok(), Some(2390));
        let text = "aksjdflakvlkajsdlfj23.90vkj";
        assert_eq!(integer_after(text, "sdlfj").ok(), Some(23));
    }

    #[test]
    fn test_numeric_after_rejects_sign_only_run() {
        assert!(matches!(
            numeric_after("x+-y", "x"),
            Err(Error::Number { .. })
        ));
    }

    #[test]
    fn test_letters_after() {
        let text = "lskajs aslfdlkjfdslsflkjdfl salka;ldfkflfkf";
        assert_eq!(letters_after(text, "jdfl ").ok(), Some("salka"));
        assert_eq!(letters_after(text, "ldfk").ok(), Some("flfkf"));
    }
}
