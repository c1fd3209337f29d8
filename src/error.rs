//! Error types for rs-wlparse.
//!
//! This module defines the error types returned by extraction, parsing,
//! and crawling operations.

use std::fmt;

/// Which marker of an extraction window (or scan) was not found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerSide {
    /// The marker expected before the desired value.
    Before,
    /// The marker expected after the desired value.
    After,
    /// The anchor marker of a typed scan.
    Scan,
}

impl fmt::Display for MarkerSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Before => write!(f, "before"),
            Self::After => write!(f, "after"),
            Self::Scan => write!(f, "scan"),
        }
    }
}

/// Error type for extraction and crawl operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A required boundary or scan marker is absent from the source text.
    #[error("missing '{side}' marker {marker:?} in {context:?}")]
    MissingMarker {
        /// Which marker was absent.
        side: MarkerSide,
        /// The literal marker that could not be found.
        marker: String,
        /// A truncated view of the searched text, for diagnosis.
        context: String,
    },

    /// A typed scan found zero matching characters where one was required.
    #[error("no characters in the expected alphabet after marker {marker:?}")]
    EmptyScan {
        /// The anchor marker the scan started from.
        marker: String,
    },

    /// A scanned run could not be parsed as a number.
    #[error("malformed number {value:?}")]
    Number {
        /// The offending run of characters.
        value: String,
    },

    /// A date, datetime, or duration phrase could not be parsed.
    #[error("malformed date or duration {value:?}")]
    Temporal {
        /// The offending string.
        value: String,
    },

    /// A base URL could not be parsed by the query builder.
    #[error("malformed URL {value:?}")]
    Url {
        /// The offending URL string.
        value: String,
    },

    /// Network-level fetch failure, after the retry policy was exhausted.
    #[error("fetching {url} failed after {attempts} attempt(s): {reason}")]
    Transport {
        /// The URL that could not be fetched.
        url: String,
        /// How many attempts were made before giving up.
        attempts: u32,
        /// The underlying transport failure, rendered as text.
        reason: String,
    },
}

/// Result type alias for extraction and crawl operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Truncate source text for inclusion in error messages.
///
/// Full pages run to hundreds of kilobytes; an error only needs enough of
/// the searched text to identify the page.
pub(crate) fn context_snippet(text: &str) -> String {
    const MAX: usize = 120;
    if text.len() <= MAX {
        return text.to_string();
    }
    let mut end = MAX;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &text[..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_side_display() {
        assert_eq!(MarkerSide::Before.to_string(), "before");
        assert_eq!(MarkerSide::After.to_string(), "after");
        assert_eq!(MarkerSide::Scan.to_string(), "scan");
    }

    #[test]
    fn test_context_snippet_truncates_long_text() {
        let long = "x".repeat(500);
        let snippet = context_snippet(&long);
        assert!(snippet.len() < 500);
        assert!(snippet.ends_with("..."));
    }

    #[test]
    fn test_context_snippet_respects_char_boundaries() {
        let long = "é".repeat(200);
        let snippet = context_snippet(&long);
        assert!(snippet.ends_with("..."));
    }

    #[test]
    fn test_missing_marker_message_names_side() {
        let err = Error::MissingMarker {
            side: MarkerSide::After,
            marker: "</td>".to_string(),
            context: "<td>42".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("'after'"));
        assert!(msg.contains("</td>"));
    }
}
