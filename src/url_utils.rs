//! Deterministic query-string construction.
//!
//! Page URLs are a base plus an ordered list of query parameters. The
//! parameter order is part of the function's contract so that URL
//! construction is reproducible in tests; callers pass an explicit slice
//! rather than a map.

use url::Url;

use crate::error::{Error, Result};

/// Builds a page URL from a base and an ordered list of query parameters.
///
/// Parameters are appended in slice order. Values are percent-encoded by
/// the `url` crate as needed.
///
/// # Example
///
/// ```rust
/// use rs_wlparse::url_utils::page_url;
///
/// let url = page_url("https://www.warlight.net/LadderTeams", &[
///     ("ID", "4001".to_string()),
///     ("Offset", "50".to_string()),
/// ])?;
/// assert_eq!(url, "https://www.warlight.net/LadderTeams?ID=4001&Offset=50");
/// # Ok::<(), rs_wlparse::Error>(())
/// ```
pub fn page_url(base: &str, params: &[(&str, String)]) -> Result<String> {
    let mut url = Url::parse(base).map_err(|_| Error::Url {
        value: base.to_string(),
    })?;
    if !params.is_empty() {
        let mut pairs = url.query_pairs_mut();
        for (key, value) in params {
            pairs.append_pair(key, value);
        }
        drop(pairs);
    }
    Ok(url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_url_no_params() {
        let url = page_url("https://www.warlight.net/Clans/List", &[]).ok();
        assert_eq!(url.as_deref(), Some("https://www.warlight.net/Clans/List"));
    }

    #[test]
    fn test_page_url_preserves_parameter_order() {
        let url = page_url(
            "https://www.warlight.net/LadderGames",
            &[
                ("ID", "4001".to_string()),
                ("LadderTeamID", "12".to_string()),
                ("Offset", "100".to_string()),
            ],
        )
        .ok();
        assert_eq!(
            url.as_deref(),
            Some("https://www.warlight.net/LadderGames?ID=4001&LadderTeamID=12&Offset=100")
        );
    }

    #[test]
    fn test_page_url_encodes_values() {
        let url = page_url(
            "https://www.warlight.net/Forum/Off-topic",
            &[("q", "a b".to_string())],
        )
        .ok();
        assert_eq!(
            url.as_deref(),
            Some("https://www.warlight.net/Forum/Off-topic?q=a+b")
        );
    }

    #[test]
    fn test_page_url_rejects_malformed_base() {
        assert!(matches!(
            page_url("not a url", &[]),
            Err(Error::Url { .. })
        ));
    }
}
