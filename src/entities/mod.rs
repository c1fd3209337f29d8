//! Entity assemblers: per-entity marker vocabularies and crawl drivers.
//!
//! Each submodule pairs one page family of the scraped site with the
//! marker strings that locate its fields, and exposes typed accessors plus
//! (where the entity is paginated) a crawl entry point. The markers are
//! the fragile part of the crate; they encode the site's rendered HTML
//! verbatim and live here, away from the extraction primitives.

pub mod clan;
pub mod forum;
pub mod ladder;
pub mod player;

use crate::error::{Error, Result};
use crate::markers::integer_after;

/// Scans a non-negative ID following a marker.
///
/// Site IDs are rendered as plain digit runs; a negative or oversized run
/// is a schema mismatch, surfaced as [`Error::Number`].
pub(crate) fn id_after(text: &str, marker: &str) -> Result<u32> {
    let value = integer_after(text, marker)?;
    u32::try_from(value).map_err(|_| Error::Number {
        value: value.to_string(),
    })
}
