//! One logical page, fetched on demand and at most once.

use std::cell::{Cell, OnceCell};

use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::source::PageSource;

/// Wraps one URL and memoizes its fetched text.
///
/// The body is fetched through the [`PageSource`] on the first [`data`]
/// call and reused for every extraction against the page thereafter; once
/// fetched it is immutable. Nothing fetches implicitly: only `data`
/// triggers the request.
///
/// [`data`]: PageRecord::data
pub struct PageRecord<'a> {
    url: String,
    source: &'a dyn PageSource,
    text: OnceCell<String>,
    fetched_at: Cell<Option<DateTime<Utc>>>,
}

impl<'a> PageRecord<'a> {
    /// Creates a record for `url`; no fetch happens yet.
    pub fn new(source: &'a dyn PageSource, url: String) -> Self {
        Self {
            url,
            source,
            text: OnceCell::new(),
            fetched_at: Cell::new(None),
        }
    }

    /// The URL this record wraps.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// When the page was fetched, or `None` before the first `data` call.
    #[must_use]
    pub fn fetched_at(&self) -> Option<DateTime<Utc>> {
        self.fetched_at.get()
    }

    /// The page text, fetching it on first access.
    ///
    /// A transport failure leaves the record unfetched; a later call will
    /// try again.
    pub fn data(&self) -> Result<&str> {
        if let Some(text) = self.text.get() {
            return Ok(text);
        }
        let body = self.source.fetch(&self.url)?;
        self.fetched_at.set(Some(Utc::now()));
        Ok(self.text.get_or_init(|| body))
    }
}
