//! # rs-wlparse
//!
//! Rust port of a WarLight website parser - a marker-based HTML scraping
//! library.
//!
//! This library pulls structured records out of warlight.net pages (player
//! profiles, clans, forum threads, ladder rankings and game histories)
//! without an HTML parser: every field is located by a pair of literal
//! markers or a character-class scan, mirroring exactly how the site
//! renders it. Listings that paginate through an `Offset` query parameter
//! are walked by a crawl controller with pluggable stop rules.
//!
//! ## Quick Start
//!
//! ```rust
//! use rs_wlparse::{extract_between, integer_after};
//!
//! let html = r#"<title>Maculus - Play Risk</title><big><b>Level 58</b>"#;
//!
//! let name = extract_between(html, "<title>", " -")?;
//! let level = integer_after(html, "Level ")?;
//! assert_eq!(name, "Maculus");
//! assert_eq!(level, 58);
//! # Ok::<(), rs_wlparse::Error>(())
//! ```
//!
//! ## Features
//!
//! - **Marker Extraction**: Zero-copy windows between literal markers and
//!   maximal character-class runs
//! - **Paginated Crawls**: Offset-stepped listing walks with stop rules for
//!   empty pages, error pages, unranked teams, and time cutoffs
//! - **Entity Pages**: Typed accessors for profiles, clans, forums, and
//!   ladders, fetched lazily and memoized per page
//! - **Pluggable Transport**: Any `PageSource` works; the bundled HTTP
//!   source retries with a configurable policy

mod error;
mod page;

/// Marker-window and alphabet-scan extraction primitives.
pub mod markers;

/// URL construction with deterministic query ordering.
pub mod url_utils;

/// Duration phrases and site date formats.
pub mod temporal;

/// Page transport abstraction and the retrying HTTP source.
pub mod source;

/// Offset-paginated crawl controller and its stop rules.
pub mod crawl;

/// Typed page accessors for players, clans, forums, and ladders.
pub mod entities;

// Public API - re-exports
pub use crawl::{
    ContentExhausted, CrawlConfig, CrawlOutcome, EntityPage, NewerThan, PaginatedCrawler,
    RankedOnly, RankedRecord, StopPredicate, StopSignal, TimedRecord,
};
pub use error::{Error, MarkerSide, Result};
pub use markers::{extract_between, integer_after, letters_after, numeric_after, scan_after};
pub use page::PageRecord;
pub use source::{HttpSource, PageSource, RetryPolicy};
pub use temporal::{parse_date, parse_datetime, parse_duration};
pub use url_utils::page_url;
