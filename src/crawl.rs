//! Paginated crawl control.
//!
//! A logical result set (forum thread, ladder ranking, game history) is
//! spread over fixed-size pages addressed by an integer offset. The
//! crawler walks those pages in order, extracts each page's records, and
//! decides after every page whether to continue, using an interchangeable
//! stop predicate. The walk is strictly sequential: a page is fetched and
//! fully evaluated before the next offset is requested.
//!
//! Per-page capabilities are a trait seam ([`EntityPage`]) implemented
//! independently by each entity module; there is no parser class
//! hierarchy. A predicate or extraction failure on any page aborts the
//! whole crawl; silently skipping a page would break the guarantee that
//! accumulated order equals fetch order.

use chrono::NaiveDateTime;
use tracing::debug;

use crate::error::Result;

/// Why a crawl step did, or did not, terminate the crawl.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopSignal {
    /// Keep crawling; the current page's records are appended.
    Continue,
    /// The page reported no records; it is discarded and the crawl ends.
    PageEmpty,
    /// The page matched a known error-page signature; it is discarded.
    ErrorPage,
    /// An entity-specific predicate fired (e.g. an unranked entry was
    /// observed); the triggering page's records are still appended.
    PredicateStop,
    /// A record at or before the configured cutoff was observed; the
    /// terminal page is filtered to records newer than the cutoff.
    CutoffReached,
}

/// Offset bookkeeping for one crawl invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrawlConfig {
    /// Offset of the first page requested.
    pub starting_offset: u32,
    /// Fixed page-size increment applied after every non-terminal step.
    pub page_increment: u32,
}

impl CrawlConfig {
    /// Config starting at `starting_offset`, stepping by `page_increment`.
    #[must_use]
    pub fn new(starting_offset: u32, page_increment: u32) -> Self {
        Self {
            starting_offset,
            page_increment,
        }
    }
}

/// Result of a finished crawl.
#[derive(Debug, Clone, PartialEq)]
pub struct CrawlOutcome<R> {
    /// Accumulated records, in fetch order; within a page, document order.
    pub records: Vec<R>,
    /// Why the crawl stopped.
    pub termination: StopSignal,
    /// How many pages were fetched, including the terminal one.
    pub pages_fetched: u32,
}

/// Capability set one page of a paginated entity exposes to the crawler.
pub trait EntityPage {
    /// The record type extracted from each page.
    type Record;

    /// Whether the page carries at least one record.
    fn has_records(&self) -> Result<bool>;

    /// Whether the page matches a known error-page signature, distinct
    /// from "no data". Only forum pages can surface one.
    fn is_error_page(&self) -> Result<bool> {
        Ok(false)
    }

    /// Extracts the page's records in document order.
    fn records(&self) -> Result<Vec<Self::Record>>;
}

/// Record that carries a ladder rank, with `0` as the unranked sentinel.
pub trait RankedRecord {
    /// The record's rank; `0` means unranked.
    fn rank(&self) -> u32;
}

/// Record that carries a site-local timestamp.
pub trait TimedRecord {
    /// When the record was posted or played.
    fn recorded_at(&self) -> NaiveDateTime;
}

/// Decides after each page whether the crawl continues, and adjusts the
/// result set when it stops.
///
/// The three phases mirror the crawl step: `before_extract` can discard a
/// page outright (error page, content exhaustion), `after_extract` sees
/// the freshly extracted records and may trim the terminal page,
/// `finish` applies any post-hoc filter over the whole accumulated
/// sequence.
pub trait StopPredicate<P: EntityPage> {
    /// Evaluated on the fetched page before extraction. Anything other
    /// than [`StopSignal::Continue`] discards the page and terminates.
    fn before_extract(&mut self, page: &P) -> Result<StopSignal> {
        if page.is_error_page()? {
            return Ok(StopSignal::ErrorPage);
        }
        if !page.has_records()? {
            return Ok(StopSignal::PageEmpty);
        }
        Ok(StopSignal::Continue)
    }

    /// Evaluated on the extracted records of the current page, which are
    /// appended regardless of the returned signal and may be trimmed in
    /// place first.
    fn after_extract(&mut self, page_records: &mut Vec<P::Record>) -> StopSignal {
        let _ = page_records;
        StopSignal::Continue
    }

    /// Applied once to the full accumulated result after termination.
    fn finish(&mut self, accumulated: &mut Vec<P::Record>) {
        let _ = accumulated;
    }
}

/// Stop when a page reports zero records or an error-page signature.
///
/// Used for forum threads, subforum listings, ladder rankings, and ladder
/// game history; the default `before_extract` is exactly this policy.
#[derive(Debug, Default, Clone, Copy)]
pub struct ContentExhausted;

impl<P: EntityPage> StopPredicate<P> for ContentExhausted {}

/// Stop as soon as a page contains an unranked entry, then drop every
/// unranked entry from the whole result.
///
/// The triggering page's already-extracted records are appended first;
/// the unranked filter is post-hoc, not a per-page skip.
#[derive(Debug, Default, Clone, Copy)]
pub struct RankedOnly;

impl<P> StopPredicate<P> for RankedOnly
where
    P: EntityPage,
    P::Record: RankedRecord,
{
    fn after_extract(&mut self, page_records: &mut Vec<P::Record>) -> StopSignal {
        if page_records.iter().any(|r| r.rank() == 0) {
            StopSignal::PredicateStop
        } else {
            StopSignal::Continue
        }
    }

    fn finish(&mut self, accumulated: &mut Vec<P::Record>) {
        accumulated.retain(|r| r.rank() != 0);
    }
}

/// Stop once a page's oldest record is at or before the cutoff, keeping
/// only the terminal page's records strictly newer than the cutoff.
///
/// The crawl walks from newest to oldest, so earlier pages are kept whole.
/// With no cutoff configured this behaves like [`ContentExhausted`].
#[derive(Debug, Default, Clone, Copy)]
pub struct NewerThan {
    /// Records at or before this instant end the crawl.
    pub cutoff: Option<NaiveDateTime>,
}

impl NewerThan {
    /// Predicate with the given cutoff; `None` disables the cutoff.
    #[must_use]
    pub fn new(cutoff: Option<NaiveDateTime>) -> Self {
        Self { cutoff }
    }
}

impl<P> StopPredicate<P> for NewerThan
where
    P: EntityPage,
    P::Record: TimedRecord,
{
    fn after_extract(&mut self, page_records: &mut Vec<P::Record>) -> StopSignal {
        let Some(cutoff) = self.cutoff else {
            return StopSignal::Continue;
        };
        let Some(oldest) = page_records.last() else {
            return StopSignal::Continue;
        };
        if oldest.recorded_at() <= cutoff {
            page_records.retain(|r| r.recorded_at() > cutoff);
            StopSignal::CutoffReached
        } else {
            StopSignal::Continue
        }
    }
}

/// Drives a sequence of entity pages through a stop predicate.
///
/// `make_page` maps an offset to a page value; the page's text is only
/// fetched when the predicate or extraction first needs it.
pub struct PaginatedCrawler<P, F> {
    config: CrawlConfig,
    make_page: F,
    _page: std::marker::PhantomData<P>,
}

impl<P, F> PaginatedCrawler<P, F>
where
    P: EntityPage,
    F: FnMut(u32) -> Result<P>,
{
    /// Creates a crawler over pages produced by `make_page`.
    pub fn new(config: CrawlConfig, make_page: F) -> Self {
        Self {
            config,
            make_page,
            _page: std::marker::PhantomData,
        }
    }

    /// Runs the crawl to termination under the given stop predicate.
    pub fn run<S: StopPredicate<P>>(mut self, mut predicate: S) -> Result<CrawlOutcome<P::Record>> {
        let mut offset = self.config.starting_offset;
        let mut accumulated: Vec<P::Record> = Vec::new();
        let mut pages_fetched: u32 = 0;

        let termination = loop {
            let page = (self.make_page)(offset)?;
            pages_fetched += 1;

            let signal = predicate.before_extract(&page)?;
            if signal != StopSignal::Continue {
                debug!(offset, ?signal, "crawl terminated before extraction");
                break signal;
            }

            let mut page_records = page.records()?;
            let signal = predicate.after_extract(&mut page_records);
            debug!(
                offset,
                records = page_records.len(),
                ?signal,
                "crawl step evaluated"
            );
            accumulated.extend(page_records);
            if signal != StopSignal::Continue {
                break signal;
            }
            offset += self.config.page_increment;
        };

        predicate.finish(&mut accumulated);
        Ok(CrawlOutcome {
            records: accumulated,
            termination,
            pages_fetched,
        })
    }
}
