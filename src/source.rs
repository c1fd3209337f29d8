//! Page fetching.
//!
//! The crawl model is fully sequential: one page is fetched and fully
//! evaluated before the next is requested, so the blocking reqwest client
//! is the right shape. Transport behavior under failure is governed by an
//! explicit [`RetryPolicy`] value rather than a hard-coded loop, making
//! retry-forever an opt-in configuration instead of a default.

use std::num::NonZeroU32;
use std::thread;
use std::time::Duration;

use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Abstract source of raw page text.
///
/// Implemented by [`HttpSource`] for real traffic and by in-memory fakes in
/// tests. The contract is `fetch(url) -> text`; anything beyond that (retry
/// behavior, timeouts) belongs to the implementation.
pub trait PageSource {
    /// Fetches the raw text of `url`.
    ///
    /// Fails with [`Error::Transport`] once the implementation's retry
    /// budget is exhausted. No partial state is ever observable from a
    /// failed fetch.
    fn fetch(&self, url: &str) -> Result<String>;
}

/// Retry behavior for transport failures.
///
/// `max_attempts: None` means retry forever, so a transient failure is
/// never surfaced; a permanently failing endpoint then blocks the caller
/// indefinitely, which is why the default is bounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts before giving up, or `None` for unbounded.
    pub max_attempts: Option<NonZeroU32>,
    /// Pause between attempts.
    pub backoff: Duration,
}

impl RetryPolicy {
    /// A single attempt; the first failure is surfaced immediately.
    #[must_use]
    pub fn once() -> Self {
        Self {
            max_attempts: NonZeroU32::new(1),
            backoff: Duration::ZERO,
        }
    }

    /// Up to `attempts` attempts with a fixed pause between them.
    ///
    /// `attempts` of zero is treated as one.
    #[must_use]
    pub fn limited(attempts: u32, backoff: Duration) -> Self {
        Self {
            max_attempts: NonZeroU32::new(attempts.max(1)),
            backoff,
        }
    }

    /// Retry until a fetch succeeds, pausing between attempts.
    ///
    /// Use with care: there is no cancellation mechanism, and a dead
    /// endpoint blocks forever.
    #[must_use]
    pub fn forever(backoff: Duration) -> Self {
        Self {
            max_attempts: None,
            backoff,
        }
    }

    fn exhausted(&self, attempts_made: u32) -> bool {
        self.max_attempts.is_some_and(|max| attempts_made >= max.get())
    }
}

impl Default for RetryPolicy {
    /// Three attempts, 500 ms apart.
    fn default() -> Self {
        Self::limited(3, Duration::from_millis(500))
    }
}

/// [`PageSource`] backed by a blocking HTTP client.
///
/// Response status is not interpreted: the scraped site serves its error
/// and empty pages with a success status, and both are recognized by
/// markers downstream. Only network-level failures count against the
/// retry budget.
pub struct HttpSource {
    client: reqwest::blocking::Client,
    retry: RetryPolicy,
}

impl HttpSource {
    /// Creates a source with the given retry policy.
    pub fn new(retry: RetryPolicy) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(concat!("rs-wlparse/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::Transport {
                url: String::new(),
                attempts: 0,
                reason: format!("client construction failed: {e}"),
            })?;
        Ok(Self { client, retry })
    }

    /// Creates a source with the default bounded retry policy.
    pub fn with_defaults() -> Result<Self> {
        Self::new(RetryPolicy::default())
    }

    fn get(&self, url: &str) -> std::result::Result<String, reqwest::Error> {
        self.client.get(url).send()?.text()
    }
}

impl PageSource for HttpSource {
    fn fetch(&self, url: &str) -> Result<String> {
        let mut attempts: u32 = 0;
        loop {
            attempts += 1;
            match self.get(url) {
                Ok(body) => {
                    debug!(url, attempts, bytes = body.len(), "page fetched");
                    return Ok(body);
                }
                Err(e) => {
                    warn!(url, attempts, error = %e, "fetch attempt failed");
                    if self.retry.exhausted(attempts) {
                        return Err(Error::Transport {
                            url: url.to_string(),
                            attempts,
                            reason: e.to_string(),
                        });
                    }
                    thread::sleep(self.retry.backoff);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    /// Fails a fixed number of times, then succeeds.
    struct FlakySource {
        failures_left: Cell<u32>,
        calls: Cell<u32>,
    }

    impl FlakySource {
        fn new(failures: u32) -> Self {
            Self {
                failures_left: Cell::new(failures),
                calls: Cell::new(0),
            }
        }
    }

    impl PageSource for FlakySource {
        fn fetch(&self, url: &str) -> Result<String> {
            self.calls.set(self.calls.get() + 1);
            let left = self.failures_left.get();
            if left > 0 {
                self.failures_left.set(left - 1);
                return Err(Error::Transport {
                    url: url.to_string(),
                    attempts: 1,
                    reason: "connection reset".to_string(),
                });
            }
            Ok("page body".to_string())
        }
    }

    /// Drives any `PageSource` through a retry policy, the way `HttpSource`
    /// drives its inner client.
    fn fetch_with_retry(source: &dyn PageSource, retry: RetryPolicy, url: &str) -> Result<String> {
        let mut attempts = 0;
        loop {
            attempts += 1;
            match source.fetch(url) {
                Ok(body) => return Ok(body),
                Err(_) if !retry.exhausted(attempts) => {}
                Err(e) => return Err(e),
            }
        }
    }

    #[test]
    fn test_retry_policy_once_surfaces_first_failure() {
        let source = FlakySource::new(1);
        let result = fetch_with_retry(&source, RetryPolicy::once(), "http://x/");
        assert!(matches!(result, Err(Error::Transport { .. })));
        assert_eq!(source.calls.get(), 1);
    }

    #[test]
    fn test_retry_policy_limited_recovers_within_budget() {
        let source = FlakySource::new(2);
        let result = fetch_with_retry(&source, RetryPolicy::limited(3, Duration::ZERO), "http://x/");
        assert_eq!(result.ok().as_deref(), Some("page body"));
        assert_eq!(source.calls.get(), 3);
    }

    #[test]
    fn test_retry_policy_limited_exhausts_budget() {
        let source = FlakySource::new(5);
        let result = fetch_with_retry(&source, RetryPolicy::limited(3, Duration::ZERO), "http://x/");
        assert!(matches!(result, Err(Error::Transport { .. })));
        assert_eq!(source.calls.get(), 3);
    }

    #[test]
    fn test_retry_policy_forever_never_exhausts() {
        let policy = RetryPolicy::forever(Duration::ZERO);
        assert!(!policy.exhausted(1_000_000));
    }

    #[test]
    fn test_retry_policy_limited_zero_is_one_attempt() {
        let policy = RetryPolicy::limited(0, Duration::ZERO);
        assert!(policy.exhausted(1));
    }
}
