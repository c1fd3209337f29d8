//! Forum pages: individual threads and subforum listings.
//!
//! Threads paginate their posts 20 at a time through an `Offset`
//! parameter, and subforum listings paginate the same way. Post dates
//! and last-post dates drive the [`NewerThan`](crate::crawl::NewerThan)
//! incremental crawl.

use chrono::NaiveDateTime;
use serde::Serialize;

use super::id_after;
use crate::crawl::{
    ContentExhausted, CrawlConfig, EntityPage, NewerThan, PaginatedCrawler, TimedRecord,
};
use crate::error::Result;
use crate::markers::{extract_between, integer_after};
use crate::page::PageRecord;
use crate::source::PageSource;
use crate::temporal::parse_datetime;
use crate::url_utils::page_url;

const FORUM_BASE: &str = "https://www.warlight.net/Forum/";

/// Posts shown per thread page and threads shown per listing page.
pub const FORUM_PAGE_LEN: u32 = 20;

/// Each post on a thread page sits in its own region table; this prefix
/// is unique to those tables.
const POST_SPLIT: &str =
    r#" cellspacing="0" class="region" style="padding-bottom:15px; width: 100%; max-width: 900px;"#;

/// One post in a forum thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForumPost {
    /// Post ID.
    pub id: u32,
    /// Thread title as shown above the post.
    pub title: String,
    /// Raw HTML body of the post.
    pub body: String,
    /// When the post was made.
    pub posted_at: NaiveDateTime,
    /// Profile ID of the author.
    pub author_id: u32,
    /// Display name of the author.
    pub author_name: String,
    /// Whether the author shows a membership icon.
    pub author_is_member: bool,
    /// Author's clan at post time, `(id, name)` when shown.
    pub author_clan: Option<(u32, String)>,
}

/// One window of up to 20 posts from a forum thread.
pub struct ForumThreadPage<'a> {
    offset: u32,
    page: PageRecord<'a>,
}

impl<'a> ForumThreadPage<'a> {
    /// Creates the page record for `thread_id` starting at `offset` posts in.
    pub fn new(source: &'a dyn PageSource, thread_id: u32, offset: u32) -> Result<Self> {
        let base = format!("{FORUM_BASE}{thread_id}");
        let url = page_url(&base, &[("Offset", offset.to_string())])?;
        Ok(Self {
            offset,
            page: PageRecord::new(source, url),
        })
    }

    /// Whether the thread exists at all.
    pub fn exists(&self) -> Result<bool> {
        let page = self.page.data()?;
        // The site renders two spaces after "Oops!".
        Ok(!page.contains("Oops!  That thread doesn't exist. It may have been deleted."))
    }

    /// Thread title, from the page title.
    pub fn title(&self) -> Result<String> {
        let page = self.page.data()?;
        Ok(extract_between(page, "<title>", " - Play Risk")?.to_string())
    }

    /// Total number of posts in the whole thread, not just this window.
    pub fn total_posts(&self) -> Result<i64> {
        let page = self.page.data()?;
        let pager = extract_between(page, "Posts ", "&nbsp;")?;
        integer_after(pager, "of ")
    }

    /// Number of posts this window actually holds.
    pub fn post_count(&self) -> Result<u32> {
        let total = u32::try_from(self.total_posts()?).unwrap_or(0);
        Ok(FORUM_PAGE_LEN.min(total.max(self.offset) - self.offset))
    }

    /// Extracts the posts in this window, oldest first.
    pub fn posts(&self) -> Result<Vec<ForumPost>> {
        let page = self.page.data()?;
        let mut posts = Vec::new();
        for chunk in page.split(POST_SPLIT).skip(1) {
            posts.push(Self::parse_post(chunk)?);
        }
        Ok(posts)
    }

    fn parse_post(chunk: &str) -> Result<ForumPost> {
        let id = id_after(chunk, "PostForDisplay_")?;
        let title = extract_between(chunk, r##"<font color="#CCCCCC">"##, "</font>")?.to_string();
        let body_marker = format!(r#"PostForDisplay_{id}">"#);
        let body = extract_between(chunk, &body_marker, "</div>")?
            .trim()
            .to_string();
        let posted_at = parse_datetime(extract_between(chunk, "</font>:", "</th>")?.trim())?;
        let author_id = id_after(chunk, "Profile?p=")?;
        let name_marker = format!(r#"{author_id}">"#);
        let author_name = extract_between(chunk, &name_marker, "</a>")?.to_string();
        let author_is_member = chunk.contains("Images/SmallMemberIcon.png");
        let author_clan = if chunk.contains("/Clans/?ID=") {
            let clan_id = id_after(chunk, "/Clans/?ID=")?;
            let clan_marker = format!(r#"/Clans/?ID={clan_id}" title=""#);
            // Clanless re-renders sometimes keep the link without a title.
            match extract_between(chunk, &clan_marker, r#""><img"#) {
                Ok(name) => Some((clan_id, name.to_string())),
                Err(_) => None,
            }
        } else {
            None
        };
        Ok(ForumPost {
            id,
            title,
            body,
            posted_at,
            author_id,
            author_name,
            author_is_member,
            author_clan,
        })
    }
}

impl EntityPage for ForumThreadPage<'_> {
    type Record = ForumPost;

    fn has_records(&self) -> Result<bool> {
        Ok(self.post_count()? > 0)
    }

    fn is_error_page(&self) -> Result<bool> {
        let page = self.page.data()?;
        Ok(page.contains("<h1>Whoops, an error has occurred</h1>"))
    }

    fn records(&self) -> Result<Vec<ForumPost>> {
        self.posts()
    }
}

/// Collects every post of a thread from `min_offset` onward.
pub fn thread_posts(
    source: &dyn PageSource,
    thread_id: u32,
    min_offset: u32,
) -> Result<crate::crawl::CrawlOutcome<ForumPost>> {
    let config = CrawlConfig::new(min_offset, FORUM_PAGE_LEN);
    let crawler = PaginatedCrawler::new(config, |offset| {
        ForumThreadPage::new(source, thread_id, offset)
    });
    crawler.run(ContentExhausted)
}

/// A thread row on a subforum listing page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThreadSummary {
    /// Thread ID.
    pub id: u32,
    /// Thread title.
    pub title: String,
    /// Who opened the thread.
    pub author: String,
    /// Reply count as listed.
    pub replies: i64,
    /// When the latest post was made.
    pub last_post_at: NaiveDateTime,
    /// Who made the latest post.
    pub last_post_author: String,
}

impl TimedRecord for ThreadSummary {
    fn recorded_at(&self) -> NaiveDateTime {
        self.last_post_at
    }
}

/// One window of thread rows from a subforum listing.
pub struct SubforumPage<'a> {
    page: PageRecord<'a>,
}

impl<'a> SubforumPage<'a> {
    /// Creates the page record for the subforum named `name` at `offset`.
    pub fn new(source: &'a dyn PageSource, name: &str, offset: u32) -> Result<Self> {
        let base = format!("{FORUM_BASE}{name}");
        let url = page_url(&base, &[("Offset", offset.to_string())])?;
        Ok(Self {
            page: PageRecord::new(source, url),
        })
    }

    /// Whether this window lists any threads.
    pub fn has_threads(&self) -> Result<bool> {
        let page = self.page.data()?;
        Ok(!page.contains("This forum has no posts."))
    }

    /// Extracts the thread rows in this window, newest activity first.
    pub fn threads(&self) -> Result<Vec<ThreadSummary>> {
        let page = self.page.data()?;
        let listing = extract_between(page, "<th>Last&nbsp;Post</th>", "")?;
        let mut threads = Vec::new();
        for row in listing.split("<tr>").skip(1) {
            let row = extract_between(row, r#"<a href=""#, "")?;
            let id = id_after(row, "/Forum/")?;
            let title = extract_between(row, r#"">"#, "</a>")?.to_string();
            let author = extract_between(row, r#""by "#, ".</font>")?.to_string();
            let replies = integer_after(row, r#"<td nowrap="nowrap">"#)?;
            // The timestamp cell pads its tail with spaces before the
            // relative-age span.
            let last_post_at =
                parse_datetime(extract_between(row, r#"padding-right:15px">"#, "      ")?.trim())?;
            let last_post_author = extract_between(row, r##"#C6C6C6">by "##, "</span>")?.to_string();
            threads.push(ThreadSummary {
                id,
                title,
                author,
                replies,
                last_post_at,
                last_post_author,
            });
        }
        Ok(threads)
    }
}

impl EntityPage for SubforumPage<'_> {
    type Record = ThreadSummary;

    fn has_records(&self) -> Result<bool> {
        self.has_threads()
    }

    fn records(&self) -> Result<Vec<ThreadSummary>> {
        self.threads()
    }
}

/// Collects thread summaries from a subforum, stopping once rows fall at
/// or before `cutoff`. A `None` cutoff walks the whole listing.
pub fn subforum_threads(
    source: &dyn PageSource,
    name: &str,
    cutoff: Option<NaiveDateTime>,
    min_offset: u32,
) -> Result<crate::crawl::CrawlOutcome<ThreadSummary>> {
    let config = CrawlConfig::new(min_offset, FORUM_PAGE_LEN);
    let crawler = PaginatedCrawler::new(config, |offset| SubforumPage::new(source, name, offset));
    crawler.run(NewerThan::new(cutoff))
}
