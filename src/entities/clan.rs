//! Clan page: identity fields and the member roster.
//!
//! A clan page is a single non-paginated page; the roster lives in one
//! `dataTable`. The site-wide clan index is a single list fetch whose only
//! structure is repeated `/Clans/?ID=` links.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::Serialize;

use super::id_after;
use crate::error::Result;
use crate::markers::{extract_between, integer_after};
use crate::page::PageRecord;
use crate::source::PageSource;
use crate::temporal::parse_date;
use crate::url_utils::page_url;

const CLAN_BASE: &str = "https://www.warlight.net/Clans/";
const CLAN_LIST_URL: &str = "https://www.warlight.net/Clans/List";

/// Matches the clan links on the site-wide clan index.
#[allow(clippy::expect_used)]
static CLAN_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/Clans/\?ID=(\d+)").expect("CLAN_LINK regex"));

/// One row of a clan's member roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClanMember {
    /// The member's profile ID.
    pub id: u32,
    /// Display name.
    pub name: String,
    /// Clan-assigned title, free text.
    pub title: String,
    /// Whether the player holds a paid membership.
    pub is_member: bool,
}

/// One clan's page, fetched on first field access.
pub struct ClanPage<'a> {
    id: u32,
    page: PageRecord<'a>,
}

impl<'a> ClanPage<'a> {
    /// Creates the page record for clan `id`; nothing is fetched yet.
    pub fn new(source: &'a dyn PageSource, id: u32) -> Result<Self> {
        let url = page_url(CLAN_BASE, &[("ID", id.to_string())])?;
        Ok(Self {
            id,
            page: PageRecord::new(source, url),
        })
    }

    /// The clan ID this page was built for.
    #[must_use]
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Clan name, from the page title.
    pub fn name(&self) -> Result<String> {
        let page = self.page.data()?;
        Ok(extract_between(page, "<title>", " -")?.to_string())
    }

    /// Declared member count.
    pub fn member_count(&self) -> Result<i64> {
        integer_after(self.page.data()?, "Number of members:</font> ")
    }

    /// The clan's external link, or `""` when only the placeholder
    /// `http://` was stored.
    pub fn link(&self) -> Result<String> {
        let page = self.page.data()?;
        let link = extract_between(page, r#"Link:</font> <a rel="nofollow" href=""#, r#"">"#)?;
        if link == "http://" {
            return Ok(String::new());
        }
        Ok(link.to_string())
    }

    /// Clan tagline.
    pub fn tagline(&self) -> Result<String> {
        let page = self.page.data()?;
        Ok(extract_between(page, "Tagline:</font> ", "<br />")?.to_string())
    }

    /// Creation date.
    pub fn created(&self) -> Result<NaiveDate> {
        let page = self.page.data()?;
        parse_date(extract_between(page, "Created:</font> ", "<br")?)
    }

    /// Clan bio.
    pub fn bio(&self) -> Result<String> {
        let page = self.page.data()?;
        Ok(extract_between(page, "Bio:</font>  ", "<br />")?.to_string())
    }

    /// The member roster, in document order.
    pub fn members(&self) -> Result<Vec<ClanMember>> {
        let page = self.page.data()?;
        let table = extract_between(page, r#"<table class="dataTable">"#, "</table>")?;
        let mut members = Vec::new();
        // The first two <tr> chunks are the header, not roster rows.
        for row in table.split("<tr>").skip(2) {
            let is_member = row.contains(r#"title="Warlight Member""#);
            let id = id_after(row, "/Profile?p=")?;
            let name = extract_between(row, r#"">"#, "</a>")?.to_string();
            let title_cell = row.rsplit("<td>").next().unwrap_or("");
            let title = extract_between(title_cell, "", "</td")?.to_string();
            members.push(ClanMember {
                id,
                name,
                title,
                is_member,
            });
        }
        Ok(members)
    }
}

/// Fetches the site-wide clan index and collects every clan ID.
///
/// A single non-paginated fetch; the set is ordered for deterministic
/// iteration.
pub fn clan_ids(source: &dyn PageSource) -> Result<BTreeSet<u32>> {
    let body = source.fetch(CLAN_LIST_URL)?;
    let mut ids = BTreeSet::new();
    for capture in CLAN_LINK.captures_iter(&body) {
        if let Some(id) = capture.get(1).and_then(|m| m.as_str().parse().ok()) {
            ids.insert(id);
        }
    }
    Ok(ids)
}
