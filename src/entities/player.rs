//! Player profile page: identity, activity, and statistics blocks.
//!
//! The profile is a single non-paginated page, but it is by far the
//! densest one: two dozen fields spread over free-form HTML, each located
//! by its own marker pair. Optional blocks (clan, single-player stats,
//! tournaments, ladders...) are absent entirely for players who never
//! touched that feature, so most accessors here treat a missing section
//! marker as "empty", while markers *inside* a present section stay hard
//! errors.

use chrono::NaiveDate;
use serde::Serialize;

use super::id_after;
use crate::error::Result;
use crate::markers::{extract_between, integer_after, numeric_after, scan_after};
use crate::page::PageRecord;
use crate::source::PageSource;
use crate::temporal::{parse_date, parse_duration};
use crate::url_utils::page_url;

const PROFILE_BASE: &str = "https://www.warlight.net/Profile";

/// A tournament entry on a profile; `rank` is `None` for unranked entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tournament {
    /// Tournament ID.
    pub id: u32,
    /// Tournament name.
    pub name: String,
    /// Final rank, when the player placed.
    pub rank: Option<i64>,
}

/// A ladder standing on a profile. Rank `0` means unranked; peak fields
/// are `0` when the page omits them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LadderStanding {
    /// Ladder display name.
    pub ladder: String,
    /// The player's team on that ladder.
    pub team_id: u32,
    /// Current rank, `0` if unranked.
    pub rank: i64,
    /// Current rating.
    pub rating: i64,
    /// Best rank ever, `0` if never shown.
    pub peak_rank: i64,
    /// Best rating ever, `0` if never shown.
    pub peak_rating: i64,
}

/// Win/loss record for one game type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameTypeRecord {
    /// Game type label as rendered.
    pub game_type: String,
    /// Games won.
    pub won: i64,
    /// Games played.
    pub played: i64,
    /// Win percentage over that type.
    pub win_percent: f64,
}

/// Summary of a player's ranked games.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct RankedSummary {
    /// Total ranked wins.
    pub wins: i64,
    /// Total ranked games completed.
    pub played: i64,
    /// Win percentage over all ranked games.
    pub win_percent: f64,
    /// Per-game-type breakdown, in document order.
    pub per_type: Vec<GameTypeRecord>,
}

/// A favorite map entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FavoriteMap {
    /// Map name.
    pub name: String,
    /// Map author.
    pub author: String,
    /// Link to the map page.
    pub link: String,
}

/// One player's profile page, fetched on first field access.
pub struct PlayerPage<'a> {
    id: u32,
    page: PageRecord<'a>,
}

impl<'a> PlayerPage<'a> {
    /// Creates the page record for player `id`; nothing is fetched yet.
    pub fn new(source: &'a dyn PageSource, id: u32) -> Result<Self> {
        let url = page_url(PROFILE_BASE, &[("p", id.to_string())])?;
        Ok(Self {
            id,
            page: PageRecord::new(source, url),
        })
    }

    /// The profile ID this page was built for.
    #[must_use]
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Whether the requested player exists at all.
    pub fn exists(&self) -> Result<bool> {
        let page = self.page.data()?;
        Ok(!page.contains("Sorry, the requested player was not found."))
    }

    /// Player name, from the page title.
    pub fn name(&self) -> Result<String> {
        let page = self.page.data()?;
        Ok(extract_between(page, "<title>", " -")?.to_string())
    }

    /// Player level.
    pub fn level(&self) -> Result<i64> {
        integer_after(self.page.data()?, "<big><b>Level ")
    }

    /// Points earned in the last 30 days. Rendered with comma grouping.
    pub fn points_last_30_days(&self) -> Result<i64> {
        let page = self.page.data()?;
        let run = scan_after(page, "days:</font> ", "0123456789,", true)?;
        let digits = run.replace(',', "");
        digits.parse().map_err(|_| crate::error::Error::Number {
            value: run.to_string(),
        })
    }

    /// Where the player plays from, or `""` when unset.
    pub fn location(&self) -> Result<String> {
        let page = self.page.data()?;
        if !page.contains(r#"title="Plays from "#) {
            return Ok(String::new());
        }
        Ok(extract_between(page, r#"title="Plays from "#, "\"")?.to_string())
    }

    /// Whether the player holds a paid membership.
    pub fn is_member(&self) -> Result<bool> {
        let page = self.page.data()?;
        Ok(page.contains(r#"id="MemberIcon" title="WarLight Member""#))
    }

    /// Membership start date, `None` for non-members.
    pub fn member_since(&self) -> Result<Option<NaiveDate>> {
        let page = self.page.data()?;
        if !page.contains("Member since</font> ") {
            return Ok(None);
        }
        let date = extract_between(page, "Member since</font> ", "</font>")?;
        Ok(Some(parse_date(date)?))
    }

    /// Join date.
    pub fn joined(&self) -> Result<NaiveDate> {
        let page = self.page.data()?;
        parse_date(extract_between(page, "Joined WarLight:</font> ", "<br />")?)
    }

    /// Partially redacted e-mail address.
    pub fn email(&self) -> Result<String> {
        let page = self.page.data()?;
        Ok(extract_between(page, "E-mail:</font> ", "<br />")?.to_string())
    }

    /// Player-supplied link.
    pub fn link(&self) -> Result<String> {
        let page = self.page.data()?;
        let anchor = extract_between(page, "Player-supplied link:", "</a>")?;
        Ok(extract_between(anchor, r#"">"#, "")?.to_string())
    }

    /// Player tagline.
    pub fn tagline(&self) -> Result<String> {
        let page = self.page.data()?;
        Ok(extract_between(page, "Tagline:</font> ", "<br />")?.to_string())
    }

    /// Player bio.
    pub fn bio(&self) -> Result<String> {
        let page = self.page.data()?;
        Ok(extract_between(page, "Bio:</font>  ", "<br />")?.to_string())
    }

    /// The player's clan ID, `None` when clanless.
    pub fn clan_id(&self) -> Result<Option<u32>> {
        let page = self.page.data()?;
        if !page.contains(r#"<a href="/Clans/?ID="#) {
            return Ok(None);
        }
        Ok(Some(id_after(page, r#"<a href="/Clans/?ID="#)?))
    }

    /// URL of the clan icon, `None` when clanless or iconless.
    pub fn clan_icon(&self) -> Result<Option<String>> {
        let page = self.page.data()?;
        let marker = r#""vertical-align: middle" src=""#;
        if !page.contains(marker) {
            return Ok(None);
        }
        Ok(Some(
            extract_between(page, marker, r#"" border=""#)?.to_string(),
        ))
    }

    /// The clan's display name, `""` when clanless.
    ///
    /// The anchor either wraps an icon (name follows the `<img>`) or is
    /// plain text; both renderings are handled.
    pub fn clan_name(&self) -> Result<String> {
        let page = self.page.data()?;
        let outer = r#"<a href="/Clans/?ID="#;
        if !page.contains(outer) {
            return Ok(String::new());
        }
        let anchor = extract_between(page, outer, "/a>")?;
        let with_icon = r#"border="0" />"#;
        let name = if anchor.contains(with_icon) {
            extract_between(anchor, with_icon, "<")?
        } else {
            extract_between(anchor, r#"">"#, "<")?
        };
        Ok(name.trim().to_string())
    }

    /// Count of ongoing multi-day games.
    pub fn current_games(&self) -> Result<i64> {
        let page = self.page.data()?;
        let range = extract_between(page, "Currently in</font> ", "games")?;
        if !range.contains("multi-day") {
            return Ok(0);
        }
        integer_after(range, "")
    }

    /// Count of games played.
    pub fn played_games(&self) -> Result<i64> {
        integer_after(self.page.data()?, "Played in</font> ")
    }

    /// Percentage of played games that were real-time.
    pub fn percent_realtime(&self) -> Result<f64> {
        let page = self.page.data()?;
        let range = extract_between(page, "Played in", "<br />")?;
        numeric_after(range, " (")
    }

    /// Hours since the player was last seen; "less than" phrases are `0`.
    pub fn last_seen_hours(&self) -> Result<f64> {
        let page = self.page.data()?;
        let phrase = extract_between(page, "Last seen </font>", "<font")?;
        if phrase.contains("less than") {
            return Ok(0.0);
        }
        parse_duration(phrase)
    }

    /// How many times the player has been booted.
    pub fn boot_count(&self) -> Result<i64> {
        let page = self.page.data()?;
        if page.contains("never been booted") {
            return Ok(0);
        }
        integer_after(page, "This player has been booted ")
    }

    /// Boot rate as a percentage of turns.
    pub fn boot_rate(&self) -> Result<f64> {
        let page = self.page.data()?;
        if page.contains("never been booted") {
            return Ok(0.0);
        }
        let range = extract_between(page, "This player has been booted ", "</font>")?;
        numeric_after(range, " (")
    }

    /// Single-player level results as `(level name, turns to win)` pairs.
    pub fn single_player_stats(&self) -> Result<Vec<(String, i64)>> {
        let page = self.page.data()?;
        let marker = "<h3>Single-player stats</h3>";
        if !page.contains(marker) {
            return Ok(Vec::new());
        }
        let range = extract_between(page, marker, "<h3")?;
        let mut stats = Vec::new();
        for chunk in range.split(r##"color="#858585"##).skip(1) {
            let level = extract_between(chunk, r#"">"#, ":</font>")?.to_string();
            let turns = integer_after(chunk, "Won in ")?;
            stats.push((level, turns));
        }
        Ok(stats)
    }

    /// Favorite games as `(game ID, game name)` pairs.
    pub fn favorite_games(&self) -> Result<Vec<(u32, String)>> {
        let page = self.page.data()?;
        let marker = "<h3>Favorite Games</h3>";
        if !page.contains(marker) {
            return Ok(Vec::new());
        }
        let range = extract_between(page, marker, "<h3>")?;
        let mut games = Vec::new();
        for chunk in range.split("GameID=").skip(1) {
            let id = id_after(chunk, "")?;
            let name = extract_between(chunk, r#"">"#, "</a>")?.to_string();
            games.push((id, name));
        }
        Ok(games)
    }

    /// Tournament entries, with rank when the player placed.
    pub fn tournaments(&self) -> Result<Vec<Tournament>> {
        let page = self.page.data()?;
        let marker = "<h3>Tournaments</h3>";
        if !page.contains(marker) {
            return Ok(Vec::new());
        }
        let range = extract_between(page, marker, "<h3")?;
        let mut tournaments = Vec::new();
        for chunk in range.split("- ").skip(1) {
            let rank = if chunk.starts_with(|c: char| c.is_ascii_digit()) {
                Some(integer_after(chunk, "")?)
            } else {
                None
            };
            let id = id_after(chunk, "TournamentID=")?;
            let name = extract_between(chunk, r#"">"#, "</a>")?.to_string();
            tournaments.push(Tournament { id, name, rank });
        }
        Ok(tournaments)
    }

    /// Ladder standings, in document order.
    pub fn ladder_stats(&self) -> Result<Vec<LadderStanding>> {
        let page = self.page.data()?;
        let marker = "<h3>Ladder Statistics</h3>";
        if !page.contains(marker) {
            return Ok(Vec::new());
        }
        let range = extract_between(page, marker, "<h3")?;
        let mut standings = Vec::new();
        for chunk in range.split("a href=").skip(1) {
            let team_id = id_after(chunk, "TeamID=")?;
            let ladder = extract_between(chunk, r#"">"#, "</a>")?.to_string();
            let rank = if chunk.contains("Not Ranked") {
                0
            } else {
                integer_after(chunk, "Ranked ")?
            };
            let rating = integer_after(chunk, "rating of ")?;
            let peak_rating = if chunk.contains("Best rating ever:") {
                integer_after(chunk, "Best rating ever: ")?
            } else {
                0
            };
            let peak_rank = if chunk.contains("best rank ever: ") {
                integer_after(chunk, "best rank ever: ")?
            } else {
                0
            };
            standings.push(LadderStanding {
                ladder,
                team_id,
                rank,
                rating,
                peak_rank,
                peak_rating,
            });
        }
        Ok(standings)
    }

    /// Ranked-games summary with a per-game-type breakdown.
    ///
    /// Players with no completed ranked games get an all-zero summary.
    pub fn ranked_summary(&self) -> Result<RankedSummary> {
        let page = self.page.data()?;
        let marker = "<h3>Ranked Games</h3>";
        if !page.contains(marker) {
            return Ok(RankedSummary::default());
        }
        let range = extract_between(page, marker, "<h3")?;
        if range.contains("No completed ranked games") {
            return Ok(RankedSummary::default());
        }
        let played = integer_after(range, "Completed</font> ")?;
        // "1 ranked game (...)" is rendered in the singular.
        let wins = if range.contains("ranked games (") {
            integer_after(range, "ranked games (")?
        } else {
            integer_after(range, "ranked game (")?
        };
        let win_percent = percentage(wins, played);
        let mut per_type = Vec::new();
        for chunk in range.split(r##"color="#858585""##).skip(2) {
            let game_type = extract_between(chunk, ">", ":</font")?.to_string();
            let won = integer_after(chunk, "</font> ")?;
            let type_played = integer_after(chunk, " / ")?;
            per_type.push(GameTypeRecord {
                game_type,
                won,
                played: type_played,
                win_percent: percentage(won, type_played),
            });
        }
        Ok(RankedSummary {
            wins,
            played,
            win_percent,
            per_type,
        })
    }

    /// Previous display names as `(name, used until)` pairs.
    pub fn previous_names(&self) -> Result<Vec<(String, NaiveDate)>> {
        let page = self.page.data()?;
        let marker = "<h3>Previously known as...";
        if !page.contains(marker) {
            return Ok(Vec::new());
        }
        let range = extract_between(page, marker, "<h3")?;
        let mut names = Vec::new();
        for chunk in range.split("&nbsp;&nbsp;&nbsp;").skip(1) {
            let name = extract_between(chunk, "", " <font")?.trim().to_string();
            let until = parse_date(extract_between(chunk, r#""gray">("#, ")")?)?;
            names.push((name, until));
        }
        Ok(names)
    }

    /// Average play speed per game class, as `(label, hours)` pairs.
    pub fn play_speed(&self) -> Result<Vec<(String, f64)>> {
        let page = self.page.data()?;
        let marker = "<h3>Play Speed</h3>";
        if !page.contains(marker) {
            return Ok(Vec::new());
        }
        let range = extract_between(page, marker, "<h3")?;
        let mut speeds = Vec::new();
        for label in ["Multi-Day Games:", "Real-Time Games:"] {
            let section = extract_between(range, label, "<h5")?;
            let phrase = extract_between(section, "Average:</font> ", "<br />")?;
            let hours = parse_duration(phrase)?;
            speeds.push((label.trim_end_matches(':').to_string(), hours));
        }
        Ok(speeds)
    }

    /// Favorite maps with authors and links.
    pub fn favorite_maps(&self) -> Result<Vec<FavoriteMap>> {
        let page = self.page.data()?;
        let marker = "Favorite Maps</h3";
        if !page.contains(marker) {
            return Ok(Vec::new());
        }
        let range = extract_between(page, marker, "</td")?;
        let mut maps = Vec::new();
        for chunk in range.split(r#"a href=""#).skip(1) {
            let link = extract_between(chunk, "", r#"">"#)?.to_string();
            let name = extract_between(chunk, "</a> <br>", "<br>")?.to_string();
            let author = extract_between(chunk, "by ", "</font>")?.to_string();
            maps.push(FavoriteMap { name, author, link });
        }
        Ok(maps)
    }

    /// Percentage of achievements completed.
    pub fn achievement_rate(&self) -> Result<i64> {
        let page = self.page.data()?;
        let marker = "<h3>Achievements";
        if !page.contains(marker) {
            return Ok(0);
        }
        let range = extract_between(page, marker, "</font>")?;
        integer_after(range, "(")
    }
}

/// Win percentage, `0.0` when nothing was played.
fn percentage(won: i64, played: i64) -> f64 {
    if played == 0 {
        return 0.0;
    }
    won as f64 / played as f64 * 100.0
}
