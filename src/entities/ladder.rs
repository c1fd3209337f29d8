//! Ladder pages: season metadata, team rankings, and game histories.
//!
//! Rankings and game histories paginate 50 rows at a time. Ranking
//! crawls come in two flavours, the full listing and a ranked-only
//! prefix that stops at the first unranked team.

use serde::Serialize;

use super::id_after;
use crate::crawl::{
    ContentExhausted, CrawlConfig, CrawlOutcome, EntityPage, PaginatedCrawler, RankedOnly,
    RankedRecord,
};
use crate::error::Result;
use crate::markers::{extract_between, integer_after};
use crate::page::PageRecord;
use crate::source::PageSource;
use crate::url_utils::page_url;

const LADDER_SEASON_BASE: &str = "https://www.warlight.net/LadderSeason";
const LADDER_TEAMS_BASE: &str = "https://www.warlight.net/LadderTeams";
const LADDER_GAMES_BASE: &str = "https://www.warlight.net/LadderGames";

/// Teams or games shown per ladder page.
pub const LADDER_PAGE_LEN: u32 = 50;

/// A ladder's front page.
pub struct LadderPage<'a> {
    page: PageRecord<'a>,
}

impl<'a> LadderPage<'a> {
    /// Creates the page record for ladder `id`; nothing is fetched yet.
    pub fn new(source: &'a dyn PageSource, id: u32) -> Result<Self> {
        let url = page_url(LADDER_SEASON_BASE, &[("ID", id.to_string())])?;
        Ok(Self {
            page: PageRecord::new(source, url),
        })
    }

    /// How many teams currently play this ladder.
    pub fn size(&self) -> Result<i64> {
        integer_after(self.page.data()?, "<td>There are currently ")
    }
}

/// One player on a ladder team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LadderPlayer {
    /// Display name.
    pub name: String,
    /// Clan at listing time, `(id, name)` when shown.
    pub clan: Option<(u32, String)>,
}

/// One row of a ladder ranking listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LadderTeam {
    /// Ladder team ID.
    pub team_id: u32,
    /// Current rank, `0` for unranked teams.
    pub rank: u32,
    /// Net arrow movement since the previous listing, up minus down.
    pub rank_shift: i64,
    /// Current rating, `0` when withheld.
    pub rating: i64,
    /// The players on the team, in listing order.
    pub players: Vec<LadderPlayer>,
}

impl RankedRecord for LadderTeam {
    fn rank(&self) -> u32 {
        self.rank
    }
}

/// One window of up to 50 ranking rows.
pub struct LadderRankingPage<'a> {
    page: PageRecord<'a>,
}

impl<'a> LadderRankingPage<'a> {
    /// Creates the page record for ladder `id` starting `offset` teams in.
    pub fn new(source: &'a dyn PageSource, id: u32, offset: u32) -> Result<Self> {
        let url = page_url(
            LADDER_TEAMS_BASE,
            &[("ID", id.to_string()), ("Offset", offset.to_string())],
        )?;
        Ok(Self {
            page: PageRecord::new(source, url),
        })
    }

    fn listing(&self) -> Result<&str> {
        let page = self.page.data()?;
        extract_between(page, "</thead>", r#"<table class="LadderTeamsPager">"#)
    }

    /// Extracts the ranking rows in this window, best rank first.
    pub fn teams(&self) -> Result<Vec<LadderTeam>> {
        let listing = self.listing()?;
        let mut teams = Vec::new();
        for row in listing.split("<tr >").skip(1) {
            teams.push(Self::parse_team(row)?);
        }
        Ok(teams)
    }

    fn parse_team(row: &str) -> Result<LadderTeam> {
        let rank = if row.contains("<td>Not Ranked </td>") {
            0
        } else {
            id_after(row, "<td>")?
        };
        let ups = row.matches(r#"img src="/Images/UpArrow.png"#).count();
        let downs = row.matches(r#"img src="/Images/DownArrow.png"#).count();
        let rank_shift = ups as i64 - downs as i64;
        let team_id = id_after(row, "LadderTeam?LadderTeamID=")?;
        let name_marker = format!(r#"LadderTeam?LadderTeamID={team_id}">"#);
        let mut players = Vec::new();
        let mut clan: Option<(u32, String)> = None;
        // Clan anchors precede their player's profile anchor, so a clan
        // seen here attaches to the next player name.
        for anchor in row.split("<a ").skip(1) {
            if anchor.starts_with(r#"href="/Clans/?ID="#) {
                let clan_id = id_after(anchor, "/Clans/?ID=")?;
                let name = extract_between(anchor, r#"" title=""#, r#"">"#)?.to_string();
                clan = Some((clan_id, name));
            } else if anchor.contains(&name_marker) {
                let name = extract_between(anchor, &name_marker, "</a")?.to_string();
                players.push(LadderPlayer {
                    name,
                    clan: clan.take(),
                });
            }
        }
        let rating = match row.rsplit("<td>").next() {
            Some(cell) if cell.starts_with(|c: char| c.is_ascii_digit()) => {
                integer_after(cell, "")?
            }
            _ => 0,
        };
        Ok(LadderTeam {
            team_id,
            rank,
            rank_shift,
            rating,
            players,
        })
    }
}

impl EntityPage for LadderRankingPage<'_> {
    type Record = LadderTeam;

    fn has_records(&self) -> Result<bool> {
        Ok(self.listing()?.contains("<tr >"))
    }

    fn records(&self) -> Result<Vec<LadderTeam>> {
        self.teams()
    }
}

/// Collects a ladder's ranking listing.
///
/// With `ranked_only` the crawl stops at the first unranked team and
/// discards unranked stragglers; otherwise it walks the whole listing.
pub fn ladder_teams(
    source: &dyn PageSource,
    ladder_id: u32,
    ranked_only: bool,
) -> Result<CrawlOutcome<LadderTeam>> {
    let config = CrawlConfig::new(0, LADDER_PAGE_LEN);
    let crawler = PaginatedCrawler::new(config, |offset| {
        LadderRankingPage::new(source, ladder_id, offset)
    });
    if ranked_only {
        crawler.run(RankedOnly)
    } else {
        crawler.run(ContentExhausted)
    }
}

/// One row of a ladder game history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LadderGame {
    /// Game ID.
    pub game_id: u32,
    /// Ladder team IDs of the winning side, empty while unfinished.
    pub winners: Vec<u32>,
    /// Ladder team IDs of the losing side, or both sides while unfinished.
    pub losers: Vec<u32>,
    /// When the game ended, as rendered, `None` while in progress.
    pub end_time: Option<String>,
    /// Whether the game expired rather than being played out.
    pub expired: bool,
}

/// One window of up to 50 game rows, for a whole ladder or one team.
pub struct LadderGamePage<'a> {
    row_marker: &'static str,
    page: PageRecord<'a>,
}

impl<'a> LadderGamePage<'a> {
    /// Page of the ladder-wide game history.
    pub fn for_ladder(source: &'a dyn PageSource, ladder_id: u32, offset: u32) -> Result<Self> {
        let url = page_url(
            LADDER_GAMES_BASE,
            &[
                ("ID", ladder_id.to_string()),
                ("Offset", offset.to_string()),
            ],
        )?;
        Ok(Self {
            // Ladder-wide rows render with an explicit inherit background.
            row_marker: r#"<tr style="background-color: inherit">"#,
            page: PageRecord::new(source, url),
        })
    }

    /// Page of one team's game history.
    pub fn for_team(
        source: &'a dyn PageSource,
        ladder_id: u32,
        team_id: u32,
        offset: u32,
    ) -> Result<Self> {
        let url = page_url(
            LADDER_GAMES_BASE,
            &[
                ("ID", ladder_id.to_string()),
                ("LadderTeamID", team_id.to_string()),
                ("Offset", offset.to_string()),
            ],
        )?;
        Ok(Self {
            // Team histories alternate row colors, so only the style
            // prefix is stable.
            row_marker: r#"<tr style="background-color: "#,
            page: PageRecord::new(source, url),
        })
    }

    fn listing(&self) -> Result<&str> {
        let page = self.page.data()?;
        extract_between(page, "</thead>", r#"<div class="LadderGamesPager"#)
    }

    /// Extracts the game rows in this window, newest first.
    pub fn games(&self) -> Result<Vec<LadderGame>> {
        let listing = self.listing()?;
        let mut games = Vec::new();
        for row in listing.split(self.row_marker).skip(1) {
            games.push(Self::parse_game(row)?);
        }
        Ok(games)
    }

    fn parse_game(row: &str) -> Result<LadderGame> {
        let game_id = id_after(row, "MultiPlayer?GameID=")?;
        let expired = row.contains("</a> (expired)");
        let time = extract_between(row, r#"style="white-space: nowrap">"#, "</td>")?.trim();
        let end_time = if time.is_empty() {
            None
        } else {
            Some(time.to_string())
        };
        let (winner_half, loser_half) = match row.split_once("defeated") {
            Some(halves) => halves,
            // Unfinished games render "X vs Y" with no winner yet.
            None => ("", row),
        };
        let mut winners = Vec::new();
        for chunk in winner_half.split("?LadderTeamID=").skip(1) {
            winners.push(id_after(chunk, "")?);
        }
        let mut losers = Vec::new();
        for chunk in loser_half.split("?LadderTeamID=").skip(1) {
            losers.push(id_after(chunk, "")?);
        }
        Ok(LadderGame {
            game_id,
            winners,
            losers,
            end_time,
            expired,
        })
    }
}

impl EntityPage for LadderGamePage<'_> {
    type Record = LadderGame;

    fn has_records(&self) -> Result<bool> {
        Ok(self.listing()?.contains(self.row_marker))
    }

    fn records(&self) -> Result<Vec<LadderGame>> {
        self.games()
    }
}

/// Collects the ladder-wide game history, newest first.
pub fn ladder_games(
    source: &dyn PageSource,
    ladder_id: u32,
    include_expired: bool,
) -> Result<CrawlOutcome<LadderGame>> {
    let config = CrawlConfig::new(0, LADDER_PAGE_LEN);
    let crawler = PaginatedCrawler::new(config, |offset| {
        LadderGamePage::for_ladder(source, ladder_id, offset)
    });
    let mut outcome = crawler.run(ContentExhausted)?;
    if !include_expired {
        outcome.records.retain(|game| !game.expired);
    }
    Ok(outcome)
}

/// Collects one team's game history, newest first.
pub fn ladder_team_games(
    source: &dyn PageSource,
    ladder_id: u32,
    team_id: u32,
    include_expired: bool,
) -> Result<CrawlOutcome<LadderGame>> {
    let config = CrawlConfig::new(0, LADDER_PAGE_LEN);
    let crawler = PaginatedCrawler::new(config, |offset| {
        LadderGamePage::for_team(source, ladder_id, team_id, offset)
    });
    let mut outcome = crawler.run(ContentExhausted)?;
    if !include_expired {
        outcome.records.retain(|game| !game.expired);
    }
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StaticSource(String);

    impl PageSource for StaticSource {
        fn fetch(&self, _url: &str) -> Result<String> {
            Ok(self.0.clone())
        }
    }

    fn ranking_page(rows: &str) -> String {
        format!(
            r#"<table><thead><tr><th>Rank</th></tr></thead>{rows}</table><table class="LadderTeamsPager"></table>"#
        )
    }

    fn ranked_row(rank: u32, team_id: u32, player: &str, rating: i64) -> String {
        format!(
            concat!(
                "<tr ><td>{rank} </td>",
                r#"<td><img src="/Images/UpArrow.png" /><img src="/Images/UpArrow.png" /><img src="/Images/DownArrow.png" /></td>"#,
                r#"<td><a href="/LadderTeam?LadderTeamID={team_id}">{player}</a></td>"#,
                "<td>{rating}</td></tr>",
            ),
            rank = rank,
            team_id = team_id,
            player = player,
            rating = rating,
        )
    }

    fn unranked_row(team_id: u32, player: &str) -> String {
        format!(
            concat!(
                "<tr ><td>Not Ranked </td><td></td>",
                r#"<td><a href="/Clans/?ID=9" title="Hawks"><img /></a>"#,
                r#"<a href="/LadderTeam?LadderTeamID={team_id}">{player}</a></td>"#,
                "<td>Not Shown</td></tr>",
            ),
            team_id = team_id,
            player = player,
        )
    }

    fn ranking_for(source: &StaticSource) -> LadderRankingPage<'_> {
        match LadderRankingPage::new(source, 4001, 0) {
            Ok(p) => p,
            Err(e) => panic!("construction failed: {e}"),
        }
    }

    #[test]
    fn test_ranked_row_fields() {
        let source = StaticSource(ranking_page(&ranked_row(3, 811, "Maculus", 2105)));
        let page = ranking_for(&source);
        assert!(matches!(page.has_records(), Ok(true)));
        let teams = match page.teams() {
            Ok(t) => t,
            Err(e) => panic!("teams failed: {e}"),
        };
        assert_eq!(teams.len(), 1);
        assert_eq!(teams[0].rank, 3);
        assert_eq!(teams[0].rank_shift, 1);
        assert_eq!(teams[0].team_id, 811);
        assert_eq!(teams[0].rating, 2105);
        assert_eq!(teams[0].players.len(), 1);
        assert_eq!(teams[0].players[0].name, "Maculus");
        assert_eq!(teams[0].players[0].clan, None);
    }

    #[test]
    fn test_unranked_row_with_clan() {
        let source = StaticSource(ranking_page(&unranked_row(812, "Drifter")));
        let teams = match ranking_for(&source).teams() {
            Ok(t) => t,
            Err(e) => panic!("teams failed: {e}"),
        };
        assert_eq!(teams[0].rank, 0);
        assert_eq!(teams[0].rating, 0);
        assert_eq!(
            teams[0].players[0].clan,
            Some((9, "Hawks".to_string()))
        );
    }

    #[test]
    fn test_empty_ranking_window() {
        let source = StaticSource(ranking_page(""));
        let page = ranking_for(&source);
        assert!(matches!(page.has_records(), Ok(false)));
        assert_eq!(page.teams().ok().map(|t| t.len()), Some(0));
    }

    fn game_page(rows: &str) -> String {
        format!(
            r#"<table><thead></thead>{rows}</table><div class="LadderGamesPager"></div>"#
        )
    }

    fn finished_game(game_id: u32, winner: u32, loser: u32, ended: &str, expired: bool) -> String {
        format!(
            concat!(
                r#"<tr style="background-color: inherit"><td>"#,
                r#"<a href="/MultiPlayer?GameID={game_id}">Game</a>{expired_tag}</td>"#,
                r#"<td><a href="?LadderTeamID={winner}">A</a> defeated <a href="?LadderTeamID={loser}">B</a></td>"#,
                r#"<td style="white-space: nowrap">{ended}</td></tr>"#,
            ),
            game_id = game_id,
            winner = winner,
            loser = loser,
            ended = ended,
            expired_tag = if expired { " (expired)" } else { "" },
        )
    }

    fn unfinished_game(game_id: u32, a: u32, b: u32) -> String {
        format!(
            concat!(
                r#"<tr style="background-color: inherit"><td>"#,
                r#"<a href="/MultiPlayer?GameID={game_id}">Game</a></td>"#,
                r#"<td><a href="?LadderTeamID={a}">A</a> vs <a href="?LadderTeamID={b}">B</a></td>"#,
                r#"<td style="white-space: nowrap"> </td></tr>"#,
            ),
            game_id = game_id,
            a = a,
            b = b,
        )
    }

    #[test]
    fn test_finished_game_rows() {
        let rows = format!(
            "{}{}",
            finished_game(501, 811, 812, "6/1/2016", false),
            finished_game(502, 813, 814, "5/30/2016", false),
        );
        let source = StaticSource(game_page(&rows));
        let page = match LadderGamePage::for_ladder(&source, 4001, 0) {
            Ok(p) => p,
            Err(e) => panic!("construction failed: {e}"),
        };
        let games = match page.games() {
            Ok(g) => g,
            Err(e) => panic!("games failed: {e}"),
        };
        assert_eq!(games.len(), 2);
        assert_eq!(games[0].game_id, 501);
        assert_eq!(games[0].winners, vec![811]);
        assert_eq!(games[0].losers, vec![812]);
        assert_eq!(games[0].end_time.as_deref(), Some("6/1/2016"));
        assert!(!games[0].expired);
    }

    #[test]
    fn test_unfinished_game_has_no_winner() {
        let source = StaticSource(game_page(&unfinished_game(503, 815, 816)));
        let page = match LadderGamePage::for_ladder(&source, 4001, 0) {
            Ok(p) => p,
            Err(e) => panic!("construction failed: {e}"),
        };
        let games = match page.games() {
            Ok(g) => g,
            Err(e) => panic!("games failed: {e}"),
        };
        assert!(games[0].winners.is_empty());
        assert_eq!(games[0].losers, vec![815, 816]);
        assert_eq!(games[0].end_time, None);
    }

    #[test]
    fn test_expired_game_flag() {
        let html = finished_game(504, 811, 812, "6/2/2016", true);
        let source = StaticSource(game_page(&html));
        let page = match LadderGamePage::for_ladder(&source, 4001, 0) {
            Ok(p) => p,
            Err(e) => panic!("construction failed: {e}"),
        };
        let games = match page.games() {
            Ok(g) => g,
            Err(e) => panic!("games failed: {e}"),
        };
        assert!(games[0].expired);
    }

    #[test]
    fn test_ladder_size() {
        let source =
            StaticSource("<td>There are currently 1337 teams on this ladder.</td>".to_string());
        let page = match LadderPage::new(&source, 4001) {
            Ok(p) => p,
            Err(e) => panic!("construction failed: {e}"),
        };
        assert_eq!(page.size().ok(), Some(1337));
    }
}
