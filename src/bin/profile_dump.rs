//! Fetches one player profile and prints its fields as JSON.
//!
//! Usage: `profile_dump <player-id>`

use std::process::ExitCode;

use serde::Serialize;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use rs_wlparse::entities::player::{
    FavoriteMap, LadderStanding, PlayerPage, RankedSummary, Tournament,
};
use rs_wlparse::{HttpSource, Result};

#[derive(Serialize)]
struct ProfileDump {
    id: u32,
    name: String,
    level: i64,
    points_last_30_days: i64,
    location: String,
    is_member: bool,
    joined: String,
    current_games: i64,
    played_games: i64,
    percent_realtime: f64,
    last_seen_hours: f64,
    boot_count: i64,
    boot_rate: f64,
    clan_id: Option<u32>,
    clan_name: String,
    tournaments: Vec<Tournament>,
    ladder_stats: Vec<LadderStanding>,
    ranked: RankedSummary,
    favorite_maps: Vec<FavoriteMap>,
    achievement_rate: i64,
}

fn dump(id: u32) -> Result<ProfileDump> {
    let source = HttpSource::with_defaults()?;
    let player = PlayerPage::new(&source, id)?;
    Ok(ProfileDump {
        id,
        name: player.name()?,
        level: player.level()?,
        points_last_30_days: player.points_last_30_days()?,
        location: player.location()?,
        is_member: player.is_member()?,
        joined: player.joined()?.to_string(),
        current_games: player.current_games()?,
        played_games: player.played_games()?,
        percent_realtime: player.percent_realtime()?,
        last_seen_hours: player.last_seen_hours()?,
        boot_count: player.boot_count()?,
        boot_rate: player.boot_rate()?,
        clan_id: player.clan_id()?,
        clan_name: player.clan_name()?,
        tournaments: player.tournaments()?,
        ladder_stats: player.ladder_stats()?,
        ranked: player.ranked_summary()?,
        favorite_maps: player.favorite_maps()?,
        achievement_rate: player.achievement_rate()?,
    })
}

fn main() -> ExitCode {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let Some(id) = std::env::args().nth(1).and_then(|arg| arg.parse().ok()) else {
        eprintln!("usage: profile_dump <player-id>");
        return ExitCode::FAILURE;
    };

    info!(id, "fetching profile");
    match dump(id) {
        Ok(profile) => match serde_json::to_string_pretty(&profile) {
            Ok(json) => {
                println!("{json}");
                ExitCode::SUCCESS
            }
            Err(err) => {
                eprintln!("serialization failed: {err}");
                ExitCode::FAILURE
            }
        },
        Err(err) => {
            eprintln!("profile {id} failed: {err}");
            ExitCode::FAILURE
        }
    }
}
