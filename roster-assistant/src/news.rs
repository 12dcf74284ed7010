// Player news: templated items generated from each update pass.

use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::league::transactions::RosterMove;
use crate::league::LeagueState;
use crate::stats::aggregator::{BatterIncrement, PitcherIncrement};

/// Items kept in the feed; older ones fall off.
pub const MAX_NEWS_ITEMS: usize = 50;

const INJURIES: &[&str] = &[
    "hamstring strain",
    "oblique tightness",
    "sprained ankle",
    "back spasms",
    "wrist contusion",
    "shoulder inflammation",
    "forearm tightness",
];

const STATUSES: &[&str] = &[
    "placed on the 10-day IL",
    "listed as day-to-day",
    "expected to miss two weeks",
    "scratched from the lineup",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NewsKind {
    Performance,
    Injury,
    Transaction,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsItem {
    pub published_at: DateTime<Utc>,
    pub player: String,
    #[serde(default)]
    pub team: Option<String>,
    pub kind: NewsKind,
    pub headline: String,
}

/// What a player did in this pass's game.
#[derive(Debug, Clone, PartialEq)]
pub enum GameLog {
    Batting {
        player: String,
        game: BatterIncrement,
    },
    Pitching {
        player: String,
        outing: PitcherIncrement,
    },
}

fn performance_headline(log: &GameLog) -> Option<(String, String)> {
    match log {
        GameLog::Batting { player, game } => {
            let headline = if game.hr >= 2 {
                format!("{player} homers {} times and drives in {}", game.hr, game.rbi)
            } else if game.h >= 3 {
                format!("{player} goes {}-for-{} at the plate", game.h, game.ab)
            } else if game.sb > 0 && game.h > 0 {
                format!("{player} reaches and swipes a bag")
            } else {
                return None;
            };
            Some((player.clone(), headline))
        }
        GameLog::Pitching { player, outing } => {
            let headline = if outing.k >= 8 {
                format!("{player} strikes out {} over {:.1} innings", outing.k, outing.ip)
            } else if outing.quality_start && outing.win {
                format!("{player} earns the win with a quality start")
            } else if outing.save {
                format!("{player} slams the door for the save")
            } else {
                return None;
            };
            Some((player.clone(), headline))
        }
    }
}

/// News for notable games in this pass.
pub fn performance_news(
    logs: &[GameLog],
    state: &LeagueState,
    now: DateTime<Utc>,
) -> Vec<NewsItem> {
    logs.iter()
        .filter_map(performance_headline)
        .map(|(player, headline)| NewsItem {
            published_at: now,
            team: state.team_of(&player).map(str::to_string),
            player,
            kind: NewsKind::Performance,
            headline,
        })
        .collect()
}

/// Each rostered player gets a `chance` of an injury report.
pub fn injury_news(
    state: &LeagueState,
    chance: f64,
    rng: &mut impl Rng,
    now: DateTime<Utc>,
) -> Vec<NewsItem> {
    let mut items = Vec::new();
    for (team, roster) in &state.rosters {
        for entry in &roster.players {
            if !rng.gen_bool(chance) {
                continue;
            }
            let injury = INJURIES.choose(rng).copied().unwrap_or("undisclosed injury");
            let status = STATUSES.choose(rng).copied().unwrap_or("day-to-day");
            items.push(NewsItem {
                published_at: now,
                player: entry.name.clone(),
                team: Some(team.clone()),
                kind: NewsKind::Injury,
                headline: format!("{} ({}) {} with a {}", entry.name, entry.position, status, injury),
            });
        }
    }
    items
}

pub fn transaction_news(moves: &[RosterMove], now: DateTime<Utc>) -> Vec<NewsItem> {
    moves
        .iter()
        .map(|mv| NewsItem {
            published_at: now,
            player: mv.added.name.clone(),
            team: Some(mv.team.clone()),
            kind: NewsKind::Transaction,
            headline: format!(
                "{} claim {} ({}) and release {} ({})",
                mv.team, mv.added.name, mv.added.position, mv.dropped.name, mv.dropped.position
            ),
        })
        .collect()
}

/// Prepend new items (newest first) and cap the feed.
pub fn push_news(feed: &mut Vec<NewsItem>, items: Vec<NewsItem>) {
    if items.is_empty() {
        return;
    }
    let mut merged = items;
    merged.append(feed);
    merged.truncate(MAX_NEWS_ITEMS);
    *feed = merged;
}
