// League state: team rosters, the player pool's season lines and projections,
// and the news feed.

pub mod bootstrap;
pub mod position;
pub mod sources;
pub mod transactions;

use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::news::NewsItem;
use crate::stats::line::PlayerStats;
use crate::stats::projection::Projection;
use position::Position;

// ---------------------------------------------------------------------------
// Rosters
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub name: String,
    pub position: Position,
}

impl RosterEntry {
    pub fn new(name: impl Into<String>, position: Position) -> Self {
        Self {
            name: name.into(),
            position,
        }
    }
}

/// One fantasy team's players, in roster order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamRoster {
    pub players: Vec<RosterEntry>,
}

impl TeamRoster {
    pub fn contains(&self, name: &str) -> bool {
        self.players.iter().any(|p| p.name == name)
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn batters(&self) -> impl Iterator<Item = &RosterEntry> {
        self.players.iter().filter(|p| p.position.is_hitter())
    }

    pub fn pitchers(&self) -> impl Iterator<Item = &RosterEntry> {
        self.players.iter().filter(|p| p.position.is_pitcher())
    }

    /// Players sorted by position for display.
    pub fn sorted_by_position(&self) -> Vec<&RosterEntry> {
        let mut players: Vec<&RosterEntry> = self.players.iter().collect();
        players.sort_by_key(|p| p.position.sort_order());
        players
    }
}

// ---------------------------------------------------------------------------
// LeagueState
// ---------------------------------------------------------------------------

/// Everything the assistant knows about the league. Ordered maps keep
/// iteration (and therefore seeded simulation) deterministic.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LeagueState {
    pub league_id: String,
    pub rosters: BTreeMap<String, TeamRoster>,
    pub stats: BTreeMap<String, PlayerStats>,
    pub projections: BTreeMap<String, Projection>,
    pub news: Vec<NewsItem>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl LeagueState {
    pub fn has_team(&self, team: &str) -> bool {
        self.rosters.contains_key(team)
    }

    /// The team a player is rostered on, if any.
    pub fn team_of(&self, player: &str) -> Option<&str> {
        self.rosters
            .iter()
            .find(|(_, roster)| roster.contains(player))
            .map(|(team, _)| team.as_str())
    }

    pub fn rostered_names(&self) -> HashSet<&str> {
        self.rosters
            .values()
            .flat_map(|r| r.players.iter().map(|p| p.name.as_str()))
            .collect()
    }

    /// Players in the pool that are on no roster, in name order.
    pub fn free_agents(&self) -> Vec<&str> {
        let rostered = self.rostered_names();
        self.stats
            .keys()
            .map(String::as_str)
            .filter(|name| !rostered.contains(name))
            .collect()
    }
}
