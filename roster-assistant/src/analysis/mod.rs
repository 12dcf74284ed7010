// League analysis: standings, my-team breakdown, free agents and trends.

pub mod free_agents;
pub mod team;
pub mod trending;

use tracing::warn;

use crate::config::Config;
use crate::league::LeagueState;
use free_agents::FreeAgentEntry;
use team::{LeagueRankings, TeamAnalysis};
use trending::TrendingReport;

/// Everything the reports are rendered from.
#[derive(Debug, Clone)]
pub struct LeagueAnalysis {
    pub rankings: LeagueRankings,
    /// `None` when the configured team is not in the league.
    pub my_team: Option<TeamAnalysis>,
    pub free_agents: Vec<FreeAgentEntry>,
    pub trending: TrendingReport,
}

pub fn analyze_league(state: &LeagueState, config: &Config) -> LeagueAnalysis {
    let rankings = team::rank_teams(state);
    let my_team = team::analyze_team(state, &rankings, &config.league.my_team);
    if my_team.is_none() {
        warn!(
            "team '{}' not found in league {}; skipping team analysis",
            config.league.my_team, state.league_id
        );
    }
    LeagueAnalysis {
        my_team,
        free_agents: free_agents::score_free_agents(state, &config.strategy.category_weights),
        trending: trending::find_trending(state, config.strategy.reports.trending_count),
        rankings,
    }
}
