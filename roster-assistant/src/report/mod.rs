// Markdown reports regenerated after every pass.

pub mod free_agents;
pub mod markdown;
pub mod news;
pub mod team;
pub mod trending;

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::info;

use crate::analysis::LeagueAnalysis;
use crate::config::Config;
use crate::league::LeagueState;

pub const TEAM_ANALYSIS_FILE: &str = "team_analysis.md";
pub const FREE_AGENTS_FILE: &str = "free_agents.md";
pub const TRENDING_FILE: &str = "trending_players.md";
pub const NEWS_FILE: &str = "player_news.md";

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("failed to write report {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Render all four reports into `dir`, creating it if needed. Returns the
/// paths written.
pub fn write_reports(
    dir: &Path,
    state: &LeagueState,
    analysis: &LeagueAnalysis,
    config: &Config,
    now: DateTime<Utc>,
) -> Result<Vec<PathBuf>, ReportError> {
    std::fs::create_dir_all(dir).map_err(|source| ReportError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let my_team = config.league.my_team.as_str();
    let pages = [
        (TEAM_ANALYSIS_FILE, team::render(state, analysis, my_team, now)),
        (
            FREE_AGENTS_FILE,
            free_agents::render(
                &analysis.free_agents,
                config.strategy.reports.players_per_group,
                now,
            ),
        ),
        (TRENDING_FILE, trending::render(&analysis.trending, now)),
        (NEWS_FILE, news::render(&state.news, my_team, now)),
    ];

    let mut written = Vec::with_capacity(pages.len());
    for (name, body) in pages {
        let path = dir.join(name);
        std::fs::write(&path, body).map_err(|source| ReportError::Io {
            path: path.clone(),
            source,
        })?;
        written.push(path);
    }
    info!("Wrote {} reports to {}", written.len(), dir.display());
    Ok(written)
}
