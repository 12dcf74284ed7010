// JSON persistence for league state, with timestamped archive copies.
//
// Every file of a snapshot is serialized before anything touches disk, then
// each one is written to a temp file and renamed into place.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::analysis::free_agents::FreeAgentEntry;
use crate::league::{LeagueState, TeamRoster};
use crate::news::NewsItem;
use crate::stats::line::PlayerStats;
use crate::stats::projection::Projection;

pub const ROSTERS_FILE: &str = "rosters.json";
pub const STATS_FILE: &str = "player_stats.json";
pub const PROJECTIONS_FILE: &str = "projections.json";
pub const FREE_AGENTS_FILE: &str = "free_agents.json";
pub const NEWS_FILE: &str = "news.json";

const ARCHIVE_DIR: &str = "archive";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Rosters plus the snapshot's identifying metadata.
#[derive(Debug, Serialize, Deserialize)]
struct RostersFile {
    league_id: String,
    #[serde(default)]
    updated_at: Option<DateTime<Utc>>,
    teams: BTreeMap<String, TeamRoster>,
}

pub struct JsonStore {
    data_dir: PathBuf,
    archive: bool,
}

impl JsonStore {
    pub fn new(data_dir: impl Into<PathBuf>, archive: bool) -> Self {
        Self {
            data_dir: data_dir.into(),
            archive,
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Load the last saved snapshot. Returns `Ok(None)` when no snapshot
    /// exists; a missing news file just means an empty feed.
    pub fn load(&self) -> Result<Option<LeagueState>, StoreError> {
        let Some(rosters) = self.read_json::<RostersFile>(ROSTERS_FILE)? else {
            return Ok(None);
        };
        let Some(stats) = self.read_json::<BTreeMap<String, PlayerStats>>(STATS_FILE)? else {
            return Ok(None);
        };
        let Some(projections) = self.read_json::<BTreeMap<String, Projection>>(PROJECTIONS_FILE)?
        else {
            return Ok(None);
        };
        let news = self
            .read_json::<Vec<NewsItem>>(NEWS_FILE)?
            .unwrap_or_default();

        info!(
            "Loaded league {} from {} ({} players)",
            rosters.league_id,
            self.data_dir.display(),
            stats.len()
        );
        Ok(Some(LeagueState {
            league_id: rosters.league_id,
            rosters: rosters.teams,
            stats,
            projections,
            news,
            updated_at: rosters.updated_at,
        }))
    }

    /// Write a full snapshot, plus archive copies stamped with `now` when
    /// archiving is enabled.
    pub fn save(
        &self,
        state: &LeagueState,
        free_agents: &[FreeAgentEntry],
        now: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let rosters = RostersFile {
            league_id: state.league_id.clone(),
            updated_at: state.updated_at,
            teams: state.rosters.clone(),
        };
        let files = [
            (ROSTERS_FILE, self.to_json(ROSTERS_FILE, &rosters)?),
            (STATS_FILE, self.to_json(STATS_FILE, &state.stats)?),
            (PROJECTIONS_FILE, self.to_json(PROJECTIONS_FILE, &state.projections)?),
            (FREE_AGENTS_FILE, self.to_json(FREE_AGENTS_FILE, &free_agents)?),
            (NEWS_FILE, self.to_json(NEWS_FILE, &state.news)?),
        ];

        create_dir(&self.data_dir)?;
        for (name, body) in &files {
            let path = self.data_dir.join(name);
            write_atomic(&path, body)?;
            debug!("wrote {}", path.display());
        }

        if self.archive {
            let archive_dir = self.data_dir.join(ARCHIVE_DIR);
            create_dir(&archive_dir)?;
            let stamp = now.format("%Y%m%d_%H%M%S");
            for (name, body) in &files {
                let stem = name.trim_end_matches(".json");
                let path = archive_dir.join(format!("{stem}_{stamp}.json"));
                write_atomic(&path, body)?;
            }
        }

        info!("Saved league {} to {}", state.league_id, self.data_dir.display());
        Ok(())
    }

    fn to_json<T: Serialize + ?Sized>(&self, name: &str, value: &T) -> Result<String, StoreError> {
        serde_json::to_string_pretty(value).map_err(|source| StoreError::Json {
            path: self.data_dir.join(name),
            source,
        })
    }

    fn read_json<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>, StoreError> {
        let path = self.data_dir.join(name);
        let contents = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(StoreError::Io { path, source }),
        };
        serde_json::from_str(&contents)
            .map(Some)
            .map_err(|source| StoreError::Json { path, source })
    }
}

fn create_dir(dir: &Path) -> Result<(), StoreError> {
    std::fs::create_dir_all(dir).map_err(|source| StoreError::Io {
        path: dir.to_path_buf(),
        source,
    })
}

fn write_atomic(path: &Path, body: &str) -> Result<(), StoreError> {
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, body).map_err(|source| StoreError::Io {
        path: tmp.clone(),
        source,
    })?;
    std::fs::rename(&tmp, path).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })
}
