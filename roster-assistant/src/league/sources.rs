// Roster and projection import.
//
// CSV formats:
//   rosters   team_name,player_name,position
//   batters   player_name,position,AB,R,HR,RBI,SB,AVG,OPS
//   pitchers  player_name,position,IP,ERA,WHIP,K9,QS,SV
//
// Default data for a twelve-team league is compiled into the binary; any of
// the three files can be overridden from league.toml.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use tracing::{info, warn};

use super::position::Position;
use super::{RosterEntry, TeamRoster};
use crate::config::SourcesConfig;
use crate::stats::projection::{BatterProjection, PitcherProjection, Projection};

const DEFAULT_ROSTERS: &str = include_str!("../../data/rosters.csv");
const DEFAULT_BATTERS: &str = include_str!("../../data/batter_projections.csv");
const DEFAULT_PITCHERS: &str = include_str!("../../data/pitcher_projections.csv");

/// Relievers by the usual rule of thumb when a pitcher row has no position.
const RELIEVER_MAX_IP: f64 = 100.0;

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// A projection row as imported, before it joins the pool.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportedProjection {
    pub name: String,
    pub position: Position,
    pub projection: Projection,
}

/// Everything needed to build a league from scratch.
#[derive(Debug, Clone, Default)]
pub struct SeedData {
    pub rosters: BTreeMap<String, TeamRoster>,
    pub batters: Vec<ImportedProjection>,
    pub pitchers: Vec<ImportedProjection>,
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },

    #[error("validation error: {0}")]
    Validation(String),
}

// ---------------------------------------------------------------------------
// Raw CSV serde structs (private)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct RawRosterRow {
    #[serde(alias = "team")]
    team_name: String,
    #[serde(alias = "name", alias = "player")]
    player_name: String,
    position: String,
}

#[derive(Debug, Deserialize)]
#[allow(non_snake_case)]
struct RawBatterRow {
    #[serde(alias = "name", alias = "Name")]
    player_name: String,
    #[serde(default)]
    position: String,
    AB: f64,
    R: f64,
    HR: f64,
    RBI: f64,
    SB: f64,
    #[serde(alias = "BA")]
    AVG: f64,
    OPS: f64,
}

#[derive(Debug, Deserialize)]
#[allow(non_snake_case)]
struct RawPitcherRow {
    #[serde(alias = "name", alias = "Name")]
    player_name: String,
    #[serde(default)]
    position: String,
    IP: f64,
    ERA: f64,
    WHIP: f64,
    #[serde(alias = "K/9")]
    K9: f64,
    QS: f64,
    SV: f64,
}

fn all_finite(values: &[f64]) -> bool {
    values.iter().all(|v| v.is_finite())
}

fn non_negative(values: &[f64]) -> bool {
    values.iter().all(|v| *v >= 0.0)
}

// ---------------------------------------------------------------------------
// Reader-based loaders
// ---------------------------------------------------------------------------

fn load_rosters_from_reader<R: Read>(rdr: R) -> Result<BTreeMap<String, TeamRoster>, csv::Error> {
    let mut reader = csv::Reader::from_reader(rdr);
    let mut rosters: BTreeMap<String, TeamRoster> = BTreeMap::new();
    let mut seen: HashMap<String, String> = HashMap::new();

    for result in reader.deserialize::<RawRosterRow>() {
        let raw = match result {
            Ok(raw) => raw,
            Err(e) => {
                warn!("skipping malformed roster row: {}", e);
                continue;
            }
        };
        let team = raw.team_name.trim().to_string();
        let name = raw.player_name.trim().to_string();
        if team.is_empty() || name.is_empty() {
            warn!("skipping roster row with an empty team or player name");
            continue;
        }
        let Some(position) = Position::from_str_pos(&raw.position) else {
            warn!("skipping '{}' on '{}': unknown position '{}'", name, team, raw.position);
            continue;
        };
        if let Some(existing) = seen.get(&name) {
            warn!(
                "'{}' is already on '{}'; ignoring duplicate entry for '{}'",
                name, existing, team
            );
            continue;
        }
        seen.insert(name.clone(), team.clone());
        rosters
            .entry(team)
            .or_default()
            .players
            .push(RosterEntry::new(name, position));
    }
    Ok(rosters)
}

fn load_batters_from_reader<R: Read>(rdr: R) -> Result<Vec<ImportedProjection>, csv::Error> {
    let mut reader = csv::Reader::from_reader(rdr);
    let mut batters = Vec::new();
    let mut seen = HashSet::new();

    for result in reader.deserialize::<RawBatterRow>() {
        let raw = match result {
            Ok(raw) => raw,
            Err(e) => {
                warn!("skipping malformed batter row: {}", e);
                continue;
            }
        };
        let name = raw.player_name.trim().to_string();
        let values = [raw.AB, raw.R, raw.HR, raw.RBI, raw.SB, raw.AVG, raw.OPS];
        if !all_finite(&values) || !non_negative(&values) {
            warn!("skipping batter '{}': invalid stat value", name);
            continue;
        }
        let position = if raw.position.trim().is_empty() {
            Position::DesignatedHitter
        } else {
            match Position::from_str_pos(&raw.position) {
                Some(pos) if pos.is_hitter() => pos,
                _ => {
                    warn!("skipping batter '{}': bad position '{}'", name, raw.position);
                    continue;
                }
            }
        };
        if !seen.insert(name.clone()) {
            warn!("duplicate batter projection for '{}', keeping the first", name);
            continue;
        }
        batters.push(ImportedProjection {
            name,
            position,
            projection: Projection::Batter(BatterProjection {
                ab: raw.AB.round() as u32,
                r: raw.R.round() as u32,
                hr: raw.HR.round() as u32,
                rbi: raw.RBI.round() as u32,
                sb: raw.SB.round() as u32,
                avg: raw.AVG,
                ops: raw.OPS,
            }),
        });
    }
    Ok(batters)
}

fn load_pitchers_from_reader<R: Read>(rdr: R) -> Result<Vec<ImportedProjection>, csv::Error> {
    let mut reader = csv::Reader::from_reader(rdr);
    let mut pitchers = Vec::new();
    let mut seen = HashSet::new();

    for result in reader.deserialize::<RawPitcherRow>() {
        let raw = match result {
            Ok(raw) => raw,
            Err(e) => {
                warn!("skipping malformed pitcher row: {}", e);
                continue;
            }
        };
        let name = raw.player_name.trim().to_string();
        let values = [raw.IP, raw.ERA, raw.WHIP, raw.K9, raw.QS, raw.SV];
        if !all_finite(&values) || !non_negative(&values) {
            warn!("skipping pitcher '{}': invalid stat value", name);
            continue;
        }
        let position = if raw.position.trim().is_empty() {
            if raw.SV > 0.0 || raw.IP < RELIEVER_MAX_IP {
                Position::ReliefPitcher
            } else {
                Position::StartingPitcher
            }
        } else {
            match Position::from_str_pos(&raw.position) {
                Some(pos) if pos.is_pitcher() => pos,
                _ => {
                    warn!("skipping pitcher '{}': bad position '{}'", name, raw.position);
                    continue;
                }
            }
        };
        if !seen.insert(name.clone()) {
            warn!("duplicate pitcher projection for '{}', keeping the first", name);
            continue;
        }
        pitchers.push(ImportedProjection {
            name,
            position,
            projection: Projection::Pitcher(PitcherProjection {
                ip: raw.IP,
                era: raw.ERA,
                whip: raw.WHIP,
                k9: raw.K9,
                qs: raw.QS.round() as u32,
                sv: raw.SV.round() as u32,
            }),
        });
    }
    Ok(pitchers)
}

// ---------------------------------------------------------------------------
// Public path-based loaders
// ---------------------------------------------------------------------------

fn open(path: &Path) -> Result<std::fs::File, SourceError> {
    std::fs::File::open(path).map_err(|e| SourceError::Io {
        path: path.display().to_string(),
        source: e,
    })
}

fn csv_err(path: &Path) -> impl FnOnce(csv::Error) -> SourceError + '_ {
    move |e| SourceError::Csv {
        path: path.display().to_string(),
        source: e,
    }
}

pub fn load_rosters(path: &Path) -> Result<BTreeMap<String, TeamRoster>, SourceError> {
    let rosters = load_rosters_from_reader(open(path)?).map_err(csv_err(path))?;
    if rosters.is_empty() {
        return Err(SourceError::Validation(format!(
            "{} produced zero valid roster rows",
            path.display()
        )));
    }
    Ok(rosters)
}

pub fn load_batter_projections(path: &Path) -> Result<Vec<ImportedProjection>, SourceError> {
    load_batters_from_reader(open(path)?).map_err(csv_err(path))
}

pub fn load_pitcher_projections(path: &Path) -> Result<Vec<ImportedProjection>, SourceError> {
    load_pitchers_from_reader(open(path)?).map_err(csv_err(path))
}

// ---------------------------------------------------------------------------
// Embedded defaults
// ---------------------------------------------------------------------------

pub fn default_rosters() -> Result<BTreeMap<String, TeamRoster>, SourceError> {
    load_rosters_from_reader(DEFAULT_ROSTERS.as_bytes()).map_err(csv_err(Path::new("<embedded rosters>")))
}

pub fn default_batter_projections() -> Result<Vec<ImportedProjection>, SourceError> {
    load_batters_from_reader(DEFAULT_BATTERS.as_bytes())
        .map_err(csv_err(Path::new("<embedded batters>")))
}

pub fn default_pitcher_projections() -> Result<Vec<ImportedProjection>, SourceError> {
    load_pitchers_from_reader(DEFAULT_PITCHERS.as_bytes())
        .map_err(csv_err(Path::new("<embedded pitchers>")))
}

/// Load one source, preferring the configured file and falling back to the
/// embedded copy when it is unset or unreadable.
fn load_or_default<T>(
    what: &str,
    configured: Option<&str>,
    load: impl FnOnce(&Path) -> Result<T, SourceError>,
    fallback: impl FnOnce() -> Result<T, SourceError>,
) -> Result<T, SourceError> {
    match configured.filter(|p| !p.trim().is_empty()) {
        Some(path) => match load(Path::new(path)) {
            Ok(data) => {
                info!("Loaded {} from {}", what, path);
                Ok(data)
            }
            Err(e) => {
                warn!("Could not load {} from {} ({}); using built-in data", what, path, e);
                fallback()
            }
        },
        None => fallback(),
    }
}

/// Load rosters and projections for a fresh league.
pub fn load_seed_data(sources: &SourcesConfig) -> Result<SeedData, SourceError> {
    let rosters = load_or_default(
        "rosters",
        sources.teams_file.as_deref(),
        load_rosters,
        default_rosters,
    )?;
    let batters = load_or_default(
        "batter projections",
        sources.batter_file.as_deref(),
        load_batter_projections,
        default_batter_projections,
    )?;
    let pitchers = load_or_default(
        "pitcher projections",
        sources.pitcher_file.as_deref(),
        load_pitcher_projections,
        default_pitcher_projections,
    )?;
    Ok(SeedData {
        rosters,
        batters,
        pitchers,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
