// Configuration loading and parsing (league.toml, strategy.toml).

use chrono::{NaiveTime, Weekday};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// Top-level assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    pub league: LeagueConfig,
    pub strategy: StrategyConfig,
    /// Parsed from `strategy.schedule` during validation.
    pub schedule: Schedule,
}

/// Validated daemon schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schedule {
    pub daily_time: NaiveTime,
    pub weekly_day: Weekday,
}

// ---------------------------------------------------------------------------
// league.toml structs
// ---------------------------------------------------------------------------

/// Wrapper for the top-level `[league]` table in league.toml.
#[derive(Debug, Clone, Deserialize)]
struct LeagueFile {
    league: LeagueConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LeagueConfig {
    pub id: String,
    pub name: String,
    pub my_team: String,
    #[serde(default)]
    pub sources: SourcesConfig,
}

/// Optional CSV overrides for the built-in rosters and projections.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SourcesConfig {
    pub teams_file: Option<String>,
    pub batter_file: Option<String>,
    pub pitcher_file: Option<String>,
}

// ---------------------------------------------------------------------------
// strategy.toml structs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct StrategyConfig {
    pub category_weights: CategoryWeights,
    pub storage: StorageConfig,
    pub reports: ReportsConfig,
    pub simulation: SimulationConfig,
    pub schedule: ScheduleSection,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CategoryWeights {
    pub batters: BatterWeights,
    pub pitchers: PitcherWeights,
}

/// Free-agent scoring weights. Field names use UPPERCASE to match the TOML
/// keys (R, HR, ...).
#[derive(Debug, Clone, Deserialize)]
#[allow(non_snake_case)]
pub struct BatterWeights {
    pub R: f64,
    pub HR: f64,
    pub RBI: f64,
    pub SB: f64,
    pub AVG: f64,
    pub OPS: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[allow(non_snake_case)]
pub struct PitcherWeights {
    pub IP: f64,
    pub ERA: f64,
    pub WHIP: f64,
    pub K9: f64,
    pub QS: f64,
    pub SV: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub data_dir: String,
    #[serde(default = "default_true")]
    pub archive: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReportsConfig {
    pub dir: String,
    pub players_per_group: usize,
    pub trending_count: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SimulationConfig {
    #[serde(default)]
    pub seed: Option<u64>,
    pub bootstrap_games: u32,
    pub transaction_chance: f64,
    pub injury_chance: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleSection {
    pub daily_time: String,
    pub weekly_day: String,
}

fn default_true() -> bool {
    true
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Config file names under `config/`.
const LEAGUE_FILE: &str = "league.toml";
const STRATEGY_FILE: &str = "strategy.toml";

/// Read `base_dir/config/{league,strategy}.toml`, parse the schedule and
/// validate. Does not touch `defaults/`; see [`load_config_in`].
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let config_dir = base_dir.join("config");
    let league: LeagueFile = parse_toml(&config_dir.join(LEAGUE_FILE))?;
    let strategy: StrategyConfig = parse_toml(&config_dir.join(STRATEGY_FILE))?;

    let config = Config {
        schedule: parse_schedule(&strategy.schedule)?,
        league: league.league,
        strategy,
    };
    validate(&config)?;
    Ok(config)
}

fn copy_error(message: String) -> ConfigError {
    ConfigError::DefaultsCopyError { message }
}

/// Copy every file in `defaults/` that is missing from `config/`, except
/// `*.example` files. Existing config files are never overwritten. Returns
/// the files copied.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let defaults_dir = base_dir.join("defaults");
    let config_dir = base_dir.join("config");

    if !defaults_dir.is_dir() {
        return if config_dir.is_dir() {
            Ok(Vec::new())
        } else {
            Err(copy_error(format!(
                "neither defaults/ nor config/ directory found in {}; \
                 run from the project root or pass --config-dir",
                base_dir.display()
            )))
        };
    }

    std::fs::create_dir_all(&config_dir)
        .map_err(|e| copy_error(format!("cannot create {}: {e}", config_dir.display())))?;

    let mut sources: Vec<PathBuf> = std::fs::read_dir(&defaults_dir)
        .map_err(|e| copy_error(format!("cannot list {}: {e}", defaults_dir.display())))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file())
        .filter(|path| path.extension().is_some_and(|ext| ext != "example"))
        .collect();
    sources.sort();

    let mut copied = Vec::new();
    for source in sources {
        let Some(name) = source.file_name() else {
            continue;
        };
        let target = config_dir.join(name);
        // create_new keeps a config file that appeared since the listing.
        let mut dest = match std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&target)
        {
            Ok(f) => f,
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => continue,
            Err(e) => return Err(copy_error(format!("cannot create {}: {e}", target.display()))),
        };
        let mut src = std::fs::File::open(&source)
            .map_err(|e| copy_error(format!("cannot open {}: {e}", source.display())))?;
        std::io::copy(&mut src, &mut dest)
            .map_err(|e| copy_error(format!("cannot write {}: {e}", target.display())))?;
        copied.push(target);
    }
    Ok(copied)
}

/// Copy missing defaults into `base_dir/config` and load from there.
pub fn load_config_in(base_dir: &Path) -> Result<Config, ConfigError> {
    ensure_config_files(base_dir)?;
    load_config_from(base_dir)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn parse_toml<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })?;
    toml::from_str(&text).map_err(|source| ConfigError::ParseError {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_schedule(section: &ScheduleSection) -> Result<Schedule, ConfigError> {
    let daily_time = NaiveTime::parse_from_str(section.daily_time.trim(), "%H:%M").map_err(|e| {
        ConfigError::ValidationError {
            field: "schedule.daily_time".into(),
            message: format!("expected HH:MM, got '{}' ({e})", section.daily_time),
        }
    })?;
    let weekly_day: Weekday =
        section
            .weekly_day
            .trim()
            .parse()
            .map_err(|_| ConfigError::ValidationError {
                field: "schedule.weekly_day".into(),
                message: format!("expected a weekday like Mon, got '{}'", section.weekly_day),
            })?;
    Ok(Schedule {
        daily_time,
        weekly_day,
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.league.id.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "league.id".into(),
            message: "must not be empty".into(),
        });
    }
    if config.league.my_team.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "league.my_team".into(),
            message: "must not be empty".into(),
        });
    }

    let b = &config.strategy.category_weights.batters;
    let p = &config.strategy.category_weights.pitchers;
    let weight_fields: &[(&str, f64)] = &[
        ("weights.batters.R", b.R),
        ("weights.batters.HR", b.HR),
        ("weights.batters.RBI", b.RBI),
        ("weights.batters.SB", b.SB),
        ("weights.batters.AVG", b.AVG),
        ("weights.batters.OPS", b.OPS),
        ("weights.pitchers.IP", p.IP),
        ("weights.pitchers.ERA", p.ERA),
        ("weights.pitchers.WHIP", p.WHIP),
        ("weights.pitchers.K9", p.K9),
        ("weights.pitchers.QS", p.QS),
        ("weights.pitchers.SV", p.SV),
    ];
    for (name, val) in weight_fields {
        if *val <= 0.0 {
            return Err(ConfigError::ValidationError {
                field: name.to_string(),
                message: format!("must be > 0, got {val}"),
            });
        }
    }

    let sim = &config.strategy.simulation;
    for (name, val) in [
        ("simulation.transaction_chance", sim.transaction_chance),
        ("simulation.injury_chance", sim.injury_chance),
    ] {
        if !(0.0..=1.0).contains(&val) {
            return Err(ConfigError::ValidationError {
                field: name.into(),
                message: format!("must be between 0.0 and 1.0 inclusive, got {val}"),
            });
        }
    }

    let reports = &config.strategy.reports;
    for (name, val) in [
        ("reports.players_per_group", reports.players_per_group),
        ("reports.trending_count", reports.trending_count),
    ] {
        if val == 0 {
            return Err(ConfigError::ValidationError {
                field: name.into(),
                message: "must be > 0".into(),
            });
        }
    }

    for (name, val) in [
        ("storage.data_dir", &config.strategy.storage.data_dir),
        ("reports.dir", &config.strategy.reports.dir),
    ] {
        if val.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                field: name.into(),
                message: "must not be empty".into(),
            });
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    /// Helper: returns the path to the roster-assistant crate root
    /// (works whether `cargo test` runs from the crate root or repo root).
    fn project_root() -> PathBuf {
        let cwd = std::env::current_dir().unwrap();
        if cwd.join("defaults").exists() {
            cwd
        } else if cwd.join("roster-assistant/defaults").exists() {
            cwd.join("roster-assistant")
        } else {
            panic!("Cannot locate defaults/ directory from CWD {:?}", cwd);
        }
    }

    /// A temp dir whose config/ holds copies of the shipped defaults, with
    /// an optional text substitution applied to strategy.toml.
    fn config_with_strategy_edit(from: &str, to: &str) -> tempfile::TempDir {
        let tmp = tempfile::tempdir().unwrap();
        let config_dir = tmp.path().join("config");
        fs::create_dir_all(&config_dir).unwrap();
        let root = project_root();
        fs::copy(root.join("defaults/league.toml"), config_dir.join("league.toml")).unwrap();
        let strategy = fs::read_to_string(root.join("defaults/strategy.toml")).unwrap();
        assert!(strategy.contains(from), "defaults/strategy.toml lacks '{from}'");
        fs::write(config_dir.join("strategy.toml"), strategy.replace(from, to)).unwrap();
        tmp
    }

    fn expect_field(err: ConfigError, expected: &str) {
        match err {
            ConfigError::ValidationError { field, .. } => assert_eq!(field, expected),
            other => panic!("expected ValidationError, got: {other}"),
        }
    }

    #[test]
    fn load_valid_config_from_project_files() {
        let tmp = tempfile::tempdir().unwrap();
        let root = project_root();
        fs::create_dir_all(tmp.path().join("defaults")).unwrap();
        for f in ["league.toml", "strategy.toml"] {
            fs::copy(root.join("defaults").join(f), tmp.path().join("defaults").join(f)).unwrap();
        }
        let config = load_config_in(tmp.path()).expect("should load valid config");

        assert_eq!(config.league.id, "2874");
        assert_eq!(config.league.my_team, "Kenny Kawaguchis");
        assert!(config.league.sources.teams_file.is_none());

        let w = &config.strategy.category_weights;
        assert!((w.batters.OPS - 1.8).abs() < f64::EPSILON);
        assert!((w.pitchers.SV - 1.2).abs() < f64::EPSILON);
        assert_eq!(config.strategy.reports.players_per_group, 15);
        assert_eq!(config.strategy.storage.data_dir, "data");
        assert!(config.strategy.storage.archive);
        assert!(config.strategy.simulation.seed.is_none());

        assert_eq!(config.schedule.daily_time, NaiveTime::from_hms_opt(7, 0, 0).unwrap());
        assert_eq!(config.schedule.weekly_day, Weekday::Mon);
    }

    #[test]
    fn rejects_zero_weight() {
        let tmp = config_with_strategy_edit("SV = 1.2", "SV = 0.0");
        expect_field(load_config_from(tmp.path()).unwrap_err(), "weights.pitchers.SV");
    }

    #[test]
    fn rejects_chance_above_one() {
        let tmp = config_with_strategy_edit("injury_chance = 0.02", "injury_chance = 1.5");
        expect_field(
            load_config_from(tmp.path()).unwrap_err(),
            "simulation.injury_chance",
        );
    }

    #[test]
    fn rejects_zero_players_per_group() {
        let tmp = config_with_strategy_edit("players_per_group = 15", "players_per_group = 0");
        expect_field(
            load_config_from(tmp.path()).unwrap_err(),
            "reports.players_per_group",
        );
    }

    #[test]
    fn rejects_bad_daily_time() {
        let tmp = config_with_strategy_edit("daily_time = \"07:00\"", "daily_time = \"7am\"");
        expect_field(load_config_from(tmp.path()).unwrap_err(), "schedule.daily_time");
    }

    #[test]
    fn rejects_bad_weekday() {
        let tmp = config_with_strategy_edit("weekly_day = \"Mon\"", "weekly_day = \"Someday\"");
        expect_field(load_config_from(tmp.path()).unwrap_err(), "schedule.weekly_day");
    }

    #[test]
    fn accepts_full_weekday_name_and_seed() {
        let tmp = config_with_strategy_edit("weekly_day = \"Mon\"", "weekly_day = \"Friday\"\n");
        let config = load_config_from(tmp.path()).unwrap();
        assert_eq!(config.schedule.weekly_day, Weekday::Fri);
    }

    #[test]
    fn rejects_empty_team() {
        let tmp = tempfile::tempdir().unwrap();
        let config_dir = tmp.path().join("config");
        fs::create_dir_all(&config_dir).unwrap();
        fs::write(
            config_dir.join("league.toml"),
            "[league]\nid = \"1\"\nname = \"Test\"\nmy_team = \"  \"\n",
        )
        .unwrap();
        fs::copy(
            project_root().join("defaults/strategy.toml"),
            config_dir.join("strategy.toml"),
        )
        .unwrap();
        expect_field(load_config_from(tmp.path()).unwrap_err(), "league.my_team");
    }

    #[test]
    fn file_not_found_for_missing_league_toml() {
        let tmp = tempfile::tempdir().unwrap();
        let config_dir = tmp.path().join("config");
        fs::create_dir_all(&config_dir).unwrap();
        fs::copy(
            project_root().join("defaults/strategy.toml"),
            config_dir.join("strategy.toml"),
        )
        .unwrap();

        match load_config_from(tmp.path()).unwrap_err() {
            ConfigError::FileNotFound { path } => assert!(path.ends_with("league.toml")),
            other => panic!("expected FileNotFound, got: {other}"),
        }
    }

    #[test]
    fn parse_error_for_invalid_toml() {
        let tmp = tempfile::tempdir().unwrap();
        let config_dir = tmp.path().join("config");
        fs::create_dir_all(&config_dir).unwrap();
        fs::write(config_dir.join("league.toml"), "this is not valid [[[ toml").unwrap();
        fs::copy(
            project_root().join("defaults/strategy.toml"),
            config_dir.join("strategy.toml"),
        )
        .unwrap();

        match load_config_from(tmp.path()).unwrap_err() {
            ConfigError::ParseError { path, .. } => assert!(path.ends_with("league.toml")),
            other => panic!("expected ParseError, got: {other}"),
        }
    }

    #[test]
    fn ensure_config_files_copies_missing_and_skips_examples() {
        let tmp = tempfile::tempdir().unwrap();
        let defaults_dir = tmp.path().join("defaults");
        fs::create_dir_all(&defaults_dir).unwrap();
        let root = project_root();
        fs::copy(root.join("defaults/league.toml"), defaults_dir.join("league.toml")).unwrap();
        fs::copy(root.join("defaults/strategy.toml"), defaults_dir.join("strategy.toml")).unwrap();
        fs::write(defaults_dir.join("teams.csv.example"), "team_name,player_name,position\n")
            .unwrap();

        let copied = ensure_config_files(tmp.path()).expect("should succeed");
        assert_eq!(copied.len(), 2);
        assert!(tmp.path().join("config/league.toml").exists());
        assert!(!tmp.path().join("config/teams.csv.example").exists());

        // A second run copies nothing and keeps local edits.
        fs::write(tmp.path().join("config/league.toml"), "# custom\n").unwrap();
        assert!(ensure_config_files(tmp.path()).unwrap().is_empty());
        let content = fs::read_to_string(tmp.path().join("config/league.toml")).unwrap();
        assert_eq!(content, "# custom\n");
    }

    #[test]
    fn ensure_config_files_errors_when_both_dirs_missing() {
        let tmp = tempfile::tempdir().unwrap();
        match ensure_config_files(tmp.path()).unwrap_err() {
            ConfigError::DefaultsCopyError { message } => {
                assert!(message.contains("neither defaults/ nor config/"));
            }
            other => panic!("expected DefaultsCopyError, got: {other}"),
        }
    }
}
