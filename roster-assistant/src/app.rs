// Application service and update-pass orchestration.
//
// `Assistant` owns the configuration, the JSON store, the stat feed and the
// in-memory league. An update pass runs against a clone of the league and is
// only committed (in memory and on disk) when every step succeeds.

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::{DateTime, Utc};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, error, info, warn};

use crate::analysis::free_agents::score_free_agents;
use crate::analysis::analyze_league;
use crate::config::{Config, SourcesConfig};
use crate::league::bootstrap::bootstrap_state;
use crate::league::sources::load_seed_data;
use crate::league::transactions::simulate_transactions;
use crate::league::LeagueState;
use crate::news::{injury_news, performance_news, push_news, transaction_news, GameLog};
use crate::report::{write_reports, ReportError};
use crate::stats::aggregator::{apply_batter_increment, apply_pitcher_increment};
use crate::stats::feed::{FeedError, SimulatedFeed, StatFeed};
use crate::stats::line::SeasonLine;
use crate::stats::projection::adjust_projection;
use crate::store::{JsonStore, StoreError};

// ---------------------------------------------------------------------------
// Supporting types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassKind {
    /// Stats, projections and news.
    Daily,
    /// A daily pass plus roster transactions.
    Weekly,
    /// Requested from the command line; behaves like a weekly pass.
    Manual,
}

impl PassKind {
    pub fn runs_transactions(&self) -> bool {
        matches!(self, PassKind::Weekly | PassKind::Manual)
    }
}

impl fmt::Display for PassKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PassKind::Daily => "daily",
            PassKind::Weekly => "weekly",
            PassKind::Manual => "manual",
        };
        f.write_str(s)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum UpdateError {
    #[error("stat feed failed: {0}")]
    Feed(#[from] FeedError),

    #[error("failed to save league: {0}")]
    Store(#[from] StoreError),
}

/// What a committed pass changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PassSummary {
    pub players_updated: usize,
    pub appearances: usize,
    pub roster_moves: usize,
    pub news_items: usize,
}

// ---------------------------------------------------------------------------
// Assistant
// ---------------------------------------------------------------------------

pub struct Assistant {
    pub config: Config,
    pub state: LeagueState,
    store: JsonStore,
    feed: Box<dyn StatFeed>,
    rng: ChaCha8Rng,
    base_dir: PathBuf,
    reports_dir: PathBuf,
}

/// Relative paths in the config are taken relative to the config base dir.
fn resolve(base_dir: &Path, path: &str) -> PathBuf {
    let p = Path::new(path);
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        base_dir.join(p)
    }
}

impl Assistant {
    /// Build an assistant with an explicit feed and RNG.
    pub fn new(config: Config, base_dir: &Path, feed: Box<dyn StatFeed>, rng: ChaCha8Rng) -> Self {
        let storage = &config.strategy.storage;
        let store = JsonStore::new(resolve(base_dir, &storage.data_dir), storage.archive);
        let reports_dir = resolve(base_dir, &config.strategy.reports.dir);
        Self {
            state: LeagueState {
                league_id: config.league.id.clone(),
                ..Default::default()
            },
            config,
            store,
            feed,
            rng,
            base_dir: base_dir.to_path_buf(),
            reports_dir,
        }
    }

    /// Build an assistant with the simulated feed, seeded from the config
    /// when a seed is set.
    pub fn from_config(config: Config, base_dir: &Path) -> Self {
        let (feed, rng) = match config.strategy.simulation.seed {
            Some(seed) => (
                SimulatedFeed::from_seed(seed),
                ChaCha8Rng::seed_from_u64(seed.wrapping_add(1)),
            ),
            None => (SimulatedFeed::from_entropy(), ChaCha8Rng::from_entropy()),
        };
        Self::new(config, base_dir, Box::new(feed), rng)
    }

    pub fn reports_dir(&self) -> &Path {
        &self.reports_dir
    }

    pub fn data_dir(&self) -> &Path {
        self.store.data_dir()
    }

    /// Load the saved league, or build a fresh one from seed data when
    /// nothing usable is on disk. A freshly built league is saved right away.
    pub fn load_or_bootstrap(&mut self, now: DateTime<Utc>) -> anyhow::Result<()> {
        match self.store.load() {
            Ok(Some(state)) if state.league_id == self.config.league.id => {
                self.state = state;
                return Ok(());
            }
            Ok(Some(state)) => warn!(
                "Saved data is for league {}, not {}; regenerating defaults",
                state.league_id, self.config.league.id
            ),
            Ok(None) => info!("No saved league in {}", self.store.data_dir().display()),
            Err(e) => warn!("Failed to load saved league ({}); regenerating defaults", e),
        }

        let sources = self.resolved_sources();
        let seed = load_seed_data(&sources).context("failed to load seed data")?;
        let mut state = bootstrap_state(
            &self.config.league.id,
            seed,
            self.config.strategy.simulation.bootstrap_games,
            &mut self.rng,
        );
        state.updated_at = Some(now);

        let free_agents = score_free_agents(&state, &self.config.strategy.category_weights);
        self.store
            .save(&state, &free_agents, now)
            .context("failed to save bootstrapped league")?;
        self.state = state;

        if !self.state.has_team(&self.config.league.my_team) {
            warn!(
                "Team '{}' is not on any roster in league {}",
                self.config.league.my_team, self.state.league_id
            );
        }
        Ok(())
    }

    fn resolved_sources(&self) -> SourcesConfig {
        let src = &self.config.league.sources;
        let fix = |p: &Option<String>| {
            p.as_deref()
                .map(|p| resolve(&self.base_dir, p).to_string_lossy().into_owned())
        };
        SourcesConfig {
            teams_file: fix(&src.teams_file),
            batter_file: fix(&src.batter_file),
            pitcher_file: fix(&src.pitcher_file),
        }
    }

    /// Run one update pass. On success the new league replaces the current
    /// one and is saved; on any error neither memory nor disk changes.
    pub fn run_update_pass(
        &mut self,
        kind: PassKind,
        now: DateTime<Utc>,
    ) -> Result<PassSummary, UpdateError> {
        let sim = &self.config.strategy.simulation;
        let mut next = self.state.clone();
        let mut summary = PassSummary::default();

        let moves = if kind.runs_transactions() {
            simulate_transactions(&mut next, sim.transaction_chance, &mut self.rng)
        } else {
            Vec::new()
        };
        summary.roster_moves = moves.len();

        let mut logs = Vec::new();
        for (name, stats) in next.stats.iter_mut() {
            match &mut stats.line {
                SeasonLine::Batter(line) => {
                    let game = self.feed.batter_game(name)?;
                    apply_batter_increment(line, &game);
                    logs.push(GameLog::Batting {
                        player: name.clone(),
                        game,
                    });
                    summary.appearances += 1;
                }
                SeasonLine::Pitcher(line) => {
                    if let Some(outing) = self.feed.pitcher_outing(name, line.role())? {
                        apply_pitcher_increment(line, &outing);
                        logs.push(GameLog::Pitching {
                            player: name.clone(),
                            outing,
                        });
                        summary.appearances += 1;
                    }
                }
            }

            let existing = next.projections.remove(name);
            let projection = adjust_projection(name, &stats.line, existing, &mut self.rng);
            next.projections.insert(name.clone(), projection);
            summary.players_updated += 1;
        }
        debug!("{} appearances across {} players", summary.appearances, summary.players_updated);

        let mut items = transaction_news(&moves, now);
        items.extend(injury_news(&next, sim.injury_chance, &mut self.rng, now));
        items.extend(performance_news(&logs, &next, now));
        summary.news_items = items.len();
        push_news(&mut next.news, items);
        next.updated_at = Some(now);

        let free_agents = score_free_agents(&next, &self.config.strategy.category_weights);
        self.store.save(&next, &free_agents, now)?;
        self.state = next;

        info!(
            "{} pass complete: {} appearances, {} roster moves, {} news items",
            kind, summary.appearances, summary.roster_moves, summary.news_items
        );
        Ok(summary)
    }

    /// Run a pass and log instead of propagating a failure. Returns whether
    /// the pass was committed.
    pub fn run_pass_logged(&mut self, kind: PassKind, now: DateTime<Utc>) -> bool {
        match self.run_update_pass(kind, now) {
            Ok(_) => true,
            Err(e) => {
                error!("{} update pass failed, keeping previous state: {}", kind, e);
                false
            }
        }
    }

    pub fn generate_reports(&self, now: DateTime<Utc>) -> Result<Vec<PathBuf>, ReportError> {
        let analysis = analyze_league(&self.state, &self.config);
        write_reports(&self.reports_dir, &self.state, &analysis, &self.config, now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load_config_from;
    use crate::stats::aggregator::{BatterIncrement, PitcherIncrement};
    use crate::stats::line::PitcherRole;
    use chrono::TimeZone;

    /// Every batter gets one hit in four; every pitcher throws a clean inning.
    struct FixedFeed;

    impl StatFeed for FixedFeed {
        fn batter_game(&mut self, _player: &str) -> Result<BatterIncrement, FeedError> {
            Ok(BatterIncrement {
                ab: 4,
                h: 1,
                ..Default::default()
            })
        }

        fn pitcher_outing(
            &mut self,
            _player: &str,
            _role: PitcherRole,
        ) -> Result<Option<PitcherIncrement>, FeedError> {
            Ok(Some(PitcherIncrement {
                ip: 1.0,
                k: 1,
                ..Default::default()
            }))
        }
    }

    /// Fails for one named player.
    struct FailingFeed(String);

    impl StatFeed for FailingFeed {
        fn batter_game(&mut self, player: &str) -> Result<BatterIncrement, FeedError> {
            if player == self.0 {
                return Err(FeedError::Unavailable {
                    player: player.into(),
                });
            }
            FixedFeed.batter_game(player)
        }

        fn pitcher_outing(
            &mut self,
            player: &str,
            role: PitcherRole,
        ) -> Result<Option<PitcherIncrement>, FeedError> {
            if player == self.0 {
                return Err(FeedError::Unavailable {
                    player: player.into(),
                });
            }
            FixedFeed.pitcher_outing(player, role)
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 2, 7, 0, 0).unwrap()
    }

    /// A temp base dir holding the shipped default config with a fixed seed
    /// and archiving off.
    fn base_dir() -> tempfile::TempDir {
        let tmp = tempfile::tempdir().unwrap();
        let config_dir = tmp.path().join("config");
        std::fs::create_dir_all(&config_dir).unwrap();
        let defaults = Path::new(env!("CARGO_MANIFEST_DIR")).join("defaults");
        std::fs::copy(defaults.join("league.toml"), config_dir.join("league.toml")).unwrap();
        let strategy = std::fs::read_to_string(defaults.join("strategy.toml"))
            .unwrap()
            .replace("# seed = 2874", "seed = 2874")
            .replace("archive = true", "archive = false");
        std::fs::write(config_dir.join("strategy.toml"), strategy).unwrap();
        tmp
    }

    fn assistant(base: &Path, feed: Box<dyn StatFeed>) -> Assistant {
        let config = load_config_from(base).unwrap();
        let mut a = Assistant::new(config, base, feed, ChaCha8Rng::seed_from_u64(5));
        a.load_or_bootstrap(now()).unwrap();
        a
    }

    #[test]
    fn bootstrap_saves_and_reloads() {
        let tmp = base_dir();
        let first = assistant(tmp.path(), Box::new(FixedFeed));
        assert!(!first.state.rosters.is_empty());
        assert!(first.data_dir().join("rosters.json").exists());

        let second = assistant(tmp.path(), Box::new(FixedFeed));
        assert_eq!(second.state, first.state);
    }

    #[test]
    fn corrupt_snapshot_is_regenerated() {
        let tmp = base_dir();
        let first = assistant(tmp.path(), Box::new(FixedFeed));
        std::fs::write(first.data_dir().join("projections.json"), "[oops").unwrap();
        let second = assistant(tmp.path(), Box::new(FixedFeed));
        assert_eq!(second.state.stats.len(), first.state.stats.len());
        assert_eq!(second.state.projections.len(), second.state.stats.len());
    }

    #[test]
    fn daily_pass_grows_every_line() {
        let tmp = base_dir();
        let mut a = assistant(tmp.path(), Box::new(FixedFeed));
        let before = a.state.clone();
        let summary = a.run_update_pass(PassKind::Daily, now()).unwrap();
        assert_eq!(summary.players_updated, before.stats.len());
        assert_eq!(summary.roster_moves, 0);
        assert_eq!(a.state.rosters, before.rosters);
        assert_eq!(a.state.updated_at, Some(now()));

        for (name, stats) in &a.state.stats {
            match (&stats.line, &before.stats[name].line) {
                (SeasonLine::Batter(new), SeasonLine::Batter(old)) => {
                    assert_eq!(new.ab, old.ab + 4);
                    assert_eq!(new.h, old.h + 1);
                }
                (SeasonLine::Pitcher(new), SeasonLine::Pitcher(old)) => {
                    assert!((new.ip - old.ip - 1.0).abs() < 1e-9);
                    assert_eq!(new.k, old.k + 1);
                }
                _ => panic!("{name} changed kind"),
            }
        }
    }

    #[test]
    fn failed_pass_changes_nothing() {
        let tmp = base_dir();
        let mut a = assistant(tmp.path(), Box::new(FixedFeed));
        let victim = a.state.stats.keys().last().unwrap().clone();
        let before = a.state.clone();
        let on_disk = std::fs::read(a.data_dir().join("player_stats.json")).unwrap();

        a.feed = Box::new(FailingFeed(victim));
        assert!(!a.run_pass_logged(PassKind::Weekly, now()));
        assert_eq!(a.state, before);
        assert_eq!(
            std::fs::read(a.data_dir().join("player_stats.json")).unwrap(),
            on_disk
        );
    }

    #[test]
    fn reports_are_written() {
        let tmp = base_dir();
        let mut a = assistant(tmp.path(), Box::new(FixedFeed));
        a.run_update_pass(PassKind::Manual, now()).unwrap();
        let written = a.generate_reports(now()).unwrap();
        assert_eq!(written.len(), 4);
        let team = std::fs::read_to_string(a.reports_dir().join("team_analysis.md")).unwrap();
        assert!(team.contains(&a.config.league.my_team));
        assert!(team.contains("## Projected Standings"));
    }

    #[test]
    fn pass_kinds() {
        assert!(!PassKind::Daily.runs_transactions());
        assert!(PassKind::Weekly.runs_transactions());
        assert!(PassKind::Manual.runs_transactions());
        assert_eq!(PassKind::Manual.to_string(), "manual");
    }
}
