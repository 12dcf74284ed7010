// Command-line interface.

use std::path::PathBuf;

use clap::Parser;

use crate::app::PassKind;
use crate::config::Config;

#[derive(Debug, Clone, Parser)]
#[command(
    name = "roster-assistant",
    version,
    about = "Fantasy baseball roster assistant: stat tracking, projections and reports"
)]
pub struct Cli {
    /// League to manage (overrides league.toml)
    #[arg(long)]
    pub league_id: Option<String>,

    /// Your team's name (overrides league.toml)
    #[arg(long)]
    pub team: Option<String>,

    /// Run one manual update pass, including roster transactions
    #[arg(long, conflicts_with_all = ["reports_only", "daemon"])]
    pub update: bool,

    /// Regenerate reports from saved data without updating
    #[arg(long, conflicts_with_all = ["update", "daemon"])]
    pub reports_only: bool,

    /// Keep running and update on the configured schedule
    #[arg(long, conflicts_with_all = ["update", "reports_only"])]
    pub daemon: bool,

    /// Seed for reproducible simulation (overrides strategy.toml)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Directory holding config/ and defaults/ (defaults to the working directory)
    #[arg(long)]
    pub config_dir: Option<PathBuf>,
}

/// What a single invocation does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Run one pass of the given kind, then write reports.
    Pass(PassKind),
    ReportsOnly,
    Daemon,
}

impl Cli {
    pub fn mode(&self) -> Mode {
        if self.daemon {
            Mode::Daemon
        } else if self.reports_only {
            Mode::ReportsOnly
        } else if self.update {
            Mode::Pass(PassKind::Manual)
        } else {
            Mode::Pass(PassKind::Daily)
        }
    }

    /// Apply command-line overrides on top of the loaded config.
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(id) = &self.league_id {
            config.league.id = id.clone();
        }
        if let Some(team) = &self.team {
            config.league.my_team = team.clone();
        }
        if let Some(seed) = self.seed {
            config.strategy.simulation.seed = Some(seed);
        }
    }
}
