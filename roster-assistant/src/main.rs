// Roster assistant entry point.
//
// Startup sequence:
// 1. Parse command line
// 2. Initialize tracing (stderr)
// 3. Load config, apply command-line overrides
// 4. Load saved league or bootstrap a new one
// 5. Run the requested mode: one pass, reports only, or the daemon
// 6. Write reports

use roster_assistant::app::Assistant;
use roster_assistant::cli::{Cli, Mode};
use roster_assistant::config;
use roster_assistant::schedule;

use anyhow::Context;
use chrono::Utc;
use clap::Parser;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Parse command line
    let cli = Cli::parse();

    // 2. Initialize tracing
    init_tracing()?;
    info!("Roster assistant starting up");

    // 3. Load config
    let base_dir = match &cli.config_dir {
        Some(dir) => dir.clone(),
        None => std::env::current_dir().context("failed to read working directory")?,
    };
    let mut config =
        config::load_config_in(&base_dir).context("failed to load configuration")?;
    cli.apply_overrides(&mut config);
    info!(
        "Config loaded: league={} ({}), team={}",
        config.league.name, config.league.id, config.league.my_team
    );

    // 4. Load or bootstrap league state
    let mut assistant = Assistant::from_config(config, &base_dir);
    assistant
        .load_or_bootstrap(Utc::now())
        .context("failed to initialize league data")?;
    info!(
        "League {} ready: {} teams, {} players",
        assistant.state.league_id,
        assistant.state.rosters.len(),
        assistant.state.stats.len()
    );

    // 5. Run the requested mode
    match cli.mode() {
        Mode::Daemon => {
            // Reports reflect the loaded state before the first tick.
            write_reports(&assistant);
            schedule::run_daemon(&mut assistant).await?;
        }
        Mode::ReportsOnly => write_reports(&assistant),
        Mode::Pass(kind) => {
            assistant.run_pass_logged(kind, Utc::now());
            // 6. Reports are written even when the pass failed
            write_reports(&assistant);
        }
    }

    info!("Roster assistant finished");
    Ok(())
}

fn write_reports(assistant: &Assistant) {
    match assistant.generate_reports(Utc::now()) {
        Ok(paths) => {
            for path in paths {
                println!("{}", path.display());
            }
        }
        Err(e) => error!("Report generation failed: {}", e),
    }
}

/// Initialize tracing to stderr so stdout only carries report paths.
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("roster_assistant=info,warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
