// Building a league from seed data when no saved state is available.

use rand::Rng;
use tracing::{debug, info};

use super::sources::SeedData;
use super::LeagueState;
use crate::stats::aggregator::{
    apply_batter_increment, apply_pitcher_increment, sample_batter_game, sample_pitcher_outing,
};
use crate::stats::feed::{RELIEVER_APPEARANCE_CHANCE, STARTER_APPEARANCE_CHANCE};
use crate::stats::line::{PitcherRole, PlayerStats, SeasonLine};
use crate::stats::projection::{adjust_projection, Projection};

/// Whether a projection has the same shape as a season line.
fn same_kind(line: &SeasonLine, projection: &Projection) -> bool {
    matches!(
        (line, projection),
        (SeasonLine::Batter(_), Projection::Batter(_))
            | (SeasonLine::Pitcher(_), Projection::Pitcher(_))
    )
}

/// Play `games` simulated games into a fresh line.
fn simulate_games(stats: &mut PlayerStats, games: u32, rng: &mut impl Rng) {
    match &mut stats.line {
        SeasonLine::Batter(line) => {
            for _ in 0..games {
                let game = sample_batter_game(rng);
                apply_batter_increment(line, &game);
            }
        }
        SeasonLine::Pitcher(line) => {
            let role = line.role();
            let chance = match role {
                PitcherRole::Starter => STARTER_APPEARANCE_CHANCE,
                PitcherRole::Reliever => RELIEVER_APPEARANCE_CHANCE,
            };
            for _ in 0..games {
                if rng.gen_bool(chance) {
                    let outing = sample_pitcher_outing(rng, role);
                    apply_pitcher_increment(line, &outing);
                }
            }
        }
    }
}

/// Build the initial league state.
///
/// The pool is every projected or rostered player. A rostered player's
/// position comes from the roster; everyone else keeps their projection
/// row's position. Each player gets `games` simulated games of history, and
/// anyone without a usable projection gets a synthesized one.
pub fn bootstrap_state(
    league_id: &str,
    seed: SeedData,
    games: u32,
    rng: &mut impl Rng,
) -> LeagueState {
    let mut state = LeagueState {
        league_id: league_id.to_string(),
        rosters: seed.rosters,
        ..Default::default()
    };

    let mut imported = std::collections::BTreeMap::new();
    for row in seed.batters.into_iter().chain(seed.pitchers) {
        state
            .stats
            .entry(row.name.clone())
            .or_insert_with(|| PlayerStats::empty(row.position));
        imported.entry(row.name).or_insert(row.projection);
    }

    // Roster positions win over projection positions.
    for roster in state.rosters.values() {
        for entry in &roster.players {
            let slot = state
                .stats
                .entry(entry.name.clone())
                .or_insert_with(|| PlayerStats::empty(entry.position));
            if slot.position == entry.position {
                continue;
            }
            // Hitters only change label; pitchers need a line shaped for the role.
            if slot.position.is_hitter() && entry.position.is_hitter() {
                slot.position = entry.position;
            } else {
                *slot = PlayerStats::empty(entry.position);
            }
        }
    }

    let mut synthesized = 0usize;
    for (name, stats) in state.stats.iter_mut() {
        simulate_games(stats, games, rng);
        let projection = match imported.remove(name) {
            Some(p) if same_kind(&stats.line, &p) => p,
            _ => {
                synthesized += 1;
                debug!("synthesizing projection for '{}'", name);
                adjust_projection(name, &stats.line, None, rng)
            }
        };
        state.projections.insert(name.clone(), projection);
    }

    info!(
        "Bootstrapped league {}: {} teams, {} players ({} synthesized projections)",
        state.league_id,
        state.rosters.len(),
        state.stats.len(),
        synthesized
    );
    state
}
