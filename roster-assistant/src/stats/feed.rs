// Source of per-game stat increments. The live-provider seam; the only
// implementation shipped is a seeded simulation.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::aggregator::{
    sample_batter_game, sample_pitcher_outing, BatterIncrement, PitcherIncrement,
};
use super::line::PitcherRole;

/// Chance a starter takes the mound on a given update.
pub const STARTER_APPEARANCE_CHANCE: f64 = 0.20;
/// Chance a reliever gets into a game on a given update.
pub const RELIEVER_APPEARANCE_CHANCE: f64 = 0.40;

#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error("no stats available for '{player}'")]
    Unavailable { player: String },
}

/// Supplies one game's worth of stats per player per update pass.
pub trait StatFeed {
    fn batter_game(&mut self, player: &str) -> Result<BatterIncrement, FeedError>;

    /// `Ok(None)` means the pitcher did not appear.
    fn pitcher_outing(
        &mut self,
        player: &str,
        role: PitcherRole,
    ) -> Result<Option<PitcherIncrement>, FeedError>;
}

/// Fabricates stats from a seeded RNG. Never fails.
#[derive(Debug, Clone)]
pub struct SimulatedFeed {
    rng: ChaCha8Rng,
}

impl SimulatedFeed {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: ChaCha8Rng::from_entropy(),
        }
    }
}

impl StatFeed for SimulatedFeed {
    fn batter_game(&mut self, _player: &str) -> Result<BatterIncrement, FeedError> {
        Ok(sample_batter_game(&mut self.rng))
    }

    fn pitcher_outing(
        &mut self,
        _player: &str,
        role: PitcherRole,
    ) -> Result<Option<PitcherIncrement>, FeedError> {
        let chance = match role {
            PitcherRole::Starter => STARTER_APPEARANCE_CHANCE,
            PitcherRole::Reliever => RELIEVER_APPEARANCE_CHANCE,
        };
        if !self.rng.gen_bool(chance) {
            return Ok(None);
        }
        Ok(Some(sample_pitcher_outing(&mut self.rng, role)))
    }
}
