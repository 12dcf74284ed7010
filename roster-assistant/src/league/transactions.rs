// Simulated waiver activity: teams occasionally swap a rostered player for a
// free agent of the same kind.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::{LeagueState, RosterEntry};

/// One add/drop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterMove {
    pub team: String,
    pub added: RosterEntry,
    pub dropped: RosterEntry,
}

/// Give every team a `chance` to make one add/drop. The dropped player keeps
/// their stats and projection and simply becomes a free agent.
pub fn simulate_transactions(
    state: &mut LeagueState,
    chance: f64,
    rng: &mut impl Rng,
) -> Vec<RosterMove> {
    let teams: Vec<String> = state.rosters.keys().cloned().collect();
    let mut moves = Vec::new();

    for team in teams {
        if !rng.gen_bool(chance) {
            continue;
        }
        let Some(roster_len) = state.rosters.get(&team).map(|r| r.len()) else {
            continue;
        };
        if roster_len == 0 {
            continue;
        }
        let idx = rng.gen_range(0..roster_len);
        let dropped = state.rosters[&team].players[idx].clone();

        let candidates: Vec<String> = state
            .free_agents()
            .into_iter()
            .filter(|name| {
                state
                    .stats
                    .get(*name)
                    .is_some_and(|s| s.position.is_pitcher() == dropped.position.is_pitcher())
            })
            .map(str::to_string)
            .collect();
        let Some(pick) = candidates.choose(rng) else {
            continue;
        };
        let position = state.stats[pick].position;
        let added = RosterEntry::new(pick.clone(), position);

        if let Some(roster) = state.rosters.get_mut(&team) {
            roster.players[idx] = added.clone();
        }
        info!("{} added {} and dropped {}", team, added.name, dropped.name);
        moves.push(RosterMove {
            team,
            added,
            dropped,
        });
    }
    moves
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::league::position::Position;
    use crate::league::TeamRoster;
    use crate::stats::line::PlayerStats;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn make_state() -> LeagueState {
        let mut state = LeagueState::default();
        for (name, pos) in [
            ("Rostered Bat", Position::Outfield),
            ("Rostered Arm", Position::StartingPitcher),
            ("Free Bat", Position::SecondBase),
            ("Free Arm", Position::ReliefPitcher),
        ] {
            state.stats.insert(name.into(), PlayerStats::empty(pos));
        }
        state.rosters.insert(
            "Only Team".into(),
            TeamRoster {
                players: vec![
                    RosterEntry::new("Rostered Bat", Position::Outfield),
                    RosterEntry::new("Rostered Arm", Position::StartingPitcher),
                ],
            },
        );
        state
    }

    #[test]
    fn zero_chance_makes_no_moves() {
        let mut state = make_state();
        let before = state.clone();
        let moves = simulate_transactions(&mut state, 0.0, &mut ChaCha8Rng::seed_from_u64(1));
        assert!(moves.is_empty());
        assert_eq!(state, before);
    }

    #[test]
    fn swap_keeps_player_kind_and_pool() {
        for seed in 0..20 {
            let mut state = make_state();
            let moves =
                simulate_transactions(&mut state, 1.0, &mut ChaCha8Rng::seed_from_u64(seed));
            assert_eq!(moves.len(), 1);
            let mv = &moves[0];
            assert_eq!(mv.added.position.is_pitcher(), mv.dropped.position.is_pitcher());

            let roster = &state.rosters["Only Team"];
            assert_eq!(roster.len(), 2);
            assert!(roster.contains(&mv.added.name));
            assert!(!roster.contains(&mv.dropped.name));
            // The dropped player is now a free agent with stats intact.
            assert!(state.free_agents().contains(&mv.dropped.name.as_str()));
            assert_eq!(state.stats.len(), 4);
        }
    }

    #[test]
    fn no_matching_free_agent_means_no_move() {
        let mut state = make_state();
        state.stats.remove("Free Bat");
        state.stats.remove("Free Arm");
        let moves = simulate_transactions(&mut state, 1.0, &mut ChaCha8Rng::seed_from_u64(3));
        assert!(moves.is_empty());
        assert_eq!(state.rosters["Only Team"].len(), 2);
    }
}
