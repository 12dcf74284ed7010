// Free-agent scoring, position groups and category leaders.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::config::{BatterWeights, CategoryWeights, PitcherWeights};
use crate::league::position::Position;
use crate::league::LeagueState;
use crate::stats::projection::{BatterProjection, PitcherProjection, Projection};

/// Pitchers projected for at least this many saves are listed as relievers.
const RELIEVER_MIN_SV: u32 = 8;
/// Pitchers projected for fewer innings than this are listed as relievers.
const STARTER_MIN_IP: f64 = 100.0;

/// Minimum projected sample for a free agent to lead a rate category.
const LEADER_MIN_AB: u32 = 400;
const LEADER_MIN_IP: f64 = 150.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FreeAgentEntry {
    pub name: String,
    /// Listing group: the player's position for batters, SP or RP for
    /// pitchers by projected usage.
    pub position: Position,
    pub score: f64,
    pub projection: Projection,
}

pub fn batter_score(p: &BatterProjection, w: &BatterWeights) -> f64 {
    f64::from(p.r) * w.R
        + 3.0 * f64::from(p.hr) * w.HR
        + f64::from(p.rbi) * w.RBI
        + 3.0 * f64::from(p.sb) * w.SB
        + 1000.0 * p.avg * w.AVG
        + 500.0 * p.ops * w.OPS
}

pub fn pitcher_score(p: &PitcherProjection, w: &PitcherWeights) -> f64 {
    0.3 * p.ip * w.IP
        + (5.0 - p.era).max(0.0) * 20.0 * w.ERA
        + (1.5 - p.whip).max(0.0) * 50.0 * w.WHIP
        + 2.0 * p.k9 * w.K9
        + 3.0 * f64::from(p.qs) * w.QS
        + 4.0 * f64::from(p.sv) * w.SV
}

pub fn pitcher_group(p: &PitcherProjection) -> Position {
    if p.sv >= RELIEVER_MIN_SV || p.ip < STARTER_MIN_IP {
        Position::ReliefPitcher
    } else {
        Position::StartingPitcher
    }
}

/// Score every unrostered player, best first. Ties fall back to name order.
pub fn score_free_agents(state: &LeagueState, weights: &CategoryWeights) -> Vec<FreeAgentEntry> {
    let mut entries: Vec<FreeAgentEntry> = state
        .free_agents()
        .into_iter()
        .filter_map(|name| {
            let projection = state.projections.get(name)?;
            let (position, score) = match projection {
                Projection::Batter(b) => {
                    let pos = state.stats.get(name)?.position;
                    (pos, batter_score(b, &weights.batters))
                }
                Projection::Pitcher(p) => (pitcher_group(p), pitcher_score(p, &weights.pitchers)),
            };
            Some(FreeAgentEntry {
                name: name.to_string(),
                position,
                score,
                projection: projection.clone(),
            })
        })
        .collect();
    entries.sort_by(|a, b| b.score.total_cmp(&a.score));
    entries
}

/// Top `per_group` free agents at each position. Input order is preserved, so
/// a scored list stays best-first within each group.
pub fn group_by_position(
    entries: &[FreeAgentEntry],
    per_group: usize,
) -> BTreeMap<Position, Vec<&FreeAgentEntry>> {
    let mut groups: BTreeMap<Position, Vec<&FreeAgentEntry>> = BTreeMap::new();
    for entry in entries {
        let group = groups.entry(entry.position).or_default();
        if group.len() < per_group {
            group.push(entry);
        }
    }
    groups
}

// ---------------------------------------------------------------------------
// Category leaders
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryLeaders {
    pub title: &'static str,
    /// Stat column header.
    pub stat: &'static str,
    pub leaders: Vec<(String, f64)>,
}

struct LeaderBoard {
    title: &'static str,
    stat: &'static str,
    ascending: bool,
    value: fn(&Projection) -> Option<f64>,
}

const LEADER_BOARDS: &[LeaderBoard] = &[
    LeaderBoard {
        title: "Power",
        stat: "HR+RBI/3",
        ascending: false,
        value: |p| p.batting().map(|b| f64::from(b.hr) + f64::from(b.rbi) / 3.0),
    },
    LeaderBoard {
        title: "Speed",
        stat: "SB",
        ascending: false,
        value: |p| p.batting().map(|b| f64::from(b.sb)),
    },
    LeaderBoard {
        title: "Batting average",
        stat: "AVG",
        ascending: false,
        value: |p| p.batting().filter(|b| b.ab >= LEADER_MIN_AB).map(|b| b.avg),
    },
    LeaderBoard {
        title: "OPS",
        stat: "OPS",
        ascending: false,
        value: |p| p.batting().filter(|b| b.ab >= LEADER_MIN_AB).map(|b| b.ops),
    },
    LeaderBoard {
        title: "ERA",
        stat: "ERA",
        ascending: true,
        value: |p| p.pitching().filter(|x| x.ip >= LEADER_MIN_IP).map(|x| x.era),
    },
    LeaderBoard {
        title: "WHIP",
        stat: "WHIP",
        ascending: true,
        value: |p| p.pitching().filter(|x| x.ip >= LEADER_MIN_IP).map(|x| x.whip),
    },
    LeaderBoard {
        title: "Strikeout rate",
        stat: "K9",
        ascending: false,
        value: |p| p.pitching().filter(|x| x.ip >= LEADER_MIN_IP).map(|x| x.k9),
    },
    LeaderBoard {
        title: "Quality starts",
        stat: "QS",
        ascending: false,
        value: |p| p.pitching().map(|x| f64::from(x.qs)),
    },
    LeaderBoard {
        title: "Saves",
        stat: "SV",
        ascending: false,
        value: |p| p.pitching().map(|x| f64::from(x.sv)),
    },
];

/// The top `n` free agents in each scoring category.
pub fn category_leaders(entries: &[FreeAgentEntry], n: usize) -> Vec<CategoryLeaders> {
    LEADER_BOARDS
        .iter()
        .map(|board| {
            let mut rows: Vec<(String, f64)> = entries
                .iter()
                .filter_map(|e| (board.value)(&e.projection).map(|v| (e.name.clone(), v)))
                .collect();
            if board.ascending {
                rows.sort_by(|a, b| a.1.total_cmp(&b.1));
            } else {
                rows.sort_by(|a, b| b.1.total_cmp(&a.1));
            }
            rows.truncate(n);
            CategoryLeaders {
                title: board.title,
                stat: board.stat,
                leaders: rows,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::league::{RosterEntry, TeamRoster};
    use crate::stats::line::PlayerStats;

    fn weights() -> CategoryWeights {
        CategoryWeights {
            batters: BatterWeights {
                R: 1.0,
                HR: 1.0,
                RBI: 1.0,
                SB: 1.0,
                AVG: 1.0,
                OPS: 1.0,
            },
            pitchers: PitcherWeights {
                IP: 1.0,
                ERA: 1.0,
                WHIP: 1.0,
                K9: 1.0,
                QS: 1.0,
                SV: 1.0,
            },
        }
    }

    fn bat(ab: u32, hr: u32, sb: u32, avg: f64) -> Projection {
        Projection::Batter(BatterProjection {
            ab,
            r: 70,
            hr,
            rbi: 70,
            sb,
            avg,
            ops: 0.750,
        })
    }

    fn arm(ip: f64, era: f64, sv: u32) -> Projection {
        Projection::Pitcher(PitcherProjection {
            ip,
            era,
            whip: 1.20,
            k9: 9.0,
            qs: if ip >= 100.0 { 15 } else { 0 },
            sv,
        })
    }

    fn make_state() -> LeagueState {
        let mut state = LeagueState::default();
        let pool = [
            ("Rostered", Position::Outfield, bat(600, 40, 30, 0.310)),
            ("Slugger", Position::FirstBase, bat(500, 35, 2, 0.250)),
            ("Burner", Position::Outfield, bat(450, 5, 40, 0.270)),
            ("Part Timer", Position::Catcher, bat(250, 8, 0, 0.300)),
            ("Workhorse", Position::StartingPitcher, arm(190.0, 3.40, 0)),
            ("Closer", Position::ReliefPitcher, arm(65.0, 2.80, 30)),
            ("Swingman", Position::StartingPitcher, arm(90.0, 4.20, 0)),
        ];
        for (name, pos, proj) in pool {
            state.stats.insert(name.into(), PlayerStats::empty(pos));
            state.projections.insert(name.into(), proj);
        }
        state.rosters.insert(
            "Team".into(),
            TeamRoster {
                players: vec![RosterEntry::new("Rostered", Position::Outfield)],
            },
        );
        state
    }

    #[test]
    fn batter_formula() {
        let p = BatterProjection {
            ab: 500,
            r: 80,
            hr: 20,
            rbi: 75,
            sb: 10,
            avg: 0.280,
            ops: 0.800,
        };
        // 80 + 60 + 75 + 30 + 280 + 400
        assert!((batter_score(&p, &weights().batters) - 925.0).abs() < 1e-9);
    }

    #[test]
    fn pitcher_formula_floors_bad_ratios() {
        let p = PitcherProjection {
            ip: 100.0,
            era: 6.00,
            whip: 1.60,
            k9: 8.0,
            qs: 5,
            sv: 0,
        };
        // 30 + 0 + 0 + 16 + 15
        assert!((pitcher_score(&p, &weights().pitchers) - 61.0).abs() < 1e-9);
    }

    #[test]
    fn weights_scale_their_category() {
        let p = BatterProjection {
            ab: 500,
            r: 0,
            hr: 10,
            rbi: 0,
            sb: 0,
            avg: 0.0,
            ops: 0.0,
        };
        let mut w = weights().batters;
        let base = batter_score(&p, &w);
        w.HR = 2.0;
        assert!((batter_score(&p, &w) - 2.0 * base).abs() < 1e-9);
    }

    #[test]
    fn reliever_grouping_rule() {
        let by = |p: Projection| pitcher_group(p.pitching().unwrap());
        assert_eq!(by(arm(190.0, 3.0, 0)), Position::StartingPitcher);
        assert_eq!(by(arm(99.0, 3.0, 0)), Position::ReliefPitcher);
        assert_eq!(by(arm(150.0, 3.0, 8)), Position::ReliefPitcher);
    }

    #[test]
    fn scoring_skips_rostered_and_sorts_best_first() {
        let entries = score_free_agents(&make_state(), &weights());
        assert_eq!(entries.len(), 6);
        assert!(entries.iter().all(|e| e.name != "Rostered"));
        assert!(entries.windows(2).all(|w| w[0].score >= w[1].score));
        let swingman = entries.iter().find(|e| e.name == "Swingman").unwrap();
        assert_eq!(swingman.position, Position::ReliefPitcher);
    }

    #[test]
    fn groups_respect_limit() {
        let entries = score_free_agents(&make_state(), &weights());
        let groups = group_by_position(&entries, 1);
        assert_eq!(groups[&Position::Outfield].len(), 1);
        assert_eq!(groups[&Position::ReliefPitcher].len(), 1);
        assert_eq!(groups[&Position::StartingPitcher][0].name, "Workhorse");
    }

    #[test]
    fn leaders_apply_sample_minimums() {
        let entries = score_free_agents(&make_state(), &weights());
        let boards = category_leaders(&entries, 5);
        let find = |title: &str| boards.iter().find(|b| b.title == title).unwrap();

        let avg = find("Batting average");
        assert!(avg.leaders.iter().all(|(n, _)| n != "Part Timer"));
        assert_eq!(avg.leaders[0].0, "Burner");

        let era = find("ERA");
        assert_eq!(era.leaders.len(), 1);
        assert_eq!(era.leaders[0].0, "Workhorse");

        assert_eq!(find("Speed").leaders[0].0, "Burner");
        assert_eq!(find("Power").leaders[0].0, "Slugger");
        assert_eq!(find("Saves").leaders[0].0, "Closer");
    }
}
