// Cumulative season lines for batters and pitchers.

use crate::league::position::Position;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// `numerator / denominator`, or 0 when the denominator is not positive.
pub fn safe_div(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

// ---------------------------------------------------------------------------
// Batter
// ---------------------------------------------------------------------------

/// A batter's season-to-date line. Rate fields are derived from the counting
/// fields by [`BatterSeasonLine::recompute_rates`] and kept at full precision.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatterSeasonLine {
    pub ab: u32,
    pub r: u32,
    pub h: u32,
    pub hr: u32,
    pub rbi: u32,
    pub sb: u32,
    pub bb: u32,
    pub so: u32,
    pub avg: f64,
    pub obp: f64,
    pub slg: f64,
    pub ops: f64,
}

impl BatterSeasonLine {
    /// Total bases. The line carries no doubles or triples, so every
    /// non-homer hit counts as a single.
    pub fn total_bases(&self) -> u32 {
        self.h + 3 * self.hr
    }

    pub fn recompute_rates(&mut self) {
        let ab = f64::from(self.ab);
        self.avg = safe_div(f64::from(self.h), ab);
        self.obp = safe_div(
            f64::from(self.h + self.bb),
            f64::from(self.ab + self.bb),
        );
        self.slg = safe_div(f64::from(self.total_bases()), ab);
        self.ops = self.obp + self.slg;
    }
}

// ---------------------------------------------------------------------------
// Pitcher
// ---------------------------------------------------------------------------

/// Whether a pitcher is used as a starter or out of the bullpen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PitcherRole {
    Starter,
    Reliever,
}

impl PitcherRole {
    pub fn from_position(pos: Position) -> Self {
        match pos {
            Position::ReliefPitcher => PitcherRole::Reliever,
            _ => PitcherRole::Starter,
        }
    }
}

/// A pitcher's season-to-date line.
///
/// `sv` doubles as the saves-eligible flag: a line carrying `Some(_)` belongs
/// to a reliever, `None` to a starter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PitcherSeasonLine {
    pub ip: f64,
    pub w: u32,
    pub l: u32,
    pub k: u32,
    pub bb: u32,
    pub qs: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sv: Option<u32>,
    pub era: f64,
    pub whip: f64,
    pub k9: f64,
}

impl PitcherSeasonLine {
    /// An empty line for a pitcher in the given role.
    pub fn for_role(role: PitcherRole) -> Self {
        Self {
            sv: match role {
                PitcherRole::Reliever => Some(0),
                PitcherRole::Starter => None,
            },
            ..Self::default()
        }
    }

    pub fn role(&self) -> PitcherRole {
        if self.sv.is_some() {
            PitcherRole::Reliever
        } else {
            PitcherRole::Starter
        }
    }

    pub fn saves(&self) -> u32 {
        self.sv.unwrap_or(0)
    }

    /// Earned runs implied by the current ERA and innings.
    pub fn implied_er(&self) -> f64 {
        self.era * self.ip / 9.0
    }

    /// Walks plus hits implied by the current WHIP and innings.
    pub fn implied_baserunners(&self) -> f64 {
        self.whip * self.ip
    }
}

// ---------------------------------------------------------------------------
// Per-player wrapper
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SeasonLine {
    Batter(BatterSeasonLine),
    Pitcher(PitcherSeasonLine),
}

impl SeasonLine {
    pub fn is_pitcher(&self) -> bool {
        matches!(self, SeasonLine::Pitcher(_))
    }
}

/// Season-to-date stats for one player in the pool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub position: Position,
    pub line: SeasonLine,
}

impl PlayerStats {
    /// A zeroed line shaped for the position.
    pub fn empty(position: Position) -> Self {
        let line = if position.is_pitcher() {
            SeasonLine::Pitcher(PitcherSeasonLine::for_role(PitcherRole::from_position(
                position,
            )))
        } else {
            SeasonLine::Batter(BatterSeasonLine::default())
        };
        Self { position, line }
    }

    pub fn batting(&self) -> Option<&BatterSeasonLine> {
        match &self.line {
            SeasonLine::Batter(b) => Some(b),
            SeasonLine::Pitcher(_) => None,
        }
    }

    pub fn pitching(&self) -> Option<&PitcherSeasonLine> {
        match &self.line {
            SeasonLine::Pitcher(p) => Some(p),
            SeasonLine::Batter(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn safe_div_zero_denominator() {
        assert_eq!(safe_div(5.0, 0.0), 0.0);
        assert_eq!(safe_div(0.0, 0.0), 0.0);
        assert!((safe_div(1.0, 4.0) - 0.25).abs() < f64::EPSILON);
    }

    #[test]
    fn batter_rates_from_counting_fields() {
        let mut line = BatterSeasonLine {
            ab: 100,
            h: 27,
            bb: 10,
            hr: 5,
            ..Default::default()
        };
        line.recompute_rates();
        assert!((line.avg - 0.270).abs() < 1e-12);
        assert!((line.obp - 37.0 / 110.0).abs() < 1e-12);
        // 22 singles + 5 homers = 22 + 20 total bases
        assert_eq!(line.total_bases(), 42);
        assert!((line.slg - 0.42).abs() < 1e-12);
        assert_eq!(line.ops, line.obp + line.slg);
    }

    #[test]
    fn empty_batter_rates_are_zero() {
        let mut line = BatterSeasonLine::default();
        line.recompute_rates();
        assert_eq!(line.avg, 0.0);
        assert_eq!(line.obp, 0.0);
        assert_eq!(line.slg, 0.0);
        assert_eq!(line.ops, 0.0);
    }

    #[test]
    fn walks_only_gives_obp_without_avg() {
        let mut line = BatterSeasonLine {
            bb: 3,
            ..Default::default()
        };
        line.recompute_rates();
        assert_eq!(line.avg, 0.0);
        assert!((line.obp - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn pitcher_role_follows_saves_field() {
        assert_eq!(
            PitcherSeasonLine::for_role(PitcherRole::Reliever).role(),
            PitcherRole::Reliever
        );
        assert_eq!(
            PitcherSeasonLine::for_role(PitcherRole::Starter).role(),
            PitcherRole::Starter
        );
        assert_eq!(PitcherSeasonLine::for_role(PitcherRole::Starter).saves(), 0);
    }

    #[test]
    fn implied_totals() {
        let line = PitcherSeasonLine {
            ip: 45.0,
            era: 4.0,
            whip: 1.2,
            ..Default::default()
        };
        assert!((line.implied_er() - 20.0).abs() < 1e-12);
        assert!((line.implied_baserunners() - 54.0).abs() < 1e-12);
    }

    #[test]
    fn empty_stats_shape_matches_position() {
        let bat = PlayerStats::empty(Position::ShortStop);
        assert!(bat.batting().is_some());
        let sp = PlayerStats::empty(Position::StartingPitcher);
        assert_eq!(sp.pitching().map(|p| p.role()), Some(PitcherRole::Starter));
        let rp = PlayerStats::empty(Position::ReliefPitcher);
        assert_eq!(rp.pitching().map(|p| p.role()), Some(PitcherRole::Reliever));
    }

    #[test]
    fn starter_line_omits_saves_in_json() {
        let stats = PlayerStats::empty(Position::StartingPitcher);
        let json = serde_json::to_string(&stats).unwrap();
        assert!(json.contains("\"kind\":\"pitcher\""));
        assert!(!json.contains("\"sv\""));
        let back: PlayerStats = serde_json::from_str(&json).unwrap();
        assert_eq!(back, stats);
    }
}
