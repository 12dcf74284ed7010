// Rest-of-season projections and how observed performance nudges them.
//
// A missing projection is synthesized from baseline ranges scaled by how the
// player's current line compares to league norms. An existing projection is
// blended toward current performance once the sample is large enough, with
// every adjustment ratio clamped to a per-stat band.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::line::{safe_div, BatterSeasonLine, PitcherRole, PitcherSeasonLine, SeasonLine};

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatterProjection {
    pub ab: u32,
    pub r: u32,
    pub hr: u32,
    pub rbi: u32,
    pub sb: u32,
    pub avg: f64,
    pub ops: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PitcherProjection {
    pub ip: f64,
    pub era: f64,
    pub whip: f64,
    pub k9: f64,
    pub qs: u32,
    pub sv: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Projection {
    Batter(BatterProjection),
    Pitcher(PitcherProjection),
}

impl Projection {
    pub fn batting(&self) -> Option<&BatterProjection> {
        match self {
            Projection::Batter(b) => Some(b),
            Projection::Pitcher(_) => None,
        }
    }

    pub fn pitching(&self) -> Option<&PitcherProjection> {
        match self {
            Projection::Pitcher(p) => Some(p),
            Projection::Batter(_) => None,
        }
    }
}

/// Inclusive clamp range for an adjustment ratio.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatioBand {
    pub lo: f64,
    pub hi: f64,
}

impl RatioBand {
    pub const fn around_one(spread: f64) -> Self {
        Self {
            lo: 1.0 - spread,
            hi: 1.0 + spread,
        }
    }

    pub fn contains(&self, ratio: f64) -> bool {
        (self.lo..=self.hi).contains(&ratio)
    }
}

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Innings a pitcher must exceed before their projection is blended.
pub const PITCHER_SAMPLE_IP: f64 = 20.0;
/// At-bats a batter must exceed before their projection is blended.
pub const BATTER_SAMPLE_AB: u32 = 75;

pub const SYNTHESIS_BAND: RatioBand = RatioBand::around_one(0.25);
pub const AVG_BAND: RatioBand = RatioBand::around_one(0.15);
pub const OPS_BAND: RatioBand = RatioBand::around_one(0.15);
pub const K9_BAND: RatioBand = RatioBand::around_one(0.15);
pub const ERA_BAND: RatioBand = RatioBand::around_one(0.20);
pub const WHIP_BAND: RatioBand = RatioBand::around_one(0.20);
/// Counting stats are compared as a pace (per AB or per IP).
pub const PACE_BAND: RatioBand = RatioBand::around_one(0.30);

pub const LEAGUE_AVG: f64 = 0.250;
pub const LEAGUE_OPS: f64 = 0.720;
pub const LEAGUE_ERA: f64 = 4.00;
pub const LEAGUE_WHIP: f64 = 1.25;
pub const LEAGUE_K9: f64 = 8.8;

// ---------------------------------------------------------------------------
// Ratio helpers
// ---------------------------------------------------------------------------

/// `current / reference` clamped to `band`; 1.0 when the reference is not
/// positive, so a zero projection is left alone.
pub fn bounded_ratio(current: f64, reference: f64, band: RatioBand) -> f64 {
    if reference > 0.0 {
        let ratio = (current / reference).clamp(band.lo, band.hi);
        debug_assert!(band.contains(ratio));
        ratio
    } else {
        1.0
    }
}

/// Synthesis factor `anchor / current`, clamped to the synthesis band. A
/// line far from the league anchor is pulled back toward it. Neutral for an
/// empty sample or a zero current value.
pub fn synthesis_factor(current: f64, anchor: f64, has_sample: bool) -> f64 {
    if has_sample {
        bounded_ratio(anchor, current, SYNTHESIS_BAND)
    } else {
        1.0
    }
}

fn scale_count(value: u32, factor: f64) -> u32 {
    (f64::from(value) * factor).round() as u32
}

fn round3(x: f64) -> f64 {
    (x * 1000.0).round() / 1000.0
}

impl BatterProjection {
    /// Rate fields to three decimals.
    pub fn round(&mut self) {
        self.avg = round3(self.avg);
        self.ops = round3(self.ops);
    }
}

impl PitcherProjection {
    /// Rate fields to three decimals, innings to whole innings.
    pub fn round(&mut self) {
        self.ip = self.ip.round();
        self.era = round3(self.era);
        self.whip = round3(self.whip);
        self.k9 = round3(self.k9);
    }
}

// ---------------------------------------------------------------------------
// Synthesis
// ---------------------------------------------------------------------------

pub fn synthesize_batter_projection(
    line: &BatterSeasonLine,
    rng: &mut impl Rng,
) -> BatterProjection {
    let has_sample = line.ab > 0;
    let avg_factor = synthesis_factor(line.avg, LEAGUE_AVG, has_sample);
    let ops_factor = synthesis_factor(line.ops, LEAGUE_OPS, has_sample);

    let mut proj = BatterProjection {
        ab: rng.gen_range(400..=600),
        r: scale_count(rng.gen_range(55..=95), ops_factor),
        hr: scale_count(rng.gen_range(10..=35), ops_factor),
        rbi: scale_count(rng.gen_range(50..=100), ops_factor),
        sb: rng.gen_range(2..=25),
        avg: rng.gen_range(0.235..=0.290) * avg_factor,
        ops: rng.gen_range(0.680..=0.850) * ops_factor,
    };
    proj.round();
    proj
}

pub fn synthesize_pitcher_projection(
    line: &PitcherSeasonLine,
    rng: &mut impl Rng,
) -> PitcherProjection {
    let has_sample = line.ip > 0.0;
    let era_factor = synthesis_factor(line.era, LEAGUE_ERA, has_sample);
    let whip_factor = synthesis_factor(line.whip, LEAGUE_WHIP, has_sample);
    let k9_factor = synthesis_factor(line.k9, LEAGUE_K9, has_sample);

    let (ip, qs, sv) = match line.role() {
        PitcherRole::Starter => (rng.gen_range(140.0..=200.0), rng.gen_range(10..=20), 0),
        PitcherRole::Reliever => (rng.gen_range(50.0..=75.0), 0, rng.gen_range(0..=35)),
    };

    let mut proj = PitcherProjection {
        ip,
        era: rng.gen_range(3.20..=4.60) * era_factor,
        whip: rng.gen_range(1.05..=1.40) * whip_factor,
        k9: rng.gen_range(7.0..=11.5) * k9_factor,
        qs,
        sv,
    };
    proj.round();
    proj
}

// ---------------------------------------------------------------------------
// Blending
// ---------------------------------------------------------------------------

/// Nudge a batter projection toward the current line. Returns `false` (and
/// leaves the projection untouched) while the sample is too small.
pub fn blend_batter_projection(line: &BatterSeasonLine, proj: &mut BatterProjection) -> bool {
    if line.ab <= BATTER_SAMPLE_AB {
        return false;
    }

    proj.avg *= bounded_ratio(line.avg, proj.avg, AVG_BAND);
    proj.ops *= bounded_ratio(line.ops, proj.ops, OPS_BAND);

    let ab = f64::from(line.ab);
    let proj_ab = f64::from(proj.ab);
    let pace = |actual: u32, projected: u32| {
        bounded_ratio(
            f64::from(actual) / ab,
            safe_div(f64::from(projected), proj_ab),
            PACE_BAND,
        )
    };
    let (r, hr, rbi, sb) = (
        pace(line.r, proj.r),
        pace(line.hr, proj.hr),
        pace(line.rbi, proj.rbi),
        pace(line.sb, proj.sb),
    );
    proj.r = scale_count(proj.r, r);
    proj.hr = scale_count(proj.hr, hr);
    proj.rbi = scale_count(proj.rbi, rbi);
    proj.sb = scale_count(proj.sb, sb);
    proj.round();
    true
}

/// Nudge a pitcher projection toward the current line. Returns `false` (and
/// leaves the projection untouched) while the sample is too small.
pub fn blend_pitcher_projection(line: &PitcherSeasonLine, proj: &mut PitcherProjection) -> bool {
    if line.ip <= PITCHER_SAMPLE_IP {
        return false;
    }

    proj.era *= bounded_ratio(line.era, proj.era, ERA_BAND);
    proj.whip *= bounded_ratio(line.whip, proj.whip, WHIP_BAND);
    proj.k9 *= bounded_ratio(line.k9, proj.k9, K9_BAND);

    let proj_ip = proj.ip;
    let pace = |actual: u32, projected: u32| {
        bounded_ratio(
            f64::from(actual) / line.ip,
            safe_div(f64::from(projected), proj_ip),
            PACE_BAND,
        )
    };
    match line.sv {
        Some(saves) => {
            let factor = pace(saves, proj.sv);
            proj.sv = scale_count(proj.sv, factor);
        }
        None => {
            let factor = pace(line.qs, proj.qs);
            proj.qs = scale_count(proj.qs, factor);
        }
    }
    proj.round();
    true
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Produce the projection for a player after their line has been updated:
/// synthesize one when absent, otherwise blend the existing one.
///
/// A projection whose kind does not match the line (a batter projection for a
/// pitcher line, say) is discarded and re-synthesized.
pub fn adjust_projection(
    player: &str,
    line: &SeasonLine,
    existing: Option<Projection>,
    rng: &mut impl Rng,
) -> Projection {
    match (line, existing) {
        (SeasonLine::Batter(bat), Some(Projection::Batter(mut proj))) => {
            blend_batter_projection(bat, &mut proj);
            Projection::Batter(proj)
        }
        (SeasonLine::Pitcher(arm), Some(Projection::Pitcher(mut proj))) => {
            blend_pitcher_projection(arm, &mut proj);
            Projection::Pitcher(proj)
        }
        (line, existing) => {
            if existing.is_some() {
                warn!("projection for '{}' does not match its season line; regenerating", player);
            }
            match line {
                SeasonLine::Batter(bat) => {
                    Projection::Batter(synthesize_batter_projection(bat, rng))
                }
                SeasonLine::Pitcher(arm) => {
                    Projection::Pitcher(synthesize_pitcher_projection(arm, rng))
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn approx_eq(a: f64, b: f64, eps: f64) -> bool {
        (a - b).abs() < eps
    }

    fn has_three_decimals(x: f64) -> bool {
        approx_eq((x * 1000.0).round() / 1000.0, x, 1e-12)
    }

    fn make_batter_line(ab: u32, h: u32, hr: u32, r: u32, rbi: u32, sb: u32) -> BatterSeasonLine {
        let mut line = BatterSeasonLine {
            ab,
            h,
            hr,
            r,
            rbi,
            sb,
            bb: ab / 10,
            ..Default::default()
        };
        line.recompute_rates();
        line
    }

    fn make_batter_projection() -> BatterProjection {
        BatterProjection {
            ab: 500,
            r: 80,
            hr: 25,
            rbi: 80,
            sb: 10,
            avg: 0.260,
            ops: 0.780,
        }
    }

    fn make_pitcher_projection() -> PitcherProjection {
        PitcherProjection {
            ip: 180.0,
            era: 3.60,
            whip: 1.20,
            k9: 9.0,
            qs: 16,
            sv: 0,
        }
    }

    #[test]
    fn bounded_ratio_clamps_and_ignores_zero_reference() {
        assert_eq!(bounded_ratio(0.500, 0.250, AVG_BAND), AVG_BAND.hi);
        assert_eq!(bounded_ratio(0.0, 0.250, AVG_BAND), AVG_BAND.lo);
        assert!(approx_eq(AVG_BAND.hi, 1.15, 1e-12));
        assert!(approx_eq(bounded_ratio(0.270, 0.250, AVG_BAND), 1.08, 1e-12));
        assert_eq!(bounded_ratio(5.0, 0.0, PACE_BAND), 1.0);
    }

    #[test]
    fn small_batter_sample_leaves_projection_alone() {
        let line = make_batter_line(75, 40, 10, 20, 25, 5);
        let mut proj = make_batter_projection();
        assert!(!blend_batter_projection(&line, &mut proj));
        assert_eq!(proj, make_batter_projection());
    }

    #[test]
    fn extreme_batter_divergence_stays_in_band() {
        // .500 hitter with a huge home run pace against a .260 projection
        let line = make_batter_line(100, 50, 20, 30, 40, 0);
        let mut proj = make_batter_projection();
        assert!(blend_batter_projection(&line, &mut proj));

        assert!(approx_eq(proj.avg, round3(0.260 * AVG_BAND.hi), 1e-12));
        assert!(approx_eq(proj.ops, round3(0.780 * OPS_BAND.hi), 1e-12));
        assert_eq!(proj.hr, (25.0 * PACE_BAND.hi).round() as u32);
        // zero steals against a projected 10 pulls the pace to the floor
        assert_eq!(proj.sb, 7);
        assert_eq!(proj.ab, 500);
    }

    #[test]
    fn zero_projected_stat_is_left_alone() {
        let line = make_batter_line(120, 30, 4, 15, 14, 9);
        let mut proj = BatterProjection {
            sb: 0,
            ..make_batter_projection()
        };
        blend_batter_projection(&line, &mut proj);
        assert_eq!(proj.sb, 0);
    }

    #[test]
    fn pitcher_blend_respects_bands() {
        let line = PitcherSeasonLine {
            ip: 30.0,
            era: 9.00,
            whip: 0.50,
            k: 60,
            k9: 18.0,
            qs: 0,
            ..Default::default()
        };
        let mut proj = make_pitcher_projection();
        assert!(blend_pitcher_projection(&line, &mut proj));
        assert!(approx_eq(proj.era, round3(3.60 * ERA_BAND.hi), 1e-12));
        assert!(approx_eq(proj.whip, round3(1.20 * WHIP_BAND.lo), 1e-12));
        assert!(approx_eq(proj.k9, round3(9.0 * K9_BAND.hi), 1e-12));
        assert_eq!(proj.qs, 11);
        assert_eq!(proj.sv, 0);
    }

    #[test]
    fn repeated_batter_blends_converge_without_drift() {
        // .450 hitter with a 30 HR / 200 AB pace, blended every pass
        let line = make_batter_line(200, 90, 30, 50, 60, 0);
        let mut proj = make_batter_projection();
        for _ in 0..100 {
            let prev = proj.clone();
            blend_batter_projection(&line, &mut proj);
            assert!(proj.avg.is_finite() && proj.ops.is_finite());
            let step = proj.avg / prev.avg;
            assert!(step >= AVG_BAND.lo - 0.01 && step <= AVG_BAND.hi + 0.01);
        }

        assert!(approx_eq(proj.avg, line.avg, 1e-9));
        assert!(approx_eq(proj.ops, round3(line.ops), 1e-9));
        assert_eq!(proj.hr, 75);
        assert_eq!(proj.ab, 500);

        // Settled: one more pass changes nothing.
        let settled = proj.clone();
        blend_batter_projection(&line, &mut proj);
        assert_eq!(proj, settled);
    }

    #[test]
    fn repeated_pitcher_blends_converge_without_drift() {
        let line = PitcherSeasonLine {
            ip: 100.0,
            era: 1.50,
            whip: 0.80,
            k: 150,
            k9: 13.5,
            qs: 20,
            ..Default::default()
        };
        let mut proj = make_pitcher_projection();
        for _ in 0..100 {
            blend_pitcher_projection(&line, &mut proj);
            assert!(proj.era.is_finite() && proj.whip.is_finite() && proj.k9.is_finite());
            assert!(proj.era > 0.0 && proj.whip > 0.0);
        }

        assert!(approx_eq(proj.era, 1.50, 1e-9));
        assert!(approx_eq(proj.whip, 0.80, 1e-9));
        assert!(approx_eq(proj.k9, 13.5, 1e-9));
        // 20 QS per 100 IP over a 180 IP projection
        assert_eq!(proj.qs, 36);

        let settled = proj.clone();
        blend_pitcher_projection(&line, &mut proj);
        assert_eq!(proj, settled);
    }

    #[test]
    fn reliever_blend_moves_saves_not_quality_starts() {
        let line = PitcherSeasonLine {
            ip: 25.0,
            era: 3.00,
            whip: 1.10,
            k: 30,
            k9: 10.8,
            sv: Some(12),
            ..Default::default()
        };
        let mut proj = PitcherProjection {
            ip: 65.0,
            qs: 0,
            sv: 20,
            ..make_pitcher_projection()
        };
        blend_pitcher_projection(&line, &mut proj);
        // 12/25 vs 20/65 per inning is far above the band
        assert_eq!(proj.sv, 26);
        assert_eq!(proj.qs, 0);
    }

    #[test]
    fn small_pitcher_sample_leaves_projection_alone() {
        let line = PitcherSeasonLine {
            ip: 20.0,
            era: 12.0,
            ..Default::default()
        };
        let mut proj = make_pitcher_projection();
        assert!(!blend_pitcher_projection(&line, &mut proj));
        assert_eq!(proj, make_pitcher_projection());
    }

    #[test]
    fn synthesis_factor_is_bounded() {
        assert_eq!(synthesis_factor(0.100, LEAGUE_AVG, true), 1.25);
        assert_eq!(synthesis_factor(0.0, LEAGUE_AVG, true), 1.0);
        assert_eq!(synthesis_factor(0.0, LEAGUE_AVG, false), 1.0);
        assert!(approx_eq(synthesis_factor(4.5, LEAGUE_ERA, true), 4.0 / 4.5, 1e-12));
        assert!(SYNTHESIS_BAND.contains(synthesis_factor(4.5, LEAGUE_ERA, true)));
    }

    #[test]
    fn synthesis_pulls_hot_and_cold_lines_toward_anchor() {
        // .350 hitter: .250 / .350 is below the band floor
        assert_eq!(synthesis_factor(0.350, LEAGUE_AVG, true), 0.75);
        // .200 hitter: .250 / .200
        assert!(approx_eq(synthesis_factor(0.200, LEAGUE_AVG, true), 1.25, 1e-12));
        // 2.00 ERA: 4.00 / 2.00 is above the band ceiling
        assert_eq!(synthesis_factor(2.00, LEAGUE_ERA, true), 1.25);
        // 6.00 ERA: 4.00 / 6.00 is below the band floor
        assert_eq!(synthesis_factor(6.00, LEAGUE_ERA, true), 0.75);
    }

    #[test]
    fn synthesized_batter_within_scaled_ranges() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let hot = make_batter_line(40, 24, 6, 10, 12, 1);
        for _ in 0..200 {
            let proj = synthesize_batter_projection(&hot, &mut rng);
            assert!((400..=600).contains(&proj.ab));
            // .600 over 40 AB pulls the baseline down by the full band
            assert!(proj.avg >= 0.235 * 0.75 - 1e-3 && proj.avg <= 0.290 * 0.75 + 1e-3);
            assert!(proj.ops >= 0.680 * 0.75 - 1e-3 && proj.ops <= 0.850 * 0.75 + 1e-3);
            assert!(has_three_decimals(proj.avg));
            assert!(has_three_decimals(proj.ops));
        }
    }

    #[test]
    fn synthesized_pitcher_matches_role() {
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let starter = PitcherSeasonLine::for_role(PitcherRole::Starter);
        let reliever = PitcherSeasonLine::for_role(PitcherRole::Reliever);
        for _ in 0..100 {
            let sp = synthesize_pitcher_projection(&starter, &mut rng);
            assert!(sp.ip >= 140.0 && sp.ip <= 200.0);
            assert_eq!(sp.sv, 0);
            assert_eq!(sp.ip, sp.ip.round());
            assert!(has_three_decimals(sp.era));

            let rp = synthesize_pitcher_projection(&reliever, &mut rng);
            assert!(rp.ip >= 50.0 && rp.ip <= 75.0);
            assert_eq!(rp.qs, 0);
        }
    }

    #[test]
    fn adjust_synthesizes_when_missing_or_mismatched() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let line = SeasonLine::Batter(make_batter_line(10, 3, 0, 1, 1, 0));
        let fresh = adjust_projection("A", &line, None, &mut rng);
        assert!(fresh.batting().is_some());

        let wrong = Projection::Pitcher(make_pitcher_projection());
        let fixed = adjust_projection("A", &line, Some(wrong), &mut rng);
        assert!(fixed.batting().is_some());
    }

    #[test]
    fn adjust_keeps_existing_below_threshold() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let line = SeasonLine::Batter(make_batter_line(10, 3, 0, 1, 1, 0));
        let existing = Projection::Batter(make_batter_projection());
        let out = adjust_projection("A", &line, Some(existing.clone()), &mut rng);
        assert_eq!(out, existing);
    }
}
