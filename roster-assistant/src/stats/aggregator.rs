// Incremental stat aggregation: sample one game's worth of stats and fold it
// into a cumulative season line.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::line::{safe_div, BatterSeasonLine, PitcherRole, PitcherSeasonLine};

// ---------------------------------------------------------------------------
// Simulation constants
// ---------------------------------------------------------------------------

pub const MAX_AB_PER_GAME: u32 = 5;
/// Chance each at-bat produces a hit.
pub const HIT_CHANCE: f64 = 0.26;
/// Chance a hit leaves the park.
pub const HR_PER_HIT_CHANCE: f64 = 0.13;
pub const STOLEN_BASE_CHANCE: f64 = 0.08;
pub const WALK_CHANCE: f64 = 0.30;

/// Innings ranges in tenths of an inning.
const STARTER_IP_TENTHS: (u32, u32) = (30, 70);
const RELIEVER_IP_TENTHS: (u32, u32) = (1, 20);

/// Per-inning rate ranges for strikeouts, walks, earned runs and hits.
const K_PER_INNING: (f64, f64) = (0.6, 1.4);
const BB_PER_INNING: (f64, f64) = (0.2, 0.5);
const ER_PER_INNING: (f64, f64) = (0.1, 0.7);
const H_PER_INNING: (f64, f64) = (0.6, 1.2);

pub const WIN_CHANCE: f64 = 0.35;
pub const LOSS_CHANCE: f64 = 0.30;
pub const QUALITY_START_CHANCE: f64 = 0.85;
pub const SAVE_CHANCE: f64 = 0.35;
/// Longest outing that can still be a save opportunity.
pub const SAVE_MAX_IP: f64 = 1.5;

// ---------------------------------------------------------------------------
// Increments
// ---------------------------------------------------------------------------

/// One game of batting stats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatterIncrement {
    pub ab: u32,
    pub r: u32,
    pub h: u32,
    pub hr: u32,
    pub rbi: u32,
    pub sb: u32,
    pub bb: u32,
    pub so: u32,
}

/// One outing of pitching stats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PitcherIncrement {
    pub ip: f64,
    pub k: u32,
    pub bb: u32,
    pub er: u32,
    pub h: u32,
    pub win: bool,
    pub loss: bool,
    pub quality_start: bool,
    pub save: bool,
}

// ---------------------------------------------------------------------------
// Sampling
// ---------------------------------------------------------------------------

/// Sample one game for a batter.
pub fn sample_batter_game(rng: &mut impl Rng) -> BatterIncrement {
    let ab = rng.gen_range(0..=MAX_AB_PER_GAME);
    let mut h = 0;
    let mut hr = 0;
    for _ in 0..ab {
        if rng.gen_bool(HIT_CHANCE) {
            h += 1;
            if rng.gen_bool(HR_PER_HIT_CHANCE) {
                hr += 1;
            }
        }
    }

    let r = hr + rng.gen_range(0..=2);
    let rbi = hr + rng.gen_range(0..=2);
    let sb = u32::from(rng.gen_bool(STOLEN_BASE_CHANCE));
    let bb = u32::from(rng.gen_bool(WALK_CHANCE));
    let so = rng.gen_range(0..=ab - h);

    BatterIncrement {
        ab,
        r,
        h,
        hr,
        rbi,
        sb,
        bb,
        so,
    }
}

fn per_inning(rng: &mut impl Rng, ip: f64, range: (f64, f64)) -> u32 {
    let rate = rng.gen_range(range.0..=range.1);
    (ip * rate).round() as u32
}

/// Sample one outing for a pitcher in the given role.
pub fn sample_pitcher_outing(rng: &mut impl Rng, role: PitcherRole) -> PitcherIncrement {
    let (lo, hi) = match role {
        PitcherRole::Starter => STARTER_IP_TENTHS,
        PitcherRole::Reliever => RELIEVER_IP_TENTHS,
    };
    let ip = f64::from(rng.gen_range(lo..=hi)) / 10.0;

    let k = per_inning(rng, ip, K_PER_INNING);
    let bb = per_inning(rng, ip, BB_PER_INNING);
    let er = per_inning(rng, ip, ER_PER_INNING);
    let h = per_inning(rng, ip, H_PER_INNING);

    let win = rng.gen_bool(WIN_CHANCE);
    let loss = !win && rng.gen_bool(LOSS_CHANCE);
    let quality_start = role == PitcherRole::Starter
        && ip >= 6.0
        && er <= 3
        && rng.gen_bool(QUALITY_START_CHANCE);
    let save = role == PitcherRole::Reliever
        && ip <= SAVE_MAX_IP
        && er == 0
        && rng.gen_bool(SAVE_CHANCE);

    PitcherIncrement {
        ip,
        k,
        bb,
        er,
        h,
        win,
        loss,
        quality_start,
        save,
    }
}

// ---------------------------------------------------------------------------
// Folding increments into season lines
// ---------------------------------------------------------------------------

/// Add one game to a batter's line and recompute every rate.
pub fn apply_batter_increment(line: &mut BatterSeasonLine, inc: &BatterIncrement) {
    line.ab += inc.ab;
    line.r += inc.r;
    line.h += inc.h;
    line.hr += inc.hr;
    line.rbi += inc.rbi;
    line.sb += inc.sb;
    line.bb += inc.bb;
    line.so += inc.so;
    line.recompute_rates();
}

/// Add one outing to a pitcher's line.
///
/// The line does not keep earned runs or hits, so ERA and WHIP are rebuilt
/// from the totals implied by the prior rate and innings.
pub fn apply_pitcher_increment(line: &mut PitcherSeasonLine, inc: &PitcherIncrement) {
    let prior_er = line.implied_er();
    let prior_baserunners = line.implied_baserunners();

    let new_ip = line.ip + inc.ip;
    line.era = safe_div((prior_er + f64::from(inc.er)) * 9.0, new_ip);
    line.whip = safe_div(prior_baserunners + f64::from(inc.bb + inc.h), new_ip);

    line.ip = new_ip;
    line.k += inc.k;
    line.bb += inc.bb;
    line.k9 = safe_div(f64::from(line.k) * 9.0, line.ip);

    if inc.win {
        line.w += 1;
    }
    if inc.loss {
        line.l += 1;
    }
    match line.sv.as_mut() {
        Some(saves) => {
            if inc.save {
                *saves += 1;
            }
        }
        None => {
            if inc.quality_start {
                line.qs += 1;
            }
        }
    }
}
