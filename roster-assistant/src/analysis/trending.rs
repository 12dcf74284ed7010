// Players running hot or cold against their projections.

use serde::Serialize;

use crate::league::LeagueState;

const MIN_TRENDING_AB: u32 = 30;
const MIN_TRENDING_IP: f64 = 10.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendingEntry {
    pub name: String,
    pub team: Option<String>,
    /// AB for batters, IP for pitchers.
    pub sample: f64,
    pub actual: f64,
    pub projected: f64,
    /// Positive means outperforming: AVG above projection, ERA below it.
    pub delta: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TrendingReport {
    pub hot_batters: Vec<TrendingEntry>,
    pub cold_batters: Vec<TrendingEntry>,
    pub hot_pitchers: Vec<TrendingEntry>,
    pub cold_pitchers: Vec<TrendingEntry>,
}

fn split(mut entries: Vec<TrendingEntry>, count: usize) -> (Vec<TrendingEntry>, Vec<TrendingEntry>) {
    entries.sort_by(|a, b| b.delta.total_cmp(&a.delta));
    let hot: Vec<TrendingEntry> = entries.iter().take(count).cloned().collect();
    let cold: Vec<TrendingEntry> = entries.iter().rev().take(count).cloned().collect();
    (hot, cold)
}

pub fn find_trending(state: &LeagueState, count: usize) -> TrendingReport {
    let mut batters = Vec::new();
    let mut pitchers = Vec::new();

    for (name, stats) in &state.stats {
        let Some(projection) = state.projections.get(name) else {
            continue;
        };
        let team = state.team_of(name).map(str::to_string);
        if let (Some(line), Some(proj)) = (stats.batting(), projection.batting()) {
            if line.ab >= MIN_TRENDING_AB {
                batters.push(TrendingEntry {
                    name: name.clone(),
                    team,
                    sample: f64::from(line.ab),
                    actual: line.avg,
                    projected: proj.avg,
                    delta: line.avg - proj.avg,
                });
            }
        } else if let (Some(line), Some(proj)) = (stats.pitching(), projection.pitching()) {
            if line.ip >= MIN_TRENDING_IP {
                pitchers.push(TrendingEntry {
                    name: name.clone(),
                    team,
                    sample: line.ip,
                    actual: line.era,
                    projected: proj.era,
                    delta: proj.era - line.era,
                });
            }
        }
    }

    let (hot_batters, cold_batters) = split(batters, count);
    let (hot_pitchers, cold_pitchers) = split(pitchers, count);
    TrendingReport {
        hot_batters,
        cold_batters,
        hot_pitchers,
        cold_pitchers,
    }
}
