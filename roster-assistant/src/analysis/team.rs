// Team-level analysis: projected category totals, rotisserie standings, and
// the strengths/weaknesses/trade-partner breakdown for the user's team.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::league::{LeagueState, TeamRoster};
use crate::stats::line::safe_div;
use crate::stats::projection::{BatterProjection, PitcherProjection, Projection};

/// How many best and worst categories count as strengths and weaknesses.
const PROFILE_SIZE: usize = 4;
const MAX_TRADE_PARTNERS: usize = 3;
const MAX_PARTNER_PLAYERS: usize = 3;
/// Batters beyond this many on a roster are treated as bench bats.
const STARTING_BATTERS: usize = 9;

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Category {
    R,
    HR,
    RBI,
    SB,
    AVG,
    OPS,
    ERA,
    WHIP,
    K9,
    QS,
    SV,
}

impl Category {
    pub const ALL: [Category; 11] = [
        Category::R,
        Category::HR,
        Category::RBI,
        Category::SB,
        Category::AVG,
        Category::OPS,
        Category::ERA,
        Category::WHIP,
        Category::K9,
        Category::QS,
        Category::SV,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Category::R => "R",
            Category::HR => "HR",
            Category::RBI => "RBI",
            Category::SB => "SB",
            Category::AVG => "AVG",
            Category::OPS => "OPS",
            Category::ERA => "ERA",
            Category::WHIP => "WHIP",
            Category::K9 => "K9",
            Category::QS => "QS",
            Category::SV => "SV",
        }
    }

    pub fn lower_is_better(&self) -> bool {
        matches!(self, Category::ERA | Category::WHIP)
    }

    pub fn is_pitching(&self) -> bool {
        matches!(
            self,
            Category::ERA | Category::WHIP | Category::K9 | Category::QS | Category::SV
        )
    }

    /// Whether a projection is strong enough in this category to headline a
    /// trade conversation.
    pub fn is_notable(&self, projection: &Projection) -> bool {
        match (self, projection) {
            (Category::R, Projection::Batter(b)) => b.r > 90,
            (Category::HR, Projection::Batter(b)) => b.hr > 30,
            (Category::RBI, Projection::Batter(b)) => b.rbi > 90,
            (Category::SB, Projection::Batter(b)) => b.sb > 20,
            (Category::AVG, Projection::Batter(b)) => b.avg > 0.280,
            (Category::OPS, Projection::Batter(b)) => b.ops > 0.850,
            (Category::ERA, Projection::Pitcher(p)) => p.era < 3.20,
            (Category::WHIP, Projection::Pitcher(p)) => p.whip < 1.10,
            (Category::K9, Projection::Pitcher(p)) => p.k9 > 10.5,
            (Category::QS, Projection::Pitcher(p)) => p.qs > 18,
            (Category::SV, Projection::Pitcher(p)) => p.sv > 30,
            _ => false,
        }
    }
}

// ---------------------------------------------------------------------------
// Team totals
// ---------------------------------------------------------------------------

/// A team's projected category totals.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TeamTotals {
    pub ab: u32,
    pub hits: u32,
    pub r: u32,
    pub hr: u32,
    pub rbi: u32,
    pub sb: u32,
    pub avg: f64,
    pub ops: f64,
    pub ip: f64,
    pub era: f64,
    pub whip: f64,
    pub k9: f64,
    pub qs: u32,
    pub sv: u32,
}

impl TeamTotals {
    pub fn value(&self, cat: Category) -> f64 {
        match cat {
            Category::R => f64::from(self.r),
            Category::HR => f64::from(self.hr),
            Category::RBI => f64::from(self.rbi),
            Category::SB => f64::from(self.sb),
            Category::AVG => self.avg,
            Category::OPS => self.ops,
            Category::ERA => self.era,
            Category::WHIP => self.whip,
            Category::K9 => self.k9,
            Category::QS => f64::from(self.qs),
            Category::SV => f64::from(self.sv),
        }
    }
}

/// Sum a roster's projections into category totals. AVG is hits over AB with
/// hits rounded per player; OPS is AB-weighted; pitching ratios are rebuilt
/// from implied earned runs, baserunners and strikeouts.
pub fn team_totals(roster: &TeamRoster, projections: &BTreeMap<String, Projection>) -> TeamTotals {
    let mut t = TeamTotals::default();
    let mut ops_weighted = 0.0;
    let mut er = 0.0;
    let mut baserunners = 0.0;
    let mut k = 0.0;

    for entry in &roster.players {
        match projections.get(&entry.name) {
            Some(Projection::Batter(b)) => {
                t.ab += b.ab;
                t.hits += (f64::from(b.ab) * b.avg).round() as u32;
                t.r += b.r;
                t.hr += b.hr;
                t.rbi += b.rbi;
                t.sb += b.sb;
                ops_weighted += b.ops * f64::from(b.ab);
            }
            Some(Projection::Pitcher(p)) => {
                t.ip += p.ip;
                er += p.ip * p.era / 9.0;
                baserunners += p.ip * p.whip;
                k += p.ip * p.k9 / 9.0;
                t.qs += p.qs;
                t.sv += p.sv;
            }
            None => {}
        }
    }

    t.avg = safe_div(f64::from(t.hits), f64::from(t.ab));
    t.ops = safe_div(ops_weighted, f64::from(t.ab));
    t.era = safe_div(er * 9.0, t.ip);
    t.whip = safe_div(baserunners, t.ip);
    t.k9 = safe_div(k * 9.0, t.ip);
    t
}

// ---------------------------------------------------------------------------
// Rotisserie rankings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Standing {
    pub team: String,
    /// Points from R, HR, RBI, SB, AVG and OPS.
    pub batting_points: u32,
    /// Points from ERA, WHIP, K9, QS and SV.
    pub pitching_points: u32,
    pub points: u32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LeagueRankings {
    pub totals: BTreeMap<String, TeamTotals>,
    /// 1-based rank per team per category.
    pub ranks: BTreeMap<String, BTreeMap<Category, usize>>,
    /// Sorted by points, best first; ties keep alphabetical order.
    pub standings: Vec<Standing>,
}

impl LeagueRankings {
    pub fn num_teams(&self) -> usize {
        self.totals.len()
    }

    pub fn rank(&self, team: &str, cat: Category) -> Option<usize> {
        self.ranks.get(team).and_then(|r| r.get(&cat)).copied()
    }
}

/// Rank every team in every category. With N teams, first place earns N
/// points and last place earns 1.
pub fn rank_teams(state: &LeagueState) -> LeagueRankings {
    let totals: BTreeMap<String, TeamTotals> = state
        .rosters
        .iter()
        .map(|(team, roster)| (team.clone(), team_totals(roster, &state.projections)))
        .collect();
    let n = totals.len();

    let mut ranks: BTreeMap<String, BTreeMap<Category, usize>> = BTreeMap::new();
    let mut points: BTreeMap<&str, Standing> = totals
        .keys()
        .map(|t| {
            let standing = Standing {
                team: t.clone(),
                ..Default::default()
            };
            (t.as_str(), standing)
        })
        .collect();

    for cat in Category::ALL {
        let mut order: Vec<(&str, f64)> = totals
            .iter()
            .map(|(team, t)| (team.as_str(), t.value(cat)))
            .collect();
        // Stable sort keeps alphabetical order among ties.
        if cat.lower_is_better() {
            order.sort_by(|a, b| a.1.total_cmp(&b.1));
        } else {
            order.sort_by(|a, b| b.1.total_cmp(&a.1));
        }
        for (i, (team, _)) in order.iter().enumerate() {
            ranks
                .entry(team.to_string())
                .or_default()
                .insert(cat, i + 1);
            if let Some(s) = points.get_mut(team) {
                let earned = (n - i) as u32;
                if cat.is_pitching() {
                    s.pitching_points += earned;
                } else {
                    s.batting_points += earned;
                }
                s.points += earned;
            }
        }
    }

    let mut standings: Vec<Standing> = points.into_values().collect();
    standings.sort_by(|a, b| b.points.cmp(&a.points));

    LeagueRankings {
        totals,
        ranks,
        standings,
    }
}

// ---------------------------------------------------------------------------
// My-team analysis
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradePartner {
    pub team: String,
    /// My strengths where this team ranks near the bottom.
    pub they_need: Vec<Category>,
    /// My weaknesses where this team ranks near the top.
    pub they_offer: Vec<Category>,
    pub notable_players: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub title: String,
    pub detail: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamAnalysis {
    pub team: String,
    pub strengths: Vec<(Category, usize)>,
    pub weaknesses: Vec<(Category, usize)>,
    pub trade_partners: Vec<TradePartner>,
    pub recommendations: Vec<Recommendation>,
}

impl TeamAnalysis {
    fn weak(&self, cat: Category) -> bool {
        self.weaknesses.iter().any(|(c, _)| *c == cat)
    }

    fn strong(&self, cat: Category) -> bool {
        self.strengths.iter().any(|(c, _)| *c == cat)
    }
}

/// Break down one team against the league. Returns `None` when the team is
/// not in the league.
pub fn analyze_team(
    state: &LeagueState,
    rankings: &LeagueRankings,
    team: &str,
) -> Option<TeamAnalysis> {
    let my_ranks = rankings.ranks.get(team)?;
    let roster = state.rosters.get(team)?;

    let mut by_rank: Vec<(Category, usize)> = my_ranks.iter().map(|(c, r)| (*c, *r)).collect();
    by_rank.sort_by_key(|(_, r)| *r);
    let strengths: Vec<(Category, usize)> = by_rank.iter().take(PROFILE_SIZE).copied().collect();
    let weaknesses: Vec<(Category, usize)> =
        by_rank.iter().rev().take(PROFILE_SIZE).copied().collect();

    let mut analysis = TeamAnalysis {
        team: team.to_string(),
        trade_partners: find_trade_partners(state, rankings, team, &strengths, &weaknesses),
        strengths,
        weaknesses,
        recommendations: Vec::new(),
    };
    analysis.recommendations = recommendations(&analysis, roster, &state.projections);
    Some(analysis)
}

fn find_trade_partners(
    state: &LeagueState,
    rankings: &LeagueRankings,
    my_team: &str,
    strengths: &[(Category, usize)],
    weaknesses: &[(Category, usize)],
) -> Vec<TradePartner> {
    let n = rankings.num_teams();
    let weak_cutoff = n * 2 / 3;
    let strong_cutoff = (n / 3).max(1);

    let mut partners = Vec::new();
    for (team, roster) in &state.rosters {
        if team == my_team {
            continue;
        }
        let they_need: Vec<Category> = strengths
            .iter()
            .map(|(c, _)| *c)
            .filter(|c| rankings.rank(team, *c).is_some_and(|r| r > weak_cutoff))
            .collect();
        let they_offer: Vec<Category> = weaknesses
            .iter()
            .map(|(c, _)| *c)
            .filter(|c| rankings.rank(team, *c).is_some_and(|r| r <= strong_cutoff))
            .collect();
        if they_need.is_empty() || they_offer.is_empty() {
            continue;
        }

        let notable_players: Vec<String> = roster
            .players
            .iter()
            .filter(|p| {
                state
                    .projections
                    .get(&p.name)
                    .is_some_and(|proj| they_offer.iter().any(|c| c.is_notable(proj)))
            })
            .take(MAX_PARTNER_PLAYERS)
            .map(|p| p.name.clone())
            .collect();
        if notable_players.is_empty() {
            continue;
        }

        partners.push(TradePartner {
            team: team.clone(),
            they_need,
            they_offer,
            notable_players,
        });
    }

    partners.sort_by(|a, b| {
        (b.they_need.len() + b.they_offer.len()).cmp(&(a.they_need.len() + a.they_offer.len()))
    });
    partners.truncate(MAX_TRADE_PARTNERS);
    partners
}

fn weakness_theme(cat: Category) -> &'static str {
    match cat {
        Category::ERA | Category::WHIP | Category::K9 | Category::QS => "starting pitching",
        Category::SV => "relief pitching",
        Category::HR | Category::RBI => "power hitting",
        Category::R | Category::SB => "speed",
        Category::AVG | Category::OPS => "batting average/OPS",
    }
}

fn batter_proj<'a>(
    projections: &'a BTreeMap<String, Projection>,
    name: &str,
) -> Option<&'a BatterProjection> {
    projections.get(name).and_then(Projection::batting)
}

fn pitcher_proj<'a>(
    projections: &'a BTreeMap<String, Projection>,
    name: &str,
) -> Option<&'a PitcherProjection> {
    projections.get(name).and_then(Projection::pitching)
}

fn recommendations(
    analysis: &TeamAnalysis,
    roster: &TeamRoster,
    projections: &BTreeMap<String, Projection>,
) -> Vec<Recommendation> {
    let mut recs = Vec::new();
    let weakness_labels: Vec<&str> = analysis.weaknesses.iter().map(|(c, _)| c.label()).collect();

    let themes: BTreeSet<&str> = analysis
        .weaknesses
        .iter()
        .map(|(c, _)| weakness_theme(*c))
        .collect();
    if !themes.is_empty() {
        recs.push(Recommendation {
            title: format!("Target {}", themes.into_iter().collect::<Vec<_>>().join(", ")),
            detail: format!(
                "Your team ranks lowest in {}. Look for trades and pickups that help these categories.",
                weakness_labels.join(", ")
            ),
        });
    }

    let speed_players: Vec<&str> = roster
        .batters()
        .filter(|p| batter_proj(projections, &p.name).is_some_and(|b| b.sb > 20 || b.r > 90))
        .map(|p| p.name.as_str())
        .collect();
    if (analysis.strong(Category::SB) || analysis.strong(Category::R)) && !speed_players.is_empty()
    {
        recs.push(Recommendation {
            title: "Trade from strength".into(),
            detail: format!(
                "Your run-scoring and speed are ahead of the league. {} could bring back help where you are short.",
                speed_players.iter().take(2).copied().collect::<Vec<_>>().join(" or ")
            ),
        });
    }

    if analysis.weak(Category::OPS) {
        recs.push(Recommendation {
            title: "Improve OPS".into(),
            detail: "Add a bat that gets on base and hits for extra bases; OPS moves slowly, so act early.".into(),
        });
    }
    if analysis.weak(Category::ERA) || analysis.weak(Category::WHIP) {
        recs.push(Recommendation {
            title: "Focus on pitching ratios".into(),
            detail: "Favor pitchers with strong ERA and WHIP even if their strikeout or quality-start totals are modest.".into(),
        });
    }

    let closers: Vec<&str> = roster
        .pitchers()
        .filter(|p| pitcher_proj(projections, &p.name).is_some_and(|pp| pp.sv > 0))
        .map(|p| p.name.as_str())
        .collect();
    if closers.len() > 2 && !analysis.weak(Category::SV) {
        if let Some(last) = closers.last() {
            recs.push(Recommendation {
                title: "Consider trading a closer".into(),
                detail: format!(
                    "You carry {} relievers with save chances. Moving one, such as {}, could fill another need.",
                    closers.len(),
                    last
                ),
            });
        }
    }

    let bench: Vec<&str> = roster
        .batters()
        .skip(STARTING_BATTERS)
        .map(|p| p.name.as_str())
        .collect();
    if !bench.is_empty() {
        recs.push(Recommendation {
            title: "Monitor the bench".into(),
            detail: format!(
                "{} sit beyond your starting nine. Swap them in if they outperform a starter.",
                bench.join(", ")
            ),
        });
    }

    if let Some(partner) = analysis.trade_partners.first() {
        let chip = analysis.strengths.iter().find_map(|(cat, _)| match cat {
            Category::SB => roster
                .batters()
                .find(|p| batter_proj(projections, &p.name).is_some_and(|b| b.sb > 20))
                .map(|p| (p.name.as_str(), *cat)),
            Category::SV => roster
                .pitchers()
                .find(|p| pitcher_proj(projections, &p.name).is_some_and(|pp| pp.sv > 20))
                .map(|p| (p.name.as_str(), *cat)),
            _ => None,
        });
        if let (Some((chip, cat)), Some(target)) = (chip, partner.notable_players.first()) {
            recs.push(Recommendation {
                title: "Trade package idea".into(),
                detail: format!(
                    "Offer {} ({}) to {} for {}.",
                    chip,
                    cat.label(),
                    partner.team,
                    target
                ),
            });
        }
    }

    if analysis.weak(Category::ERA) || analysis.weak(Category::WHIP) {
        recs.push(Recommendation {
            title: "Waiver wire focus".into(),
            detail: "Watch for starters with good ratios who are available because their counting stats lag.".into(),
        });
    } else if analysis.weak(Category::OPS) || analysis.weak(Category::AVG) {
        recs.push(Recommendation {
            title: "Waiver wire focus".into(),
            detail: "Watch for hot, high-OBP hitters who can give short-term help.".into(),
        });
    }

    recs
}
