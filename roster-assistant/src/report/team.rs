// team_analysis.md: league-wide team statistics, standings and the category
// rank matrix, then category ranks, roster, trade partners and
// recommendations for the configured team.

use chrono::{DateTime, Utc};

use super::markdown::{bullet_list, one, rate, table, two};
use crate::analysis::team::{Category, LeagueRankings, TeamAnalysis, TeamTotals};
use crate::analysis::LeagueAnalysis;
use crate::league::LeagueState;
use crate::stats::projection::Projection;

fn category_value(totals: &TeamTotals, cat: Category) -> String {
    match cat {
        Category::AVG | Category::OPS => rate(totals.value(cat)),
        Category::ERA | Category::WHIP | Category::K9 => two(totals.value(cat)),
        _ => format!("{}", totals.value(cat)),
    }
}

fn team_label(team: &str, my_team: &str) -> String {
    if team == my_team {
        format!("**{}**", team)
    } else {
        team.to_string()
    }
}

fn team_stats_tables(rankings: &LeagueRankings, my_team: &str) -> String {
    let mut batting = Vec::new();
    let mut pitching = Vec::new();
    for (team, t) in &rankings.totals {
        let label = team_label(team, my_team);
        batting.push(vec![
            label.clone(),
            t.r.to_string(),
            t.hr.to_string(),
            t.rbi.to_string(),
            t.sb.to_string(),
            rate(t.avg),
            rate(t.ops),
        ]);
        pitching.push(vec![
            label,
            one(t.ip),
            two(t.era),
            two(t.whip),
            two(t.k9),
            t.qs.to_string(),
            t.sv.to_string(),
        ]);
    }

    let mut s = String::new();
    s.push_str("### Batting\n\n");
    s.push_str(&table(
        &["Team", "R", "HR", "RBI", "SB", "AVG", "OPS"],
        &batting,
    ));
    s.push_str("\n### Pitching\n\n");
    s.push_str(&table(
        &["Team", "IP", "ERA", "WHIP", "K9", "QS", "SV"],
        &pitching,
    ));
    s
}

fn standings_table(rankings: &LeagueRankings, my_team: &str) -> String {
    let rows: Vec<Vec<String>> = rankings
        .standings
        .iter()
        .enumerate()
        .map(|(i, s)| {
            vec![
                (i + 1).to_string(),
                team_label(&s.team, my_team),
                s.batting_points.to_string(),
                s.pitching_points.to_string(),
                s.points.to_string(),
            ]
        })
        .collect();
    table(&["Rank", "Team", "Batting", "Pitching", "Total"], &rows)
}

/// Every team's rank in every category, in standings order.
fn rank_matrix(rankings: &LeagueRankings, my_team: &str) -> String {
    let mut headers = vec!["Team"];
    headers.extend(Category::ALL.iter().map(|c| c.label()));
    headers.push("Total");

    let rows: Vec<Vec<String>> = rankings
        .standings
        .iter()
        .map(|s| {
            let mut row = vec![team_label(&s.team, my_team)];
            row.extend(Category::ALL.iter().map(|cat| {
                rankings
                    .rank(&s.team, *cat)
                    .map(|r| r.to_string())
                    .unwrap_or_else(|| "-".to_string())
            }));
            row.push(s.points.to_string());
            row
        })
        .collect();
    table(&headers, &rows)
}

fn category_table(rankings: &LeagueRankings, team: &str) -> String {
    let Some(totals) = rankings.totals.get(team) else {
        return String::new();
    };
    let n = rankings.num_teams();
    let rows: Vec<Vec<String>> = Category::ALL
        .iter()
        .map(|cat| {
            let rank = rankings
                .rank(team, *cat)
                .map(|r| format!("{r} of {n}"))
                .unwrap_or_default();
            vec![cat.label().to_string(), category_value(totals, *cat), rank]
        })
        .collect();
    table(&["Category", "Projected", "Rank"], &rows)
}

fn roster_table(state: &LeagueState, team: &str) -> String {
    let Some(roster) = state.rosters.get(team) else {
        return String::new();
    };
    let rows: Vec<Vec<String>> = roster
        .sorted_by_position()
        .into_iter()
        .map(|entry| {
            let line = match state.projections.get(&entry.name) {
                Some(Projection::Batter(b)) => format!(
                    "{} R, {} HR, {} RBI, {} SB, {} AVG, {} OPS",
                    b.r,
                    b.hr,
                    b.rbi,
                    b.sb,
                    rate(b.avg),
                    rate(b.ops)
                ),
                Some(Projection::Pitcher(p)) => format!(
                    "{} IP, {} ERA, {} WHIP, {} K9, {} QS, {} SV",
                    one(p.ip),
                    two(p.era),
                    two(p.whip),
                    one(p.k9),
                    p.qs,
                    p.sv
                ),
                None => "no projection".to_string(),
            };
            vec![entry.position.to_string(), entry.name.clone(), line]
        })
        .collect();
    table(&["Pos", "Player", "Projection"], &rows)
}

fn labels(cats: &[Category]) -> String {
    cats.iter().map(|c| c.label()).collect::<Vec<_>>().join(", ")
}

fn profile_line(cats: &[(Category, usize)]) -> String {
    cats.iter()
        .map(|(c, r)| format!("{} (#{})", c.label(), r))
        .collect::<Vec<_>>()
        .join(", ")
}

fn my_team_sections(state: &LeagueState, rankings: &LeagueRankings, a: &TeamAnalysis) -> String {
    let mut s = String::new();

    s.push_str("## Category Ranks\n\n");
    s.push_str(&category_table(rankings, &a.team));
    s.push_str(&format!("\n**Strengths:** {}\n\n", profile_line(&a.strengths)));
    s.push_str(&format!("**Weaknesses:** {}\n\n", profile_line(&a.weaknesses)));

    s.push_str("## Roster\n\n");
    s.push_str(&roster_table(state, &a.team));
    s.push('\n');

    s.push_str("## Trade Partners\n\n");
    if a.trade_partners.is_empty() {
        s.push_str("No team lines up as a natural trade partner right now.\n\n");
    } else {
        let rows: Vec<Vec<String>> = a
            .trade_partners
            .iter()
            .map(|p| {
                vec![
                    p.team.clone(),
                    labels(&p.they_need),
                    labels(&p.they_offer),
                    p.notable_players.join(", "),
                ]
            })
            .collect();
        s.push_str(&table(
            &["Team", "They need", "They offer", "Players to target"],
            &rows,
        ));
        s.push('\n');
    }

    s.push_str("## Recommendations\n\n");
    let recs: Vec<String> = a
        .recommendations
        .iter()
        .map(|r| format!("**{}.** {}", r.title, r.detail))
        .collect();
    s.push_str(&bullet_list(&recs));
    s
}

pub fn render(
    state: &LeagueState,
    analysis: &LeagueAnalysis,
    my_team: &str,
    now: DateTime<Utc>,
) -> String {
    let mut s = String::new();
    s.push_str(&format!("# Team Analysis: {}\n\n", my_team));
    s.push_str(&format!(
        "_League {} \u{00b7} generated {}_\n\n",
        state.league_id,
        now.format("%Y-%m-%d %H:%M UTC")
    ));

    s.push_str("## Projected Team Statistics\n\n");
    s.push_str(&team_stats_tables(&analysis.rankings, my_team));
    s.push('\n');

    s.push_str("## Projected Standings\n\n");
    s.push_str(&standings_table(&analysis.rankings, my_team));
    s.push('\n');

    s.push_str("## Category Rank Matrix\n\n");
    s.push_str(&rank_matrix(&analysis.rankings, my_team));
    s.push('\n');

    match &analysis.my_team {
        Some(a) => s.push_str(&my_team_sections(state, &analysis.rankings, a)),
        None => s.push_str(&format!("Team '{}' is not in this league.\n", my_team)),
    }
    s
}
