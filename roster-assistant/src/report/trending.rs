// trending_players.md: hot and cold players against their projections.

use chrono::{DateTime, Utc};

use super::markdown::{one, rate, table, two};
use crate::analysis::trending::{TrendingEntry, TrendingReport};

fn section(title: &str, entries: &[TrendingEntry], pitchers: bool) -> String {
    let mut s = format!("## {}\n\n", title);
    if entries.is_empty() {
        s.push_str("Not enough games played yet.\n\n");
        return s;
    }
    let headers: &[&str] = if pitchers {
        &["Player", "Team", "IP", "ERA", "Proj ERA", "Diff"]
    } else {
        &["Player", "Team", "AB", "AVG", "Proj AVG", "Diff"]
    };
    let rows: Vec<Vec<String>> = entries
        .iter()
        .map(|e| {
            let team = e.team.clone().unwrap_or_else(|| "Free agent".to_string());
            if pitchers {
                vec![
                    e.name.clone(),
                    team,
                    one(e.sample),
                    two(e.actual),
                    two(e.projected),
                    format!("{:+.2}", e.delta),
                ]
            } else {
                vec![
                    e.name.clone(),
                    team,
                    format!("{}", e.sample),
                    rate(e.actual),
                    rate(e.projected),
                    format!("{:+.3}", e.delta),
                ]
            }
        })
        .collect();
    s.push_str(&table(headers, &rows));
    s.push('\n');
    s
}

pub fn render(report: &TrendingReport, now: DateTime<Utc>) -> String {
    let mut s = String::new();
    s.push_str("# Trending Players\n\n");
    s.push_str(&format!(
        "_Season-to-date performance against projection \u{00b7} generated {}_\n\n",
        now.format("%Y-%m-%d %H:%M UTC")
    ));
    s.push_str(&section("Hot Batters", &report.hot_batters, false));
    s.push_str(&section("Cold Batters", &report.cold_batters, false));
    s.push_str(&section("Hot Pitchers", &report.hot_pitchers, true));
    s.push_str(&section("Cold Pitchers", &report.cold_pitchers, true));
    s
}
