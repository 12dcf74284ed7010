// free_agents.md: best available players by position and by category.

use chrono::{DateTime, Utc};

use super::markdown::{one, rate, table, two};
use crate::analysis::free_agents::{category_leaders, group_by_position, FreeAgentEntry};
use crate::stats::projection::Projection;

fn projection_cells(projection: &Projection) -> Vec<String> {
    match projection {
        Projection::Batter(b) => vec![
            b.r.to_string(),
            b.hr.to_string(),
            b.rbi.to_string(),
            b.sb.to_string(),
            rate(b.avg),
            rate(b.ops),
        ],
        Projection::Pitcher(p) => vec![
            one(p.ip),
            two(p.era),
            two(p.whip),
            one(p.k9),
            p.qs.to_string(),
            p.sv.to_string(),
        ],
    }
}

pub fn render(entries: &[FreeAgentEntry], per_group: usize, now: DateTime<Utc>) -> String {
    let mut s = String::new();
    s.push_str("# Free Agents\n\n");
    s.push_str(&format!(
        "_{} available players \u{00b7} generated {}_\n\n",
        entries.len(),
        now.format("%Y-%m-%d %H:%M UTC")
    ));

    s.push_str("## By Position\n\n");
    for (position, group) in group_by_position(entries, per_group) {
        s.push_str(&format!("### {}\n\n", position));
        let headers: &[&str] = if position.is_pitcher() {
            &["Player", "Score", "IP", "ERA", "WHIP", "K9", "QS", "SV"]
        } else {
            &["Player", "Score", "R", "HR", "RBI", "SB", "AVG", "OPS"]
        };
        let rows: Vec<Vec<String>> = group
            .iter()
            .map(|e| {
                let mut row = vec![e.name.clone(), one(e.score)];
                row.extend(projection_cells(&e.projection));
                row
            })
            .collect();
        s.push_str(&table(headers, &rows));
        s.push('\n');
    }

    s.push_str("## Category Leaders\n\n");
    for board in category_leaders(entries, per_group) {
        if board.leaders.is_empty() {
            continue;
        }
        s.push_str(&format!("### {}\n\n", board.title));
        let rows: Vec<Vec<String>> = board
            .leaders
            .iter()
            .map(|(name, value)| {
                let v = match board.stat {
                    "AVG" | "OPS" => rate(*value),
                    "ERA" | "WHIP" => two(*value),
                    _ => one(*value),
                };
                vec![name.clone(), v]
            })
            .collect();
        s.push_str(&table(&["Player", board.stat], &rows));
        s.push('\n');
    }
    s
}
