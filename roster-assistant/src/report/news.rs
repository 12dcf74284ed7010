// player_news.md: the news feed, newest first.

use chrono::{DateTime, Utc};

use super::markdown::table;
use crate::news::{NewsItem, NewsKind};

fn kind_label(kind: NewsKind) -> &'static str {
    match kind {
        NewsKind::Performance => "Performance",
        NewsKind::Injury => "Injury",
        NewsKind::Transaction => "Transaction",
    }
}

pub fn render(news: &[NewsItem], my_team: &str, now: DateTime<Utc>) -> String {
    let mut s = String::new();
    s.push_str("# Player News\n\n");
    s.push_str(&format!(
        "_Generated {}_\n\n",
        now.format("%Y-%m-%d %H:%M UTC")
    ));

    let mine: Vec<&NewsItem> = news
        .iter()
        .filter(|n| n.team.as_deref() == Some(my_team))
        .collect();
    s.push_str(&format!("## {}\n\n", my_team));
    if mine.is_empty() {
        s.push_str("No news for your players.\n\n");
    } else {
        for item in mine {
            s.push_str(&format!(
                "- {} ({})\n",
                item.headline,
                item.published_at.format("%b %d")
            ));
        }
        s.push('\n');
    }

    s.push_str("## All News\n\n");
    if news.is_empty() {
        s.push_str("No news yet.\n");
        return s;
    }
    let rows: Vec<Vec<String>> = news
        .iter()
        .map(|n| {
            vec![
                n.published_at.format("%Y-%m-%d %H:%M").to_string(),
                kind_label(n.kind).to_string(),
                n.team.clone().unwrap_or_else(|| "Free agent".to_string()),
                n.headline.clone(),
            ]
        })
        .collect();
    s.push_str(&table(&["Date", "Type", "Team", "Headline"], &rows));
    s
}
