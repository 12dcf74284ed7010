// Small markdown building blocks shared by the report pages.

/// Render a pipe table. Rows shorter than the header are padded with empty
/// cells; pipes inside cells are escaped.
pub fn table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut s = String::new();
    s.push_str(&format!("| {} |\n", headers.join(" | ")));
    s.push_str(&format!(
        "|{}\n",
        headers.iter().map(|_| "---|").collect::<String>()
    ));
    for row in rows {
        let cells: Vec<String> = (0..headers.len())
            .map(|i| row.get(i).map(|c| c.replace('|', "\\|")).unwrap_or_default())
            .collect();
        s.push_str(&format!("| {} |\n", cells.join(" | ")));
    }
    s
}

/// Batting-average style: three decimals without the leading zero.
pub fn rate(v: f64) -> String {
    let s = format!("{:.3}", v);
    match s.strip_prefix("0.") {
        Some(rest) => format!(".{rest}"),
        None => s,
    }
}

pub fn two(v: f64) -> String {
    format!("{:.2}", v)
}

pub fn one(v: f64) -> String {
    format!("{:.1}", v)
}

pub fn bullet_list(items: &[String]) -> String {
    let mut s = String::new();
    for item in items {
        s.push_str(&format!("- {item}\n"));
    }
    s
}
