//! Team dashboard page.

use super::{escape, layout};
use crate::stats::model::DashboardRow;

/// Outcome of the stats fetch behind the page.
pub enum StatsView<'a> {
    Loaded(&'a [DashboardRow]),
    Failed,
}

struct Series {
    label: &'static str,
    color: &'static str,
    value: fn(&DashboardRow) -> f64,
}

const SERIES: [Series; 5] = [
    Series { label: "Points per Game", color: "#8884d8", value: |r| r.points_per_game },
    Series { label: "Rebounds per Game", color: "#82ca9d", value: |r| r.rebounds_per_game },
    Series { label: "Assists per Game", color: "#ffc658", value: |r| r.assists_per_game },
    Series { label: "FG%", color: "#ff8042", value: |r| r.field_goal_percentage * 100.0 },
    Series { label: "Minutes per Game", color: "#0088fe", value: |r| r.minutes_per_game },
];

pub struct DashboardPage<'a> {
    pub team_name: &'a str,
    pub user_name: &'a str,
    pub season: u32,
    pub seasons: &'a [u32],
    pub stats: StatsView<'a>,
}

pub fn render(page: &DashboardPage<'_>) -> String {
    let team = escape(page.team_name);
    let user = escape(page.user_name);

    let options: String = page
        .seasons
        .iter()
        .map(|s| {
            let selected = if *s == page.season { " selected" } else { "" };
            format!(r#"<option value="{s}"{selected}>{s}-{:02}</option>"#, (s + 1) % 100)
        })
        .collect();

    let content = match &page.stats {
        StatsView::Failed => {
            r#"<p class="error">Player statistics are unavailable right now. Please try again later.</p>"#
                .to_string()
        }
        StatsView::Loaded([]) => {
            r#"<p class="muted">No season averages recorded for this season.</p>"#.to_string()
        }
        StatsView::Loaded(rows) => format!("{}{}", table(rows), chart(rows)),
    };

    let body = format!(
        r#"<nav>
  <h1 style="font-size:1.25rem">{team} Dashboard</h1>
  <div><span class="muted">{user}</span>
    <a class="button" style="display:inline-block;background:#ef4444;margin-left:1rem" href="/api/auth/logout">Logout</a></div>
</nav>
<main>
  <div class="card" style="max-width:none;text-align:left">
    <h2>Player Statistics</h2>
    <form method="get">
      <label for="season">Season</label>
      <select id="season" name="season" onchange="this.form.submit()">{options}</select>
      <noscript><button type="submit">Show</button></noscript>
    </form>
    {content}
  </div>
</main>"#
    );
    layout(&format!("{} Dashboard", page.team_name), &body)
}

fn table(rows: &[DashboardRow]) -> String {
    let header: String = SERIES.iter().map(|s| format!("<th>{}</th>", s.label)).collect();
    let body: String = rows
        .iter()
        .map(|r| {
            let cells: String = SERIES
                .iter()
                .map(|s| format!("<td>{:.1}</td>", (s.value)(r)))
                .collect();
            format!(
                "<tr><td>{} {}</td>{cells}</tr>",
                escape(&r.first_name),
                escape(&r.last_name)
            )
        })
        .collect();
    format!("<table><thead><tr><th>Player</th>{header}</tr></thead><tbody>{body}</tbody></table>")
}

fn chart(rows: &[DashboardRow]) -> String {
    let maxima: Vec<f64> = SERIES
        .iter()
        .map(|s| rows.iter().map(s.value).fold(0.0, f64::max))
        .collect();

    let legend: String = SERIES
        .iter()
        .map(|s| format!(r#"<span style="color:{}">&#9632; {}</span> "#, s.color, s.label))
        .collect();

    let groups: String = rows
        .iter()
        .map(|r| {
            let bars: String = SERIES
                .iter()
                .zip(&maxima)
                .map(|(s, max)| {
                    let value = (s.value)(r);
                    let width = if *max > 0.0 { value / max * 100.0 } else { 0.0 };
                    format!(
                        r#"<div class="bar" style="width:{width:.1}%;background:{}" title="{}: {value:.1}"></div>"#,
                        s.color, s.label
                    )
                })
                .collect();
            format!(
                r#"<div style="margin:.75rem 0"><strong>{}</strong>{bars}</div>"#,
                escape(&r.last_name)
            )
        })
        .collect();

    format!(r#"<section style="margin-top:1.5rem"><div>{legend}</div>{groups}</section>"#)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: u64, last: &str, pts: f64) -> DashboardRow {
        DashboardRow {
            id,
            first_name: "Test".into(),
            last_name: last.into(),
            points_per_game: pts,
            rebounds_per_game: 4.0,
            assists_per_game: 3.0,
            field_goal_percentage: 0.455,
            minutes_per_game: 30.0,
        }
    }

    fn page<'a>(rows: StatsView<'a>) -> DashboardPage<'a> {
        DashboardPage {
            team_name: "Charlotte Hornets",
            user_name: "fan@example.com",
            season: 2023,
            seasons: &[2024, 2023, 2022],
            stats: rows,
        }
    }

    #[test]
    fn test_renders_rows_and_bars() {
        let rows = vec![row(1, "Ball", 23.9), row(2, "<Miller>", 17.3)];
        let html = render(&page(StatsView::Loaded(&rows)));

        assert!(html.contains("<td>23.9</td>"));
        assert!(html.contains("<td>45.5</td>"));
        assert!(html.contains("&lt;Miller&gt;"));
        assert!(html.contains(r#"<option value="2023" selected>2023-24</option>"#));
        // Leader of a series gets the full-width bar.
        assert!(html.contains("width:100.0%;background:#8884d8"));
    }

    #[test]
    fn test_placeholder_and_error() {
        assert!(render(&page(StatsView::Loaded(&[]))).contains("No season averages recorded"));
        assert!(render(&page(StatsView::Failed)).contains("unavailable right now"));
    }
}
