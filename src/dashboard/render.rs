// Text rendering of the results: tables, podium and bar charts.

use serde_json::json;
use serde_json::Map as JSMap;
use serde_json::Value as JSValue;

use crate::dashboard::*;

pub const OVERALL_COLUMN: &str = "Media Total";
pub const TEAM_COLUMN: &str = "Equipo";
pub const NO_VOTES_MESSAGE: &str = "Aún no hay votos registrados.";

const CHART_WIDTH: usize = 30;

fn width_of(s: &str) -> usize {
    s.chars().count()
}

fn pad_right(s: &str, width: usize) -> String {
    format!("{}{}", s, " ".repeat(width.saturating_sub(width_of(s))))
}

fn pad_left(s: &str, width: usize) -> String {
    format!("{}{}", " ".repeat(width.saturating_sub(width_of(s))), s)
}

/// The results table: one line per team, the category means then the overall score.
pub fn format_table(res: &ScoringResult) -> String {
    let mut header: Vec<String> = vec![TEAM_COLUMN.to_string()];
    header.extend(res.categories.iter().cloned());
    header.push(OVERALL_COLUMN.to_string());

    let rows: Vec<Vec<String>> = res
        .scores
        .iter()
        .map(|ts| {
            let mut row = vec![ts.team.clone()];
            row.extend(ts.category_means.iter().map(|cm| format!("{:.2}", cm.mean)));
            row.push(format!("{:.2}", ts.overall));
            row
        })
        .collect();

    let widths: Vec<usize> = (0..header.len())
        .map(|col| {
            rows.iter()
                .map(|r| width_of(&r[col]))
                .chain(std::iter::once(width_of(&header[col])))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let format_line = |cells: &[String]| -> String {
        let parts: Vec<String> = cells
            .iter()
            .enumerate()
            .map(|(col, cell)| {
                if col == 0 {
                    pad_right(cell, widths[col])
                } else {
                    pad_left(cell, widths[col])
                }
            })
            .collect();
        format!("| {} |\n", parts.join(" | "))
    };
    let separator: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();

    let mut out = format_line(&header);
    out.push_str(&format!("|-{}-|\n", separator.join("-|-")));
    for r in rows.iter() {
        out.push_str(&format_line(r));
    }
    out
}

pub fn format_podium(res: &ScoringResult) -> String {
    let mut out = String::new();
    if !res.winners.is_empty() {
        out.push_str(&format!(
            "🏆 Ganador: {} — media {:.2}\n",
            res.winners.join(", "),
            res.max_overall
        ));
    }
    // With a single team standing, the loser line would repeat the winner.
    if !res.losers.is_empty() && res.losers != res.winners {
        out.push_str(&format!(
            "🥄 Última posición: {} — media {:.2}\n",
            res.losers.join(", "),
            res.min_overall
        ));
    }
    out
}

pub fn format_ranking(res: &ScoringResult) -> String {
    let name_width = res
        .ranking
        .iter()
        .map(|rt| width_of(&rt.team))
        .max()
        .unwrap_or(0);
    let mut out = String::from("Clasificación\n");
    for rt in res.ranking.iter() {
        out.push_str(&format!(
            "{:>3}. {} {:>6.2}\n",
            rt.rank,
            pad_right(&rt.team, name_width),
            rt.overall
        ));
    }
    out
}

fn bar(value: f64, scale: f64) -> String {
    let filled = if scale > 0.0 {
        ((value / scale) * CHART_WIDTH as f64).round().clamp(0.0, CHART_WIDTH as f64) as usize
    } else {
        0
    };
    "█".repeat(filled)
}

/// A horizontal bar per team, for the overall score.
pub fn format_overall_chart(res: &ScoringResult, max_points: u32) -> String {
    let scale = max_points as f64;
    let name_width = res
        .scores
        .iter()
        .map(|ts| width_of(&ts.team))
        .max()
        .unwrap_or(0);
    let mut out = format!("{}\n", OVERALL_COLUMN);
    for ts in res.scores.iter() {
        out.push_str(&format!(
            "  {} {} {:.2}\n",
            pad_right(&ts.team, name_width),
            bar(ts.overall, scale),
            ts.overall
        ));
    }
    out
}

/// One group of bars per category.
pub fn format_category_chart(res: &ScoringResult, max_points: u32) -> String {
    let scale = max_points as f64;
    let name_width = res
        .scores
        .iter()
        .map(|ts| width_of(&ts.team))
        .max()
        .unwrap_or(0);
    let mut out = String::new();
    for (idx, category) in res.categories.iter().enumerate() {
        out.push_str(&format!("{}\n", category));
        for ts in res.scores.iter() {
            let mean = ts.category_means.get(idx).map_or(0.0, |cm| cm.mean);
            out.push_str(&format!(
                "  {} {} {:.2}\n",
                pad_right(&ts.team, name_width),
                bar(mean, scale),
                mean
            ));
        }
    }
    out
}

/// The full screen shown by `results` and `watch`.
pub fn render_results(settings: &EventSettings, res: &ScoringResult, charts: bool) -> String {
    let mut out = format!("{}\n\n📊 Resultados en tiempo real\n\n", settings.title);
    if !res.has_votes() {
        out.push_str(NO_VOTES_MESSAGE);
        out.push('\n');
        return out;
    }
    out.push_str(&format_table(res));
    out.push('\n');
    let podium = format_podium(res);
    if !podium.is_empty() {
        out.push_str(&podium);
        out.push('\n');
    }
    out.push_str(&format_ranking(res));
    if charts {
        out.push('\n');
        out.push_str(&format_overall_chart(res, settings.rules.max_points));
        out.push('\n');
        out.push_str(&format_category_chart(res, settings.rules.max_points));
    }
    out
}

pub fn format_status(voter: &str, status: &[(String, bool)]) -> String {
    let mut out = format!("🗳️ {} evalúa a los otros equipos\n", voter);
    for (team, already_voted) in status.iter() {
        if *already_voted {
            out.push_str(&format!("  ✅ Ya has votado a {}\n", team));
        } else {
            out.push_str(&format!("  ⏳ Votar a {}\n", team));
        }
    }
    out
}

/// The summary table as CSV, with the same columns as the text table.
pub fn summary_csv(res: &ScoringResult) -> DashResult<String> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    let mut header: Vec<String> = vec![TEAM_COLUMN.to_string()];
    header.extend(res.categories.iter().cloned());
    header.push(OVERALL_COLUMN.to_string());
    wtr.write_record(&header)
        .context(CsvWriteSnafu { path: "<summary>" })?;
    for ts in res.scores.iter() {
        let mut row = vec![ts.team.clone()];
        row.extend(ts.category_means.iter().map(|cm| format!("{:.2}", cm.mean)));
        row.push(format!("{:.2}", ts.overall));
        wtr.write_record(&row)
            .context(CsvWriteSnafu { path: "<summary>" })?;
    }
    let bytes = wtr
        .into_inner()
        .map_err(|e| e.into_error())
        .context(WritingFileSnafu { path: "<summary>" })?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

pub fn summary_json(settings: &EventSettings, res: &ScoringResult) -> JSValue {
    let scores: Vec<JSValue> = res
        .scores
        .iter()
        .map(|ts| {
            let mut categories: JSMap<String, JSValue> = JSMap::new();
            for cm in ts.category_means.iter() {
                categories.insert(
                    cm.category.clone(),
                    json!({"mean": cm.mean, "voteCount": cm.vote_count}),
                );
            }
            json!({
                "team": ts.team,
                "categories": categories,
                "overall": ts.overall,
                "voteCount": ts.vote_count,
            })
        })
        .collect();
    let ranking: Vec<JSValue> = res
        .ranking
        .iter()
        .map(|rt| json!({"rank": rt.rank, "team": rt.team, "overall": rt.overall}))
        .collect();
    json!({
        "config": {
            "title": settings.title,
            "teams": settings.teams,
            "categories": settings.categories,
            "voteFile": settings.vote_file.display().to_string(),
        },
        "results": {
            "totalVotes": res.total_votes,
            "scores": scores,
            "ranking": ranking,
            "winners": res.winners,
            "losers": res.losers,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(xs: &[&str]) -> Vec<String> {
        xs.iter().map(|s| s.to_string()).collect()
    }

    fn vote(voter: &str, evaluated: &str, category: &str, points: u32) -> Vote {
        Vote {
            voter: voter.to_string(),
            evaluated: evaluated.to_string(),
            category: category.to_string(),
            points,
        }
    }

    fn settings() -> EventSettings {
        EventSettings {
            title: "Cena".to_string(),
            teams: names(&["Norte", "Sur", "Este"]),
            categories: names(&["sabor", "postre"]),
            vote_file: "votos.csv".into(),
            refresh_interval: Duration::from_millis(1000),
            rules: ScoreRules::DEFAULT_RULES,
        }
    }

    fn result(votes: &[Vote]) -> ScoringResult {
        let s = settings();
        run_score_stats(votes, &s.teams, &s.categories).unwrap()
    }

    #[test]
    fn table_has_all_teams() {
        let res = result(&[vote("Sur", "Norte", "sabor", 9), vote("Sur", "Norte", "postre", 6)]);
        let table = format_table(&res);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], "| Equipo | sabor | postre | Media Total |");
        assert_eq!(lines[2], "| Norte  |  9.00 |   6.00 |        7.50 |");
        assert_eq!(lines[4], "| Este   |  0.00 |   0.00 |        0.00 |");
    }

    #[test]
    fn podium_lists_ties() {
        let res = result(&[
            vote("Este", "Norte", "sabor", 8),
            vote("Este", "Sur", "sabor", 8),
        ]);
        let podium = format_podium(&res);
        assert!(podium.contains("Ganador: Norte, Sur — media 4.00"));
        assert!(podium.contains("Última posición: Este — media 0.00"));
    }

    #[test]
    fn empty_results_message() {
        let out = render_results(&settings(), &result(&[]), true);
        assert!(out.starts_with("Cena\n"));
        assert!(out.contains(NO_VOTES_MESSAGE));
        assert!(!out.contains("Ganador"));
    }

    #[test]
    fn charts_scale_to_max_points() {
        let res = result(&[vote("Sur", "Norte", "sabor", 10), vote("Sur", "Norte", "postre", 10)]);
        let chart = format_overall_chart(&res, 10);
        let norte = chart.lines().find(|l| l.contains("Norte")).unwrap();
        assert_eq!(norte.matches('█').count(), CHART_WIDTH);
        let sur = chart.lines().find(|l| l.contains("Sur")).unwrap();
        assert_eq!(sur.matches('█').count(), 0);

        let by_cat = format_category_chart(&res, 20);
        assert!(by_cat.starts_with("sabor\n"));
        let first = by_cat.lines().nth(1).unwrap();
        assert_eq!(first.matches('█').count(), CHART_WIDTH / 2);
    }

    #[test]
    fn status_lines() {
        let out = format_status(
            "Norte",
            &[("Sur".to_string(), true), ("Este".to_string(), false)],
        );
        assert!(out.contains("✅ Ya has votado a Sur"));
        assert!(out.contains("⏳ Votar a Este"));
    }

    #[test]
    fn summary_exports() {
        let res = result(&[vote("Sur", "Norte", "sabor", 7)]);
        let csv = summary_csv(&res).unwrap();
        assert_eq!(
            csv,
            "Equipo,sabor,postre,Media Total\nNorte,7.00,0.00,3.50\nSur,0.00,0.00,0.00\nEste,0.00,0.00,0.00\n"
        );
        let js = summary_json(&settings(), &res);
        assert_eq!(js["results"]["winners"], json!(["Norte"]));
        assert_eq!(js["results"]["losers"], json!(["Sur", "Este"]));
        assert_eq!(js["results"]["scores"][0]["categories"]["sabor"]["mean"], json!(7.0));
        assert_eq!(js["results"]["ranking"][1]["rank"], json!(2));
    }
}
