mod config_reader;
mod io_common;
mod io_csv;
mod render;

use log::{debug, info, warn};

use community_scores::builder::Builder;
use community_scores::*;
use snafu::{prelude::*, Snafu};

use std::path::Path;
use std::thread;
use std::time::Duration;

use crate::args::{Args, Command};
use crate::dashboard::config_reader::*;
use crate::dashboard::io_common::write_output;
use crate::dashboard::io_csv::VoteStore;

#[derive(Debug, Snafu)]
pub enum DashError {
    #[snafu(display("Error opening file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing the configuration: {source}"))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("Error writing the summary: {source}"))]
    WritingJson { source: serde_json::Error },
    #[snafu(display("Invalid configuration: {message}"))]
    InvalidConfig { message: String },
    #[snafu(display("Error creating the vote file {path}"))]
    CsvCreate { source: csv::Error, path: String },
    #[snafu(display("Error opening the vote file {path}"))]
    CsvOpen { source: csv::Error, path: String },
    #[snafu(display("Error reading line {lineno} of the vote file: {source}"))]
    CsvLineParse { source: csv::Error, lineno: u64 },
    #[snafu(display("Error writing {path}"))]
    CsvWrite { source: csv::Error, path: String },
    #[snafu(display("Error reading {path}"))]
    ReadingFile {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error writing {path}"))]
    WritingFile {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("{source}"))]
    Scoring { source: ScoringErrors },
    #[snafu(display("Could not understand score {arg:?}, expected CATEGORY=POINTS"))]
    InvalidScoreArg { arg: String },
    #[snafu(display("Unknown output format {format:?}, expected table, csv or json"))]
    UnknownFormat { format: String },
}

pub type DashResult<T> = Result<T, DashError>;

pub fn run_command(args: &Args) -> DashResult<()> {
    let settings = read_settings(args.config.as_deref(), args.votes.as_deref())?;
    info!("settings: {:?}", settings);
    match &args.command {
        Command::Init => run_init(&settings),
        Command::Status { voter } => run_status(&settings, voter),
        Command::Vote {
            voter,
            evaluated,
            score,
        } => run_vote(&settings, voter, evaluated, score),
        Command::Results {
            format,
            out,
            charts,
        } => run_results(&settings, format.as_deref(), out.as_deref(), *charts),
        Command::Watch {
            interval_ms,
            rounds,
            charts,
        } => run_watch(&settings, *interval_ms, *rounds, *charts),
        Command::Export { raw, summary } => {
            run_export(&settings, raw.as_deref(), summary.as_deref())
        }
    }
}

pub fn run_init(settings: &EventSettings) -> DashResult<()> {
    let store = VoteStore::open(&settings.vote_file)?;
    println!("Vote file ready: {}", store.path().display());
    Ok(())
}

pub fn run_status(settings: &EventSettings, voter: &str) -> DashResult<()> {
    if !settings.teams.iter().any(|t| t == voter) {
        return Err(DashError::Scoring {
            source: ScoringErrors::UnknownTeam(voter.to_string()),
        });
    }
    let store = VoteStore::open(&settings.vote_file)?;
    let votes = store.read_votes()?;
    let status = voting_status(&votes, &settings.teams, voter, settings.categories.len());
    print!("{}", render::format_status(voter, &status));
    Ok(())
}

pub fn run_vote(
    settings: &EventSettings,
    voter: &str,
    evaluated: &str,
    score_args: &[String],
) -> DashResult<()> {
    let builder = Builder::new(&settings.rules)
        .and_then(|b| b.teams(&settings.teams))
        .and_then(|b| b.categories(&settings.categories))
        .context(ScoringSnafu {})?;
    let mut ballot = builder.ballot(voter, evaluated).context(ScoringSnafu {})?;
    for arg in score_args {
        let (category, points) = parse_score_arg(arg)?;
        ballot.score(&category, points).context(ScoringSnafu {})?;
    }

    let mut store = VoteStore::open(&settings.vote_file)?;
    let written = store.submit(&ballot)?;
    for v in written.iter() {
        println!("  {}: {}", v.category, v.points);
    }
    println!("✅ Voto registrado para {}", evaluated);
    Ok(())
}

pub fn run_results(
    settings: &EventSettings,
    format: Option<&str>,
    out: Option<&str>,
    charts: bool,
) -> DashResult<()> {
    let store = VoteStore::open(&settings.vote_file)?;
    let result = compute_results(settings, &store)?;
    let contents = match format.unwrap_or("table") {
        "table" => render::render_results(settings, &result, charts),
        "csv" => render::summary_csv(&result)?,
        "json" => {
            let js = render::summary_json(settings, &result);
            serde_json::to_string_pretty(&js).context(WritingJsonSnafu {})? + "\n"
        }
        x => {
            return UnknownFormatSnafu {
                format: x.to_string(),
            }
            .fail()
        }
    };
    write_output(out.unwrap_or("stdout"), &contents)
}

pub fn run_watch(
    settings: &EventSettings,
    interval_ms: Option<u64>,
    rounds: Option<u64>,
    charts: bool,
) -> DashResult<()> {
    let interval = interval_ms
        .map(Duration::from_millis)
        .unwrap_or(settings.refresh_interval);
    let store = VoteStore::open(&settings.vote_file)?;
    info!("run_watch: refreshing every {:?}", interval);

    let mut round: u64 = 0;
    loop {
        round += 1;
        match compute_results(settings, &store) {
            Ok(result) => {
                // Clear the terminal and move the cursor home.
                print!("\x1B[2J\x1B[H");
                print!("{}", render::render_results(settings, &result, charts));
            }
            Err(e) => {
                warn!("run_watch: refresh {} failed: {}", round, e);
            }
        }
        if rounds.map_or(false, |r| round >= r) {
            return Ok(());
        }
        thread::sleep(interval);
    }
}

pub fn run_export(
    settings: &EventSettings,
    raw: Option<&str>,
    summary: Option<&str>,
) -> DashResult<()> {
    let store = VoteStore::open(&settings.vote_file)?;
    if raw.is_none() && summary.is_none() {
        warn!("run_export: nothing to export, use --raw or --summary");
    }
    if let Some(raw_p) = raw {
        if raw_p == "stdout" {
            write_output(raw_p, &store.read_raw()?)?;
        } else {
            let n = store.export_raw(Path::new(raw_p))?;
            info!("run_export: copied {} bytes to {}", n, raw_p);
        }
    }
    if let Some(summary_p) = summary {
        let result = compute_results(settings, &store)?;
        write_output(summary_p, &render::summary_csv(&result)?)?;
    }
    Ok(())
}

fn compute_results(settings: &EventSettings, store: &VoteStore) -> DashResult<ScoringResult> {
    let votes = store.read_votes()?;
    debug!("compute_results: {} votes", votes.len());
    run_score_stats(&votes, &settings.teams, &settings.categories).context(ScoringSnafu {})
}

/// Parses `CATEGORY=POINTS`. The category name may itself contain `=`.
fn parse_score_arg(arg: &str) -> DashResult<(String, u32)> {
    let (category, points) = arg
        .rsplit_once('=')
        .context(InvalidScoreArgSnafu { arg })?;
    let category = category.trim();
    let points = points
        .trim()
        .parse::<u32>()
        .ok()
        .context(InvalidScoreArgSnafu { arg })?;
    ensure!(!category.is_empty(), InvalidScoreArgSnafu { arg });
    Ok((category.to_string(), points))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn settings_in(dir: &Path) -> EventSettings {
        read_settings(None, Some(dir.join("votos.csv").to_str().unwrap())).unwrap()
    }

    #[test]
    fn score_args() {
        assert_eq!(
            parse_score_arg("sabor=7").unwrap(),
            ("sabor".to_string(), 7)
        );
        assert_eq!(
            parse_score_arg(" creatividad = 10 ").unwrap(),
            ("creatividad".to_string(), 10)
        );
        assert!(parse_score_arg("sabor").is_err());
        assert!(parse_score_arg("sabor=-1").is_err());
        assert!(parse_score_arg("=3").is_err());
    }

    #[test]
    fn vote_then_results() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings_in(dir.path());
        run_vote(
            &settings,
            "Javi, Jorge",
            "Maria Elvira",
            &["sabor=9".to_string(), "creatividad=7".to_string()],
        )
        .unwrap();

        let store = VoteStore::open(&settings.vote_file).unwrap();
        let result = compute_results(&settings, &store).unwrap();
        assert_eq!(result.total_votes, 3);
        assert_eq!(result.winners, vec!["Maria Elvira".to_string()]);
        // (9 + 5 + 7) / 3
        assert_eq!(result.max_overall, 7.0);

        let again = run_vote(&settings, "Javi, Jorge", "Maria Elvira", &[]);
        assert!(matches!(
            again,
            Err(DashError::Scoring {
                source: ScoringErrors::AlreadyVoted { .. }
            })
        ));
    }

    #[test]
    fn vote_rejects_self_and_bad_points() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings_in(dir.path());
        assert!(run_vote(&settings, "Dario, Mateo", "Dario, Mateo", &[]).is_err());
        assert!(run_vote(
            &settings,
            "Dario, Mateo",
            "Javi, Jorge",
            &["sabor=11".to_string()]
        )
        .is_err());
        let store = VoteStore::open(&settings.vote_file).unwrap();
        assert!(store.read_votes().unwrap().is_empty());
    }

    #[test]
    fn results_and_export_files() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings_in(dir.path());
        run_vote(&settings, "Dario, Mateo", "Javi, Jorge", &[]).unwrap();

        let json_p = dir.path().join("summary.json");
        run_results(&settings, Some("json"), json_p.to_str(), false).unwrap();
        let js: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&json_p).unwrap()).unwrap();
        assert_eq!(js["results"]["winners"][0], "Javi, Jorge");

        let raw_p = dir.path().join("raw.csv");
        let summary_p = dir.path().join("resumen.csv");
        run_export(&settings, raw_p.to_str(), summary_p.to_str()).unwrap();
        assert_eq!(
            fs::read_to_string(&raw_p).unwrap(),
            fs::read_to_string(&settings.vote_file).unwrap()
        );
        let summary = fs::read_to_string(&summary_p).unwrap();
        assert!(summary.starts_with("Equipo,sabor,presentacion,creatividad,Media Total\n"));

        assert!(matches!(
            run_results(&settings, Some("xml"), None, false),
            Err(DashError::UnknownFormat { .. })
        ));
    }

    #[test]
    fn watch_stops_after_rounds() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings_in(dir.path());
        run_watch(&settings, Some(1), Some(2), true).unwrap();
    }

    #[test]
    fn watch_keeps_going_on_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings_in(dir.path());
        fs::write(
            &settings.vote_file,
            "votante,evaluado,categoria,puntos\n\"Dario, Mateo\",\"Javi, Jorge\",sabor,mucho\n",
        )
        .unwrap();
        let store = VoteStore::open(&settings.vote_file).unwrap();
        assert!(compute_results(&settings, &store).is_err());
        // Every refresh fails, the loop still runs to the end.
        assert!(run_watch(&settings, Some(1), Some(2), false).is_ok());
    }

    #[test]
    fn status_rejects_unknown_voter() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings_in(dir.path());
        assert!(matches!(
            run_status(&settings, "Nadie"),
            Err(DashError::Scoring {
                source: ScoringErrors::UnknownTeam(_)
            })
        ));
        assert!(run_status(&settings, "Maria Elvira").is_ok());
    }
}
