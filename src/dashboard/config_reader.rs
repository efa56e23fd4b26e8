use crate::dashboard::io_common::resolve_path;
use crate::dashboard::*;

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

pub const DEFAULT_TITLE: &str = "🍽️ Cena por comunidades";

pub const DEFAULT_TEAMS: [&str; 8] = [
    "Maria Elvira",
    "Pau, Pauli, Carmen",
    "Anna, Oria, Carla",
    "Pablo, Alejandra",
    "Javi, Jorge",
    "Manu, Tomas, Paula",
    "Dario, Mateo",
    "Mariana, Ainhora, Sara",
];

pub const DEFAULT_CATEGORIES: [&str; 3] = ["sabor", "presentacion", "creatividad"];

pub const DEFAULT_VOTE_FILE: &str = "votos.csv";

pub const DEFAULT_REFRESH_INTERVAL_MS: u64 = 1000;

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct RulesConfig {
    #[serde(rename = "minPoints")]
    pub min_points: Option<u32>,
    #[serde(rename = "maxPoints")]
    pub max_points: Option<u32>,
    #[serde(rename = "defaultPoints")]
    pub default_points: Option<u32>,
}

/// The configuration file, as written by the organizers.
#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventConfig {
    pub title: Option<String>,
    pub teams: Option<Vec<String>>,
    pub categories: Option<Vec<String>>,
    #[serde(rename = "voteFile")]
    pub vote_file: Option<String>,
    #[serde(rename = "refreshIntervalMs")]
    pub refresh_interval_ms: Option<u64>,
    pub rules: Option<RulesConfig>,
}

/// The configuration once defaults are applied and checked.
#[derive(PartialEq, Debug, Clone)]
pub struct EventSettings {
    pub title: String,
    pub teams: Vec<String>,
    pub categories: Vec<String>,
    pub vote_file: PathBuf,
    pub refresh_interval: Duration,
    pub rules: ScoreRules,
}

pub fn read_config(path: &str) -> DashResult<EventConfig> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    debug!("read_config: {:?}", contents);
    serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})
}

/// Reads the configuration file if any, and applies the defaults.
///
/// `votes_override` replaces the vote file of the configuration. It is taken as is,
/// relative to the working directory.
pub fn read_settings(
    config_path: Option<&str>,
    votes_override: Option<&str>,
) -> DashResult<EventSettings> {
    let (config, root) = match config_path {
        Some(p) => {
            let config = read_config(p)?;
            let root = Path::new(p).parent().map(|x| x.to_path_buf());
            (config, root)
        }
        None => (EventConfig::default(), None),
    };
    let vote_file = match votes_override {
        Some(v) => PathBuf::from(v),
        None => resolve_path(
            root.as_deref(),
            config.vote_file.as_deref().unwrap_or(DEFAULT_VOTE_FILE),
        ),
    };
    validate_config(&config, vote_file)
}

fn validate_config(config: &EventConfig, vote_file: PathBuf) -> DashResult<EventSettings> {
    let teams: Vec<String> = config
        .teams
        .clone()
        .unwrap_or_else(|| DEFAULT_TEAMS.iter().map(|s| s.to_string()).collect());
    let categories: Vec<String> = config
        .categories
        .clone()
        .unwrap_or_else(|| DEFAULT_CATEGORIES.iter().map(|s| s.to_string()).collect());
    check_registry(&teams, &categories).context(ScoringSnafu {})?;
    if let Some(t) = teams.iter().find(|t| t.trim().is_empty()) {
        return InvalidConfigSnafu {
            message: format!("blank team name {:?}", t),
        }
        .fail();
    }

    let default_rules = ScoreRules::DEFAULT_RULES;
    let rules = match &config.rules {
        Some(r) => ScoreRules {
            min_points: r.min_points.unwrap_or(default_rules.min_points),
            max_points: r.max_points.unwrap_or(default_rules.max_points),
            default_points: r.default_points.unwrap_or(default_rules.default_points),
        },
        None => default_rules,
    };
    ensure!(
        rules.min_points <= rules.max_points,
        InvalidConfigSnafu {
            message: format!(
                "minPoints {} is above maxPoints {}",
                rules.min_points, rules.max_points
            )
        }
    );
    ensure!(
        rules.accepts(rules.default_points),
        InvalidConfigSnafu {
            message: format!(
                "defaultPoints {} is outside of {}..={}",
                rules.default_points, rules.min_points, rules.max_points
            )
        }
    );

    let refresh_ms = config
        .refresh_interval_ms
        .unwrap_or(DEFAULT_REFRESH_INTERVAL_MS);
    ensure!(
        refresh_ms > 0,
        InvalidConfigSnafu {
            message: "refreshIntervalMs must be positive".to_string()
        }
    );

    Ok(EventSettings {
        title: config
            .title
            .clone()
            .unwrap_or_else(|| DEFAULT_TITLE.to_string()),
        teams,
        categories,
        vote_file,
        refresh_interval: Duration::from_millis(refresh_ms),
        rules,
    })
}
