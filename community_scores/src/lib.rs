/*!
Score aggregation for small peer-voting events.

Every team scores the other teams in a few categories. The score of a team in
a category is the mean of the points it received in that category, and its
overall score is the mean of its category scores:

```
use community_scores::*;

let teams = vec!["Anna".to_string(), "Bob".to_string()];
let categories = vec!["taste".to_string(), "creativity".to_string()];
let votes = vec![
    Vote {
        voter: "Bob".to_string(),
        evaluated: "Anna".to_string(),
        category: "taste".to_string(),
        points: 8,
    },
    Vote {
        voter: "Bob".to_string(),
        evaluated: "Anna".to_string(),
        category: "creativity".to_string(),
        points: 6,
    },
];

let result = run_score_stats(&votes, &teams, &categories)?;
assert_eq!(result.winners, vec!["Anna".to_string()]);
assert_eq!(result.scores[0].overall, 7.0);
# Ok::<(), ScoringErrors>(())
```

See the [manual] for the command line dashboard built on top of this crate.
*/
pub mod builder;
mod config;
pub mod manual;

use log::{debug, info, warn};

use std::{
    collections::{HashMap, HashSet},
    ops::AddAssign,
};

pub use crate::config::*;

// **** Private structures ****

/// Two overall scores closer than this are considered tied.
const SCORE_EPSILON: f64 = 1e-9;

#[derive(Eq, PartialEq, Debug, Clone, Copy, Default)]
struct PointSum {
    total: u64,
    count: u64,
}

impl PointSum {
    fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.total as f64 / self.count as f64
        }
    }
}

impl AddAssign<u32> for PointSum {
    fn add_assign(&mut self, points: u32) {
        self.total += points as u64;
        self.count += 1;
    }
}

fn same_score(a: f64, b: f64) -> bool {
    (a - b).abs() < SCORE_EPSILON
}

/// Computes the scores of all the teams.
///
/// Arguments:
/// * `coll` the votes, as stored
/// * `teams` the registered teams. They all appear in the result, even without votes.
/// * `categories` the registered categories. Votes in other categories are ignored.
pub fn run_score_stats(
    coll: &[Vote],
    teams: &[String],
    categories: &[String],
) -> Result<ScoringResult, ScoringErrors> {
    info!(
        "Processing {:?} votes, teams: {:?}, categories: {:?}",
        coll.len(),
        teams,
        categories
    );
    check_registry(teams, categories)?;

    let category_ids: HashMap<&str, usize> = categories
        .iter()
        .enumerate()
        .map(|(idx, c)| (c.as_str(), idx))
        .collect();
    let mut team_ids: HashMap<String, usize> = teams
        .iter()
        .enumerate()
        .map(|(idx, t)| (t.clone(), idx))
        .collect();
    let mut all_teams: Vec<String> = teams.to_vec();
    let mut sums: Vec<Vec<PointSum>> = vec![vec![PointSum::default(); categories.len()]; teams.len()];
    let mut total_votes: u64 = 0;

    for v in coll.iter() {
        let cat_id = match category_ids.get(v.category.as_str()) {
            Some(cid) => *cid,
            None => {
                warn!(
                    "run_score_stats: ignoring vote from {:?} to {:?} in unknown category {:?}",
                    v.voter, v.evaluated, v.category
                );
                continue;
            }
        };
        let team_id = match team_ids.get(&v.evaluated) {
            Some(tid) => *tid,
            None => {
                warn!(
                    "run_score_stats: team {:?} is not registered, scoring it anyway",
                    v.evaluated
                );
                let tid = all_teams.len();
                all_teams.push(v.evaluated.clone());
                team_ids.insert(v.evaluated.clone(), tid);
                sums.push(vec![PointSum::default(); categories.len()]);
                tid
            }
        };
        sums[team_id][cat_id] += v.points;
        total_votes += 1;
    }

    let scores: Vec<TeamScore> = all_teams
        .iter()
        .zip(sums.iter())
        .map(|(team, team_sums)| {
            let category_means: Vec<CategoryMean> = categories
                .iter()
                .zip(team_sums.iter())
                .map(|(category, ps)| CategoryMean {
                    category: category.clone(),
                    mean: ps.mean(),
                    vote_count: ps.count,
                })
                .collect();
            let overall =
                category_means.iter().map(|cm| cm.mean).sum::<f64>() / categories.len() as f64;
            let vote_count = team_sums.iter().map(|ps| ps.count).sum();
            debug!(
                "run_score_stats: team {:?} overall {:.4} from {:?}",
                team, overall, category_means
            );
            TeamScore {
                team: team.clone(),
                category_means,
                overall,
                vote_count,
            }
        })
        .collect();

    let ranking = rank_teams(&scores);

    let max_overall = scores
        .iter()
        .map(|ts| ts.overall)
        .fold(f64::NEG_INFINITY, f64::max);
    let min_overall = scores
        .iter()
        .map(|ts| ts.overall)
        .fold(f64::INFINITY, f64::min);

    // Nobody wins while every team is still at 0.
    let winners: Vec<String> = if max_overall > SCORE_EPSILON {
        teams_with_score(&scores, max_overall)
    } else {
        vec![]
    };
    let losers: Vec<String> = if total_votes > 0 {
        teams_with_score(&scores, min_overall)
    } else {
        vec![]
    };
    info!(
        "run_score_stats: {} scored votes, winners: {:?}, losers: {:?}",
        total_votes, winners, losers
    );

    Ok(ScoringResult {
        categories: categories.to_vec(),
        scores,
        ranking,
        winners,
        losers,
        max_overall,
        min_overall,
        total_votes,
    })
}

/// True when the voter has stored at least as many rows for this team as
/// there are categories.
pub fn has_already_voted(
    coll: &[Vote],
    voter: &str,
    evaluated: &str,
    num_categories: usize,
) -> bool {
    let count = coll
        .iter()
        .filter(|v| v.voter == voter && v.evaluated == evaluated)
        .count();
    count >= num_categories
}

/// For every team other than the voter, whether the voter already voted for it.
///
/// Teams are returned in registration order.
pub fn voting_status(
    coll: &[Vote],
    teams: &[String],
    voter: &str,
    num_categories: usize,
) -> Vec<(String, bool)> {
    teams
        .iter()
        .filter(|t| t.as_str() != voter)
        .map(|t| {
            (
                t.clone(),
                has_already_voted(coll, voter, t, num_categories),
            )
        })
        .collect()
}

/// Checks that teams and categories are non-empty and free of duplicates.
///
/// Names with leading or trailing whitespace are refused: the vote file is
/// read back trimmed, and such a name would no longer match its own votes.
pub fn check_registry(teams: &[String], categories: &[String]) -> Result<(), ScoringErrors> {
    if teams.is_empty() {
        return Err(ScoringErrors::NoTeams);
    }
    if categories.is_empty() {
        return Err(ScoringErrors::NoCategories);
    }
    if let Some(name) = teams
        .iter()
        .chain(categories.iter())
        .find(|n| n.trim() != n.as_str())
    {
        return Err(ScoringErrors::PaddedName(name.clone()));
    }
    let mut seen: HashSet<&str> = HashSet::new();
    for t in teams.iter() {
        if !seen.insert(t.as_str()) {
            return Err(ScoringErrors::DuplicateTeam(t.clone()));
        }
    }
    seen.clear();
    for c in categories.iter() {
        if !seen.insert(c.as_str()) {
            return Err(ScoringErrors::DuplicateCategory(c.clone()));
        }
    }
    Ok(())
}

fn teams_with_score(scores: &[TeamScore], target: f64) -> Vec<String> {
    scores
        .iter()
        .filter(|ts| same_score(ts.overall, target))
        .map(|ts| ts.team.clone())
        .collect()
}

// The sort is stable: tied teams keep the registration order.
fn rank_teams(scores: &[TeamScore]) -> Vec<RankedTeam> {
    let mut sorted: Vec<&TeamScore> = scores.iter().collect();
    sorted.sort_by(|a, b| b.overall.total_cmp(&a.overall));
    let mut res: Vec<RankedTeam> = Vec::with_capacity(sorted.len());
    for (idx, ts) in sorted.iter().enumerate() {
        let rank = match res.last() {
            Some(prev) if same_score(prev.overall, ts.overall) => prev.rank,
            _ => (idx + 1) as u32,
        };
        res.push(RankedTeam {
            rank,
            team: ts.team.clone(),
            overall: ts.overall,
        });
    }
    debug!("rank_teams: {:?}", res);
    res
}
