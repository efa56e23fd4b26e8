// ********* Input data structures ***********

use std::error::Error;
use std::fmt::Display;

/// One stored score: a team (`voter`) giving `points` to another team
/// (`evaluated`) in one category.
///
/// Votes are never modified once written.
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub struct Vote {
    pub voter: String,
    pub evaluated: String,
    pub category: String,
    pub points: u32,
}

// ******** Output data structures *********

/// The mean of the points received in one category.
#[derive(PartialEq, Debug, Clone)]
pub struct CategoryMean {
    pub category: String,
    /// 0 when nobody scored this category yet.
    pub mean: f64,
    pub vote_count: u64,
}

/// Statistics for one evaluated team
#[derive(PartialEq, Debug, Clone)]
pub struct TeamScore {
    pub team: String,
    /// In the order of the registered categories.
    pub category_means: Vec<CategoryMean>,
    /// Unweighted mean of the category means.
    pub overall: f64,
    pub vote_count: u64,
}

#[derive(PartialEq, Debug, Clone)]
pub struct RankedTeam {
    /// Competition ranking: equal scores share the same rank.
    pub rank: u32,
    pub team: String,
    pub overall: f64,
}

#[derive(PartialEq, Debug, Clone)]
pub struct ScoringResult {
    pub categories: Vec<String>,
    /// Registered teams first, in registration order.
    pub scores: Vec<TeamScore>,
    pub ranking: Vec<RankedTeam>,
    /// Empty as long as the best overall score is 0.
    pub winners: Vec<String>,
    /// Empty as long as no vote has been recorded.
    pub losers: Vec<String>,
    pub max_overall: f64,
    pub min_overall: f64,
    pub total_votes: u64,
}

impl ScoringResult {
    pub fn has_votes(&self) -> bool {
        self.total_votes > 0
    }
}

/// Errors that prevent a ballot from being built or the scores from being computed.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum ScoringErrors {
    NoTeams,
    NoCategories,
    DuplicateTeam(String),
    DuplicateCategory(String),
    /// A team or category name with leading or trailing whitespace.
    PaddedName(String),
    UnknownTeam(String),
    UnknownCategory(String),
    SelfVote(String),
    PointsOutOfRange {
        category: String,
        points: u32,
        min: u32,
        max: u32,
    },
    AlreadyVoted {
        voter: String,
        evaluated: String,
    },
}

impl Error for ScoringErrors {}

impl Display for ScoringErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScoringErrors::NoTeams => write!(f, "no team registered"),
            ScoringErrors::NoCategories => write!(f, "no scoring category registered"),
            ScoringErrors::DuplicateTeam(t) => write!(f, "team {:?} is registered twice", t),
            ScoringErrors::DuplicateCategory(c) => {
                write!(f, "category {:?} is registered twice", c)
            }
            ScoringErrors::PaddedName(n) => {
                write!(f, "name {:?} starts or ends with whitespace", n)
            }
            ScoringErrors::UnknownTeam(t) => write!(f, "unknown team {:?}", t),
            ScoringErrors::UnknownCategory(c) => write!(f, "unknown category {:?}", c),
            ScoringErrors::SelfVote(t) => write!(f, "team {:?} cannot vote for itself", t),
            ScoringErrors::PointsOutOfRange {
                category,
                points,
                min,
                max,
            } => write!(
                f,
                "{} points for {:?} is outside of the range {}..={}",
                points, category, min, max
            ),
            ScoringErrors::AlreadyVoted { voter, evaluated } => {
                write!(f, "{:?} has already voted for {:?}", voter, evaluated)
            }
        }
    }
}

// ********* Configuration **********

/// The range of the points a team can give, and the value a category takes
/// when it is not scored explicitly.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub struct ScoreRules {
    pub min_points: u32,
    pub max_points: u32,
    pub default_points: u32,
}

impl ScoreRules {
    pub const DEFAULT_RULES: ScoreRules = ScoreRules {
        min_points: 0,
        max_points: 10,
        default_points: 5,
    };

    pub fn accepts(&self, points: u32) -> bool {
        (self.min_points..=self.max_points).contains(&points)
    }
}

impl Default for ScoreRules {
    fn default() -> Self {
        ScoreRules::DEFAULT_RULES
    }
}
