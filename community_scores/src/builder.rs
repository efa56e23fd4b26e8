use std::collections::HashMap;

use log::debug;

pub use crate::config::*;
use crate::{check_registry, has_already_voted};

/// A builder for the ballots of one event.
///
/// A ballot is the set of scores one team gives to another team, one per
/// category.
///
/// ```
/// pub use community_scores::builder::Builder;
/// pub use community_scores::ScoreRules;
/// # use community_scores::ScoringErrors;
///
/// let builder = Builder::new(&ScoreRules::DEFAULT_RULES)?
///     .teams(&["Anna".to_string(), "Bob".to_string()])?
///     .categories(&["taste".to_string(), "looks".to_string()])?;
///
/// let mut ballot = builder.ballot("Anna", "Bob")?;
/// ballot.score("taste", 9)?;
/// let votes = ballot.build(&[])?;
///
/// // "looks" was not scored and takes the default value.
/// assert_eq!(votes.len(), 2);
/// assert_eq!(votes[1].points, 5);
/// # Ok::<(), ScoringErrors>(())
/// ```
pub struct Builder {
    pub(crate) _rules: ScoreRules,
    pub(crate) _teams: Vec<String>,
    pub(crate) _categories: Vec<String>,
}

impl Builder {
    pub fn new(rules: &ScoreRules) -> Result<Builder, ScoringErrors> {
        if !rules.accepts(rules.default_points) {
            return Err(ScoringErrors::PointsOutOfRange {
                category: "<default>".to_string(),
                points: rules.default_points,
                min: rules.min_points,
                max: rules.max_points,
            });
        }
        Ok(Builder {
            _rules: *rules,
            _teams: Vec::new(),
            _categories: Vec::new(),
        })
    }

    pub fn teams(self, teams: &[String]) -> Result<Builder, ScoringErrors> {
        Ok(Builder {
            _teams: teams.to_vec(),
            ..self
        })
    }

    pub fn categories(self, categories: &[String]) -> Result<Builder, ScoringErrors> {
        Ok(Builder {
            _categories: categories.to_vec(),
            ..self
        })
    }

    pub fn rules(&self) -> &ScoreRules {
        &self._rules
    }

    /// Starts the ballot of `voter` for `evaluated`.
    ///
    /// Both teams must be registered, and a team cannot score itself.
    pub fn ballot(&self, voter: &str, evaluated: &str) -> Result<BallotBuilder<'_>, ScoringErrors> {
        check_registry(&self._teams, &self._categories)?;
        for team in [voter, evaluated] {
            if !self._teams.iter().any(|t| t == team) {
                return Err(ScoringErrors::UnknownTeam(team.to_string()));
            }
        }
        if voter == evaluated {
            return Err(ScoringErrors::SelfVote(voter.to_string()));
        }
        Ok(BallotBuilder {
            builder: self,
            voter: voter.to_string(),
            evaluated: evaluated.to_string(),
            points: HashMap::new(),
        })
    }
}

pub struct BallotBuilder<'a> {
    builder: &'a Builder,
    voter: String,
    evaluated: String,
    points: HashMap<String, u32>,
}

impl<'a> BallotBuilder<'a> {
    /// Sets the points for one category. Setting a category twice keeps the last value.
    pub fn score(&mut self, category: &str, points: u32) -> Result<(), ScoringErrors> {
        if !self.builder._categories.iter().any(|c| c == category) {
            return Err(ScoringErrors::UnknownCategory(category.to_string()));
        }
        let rules = self.builder._rules;
        if !rules.accepts(points) {
            return Err(ScoringErrors::PointsOutOfRange {
                category: category.to_string(),
                points,
                min: rules.min_points,
                max: rules.max_points,
            });
        }
        self.points.insert(category.to_string(), points);
        Ok(())
    }

    /// Produces one vote per registered category, in the order of the categories.
    ///
    /// `existing` are the votes already stored. The ballot is refused if the
    /// voter already has a full set of votes for this team.
    pub fn build(&self, existing: &[Vote]) -> Result<Vec<Vote>, ScoringErrors> {
        let categories = &self.builder._categories;
        if has_already_voted(existing, &self.voter, &self.evaluated, categories.len()) {
            return Err(ScoringErrors::AlreadyVoted {
                voter: self.voter.clone(),
                evaluated: self.evaluated.clone(),
            });
        }
        let votes: Vec<Vote> = categories
            .iter()
            .map(|c| Vote {
                voter: self.voter.clone(),
                evaluated: self.evaluated.clone(),
                category: c.clone(),
                points: self
                    .points
                    .get(c)
                    .cloned()
                    .unwrap_or(self.builder._rules.default_points),
            })
            .collect();
        debug!("BallotBuilder::build: {:?}", votes);
        Ok(votes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(xs: &[&str]) -> Vec<String> {
        xs.iter().map(|s| s.to_string()).collect()
    }

    fn builder() -> Builder {
        Builder::new(&ScoreRules::DEFAULT_RULES)
            .unwrap()
            .teams(&names(&["A", "B", "C"]))
            .unwrap()
            .categories(&names(&["sabor", "presentacion", "creatividad"]))
            .unwrap()
    }

    #[test]
    fn one_vote_per_category_for_every_point_value() {
        let b = builder();
        for points in 0..=10 {
            let mut ballot = b.ballot("A", "B").unwrap();
            for c in ["sabor", "presentacion", "creatividad"] {
                ballot.score(c, points).unwrap();
            }
            let votes = ballot.build(&[]).unwrap();
            assert_eq!(votes.len(), 3);
            assert!(votes.iter().all(|v| v.points == points));
            let cats: Vec<&str> = votes.iter().map(|v| v.category.as_str()).collect();
            assert_eq!(cats, vec!["sabor", "presentacion", "creatividad"]);
        }
    }

    #[test]
    fn rejects_self_vote_and_unknown_team() {
        let b = builder();
        assert_eq!(
            b.ballot("A", "A").err(),
            Some(ScoringErrors::SelfVote("A".to_string()))
        );
        assert_eq!(
            b.ballot("A", "Z").err(),
            Some(ScoringErrors::UnknownTeam("Z".to_string()))
        );
    }

    #[test]
    fn rejects_out_of_range_and_unknown_category() {
        let b = builder();
        let mut ballot = b.ballot("A", "B").unwrap();
        assert!(matches!(
            ballot.score("sabor", 11),
            Err(ScoringErrors::PointsOutOfRange { points: 11, .. })
        ));
        assert_eq!(
            ballot.score("olor", 3),
            Err(ScoringErrors::UnknownCategory("olor".to_string()))
        );
    }

    #[test]
    fn rejects_second_ballot() {
        let b = builder();
        let first = b.ballot("A", "B").unwrap().build(&[]).unwrap();
        let again = b.ballot("A", "B").unwrap().build(&first);
        assert_eq!(
            again,
            Err(ScoringErrors::AlreadyVoted {
                voter: "A".to_string(),
                evaluated: "B".to_string()
            })
        );
        // The other direction is still open.
        assert!(b.ballot("B", "A").unwrap().build(&first).is_ok());
    }

    #[test]
    fn rejects_padded_names() {
        let b = Builder::new(&ScoreRules::DEFAULT_RULES)
            .unwrap()
            .teams(&names(&[" Norte", "Sur"]))
            .unwrap()
            .categories(&names(&["sabor"]))
            .unwrap();
        assert_eq!(
            b.ballot("Sur", " Norte").err(),
            Some(ScoringErrors::PaddedName(" Norte".to_string()))
        );
    }

    #[test]
    fn rejects_invalid_default() {
        let rules = ScoreRules {
            min_points: 1,
            max_points: 5,
            default_points: 7,
        };
        assert!(Builder::new(&rules).is_err());
    }
}
