//! Composition of the matchup prior, the skill differential and the rating shift into a posterior
//! over win log-odds.

use crate::data::{MatchupStats, Snapshot};
use crate::error::{Entity, EstimateError};
use crate::gaussian::Gaussian;
use crate::quantile::{Quantile, QuantileTable};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use tracing::trace;

/// Stand-in for the skill of an unnamed opponent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgainstSkillPolicy {
    /// An opponent as skilled as the player is on average across their characters.
    #[default]
    Own,
    Quantile(Quantile),
}

/// Stand-in for the rating of an unnamed opponent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgainstRatingPolicy {
    /// An opponent rated the same as the player; no rating shift.
    #[default]
    Own,
    Quantile(Quantile),
}

fn parse_policy(s: &str) -> Result<Option<Quantile>, EstimateError> {
    match s {
        "own" | "self" => Ok(None),
        _ => Quantile::parse(s).map(Some),
    }
}

impl FromStr for AgainstSkillPolicy {
    type Err = EstimateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(parse_policy(s)?.map_or(Self::Own, Self::Quantile))
    }
}

impl FromStr for AgainstRatingPolicy {
    type Err = EstimateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(parse_policy(s)?.map_or(Self::Own, Self::Quantile))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AgainstPolicy {
    pub skill: AgainstSkillPolicy,
    pub rating: AgainstRatingPolicy,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Opponent {
    Named(String),
    Population(AgainstPolicy),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    Global,
    Player { player: String, opponent: Opponent },
}
impl Scope {
    pub fn player(&self) -> Option<&str> {
        match self {
            Scope::Global => None,
            Scope::Player { player, .. } => Some(player),
        }
    }

    pub fn opponent(&self) -> Option<&str> {
        match self {
            Scope::Player {
                opponent: Opponent::Named(opponent),
                ..
            } => Some(opponent),
            _ => None,
        }
    }
}

impl Display for Scope {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Scope::Global => write!(f, "global"),
            Scope::Player {
                player,
                opponent: Opponent::Named(opponent),
            } => write!(f, "{player} vs {opponent}"),
            Scope::Player {
                player,
                opponent: Opponent::Population(policy),
            } => write!(f, "{player} vs {:?}/{:?}", policy.skill, policy.rating),
        }
    }
}

/// The distribution of win log-odds for one query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Posterior {
    /// No games recorded for the character pair.
    NoData,

    /// A mirror match with no player: an even matchup with certainty.
    Neutral,

    Dist(Gaussian),
}
impl Posterior {
    /// The distribution behind the posterior; a point mass at even odds for [Posterior::Neutral].
    pub fn gaussian(&self) -> Option<Gaussian> {
        match self {
            Posterior::NoData => None,
            Posterior::Neutral => Some(Gaussian::point(0.0)),
            Posterior::Dist(dist) => Some(*dist),
        }
    }
}

pub struct Composer<'a> {
    pub snapshot: &'a Snapshot,
    pub quantiles: &'a QuantileTable,
    pub elo_scale_constant: f64,
}
impl<'a> Composer<'a> {
    /// Composes the posterior for `c1` against `c2` under `scope`, using `stats` as the matchup
    /// prior. The prior is ignored for mirror matches; elsewhere, absent or empty stats yield
    /// [Posterior::NoData], as does a population opponent on a character nobody plays. Unknown
    /// players fail regardless.
    pub fn compose(
        &self,
        c1: &str,
        c2: &str,
        scope: &Scope,
        stats: Option<&MatchupStats>,
    ) -> Result<Posterior, EstimateError> {
        self.snapshot.characters.check(c1)?;
        self.snapshot.characters.check(c2)?;

        let player_dist = match scope {
            Scope::Global => None,
            Scope::Player { player, opponent } => {
                match self.player_dist(c1, c2, player, opponent) {
                    Ok(player_dist) => Some(player_dist),
                    Err(EstimateError::NotFound {
                        kind: Entity::SkillQuantile,
                        name,
                    }) => {
                        // nobody plays the opposing character
                        trace!("no population skill for {name}: {c1} vs {c2} ({scope})");
                        return Ok(Posterior::NoData);
                    }
                    Err(err) => return Err(err),
                }
            }
        };

        let posterior = if c1 == c2 {
            match player_dist {
                None => Posterior::Neutral,
                Some(player_dist) => Posterior::Dist(player_dist),
            }
        } else {
            match stats.filter(|stats| stats.has_data()) {
                None => Posterior::NoData,
                Some(stats) => {
                    let mu_dist = stats.to_gaussian()?;
                    match player_dist {
                        None => Posterior::Dist(mu_dist),
                        Some(player_dist) => Posterior::Dist(player_dist + mu_dist),
                    }
                }
            }
        };
        trace!("posterior for {c1} vs {c2} ({scope}): {posterior:?}");
        Ok(posterior)
    }

    /// Skill differential plus rating shift, excluding the matchup prior.
    pub fn player_dist(
        &self,
        c1: &str,
        c2: &str,
        player: &str,
        opponent: &Opponent,
    ) -> Result<Gaussian, EstimateError> {
        let player_record = self.snapshot.player(player)?;
        let player_skill = self.snapshot.skill(player, c1)?.to_gaussian()?;

        let (opponent_skill, logit_shift) = match opponent {
            Opponent::Named(opponent) => {
                let opponent_record = self.snapshot.player(opponent)?;
                let opponent_skill = self.snapshot.skill(opponent, c2)?.to_gaussian()?;
                let logit_shift = player_record
                    .rating
                    .logit_shift_against(&opponent_record.rating, self.elo_scale_constant)?;
                (opponent_skill, logit_shift)
            }
            Opponent::Population(policy) => {
                let opponent_skill = match policy.skill {
                    AgainstSkillPolicy::Own => player_record.own_skill()?.ok_or_else(|| {
                        EstimateError::not_found(Entity::PlayerCharacter, format!("{player}/*"))
                    })?,
                    AgainstSkillPolicy::Quantile(quantile) => {
                        self.quantiles.skill(c2, quantile)?
                    }
                };
                let logit_shift = match policy.rating {
                    AgainstRatingPolicy::Own => 0.0,
                    AgainstRatingPolicy::Quantile(quantile) => {
                        let rating = self.quantiles.rating(quantile)?;
                        player_record
                            .rating
                            .logit_shift_against(rating, self.elo_scale_constant)?
                    }
                };
                (opponent_skill, logit_shift)
            }
        };

        let skill_diff = player_skill - opponent_skill;
        Ok(match self.snapshot.rating_scale.shift_distribution(logit_shift)? {
            None => skill_diff,
            Some(rating_dist) => skill_diff + rating_dist,
        })
    }
}

#[cfg(test)]
mod tests;
