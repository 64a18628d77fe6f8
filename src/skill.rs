//! Per-character player skill, in any system that can be expressed as a Gaussian in logit space.

use crate::error::EstimateError;
use crate::gaussian::Gaussian;
use crate::rating::{Rating, GLICKO_BASE_RATING, GLICKO_Q};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "system", rename_all = "snake_case")]
pub enum Skill {
    /// Skill estimated directly in logit units.
    Gaussian { mean: f64, std: f64, played: u32 },

    /// A Glicko-2 rating; `v` is the volatility and does not enter the logit-space estimate.
    Glicko { r: f64, rd: f64, v: f64, played: u32 },
}
impl Skill {
    pub fn played(&self) -> u32 {
        match self {
            Skill::Gaussian { played, .. } | Skill::Glicko { played, .. } => *played,
        }
    }

    pub fn to_gaussian(&self) -> Result<Gaussian, EstimateError> {
        match self {
            Skill::Gaussian { mean, std, .. } => Gaussian::with_std(*mean, *std),
            Skill::Glicko { r, rd, .. } => {
                Gaussian::with_std((r - GLICKO_BASE_RATING) * GLICKO_Q, rd * GLICKO_Q)
            }
        }
    }
}

/// A player's rating along with their skill with each character they have played.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub rating: Rating,
    pub characters: FxHashMap<String, Skill>,
}
impl PlayerRecord {
    pub fn games_played(&self) -> u32 {
        self.rating.games_played()
    }

    pub fn skill(&self, character: &str) -> Option<&Skill> {
        self.characters.get(character)
    }

    /// The player's skill averaged over every character they have a record with, as a stand-in for
    /// "an opponent as strong as themselves". `None` if the player has no character records.
    pub fn own_skill(&self) -> Result<Option<Gaussian>, EstimateError> {
        if self.characters.is_empty() {
            return Ok(None);
        }
        let mut mean_sum = 0.0;
        let mut std_sum = 0.0;
        for skill in self.characters.values() {
            let dist = skill.to_gaussian()?;
            mean_sum += dist.mean();
            std_sum += dist.std();
        }
        let n = self.characters.len() as f64;
        Ok(Some(Gaussian::with_std(mean_sum / n, std_sum / n)?))
    }
}
