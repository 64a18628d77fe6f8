//! Conversion of player rating gaps into shifts in win log-odds.
//!
//! Both Elo and Glicko express the expected score as a logistic function of the rating gap, so the
//! logit of that expected score is linear in the gap. The shift is computed in that closed form
//! rather than by taking the logit of the win chance, which saturates for large gaps.

use crate::error::EstimateError;
use crate::gaussian::Gaussian;
use serde::{Deserialize, Serialize};
use std::f64::consts::{LN_10, PI};

/// Calibrated so that a 200-point gap yields a 60% win chance: `200 / log10(0.6 / 0.4)`.
pub const ELO_SCALE_CONSTANT: f64 = 1135.77;

/// The Glicko scaling factor `q = ln(10) / 400`.
pub const GLICKO_Q: f64 = LN_10 / 400.0;

/// The Glicko rating of an unrated player.
pub const GLICKO_BASE_RATING: f64 = 1500.0;

/// Expected win chance for a player `rating_diff` points ahead of their opponent.
pub fn win_prob_from_rating(rating_diff: f64, scale_constant: f64) -> f64 {
    1.0 / (1.0 + 10f64.powf(-rating_diff / scale_constant))
}

/// The log-odds of [win_prob_from_rating]. Exactly `0.0` for a zero gap.
pub fn rating_to_logit(rating_diff: f64, scale_constant: f64) -> f64 {
    if rating_diff == 0.0 {
        return 0.0;
    }
    rating_diff * LN_10 / scale_constant
}

/// Attenuation of a Glicko rating gap by the combined rating deviation.
pub fn glicko_g(rd: f64) -> f64 {
    1.0 / f64::sqrt(1.0 + 3.0 * GLICKO_Q * GLICKO_Q * rd * rd / (PI * PI))
}

/// Log-odds that a player rated `(r_p, rd_p)` beats an opponent rated `(r_o, rd_o)`.
pub fn glicko_logit(r_p: f64, rd_p: f64, r_o: f64, rd_o: f64) -> f64 {
    let rating_diff = r_p - r_o;
    if rating_diff == 0.0 {
        return 0.0;
    }
    glicko_g(f64::hypot(rd_p, rd_o)) * rating_diff * GLICKO_Q
}

/// A player's overall strength, independent of character.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "system", rename_all = "snake_case")]
pub enum Rating {
    Elo {
        elo: f64,
        games_played: u32,
    },
    Glicko {
        r: f64,
        rd: f64,
        v: f64,
        games_played: u32,
    },
}
impl Rating {
    pub fn games_played(&self) -> u32 {
        match self {
            Rating::Elo { games_played, .. } | Rating::Glicko { games_played, .. } => {
                *games_played
            }
        }
    }

    /// The headline rating number: Elo, or Glicko `r`.
    pub fn value(&self) -> f64 {
        match self {
            Rating::Elo { elo, .. } => *elo,
            Rating::Glicko { r, .. } => *r,
        }
    }

    /// Shift in win log-odds implied by this rating against `opponent`'s. Both ratings must come
    /// from the same system.
    pub fn logit_shift_against(
        &self,
        opponent: &Rating,
        elo_scale_constant: f64,
    ) -> Result<f64, EstimateError> {
        match (self, opponent) {
            (Rating::Elo { elo: elo_p, .. }, Rating::Elo { elo: elo_o, .. }) => {
                Ok(rating_to_logit(elo_p - elo_o, elo_scale_constant))
            }
            (
                Rating::Glicko {
                    r: r_p, rd: rd_p, ..
                },
                Rating::Glicko {
                    r: r_o, rd: rd_o, ..
                },
            ) => Ok(glicko_logit(*r_p, *rd_p, *r_o, *rd_o)),
            _ => Err(EstimateError::InvalidArgument(format!(
                "cannot compare ratings from different systems: {self:?} and {opponent:?}"
            ))),
        }
    }
}

/// Empirical calibration between the log-odds implied by ratings alone and the log-odds consistent
/// with observed outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatingScale {
    pub mean: f64,
    pub std: f64,
}
impl RatingScale {
    pub fn validate(&self) -> Result<(), EstimateError> {
        Gaussian::with_std(self.mean, self.std).map(|_| ())
    }

    /// The rating term of the posterior, or `None` for a zero shift, which contributes nothing.
    pub fn shift_distribution(&self, logit_shift: f64) -> Result<Option<Gaussian>, EstimateError> {
        if logit_shift == 0.0 {
            return Ok(None);
        }
        Ok(Some(
            Gaussian::with_std(self.mean, self.std)?.scale(logit_shift),
        ))
    }
}

impl Default for RatingScale {
    fn default() -> Self {
        Self {
            mean: 1.0,
            std: 0.0,
        }
    }
}
