//! Discretisation of the win-chance axis into fixed-width buckets, and matchup labels such as
//! `"6-4"`: the expected wins out of ten games, at half-win granularity.

use crate::config::CredibleInterval;
use crate::error::EstimateError;
use crate::gaussian::Gaussian;
use crate::posterior::{Posterior, Scope};
use crate::probs::{inv_logit, logit};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rounding {
    Floor,
    Ceil,
    Round,
}
impl Rounding {
    fn apply(&self, value: f64) -> f64 {
        match self {
            Rounding::Floor => value.floor(),
            Rounding::Ceil => value.ceil(),
            Rounding::Round => value.round(),
        }
    }
}

/// Expected wins out of ten at `win_chance`, rounded to a half win in the given direction.
pub fn half_wins(win_chance: f64, rounding: Rounding) -> f64 {
    rounding.apply(win_chance * 20.0) / 2.0
}

/// Renders a win chance as `"<wins>-<losses>"` out of ten games.
pub fn format_matchup(win_chance: f64, rounding: Rounding) -> String {
    let wins = half_wins(win_chance, rounding);
    format!("{}-{}", wins, 10.0 - wins)
}

/// One discretised win-chance value of an estimate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WinBucket {
    pub c1: String,
    pub c2: String,
    pub scope: Scope,
    pub label: String,
    /// The bucket center.
    pub win_chance: f64,
    /// Probability mass of the win chance falling within this bucket.
    pub probability: f64,
    /// Density of the posterior at the bucket center, in log-odds.
    pub pdf: f64,
    pub credible_lower: f64,
    pub credible_upper: f64,
    /// Recorded games between the two characters.
    pub count: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opponent_count: Option<u32>,
}

/// The query a bucket series is computed for.
#[derive(Debug, Clone)]
pub struct BucketContext<'a> {
    pub c1: &'a str,
    pub c2: &'a str,
    pub scope: &'a Scope,
    pub count: u64,
    pub player_count: Option<u32>,
    pub opponent_count: Option<u32>,
}

/// Win chance bounding the `credible` interval of the posterior; `[0, 1]` without data.
pub fn credible_bounds(
    posterior: &Posterior,
    credible: &CredibleInterval,
) -> Result<(f64, f64), EstimateError> {
    match posterior.gaussian() {
        None => Ok((0.0, 1.0)),
        Some(dist) => Ok((
            inv_logit(dist.quantile(credible.lower)?),
            inv_logit(dist.quantile(credible.upper)?),
        )),
    }
}

/// CDF of the posterior at a win chance, with the domain edges mapped to exactly 0 and 1.
fn cdf_at(dist: &Gaussian, win_chance: f64) -> f64 {
    if win_chance <= 0.0 {
        0.0
    } else if win_chance >= 1.0 {
        1.0
    } else {
        dist.cdf(logit(win_chance))
    }
}

fn pdf_at(dist: &Gaussian, win_chance: f64) -> f64 {
    if win_chance <= 0.0 || win_chance >= 1.0 {
        0.0
    } else {
        dist.pdf(logit(win_chance))
    }
}

/// Emits one bucket per center `i * width` for `i` in `0..buckets`. Every bucket is present even
/// without data, with zero probability and density.
pub fn bucketize(
    posterior: &Posterior,
    width: f64,
    buckets: usize,
    credible: &CredibleInterval,
    context: &BucketContext,
) -> Result<Vec<WinBucket>, EstimateError> {
    let (credible_lower, credible_upper) = credible_bounds(posterior, credible)?;
    let dist = posterior.gaussian();
    let mut series = Vec::with_capacity(buckets);
    for index in 0..buckets {
        let win_chance = index as f64 * width;
        let (probability, pdf) = match &dist {
            None => (0.0, 0.0),
            Some(dist) => {
                // neighbouring buckets share their edges exactly
                let lower_edge = f64::max((index as f64 - 0.5) * width, 0.0);
                let upper_edge = f64::min((index as f64 + 0.5) * width, 1.0);
                let probability = cdf_at(dist, upper_edge) - cdf_at(dist, lower_edge);
                (probability, pdf_at(dist, win_chance))
            }
        };
        series.push(WinBucket {
            c1: context.c1.to_string(),
            c2: context.c2.to_string(),
            scope: context.scope.clone(),
            label: format_matchup(win_chance, Rounding::Round),
            win_chance,
            probability,
            pdf,
            credible_lower,
            credible_upper,
            count: context.count,
            player_count: context.player_count,
            opponent_count: context.opponent_count,
        });
    }
    Ok(series)
}
