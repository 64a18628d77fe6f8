//! Point estimate and credible interval of a bucket series.

use crate::bucket::{format_matchup, half_wins, Rounding, WinBucket};
use crate::error::EstimateError;
use serde::Serialize;

/// Bucket masses are CDF differences and may only dip below zero by rounding.
const NEGATIVE_MASS_TOLERANCE: f64 = 1e-12;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub point_estimate: f64,
    pub credible_lower: f64,
    pub credible_upper: f64,
    /// `false` when no games were recorded for the matchup; the estimate is then meaningless.
    pub has_data: bool,
}
impl Summary {
    pub fn point_label(&self) -> String {
        format_matchup(self.point_estimate, Rounding::Round)
    }

    pub fn lower_label(&self) -> String {
        format_matchup(self.credible_lower, Rounding::Floor)
    }

    pub fn upper_label(&self) -> String {
        format_matchup(self.credible_upper, Rounding::Ceil)
    }

    /// The credible interval as labels, rounded outwards so that it is never narrower than the
    /// underlying interval.
    pub fn interval_label(&self) -> String {
        format!("{} - {}", self.lower_label(), self.upper_label())
    }

    /// Whether the point estimate falls inside the credible interval once all three are rounded to
    /// half wins.
    pub fn is_consistent(&self) -> bool {
        let point = half_wins(self.point_estimate, Rounding::Round);
        half_wins(self.credible_lower, Rounding::Floor) <= point
            && point <= half_wins(self.credible_upper, Rounding::Ceil)
    }
}

/// Summarises a single bucket series: all buckets must belong to the same character pair and scope.
pub fn summarize(buckets: &[WinBucket]) -> Result<Summary, EstimateError> {
    let first = buckets
        .first()
        .ok_or_else(|| EstimateError::InvalidArgument("no buckets to summarise".into()))?;

    let mut total_mass = 0.0;
    let mut weighted_sum = 0.0;
    for bucket in buckets {
        if bucket.c1 != first.c1 || bucket.c2 != first.c2 || bucket.scope != first.scope {
            return Err(EstimateError::InvalidArgument(format!(
                "cannot summarise {} vs {} ({}) together with {} vs {} ({})",
                first.c1, first.c2, first.scope, bucket.c1, bucket.c2, bucket.scope
            )));
        }
        if bucket.probability < -NEGATIVE_MASS_TOLERANCE || bucket.probability.is_nan() {
            return Err(EstimateError::Domain(format!(
                "bucket {} of {} vs {} has mass {}",
                bucket.label, bucket.c1, bucket.c2, bucket.probability
            )));
        }
        total_mass += bucket.probability;
        weighted_sum += bucket.win_chance * bucket.probability;
    }

    if total_mass == 0.0 {
        return Ok(Summary {
            point_estimate: 0.0,
            credible_lower: 0.0,
            credible_upper: 1.0,
            has_data: false,
        });
    }

    Ok(Summary {
        point_estimate: weighted_sum.clamp(0.0, 1.0),
        credible_lower: first.credible_lower,
        credible_upper: first.credible_upper,
        has_data: true,
    })
}
