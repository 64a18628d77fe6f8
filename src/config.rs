use crate::error::EstimateError;
use crate::posterior::AgainstPolicy;
use crate::rating::ELO_SCALE_CONSTANT;
use serde::{Deserialize, Serialize};

pub const DEFAULT_BUCKET_WIDTH: f64 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CredibleInterval {
    pub lower: f64,
    pub upper: f64,
}
impl CredibleInterval {
    pub fn validate(&self) -> Result<(), EstimateError> {
        if !(self.lower > 0.0 && self.lower < self.upper && self.upper < 1.0) {
            return Err(EstimateError::InvalidArgument(format!(
                "credible interval must satisfy 0 < lower < upper < 1, got {}..{}",
                self.lower, self.upper
            )));
        }
        Ok(())
    }
}

impl Default for CredibleInterval {
    fn default() -> Self {
        Self {
            lower: 0.05,
            upper: 0.95,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimatorConfig {
    pub bucket_width: f64,
    pub credible_interval: CredibleInterval,
    pub elo_scale_constant: f64,
    /// Applied by player queries that name no opponent.
    pub against: AgainstPolicy,
}
impl EstimatorConfig {
    pub fn validate(&self) -> Result<(), EstimateError> {
        validate_bucket_width(self.bucket_width)?;
        self.credible_interval.validate()?;
        if !(self.elo_scale_constant.is_finite() && self.elo_scale_constant > 0.0) {
            return Err(EstimateError::InvalidArgument(format!(
                "Elo scale constant must be positive, got {}",
                self.elo_scale_constant
            )));
        }
        Ok(())
    }

    pub fn buckets(&self) -> usize {
        (1.0 / self.bucket_width).round() as usize + 1
    }
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            bucket_width: DEFAULT_BUCKET_WIDTH,
            credible_interval: CredibleInterval::default(),
            elo_scale_constant: ELO_SCALE_CONSTANT,
            against: AgainstPolicy::default(),
        }
    }
}

/// The width must split `[0, 1]` into an even number of intervals, so that 0.5 is a bucket center.
fn validate_bucket_width(width: f64) -> Result<(), EstimateError> {
    const TOLERANCE: f64 = 1e-9;
    if !(width > 0.0 && width <= 0.5) {
        return Err(EstimateError::InvalidArgument(format!(
            "bucket width must be in (0, 0.5], got {width}"
        )));
    }
    let intervals = 1.0 / width;
    let rounded = intervals.round();
    if (intervals - rounded).abs() > TOLERANCE || rounded as u64 % 2 != 0 {
        return Err(EstimateError::InvalidArgument(format!(
            "bucket width {width} must divide [0, 1] into an even number of intervals"
        )));
    }
    Ok(())
}
