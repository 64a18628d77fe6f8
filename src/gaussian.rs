//! Independent normal distributions in logit space, parametrised by mean and variance.
//!
//! Sums and differences of independent normals are normal, with variances adding in both cases.
//! A zero-variance [Gaussian] is a point mass: its CDF is a step at the mean and it has no density.

use crate::error::EstimateError;
use statrs::function::erf;
use std::f64::consts::{PI, SQRT_2};
use std::fmt::{Display, Formatter};
use std::ops::{Add, Neg, Sub};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gaussian {
    mean: f64,
    variance: f64,
}
impl Gaussian {
    pub fn new(mean: f64, variance: f64) -> Result<Self, EstimateError> {
        if !mean.is_finite() {
            return Err(EstimateError::InvalidArgument(format!(
                "mean must be finite, got {mean}"
            )));
        }
        if !variance.is_finite() || variance < 0.0 {
            return Err(EstimateError::InvalidArgument(format!(
                "variance must be finite and non-negative, got {variance}"
            )));
        }
        Ok(Self { mean, variance })
    }

    pub fn with_std(mean: f64, std: f64) -> Result<Self, EstimateError> {
        if std < 0.0 {
            return Err(EstimateError::InvalidArgument(format!(
                "standard deviation must be non-negative, got {std}"
            )));
        }
        Self::new(mean, std * std)
    }

    /// A point mass at `mean`.
    pub fn point(mean: f64) -> Self {
        Self {
            mean,
            variance: 0.0,
        }
    }

    #[inline]
    pub fn mean(&self) -> f64 {
        self.mean
    }

    #[inline]
    pub fn variance(&self) -> f64 {
        self.variance
    }

    #[inline]
    pub fn std(&self) -> f64 {
        self.variance.sqrt()
    }

    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.variance == 0.0
    }

    /// Sum of two independent normals.
    pub fn plus(&self, other: &Gaussian) -> Gaussian {
        Gaussian {
            mean: self.mean + other.mean,
            variance: self.variance + other.variance,
        }
    }

    /// Difference of two independent normals. The variance still accumulates.
    pub fn minus(&self, other: &Gaussian) -> Gaussian {
        Gaussian {
            mean: self.mean - other.mean,
            variance: self.variance + other.variance,
        }
    }

    pub fn scale(&self, factor: f64) -> Gaussian {
        Gaussian {
            mean: self.mean * factor,
            variance: self.variance * factor * factor,
        }
    }

    pub fn cdf(&self, x: f64) -> f64 {
        if self.is_degenerate() {
            return if x >= self.mean { 1.0 } else { 0.0 };
        }
        0.5 * erf::erfc(-(x - self.mean) / (self.std() * SQRT_2))
    }

    pub fn pdf(&self, x: f64) -> f64 {
        if self.is_degenerate() || !x.is_finite() {
            return 0.0;
        }
        let z = (x - self.mean) / self.std();
        f64::exp(-0.5 * z * z) / (self.std() * f64::sqrt(2.0 * PI))
    }

    /// Inverse CDF. Defined only on the open interval `(0, 1)`.
    pub fn quantile(&self, p: f64) -> Result<f64, EstimateError> {
        if !(p > 0.0 && p < 1.0) {
            return Err(EstimateError::Domain(format!(
                "quantile requires 0 < p < 1, got {p}"
            )));
        }
        if self.is_degenerate() {
            return Ok(self.mean);
        }
        Ok(self.mean - self.std() * SQRT_2 * erf::erfc_inv(2.0 * p))
    }
}

impl Default for Gaussian {
    fn default() -> Self {
        Self::point(0.0)
    }
}

impl Add for Gaussian {
    type Output = Gaussian;

    fn add(self, rhs: Self) -> Self::Output {
        self.plus(&rhs)
    }
}

impl Sub for Gaussian {
    type Output = Gaussian;

    fn sub(self, rhs: Self) -> Self::Output {
        self.minus(&rhs)
    }
}

impl Neg for Gaussian {
    type Output = Gaussian;

    fn neg(self) -> Self::Output {
        self.scale(-1.0)
    }
}

impl Display for Gaussian {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "N({:.4}, {:.4}²)", self.mean, self.std())
    }
}
