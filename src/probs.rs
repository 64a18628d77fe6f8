//! Utilities for working with probabilities.

pub trait SliceExt {
    fn sum(&self) -> f64;
    fn mean(&self) -> f64;
}
impl SliceExt for [f64] {
    fn sum(&self) -> f64 {
        self.iter().sum()
    }

    fn mean(&self) -> f64 {
        self.sum() / self.len() as f64
    }
}

/// Log-odds of a win chance. Infinite at 0 and 1.
#[inline]
pub fn logit(win_chance: f64) -> f64 {
    f64::ln(win_chance / (1.0 - win_chance))
}

/// Inverse of [logit]: maps log-odds back to a win chance.
#[inline]
pub fn inv_logit(log_odds: f64) -> f64 {
    // the symmetric form avoids inf/inf for large positive log-odds
    if log_odds >= 0.0 {
        1.0 / (1.0 + f64::exp(-log_odds))
    } else {
        let exp = f64::exp(log_odds);
        exp / (1.0 + exp)
    }
}
