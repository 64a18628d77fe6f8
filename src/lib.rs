//! A Bayesian matchup model. Estimates the chance of one character beating another, as a
//! distribution over win chances, either globally or conditioned on the skills and ratings of
//! specific players. All uncertainty is carried as Gaussians in log-odds space.

pub mod bucket;
pub mod config;
pub mod data;
pub mod error;
pub mod estimator;
pub mod file;
pub mod gaussian;
pub mod posterior;
pub mod print;
pub mod probs;
pub mod quantile;
pub mod rating;
pub mod roster;
pub mod skill;
pub mod summary;

#[cfg(test)]
pub(crate) mod testing;

#[doc = include_str!("../README.md")]
#[cfg(doc)]
fn readme() {}
