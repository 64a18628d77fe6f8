//! Population quantiles of skill and rating, standing in for opponents that are not named.

use crate::error::{Entity, EstimateError};
use crate::gaussian::Gaussian;
use crate::probs::SliceExt;
use crate::rating::Rating;
use crate::roster::Roster;
use crate::skill::PlayerRecord;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumCount, EnumIter, EnumString};
use tracing::debug;

/// The tabulated quantiles. No others are supported and none are interpolated.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    EnumCount,
    EnumIter,
    EnumString,
    Display,
    Serialize,
    Deserialize,
)]
pub enum Quantile {
    #[strum(serialize = "5%")]
    #[serde(rename = "5%")]
    P5,
    #[strum(serialize = "25%")]
    #[serde(rename = "25%")]
    P25,
    #[strum(serialize = "50%")]
    #[serde(rename = "50%")]
    P50,
    #[strum(serialize = "75%")]
    #[serde(rename = "75%")]
    P75,
    #[strum(serialize = "95%")]
    #[serde(rename = "95%")]
    P95,
    #[strum(serialize = "100%")]
    #[serde(rename = "100%")]
    P100,
}
impl Quantile {
    pub fn fraction(&self) -> f64 {
        match self {
            Quantile::P5 => 0.05,
            Quantile::P25 => 0.25,
            Quantile::P50 => 0.5,
            Quantile::P75 => 0.75,
            Quantile::P95 => 0.95,
            Quantile::P100 => 1.0,
        }
    }

    /// Parses a label such as `"25%"`.
    pub fn parse(label: &str) -> Result<Self, EstimateError> {
        label.parse().map_err(|_| {
            EstimateError::InvalidArgument(format!(
                "unsupported quantile '{label}', expected one of {}",
                Quantile::iter()
                    .map(|quantile| quantile.to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            ))
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SkillDist {
    pub mean: f64,
    pub std: f64,
}

impl From<Gaussian> for SkillDist {
    fn from(dist: Gaussian) -> Self {
        Self {
            mean: dist.mean(),
            std: dist.std(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuantileTable {
    /// Character -> quantile of players' skill with that character.
    pub skill: FxHashMap<String, BTreeMap<Quantile, SkillDist>>,

    /// Quantile of players' overall rating.
    pub rating: BTreeMap<Quantile, Rating>,
}
impl QuantileTable {
    pub fn skill(&self, character: &str, quantile: Quantile) -> Result<Gaussian, EstimateError> {
        let dist = self
            .skill
            .get(character)
            .and_then(|quantiles| quantiles.get(&quantile))
            .ok_or_else(|| {
                EstimateError::not_found(Entity::SkillQuantile, format!("{character}@{quantile}"))
            })?;
        Gaussian::with_std(dist.mean, dist.std)
    }

    pub fn rating(&self, quantile: Quantile) -> Result<&Rating, EstimateError> {
        self.rating
            .get(&quantile)
            .ok_or_else(|| EstimateError::not_found(Entity::RatingQuantile, quantile.to_string()))
    }

    /// Tabulates quantiles over a population of players. Skill quantiles are taken over the mean
    /// skill of everyone with a record for the character, paired with the average of their
    /// deviations. Unrated players (negative rating) are excluded from the rating quantiles.
    pub fn from_population(
        roster: &Roster,
        players: &FxHashMap<String, PlayerRecord>,
    ) -> Result<Self, EstimateError> {
        let mut skill = FxHashMap::default();
        for character in roster.items() {
            let mut means = vec![];
            let mut stds = vec![];
            for record in players.values() {
                if let Some(character_skill) = record.skill(character) {
                    let dist = character_skill.to_gaussian()?;
                    means.push(dist.mean());
                    stds.push(dist.std());
                }
            }
            if means.is_empty() {
                continue;
            }
            sort(&mut means);
            let std = stds.mean();
            let quantiles = Quantile::iter()
                .map(|quantile| {
                    let mean = interpolate(&means, quantile.fraction());
                    (quantile, SkillDist { mean, std })
                })
                .collect();
            skill.insert(character.clone(), quantiles);
        }

        let rating = rating_quantiles(players);
        Ok(Self { skill, rating })
    }
}

/// Rating quantiles are left out when the population mixes rating systems; lookups then fail.
fn rating_quantiles(players: &FxHashMap<String, PlayerRecord>) -> BTreeMap<Quantile, Rating> {
    let rated: Vec<_> = players
        .values()
        .map(|record| record.rating)
        .filter(|rating| rating.value() >= 0.0)
        .collect();
    let Some(first) = rated.first() else {
        return BTreeMap::new();
    };

    let mut values: Vec<_> = rated.iter().map(Rating::value).collect();
    sort(&mut values);
    match first {
        Rating::Elo { .. } => {
            if !rated.iter().all(|rating| matches!(rating, Rating::Elo { .. })) {
                debug!("players are rated under different systems, skipping rating quantiles");
                return BTreeMap::new();
            }
            Quantile::iter()
                .map(|quantile| {
                    let elo = interpolate(&values, quantile.fraction());
                    (quantile, Rating::Elo { elo, games_played: 0 })
                })
                .collect()
        }
        Rating::Glicko { .. } => {
            let mut rds = Vec::with_capacity(rated.len());
            let mut vs = Vec::with_capacity(rated.len());
            for rating in &rated {
                match rating {
                    Rating::Glicko { rd, v, .. } => {
                        rds.push(*rd);
                        vs.push(*v);
                    }
                    Rating::Elo { .. } => {
                        debug!(
                            "players are rated under different systems, skipping rating quantiles"
                        );
                        return BTreeMap::new();
                    }
                }
            }
            let (rd, v) = (rds.mean(), vs.mean());
            Quantile::iter()
                .map(|quantile| {
                    let r = interpolate(&values, quantile.fraction());
                    (quantile, Rating::Glicko { r, rd, v, games_played: 0 })
                })
                .collect()
        }
    }
}

fn sort(values: &mut [f64]) {
    values.sort_by(|a, b| a.total_cmp(b));
}

/// Quantile of sorted, non-empty `values`, interpolating linearly between order statistics.
fn interpolate(values: &[f64], fraction: f64) -> f64 {
    let position = (values.len() - 1) as f64 * fraction;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let weight = position - lower as f64;
    values[lower] * (1.0 - weight) + values[upper] * weight
}
