//! The statistics snapshot consumed by the estimator: matchup stats, the roster, player records,
//! population quantiles and the rating scale.

use crate::error::{Entity, EstimateError};
use crate::file::ReadJsonFile;
use crate::gaussian::Gaussian;
use crate::quantile::QuantileTable;
use crate::rating::RatingScale;
use crate::roster::Roster;
use crate::skill::{PlayerRecord, Skill};
use anyhow::Context;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

/// Version -> opposing version -> stats.
pub type VersionedStats = BTreeMap<String, BTreeMap<String, MatchupStats>>;

/// Observed win-logit distribution for one character against another.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchupStats {
    pub mean: f64,
    pub std: f64,
    #[serde(alias = "counts")]
    pub count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub versions: Option<VersionedStats>,
}
impl MatchupStats {
    pub fn new(mean: f64, std: f64, count: u64) -> Self {
        Self {
            mean,
            std,
            count,
            versions: None,
        }
    }

    pub fn has_data(&self) -> bool {
        self.count > 0
    }

    pub fn to_gaussian(&self) -> Result<Gaussian, EstimateError> {
        Gaussian::with_std(self.mean, self.std)
    }
}

/// Character -> opposing character -> stats. Pairs without recorded games may be absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MatchupTable(FxHashMap<String, FxHashMap<String, MatchupStats>>);
impl MatchupTable {
    pub fn get(&self, c1: &str, c2: &str) -> Option<&MatchupStats> {
        self.0.get(c1).and_then(|row| row.get(c2))
    }

    pub fn insert(&mut self, c1: impl Into<String>, c2: impl Into<String>, stats: MatchupStats) {
        self.0.entry(c1.into()).or_default().insert(c2.into(), stats);
    }

    fn characters(&self) -> impl Iterator<Item = &str> {
        self.0
            .iter()
            .flat_map(|(c1, row)| {
                std::iter::once(c1.as_str()).chain(row.keys().map(String::as_str))
            })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub characters: Roster,
    pub matchups: MatchupTable,
    pub players: FxHashMap<String, PlayerRecord>,
    /// Built from `players` when absent.
    #[serde(default)]
    pub quantiles: Option<QuantileTable>,
    pub rating_scale: RatingScale,
}
impl Snapshot {
    pub fn read_from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let snapshot = Self::read_json_file(path)
            .with_context(|| format!("reading snapshot from {}", path.display()))?;
        debug!(
            "read snapshot from {}: {} characters, {} players",
            path.display(),
            snapshot.characters.len(),
            snapshot.players.len()
        );
        Ok(snapshot)
    }

    pub fn validate(&self) -> Result<(), EstimateError> {
        if self.characters.is_empty() {
            return Err(EstimateError::InvalidArgument("the roster is empty".into()));
        }
        for character in self.matchups.characters() {
            self.characters.check(character)?;
        }
        self.rating_scale.validate()?;
        Ok(())
    }

    /// Tabulates population quantiles from the player records if the snapshot carries none.
    pub fn with_population_quantiles(mut self) -> Result<Self, EstimateError> {
        if self.quantiles.is_none() {
            debug!("tabulating quantiles over {} players", self.players.len());
            self.quantiles = Some(QuantileTable::from_population(
                &self.characters,
                &self.players,
            )?);
        }
        Ok(self)
    }

    pub fn player(&self, name: &str) -> Result<&PlayerRecord, EstimateError> {
        self.players
            .get(name)
            .ok_or_else(|| EstimateError::not_found(Entity::Player, name))
    }

    pub fn skill(&self, player: &str, character: &str) -> Result<&Skill, EstimateError> {
        self.player(player)?.skill(character).ok_or_else(|| {
            EstimateError::not_found(Entity::PlayerCharacter, format!("{player}/{character}"))
        })
    }

    /// Players ordered by descending games played, then by name.
    pub fn players_by_games(&self) -> Vec<(&str, u32)> {
        let mut players: Vec<_> = self
            .players
            .iter()
            .map(|(name, record)| (name.as_str(), record.games_played()))
            .collect();
        players.sort_by(|(a_name, a_games), (b_name, b_games)| {
            b_games.cmp(a_games).then_with(|| a_name.cmp(b_name))
        });
        players
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quantile::Quantile;
    use crate::testing;

    #[test]
    fn matchup_lookup() {
        let snapshot = testing::snapshot();
        assert_eq!(100, snapshot.matchups.get("A", "B").unwrap().count);
        assert!(snapshot.matchups.get("A", "C").is_none());
        assert!(snapshot.matchups.get("Z", "A").is_none());
    }

    #[test]
    fn validate() {
        let snapshot = testing::snapshot();
        assert!(snapshot.validate().is_ok());

        let mut snapshot = testing::snapshot();
        snapshot.matchups.insert("A", "Z", MatchupStats::new(0.0, 0.1, 3));
        assert_eq!(
            Err(EstimateError::not_found(Entity::Character, "Z")),
            snapshot.validate()
        );

        let empty = Snapshot::default();
        assert!(matches!(
            empty.validate(),
            Err(EstimateError::InvalidArgument(_))
        ));
    }

    #[test]
    fn player_lookups() {
        let snapshot = testing::snapshot();
        assert!(snapshot.player("alice").is_ok());
        assert_eq!(
            EstimateError::not_found(Entity::Player, "mallory"),
            snapshot.player("mallory").unwrap_err()
        );
        assert_eq!(
            EstimateError::not_found(Entity::PlayerCharacter, "bob/A"),
            snapshot.skill("bob", "A").unwrap_err()
        );
    }

    #[test]
    fn players_by_games() {
        let snapshot = testing::snapshot();
        assert_eq!(
            vec![("alice", 120), ("carol", 80), ("bob", 40)],
            snapshot.players_by_games()
        );
    }

    #[test]
    fn population_quantiles_are_filled_once() {
        let snapshot = testing::snapshot();
        assert!(snapshot.quantiles.is_none());
        let snapshot = snapshot.with_population_quantiles().unwrap();
        let quantiles = snapshot.quantiles.clone().unwrap();
        assert!(quantiles.skill("B", Quantile::P50).is_ok());

        let custom = QuantileTable::default();
        let snapshot = Snapshot {
            quantiles: Some(custom.clone()),
            ..snapshot
        }
        .with_population_quantiles()
        .unwrap();
        assert_eq!(Some(custom), snapshot.quantiles);
    }

    #[test]
    fn deserialize() {
        let json = r#"{
            "characters": ["A", "B"],
            "matchups": {
                "A": {"B": {"mean": 0.4, "std": 0.3, "counts": 100}},
                "B": {"A": {"mean": -0.4, "std": 0.3, "count": 100, "versions": {
                    "1": {"1": {"mean": -0.5, "std": 0.4, "count": 60}},
                    "2": {"1": {"mean": -0.2, "std": 0.5, "count": 40}}
                }}}
            },
            "players": {
                "alice": {
                    "rating": {"system": "elo", "elo": 1650.0, "games_played": 120},
                    "characters": {
                        "A": {"system": "gaussian", "mean": 0.2, "std": 0.1, "played": 70}
                    }
                }
            },
            "rating_scale": {"mean": 0.9, "std": 0.1}
        }"#;
        let snapshot: Snapshot = serde_json::from_str(json).unwrap();
        assert!(snapshot.validate().is_ok());
        assert_eq!(100, snapshot.matchups.get("A", "B").unwrap().count);
        let versions = snapshot.matchups.get("B", "A").unwrap().versions.as_ref().unwrap();
        assert_eq!(40, versions["2"]["1"].count);
        assert_eq!(70, snapshot.skill("alice", "A").unwrap().played());
        assert!(snapshot.quantiles.is_none());
    }
}
