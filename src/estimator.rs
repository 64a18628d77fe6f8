//! The query interface: bucketed win-chance estimates for a character pair, globally or for a
//! specific player, and their summaries.

use crate::bucket::{bucketize, BucketContext, WinBucket};
use crate::config::EstimatorConfig;
use crate::data::{MatchupStats, Snapshot};
use crate::error::EstimateError;
use crate::posterior::{Composer, Opponent, Posterior, Scope};
use crate::quantile::QuantileTable;
use crate::summary::{self, Summary};
use serde::Serialize;
use tracing::debug;

/// Bucket series for one pair of character versions. `versions` is `None` when the stats carry
/// no version rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VersionedBuckets {
    pub versions: Option<(String, String)>,
    pub buckets: Vec<WinBucket>,
}

#[derive(Debug)]
pub struct Estimator {
    snapshot: Snapshot,
    quantiles: QuantileTable,
    config: EstimatorConfig,
}
impl Estimator {
    pub fn try_new(snapshot: Snapshot, config: EstimatorConfig) -> Result<Self, EstimateError> {
        config.validate()?;
        snapshot.validate()?;
        let mut snapshot = snapshot.with_population_quantiles()?;
        let quantiles = snapshot.quantiles.take().unwrap_or_default();
        debug!(
            "estimator ready: {} characters, {} players, {} buckets",
            snapshot.characters.len(),
            snapshot.players.len(),
            config.buckets()
        );
        Ok(Self {
            snapshot,
            quantiles,
            config,
        })
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn quantiles(&self) -> &QuantileTable {
        &self.quantiles
    }

    pub fn config(&self) -> &EstimatorConfig {
        &self.config
    }

    fn composer(&self) -> Composer<'_> {
        Composer {
            snapshot: &self.snapshot,
            quantiles: &self.quantiles,
            elo_scale_constant: self.config.elo_scale_constant,
        }
    }

    /// The player-conditioned scope, against `opponent` if named or else against the configured
    /// population stand-in.
    pub fn player_scope(&self, player: &str, opponent: Option<&str>) -> Scope {
        Scope::Player {
            player: player.to_string(),
            opponent: match opponent {
                Some(opponent) => Opponent::Named(opponent.to_string()),
                None => Opponent::Population(self.config.against),
            },
        }
    }

    pub fn posterior(&self, c1: &str, c2: &str, scope: &Scope) -> Result<Posterior, EstimateError> {
        self.composer()
            .compose(c1, c2, scope, self.snapshot.matchups.get(c1, c2))
    }

    pub fn estimate_global(&self, c1: &str, c2: &str) -> Result<Vec<WinBucket>, EstimateError> {
        self.estimate(c1, c2, &Scope::Global)
    }

    pub fn estimate_for_player(
        &self,
        c1: &str,
        c2: &str,
        player: &str,
        opponent: Option<&str>,
    ) -> Result<Vec<WinBucket>, EstimateError> {
        self.estimate(c1, c2, &self.player_scope(player, opponent))
    }

    pub fn estimate(
        &self,
        c1: &str,
        c2: &str,
        scope: &Scope,
    ) -> Result<Vec<WinBucket>, EstimateError> {
        debug!("estimating {c1} vs {c2} ({scope})");
        self.estimate_with_stats(c1, c2, scope, self.snapshot.matchups.get(c1, c2))
    }

    fn estimate_with_stats(
        &self,
        c1: &str,
        c2: &str,
        scope: &Scope,
        stats: Option<&MatchupStats>,
    ) -> Result<Vec<WinBucket>, EstimateError> {
        let posterior = self.composer().compose(c1, c2, scope, stats)?;
        let (player_count, opponent_count) = self.player_counts(c1, c2, scope)?;
        let count = match posterior {
            Posterior::NoData => 0,
            _ => stats.map_or(0, |stats| stats.count),
        };
        bucketize(
            &posterior,
            self.config.bucket_width,
            self.config.buckets(),
            &self.config.credible_interval,
            &BucketContext {
                c1,
                c2,
                scope,
                count,
                player_count,
                opponent_count,
            },
        )
    }

    fn player_counts(
        &self,
        c1: &str,
        c2: &str,
        scope: &Scope,
    ) -> Result<(Option<u32>, Option<u32>), EstimateError> {
        let player_count = match scope.player() {
            None => None,
            Some(player) => Some(self.snapshot.skill(player, c1)?.played()),
        };
        let opponent_count = match scope.opponent() {
            None => None,
            Some(opponent) => Some(self.snapshot.skill(opponent, c2)?.played()),
        };
        Ok((player_count, opponent_count))
    }

    /// One series per recorded pair of character versions. Stats without a version breakdown
    /// yield a single series from the aggregate; an empty breakdown yields a single series without
    /// data.
    pub fn estimate_versions(
        &self,
        c1: &str,
        c2: &str,
        scope: &Scope,
    ) -> Result<Vec<VersionedBuckets>, EstimateError> {
        let stats = self.snapshot.matchups.get(c1, c2);
        let Some(versions) = stats.and_then(|stats| stats.versions.as_ref()) else {
            return Ok(vec![VersionedBuckets {
                versions: None,
                buckets: self.estimate(c1, c2, scope)?,
            }]);
        };

        let mut series = vec![];
        for (v1, row) in versions {
            for (v2, version_stats) in row {
                debug!("estimating {c1}@{v1} vs {c2}@{v2} ({scope})");
                series.push(VersionedBuckets {
                    versions: Some((v1.clone(), v2.clone())),
                    buckets: self.estimate_with_stats(c1, c2, scope, Some(version_stats))?,
                });
            }
        }
        if series.is_empty() {
            series.push(VersionedBuckets {
                versions: None,
                buckets: self.estimate_with_stats(c1, c2, scope, None)?,
            });
        }
        Ok(series)
    }

    /// Series for every character pair in roster order, row by row. Under a player scope, only
    /// characters the player (and a named opponent) have records with are included.
    pub fn estimate_roster(&self, scope: &Scope) -> Result<Vec<Vec<WinBucket>>, EstimateError> {
        let characters = self.snapshot.characters.items();
        let playable = |player: Option<&str>, character: &str| -> Result<bool, EstimateError> {
            match player {
                None => Ok(true),
                Some(player) => Ok(self.snapshot.player(player)?.skill(character).is_some()),
            }
        };

        let mut matrix = Vec::with_capacity(characters.len() * characters.len());
        for c1 in characters {
            if !playable(scope.player(), c1)? {
                continue;
            }
            for c2 in characters {
                if !playable(scope.opponent(), c2)? {
                    continue;
                }
                matrix.push(self.estimate(c1, c2, scope)?);
            }
        }
        debug!("estimated {} pairs ({scope})", matrix.len());
        Ok(matrix)
    }

    pub fn summarize(&self, buckets: &[WinBucket]) -> Result<Summary, EstimateError> {
        summary::summarize(buckets)
    }
}
