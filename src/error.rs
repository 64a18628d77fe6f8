use std::fmt::{Display, Formatter};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EstimateError {
    #[error("no {kind} named '{name}'")]
    NotFound { kind: Entity, name: String },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("domain error: {0}")]
    Domain(String),
}

impl EstimateError {
    pub fn not_found(kind: Entity, name: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            name: name.into(),
        }
    }
}

/// The kind of record a lookup failed to find.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Character,
    Player,
    PlayerCharacter,
    SkillQuantile,
    RatingQuantile,
}

impl Display for Entity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let str = match self {
            Entity::Character => "character",
            Entity::Player => "player",
            Entity::PlayerCharacter => "player-character skill",
            Entity::SkillQuantile => "skill quantile for character",
            Entity::RatingQuantile => "rating quantile",
        };
        write!(f, "{str}")
    }
}
