//! Testing helpers.

use crate::data::{MatchupStats, MatchupTable, Snapshot};
use crate::rating::{Rating, RatingScale};
use crate::roster::Roster;
use crate::skill::{PlayerRecord, Skill};
use assert_float_eq::*;

/// Asserts that two mass or density series agree bucket by bucket, within a relative `epsilon`.
pub fn assert_series_relative(expected: &[f64], actual: &[f64], epsilon: f64) {
    assert_eq!(expected.len(), actual.len(), "series lengths differ");
    for (&expected, &actual) in expected.iter().zip(actual) {
        // exact zeros have no relative error
        if expected != actual {
            assert_float_relative_eq!(expected, actual, epsilon);
        }
    }
}

pub fn gaussian_skill(mean: f64, std: f64, played: u32) -> Skill {
    Skill::Gaussian { mean, std, played }
}

pub fn elo_player(elo: f64, games_played: u32, skills: &[(&str, Skill)]) -> PlayerRecord {
    PlayerRecord {
        rating: Rating::Elo { elo, games_played },
        characters: skills
            .iter()
            .map(|(character, skill)| (character.to_string(), *skill))
            .collect(),
    }
}

/// Three characters, of which `C` has no recorded matchups; `alice` and `bob` share a rating.
pub fn snapshot() -> Snapshot {
    let mut matchups = MatchupTable::default();
    matchups.insert("A", "B", MatchupStats::new(0.4, 0.3, 100));
    matchups.insert("B", "A", MatchupStats::new(-0.4, 0.3, 100));
    matchups.insert("A", "A", MatchupStats::new(0.0, 0.05, 40));

    let players = [
        (
            "alice",
            elo_player(
                1500.0,
                120,
                &[("A", gaussian_skill(0.2, 0.1, 70)), ("B", gaussian_skill(0.0, 0.2, 50))],
            ),
        ),
        (
            "bob",
            elo_player(
                1500.0,
                40,
                &[("B", gaussian_skill(-0.1, 0.1, 30)), ("C", gaussian_skill(0.3, 0.2, 10))],
            ),
        ),
        (
            "carol",
            elo_player(
                1700.0,
                80,
                &[("A", gaussian_skill(-0.3, 0.2, 30)), ("B", gaussian_skill(0.4, 0.15, 50))],
            ),
        ),
    ]
    .into_iter()
    .map(|(name, record)| (name.to_string(), record))
    .collect();

    Snapshot {
        characters: Roster::from_iter(["A", "B", "C"]),
        matchups,
        players,
        quantiles: None,
        rating_scale: RatingScale {
            mean: 0.9,
            std: 0.1,
        },
    }
}
