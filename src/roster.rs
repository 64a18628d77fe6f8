//! The ordered set of playable characters.

use crate::error::{Entity, EstimateError};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::ops::Index;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct Roster {
    character_to_index: FxHashMap<String, usize>,
    index_to_character: Vec<String>,
}
impl Roster {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            character_to_index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            index_to_character: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, character: impl Into<String>) -> Result<(), EstimateError> {
        let character = character.into();
        let index = self.index_to_character.len();
        if let Some(&existing_index) = self.character_to_index.get(&character) {
            return Err(EstimateError::InvalidArgument(format!(
                "duplicate character '{character}' at index {index}, previously at {existing_index}"
            )));
        }
        self.character_to_index.insert(character.clone(), index);
        self.index_to_character.push(character);
        Ok(())
    }

    pub fn item_at(&self, index: usize) -> Option<&String> {
        self.index_to_character.get(index)
    }

    pub fn index_of(&self, character: &str) -> Option<usize> {
        self.character_to_index.get(character).copied()
    }

    pub fn contains(&self, character: &str) -> bool {
        self.character_to_index.contains_key(character)
    }

    /// Fails with `NotFound` for a character outside the roster.
    pub fn check(&self, character: &str) -> Result<(), EstimateError> {
        if self.contains(character) {
            Ok(())
        } else {
            Err(EstimateError::not_found(Entity::Character, character))
        }
    }

    pub fn len(&self) -> usize {
        self.index_to_character.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index_to_character.is_empty()
    }

    pub fn items(&self) -> &[String] {
        &self.index_to_character
    }
}

impl Index<usize> for Roster {
    type Output = String;

    fn index(&self, index: usize) -> &Self::Output {
        self.item_at(index)
            .unwrap_or_else(|| panic!("no character at index {index}"))
    }
}

impl TryFrom<Vec<String>> for Roster {
    type Error = EstimateError;

    fn try_from(characters: Vec<String>) -> Result<Self, Self::Error> {
        let mut roster = Roster::with_capacity(characters.len());
        for character in characters {
            roster.push(character)?;
        }
        Ok(roster)
    }
}

impl From<Roster> for Vec<String> {
    fn from(roster: Roster) -> Self {
        roster.index_to_character
    }
}

/// Panics on a duplicate character; use [Roster::try_from] for untrusted input.
impl<S: Into<String>> FromIterator<S> for Roster {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut roster = Roster::default();
        for character in iter {
            if let Err(err) = roster.push(character) {
                panic!("{err}");
            }
        }
        roster
    }
}
