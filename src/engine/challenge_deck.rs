use serde::{Deserialize, Serialize};

use crate::engine::word::normalize_text;

/// Words flagged for priority review. Insertion order is kept so session
/// building is deterministic with respect to the deck.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChallengeDeck {
    members: Vec<String>,
}

impl ChallengeDeck {
    pub fn from_members(members: Vec<String>) -> Self {
        let mut deck = Self::default();
        for text in members {
            deck.add(&text);
        }
        deck
    }

    /// Returns true if the word was not already a member.
    pub fn add(&mut self, text: &str) -> bool {
        let key = normalize_text(text);
        if key.is_empty() || self.members.contains(&key) {
            return false;
        }
        self.members.push(key);
        true
    }

    /// Returns true if the word was a member.
    pub fn remove(&mut self, text: &str) -> bool {
        let key = normalize_text(text);
        let before = self.members.len();
        self.members.retain(|m| *m != key);
        self.members.len() != before
    }

    pub fn contains(&self, text: &str) -> bool {
        let key = normalize_text(text);
        self.members.contains(&key)
    }

    pub fn members(&self) -> &[String] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}
