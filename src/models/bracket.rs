//! Bracket: rounds of matches in play order.

use crate::models::game::GameMatch;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Rounds (ascending) mapped to their matches. Order within a round is the
/// order the matches were added and is the scheduling tie-break.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Bracket {
    rounds: BTreeMap<u32, Vec<GameMatch>>,
}

impl Bracket {
    pub fn new() -> Self {
        Self::default()
    }

    /// Group matches by their round, keeping the given order within each round.
    pub fn from_matches<I>(matches: I) -> Self
    where
        I: IntoIterator<Item = GameMatch>,
    {
        let mut bracket = Self::new();
        for m in matches {
            bracket.push(m);
        }
        bracket
    }

    /// Append a match to the end of its round.
    pub fn push(&mut self, m: GameMatch) {
        self.rounds.entry(m.round).or_default().push(m);
    }

    pub fn is_empty(&self) -> bool {
        self.rounds.values().all(Vec::is_empty)
    }

    /// Total matches across all rounds, byes included.
    pub fn len(&self) -> usize {
        self.rounds.values().map(Vec::len).sum()
    }

    pub fn round(&self, round: u32) -> Option<&[GameMatch]> {
        self.rounds.get(&round).map(Vec::as_slice)
    }

    pub fn rounds(&self) -> impl Iterator<Item = (u32, &[GameMatch])> {
        self.rounds.iter().map(|(r, ms)| (*r, ms.as_slice()))
    }

    pub fn last_round(&self) -> Option<u32> {
        self.rounds.keys().next_back().copied()
    }

    /// Round ascending, then within-round order.
    pub fn processing_order(&self) -> impl Iterator<Item = &GameMatch> {
        self.rounds.values().flatten()
    }
}
