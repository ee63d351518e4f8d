//! Match (game), its opponent slot, status, score and umpire match code.

use crate::models::event::EventId;
use crate::models::player::PlayerId;
use crate::models::schedule::CourtId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a match.
pub type MatchId = Uuid;

/// Second slot of a match: a real player, or the bye sentinel.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Opponent {
    Player(PlayerId),
    Bye,
}

impl Opponent {
    pub fn player(self) -> Option<PlayerId> {
        match self {
            Opponent::Player(id) => Some(id),
            Opponent::Bye => None,
        }
    }
}

/// Lifecycle of a match.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    #[default]
    Pending,
    /// Walkover: player1 advances without playing.
    Bye,
    Scheduled,
    Completed,
}

/// A single knockout match.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct GameMatch {
    pub id: MatchId,
    pub event_id: EventId,
    /// 1-based; round 1 is played first.
    pub round: u32,
    pub player1: PlayerId,
    pub player2: Opponent,
    pub status: MatchStatus,
    pub court: Option<CourtId>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
}

impl GameMatch {
    /// New unscheduled match. A bye opponent resolves the match to `Bye` immediately.
    pub fn new(event_id: EventId, round: u32, player1: PlayerId, player2: Opponent) -> Self {
        let status = match player2 {
            Opponent::Bye => MatchStatus::Bye,
            Opponent::Player(_) => MatchStatus::Pending,
        };
        Self {
            id: Uuid::new_v4(),
            event_id,
            round,
            player1,
            player2,
            status,
            court: None,
            start_time: None,
            end_time: None,
        }
    }

    pub fn is_bye(&self) -> bool {
        self.player2 == Opponent::Bye
    }

    /// Real players in this match (one for a bye, two otherwise).
    pub fn players(&self) -> impl Iterator<Item = PlayerId> {
        std::iter::once(self.player1).chain(self.player2.player())
    }

    pub fn involves(&self, player: PlayerId) -> bool {
        self.players().any(|p| p == player)
    }

    /// Drop any court/time assignment and return to `Pending` (byes stay `Bye`).
    pub fn clear_schedule(&mut self) {
        self.court = None;
        self.start_time = None;
        self.end_time = None;
        if self.status == MatchStatus::Scheduled {
            self.status = MatchStatus::Pending;
        }
    }
}

/// Final score of a match, in sets.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Score {
    pub match_id: MatchId,
    pub player1_score: u32,
    pub player2_score: u32,
}

/// Code handed to the umpire of a match; required to submit its score from the court.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct MatchCode {
    pub match_id: MatchId,
    pub code: String,
    pub assigned_umpire: String,
    pub expires_at: DateTime<Utc>,
}

impl MatchCode {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}
