//! Player and Club data structures.

use crate::models::event::EventId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a player (used in matches and lookups).
pub type PlayerId = Uuid;

/// Unique identifier for a club.
pub type ClubId = Uuid;

/// A club players register under. Names are unique (case-insensitive).
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Club {
    pub id: ClubId,
    pub name: String,
}

impl Club {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
        }
    }
}

/// A registered player. Immutable once created.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub age: u32,
    pub phone: String,
    pub club_id: ClubId,
    /// Events this player is entered in.
    pub event_ids: Vec<EventId>,
}

/// Registration input for a single player (API body and CSV rows both end up here).
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct NewPlayer {
    pub name: String,
    pub age: u32,
    pub phone: String,
    pub club_id: ClubId,
    #[serde(default)]
    pub event_ids: Vec<EventId>,
}

impl Player {
    /// Create a player from registration input. Name and phone are trimmed.
    pub fn new(input: NewPlayer) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: input.name.trim().to_string(),
            age: input.age,
            phone: input.phone.trim().to_string(),
            club_id: input.club_id,
            event_ids: input.event_ids,
        }
    }

    /// Whether this player is entered in the given event.
    pub fn is_entered_in(&self, event_id: EventId) -> bool {
        self.event_ids.contains(&event_id)
    }

    /// Case-insensitive, whitespace-insensitive name comparison.
    pub fn has_name(&self, name: &str) -> bool {
        self.name.trim().eq_ignore_ascii_case(name.trim())
    }
}
