//! Event (one knockout competition inside the tournament).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for an event.
pub type EventId = Uuid;

/// Rest between two matches of the same player when an event does not set one.
pub const DEFAULT_MIN_REST_MINUTES: i64 = 10;

fn default_min_rest() -> i64 {
    DEFAULT_MIN_REST_MINUTES
}

/// Competition format of an event. Only single elimination is supported.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    #[default]
    Knockout,
}

/// Body for creating an event.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct NewEvent {
    pub name: String,
    #[serde(default, rename = "type")]
    pub kind: EventKind,
    #[serde(default = "default_min_rest")]
    pub min_rest: i64,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: EventKind,
    /// Minimum minutes between the end of one match and the start of the next for a player.
    pub min_rest: i64,
    pub created_at: DateTime<Utc>,
}

impl Event {
    pub fn new(input: NewEvent, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: input.name.trim().to_string(),
            kind: input.kind,
            min_rest: input.min_rest,
            created_at,
        }
    }
}
