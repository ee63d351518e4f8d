//! Errors that can occur during tournament operations.

use crate::models::event::EventId;
use crate::models::game::MatchId;
use crate::models::player::{ClubId, PlayerId};
use thiserror::Error;

#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum TournamentError {
    /// Malformed scheduling parameters or bracket. Fatal to the call; no partial result.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("club {0} not found")]
    ClubNotFound(ClubId),
    #[error("event {0} not found")]
    EventNotFound(EventId),
    #[error("match {0} not found")]
    MatchNotFound(MatchId),
    #[error("player {0} not found")]
    PlayerNotFound(PlayerId),
    #[error("club '{0}' already exists")]
    DuplicateClubName(String),
    #[error("player '{name}' is already registered in event {event_id}")]
    DuplicatePlayerInEvent { name: String, event_id: EventId },
    /// Fixture generation needs at least two entrants.
    #[error("at least 2 players required for tournament (found {0})")]
    NotEnoughPlayers(usize),
    #[error("fixtures already generated for event {0}")]
    FixturesAlreadyGenerated(EventId),
    #[error("no pending matches found for event {0}")]
    NoPendingMatches(EventId),
    #[error("invalid match code")]
    InvalidMatchCode,
    #[error("match code has expired")]
    MatchCodeExpired,
    #[error("invalid score: {0}")]
    InvalidScore(String),
    #[error("csv: {0}")]
    Csv(String),
}

impl TournamentError {
    /// Lookup failures (mapped to 404 by the web layer).
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            TournamentError::ClubNotFound(_)
                | TournamentError::EventNotFound(_)
                | TournamentError::MatchNotFound(_)
                | TournamentError::PlayerNotFound(_)
                | TournamentError::NoPendingMatches(_)
        )
    }
}

impl From<csv::Error> for TournamentError {
    fn from(err: csv::Error) -> Self {
        TournamentError::Csv(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, TournamentError>;
