//! Data structures for the tournament: clubs, events, players, matches, brackets, schedules.

mod bracket;
mod error;
mod event;
mod game;
mod player;
mod schedule;
mod tournament;

pub use bracket::Bracket;
pub use error::{Result, TournamentError};
pub use event::{Event, EventId, EventKind, NewEvent, DEFAULT_MIN_REST_MINUTES};
pub use game::{GameMatch, MatchCode, MatchId, MatchStatus, Opponent, Score};
pub use player::{Club, ClubId, NewPlayer, Player, PlayerId};
pub use schedule::{
    BookedSlot, CourtId, Schedule, ScheduleAssignment, ScheduleParams, ScheduleRequest,
    DEFAULT_MATCH_DURATION_MINUTES, DEFAULT_NUM_COURTS,
};
pub use tournament::Tournament;
