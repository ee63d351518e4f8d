//! Knockout tournament manager: library with models and business logic.
//!
//! The core is [`schedule`], which places every match of a bracket on a court
//! and time slot while keeping each player's minimum rest between matches.

pub mod api;
pub mod config;
pub mod logic;
pub mod models;

pub use config::ServerConfig;
pub use logic::{
    advance_round, champion, generate_fixtures, generate_knockout_fixtures, import_players_csv,
    issue_match_code, latest_leaderboard, leaderboard, match_winner, schedule, schedule_around,
    schedule_event, update_score, verify_match_code, CsvImportReport, IssuedCode, Leaderboard,
    LeaderboardEntry, RowError, ScoreOutcome,
};
pub use models::{
    BookedSlot, Bracket, Club, ClubId, CourtId, Event, EventId, EventKind, GameMatch, MatchCode,
    MatchId, MatchStatus, NewEvent, NewPlayer, Opponent, Player, PlayerId, Schedule,
    ScheduleAssignment, ScheduleParams, ScheduleRequest, Score, Tournament, TournamentError,
};
