//! Tournament business logic: fixtures, court scheduling, match codes, scoring, registration.

mod fixtures;
mod match_codes;
mod registration;
mod scheduler;
mod scoring;

pub use fixtures::{advance_round, champion, generate_fixtures, generate_knockout_fixtures};
pub use match_codes::{
    issue_match_code, random_code, verify_match_code, IssuedCode, CODE_LENGTH,
    DEFAULT_CODE_TTL_HOURS,
};
pub use registration::{import_players_csv, CsvImportReport, RowError, REQUIRED_COLUMNS};
pub use scheduler::{schedule, schedule_around, schedule_event};
pub use scoring::{
    latest_leaderboard, leaderboard, match_winner, update_score, Leaderboard, LeaderboardEntry,
    ScoreOutcome,
};
