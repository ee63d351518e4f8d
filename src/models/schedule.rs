//! Court scheduling request/result types.

use crate::models::event::EventId;
use crate::models::game::{MatchId, Opponent};
use crate::models::player::PlayerId;
use crate::models::TournamentError;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Court ordinal, 1-based. Displayed as `Court-N`.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CourtId(pub u32);

impl fmt::Display for CourtId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Court-{}", self.0)
    }
}

impl FromStr for CourtId {
    type Err = TournamentError;

    /// Accepts `Court-3`, `court-3` or plain `3`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let digits = match s.get(..6) {
            Some(prefix) if prefix.eq_ignore_ascii_case("court-") => &s[6..],
            _ => s,
        };
        match digits.parse::<u32>() {
            Ok(n) if n >= 1 => Ok(CourtId(n)),
            _ => Err(TournamentError::InvalidRequest(format!("invalid court id '{s}'"))),
        }
    }
}

/// Courts used when a request does not say.
pub const DEFAULT_NUM_COURTS: u32 = 4;

/// Match length used when a request does not say.
pub const DEFAULT_MATCH_DURATION_MINUTES: i64 = 30;

/// Body of a scheduling request. Rest time comes from the event, not the caller.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRequest {
    pub event_id: EventId,
    #[serde(default)]
    pub num_courts: Option<u32>,
    #[serde(default)]
    pub match_duration_minutes: Option<i64>,
    pub start_time: DateTime<Utc>,
    /// Latest allowed end, in minutes after `start_time`.
    #[serde(default)]
    pub horizon_minutes: Option<i64>,
    #[serde(default)]
    pub enforce_round_order: bool,
}

impl ScheduleRequest {
    pub fn new(
        event_id: EventId,
        num_courts: u32,
        match_duration_minutes: i64,
        start_time: DateTime<Utc>,
    ) -> Self {
        Self {
            event_id,
            num_courts: Some(num_courts),
            match_duration_minutes: Some(match_duration_minutes),
            start_time,
            horizon_minutes: None,
            enforce_round_order: false,
        }
    }

    /// Fill in fields the caller left out.
    pub fn or_defaults(mut self, num_courts: u32, match_duration_minutes: i64) -> Self {
        self.num_courts.get_or_insert(num_courts);
        self.match_duration_minutes.get_or_insert(match_duration_minutes);
        self
    }

    pub fn params(&self, min_rest_minutes: i64) -> ScheduleParams {
        ScheduleParams {
            num_courts: self.num_courts.unwrap_or(DEFAULT_NUM_COURTS),
            match_duration_minutes: self
                .match_duration_minutes
                .unwrap_or(DEFAULT_MATCH_DURATION_MINUTES),
            start_time: self.start_time,
            min_rest_minutes,
            horizon_minutes: self.horizon_minutes,
            enforce_round_order: self.enforce_round_order,
        }
    }
}

/// Scheduler inputs besides the bracket.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ScheduleParams {
    pub num_courts: u32,
    pub match_duration_minutes: i64,
    pub start_time: DateTime<Utc>,
    pub min_rest_minutes: i64,
    /// `None` uses the default horizon: every schedulable match back to back with rest.
    pub horizon_minutes: Option<i64>,
    /// When set, no match starts before every match of earlier rounds has ended.
    pub enforce_round_order: bool,
}

impl ScheduleParams {
    /// Params with the soft round priority and the default horizon.
    pub fn new(
        num_courts: u32,
        match_duration_minutes: i64,
        start_time: DateTime<Utc>,
        min_rest_minutes: i64,
    ) -> Self {
        Self {
            num_courts,
            match_duration_minutes,
            start_time,
            min_rest_minutes,
            horizon_minutes: None,
            enforce_round_order: false,
        }
    }

    pub fn with_horizon(mut self, minutes: i64) -> Self {
        self.horizon_minutes = Some(minutes);
        self
    }

    pub fn with_round_order(mut self) -> Self {
        self.enforce_round_order = true;
        self
    }
}

/// Court and time chosen for one match; `end_time - start_time` is the match duration.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ScheduleAssignment {
    pub match_id: MatchId,
    pub round: u32,
    pub court: CourtId,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub player1: PlayerId,
    pub player2: Opponent,
}

impl ScheduleAssignment {
    pub fn involves(&self, player: PlayerId) -> bool {
        self.player1 == player || self.player2 == Opponent::Player(player)
    }
}

/// A court and time already taken by a match that is not being rescheduled
/// (played, or belonging to another event). New matches are placed around it.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct BookedSlot {
    pub match_id: MatchId,
    pub court: CourtId,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub player1: PlayerId,
    pub player2: Opponent,
}

impl BookedSlot {
    /// Real players holding this slot.
    pub fn players(&self) -> impl Iterator<Item = PlayerId> {
        std::iter::once(self.player1).chain(self.player2.player())
    }
}

/// Output of one scheduling run. Assignments are in processing order.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    pub assignments: Vec<ScheduleAssignment>,
    /// Matches with no feasible slot inside the horizon.
    pub unscheduled: Vec<MatchId>,
    /// Walkovers: never given a court or time.
    pub byes: Vec<MatchId>,
}

impl Schedule {
    /// Non-bye matches that were offered to the scheduler.
    pub fn total_matches(&self) -> usize {
        self.assignments.len() + self.unscheduled.len()
    }

    pub fn is_complete(&self) -> bool {
        self.unscheduled.is_empty()
    }

    pub fn assignment(&self, match_id: MatchId) -> Option<&ScheduleAssignment> {
        self.assignments.iter().find(|a| a.match_id == match_id)
    }

    /// Assignments grouped per court, each court sorted by start time.
    pub fn by_court(&self) -> BTreeMap<CourtId, Vec<&ScheduleAssignment>> {
        let mut courts: BTreeMap<CourtId, Vec<&ScheduleAssignment>> = BTreeMap::new();
        for a in &self.assignments {
            courts.entry(a.court).or_default().push(a);
        }
        for list in courts.values_mut() {
            list.sort_by_key(|a| (a.start_time, a.match_id));
        }
        courts
    }

    /// When the last scheduled match ends.
    pub fn makespan_end(&self) -> Option<DateTime<Utc>> {
        self.assignments.iter().map(|a| a.end_time).max()
    }

    /// Total time between `start` and the last match ending.
    pub fn makespan(&self, start: DateTime<Utc>) -> Duration {
        self.makespan_end()
            .map_or_else(Duration::zero, |end| end - start)
    }

    pub fn summary(&self) -> String {
        format!(
            "Scheduled {} of {} matches",
            self.assignments.len(),
            self.total_matches()
        )
    }
}
