//! Smart court scheduling: greedy earliest-slot placement with per-player rest.
//!
//! Matches are offered slots in processing order (round ascending, then bracket
//! order). Each one goes to the earliest start at which some court is free and
//! both players have rested at least `min_rest_minutes` since any other match
//! they play; ties go to the lowest court ordinal. The result only depends on
//! the inputs, so rerunning a request reproduces it exactly.

use crate::models::{
    BookedSlot, Bracket, CourtId, GameMatch, Opponent, PlayerId, Result, Schedule,
    ScheduleAssignment, ScheduleParams, ScheduleRequest, Tournament, TournamentError,
};
use chrono::{DateTime, Duration, Utc};
use std::collections::{HashMap, HashSet};

/// Upper bound for durations, rest and horizons (one year, in minutes).
const MAX_SPAN_MINUTES: i64 = 365 * 24 * 60;

const MAX_COURTS: u32 = 1024;

/// Horizons (explicit or default) are capped at a century of minutes.
const MAX_HORIZON_MINUTES: i64 = 100 * MAX_SPAN_MINUTES;

/// Half-open `[start, end)` in minutes after the request start.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct Interval {
    start: i64,
    end: i64,
}

/// Intervals already booked on a court or for a player, sorted by start.
#[derive(Debug, Default)]
struct Timeline(Vec<Interval>);

impl Timeline {
    fn insert(&mut self, iv: Interval) {
        let pos = self.0.partition_point(|x| x.start < iv.start);
        self.0.insert(pos, iv);
    }

    /// `[start, end)` keeps at least `gap` minutes from every booked interval.
    fn is_free(&self, start: i64, end: i64, gap: i64) -> bool {
        self.0
            .iter()
            .all(|iv| end + gap <= iv.start || iv.end + gap <= start)
    }

    /// Instants at which a booked interval stops blocking a new one.
    fn release_points(&self, gap: i64) -> impl Iterator<Item = i64> + '_ {
        self.0.iter().map(move |iv| iv.end + gap)
    }
}

fn invalid(msg: impl Into<String>) -> TournamentError {
    TournamentError::InvalidRequest(msg.into())
}

fn validate_params(params: &ScheduleParams) -> Result<()> {
    if params.num_courts < 1 || params.num_courts > MAX_COURTS {
        return Err(invalid(format!(
            "num_courts must be between 1 and {MAX_COURTS} (got {})",
            params.num_courts
        )));
    }
    if params.match_duration_minutes <= 0 || params.match_duration_minutes > MAX_SPAN_MINUTES {
        return Err(invalid(format!(
            "match_duration_minutes must be between 1 and {MAX_SPAN_MINUTES} (got {})",
            params.match_duration_minutes
        )));
    }
    if params.min_rest_minutes < 0 || params.min_rest_minutes > MAX_SPAN_MINUTES {
        return Err(invalid(format!(
            "min_rest_minutes must be between 0 and {MAX_SPAN_MINUTES} (got {})",
            params.min_rest_minutes
        )));
    }
    if let Some(h) = params.horizon_minutes {
        if h <= 0 {
            return Err(invalid(format!("horizon_minutes must be positive (got {h})")));
        }
    }
    Ok(())
}

fn validate_bracket(bracket: &Bracket) -> Result<()> {
    if bracket.is_empty() {
        return Err(invalid("bracket has no matches"));
    }
    let mut seen = HashSet::new();
    for m in bracket.processing_order() {
        if !seen.insert(m.id) {
            return Err(invalid(format!("match {} appears more than once", m.id)));
        }
        if m.player2 == Opponent::Player(m.player1) {
            return Err(invalid(format!("match {} pairs a player against themself", m.id)));
        }
    }
    Ok(())
}

/// Default horizon: every schedulable match played back to back with full rest,
/// after the last pre-booked slot ends. Appending a match after the latest booked
/// end never needs more than this, so without an explicit horizon every match
/// gets a slot.
fn default_horizon(matches: usize, duration: i64, rest: i64, booked_end: i64) -> i64 {
    i64::try_from(matches)
        .unwrap_or(i64::MAX)
        .saturating_mul(duration + rest)
        .saturating_add(booked_end.max(0))
}

/// Whole minutes from `origin` to `t`, rounded down.
fn minutes_floor(origin: DateTime<Utc>, t: DateTime<Utc>) -> i64 {
    (t - origin).num_seconds().div_euclid(60)
}

/// Whole minutes from `origin` to `t`, rounded up.
fn minutes_ceil(origin: DateTime<Utc>, t: DateTime<Utc>) -> i64 {
    let secs = (t - origin).num_seconds();
    secs.div_euclid(60) + i64::from(secs.rem_euclid(60) > 0)
}

/// Earliest `(court index, start)` for one match, or `None` if nothing fits before `horizon`.
fn find_slot(
    courts: &[Timeline],
    players: &[&Timeline],
    earliest: i64,
    duration: i64,
    rest: i64,
    horizon: i64,
) -> Option<(usize, i64)> {
    let mut best: Option<(i64, usize)> = None;
    for (idx, court) in courts.iter().enumerate() {
        // A feasible start can always be slid back until it hits the request start,
        // a court release or a player's rest release, so only those are tried.
        let mut candidates: Vec<i64> = std::iter::once(earliest)
            .chain(court.release_points(0))
            .chain(players.iter().flat_map(|p| p.release_points(rest)))
            .filter(|&t| t >= earliest)
            .collect();
        candidates.sort_unstable();
        candidates.dedup();

        for t in candidates {
            if best.is_some_and(|(bt, _)| t >= bt) {
                break;
            }
            let end = t + duration;
            if end > horizon {
                break;
            }
            if court.is_free(t, end, 0) && players.iter().all(|p| p.is_free(t, end, rest)) {
                best = Some((t, idx));
                break;
            }
        }
    }
    best.map(|(t, idx)| (idx, t))
}

fn at(start: DateTime<Utc>, minutes: i64) -> Result<DateTime<Utc>> {
    start
        .checked_add_signed(Duration::minutes(minutes))
        .ok_or_else(|| invalid("schedule extends past the representable time range"))
}

/// Assign a court and a `[start, end)` slot to every non-bye match of the bracket.
///
/// Fails only on malformed input. Matches that cannot be placed inside the
/// horizon are listed in [`Schedule::unscheduled`]; byes are listed in
/// [`Schedule::byes`] and never take a court.
pub fn schedule(bracket: &Bracket, params: &ScheduleParams) -> Result<Schedule> {
    schedule_around(bracket, params, &[])
}

/// Like [`schedule`], but courts and players are already busy during `booked`.
///
/// New matches never overlap a booked slot on its court, and keep the rest gap
/// to every booked slot of their players. Booked slots on courts beyond
/// `num_courts` only constrain their players.
pub fn schedule_around(
    bracket: &Bracket,
    params: &ScheduleParams,
    booked: &[BookedSlot],
) -> Result<Schedule> {
    validate_params(params)?;
    validate_bracket(bracket)?;

    let duration = params.match_duration_minutes;
    let rest = params.min_rest_minutes;
    let (byes, playable): (Vec<&GameMatch>, Vec<&GameMatch>) =
        bracket.processing_order().partition(|m| m.is_bye());

    let mut courts: Vec<Timeline> = (0..params.num_courts).map(|_| Timeline::default()).collect();
    let mut player_lines: HashMap<PlayerId, Timeline> = HashMap::new();
    let empty = Timeline::default();

    let mut booked_end = 0;
    for slot in booked {
        let iv = Interval {
            start: minutes_floor(params.start_time, slot.start_time),
            end: minutes_ceil(params.start_time, slot.end_time),
        };
        let court_idx = (slot.court.0 as usize).checked_sub(1);
        if let Some(court) = court_idx.and_then(|i| courts.get_mut(i)) {
            court.insert(iv);
        }
        for p in slot.players() {
            player_lines.entry(p).or_default().insert(iv);
        }
        booked_end = booked_end.max(iv.end);
    }
    if !booked.is_empty() {
        log::debug!("{} booked slot(s) end by +{}min", booked.len(), booked_end);
    }

    let horizon = params
        .horizon_minutes
        .unwrap_or_else(|| default_horizon(playable.len(), duration, rest, booked_end))
        .min(MAX_HORIZON_MINUTES);
    at(params.start_time, horizon)?;

    let mut out = Schedule {
        byes: byes.iter().map(|m| m.id).collect(),
        ..Schedule::default()
    };

    let mut floor = 0;
    let mut latest_end = 0;
    let mut current_round = None;

    for m in playable {
        if params.enforce_round_order && current_round != Some(m.round) {
            floor = latest_end;
            current_round = Some(m.round);
        }

        let lines: Vec<&Timeline> = m
            .players()
            .map(|p| player_lines.get(&p).unwrap_or(&empty))
            .collect();

        let Some((idx, start)) = find_slot(&courts, &lines, floor, duration, rest, horizon) else {
            log::warn!(
                "match {} (round {}) has no free slot within {} minutes",
                m.id,
                m.round,
                horizon
            );
            out.unscheduled.push(m.id);
            continue;
        };

        let iv = Interval {
            start,
            end: start + duration,
        };
        courts[idx].insert(iv);
        for p in m.players() {
            player_lines.entry(p).or_default().insert(iv);
        }
        latest_end = latest_end.max(iv.end);

        let court = CourtId(u32::try_from(idx + 1).unwrap_or(u32::MAX));
        log::debug!(
            "match {} (round {}) -> {} at +{}min",
            m.id,
            m.round,
            court,
            start
        );
        out.assignments.push(ScheduleAssignment {
            match_id: m.id,
            round: m.round,
            court,
            start_time: at(params.start_time, iv.start)?,
            end_time: at(params.start_time, iv.end)?,
            player1: m.player1,
            player2: m.player2,
        });
    }

    log::info!(
        "{} on {} court(s), {} bye(s)",
        out.summary(),
        params.num_courts,
        out.byes.len()
    );
    Ok(out)
}

/// Schedule every pending (or previously scheduled) match of an event and store
/// the result on the matches. Rest time comes from the event configuration.
///
/// Played matches and other events' matches keep their slots; new placements go
/// around them on shared courts and respect rest after a player's earlier matches.
pub fn schedule_event(tournament: &mut Tournament, request: &ScheduleRequest) -> Result<Schedule> {
    let min_rest = tournament.event(request.event_id)?.min_rest;
    let params = request.params(min_rest);
    validate_params(&params)?;
    let bracket = tournament.schedulable_bracket(request.event_id);
    if bracket.is_empty() {
        return Err(TournamentError::NoPendingMatches(request.event_id));
    }
    let booked = tournament.booked_slots(request.event_id);
    let result = schedule_around(&bracket, &params, &booked)?;
    tournament.apply_schedule(&result)?;
    Ok(result)
}
