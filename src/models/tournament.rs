//! Tournament: the in-memory store of clubs, events, players, matches, scores and match codes.

use crate::models::bracket::Bracket;
use crate::models::error::{Result, TournamentError};
use crate::models::event::{Event, EventId, NewEvent};
use crate::models::game::{GameMatch, MatchCode, MatchId, MatchStatus, Score};
use crate::models::player::{Club, ClubId, NewPlayer, Player, PlayerId};
use crate::models::schedule::{BookedSlot, CourtId, Schedule};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Everything the tournament desk knows. Matches are kept in insertion order,
/// which is also the within-round order brackets are built from.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Tournament {
    pub clubs: Vec<Club>,
    pub events: Vec<Event>,
    pub players: Vec<Player>,
    pub matches: Vec<GameMatch>,
    pub scores: HashMap<MatchId, Score>,
    pub match_codes: HashMap<MatchId, MatchCode>,
}

impl Tournament {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a club. Names are unique (case-insensitive).
    pub fn add_club(&mut self, name: &str) -> Result<&Club> {
        let name = name.trim();
        if name.is_empty() {
            return Err(TournamentError::InvalidRequest("club name must not be empty".into()));
        }
        if self.clubs.iter().any(|c| c.name.eq_ignore_ascii_case(name)) {
            return Err(TournamentError::DuplicateClubName(name.to_string()));
        }
        self.clubs.push(Club::new(name));
        Ok(&self.clubs[self.clubs.len() - 1])
    }

    pub fn club(&self, id: ClubId) -> Result<&Club> {
        self.clubs
            .iter()
            .find(|c| c.id == id)
            .ok_or(TournamentError::ClubNotFound(id))
    }

    /// Create an event. Rest time must be non-negative.
    pub fn add_event(&mut self, input: NewEvent, now: DateTime<Utc>) -> Result<&Event> {
        if input.name.trim().is_empty() {
            return Err(TournamentError::InvalidRequest("event name must not be empty".into()));
        }
        if input.min_rest < 0 {
            return Err(TournamentError::InvalidRequest(format!(
                "min_rest must be >= 0 (got {})",
                input.min_rest
            )));
        }
        self.events.push(Event::new(input, now));
        Ok(&self.events[self.events.len() - 1])
    }

    pub fn event(&self, id: EventId) -> Result<&Event> {
        self.events
            .iter()
            .find(|e| e.id == id)
            .ok_or(TournamentError::EventNotFound(id))
    }

    /// Case-insensitive lookup by event name (used by CSV import).
    pub fn event_by_name(&self, name: &str) -> Option<&Event> {
        self.events
            .iter()
            .find(|e| e.name.eq_ignore_ascii_case(name.trim()))
    }

    /// Most recently created event; the latest-inserted wins a timestamp tie.
    pub fn latest_event(&self) -> Option<&Event> {
        self.events.iter().max_by_key(|e| e.created_at)
    }

    /// Register a player. The club and every event must exist, and the name must
    /// not already be taken inside any of the player's events.
    pub fn add_player(&mut self, input: NewPlayer) -> Result<&Player> {
        if input.name.trim().is_empty() {
            return Err(TournamentError::InvalidRequest("player name must not be empty".into()));
        }
        self.club(input.club_id)?;
        for &event_id in &input.event_ids {
            self.event(event_id)?;
            if self
                .players_in_event(event_id)
                .any(|p| p.has_name(&input.name))
            {
                return Err(TournamentError::DuplicatePlayerInEvent {
                    name: input.name.trim().to_string(),
                    event_id,
                });
            }
        }
        self.players.push(Player::new(input));
        Ok(&self.players[self.players.len() - 1])
    }

    pub fn player(&self, id: PlayerId) -> Result<&Player> {
        self.players
            .iter()
            .find(|p| p.id == id)
            .ok_or(TournamentError::PlayerNotFound(id))
    }

    pub fn players_in_event(&self, event_id: EventId) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(move |p| p.is_entered_in(event_id))
    }

    pub fn event_matches(&self, event_id: EventId) -> impl Iterator<Item = &GameMatch> {
        self.matches.iter().filter(move |m| m.event_id == event_id)
    }

    pub fn get_match(&self, id: MatchId) -> Result<&GameMatch> {
        self.matches
            .iter()
            .find(|m| m.id == id)
            .ok_or(TournamentError::MatchNotFound(id))
    }

    pub fn get_match_mut(&mut self, id: MatchId) -> Result<&mut GameMatch> {
        self.matches
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or(TournamentError::MatchNotFound(id))
    }

    /// Full bracket of an event, every status included.
    pub fn bracket(&self, event_id: EventId) -> Bracket {
        Bracket::from_matches(self.event_matches(event_id).cloned())
    }

    /// Matches of an event that still need a court: pending, or scheduled by an earlier run.
    pub fn schedulable_bracket(&self, event_id: EventId) -> Bracket {
        Bracket::from_matches(
            self.event_matches(event_id)
                .filter(|m| matches!(m.status, MatchStatus::Pending | MatchStatus::Scheduled))
                .cloned(),
        )
    }

    /// Slots that stay put while `event_id` is rescheduled: every timed match except
    /// that event's pending and scheduled ones (played matches, other events).
    pub fn booked_slots(&self, event_id: EventId) -> Vec<BookedSlot> {
        self.matches
            .iter()
            .filter(|m| {
                !(m.event_id == event_id
                    && matches!(m.status, MatchStatus::Pending | MatchStatus::Scheduled))
            })
            .filter_map(|m| {
                Some(BookedSlot {
                    match_id: m.id,
                    court: m.court?,
                    start_time: m.start_time?,
                    end_time: m.end_time?,
                    player1: m.player1,
                    player2: m.player2,
                })
            })
            .collect()
    }

    /// Write a schedule back onto the stored matches. Matches left unscheduled lose
    /// any court/time from a previous run.
    pub fn apply_schedule(&mut self, schedule: &Schedule) -> Result<()> {
        for a in &schedule.assignments {
            let m = self.get_match_mut(a.match_id)?;
            m.court = Some(a.court);
            m.start_time = Some(a.start_time);
            m.end_time = Some(a.end_time);
            m.status = MatchStatus::Scheduled;
        }
        for &id in &schedule.unscheduled {
            self.get_match_mut(id)?.clear_schedule();
        }
        Ok(())
    }

    /// Matches on one court ordered by start time, optionally limited to one event.
    pub fn court_schedule(&self, court: CourtId, event_id: Option<EventId>) -> Vec<&GameMatch> {
        let mut list: Vec<_> = self
            .matches
            .iter()
            .filter(|m| m.court == Some(court))
            .filter(|m| event_id.map_or(true, |e| m.event_id == e))
            .collect();
        list.sort_by_key(|m| m.start_time);
        list
    }
}
