//! Score entry and leaderboards.

use crate::logic::fixtures::advance_round;
use crate::models::{
    EventId, GameMatch, MatchStatus, PlayerId, Result, Score, Tournament, TournamentError,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Points for a match win; each set won adds one more.
const POINTS_PER_WIN: u32 = 3;

/// Result of recording a score.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ScoreOutcome {
    pub winner_id: PlayerId,
    pub match_completed: bool,
    /// Round drawn as a consequence of this result, if the round was the last open one.
    pub next_round: Option<u32>,
}

/// Winner by sets. `None` for byes and level scores.
pub fn match_winner(m: &GameMatch, score: &Score) -> Option<PlayerId> {
    let player2 = m.player2.player()?;
    match score.player1_score.cmp(&score.player2_score) {
        std::cmp::Ordering::Greater => Some(m.player1),
        std::cmp::Ordering::Less => Some(player2),
        std::cmp::Ordering::Equal => None,
    }
}

/// Record (or correct) the score of a match, complete it, and draw the next round
/// when this was the last open match of the latest round.
///
/// A result can only be corrected while the next round has not been drawn yet.
pub fn update_score(tournament: &mut Tournament, score: Score) -> Result<ScoreOutcome> {
    let m = tournament.get_match(score.match_id)?;
    if m.is_bye() {
        return Err(TournamentError::InvalidScore("a bye has no score".into()));
    }
    let winner_id = match_winner(m, &score).ok_or_else(|| {
        TournamentError::InvalidScore("scores are level; a knockout match needs a winner".into())
    })?;
    let (event_id, round, was_completed) = (m.event_id, m.round, m.status == MatchStatus::Completed);
    if was_completed && tournament.event_matches(event_id).any(|x| x.round > round) {
        return Err(TournamentError::InvalidScore(format!(
            "round {} has already been drawn from this result",
            round + 1
        )));
    }

    tournament.scores.insert(score.match_id, score);
    tournament.get_match_mut(score.match_id)?.status = MatchStatus::Completed;
    log::info!(
        "match {}: {}-{}, winner {}",
        score.match_id,
        score.player1_score,
        score.player2_score,
        winner_id
    );

    let next_round = advance_round(tournament, event_id)?;
    Ok(ScoreOutcome {
        winner_id,
        match_completed: true,
        next_round,
    })
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub player_id: PlayerId,
    pub player_name: String,
    pub wins: u32,
    pub losses: u32,
    pub sets_won: u32,
    pub sets_lost: u32,
    pub points: u32,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Leaderboard {
    pub event_id: EventId,
    pub event_name: String,
    pub leaderboard: Vec<LeaderboardEntry>,
}

/// Standings of an event from its completed, scored matches.
///
/// Sorted by wins, then sets won, then points (all descending); name and id break
/// remaining ties so the order is stable.
pub fn leaderboard(tournament: &Tournament, event_id: EventId) -> Result<Leaderboard> {
    let event = tournament.event(event_id)?;
    let mut stats: HashMap<PlayerId, LeaderboardEntry> = HashMap::new();

    for m in tournament
        .event_matches(event_id)
        .filter(|m| m.status == MatchStatus::Completed)
    {
        let (Some(score), Some(p2)) = (tournament.scores.get(&m.id), m.player2.player()) else {
            continue;
        };
        let Some(winner) = match_winner(m, score) else {
            continue;
        };
        for (pid, won, lost) in [
            (m.player1, score.player1_score, score.player2_score),
            (p2, score.player2_score, score.player1_score),
        ] {
            let entry = stats.entry(pid).or_insert_with(|| LeaderboardEntry {
                player_id: pid,
                player_name: tournament
                    .player(pid)
                    .map_or_else(|_| "Unknown".to_string(), |p| p.name.clone()),
                ..LeaderboardEntry::default()
            });
            if pid == winner {
                entry.wins += 1;
            } else {
                entry.losses += 1;
            }
            entry.sets_won += won;
            entry.sets_lost += lost;
            entry.points = entry.wins * POINTS_PER_WIN + entry.sets_won;
        }
    }

    let mut entries: Vec<_> = stats.into_values().collect();
    entries.sort_by(|a, b| {
        (b.wins, b.sets_won, b.points)
            .cmp(&(a.wins, a.sets_won, a.points))
            .then_with(|| a.player_name.cmp(&b.player_name))
            .then_with(|| a.player_id.cmp(&b.player_id))
    });

    Ok(Leaderboard {
        event_id,
        event_name: event.name.clone(),
        leaderboard: entries,
    })
}

/// Standings of the most recently created event.
pub fn latest_leaderboard(tournament: &Tournament) -> Result<Leaderboard> {
    let event = tournament
        .latest_event()
        .ok_or_else(|| TournamentError::InvalidRequest("no events found".into()))?;
    leaderboard(tournament, event.id)
}
