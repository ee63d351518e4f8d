//! Knockout fixtures: round-1 draw with byes, and drawing the next round from winners.

use crate::logic::scoring::match_winner;
use crate::models::{
    ClubId, EventId, GameMatch, MatchStatus, Opponent, Player, PlayerId, Result, Tournament,
    TournamentError,
};
use rand::seq::SliceRandom;
use rand::Rng;

/// Arrange players for the draw: players who are their club's only entrant first
/// (they receive the byes), then everyone else with clubs interleaved so club-mates
/// are kept apart in round 1 where possible.
fn arrange_by_club(players: Vec<Player>) -> Vec<Player> {
    let mut groups: Vec<(ClubId, Vec<Player>)> = Vec::new();
    for p in players {
        match groups.iter_mut().find(|(club, _)| *club == p.club_id) {
            Some((_, members)) => members.push(p),
            None => groups.push((p.club_id, vec![p])),
        }
    }

    let (solo, mut shared): (Vec<_>, Vec<_>) =
        groups.into_iter().partition(|(_, members)| members.len() == 1);
    let mut arranged: Vec<Player> = solo.into_iter().flat_map(|(_, m)| m).collect();

    // Largest club first so its members are spread over the most pairs.
    shared.sort_by_key(|(_, members)| std::cmp::Reverse(members.len()));
    let mut queues: Vec<std::vec::IntoIter<Player>> =
        shared.into_iter().map(|(_, m)| m.into_iter()).collect();
    loop {
        let before = arranged.len();
        for q in &mut queues {
            arranged.extend(q.next());
        }
        if arranged.len() == before {
            break;
        }
    }
    arranged
}

/// Draw round 1 of a knockout event.
///
/// The bracket is padded to the next power of two; the padding becomes byes
/// (walkovers into round 2). Entrants are shuffled with `rng` before arranging.
pub fn generate_knockout_fixtures<R: Rng + ?Sized>(
    players: &[Player],
    event_id: EventId,
    rng: &mut R,
) -> Result<Vec<GameMatch>> {
    let n = players.len();
    if n < 2 {
        return Err(TournamentError::NotEnoughPlayers(n));
    }
    let byes_needed = n.next_power_of_two() - n;

    let mut shuffled = players.to_vec();
    shuffled.shuffle(rng);
    let arranged = arrange_by_club(shuffled);

    let (with_byes, playing) = arranged.split_at(byes_needed);
    let mut matches: Vec<GameMatch> = with_byes
        .iter()
        .map(|p| GameMatch::new(event_id, 1, p.id, Opponent::Bye))
        .collect();
    matches.extend(
        playing
            .chunks_exact(2)
            .map(|pair| GameMatch::new(event_id, 1, pair[0].id, Opponent::Player(pair[1].id))),
    );
    Ok(matches)
}

/// Draw round 1 for an event from its registered players and store the matches.
pub fn generate_fixtures<R: Rng + ?Sized>(
    tournament: &mut Tournament,
    event_id: EventId,
    rng: &mut R,
) -> Result<Vec<GameMatch>> {
    tournament.event(event_id)?;
    if tournament.event_matches(event_id).next().is_some() {
        return Err(TournamentError::FixturesAlreadyGenerated(event_id));
    }
    let players: Vec<Player> = tournament.players_in_event(event_id).cloned().collect();
    let matches = generate_knockout_fixtures(&players, event_id, rng)?;
    log::info!(
        "event {}: drew {} round-1 matches for {} players ({} byes)",
        event_id,
        matches.len(),
        players.len(),
        matches.iter().filter(|m| m.is_bye()).count()
    );
    tournament.matches.extend(matches.iter().cloned());
    Ok(matches)
}

/// Winners of a finished round: completed matches in bracket order, then bye players.
/// `None` while any match of the round is still open.
fn round_winners(tournament: &Tournament, event_id: EventId, round: u32) -> Option<Vec<PlayerId>> {
    let mut winners = Vec::new();
    let mut walkovers = Vec::new();
    for m in tournament.event_matches(event_id).filter(|m| m.round == round) {
        match m.status {
            MatchStatus::Bye => walkovers.push(m.player1),
            MatchStatus::Completed => {
                let score = tournament.scores.get(&m.id)?;
                winners.push(match_winner(m, score)?);
            }
            MatchStatus::Pending | MatchStatus::Scheduled => return None,
        }
    }
    winners.extend(walkovers);
    Some(winners)
}

/// If the latest round of an event is finished, draw the next one from its winners.
///
/// Returns the number of the new round, or `None` when the round is still open or
/// only the champion is left. An odd winner out gets a bye in the new round.
pub fn advance_round(tournament: &mut Tournament, event_id: EventId) -> Result<Option<u32>> {
    let Some(round) = tournament.bracket(event_id).last_round() else {
        return Ok(None);
    };
    let Some(winners) = round_winners(tournament, event_id, round) else {
        return Ok(None);
    };
    if winners.len() < 2 {
        return Ok(None);
    }

    let next = round + 1;
    let mut pairs = winners.chunks_exact(2);
    let mut matches: Vec<GameMatch> = pairs
        .by_ref()
        .map(|pair| GameMatch::new(event_id, next, pair[0], Opponent::Player(pair[1])))
        .collect();
    if let [odd] = pairs.remainder() {
        matches.push(GameMatch::new(event_id, next, *odd, Opponent::Bye));
    }
    log::info!(
        "event {}: round {} complete, drew {} match(es) for round {}",
        event_id,
        round,
        matches.len(),
        next
    );
    tournament.matches.extend(matches);
    Ok(Some(next))
}

/// Winner of the event once the final has been played.
pub fn champion(tournament: &Tournament, event_id: EventId) -> Option<PlayerId> {
    let round = tournament.bracket(event_id).last_round()?;
    match round_winners(tournament, event_id, round)?.as_slice() {
        [winner] => Some(*winner),
        _ => None,
    }
}
