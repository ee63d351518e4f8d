//! Integration tests for score entry and leaderboards.

use chrono::{Duration, TimeZone, Utc};
use tournament_manager::{
    latest_leaderboard, leaderboard, update_score, EventId, GameMatch, MatchId, MatchStatus,
    NewEvent, NewPlayer, Opponent, PlayerId, Score, Tournament, TournamentError,
};

/// One event, four players ("Ann", "Bob", "Cat", "Dan"), two round-1 matches: Ann-Bob, Cat-Dan.
fn setup() -> (Tournament, EventId, Vec<PlayerId>, Vec<MatchId>) {
    let mut t = Tournament::new();
    let now = Utc.with_ymd_and_hms(2025, 6, 1, 8, 0, 0).unwrap();
    let event_id = t
        .add_event(
            NewEvent {
                name: "Veterans".into(),
                kind: Default::default(),
                min_rest: 10,
            },
            now,
        )
        .unwrap()
        .id;
    let club_id = t.add_club("Riverside").unwrap().id;
    let players: Vec<PlayerId> = ["Ann", "Bob", "Cat", "Dan"]
        .iter()
        .map(|name| {
            t.add_player(NewPlayer {
                name: name.to_string(),
                age: 40,
                phone: "555-0199".into(),
                club_id,
                event_ids: vec![event_id],
            })
            .unwrap()
            .id
        })
        .collect();
    let m1 = GameMatch::new(event_id, 1, players[0], Opponent::Player(players[1]));
    let m2 = GameMatch::new(event_id, 1, players[2], Opponent::Player(players[3]));
    let ids = vec![m1.id, m2.id];
    t.matches.extend([m1, m2]);
    (t, event_id, players, ids)
}

fn score(match_id: MatchId, p1: u32, p2: u32) -> Score {
    Score {
        match_id,
        player1_score: p1,
        player2_score: p2,
    }
}

#[test]
fn score_completes_match_and_names_winner() {
    let (mut t, _, players, ids) = setup();
    let outcome = update_score(&mut t, score(ids[0], 1, 3)).unwrap();

    assert_eq!(outcome.winner_id, players[1]);
    assert!(outcome.match_completed);
    assert_eq!(outcome.next_round, None);
    assert_eq!(t.get_match(ids[0]).unwrap().status, MatchStatus::Completed);
    assert_eq!(t.scores[&ids[0]].player2_score, 3);
}

#[test]
fn last_result_of_round_draws_next_round() {
    let (mut t, event_id, players, ids) = setup();
    update_score(&mut t, score(ids[0], 3, 0)).unwrap();
    let outcome = update_score(&mut t, score(ids[1], 0, 3)).unwrap();

    assert_eq!(outcome.next_round, Some(2));
    let final_match = t.event_matches(event_id).find(|m| m.round == 2).unwrap();
    assert_eq!(final_match.player1, players[0]);
    assert_eq!(final_match.player2, Opponent::Player(players[3]));
}

#[test]
fn level_scores_and_byes_are_rejected() {
    let (mut t, event_id, players, ids) = setup();
    assert!(matches!(
        update_score(&mut t, score(ids[0], 2, 2)),
        Err(TournamentError::InvalidScore(_))
    ));
    assert_eq!(t.get_match(ids[0]).unwrap().status, MatchStatus::Pending);

    let walkover = GameMatch::new(event_id, 1, players[0], Opponent::Bye);
    let walkover_id = walkover.id;
    t.matches.push(walkover);
    assert!(matches!(
        update_score(&mut t, score(walkover_id, 1, 0)),
        Err(TournamentError::InvalidScore(_))
    ));

    assert!(matches!(
        update_score(&mut t, score(uuid::Uuid::nil(), 1, 0)),
        Err(TournamentError::MatchNotFound(_))
    ));
}

#[test]
fn result_can_be_corrected_until_next_round_is_drawn() {
    let (mut t, _, players, ids) = setup();
    update_score(&mut t, score(ids[0], 3, 1)).unwrap();
    let corrected = update_score(&mut t, score(ids[0], 1, 3)).unwrap();
    assert_eq!(corrected.winner_id, players[1]);

    update_score(&mut t, score(ids[1], 3, 1)).unwrap();
    assert!(matches!(
        update_score(&mut t, score(ids[0], 3, 1)),
        Err(TournamentError::InvalidScore(_))
    ));
}

#[test]
fn leaderboard_counts_wins_sets_and_points() {
    let (mut t, event_id, players, ids) = setup();
    update_score(&mut t, score(ids[0], 3, 1)).unwrap();
    update_score(&mut t, score(ids[1], 3, 2)).unwrap();

    let board = leaderboard(&t, event_id).unwrap();
    assert_eq!(board.event_name, "Veterans");
    let rows = &board.leaderboard;
    assert_eq!(rows.len(), 4);

    // Ann and Cat both won with 3 sets; Ann first by name.
    assert_eq!(rows[0].player_id, players[0]);
    assert_eq!(rows[0].player_name, "Ann");
    assert_eq!((rows[0].wins, rows[0].losses), (1, 0));
    assert_eq!((rows[0].sets_won, rows[0].sets_lost), (3, 1));
    assert_eq!(rows[0].points, 6);
    assert_eq!(rows[1].player_id, players[2]);

    // Dan (2 sets) ranks above Bob (1 set).
    assert_eq!(rows[2].player_id, players[3]);
    assert_eq!(rows[2].points, 2);
    assert_eq!(rows[3].player_id, players[1]);
    assert_eq!(rows[3].losses, 1);
}

#[test]
fn leaderboard_ignores_unplayed_matches() {
    let (t, event_id, _, _) = setup();
    assert!(leaderboard(&t, event_id).unwrap().leaderboard.is_empty());
    assert!(matches!(
        leaderboard(&t, uuid::Uuid::nil()),
        Err(TournamentError::EventNotFound(_))
    ));
}

#[test]
fn latest_leaderboard_uses_newest_event() {
    let (mut t, _, _, _) = setup();
    let later = Utc.with_ymd_and_hms(2025, 7, 1, 8, 0, 0).unwrap() + Duration::hours(1);
    let newest = t
        .add_event(
            NewEvent {
                name: "Juniors".into(),
                kind: Default::default(),
                min_rest: 5,
            },
            later,
        )
        .unwrap()
        .id;
    let board = latest_leaderboard(&t).unwrap();
    assert_eq!(board.event_id, newest);
    assert_eq!(board.event_name, "Juniors");

    assert!(latest_leaderboard(&Tournament::new()).is_err());
}
