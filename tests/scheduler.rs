//! Integration tests for court scheduling: hard constraints, tie-breaks and edge cases.

use chrono::{DateTime, Duration, TimeZone, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tournament_manager::{
    schedule, Bracket, CourtId, GameMatch, Opponent, PlayerId, Schedule, ScheduleParams,
    TournamentError,
};
use uuid::Uuid;

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap()
}

fn at(minutes: i64) -> DateTime<Utc> {
    t0() + Duration::minutes(minutes)
}

fn player(n: u128) -> PlayerId {
    Uuid::from_u128(n)
}

fn game(round: u32, p1: u128, p2: u128) -> GameMatch {
    GameMatch::new(Uuid::nil(), round, player(p1), Opponent::Player(player(p2)))
}

fn bye(round: u32, p1: u128) -> GameMatch {
    GameMatch::new(Uuid::nil(), round, player(p1), Opponent::Bye)
}

/// Checks every hard constraint of a schedule.
fn assert_valid(s: &Schedule, params: &ScheduleParams) {
    let duration = Duration::minutes(params.match_duration_minutes);
    let rest = Duration::minutes(params.min_rest_minutes);
    for (i, a) in s.assignments.iter().enumerate() {
        assert!(a.start_time >= params.start_time, "match starts before request start");
        assert_eq!(a.end_time - a.start_time, duration);
        assert!(a.court.0 >= 1 && a.court.0 <= params.num_courts);
        for b in &s.assignments[i + 1..] {
            if a.court == b.court {
                assert!(
                    a.end_time <= b.start_time || b.end_time <= a.start_time,
                    "court overlap on {}",
                    a.court
                );
            }
            let shares_player = b.involves(a.player1)
                || a.player2.player().is_some_and(|p| b.involves(p));
            if shares_player {
                assert!(
                    a.end_time + rest <= b.start_time || b.end_time + rest <= a.start_time,
                    "rest violated between {} and {}",
                    a.match_id,
                    b.match_id
                );
            }
        }
    }
}

fn random_bracket(rng: &mut StdRng) -> Bracket {
    let players = rng.gen_range(2..14u128);
    let rounds = rng.gen_range(1..4u32);
    let mut bracket = Bracket::new();
    for round in 1..=rounds {
        for _ in 0..rng.gen_range(1..8) {
            let p1 = rng.gen_range(0..players);
            if rng.gen_bool(0.1) {
                bracket.push(bye(round, p1));
                continue;
            }
            let mut p2 = rng.gen_range(0..players);
            if p2 == p1 {
                p2 = (p1 + 1) % players;
            }
            bracket.push(game(round, p1, p2));
        }
    }
    bracket
}

#[test]
fn four_players_two_courts_start_together() {
    let bracket = Bracket::from_matches([game(1, 1, 2), game(1, 3, 4)]);
    let params = ScheduleParams::new(2, 30, t0(), 10);
    let s = schedule(&bracket, &params).unwrap();

    assert!(s.is_complete());
    assert_eq!(s.assignments.len(), 2);
    assert_eq!(s.assignments[0].court, CourtId(1));
    assert_eq!(s.assignments[1].court, CourtId(2));
    for a in &s.assignments {
        assert_eq!(a.start_time, t0());
        assert_eq!(a.end_time, at(30));
    }
}

#[test]
fn shared_players_wait_for_rest() {
    let bracket = Bracket::from_matches([game(1, 1, 2), game(2, 1, 2)]);
    let params = ScheduleParams::new(1, 30, t0(), 10);
    let s = schedule(&bracket, &params).unwrap();

    assert_eq!(s.assignments[0].start_time, t0());
    assert_eq!(s.assignments[1].start_time, at(40));
    assert_valid(&s, &params);
}

#[test]
fn single_court_runs_matches_back_to_back_in_order() {
    let matches = [game(1, 1, 2), game(1, 3, 4), game(1, 5, 6)];
    let ids: Vec<_> = matches.iter().map(|m| m.id).collect();
    let params = ScheduleParams::new(1, 30, t0(), 10);
    let s = schedule(&Bracket::from_matches(matches), &params).unwrap();

    let got: Vec<_> = s
        .assignments
        .iter()
        .map(|a| (a.match_id, a.court, a.start_time, a.end_time))
        .collect();
    assert_eq!(
        got,
        vec![
            (ids[0], CourtId(1), at(0), at(30)),
            (ids[1], CourtId(1), at(30), at(60)),
            (ids[2], CourtId(1), at(60), at(90)),
        ]
    );
}

#[test]
fn zero_courts_is_invalid() {
    let bracket = Bracket::from_matches([game(1, 1, 2)]);
    let params = ScheduleParams::new(0, 30, t0(), 10);
    assert!(matches!(
        schedule(&bracket, &params),
        Err(TournamentError::InvalidRequest(_))
    ));
}

#[test]
fn malformed_requests_are_rejected() {
    let bracket = Bracket::from_matches([game(1, 1, 2)]);
    let bad = [
        ScheduleParams::new(2, 0, t0(), 10),
        ScheduleParams::new(2, -30, t0(), 10),
        ScheduleParams::new(2, 30, t0(), -1),
        ScheduleParams::new(2, 30, t0(), 10).with_horizon(0),
    ];
    for params in bad {
        assert!(
            matches!(schedule(&bracket, &params), Err(TournamentError::InvalidRequest(_))),
            "{params:?} should be rejected"
        );
    }

    let params = ScheduleParams::new(2, 30, t0(), 10);
    assert!(matches!(
        schedule(&Bracket::new(), &params),
        Err(TournamentError::InvalidRequest(_))
    ));
    assert!(matches!(
        schedule(&Bracket::from_matches([game(1, 7, 7)]), &params),
        Err(TournamentError::InvalidRequest(_))
    ));

    let m = game(1, 1, 2);
    let duplicated = Bracket::from_matches([m.clone(), m]);
    assert!(matches!(
        schedule(&duplicated, &params),
        Err(TournamentError::InvalidRequest(_))
    ));
}

#[test]
fn byes_take_no_court_or_time() {
    let b1 = bye(1, 1);
    let b2 = bye(1, 2);
    let bye_ids = vec![b1.id, b2.id];
    let bracket = Bracket::from_matches([b1, game(1, 3, 4), b2]);
    let s = schedule(&bracket, &ScheduleParams::new(1, 30, t0(), 10)).unwrap();

    assert_eq!(s.byes, bye_ids);
    assert_eq!(s.assignments.len(), 1);
    assert_eq!(s.assignments[0].start_time, t0());
    assert!(s.assignments.iter().all(|a| !bye_ids.contains(&a.match_id)));
    assert_eq!(s.total_matches(), 1);
}

#[test]
fn zero_rest_allows_back_to_back() {
    let bracket = Bracket::from_matches([game(1, 1, 2), game(2, 1, 3)]);
    let params = ScheduleParams::new(2, 30, t0(), 0);
    let s = schedule(&bracket, &params).unwrap();

    // Court 2 is free at T, but player 1 is not; both courts tie at T+30.
    assert_eq!(s.assignments[1].start_time, at(30));
    assert_eq!(s.assignments[1].court, CourtId(1));
    assert_valid(&s, &params);
}

#[test]
fn rest_applies_across_courts() {
    let bracket = Bracket::from_matches([game(1, 1, 2), game(1, 3, 4), game(2, 1, 3)]);
    let params = ScheduleParams::new(2, 30, t0(), 10);
    let s = schedule(&bracket, &params).unwrap();

    assert_eq!(s.assignments[2].start_time, at(40));
    assert_eq!(s.assignments[2].court, CourtId(1));
    assert_valid(&s, &params);
}

#[test]
fn idle_gap_is_backfilled_by_later_match() {
    // Player 1 needs an hour of rest, so the court would sit idle from T+30 to T+90.
    let bracket = Bracket::from_matches([game(1, 1, 2), game(1, 1, 3), game(1, 4, 5)]);
    let params = ScheduleParams::new(1, 30, t0(), 60);
    let s = schedule(&bracket, &params).unwrap();

    assert_eq!(s.assignments[1].start_time, at(90));
    assert_eq!(s.assignments[2].start_time, at(30));
    assert_eq!(s.makespan(t0()), Duration::minutes(120));
    assert_valid(&s, &params);
}

#[test]
fn earlier_rounds_are_offered_courts_first() {
    let late = game(2, 5, 6);
    let early = game(1, 1, 2);
    let (late_id, early_id) = (late.id, early.id);
    let s = schedule(
        &Bracket::from_matches([late, early]),
        &ScheduleParams::new(1, 30, t0(), 10),
    )
    .unwrap();

    assert_eq!(s.assignment(early_id).unwrap().start_time, t0());
    assert_eq!(s.assignment(late_id).unwrap().start_time, at(30));
}

#[test]
fn round_order_is_soft_unless_enforced() {
    let bracket = Bracket::from_matches([game(1, 1, 2), game(2, 3, 4)]);

    let soft = schedule(&bracket, &ScheduleParams::new(2, 30, t0(), 10)).unwrap();
    assert!(soft.assignments.iter().all(|a| a.start_time == t0()));

    let hard = schedule(&bracket, &ScheduleParams::new(2, 30, t0(), 10).with_round_order()).unwrap();
    assert_eq!(hard.assignments[0].start_time, t0());
    assert_eq!(hard.assignments[1].start_time, at(30));
    assert_eq!(hard.assignments[1].court, CourtId(1));
}

#[test]
fn matches_past_horizon_are_reported_not_failed() {
    let bracket = Bracket::from_matches([game(1, 1, 2), game(1, 3, 4), game(1, 5, 6)]);
    let last = bracket.round(1).unwrap()[2].id;
    let params = ScheduleParams::new(1, 30, t0(), 10).with_horizon(60);
    let s = schedule(&bracket, &params).unwrap();

    assert_eq!(s.assignments.len(), 2);
    assert_eq!(s.unscheduled, vec![last]);
    assert!(!s.is_complete());
    assert_eq!(s.summary(), "Scheduled 2 of 3 matches");
}

#[test]
fn default_horizon_places_every_match() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..50 {
        let bracket = random_bracket(&mut rng);
        let courts = rng.gen_range(1..5);
        let params = ScheduleParams::new(courts, 30, t0(), rng.gen_range(0..45));
        let s = schedule(&bracket, &params).unwrap();
        assert!(s.is_complete(), "{}", s.summary());
    }
}

#[test]
fn random_brackets_never_break_constraints() {
    let mut rng = StdRng::seed_from_u64(2024);
    for _ in 0..200 {
        let bracket = random_bracket(&mut rng);
        let mut params = ScheduleParams::new(
            rng.gen_range(1..5),
            rng.gen_range(15..121),
            t0(),
            rng.gen_range(0..30),
        );
        if rng.gen_bool(0.3) {
            params = params.with_horizon(rng.gen_range(30..300));
        }
        if rng.gen_bool(0.3) {
            params = params.with_round_order();
        }
        let s = schedule(&bracket, &params).unwrap();
        assert_valid(&s, &params);
        let non_byes = bracket.processing_order().filter(|m| !m.is_bye()).count();
        assert_eq!(s.total_matches(), non_byes);
    }
}

#[test]
fn same_input_gives_identical_output() {
    let mut rng = StdRng::seed_from_u64(99);
    let bracket = random_bracket(&mut rng);
    let params = ScheduleParams::new(3, 45, t0(), 10);

    let first = serde_json::to_string(&schedule(&bracket, &params).unwrap()).unwrap();
    let second = serde_json::to_string(&schedule(&bracket, &params).unwrap()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn by_court_groups_and_sorts() {
    let bracket = Bracket::from_matches([game(1, 1, 2), game(1, 3, 4), game(1, 5, 6)]);
    let s = schedule(&bracket, &ScheduleParams::new(2, 30, t0(), 10)).unwrap();
    let courts = s.by_court();

    assert_eq!(courts.len(), 2);
    assert_eq!(courts[&CourtId(1)].len(), 2);
    assert_eq!(courts[&CourtId(2)].len(), 1);
    assert!(courts[&CourtId(1)][0].start_time < courts[&CourtId(1)][1].start_time);
    assert_eq!(CourtId(2).to_string(), "Court-2");
    assert_eq!("court-2".parse::<CourtId>().unwrap(), CourtId(2));
    assert!("Court-0".parse::<CourtId>().is_err());
}
