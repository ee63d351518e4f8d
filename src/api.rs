//! REST API over the tournament logic. All routes live under `/api` and share one
//! in-memory [`Tournament`] behind a `RwLock`; errors are `{ "error": message }`.

use crate::config::ServerConfig;
use crate::logic::{
    generate_fixtures, import_players_csv, issue_match_code, latest_leaderboard, leaderboard,
    schedule_event, update_score, verify_match_code,
};
use crate::models::{
    CourtId, EventId, MatchId, NewEvent, NewPlayer, ScheduleRequest, Score, Tournament,
    TournamentError,
};
use actix_web::{
    get, post,
    web::{self, Data, Json, Path, Query},
    HttpResponse, Responder,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::RwLock;

/// Shared tournament state.
pub type AppState = Data<RwLock<Tournament>>;

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct CreateClubBody {
    name: String,
}

#[derive(Deserialize)]
struct FixtureBody {
    event_id: EventId,
}

#[derive(Deserialize)]
struct MatchCodeBody {
    match_id: MatchId,
    assigned_umpire: String,
}

#[derive(Deserialize)]
struct VerifyCodeBody {
    match_id: MatchId,
    code: String,
}

/// Optional `?event_id=` filter.
#[derive(Deserialize)]
struct EventQuery {
    event_id: Option<EventId>,
}

/// Path segment: event id (e.g. /api/events/{event_id})
#[derive(Deserialize)]
struct EventPath {
    event_id: EventId,
}

fn error_response(e: &TournamentError) -> HttpResponse {
    let body = serde_json::json!({ "error": e.to_string() });
    if e.is_not_found() {
        HttpResponse::NotFound().json(body)
    } else {
        HttpResponse::BadRequest().json(body)
    }
}

fn lock_error() -> HttpResponse {
    HttpResponse::InternalServerError().body("lock error")
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "tournament-manager",
    })
}

#[post("/api/clubs")]
async fn api_create_club(state: AppState, body: Json<CreateClubBody>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match g.add_club(&body.name) {
        Ok(club) => HttpResponse::Ok().json(serde_json::json!({
            "message": "Club created successfully",
            "club_id": club.id,
            "data": club,
        })),
        Err(e) => error_response(&e),
    }
}

#[get("/api/clubs")]
async fn api_list_clubs(state: AppState) -> HttpResponse {
    match state.read() {
        Ok(g) => HttpResponse::Ok().json(&g.clubs),
        Err(_) => lock_error(),
    }
}

#[post("/api/events")]
async fn api_create_event(state: AppState, body: Json<NewEvent>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match g.add_event(body.into_inner(), Utc::now()) {
        Ok(event) => HttpResponse::Ok().json(event),
        Err(e) => error_response(&e),
    }
}

#[get("/api/events")]
async fn api_list_events(state: AppState) -> HttpResponse {
    match state.read() {
        Ok(g) => HttpResponse::Ok().json(&g.events),
        Err(_) => lock_error(),
    }
}

#[get("/api/events/{event_id}")]
async fn api_get_event(state: AppState, path: Path<EventPath>) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match g.event(path.event_id) {
        Ok(event) => HttpResponse::Ok().json(event),
        Err(e) => error_response(&e),
    }
}

/// Register one player (club must exist; name unique per event).
#[post("/api/players")]
async fn api_create_player(state: AppState, body: Json<NewPlayer>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match g.add_player(body.into_inner()) {
        Ok(player) => HttpResponse::Ok().json(serde_json::json!({
            "message": "Player created successfully",
            "player_id": player.id,
        })),
        Err(e) => error_response(&e),
    }
}

#[get("/api/players")]
async fn api_list_players(state: AppState, query: Query<EventQuery>) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let players: Vec<_> = match query.event_id {
        Some(event_id) => g.players_in_event(event_id).collect(),
        None => g.players.iter().collect(),
    };
    HttpResponse::Ok().json(players)
}

/// Bulk registration; the request body is the raw CSV text.
#[post("/api/players/upload-csv")]
async fn api_upload_csv(state: AppState, body: String) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match import_players_csv(&mut g, body.as_bytes()) {
        Ok(report) => HttpResponse::Ok().json(report),
        Err(e) => error_response(&e),
    }
}

#[post("/api/generate-fixtures")]
async fn api_generate_fixtures(state: AppState, body: Json<FixtureBody>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let total_players = g.players_in_event(body.event_id).count();
    match generate_fixtures(&mut g, body.event_id, &mut rand::thread_rng()) {
        Ok(matches) => HttpResponse::Ok().json(serde_json::json!({
            "message": "Fixtures generated successfully",
            "total_players": total_players,
            "total_matches": matches.len(),
            "matches": matches,
        })),
        Err(e) => error_response(&e),
    }
}

/// Matches of an event grouped by round.
#[get("/api/fixtures/{event_id}")]
async fn api_get_fixtures(state: AppState, path: Path<EventPath>) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    if let Err(e) = g.event(path.event_id) {
        return error_response(&e);
    }
    HttpResponse::Ok().json(serde_json::json!({
        "event_id": path.event_id,
        "fixtures": g.bracket(path.event_id),
    }))
}

/// Schedule every open match of an event and store the assignments.
#[post("/api/schedule-matches")]
async fn api_schedule_matches(
    state: AppState,
    config: Data<ServerConfig>,
    body: Json<ScheduleRequest>,
) -> HttpResponse {
    let request = body
        .into_inner()
        .or_defaults(config.default_num_courts, config.default_match_duration_minutes);
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match schedule_event(&mut g, &request) {
        Ok(schedule) => HttpResponse::Ok().json(serde_json::json!({
            "message": schedule.summary(),
            "total_matches": schedule.total_matches(),
            "scheduled": schedule.assignments,
            "unscheduled": schedule.unscheduled,
            "byes": schedule.byes,
        })),
        Err(e) => error_response(&e),
    }
}

/// One court's matches ordered by start time, e.g. /api/schedule/Court-2?event_id=...
#[get("/api/schedule/{court_id}")]
async fn api_court_schedule(
    state: AppState,
    path: Path<String>,
    query: Query<EventQuery>,
) -> HttpResponse {
    let court: CourtId = match path.parse() {
        Ok(c) => c,
        Err(e) => return error_response(&e),
    };
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    HttpResponse::Ok().json(serde_json::json!({
        "court_id": court.to_string(),
        "matches": g.court_schedule(court, query.event_id),
    }))
}

#[post("/api/match-code/generate")]
async fn api_generate_match_code(
    state: AppState,
    config: Data<ServerConfig>,
    body: Json<MatchCodeBody>,
) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match issue_match_code(
        &mut g,
        body.match_id,
        &body.assigned_umpire,
        Utc::now(),
        config.match_code_ttl(),
        &mut rand::thread_rng(),
    ) {
        Ok(issued) => {
            let message = if issued.newly_issued {
                "Match code generated successfully"
            } else {
                "Match code already exists"
            };
            HttpResponse::Ok().json(serde_json::json!({
                "message": message,
                "code": issued.code.code,
                "match_id": issued.code.match_id,
                "expires_at": issued.code.expires_at,
            }))
        }
        Err(e) => error_response(&e),
    }
}

#[post("/api/match-code/verify")]
async fn api_verify_match_code(state: AppState, body: Json<VerifyCodeBody>) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match verify_match_code(&g, body.match_id, &body.code, Utc::now()) {
        Ok(code) => HttpResponse::Ok().json(serde_json::json!({
            "valid": true,
            "match_id": code.match_id,
            "assigned_umpire": code.assigned_umpire,
        })),
        Err(e) => error_response(&e),
    }
}

/// Record a result; drawing the next round happens here once a round is complete.
#[post("/api/update-score")]
async fn api_update_score(state: AppState, body: Json<Score>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match update_score(&mut g, body.into_inner()) {
        Ok(outcome) => HttpResponse::Ok().json(serde_json::json!({
            "message": "Score updated successfully",
            "winner_id": outcome.winner_id,
            "match_completed": outcome.match_completed,
            "next_round": outcome.next_round,
        })),
        Err(e) => error_response(&e),
    }
}

#[get("/api/leaderboard")]
async fn api_latest_leaderboard(state: AppState) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match latest_leaderboard(&g) {
        Ok(board) => HttpResponse::Ok().json(board),
        Err(e) => error_response(&e),
    }
}

#[get("/api/leaderboard/{event_id}")]
async fn api_leaderboard(state: AppState, path: Path<EventPath>) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match leaderboard(&g, path.event_id) {
        Ok(board) => HttpResponse::Ok().json(board),
        Err(e) => error_response(&e),
    }
}

/// Register every route. The app must also carry an [`AppState`] and a `Data<ServerConfig>`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(api_health)
        .service(api_create_club)
        .service(api_list_clubs)
        .service(api_create_event)
        .service(api_list_events)
        .service(api_get_event)
        .service(api_create_player)
        .service(api_upload_csv)
        .service(api_list_players)
        .service(api_generate_fixtures)
        .service(api_get_fixtures)
        .service(api_schedule_matches)
        .service(api_court_schedule)
        .service(api_generate_match_code)
        .service(api_verify_match_code)
        .service(api_update_score)
        .service(api_latest_leaderboard)
        .service(api_leaderboard);
}
