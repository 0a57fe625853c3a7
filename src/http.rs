//! JSON REST API over the tournament core.
//!
//! The acting user is identified by the `X-User-Id` header. Every error kind maps to its own
//! status code and the body is always `{"error": message, "kind": kind}`.

use crate::logic::{accounts, disputes, matches, rankings, scores, tournaments, validation};
use crate::models::{
    EvidenceUpload, NewMatch, NewTournament, NewUser, Role, ScoreId, TennisError,
    TournamentChanges, User, UserId,
};
use crate::store::Store;
use actix_web::{
    delete, get, post, put,
    web::{self, Data, Json, Path},
    HttpRequest, HttpResponse, Responder,
};
use serde::{Deserialize, Serialize};
use std::sync::RwLock;
use uuid::Uuid;

/// Shared application state: the whole store behind one lock.
pub type AppState = Data<RwLock<Store>>;

/// Header carrying the acting user's id.
pub const USER_HEADER: &str = "X-User-Id";

pub fn new_state(store: Store) -> AppState {
    Data::new(RwLock::new(store))
}

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct IdPath {
    id: Uuid,
}

#[derive(Deserialize)]
struct TournamentPlayerPath {
    id: Uuid,
    player_id: UserId,
}

#[derive(Deserialize)]
struct HeadToHeadPath {
    player1_id: UserId,
    player2_id: UserId,
}

#[derive(Deserialize)]
struct PlayerBody {
    player_id: UserId,
}

#[derive(Deserialize)]
struct RefereeBody {
    referee_id: UserId,
}

#[derive(Deserialize)]
struct AssignPlayersBody {
    player1_id: UserId,
    player2_id: UserId,
}

#[derive(Deserialize)]
struct SubmitScoreBody {
    match_id: Uuid,
    set_scores: serde_json::Value,
}

#[derive(Deserialize)]
struct UpdateScoreBody {
    set_scores: serde_json::Value,
}

#[derive(Deserialize)]
struct CreateDisputeBody {
    match_id: Uuid,
    reason: String,
}

#[derive(Deserialize)]
struct EvidenceBody {
    #[serde(default)]
    description: String,
    #[serde(default)]
    file: Option<EvidenceUpload>,
}

#[derive(Deserialize)]
struct ResolveDisputeBody {
    #[serde(default)]
    resolution_notes: String,
    #[serde(default)]
    final_score_id: Option<ScoreId>,
    #[serde(default)]
    winner_id: Option<UserId>,
}

#[derive(Deserialize)]
struct RoleQuery {
    role: Role,
}

/// Status code for each error kind.
pub fn error_response(e: &TennisError) -> HttpResponse {
    let mut builder = match e {
        TennisError::Validation(_) => HttpResponse::BadRequest(),
        TennisError::PermissionDenied(_) => HttpResponse::Forbidden(),
        TennisError::NotFound(_) => HttpResponse::NotFound(),
        TennisError::InvalidState(_) => HttpResponse::Conflict(),
        TennisError::Dispute(_) => HttpResponse::Conflict(),
    };
    builder.json(serde_json::json!({ "error": e.to_string(), "kind": e.kind() }))
}

fn respond<T: Serialize>(result: Result<T, TennisError>) -> HttpResponse {
    match result {
        Ok(body) => HttpResponse::Ok().json(body),
        Err(e) => {
            log::debug!("Request rejected: {} ({})", e, e.kind());
            error_response(&e)
        }
    }
}

fn lock_error() -> HttpResponse {
    HttpResponse::InternalServerError().body("lock error")
}

/// Resolve the acting user from the request header.
fn acting_user(req: &HttpRequest, store: &Store) -> Result<User, TennisError> {
    let id = req
        .headers()
        .get(USER_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| Uuid::parse_str(v.trim()).ok())
        .ok_or_else(|| TennisError::permission_denied("Authentication required."))?;
    store
        .users
        .find(id)
        .cloned()
        .ok_or_else(|| TennisError::permission_denied("Unknown user."))
}

/// Run a read-only operation.
fn read<T, F>(state: &AppState, f: F) -> HttpResponse
where
    T: Serialize,
    F: FnOnce(&Store) -> Result<T, TennisError>,
{
    match state.read() {
        Ok(g) => respond(f(&*g)),
        Err(_) => lock_error(),
    }
}

/// Run an operation on behalf of the acting user.
fn act<T, F>(state: &AppState, req: &HttpRequest, f: F) -> HttpResponse
where
    T: Serialize,
    F: FnOnce(&mut Store, &User) -> Result<T, TennisError>,
{
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let result = acting_user(req, &g).and_then(|actor| f(&mut *g, &actor));
    respond(result)
}

/// Like [`act`], answering 204 on success.
fn act_no_content<F>(state: &AppState, req: &HttpRequest, f: F) -> HttpResponse
where
    F: FnOnce(&mut Store, &User) -> Result<(), TennisError>,
{
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match acting_user(req, &g).and_then(|actor| f(&mut *g, &actor)) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(e) => error_response(&e),
    }
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "tennis-tournament-web",
    })
}

// ---- accounts ----

#[post("/api/users")]
async fn api_register(state: AppState, body: Json<NewUser>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    respond(accounts::register_user(&mut *g, body.into_inner()))
}

#[get("/api/users/me")]
async fn api_me(state: AppState, req: HttpRequest) -> HttpResponse {
    act(&state, &req, |_, actor| Ok(actor.clone()))
}

#[get("/api/users")]
async fn api_users_by_role(state: AppState, query: web::Query<RoleQuery>) -> HttpResponse {
    read(&state, |s| Ok(accounts::get_users_by_role(s, query.role)))
}

// ---- tournaments ----

#[post("/api/tournaments")]
async fn api_create_tournament(
    state: AppState,
    req: HttpRequest,
    body: Json<NewTournament>,
) -> HttpResponse {
    act(&state, &req, |s, actor| {
        tournaments::create_tournament(s, body.into_inner(), actor)
    })
}

#[get("/api/tournaments")]
async fn api_my_tournaments(state: AppState, req: HttpRequest) -> HttpResponse {
    act(&state, &req, |s, actor| {
        Ok(tournaments::get_user_tournaments(s, actor))
    })
}

#[get("/api/tournaments/{id}")]
async fn api_get_tournament(state: AppState, path: Path<IdPath>) -> HttpResponse {
    read(&state, |s| tournaments::get_tournament(s, path.id))
}

#[put("/api/tournaments/{id}")]
async fn api_update_tournament(
    state: AppState,
    req: HttpRequest,
    path: Path<IdPath>,
    body: Json<TournamentChanges>,
) -> HttpResponse {
    act(&state, &req, |s, actor| {
        tournaments::update_tournament(s, path.id, body.into_inner(), actor)
    })
}

#[delete("/api/tournaments/{id}")]
async fn api_delete_tournament(
    state: AppState,
    req: HttpRequest,
    path: Path<IdPath>,
) -> HttpResponse {
    act_no_content(&state, &req, |s, actor| {
        tournaments::delete_tournament(s, path.id, actor)
    })
}

#[post("/api/tournaments/{id}/players")]
async fn api_add_player(
    state: AppState,
    req: HttpRequest,
    path: Path<IdPath>,
    body: Json<PlayerBody>,
) -> HttpResponse {
    act(&state, &req, |s, actor| {
        tournaments::add_player(s, path.id, body.player_id, actor)
    })
}

#[delete("/api/tournaments/{id}/players/{player_id}")]
async fn api_remove_player(
    state: AppState,
    req: HttpRequest,
    path: Path<TournamentPlayerPath>,
) -> HttpResponse {
    act(&state, &req, |s, actor| {
        tournaments::remove_player(s, path.id, path.player_id, actor)
    })
}

#[post("/api/tournaments/{id}/referees")]
async fn api_add_referee(
    state: AppState,
    req: HttpRequest,
    path: Path<IdPath>,
    body: Json<RefereeBody>,
) -> HttpResponse {
    act(&state, &req, |s, actor| {
        tournaments::add_referee(s, path.id, body.referee_id, actor)
    })
}

#[post("/api/tournaments/{id}/open-registration")]
async fn api_open_registration(
    state: AppState,
    req: HttpRequest,
    path: Path<IdPath>,
) -> HttpResponse {
    act(&state, &req, |s, actor| {
        tournaments::open_registration(s, path.id, actor)
    })
}

#[post("/api/tournaments/{id}/start")]
async fn api_start_tournament(
    state: AppState,
    req: HttpRequest,
    path: Path<IdPath>,
) -> HttpResponse {
    act(&state, &req, |s, actor| {
        tournaments::start_tournament(s, path.id, actor)
    })
}

#[post("/api/tournaments/{id}/complete")]
async fn api_complete_tournament(
    state: AppState,
    req: HttpRequest,
    path: Path<IdPath>,
) -> HttpResponse {
    act(&state, &req, |s, actor| {
        tournaments::complete_tournament(s, path.id, actor)
    })
}

#[post("/api/tournaments/{id}/cancel")]
async fn api_cancel_tournament(
    state: AppState,
    req: HttpRequest,
    path: Path<IdPath>,
) -> HttpResponse {
    act(&state, &req, |s, actor| {
        tournaments::cancel_tournament(s, path.id, actor)
    })
}

#[get("/api/tournaments/{id}/matches")]
async fn api_tournament_matches(state: AppState, path: Path<IdPath>) -> HttpResponse {
    read(&state, |s| tournaments::get_tournament_matches(s, path.id))
}

#[get("/api/tournaments/{id}/leaderboard")]
async fn api_tournament_leaderboard(state: AppState, path: Path<IdPath>) -> HttpResponse {
    read(&state, |s| {
        s.tournaments.get(path.id)?;
        Ok(rankings::get_tournament_leaderboard(s, path.id))
    })
}

#[post("/api/tournaments/{id}/rankings/initialize")]
async fn api_initialize_rankings(
    state: AppState,
    req: HttpRequest,
    path: Path<IdPath>,
) -> HttpResponse {
    act(&state, &req, |s, actor| {
        require_organizer(actor)?;
        rankings::initialize_tournament_rankings(s, path.id)?;
        Ok(rankings::get_tournament_leaderboard(s, path.id))
    })
}

#[post("/api/tournaments/{id}/rankings/recalculate")]
async fn api_recalculate_rankings(
    state: AppState,
    req: HttpRequest,
    path: Path<IdPath>,
) -> HttpResponse {
    act(&state, &req, |s, actor| {
        require_organizer(actor)?;
        s.tournaments.get(path.id)?;
        rankings::recalculate_positions(s, path.id);
        Ok(rankings::get_tournament_leaderboard(s, path.id))
    })
}

fn require_organizer(actor: &User) -> Result<(), TennisError> {
    match actor.role() {
        Role::Organizer => Ok(()),
        Role::Referee | Role::Player | Role::Spectator => Err(TennisError::permission_denied(
            "Only organizers can manage rankings.",
        )),
    }
}

// ---- matches ----

#[post("/api/matches")]
async fn api_create_match(state: AppState, req: HttpRequest, body: Json<NewMatch>) -> HttpResponse {
    act(&state, &req, |s, actor| {
        matches::create_match(s, body.into_inner(), actor)
    })
}

#[get("/api/matches")]
async fn api_my_matches(state: AppState, req: HttpRequest) -> HttpResponse {
    act(&state, &req, |s, actor| Ok(matches::get_user_matches(s, actor)))
}

#[get("/api/matches/{id}")]
async fn api_get_match(state: AppState, path: Path<IdPath>) -> HttpResponse {
    read(&state, |s| matches::get_match(s, path.id))
}

#[put("/api/matches/{id}/players")]
async fn api_assign_players(
    state: AppState,
    req: HttpRequest,
    path: Path<IdPath>,
    body: Json<AssignPlayersBody>,
) -> HttpResponse {
    act(&state, &req, |s, actor| {
        matches::assign_players(s, path.id, body.player1_id, body.player2_id, actor)
    })
}

#[put("/api/matches/{id}/referee")]
async fn api_assign_referee(
    state: AppState,
    req: HttpRequest,
    path: Path<IdPath>,
    body: Json<RefereeBody>,
) -> HttpResponse {
    act(&state, &req, |s, actor| {
        matches::assign_referee(s, path.id, body.referee_id, actor)
    })
}

#[post("/api/matches/{id}/start")]
async fn api_start_match(state: AppState, req: HttpRequest, path: Path<IdPath>) -> HttpResponse {
    act(&state, &req, |s, actor| matches::start_match(s, path.id, actor))
}

#[post("/api/matches/{id}/cancel")]
async fn api_cancel_match(state: AppState, req: HttpRequest, path: Path<IdPath>) -> HttpResponse {
    act(&state, &req, |s, actor| matches::cancel_match(s, path.id, actor))
}

#[get("/api/matches/{id}/scores")]
async fn api_match_scores(state: AppState, path: Path<IdPath>) -> HttpResponse {
    read(&state, |s| scores::get_match_scores(s, path.id))
}

// ---- scores ----

#[post("/api/scores")]
async fn api_submit_score(
    state: AppState,
    req: HttpRequest,
    body: Json<SubmitScoreBody>,
) -> HttpResponse {
    act(&state, &req, |s, actor| {
        let sets = validation::parse_set_scores(&body.set_scores)?;
        scores::submit_score(s, body.match_id, sets, actor)
    })
}

#[post("/api/scores/{id}/confirm")]
async fn api_confirm_score(state: AppState, req: HttpRequest, path: Path<IdPath>) -> HttpResponse {
    act(&state, &req, |s, actor| scores::confirm_score(s, path.id, actor))
}

#[put("/api/scores/{id}")]
async fn api_update_score(
    state: AppState,
    req: HttpRequest,
    path: Path<IdPath>,
    body: Json<UpdateScoreBody>,
) -> HttpResponse {
    act(&state, &req, |s, actor| {
        let sets = validation::parse_set_scores(&body.set_scores)?;
        scores::update_score(s, path.id, sets, actor)
    })
}

#[delete("/api/scores/{id}")]
async fn api_delete_score(state: AppState, req: HttpRequest, path: Path<IdPath>) -> HttpResponse {
    act_no_content(&state, &req, |s, actor| scores::delete_score(s, path.id, actor))
}

// ---- disputes ----

#[post("/api/disputes")]
async fn api_create_dispute(
    state: AppState,
    req: HttpRequest,
    body: Json<CreateDisputeBody>,
) -> HttpResponse {
    act(&state, &req, |s, actor| {
        disputes::create_dispute(s, body.match_id, body.reason.clone(), actor)
    })
}

#[get("/api/disputes")]
async fn api_open_disputes(state: AppState) -> HttpResponse {
    read(&state, |s| Ok(disputes::get_open_disputes(s)))
}

#[get("/api/disputes/{id}")]
async fn api_get_dispute(state: AppState, path: Path<IdPath>) -> HttpResponse {
    read(&state, |s| disputes::get_dispute(s, path.id))
}

#[post("/api/disputes/{id}/evidence")]
async fn api_add_evidence(
    state: AppState,
    req: HttpRequest,
    path: Path<IdPath>,
    body: Json<EvidenceBody>,
) -> HttpResponse {
    let body = body.into_inner();
    act(&state, &req, |s, actor| {
        disputes::add_evidence(s, path.id, body.file, body.description, actor)
    })
}

#[get("/api/disputes/{id}/evidence")]
async fn api_dispute_evidence(state: AppState, path: Path<IdPath>) -> HttpResponse {
    read(&state, |s| disputes::get_dispute_evidence(s, path.id))
}

#[post("/api/disputes/{id}/review")]
async fn api_review_dispute(state: AppState, req: HttpRequest, path: Path<IdPath>) -> HttpResponse {
    act(&state, &req, |s, actor| {
        disputes::mark_under_review(s, path.id, actor)
    })
}

#[post("/api/disputes/{id}/resolve")]
async fn api_resolve_dispute(
    state: AppState,
    req: HttpRequest,
    path: Path<IdPath>,
    body: Json<ResolveDisputeBody>,
) -> HttpResponse {
    let body = body.into_inner();
    act(&state, &req, |s, actor| {
        disputes::resolve_dispute(
            s,
            path.id,
            body.resolution_notes,
            actor,
            body.final_score_id,
            body.winner_id,
        )
    })
}

// ---- rankings ----

#[get("/api/rankings/global")]
async fn api_global_leaderboard(state: AppState) -> HttpResponse {
    read(&state, |s| Ok(rankings::get_global_leaderboard(s)))
}

#[get("/api/players/{id}/rankings")]
async fn api_player_rankings(state: AppState, path: Path<IdPath>) -> HttpResponse {
    read(&state, |s| {
        s.users.get(path.id)?;
        Ok(rankings::get_player_rankings(s, path.id))
    })
}

#[get("/api/head-to-head/{player1_id}/{player2_id}")]
async fn api_head_to_head(state: AppState, path: Path<HeadToHeadPath>) -> HttpResponse {
    read(&state, |s| {
        rankings::get_head_to_head(s, path.player1_id, path.player2_id)
    })
}

/// Register every API route.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(api_health)
        .service(api_register)
        .service(api_me)
        .service(api_users_by_role)
        .service(api_create_tournament)
        .service(api_my_tournaments)
        .service(api_get_tournament)
        .service(api_update_tournament)
        .service(api_delete_tournament)
        .service(api_add_player)
        .service(api_remove_player)
        .service(api_add_referee)
        .service(api_open_registration)
        .service(api_start_tournament)
        .service(api_complete_tournament)
        .service(api_cancel_tournament)
        .service(api_tournament_matches)
        .service(api_tournament_leaderboard)
        .service(api_initialize_rankings)
        .service(api_recalculate_rankings)
        .service(api_create_match)
        .service(api_my_matches)
        .service(api_get_match)
        .service(api_assign_players)
        .service(api_assign_referee)
        .service(api_start_match)
        .service(api_cancel_match)
        .service(api_match_scores)
        .service(api_submit_score)
        .service(api_confirm_score)
        .service(api_update_score)
        .service(api_delete_score)
        .service(api_create_dispute)
        .service(api_open_disputes)
        .service(api_get_dispute)
        .service(api_add_evidence)
        .service(api_dispute_evidence)
        .service(api_review_dispute)
        .service(api_resolve_dispute)
        .service(api_global_leaderboard)
        .service(api_player_rankings)
        .service(api_head_to_head);
}
