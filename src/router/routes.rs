//! Route wiring for the HTTP surface described in §6.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use tower_http::trace::TraceLayer;

use crate::domain::state::ScheduleData;
use crate::error::Error;

use super::dto::{
    CalculateRoundRequest, CalculateRoundResponse, ConfirmSetupRequest, CreateTournamentMatchRequest,
    CreateTournamentMatchResponse, Envelope, HealthResponse, MatchHistoryEntry, MatchHistoryRow,
    MatchStateResponse, ResolveDrawRequest, RoundHistoryRow, SelectTiebreakerSongRequest,
};
use super::{ws, AppState};

pub fn build(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/api/tournament_matches", post(create_tournament_match))
        .route("/api/tournament_matches/:id/confirm_setup", put(confirm_setup))
        .route("/api/tournament_matches/:id/start_live", post(start_live))
        .route("/api/live-match/:id/state", get(get_state))
        .route("/api/live-match/:id/websocket", get(ws::subscribe))
        .route("/api/live-match/:id/calculate_round", post(calculate_round))
        .route("/api/live-match/:id/next_round", post(next_round))
        .route("/api/live-match/:id/resolve_draw", post(resolve_draw))
        .route("/api/live-match/:id/select_tiebreaker_song", post(select_tiebreaker_song))
        .route("/api/live-match/:id/archive", post(archive))
        .route("/api/match_history", get(match_history))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Wraps a handler's `Result<T, Error>` into the `{success, data?, error?}` envelope.
fn respond<T: serde::Serialize>(result: Result<T, Error>) -> Response {
    match result {
        Ok(data) => (StatusCode::OK, Json(Envelope::ok(data))).into_response(),
        Err(err) => (err.status_code(), Json(Envelope::err(&err))).into_response(),
    }
}

async fn healthz() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

async fn create_tournament_match(
    State(state): State<AppState>,
    Json(req): Json<CreateTournamentMatchRequest>,
) -> Response {
    respond(state.create_tournament_match(req).await.map(|tournament_match_id| {
        CreateTournamentMatchResponse { tournament_match_id }
    }))
}

async fn confirm_setup(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<ConfirmSetupRequest>,
) -> Response {
    respond(state.confirm_setup(id, req).await)
}

async fn start_live(State(state): State<AppState>, Path(id): Path<i64>) -> Response {
    let result: Result<_, Error> = async {
        let schedule: ScheduleData = state.load_schedule(id).await?;
        let handle = state.registry.get_or_spawn(id);
        let snapshot = handle.initialize_from_schedule(schedule).await?;
        Ok(MatchStateResponse(snapshot))
    }
    .await;
    respond(result)
}

async fn get_state(State(state): State<AppState>, Path(id): Path<i64>) -> Response {
    let result: Result<_, Error> = async {
        let handle = state.registry.get_or_spawn(id);
        Ok(MatchStateResponse(handle.get_state().await?))
    }
    .await;
    respond(result)
}

async fn calculate_round(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<CalculateRoundRequest>,
) -> Response {
    let result: Result<_, Error> = async {
        let handle = state.registry.get(id)?;
        let round_summary = handle.calculate_round(req.into()).await?;
        Ok(CalculateRoundResponse { round_summary })
    }
    .await;
    respond(result)
}

async fn next_round(State(state): State<AppState>, Path(id): Path<i64>) -> Response {
    let result: Result<_, Error> = async {
        let handle = state.registry.get(id)?;
        Ok(MatchStateResponse(handle.next_round().await?))
    }
    .await;
    respond(result)
}

async fn resolve_draw(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<ResolveDrawRequest>,
) -> Response {
    let result: Result<_, Error> = async {
        let winner = req.team_id()?;
        let handle = state.registry.get(id)?;
        Ok(MatchStateResponse(handle.resolve_draw(winner).await?))
    }
    .await;
    respond(result)
}

async fn select_tiebreaker_song(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<SelectTiebreakerSongRequest>,
) -> Response {
    let result: Result<_, Error> = async {
        let song = state.catalog.resolve_tiebreaker_song(req.song_id, req.selected_difficulty).await?;
        let handle = state.registry.get(id)?;
        Ok(MatchStateResponse(handle.select_tiebreaker_song(song).await?))
    }
    .await;
    respond(result)
}

async fn archive(State(state): State<AppState>, Path(id): Path<i64>) -> Response {
    let result: Result<_, Error> = async {
        let handle = state.registry.get(id)?;
        Ok(MatchStateResponse(handle.archive().await?))
    }
    .await;
    respond(result)
}

/// Joins the archived per-round and final-match records for presentation
/// (§4.E): one query for the finished matches, one for their rounds, stitched
/// together in memory since each match has a variable number of rounds.
async fn match_history(State(state): State<AppState>) -> Response {
    let result = match_history_entries(&state).await;
    respond(result)
}

async fn match_history_entries(state: &AppState) -> Result<Vec<MatchHistoryEntry>, Error> {
    let matches: Vec<MatchHistoryRow> = sqlx::query_as(
        r#"
        SELECT t.id AS tournament_match_id, t.round_name, t.status,
               t.final_score_team1, t.final_score_team2, t.winner_team_id
        FROM tournament_matches t
        WHERE t.status IN ('completed', 'archived')
        ORDER BY t.updated_at DESC
        "#,
    )
    .fetch_all(&state.db)
    .await?;

    let mut entries = Vec::with_capacity(matches.len());
    for tournament_match in matches {
        let rounds: Vec<RoundHistoryRow> = sqlx::query_as(
            r#"
            SELECT round_number_in_match, song_id, selected_difficulty,
                   team1_percentage, team2_percentage,
                   team1_damage_dealt, team2_damage_dealt,
                   team1_health_after, team2_health_after,
                   is_tiebreaker_song
            FROM match_rounds_history
            WHERE tournament_match_id = $1
            ORDER BY round_number_in_match ASC
            "#,
        )
        .bind(tournament_match.tournament_match_id)
        .fetch_all(&state.db)
        .await?;
        entries.push(MatchHistoryEntry { tournament_match, rounds });
    }
    Ok(entries)
}
