//! HTTP/websocket front door (§4.E). Validates and translates requests into
//! calls on a [`crate::registry::MatchRegistry`] actor handle; never mutates
//! match state directly.

pub mod catalog;
pub mod dto;
mod routes;
mod ws;

use std::sync::Arc;

use sqlx::types::Json as SqlxJson;
use sqlx::PgPool;

use crate::domain::member::Member;
use crate::domain::song::MatchSong;
use crate::domain::state::ScheduleData;
use crate::error::{Error, Result};
use crate::registry::MatchRegistry;

use catalog::CatalogClient;
use dto::{ConfirmSetupRequest, CreateTournamentMatchRequest};

pub use routes::build;

#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<MatchRegistry>,
    pub db: PgPool,
    pub catalog: CatalogClient,
}

impl AppState {
    pub fn new(registry: MatchRegistry, db: PgPool, catalog: CatalogClient) -> Self {
        Self { registry: Arc::new(registry), db, catalog }
    }

    pub async fn create_tournament_match(&self, req: CreateTournamentMatchRequest) -> Result<i64> {
        if req.team1_id == req.team2_id {
            return Err(Error::Validation("team1_id and team2_id must differ".into()));
        }
        let row: (i64,) = sqlx::query_as(
            r#"
            INSERT INTO tournament_matches (round_name, team1_id, team2_id, scheduled_time, status)
            VALUES ($1, $2, $3, $4, 'scheduled')
            RETURNING id
            "#,
        )
        .bind(&req.round_name)
        .bind(req.team1_id)
        .bind(req.team2_id)
        .bind(&req.scheduled_time)
        .fetch_one(&self.db)
        .await?;
        Ok(row.0)
    }

    pub async fn confirm_setup(&self, tournament_match_id: i64, req: ConfirmSetupRequest) -> Result<()> {
        if req.team1_player_order.is_empty() || req.team2_player_order.is_empty() {
            return Err(Error::Validation("player orders must not be empty".into()));
        }
        if req.match_song_list.is_empty() {
            return Err(Error::Validation("match_song_list must not be empty".into()));
        }
        sqlx::query(
            r#"
            UPDATE tournament_matches
            SET team1_name = $2,
                team2_name = $3,
                team1_roster_json = $4,
                team2_roster_json = $5,
                team1_player_order_json = $6,
                team2_player_order_json = $7,
                match_song_list_json = $8,
                status = 'confirmed',
                updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(tournament_match_id)
        .bind(&req.team1_name)
        .bind(&req.team2_name)
        .bind(SqlxJson(&req.team1_roster))
        .bind(SqlxJson(&req.team2_roster))
        .bind(SqlxJson(&req.team1_player_order))
        .bind(SqlxJson(&req.team2_player_order))
        .bind(SqlxJson(&req.match_song_list))
        .execute(&self.db)
        .await?;
        Ok(())
    }

    /// Load everything `InitializeFromSchedule` needs for `tournament_match_id`
    /// from the row `confirm_setup` wrote.
    pub async fn load_schedule(&self, tournament_match_id: i64) -> Result<ScheduleData> {
        let row: ScheduleRow = sqlx::query_as(
            r#"
            SELECT team1_id, team1_name, team1_roster_json, team1_player_order_json,
                   team2_id, team2_name, team2_roster_json, team2_player_order_json,
                   match_song_list_json
            FROM tournament_matches
            WHERE id = $1
            "#,
        )
        .bind(tournament_match_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| Error::Validation(format!("tournament_match {tournament_match_id} has no confirmed setup")))?;

        Ok(ScheduleData {
            tournament_match_id,
            team_a_id: row.team1_id,
            team_a_name: row.team1_name,
            team_a_roster: row.team1_roster_json.0,
            team_a_player_order: row.team1_player_order_json.0,
            team_b_id: row.team2_id,
            team_b_name: row.team2_name,
            team_b_roster: row.team2_roster_json.0,
            team_b_player_order: row.team2_player_order_json.0,
            match_song_list: row.match_song_list_json.0,
        })
    }
}

#[derive(sqlx::FromRow)]
struct ScheduleRow {
    team1_id: i64,
    team1_name: String,
    team1_roster_json: SqlxJson<Vec<Member>>,
    team1_player_order_json: SqlxJson<Vec<i64>>,
    team2_id: i64,
    team2_name: String,
    team2_roster_json: SqlxJson<Vec<Member>>,
    team2_player_order_json: SqlxJson<Vec<i64>>,
    match_song_list_json: SqlxJson<Vec<MatchSong>>,
}
