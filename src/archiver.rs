//! History Archiver (§4.E): idempotent upserts of finished rounds into
//! `match_rounds_history`, and final-outcome writes onto the owning
//! `tournament_matches` row.
//!
//! Every write here is a natural-key upsert keyed on
//! `(tournament_match_id, round_number_in_match)` for a round, so a retried
//! archive call after a dropped connection can never duplicate a row.

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::song::MatchSong;
use crate::domain::state::{MatchStatus, RoundSummary};
use crate::error::Result;

#[derive(Clone)]
pub struct HistoryArchiver {
    pool: PgPool,
}

impl HistoryArchiver {
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await?;
        Ok(Self { pool })
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Upsert one completed round's summary, row shape matching §6's
    /// `match_rounds_history` schema exactly.
    pub async fn archive_round(
        &self,
        match_actor_id: Uuid,
        tournament_match_id: i64,
        song: &MatchSong,
        summary: &RoundSummary,
    ) -> Result<()> {
        let round_summary_json = serde_json::to_value(summary)?;
        sqlx::query(
            r#"
            INSERT INTO match_rounds_history
                (tournament_match_id, match_actor_id, round_number_in_match, song_id,
                 selected_difficulty, picker_team_id, picker_member_id,
                 team1_member_id, team2_member_id,
                 team1_percentage, team2_percentage,
                 team1_damage_dealt, team2_damage_dealt,
                 team1_health_change, team2_health_change,
                 team1_health_before, team2_health_before,
                 team1_health_after, team2_health_after,
                 team1_mirror_triggered, team2_mirror_triggered,
                 team1_effect_value, team2_effect_value,
                 is_tiebreaker_song, recorded_at, round_summary_json)
            VALUES
                ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17,
                 $18, $19, $20, $21, $22, $23, $24, now(), $25)
            ON CONFLICT (tournament_match_id, round_number_in_match)
            DO UPDATE SET
                song_id = EXCLUDED.song_id,
                selected_difficulty = EXCLUDED.selected_difficulty,
                picker_team_id = EXCLUDED.picker_team_id,
                picker_member_id = EXCLUDED.picker_member_id,
                team1_member_id = EXCLUDED.team1_member_id,
                team2_member_id = EXCLUDED.team2_member_id,
                team1_percentage = EXCLUDED.team1_percentage,
                team2_percentage = EXCLUDED.team2_percentage,
                team1_damage_dealt = EXCLUDED.team1_damage_dealt,
                team2_damage_dealt = EXCLUDED.team2_damage_dealt,
                team1_health_change = EXCLUDED.team1_health_change,
                team2_health_change = EXCLUDED.team2_health_change,
                team1_health_before = EXCLUDED.team1_health_before,
                team2_health_before = EXCLUDED.team2_health_before,
                team1_health_after = EXCLUDED.team1_health_after,
                team2_health_after = EXCLUDED.team2_health_after,
                team1_mirror_triggered = EXCLUDED.team1_mirror_triggered,
                team2_mirror_triggered = EXCLUDED.team2_mirror_triggered,
                team1_effect_value = EXCLUDED.team1_effect_value,
                team2_effect_value = EXCLUDED.team2_effect_value,
                is_tiebreaker_song = EXCLUDED.is_tiebreaker_song,
                round_summary_json = EXCLUDED.round_summary_json
            "#,
        )
        .bind(tournament_match_id)
        .bind(match_actor_id)
        .bind(summary.round_number_in_match as i64)
        .bind(summary.song_id)
        .bind(&song.song_difficulty)
        .bind(format!("{:?}", song.picker_team_id))
        .bind(song.picker_member_id)
        .bind(summary.team_a.member_id)
        .bind(summary.team_b.member_id)
        .bind(summary.team_a.percentage)
        .bind(summary.team_b.percentage)
        .bind(summary.team_a.dealt_damage)
        .bind(summary.team_b.dealt_damage)
        .bind(summary.team_a.health_after - summary.team_a.health_before)
        .bind(summary.team_b.health_after - summary.team_b.health_before)
        .bind(summary.team_a.health_before)
        .bind(summary.team_b.health_before)
        .bind(summary.team_a.health_after)
        .bind(summary.team_b.health_after)
        .bind(summary.team_a.mirror_triggered)
        .bind(summary.team_b.mirror_triggered)
        .bind(summary.team_a.effect_value)
        .bind(summary.team_b.effect_value)
        .bind(summary.is_tiebreaker_song)
        .bind(round_summary_json)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Record the final outcome directly on the owning `tournament_matches`
    /// row — §6 names no separate outcome table, only these columns on the
    /// schedule row itself.
    pub async fn finalize_match(
        &self,
        tournament_match_id: i64,
        status: MatchStatus,
        team_a_score: i64,
        team_b_score: i64,
        winner_team_id: Option<i64>,
    ) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE tournament_matches
            SET status = $2,
                final_score_team1 = $3,
                final_score_team2 = $4,
                winner_team_id = $5,
                updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(tournament_match_id)
        .bind(final_status_column(status))
        .bind(team_a_score)
        .bind(team_b_score)
        .bind(winner_team_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

/// Normalize the in-memory pre-`Archived` status into one of the two values
/// §4.D/§6 name for this column: `'completed'` for a match that ended with a
/// winner, `'archived'` for anything else (a draw or a forced archive from a
/// non-terminal state). `status` is the status the actor held right before
/// it reassigned itself to `Archived` (see `task.rs`'s `handle_resolve_draw`
/// and `handle_archive`), so it is never literally `MatchStatus::Archived`
/// here — that's exactly the distinction this function exists to draw.
fn final_status_column(status: MatchStatus) -> &'static str {
    match status {
        MatchStatus::TeamAWins | MatchStatus::TeamBWins => "completed",
        _ => "archived",
    }
}
