//! Wire types for the HTTP surface (§6). Kept separate from the domain model
//! so the JSON shape the frontend sees can diverge from internal field names
//! without touching `crate::domain`.

use serde::{Deserialize, Serialize};

use crate::domain::member::TeamId;
use crate::domain::song::MatchSong;
use crate::domain::state::{MatchState, RoundInput, RoundSummary};
use crate::error::Error;

/// Uniform response envelope every endpoint returns.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self { success: true, data: Some(data), error: None }
    }
}

impl Envelope<()> {
    pub fn err(error: &Error) -> Self {
        Self { success: false, data: None, error: Some(error.to_string()) }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateTournamentMatchRequest {
    pub round_name: String,
    pub team1_id: i64,
    pub team2_id: i64,
    pub scheduled_time: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreateTournamentMatchResponse {
    pub tournament_match_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct ConfirmSetupRequest {
    pub team1_name: String,
    pub team2_name: String,
    pub team1_roster: Vec<crate::domain::member::Member>,
    pub team2_roster: Vec<crate::domain::member::Member>,
    pub team1_player_order: Vec<i64>,
    pub team2_player_order: Vec<i64>,
    pub match_song_list: Vec<MatchSong>,
}

#[derive(Debug, Deserialize)]
pub struct CalculateRoundRequest {
    #[serde(rename = "teamA_percentage")]
    pub team_a_percentage: f64,
    #[serde(rename = "teamB_percentage")]
    pub team_b_percentage: f64,
    #[serde(rename = "teamA_effect_value", default)]
    pub team_a_effect_value: i64,
    #[serde(rename = "teamB_effect_value", default)]
    pub team_b_effect_value: i64,
}

impl From<CalculateRoundRequest> for RoundInput {
    fn from(req: CalculateRoundRequest) -> Self {
        RoundInput {
            team_a_percentage: req.team_a_percentage,
            team_b_percentage: req.team_b_percentage,
            team_a_effect_value: req.team_a_effect_value,
            team_b_effect_value: req.team_b_effect_value,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CalculateRoundResponse {
    pub round_summary: RoundSummary,
}

#[derive(Debug, Deserialize)]
pub struct ResolveDrawRequest {
    pub winner: String,
}

impl ResolveDrawRequest {
    pub fn team_id(&self) -> Result<TeamId, Error> {
        match self.winner.as_str() {
            "teamA" => Ok(TeamId::A),
            "teamB" => Ok(TeamId::B),
            other => Err(Error::Validation(format!("unknown winner {other:?}, expected teamA or teamB"))),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SelectTiebreakerSongRequest {
    pub song_id: i64,
    pub selected_difficulty: String,
}

#[derive(Debug, Serialize)]
pub struct MatchStateResponse(pub MatchState);

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct MatchHistoryRow {
    pub tournament_match_id: i64,
    pub round_name: String,
    pub status: String,
    pub final_score_team1: Option<i64>,
    pub final_score_team2: Option<i64>,
    pub winner_team_id: Option<i64>,
}

/// One archived row from `match_rounds_history`, joined in under its owning
/// [`MatchHistoryRow`] for the `match_history` presentation endpoint.
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct RoundHistoryRow {
    pub round_number_in_match: i64,
    pub song_id: i64,
    pub selected_difficulty: String,
    pub team1_percentage: f64,
    pub team2_percentage: f64,
    pub team1_damage_dealt: i64,
    pub team2_damage_dealt: i64,
    pub team1_health_after: i64,
    pub team2_health_after: i64,
    pub is_tiebreaker_song: bool,
}

#[derive(Debug, Serialize)]
pub struct MatchHistoryEntry {
    #[serde(flatten)]
    pub tournament_match: MatchHistoryRow,
    pub rounds: Vec<RoundHistoryRow>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_draw_request_parses_known_winners() {
        assert_eq!(ResolveDrawRequest { winner: "teamA".into() }.team_id().unwrap(), TeamId::A);
        assert_eq!(ResolveDrawRequest { winner: "teamB".into() }.team_id().unwrap(), TeamId::B);
    }

    #[test]
    fn resolve_draw_request_rejects_unknown_winner() {
        let err = ResolveDrawRequest { winner: "teamC".into() }.team_id().unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn envelope_ok_omits_error_field() {
        let json = serde_json::to_value(Envelope::ok(42)).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["data"], 42);
        assert!(json.get("error").is_none());
    }

    #[test]
    fn envelope_err_omits_data_field() {
        let err = Error::Validation("bad input".into());
        let json = serde_json::to_value(Envelope::<()>::err(&err)).unwrap();
        assert_eq!(json["success"], false);
        assert!(json.get("data").is_none());
        assert_eq!(json["error"], "validation error: bad input");
    }

    #[test]
    fn calculate_round_request_deserializes_camel_case_wire_names() {
        let req: CalculateRoundRequest = serde_json::from_str(
            r#"{"teamA_percentage": 99.8765, "teamB_percentage": 50.0}"#,
        )
        .unwrap();
        assert_eq!(req.team_a_percentage, 99.8765);
        assert_eq!(req.team_b_effect_value, 0);
    }
}
