use serde::{Deserialize, Serialize};

use super::member::TeamId;

/// A reserved picker identity used for tiebreaker songs, which are appended by
/// the system rather than chosen by either team (§4.B `SelectTiebreakerSong`).
pub const SYSTEM_PICKER_MEMBER_ID: i64 = -1;

/// Lifecycle of a single scheduled song slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SongStatus {
    Pending,
    Ongoing,
    Completed,
}

/// One scheduled song slot in a match, before and after it is played.
///
/// Catalog fields (`song_title`, `cover_url`, `bpm`, ...) are supplied from the
/// outside (router or `InitializeFromSchedule`/`SelectTiebreakerSong` payload)
/// so that the match actor never needs to look up the song catalog itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchSong {
    pub song_id: i64,
    pub song_title: String,
    pub song_difficulty: String,
    pub song_element: Option<String>,
    pub cover_url: Option<String>,
    pub bpm: Option<u16>,

    pub picker_team_id: TeamId,
    pub picker_member_id: i64,
    pub is_tiebreaker_song: bool,

    pub status: SongStatus,

    // Result fields, populated once `status == Completed`.
    pub team_a_member_id: Option<i64>,
    pub team_b_member_id: Option<i64>,
    pub team_a_percentage: Option<f64>,
    pub team_b_percentage: Option<f64>,
    pub team_a_damage_dealt: Option<i64>,
    pub team_b_damage_dealt: Option<i64>,
    pub team_a_effect_value: Option<i64>,
    pub team_b_effect_value: Option<i64>,
    pub team_a_health_after: Option<i64>,
    pub team_b_health_after: Option<i64>,
    pub team_a_mirror_triggered: Option<bool>,
    pub team_b_mirror_triggered: Option<bool>,
}

impl MatchSong {
    /// A song slot as it is scheduled before being played: no result fields set.
    pub fn scheduled(
        song_id: i64,
        song_title: impl Into<String>,
        song_difficulty: impl Into<String>,
        song_element: Option<String>,
        cover_url: Option<String>,
        bpm: Option<u16>,
        picker_team_id: TeamId,
        picker_member_id: i64,
        is_tiebreaker_song: bool,
    ) -> Self {
        Self {
            song_id,
            song_title: song_title.into(),
            song_difficulty: song_difficulty.into(),
            song_element,
            cover_url,
            bpm,
            picker_team_id,
            picker_member_id,
            is_tiebreaker_song,
            status: SongStatus::Pending,
            team_a_member_id: None,
            team_b_member_id: None,
            team_a_percentage: None,
            team_b_percentage: None,
            team_a_damage_dealt: None,
            team_b_damage_dealt: None,
            team_a_effect_value: None,
            team_b_effect_value: None,
            team_a_health_after: None,
            team_b_health_after: None,
            team_a_mirror_triggered: None,
            team_b_mirror_triggered: None,
        }
    }
}
