use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::STANDARD_ROUNDS_COUNT;
use crate::error::{Error, Result};

use super::member::{Member, Profession, TeamId};
use super::song::{MatchSong, SongStatus, SYSTEM_PICKER_MEMBER_ID};

/// The match actor's state-machine tag (§4.B).
///
/// Every mutating operation is a total function of `(MatchStatus, operation)`;
/// see `crate::actor::task` for the transition table itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    Scheduled,
    PendingScores,
    RoundFinished,
    TiebreakerPendingSong,
    DrawPendingResolution,
    TeamAWins,
    TeamBWins,
    Archived,
}

impl MatchStatus {
    /// No score/round mutation is accepted once a match reaches one of these (invariant 5).
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            MatchStatus::TeamAWins
                | MatchStatus::TeamBWins
                | MatchStatus::DrawPendingResolution
                | MatchStatus::Archived
        )
    }
}

/// Payload for `InitializeFromSchedule`: everything the Router gathered from
/// the (out of scope) schedule-confirmation step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleData {
    pub tournament_match_id: i64,
    pub team_a_id: i64,
    pub team_a_name: String,
    pub team_a_roster: Vec<Member>,
    pub team_a_player_order: Vec<i64>,
    pub team_b_id: i64,
    pub team_b_name: String,
    pub team_b_roster: Vec<Member>,
    pub team_b_player_order: Vec<i64>,
    pub match_song_list: Vec<MatchSong>,
}

/// Input to one `CalculateRound` call.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RoundInput {
    pub team_a_percentage: f64,
    pub team_b_percentage: f64,
    pub team_a_effect_value: i64,
    pub team_b_effect_value: i64,
}

/// Per-team breakdown kept inside a [`RoundSummary`], mostly for presentation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamRoundDetail {
    pub member_id: i64,
    pub nickname: String,
    pub profession: Profession,
    pub percentage: f64,
    pub digits: [u32; 4],
    pub base_damage: i64,
    pub dealt_damage: i64,
    pub damage_received: i64,
    pub defender_draw: Option<u32>,
    pub healing_base: i64,
    pub healing_bonus: i64,
    pub effect_value: i64,
    pub health_before: i64,
    pub health_after: i64,
    pub mirror_triggered: bool,
}

/// The immutable, complete report of one round (§3 "RoundSummary").
///
/// This is the broadcast payload and the unit of history storage; it is
/// produced once by [`crate::resolver::resolve_round`] and never mutated
/// afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundSummary {
    pub round_number_in_match: usize,
    pub song_id: i64,
    pub is_tiebreaker_song: bool,
    pub team_a: TeamRoundDetail,
    pub team_b: TeamRoundDetail,
    pub both_mirrors_triggered_simultaneously: bool,
    pub resulting_status: MatchStatus,
    /// Human-readable trace of the algorithm, in execution order.
    pub step_log: Vec<String>,
}

/// The one entity that lives in a Match Actor (§3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchState {
    pub match_actor_id: Uuid,
    pub tournament_match_id: i64,

    pub team_a_id: i64,
    pub team_a_name: String,
    pub team_a_roster: Vec<Member>,
    pub team_a_player_order: Vec<i64>,
    pub team_a_score: i64,
    pub team_a_mirror_available: bool,

    pub team_b_id: i64,
    pub team_b_name: String,
    pub team_b_roster: Vec<Member>,
    pub team_b_player_order: Vec<i64>,
    pub team_b_score: i64,
    pub team_b_mirror_available: bool,

    pub current_song_index: usize,
    pub match_song_list: Vec<MatchSong>,

    pub round_summary: Option<RoundSummary>,
    pub status: MatchStatus,
}

impl MatchState {
    /// A freshly created, uninitialized actor (§3 "Lifecycle").
    pub fn new_scheduled(match_actor_id: Uuid, tournament_match_id: i64) -> Self {
        Self {
            match_actor_id,
            tournament_match_id,
            team_a_id: 0,
            team_a_name: String::new(),
            team_a_roster: Vec::new(),
            team_a_player_order: Vec::new(),
            team_a_score: crate::config::INITIAL_HEALTH,
            team_a_mirror_available: true,
            team_b_id: 0,
            team_b_name: String::new(),
            team_b_roster: Vec::new(),
            team_b_player_order: Vec::new(),
            team_b_score: crate::config::INITIAL_HEALTH,
            team_b_mirror_available: true,
            current_song_index: 0,
            match_song_list: Vec::new(),
            round_summary: None,
            status: MatchStatus::Scheduled,
        }
    }

    /// Validate and apply `InitializeFromSchedule`, replacing state atomically.
    ///
    /// Returns a [`Error::Validation`] (never mutating `self`) if the schedule
    /// data fails the §4.B validation rules: non-empty orders, every ordered id
    /// present in its roster, non-empty song list.
    pub fn initialize_from_schedule(&mut self, schedule: ScheduleData) -> Result<()> {
        validate_order(&schedule.team_a_roster, &schedule.team_a_player_order, "team_a")?;
        validate_order(&schedule.team_b_roster, &schedule.team_b_player_order, "team_b")?;
        if schedule.match_song_list.is_empty() {
            return Err(Error::Validation("match_song_list must not be empty".into()));
        }

        self.tournament_match_id = schedule.tournament_match_id;
        self.team_a_id = schedule.team_a_id;
        self.team_a_name = schedule.team_a_name;
        self.team_a_roster = schedule.team_a_roster;
        self.team_a_player_order = schedule.team_a_player_order;
        self.team_a_score = crate::config::INITIAL_HEALTH;
        self.team_a_mirror_available = true;
        self.team_b_id = schedule.team_b_id;
        self.team_b_name = schedule.team_b_name;
        self.team_b_roster = schedule.team_b_roster;
        self.team_b_player_order = schedule.team_b_player_order;
        self.team_b_score = crate::config::INITIAL_HEALTH;
        self.team_b_mirror_available = true;
        self.current_song_index = 0;
        self.match_song_list = schedule.match_song_list;
        if let Some(first) = self.match_song_list.first_mut() {
            first.status = SongStatus::Ongoing;
        }
        self.round_summary = None;
        self.status = MatchStatus::PendingScores;
        Ok(())
    }

    pub fn current_song(&self) -> Option<&MatchSong> {
        self.match_song_list.get(self.current_song_index)
    }

    pub fn current_song_mut(&mut self) -> Option<&mut MatchSong> {
        self.match_song_list.get_mut(self.current_song_index)
    }

    /// The currently selected roster member for `team`, found by rotating
    /// `player_order[current_song_index mod len]` (§4.B "NextRound").
    pub fn current_player(&self, team: TeamId) -> Option<&Member> {
        let (order, roster) = match team {
            TeamId::A => (&self.team_a_player_order, &self.team_a_roster),
            TeamId::B => (&self.team_b_player_order, &self.team_b_roster),
        };
        if order.is_empty() {
            return None;
        }
        let member_id = order[self.current_song_index % order.len()];
        roster.iter().find(|m| m.member_id == member_id)
    }

    pub fn score(&self, team: TeamId) -> i64 {
        match team {
            TeamId::A => self.team_a_score,
            TeamId::B => self.team_b_score,
        }
    }

    pub fn set_score(&mut self, team: TeamId, value: i64) {
        match team {
            TeamId::A => self.team_a_score = value,
            TeamId::B => self.team_b_score = value,
        }
    }

    pub fn mirror_available(&self, team: TeamId) -> bool {
        match team {
            TeamId::A => self.team_a_mirror_available,
            TeamId::B => self.team_b_mirror_available,
        }
    }

    pub fn consume_mirror(&mut self, team: TeamId) {
        match team {
            TeamId::A => self.team_a_mirror_available = false,
            TeamId::B => self.team_b_mirror_available = false,
        }
    }

    /// `true` iff `current_song_index` is the last *standard* round, i.e. the
    /// round schedule has not yet been extended with a tiebreaker song.
    pub fn is_final_standard_round(&self) -> bool {
        self.current_song_index == STANDARD_ROUNDS_COUNT - 1
            && self
                .current_song()
                .map(|s| !s.is_tiebreaker_song)
                .unwrap_or(false)
    }

    /// Append a tiebreaker song slot and advance the index onto it (§4.B
    /// `SelectTiebreakerSong`).
    pub fn append_tiebreaker_song(&mut self, mut song: MatchSong) {
        song.is_tiebreaker_song = true;
        song.picker_member_id = SYSTEM_PICKER_MEMBER_ID;
        song.status = SongStatus::Ongoing;
        self.match_song_list.push(song);
        self.current_song_index = self.match_song_list.len() - 1;
        self.status = MatchStatus::PendingScores;
    }

    /// Advance to the next scheduled song slot (§4.B `NextRound`).
    pub fn advance_to_next_round(&mut self) -> Result<()> {
        if self.current_song_index + 1 >= self.match_song_list.len() {
            return Err(Error::Validation(
                "no further scheduled song to advance to".into(),
            ));
        }
        self.current_song_index += 1;
        if let Some(song) = self.current_song_mut() {
            song.status = SongStatus::Ongoing;
        }
        self.round_summary = None;
        self.status = MatchStatus::PendingScores;
        Ok(())
    }
}

fn validate_order(roster: &[Member], order: &[i64], label: &str) -> Result<()> {
    if order.is_empty() {
        return Err(Error::Validation(format!("{label}_player_order must not be empty")));
    }
    for member_id in order {
        if !roster.iter().any(|m| m.member_id == *member_id) {
            return Err(Error::Validation(format!(
                "{label}_player_order references member {member_id} not present in the roster"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_roster() -> Vec<Member> {
        vec![
            Member { member_id: 1, nickname: "alice".into(), profession: Profession::Attacker },
            Member { member_id: 2, nickname: "bob".into(), profession: Profession::Defender },
        ]
    }

    fn sample_schedule() -> ScheduleData {
        ScheduleData {
            tournament_match_id: 7,
            team_a_id: 10,
            team_a_name: "Alphas".into(),
            team_a_roster: sample_roster(),
            team_a_player_order: vec![1, 2],
            team_b_id: 20,
            team_b_name: "Betas".into(),
            team_b_roster: sample_roster(),
            team_b_player_order: vec![2, 1],
            match_song_list: vec![MatchSong::scheduled(
                100,
                "Song",
                "M 13",
                None,
                None,
                None,
                TeamId::A,
                1,
                false,
            )],
        }
    }

    #[test]
    fn initialize_sets_pending_scores_and_initial_health() {
        let mut state = MatchState::new_scheduled(Uuid::nil(), 0);
        state.initialize_from_schedule(sample_schedule()).unwrap();
        assert_eq!(state.status, MatchStatus::PendingScores);
        assert_eq!(state.team_a_score, crate::config::INITIAL_HEALTH);
        assert_eq!(state.team_b_score, crate::config::INITIAL_HEALTH);
        assert!(state.team_a_mirror_available);
        assert_eq!(
            state.current_song().unwrap().status,
            SongStatus::Ongoing
        );
    }

    #[test]
    fn rejects_order_referencing_unknown_member() {
        let mut schedule = sample_schedule();
        schedule.team_a_player_order = vec![1, 99];
        let mut state = MatchState::new_scheduled(Uuid::nil(), 0);
        assert!(state.initialize_from_schedule(schedule).is_err());
        assert_eq!(state.status, MatchStatus::Scheduled);
    }

    #[test]
    fn rejects_empty_song_list() {
        let mut schedule = sample_schedule();
        schedule.match_song_list.clear();
        let mut state = MatchState::new_scheduled(Uuid::nil(), 0);
        assert!(state.initialize_from_schedule(schedule).is_err());
    }

    #[test]
    fn current_player_rotates_modularly() {
        let mut state = MatchState::new_scheduled(Uuid::nil(), 0);
        let mut schedule = sample_schedule();
        schedule.match_song_list.push(MatchSong::scheduled(
            101, "Song2", "M 14", None, None, None, TeamId::B, 2, false,
        ));
        schedule.match_song_list.push(MatchSong::scheduled(
            102, "Song3", "M 15", None, None, None, TeamId::A, 1, false,
        ));
        state.initialize_from_schedule(schedule).unwrap();

        assert_eq!(state.current_player(TeamId::A).unwrap().member_id, 1);
        state.advance_to_next_round().unwrap();
        assert_eq!(state.current_player(TeamId::A).unwrap().member_id, 2);
        state.advance_to_next_round().unwrap();
        assert_eq!(state.current_player(TeamId::A).unwrap().member_id, 1);
    }
}
