//! The pure damage/mirror resolution algorithm (§4.A).
//!
//! [`resolve_round`] is an explicit pure function: given a read-only
//! [`MatchState`] snapshot, a [`RoundInput`], and an injected RNG, it returns
//! the new health, new mirror flags, and a fully populated [`RoundSummary`].
//! It never touches storage, the network, or a subscriber list, and it never
//! reads the system clock or an ambient random source — the caller (the
//! match actor) owns all of that.

use rand::RngCore;

use crate::config::{MAX_DAMAGE_DIGIT, MIRROR_HEALTH_RESTORE};
use crate::domain::member::{Profession, TeamId};
use crate::domain::state::{MatchState, MatchStatus, RoundInput, RoundSummary, TeamRoundDetail};
use crate::error::{Error, Result};

/// The new state produced by one `CalculateRound` call.
///
/// The caller (the match actor) is responsible for writing these fields back
/// onto its `MatchState` and persisting the result; this function only computes.
pub struct RoundOutcome {
    pub team_a_health_after: i64,
    pub team_b_health_after: i64,
    pub team_a_mirror_available_after: bool,
    pub team_b_mirror_available_after: bool,
    pub summary: RoundSummary,
}

/// Render `pct` (clamped to `[0, 101]`) to 4 fractional digits and extract the
/// four "damage digits": the integer part's tens digit followed by the first
/// three fractional digits, each remapped `0 -> MAX_DAMAGE_DIGIT`.
pub fn digits_for(pct: f64) -> [u32; 4] {
    let clamped = pct.clamp(0.0, 101.0);
    let formatted = format!("{clamped:.4}");
    let (int_part, frac_part) = formatted
        .split_once('.')
        .expect("fixed-point formatting always contains a decimal point");

    let int_digits: Vec<u32> = int_part.chars().filter_map(|c| c.to_digit(10)).collect();
    let tens_digit = if int_digits.len() >= 2 {
        int_digits[int_digits.len() - 2]
    } else {
        0
    };
    let frac_digits: Vec<u32> = frac_part.chars().filter_map(|c| c.to_digit(10)).collect();

    [tens_digit, frac_digits[0], frac_digits[1], frac_digits[2]].map(remap_zero)
}

fn remap_zero(digit: u32) -> u32 {
    if digit == 0 {
        MAX_DAMAGE_DIGIT
    } else {
        digit
    }
}

fn max_digit(digits: [u32; 4]) -> i64 {
    digits.iter().copied().max().unwrap_or(0) as i64
}

/// Round half away from zero, as required by §4.A step 9.
pub fn round_half_away_from_zero(value: f64) -> i64 {
    if value >= 0.0 {
        (value + 0.5).floor() as i64
    } else {
        (value - 0.5).ceil() as i64
    }
}

/// Own-skill damage modifier (§4.A step 3). Returns `(dealt, heal_base)`.
fn own_skill(profession: Profession, digits: [u32; 4]) -> (i64, i64) {
    let base: i64 = digits.iter().sum::<u32>() as i64;
    let max_d = max_digit(digits);
    match profession {
        Profession::Attacker => (base + max_d, 0),
        Profession::Supporter => ((base - max_d).max(0), max_d),
        Profession::Defender | Profession::None => (base, 0),
    }
}

/// Profession-specific mirror effect (§4.A step 6), applied once a team's
/// mirror fires. Adjusts `opponent_health` in place and records any healing
/// bonus for later application in step 7.
fn apply_mirror_effect(
    profession: Profession,
    digits: [u32; 4],
    raw_overflow: i64,
    heal_base: i64,
    heal_bonus: &mut i64,
    opponent_health: &mut i64,
) {
    match profession {
        Profession::Attacker => *opponent_health -= max_digit(digits),
        Profession::Defender => *opponent_health -= raw_overflow,
        Profession::Supporter => *heal_bonus = heal_base * 2,
        Profession::None => {}
    }
}

/// Resolve one round. `state` must be in `PendingScores` with a current song;
/// this is enforced by the actor before calling in, not by this function.
pub fn resolve_round(
    state: &MatchState,
    input: RoundInput,
    rng: &mut impl RngCore,
) -> Result<RoundOutcome> {
    let song = state
        .current_song()
        .ok_or_else(|| Error::Validation("no current song to score".into()))?;
    let player_a = state
        .current_player(TeamId::A)
        .ok_or_else(|| Error::Validation("team_a has no current player".into()))?
        .clone();
    let player_b = state
        .current_player(TeamId::B)
        .ok_or_else(|| Error::Validation("team_b has no current player".into()))?
        .clone();

    let mut step_log = Vec::new();

    // 1-2. Digitization and base damage.
    let digits_a = digits_for(input.team_a_percentage);
    let digits_b = digits_for(input.team_b_percentage);
    step_log.push(format!(
        "digitized {:.4}% -> {:?}, {:.4}% -> {:?}",
        input.team_a_percentage, digits_a, input.team_b_percentage, digits_b
    ));

    // 3. Own-skill damage modifiers.
    let (mut dealt_a, heal_base_a) = own_skill(player_a.profession, digits_a);
    let (mut dealt_b, heal_base_b) = own_skill(player_b.profession, digits_b);
    step_log.push(format!(
        "own-skill dealt: a={dealt_a} (heal_base={heal_base_a}), b={dealt_b} (heal_base={heal_base_b})"
    ));

    // Damage dealt "after own skills, before opponent defender" (design note 9a).
    let team_a_dealt_logged = dealt_a;
    let team_b_dealt_logged = dealt_b;

    // 4. Opponent-Defender invalidation.
    let mut defender_draw_a = None;
    let mut defender_draw_b = None;
    if player_a.profession == Profession::Defender {
        let mut slots: Vec<u32> = digits_b.to_vec();
        if player_b.profession == Profession::Attacker {
            slots.push(max_digit(digits_b) as u32);
        }
        let draw = slots[(rng.next_u32() as usize) % slots.len()];
        dealt_b = (dealt_b - draw as i64).max(0);
        defender_draw_a = Some(draw);
        step_log.push(format!("team_a defender drew {draw}, dealt_b now {dealt_b}"));
    }
    if player_b.profession == Profession::Defender {
        let mut slots: Vec<u32> = digits_a.to_vec();
        if player_a.profession == Profession::Attacker {
            slots.push(max_digit(digits_a) as u32);
        }
        let draw = slots[(rng.next_u32() as usize) % slots.len()];
        dealt_a = (dealt_a - draw as i64).max(0);
        defender_draw_b = Some(draw);
        step_log.push(format!("team_b defender drew {draw}, dealt_a now {dealt_a}"));
    }

    // 5. Raw damage.
    let h_a_raw = state.team_a_score - dealt_b;
    let h_b_raw = state.team_b_score - dealt_a;
    let raw_overflow_a = (-h_a_raw).max(0);
    let raw_overflow_b = (-h_b_raw).max(0);
    step_log.push(format!("raw health: a={h_a_raw}, b={h_b_raw}"));

    // 6. Mirror pass.
    let mut h_a = h_a_raw;
    let mut h_b = h_b_raw;
    let mut mirror_a_available = state.team_a_mirror_available;
    let mut mirror_b_available = state.team_b_mirror_available;
    let mut a_mirror_triggered = false;
    let mut b_mirror_triggered = false;
    let mut heal_bonus_a = 0i64;
    let mut heal_bonus_b = 0i64;

    let simultaneous =
        h_a_raw <= 0 && mirror_a_available && h_b_raw <= 0 && mirror_b_available;

    if simultaneous {
        h_a = MIRROR_HEALTH_RESTORE;
        h_b = MIRROR_HEALTH_RESTORE;
        mirror_a_available = false;
        mirror_b_available = false;
        a_mirror_triggered = true;
        b_mirror_triggered = true;
        step_log.push("both mirrors triggered simultaneously, no profession effects".into());
    } else {
        if h_a <= 0 && mirror_a_available {
            h_a = MIRROR_HEALTH_RESTORE;
            mirror_a_available = false;
            a_mirror_triggered = true;
            apply_mirror_effect(
                player_a.profession,
                digits_a,
                raw_overflow_a,
                heal_base_a,
                &mut heal_bonus_a,
                &mut h_b,
            );
            step_log.push(format!("team_a mirror triggered ({:?} effect)", player_a.profession));
        }
        if h_b <= 0 && mirror_b_available {
            h_b = MIRROR_HEALTH_RESTORE;
            mirror_b_available = false;
            b_mirror_triggered = true;
            apply_mirror_effect(
                player_b.profession,
                digits_b,
                raw_overflow_b,
                heal_base_b,
                &mut heal_bonus_b,
                &mut h_a,
            );
            step_log.push(format!("team_b mirror triggered ({:?} effect)", player_b.profession));
        }
        if !a_mirror_triggered && h_a <= 0 && mirror_a_available {
            h_a = MIRROR_HEALTH_RESTORE;
            mirror_a_available = false;
            a_mirror_triggered = true;
            apply_mirror_effect(
                player_a.profession,
                digits_a,
                raw_overflow_a,
                heal_base_a,
                &mut heal_bonus_a,
                &mut h_b,
            );
            step_log.push(format!(
                "team_a mirror triggered on re-evaluation ({:?} effect)",
                player_a.profession
            ));
        }
    }

    // 7. Healing.
    h_a += heal_base_a + heal_bonus_a;
    h_b += heal_base_b + heal_bonus_b;

    // 8. Effect values.
    h_a += input.team_a_effect_value;
    h_b += input.team_b_effect_value;

    // 9. Rounding (a no-op given our all-integer pipeline; kept for contract fidelity).
    let h_a = round_half_away_from_zero(h_a as f64);
    let h_b = round_half_away_from_zero(h_b as f64);
    step_log.push(format!("final health: a={h_a}, b={h_b}"));

    // 10. Outcome.
    let a_dead = h_a <= 0;
    let b_dead = h_b <= 0;
    let is_final_scheduled_round = state.current_song_index + 1 == state.match_song_list.len();

    let new_status = if a_dead && b_dead {
        if h_a >= h_b {
            MatchStatus::TeamAWins
        } else {
            MatchStatus::TeamBWins
        }
    } else if a_dead {
        MatchStatus::TeamBWins
    } else if b_dead {
        MatchStatus::TeamAWins
    } else if is_final_scheduled_round {
        if h_a == h_b {
            MatchStatus::TiebreakerPendingSong
        } else if h_a > h_b {
            MatchStatus::TeamAWins
        } else {
            MatchStatus::TeamBWins
        }
    } else {
        MatchStatus::RoundFinished
    };
    step_log.push(format!("resulting status: {new_status:?}"));

    let summary = RoundSummary {
        round_number_in_match: state.current_song_index,
        song_id: song.song_id,
        is_tiebreaker_song: song.is_tiebreaker_song,
        team_a: TeamRoundDetail {
            member_id: player_a.member_id,
            nickname: player_a.nickname,
            profession: player_a.profession,
            percentage: input.team_a_percentage,
            digits: digits_a,
            base_damage: digits_a.iter().sum::<u32>() as i64,
            dealt_damage: team_a_dealt_logged,
            damage_received: dealt_b,
            defender_draw: defender_draw_a,
            healing_base: heal_base_a,
            healing_bonus: heal_bonus_a,
            effect_value: input.team_a_effect_value,
            health_before: state.team_a_score,
            health_after: h_a,
            mirror_triggered: a_mirror_triggered,
        },
        team_b: TeamRoundDetail {
            member_id: player_b.member_id,
            nickname: player_b.nickname,
            profession: player_b.profession,
            percentage: input.team_b_percentage,
            digits: digits_b,
            base_damage: digits_b.iter().sum::<u32>() as i64,
            dealt_damage: team_b_dealt_logged,
            damage_received: dealt_a,
            defender_draw: defender_draw_b,
            healing_base: heal_base_b,
            healing_bonus: heal_bonus_b,
            effect_value: input.team_b_effect_value,
            health_before: state.team_b_score,
            health_after: h_b,
            mirror_triggered: b_mirror_triggered,
        },
        both_mirrors_triggered_simultaneously: simultaneous,
        resulting_status: new_status,
        step_log,
    };

    Ok(RoundOutcome {
        team_a_health_after: h_a,
        team_b_health_after: h_b,
        team_a_mirror_available_after: mirror_a_available,
        team_b_mirror_available_after: mirror_b_available,
        summary,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::member::Member;
    use crate::domain::song::{MatchSong, SongStatus};
    use rand::rngs::mock::StepRng;
    use uuid::Uuid;

    fn state_with(
        team_a_score: i64,
        team_b_score: i64,
        mirror_a: bool,
        mirror_b: bool,
        prof_a: Profession,
        prof_b: Profession,
        is_final_round: bool,
    ) -> MatchState {
        let mut state = MatchState::new_scheduled(Uuid::nil(), 1);
        state.team_a_roster = vec![Member { member_id: 1, nickname: "a".into(), profession: prof_a }];
        state.team_b_roster = vec![Member { member_id: 2, nickname: "b".into(), profession: prof_b }];
        state.team_a_player_order = vec![1];
        state.team_b_player_order = vec![2];
        state.team_a_score = team_a_score;
        state.team_b_score = team_b_score;
        state.team_a_mirror_available = mirror_a;
        state.team_b_mirror_available = mirror_b;
        let mut song = MatchSong::scheduled(1, "Song", "M 13", None, None, None, TeamId::A, 1, false);
        song.status = SongStatus::Ongoing;
        state.match_song_list = if is_final_round {
            vec![song]
        } else {
            vec![song.clone(), song]
        };
        state.current_song_index = 0;
        state.status = MatchStatus::PendingScores;
        state
    }

    fn zero_rng() -> StepRng {
        StepRng::new(0, 0)
    }

    #[test]
    fn digitization_boundary_cases() {
        assert_eq!(digits_for(100.0), [10, 10, 10, 10]);
        assert_eq!(digits_for(0.0), [10, 10, 10, 10]);
        assert_eq!(digits_for(101.0), [10, 10, 10, 10]);
        assert_eq!(digits_for(99.8765), [9, 8, 7, 6]);
        assert_eq!(digits_for(50.0), [5, 10, 10, 10]);
    }

    #[test]
    fn rounding_is_half_away_from_zero() {
        assert_eq!(round_half_away_from_zero(2.5), 3);
        assert_eq!(round_half_away_from_zero(-2.5), -3);
        assert_eq!(round_half_away_from_zero(2.4), 2);
        assert_eq!(round_half_away_from_zero(-2.4), -2);
    }

    #[test]
    fn clean_attacker_vs_defender_round() {
        let state = state_with(
            100,
            100,
            true,
            true,
            Profession::Attacker,
            Profession::Defender,
            false,
        );
        let input = RoundInput {
            team_a_percentage: 99.8765,
            team_b_percentage: 50.0,
            team_a_effect_value: 0,
            team_b_effect_value: 0,
        };
        // StepRng(0, 0) always returns 0 -> draws the first slot in the list.
        let outcome = resolve_round(&state, input, &mut zero_rng()).unwrap();
        // digits_a = [9,8,7,6], attacker dealt = 30+9 = 39
        // digits_b = [5,10,10,10], defender doesn't change own dealt
        // team_a profession attacker (not defender) so no invalidation of dealt_b
        // team_b profession defender invalidates dealt_a using digits_a slots [9,8,7,6], draw index 0 -> 9
        assert_eq!(outcome.summary.team_a.dealt_damage, 39);
        assert_eq!(outcome.summary.team_b.dealt_damage, 35);
        assert_eq!(outcome.team_a_health_after, 100 - 35);
        assert_eq!(outcome.team_b_health_after, 100 - (39 - 9));
        assert_eq!(outcome.summary.resulting_status, MatchStatus::RoundFinished);
        assert!(!outcome.summary.team_a.mirror_triggered);
    }

    #[test]
    fn simultaneous_mirror_skips_profession_effects() {
        let state = state_with(5, 5, true, true, Profession::Attacker, Profession::Attacker, false);
        let input = RoundInput {
            team_a_percentage: 100.0,
            team_b_percentage: 100.0,
            team_a_effect_value: 0,
            team_b_effect_value: 0,
        };
        let outcome = resolve_round(&state, input, &mut zero_rng()).unwrap();
        assert!(outcome.summary.both_mirrors_triggered_simultaneously);
        assert_eq!(outcome.team_a_health_after, MIRROR_HEALTH_RESTORE);
        assert_eq!(outcome.team_b_health_after, MIRROR_HEALTH_RESTORE);
        assert!(!outcome.team_a_mirror_available_after);
        assert!(!outcome.team_b_mirror_available_after);
    }

    #[test]
    fn chain_reaction_mirror() {
        // A would die; A is Attacker so its mirror bonus (+10) knocks B, who
        // survived the initial exchange by only 5, below zero too.
        let state = state_with(3, 55, true, true, Profession::Attacker, Profession::None, false);
        let input = RoundInput {
            team_a_percentage: 0.0,
            team_b_percentage: 100.0,
            team_a_effect_value: 0,
            team_b_effect_value: 0,
        };
        let outcome = resolve_round(&state, input, &mut zero_rng()).unwrap();
        assert!(outcome.summary.team_a.mirror_triggered);
        assert!(outcome.summary.team_b.mirror_triggered);
        assert!(!outcome.team_a_mirror_available_after);
        assert!(!outcome.team_b_mirror_available_after);
        assert_eq!(outcome.team_a_health_after, MIRROR_HEALTH_RESTORE);
        assert_eq!(outcome.team_b_health_after, MIRROR_HEALTH_RESTORE);
    }

    #[test]
    fn final_round_tie_enters_tiebreaker_pending() {
        let state = state_with(40, 40, false, false, Profession::None, Profession::None, true);
        // digits_for(11.1111) == [1,1,1,1], base damage 4 on each side: tied,
        // and neither team drops anywhere near zero.
        let input = RoundInput {
            team_a_percentage: 11.1111,
            team_b_percentage: 11.1111,
            team_a_effect_value: 0,
            team_b_effect_value: 0,
        };
        let outcome = resolve_round(&state, input, &mut zero_rng()).unwrap();
        assert_eq!(outcome.summary.resulting_status, MatchStatus::TiebreakerPendingSong);
    }

    #[test]
    fn both_dead_exact_tie_favors_team_a() {
        let state = state_with(3, 3, false, false, Profession::None, Profession::None, false);
        let input = RoundInput {
            team_a_percentage: 100.0,
            team_b_percentage: 100.0,
            team_a_effect_value: 0,
            team_b_effect_value: 0,
        };
        let outcome = resolve_round(&state, input, &mut zero_rng()).unwrap();
        assert_eq!(outcome.summary.resulting_status, MatchStatus::TeamAWins);
    }
}
