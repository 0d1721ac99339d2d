/// Team members, rosters, and the profession enum that governs skill behavior.
pub mod member;
/// Scheduled/completed song slots ([`song::MatchSong`]) within a match.
pub mod song;
/// The live [`state::MatchState`], its status tag, and round-level payloads.
pub mod state;

pub use member::{Member, Profession, TeamId};
pub use song::{MatchSong, SongStatus};
pub use state::{MatchState, MatchStatus, RoundInput, RoundSummary, ScheduleData, TeamRoundDetail};
