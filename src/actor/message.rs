//! The match actor's mailbox message type.
//!
//! Every public operation on [`super::handle::MatchActorHandle`] sends one of
//! these and awaits a `oneshot` reply; the actor task (`super::task`) is the
//! only thing that ever mutates a `MatchState`.

use tokio::sync::oneshot;

use crate::domain::member::TeamId;
use crate::domain::song::MatchSong;
use crate::domain::state::{MatchState, RoundInput, RoundSummary, ScheduleData};
use crate::error::Result;

pub enum ActorMessage {
    InitializeFromSchedule {
        schedule: ScheduleData,
        reply: oneshot::Sender<Result<MatchState>>,
    },
    CalculateRound {
        input: RoundInput,
        reply: oneshot::Sender<Result<RoundSummary>>,
    },
    NextRound {
        reply: oneshot::Sender<Result<MatchState>>,
    },
    SelectTiebreakerSong {
        song: MatchSong,
        reply: oneshot::Sender<Result<MatchState>>,
    },
    ResolveDraw {
        winner: TeamId,
        reply: oneshot::Sender<Result<MatchState>>,
    },
    Archive {
        reply: oneshot::Sender<Result<MatchState>>,
    },
    GetState {
        reply: oneshot::Sender<MatchState>,
    },
}
