//! A clonable, cheap-to-pass-around handle onto a running match actor.
//!
//! All state lives inside the actor task (`super::task::run`); the handle is
//! just a mailbox sender plus a broadcast subscription point, following the
//! usual `tokio` actor pattern (one task owns the data, everyone else talks
//! to it through channels).

use tokio::sync::{broadcast, mpsc, oneshot};

use crate::domain::member::TeamId;
use crate::domain::song::MatchSong;
use crate::domain::state::{MatchState, RoundInput, RoundSummary, ScheduleData};
use crate::error::{Error, Result};

use super::message::ActorMessage;

#[derive(Clone)]
pub struct MatchActorHandle {
    sender: mpsc::Sender<ActorMessage>,
    broadcast_tx: broadcast::Sender<MatchState>,
}

impl MatchActorHandle {
    pub(super) fn new(sender: mpsc::Sender<ActorMessage>, broadcast_tx: broadcast::Sender<MatchState>) -> Self {
        Self { sender, broadcast_tx }
    }

    /// Subscribe to every `MatchState` snapshot published after a mutation.
    /// Lagged subscribers silently miss old snapshots and resume from the
    /// newest one available; the router's websocket handler treats a `Lagged`
    /// error as "reconnect and re-fetch current state", not a fatal error.
    pub fn subscribe(&self) -> broadcast::Receiver<MatchState> {
        self.broadcast_tx.subscribe()
    }

    async fn call<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<Result<T>>) -> ActorMessage,
    ) -> Result<T> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(build(reply_tx))
            .await
            .map_err(|_| Error::ActorGone)?;
        reply_rx.await.map_err(|_| Error::ActorGone)?
    }

    pub async fn initialize_from_schedule(&self, schedule: ScheduleData) -> Result<MatchState> {
        self.call(|reply| ActorMessage::InitializeFromSchedule { schedule, reply }).await
    }

    pub async fn calculate_round(&self, input: RoundInput) -> Result<RoundSummary> {
        self.call(|reply| ActorMessage::CalculateRound { input, reply }).await
    }

    pub async fn next_round(&self) -> Result<MatchState> {
        self.call(|reply| ActorMessage::NextRound { reply }).await
    }

    pub async fn select_tiebreaker_song(&self, song: MatchSong) -> Result<MatchState> {
        self.call(|reply| ActorMessage::SelectTiebreakerSong { song, reply }).await
    }

    pub async fn resolve_draw(&self, winner: TeamId) -> Result<MatchState> {
        self.call(|reply| ActorMessage::ResolveDraw { winner, reply }).await
    }

    pub async fn archive(&self) -> Result<MatchState> {
        self.call(|reply| ActorMessage::Archive { reply }).await
    }

    pub async fn get_state(&self) -> Result<MatchState> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(ActorMessage::GetState { reply: reply_tx })
            .await
            .map_err(|_| Error::ActorGone)?;
        reply_rx.await.map_err(|_| Error::ActorGone)
    }
}
