//! The match actor: one `tokio` task per live match, owning the only
//! mutable copy of its [`crate::domain::state::MatchState`] (§4.B, §5).

mod handle;
mod message;
mod task;

pub use handle::MatchActorHandle;
pub use task::spawn;
