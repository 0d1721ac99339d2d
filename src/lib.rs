//! Per-match state machine and deterministic damage engine for anime-song
//! battle tournaments: one actor per live match, a pure resolver for the
//! digit-extraction/mirror-revival combat rules, and the plumbing (storage,
//! history archive, HTTP/websocket front door) around them.

/// The match actor: mailbox, handle, and run loop owning a live `MatchState`.
pub mod actor;
/// History Archiver: idempotent upserts into the external relational store.
pub mod archiver;
/// Tunables and environment-derived runtime configuration.
pub mod config;
/// The data model: members, songs, and the match state machine.
pub mod domain;
/// The crate-wide error type and its HTTP status mapping.
pub mod error;
/// Tracing setup for the server binary.
pub mod logger;
/// Process-wide registry mapping a match id to its live actor.
pub mod registry;
/// The pure digit-extraction / mirror-revival damage resolution algorithm.
pub mod resolver;
/// HTTP/websocket front door.
pub mod router;
/// Embedded per-actor durability.
pub mod storage;

pub use error::{Error, Result};
