//! Process-wide registry mapping a match to its live actor (§3 "Match Actor
//! Registry"). One process can host many concurrent matches; the registry is
//! the only place that knows how to find (or start) one.

use dashmap::DashMap;
use uuid::Uuid;

use crate::actor::{self, MatchActorHandle};
use crate::archiver::HistoryArchiver;
use crate::domain::state::MatchState;
use crate::error::{Error, Result};
use crate::storage::MatchStorage;

/// Derive the actor identity used for registry lookups and storage keys from
/// a tournament match id. Deterministic so a restart recovers the same actor.
pub fn actor_id_for(tournament_match_id: i64) -> Uuid {
    Uuid::new_v5(&Uuid::NAMESPACE_OID, format!("match-{tournament_match_id}").as_bytes())
}

pub struct MatchRegistry {
    actors: DashMap<Uuid, MatchActorHandle>,
    storage: MatchStorage,
    archiver: HistoryArchiver,
}

impl MatchRegistry {
    pub fn new(storage: MatchStorage, archiver: HistoryArchiver) -> Self {
        Self { actors: DashMap::new(), storage, archiver }
    }

    /// Get the handle for `tournament_match_id`, spawning a fresh or
    /// rehydrated actor if one is not already running in this process.
    ///
    /// Uses `DashMap::entry` so two concurrent callers racing on the same
    /// match never spawn two competing actors for it.
    pub fn get_or_spawn(&self, tournament_match_id: i64) -> MatchActorHandle {
        let match_actor_id = actor_id_for(tournament_match_id);
        self.actors
            .entry(match_actor_id)
            .or_insert_with(|| {
                let initial = self
                    .storage
                    .load(match_actor_id)
                    .ok()
                    .flatten()
                    .unwrap_or_else(|| MatchState::new_scheduled(match_actor_id, tournament_match_id));
                actor::spawn(initial, self.storage.clone(), self.archiver.clone())
            })
            .clone()
    }

    /// Get the handle for an already-running actor without spawning one.
    pub fn get(&self, tournament_match_id: i64) -> Result<MatchActorHandle> {
        let match_actor_id = actor_id_for(tournament_match_id);
        self.actors
            .get(&match_actor_id)
            .map(|entry| entry.clone())
            .ok_or_else(|| Error::ActorNotFound(tournament_match_id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn actor_id_is_deterministic() {
        assert_eq!(actor_id_for(7), actor_id_for(7));
        assert_ne!(actor_id_for(7), actor_id_for(8));
    }
}
