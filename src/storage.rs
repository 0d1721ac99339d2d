//! Embedded per-actor durability (§4.D "Embedded Storage").
//!
//! Every match actor snapshots its full `MatchState` into a `sled` tree keyed
//! by its `match_actor_id` after each mutation. This is separate from the
//! [`crate::archiver`], which only records finished rounds/matches into the
//! external relational store; `MatchStorage` exists so a crashed actor can be
//! rehydrated to exactly where it left off.

use uuid::Uuid;

use crate::domain::state::MatchState;
use crate::error::Result;

const STATE_KEY_PREFIX: &str = "match_state:";

/// Thin wrapper around a `sled::Db`, storing one JSON-encoded snapshot per actor.
#[derive(Clone)]
pub struct MatchStorage {
    db: sled::Db,
}

impl MatchStorage {
    pub fn open(path: &str) -> Result<Self> {
        let db = sled::open(path)?;
        Ok(Self { db })
    }

    fn key(match_actor_id: Uuid) -> String {
        format!("{STATE_KEY_PREFIX}{match_actor_id}")
    }

    /// Overwrite the snapshot for `state.match_actor_id`.
    pub fn save(&self, state: &MatchState) -> Result<()> {
        let encoded = serde_json::to_vec(state)?;
        self.db.insert(Self::key(state.match_actor_id), encoded)?;
        self.db.flush()?;
        Ok(())
    }

    /// Load the most recent snapshot for `match_actor_id`, if one exists.
    pub fn load(&self, match_actor_id: Uuid) -> Result<Option<MatchState>> {
        match self.db.get(Self::key(match_actor_id))? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::state::MatchStatus;

    fn tmp_storage() -> MatchStorage {
        let dir = tempdir();
        MatchStorage::open(&dir).unwrap()
    }

    fn tempdir() -> String {
        let mut path = std::env::temp_dir();
        path.push(format!("music_battle_core_test_{}", Uuid::new_v4()));
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn round_trips_a_snapshot() {
        let storage = tmp_storage();
        let id = Uuid::new_v4();
        let state = MatchState::new_scheduled(id, 42);
        storage.save(&state).unwrap();

        let loaded = storage.load(id).unwrap().unwrap();
        assert_eq!(loaded.match_actor_id, id);
        assert_eq!(loaded.tournament_match_id, 42);
        assert_eq!(loaded.status, MatchStatus::Scheduled);
    }

    #[test]
    fn load_of_unknown_actor_is_none() {
        let storage = tmp_storage();
        assert!(storage.load(Uuid::new_v4()).unwrap().is_none());
    }
}
