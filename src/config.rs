//! Tunables and runtime configuration for the match-battle core.
//!
//! Values are read once from the process environment at binary startup and
//! passed down as plain data; neither the [`crate::resolver`] nor the
//! [`crate::actor`] read the environment themselves.

use std::env;
use std::net::SocketAddr;

/// Number of standard (non-tiebreaker) rounds scheduled in a match.
pub const STANDARD_ROUNDS_COUNT: usize = 6;
/// Health every team starts a match with.
pub const INITIAL_HEALTH: i64 = 100;
/// Health a team is restored to when its mirror fires.
pub const MIRROR_HEALTH_RESTORE: i64 = 20;
/// A digit of `0` in the percentage's fractional part counts as this instead.
pub const MAX_DAMAGE_DIGIT: u32 = 10;

/// Runtime configuration loaded from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address the HTTP router binds to.
    pub bind_addr: SocketAddr,
    /// Postgres connection string for the History Archiver.
    pub database_url: String,
    /// Directory backing the embedded per-actor storage.
    pub storage_path: String,
    /// Base URL of the external song-catalog service consulted by the router.
    pub song_catalog_base_url: String,
}

impl Config {
    /// Build configuration from environment variables, falling back to
    /// development-friendly defaults for anything unset.
    pub fn from_env() -> Self {
        Self {
            bind_addr: env::var("BIND_ADDR")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or_else(|| "0.0.0.0:8080".parse().unwrap()),
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "postgres://localhost/music_battle".to_owned()),
            storage_path: env::var("MATCH_STORAGE_PATH").unwrap_or_else(|_| "./data/matches".to_owned()),
            song_catalog_base_url: env::var("SONG_CATALOG_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:9000".to_owned()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_env_unset() {
        for key in ["BIND_ADDR", "DATABASE_URL", "MATCH_STORAGE_PATH", "SONG_CATALOG_BASE_URL"] {
            env::remove_var(key);
        }
        let config = Config::from_env();
        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.storage_path, "./data/matches");
    }
}
