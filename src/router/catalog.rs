//! External song-catalog client (§4.E): resolves a bare `song_id` +
//! difficulty into the metadata a `MatchSong` needs, so the match actor
//! itself never has to know about the catalog service.

use serde::Deserialize;

use crate::domain::member::TeamId;
use crate::domain::song::{MatchSong, SYSTEM_PICKER_MEMBER_ID};
use crate::error::Result;

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogSongMetadata {
    pub song_id: i64,
    pub title: String,
    pub element: Option<String>,
    pub cover_url: Option<String>,
    pub bpm: Option<u16>,
}

#[derive(Clone)]
pub struct CatalogClient {
    http: reqwest::Client,
    base_url: String,
}

impl CatalogClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self { http: reqwest::Client::new(), base_url: base_url.into() }
    }

    pub async fn fetch_song(&self, song_id: i64) -> Result<CatalogSongMetadata> {
        let url = format!("{}/songs/{song_id}", self.base_url);
        let metadata = self.http.get(url).send().await?.error_for_status()?.json().await?;
        Ok(metadata)
    }

    /// Build a `MatchSong` for a tiebreaker pick: looks up metadata, then
    /// stamps it as system-picked per the actor's `SelectTiebreakerSong` contract.
    pub async fn resolve_tiebreaker_song(&self, song_id: i64, selected_difficulty: String) -> Result<MatchSong> {
        let metadata = self.fetch_song(song_id).await?;
        Ok(MatchSong::scheduled(
            metadata.song_id,
            metadata.title,
            selected_difficulty,
            metadata.element,
            metadata.cover_url,
            metadata.bpm,
            TeamId::A,
            SYSTEM_PICKER_MEMBER_ID,
            true,
        ))
    }
}
