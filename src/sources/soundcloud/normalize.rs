// Conversión de registros crudos a los valores que consume el bot

use serde::Serialize;

use super::api::{RawPlaylist, RawTrack};
use crate::error::{Result, SoundCloudError};

/// Track normalizado
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedTrack {
    pub id: String,
    pub name: Option<String>,
    pub url: Option<String>,
    pub thumbnail: Option<String>,
    /// Segundos (milisegundos de la API / 1000)
    pub duration: f64,
    pub views: u64,
    pub reposts: u64,
    pub uploader: Option<String>,
    pub uploader_url: Option<String>,
}

impl From<RawTrack> for NormalizedTrack {
    fn from(raw: RawTrack) -> Self {
        let user = raw.user.unwrap_or_default();
        Self {
            id: raw.id.to_string(),
            name: raw.title,
            url: raw.permalink_url,
            thumbnail: raw.artwork_url,
            duration: raw.duration.unwrap_or(0) as f64 / 1000.0,
            views: raw.playback_count.unwrap_or(0),
            reposts: raw.reposts_count.unwrap_or(0),
            uploader: user.username,
            uploader_url: user.permalink_url,
        }
    }
}

/// Playlist normalizada. Nunca está vacía.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedPlaylist {
    pub id: String,
    pub name: Option<String>,
    pub url: Option<String>,
    pub thumbnail: Option<String>,
    tracks: Vec<NormalizedTrack>,
}

impl NormalizedPlaylist {
    pub fn new(
        id: String,
        name: Option<String>,
        url: Option<String>,
        thumbnail: Option<String>,
        tracks: Vec<NormalizedTrack>,
    ) -> Result<Self> {
        if tracks.is_empty() {
            return Err(SoundCloudError::EmptyPlaylist);
        }
        Ok(Self {
            id,
            name,
            url,
            thumbnail,
            tracks,
        })
    }

    /// Usa los metadatos de `raw` y los tracks ya resueltos por el batch resolver.
    /// Los tracks que trae `raw` se ignoran.
    pub fn from_raw(raw: RawPlaylist, resolved: Vec<RawTrack>) -> Result<Self> {
        Self::new(
            raw.id.to_string(),
            raw.title,
            raw.permalink_url,
            raw.artwork_url,
            resolved.into_iter().map(NormalizedTrack::from).collect(),
        )
    }

    pub fn tracks(&self) -> &[NormalizedTrack] {
        &self.tracks
    }

    pub fn into_tracks(self) -> Vec<NormalizedTrack> {
        self.tracks
    }
}
