// Registros crudos de la API v2 de SoundCloud y el trait del cliente externo

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Usuario embebido en un track
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct RawUser {
    pub username: Option<String>,
    pub permalink_url: Option<String>,
}

/// Formato de una transcodificación de audio
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TranscodingFormat {
    pub protocol: String,
    pub mime_type: String,
}

/// Transcodificación disponible para un track
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Transcoding {
    pub url: String,
    pub format: TranscodingFormat,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Media {
    #[serde(default)]
    pub transcodings: Vec<Transcoding>,
}

/// Track tal como lo devuelve la API.
///
/// Las playlists grandes devuelven "stubs": solo `id`, sin `title`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct RawTrack {
    pub id: u64,
    pub title: Option<String>,
    pub permalink_url: Option<String>,
    pub artwork_url: Option<String>,
    /// Duración en milisegundos
    pub duration: Option<u64>,
    pub playback_count: Option<u64>,
    pub reposts_count: Option<u64>,
    pub user: Option<RawUser>,
    pub media: Option<Media>,
    pub track_authorization: Option<String>,
}

impl RawTrack {
    /// Stub de playlist: sin título, hay que pedirlo aparte
    pub fn is_stub(&self) -> bool {
        self.title.as_deref().map_or(true, str::is_empty)
    }

    /// Transcodificación progresiva (MP3 primero), si no HLS sin cifrar
    pub fn best_transcoding(&self) -> Option<&Transcoding> {
        let transcodings = &self.media.as_ref()?.transcodings;
        transcodings
            .iter()
            .find(|t| t.format.protocol == "progressive" && t.format.mime_type.contains("mpeg"))
            .or_else(|| transcodings.iter().find(|t| t.format.protocol == "progressive"))
            .or_else(|| {
                transcodings
                    .iter()
                    .find(|t| t.format.protocol == "hls" && !t.url.contains("encrypted"))
            })
    }
}

/// Playlist tal como la devuelve la API
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct RawPlaylist {
    pub id: u64,
    pub title: Option<String>,
    pub permalink_url: Option<String>,
    pub artwork_url: Option<String>,
    #[serde(default)]
    pub tracks: Vec<RawTrack>,
}

/// Entidad devuelta por `/resolve`, discriminada por `kind`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ResolvedResource {
    Track(RawTrack),
    Playlist(RawPlaylist),
    /// Usuarios, sistemas de playlists, etc.
    #[serde(other)]
    Other,
}

/// Operaciones que el plugin necesita del cliente de SoundCloud
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SoundCloudApi: Send + Sync {
    /// Busca tracks
    async fn search_tracks(&self, query: &str, limit: u32) -> Result<Vec<RawTrack>>;

    /// Busca playlists (pueden venir sin detalle completo)
    async fn search_playlists(&self, query: &str, limit: u32) -> Result<Vec<RawPlaylist>>;

    /// Detalle completo de una playlist
    async fn fetch_playlist(&self, id: u64) -> Result<RawPlaylist>;

    /// Resuelve una URL pública; `None` si no existe
    async fn resolve_url(&self, url: &str) -> Result<Option<ResolvedResource>>;

    /// Búsqueda masiva por IDs (máximo 50 por llamada)
    async fn fetch_tracks(&self, ids: &[u64]) -> Result<Vec<RawTrack>>;

    /// Tracks relacionados con un ID o URL
    async fn related_tracks(&self, id_or_url: &str, limit: u32) -> Result<Vec<RawTrack>>;

    /// URL directa de stream; `None` cuando SoundCloud no da enlace
    async fn stream_link(&self, id_or_url: &str) -> Result<Option<String>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_stub_detection() {
        let stub: RawTrack = serde_json::from_str(r#"{"id": 12}"#).unwrap();
        assert!(stub.is_stub());

        let empty_title: RawTrack = serde_json::from_str(r#"{"id": 12, "title": ""}"#).unwrap();
        assert!(empty_title.is_stub());

        let full: RawTrack =
            serde_json::from_str(r#"{"id": 12, "title": "Song", "duration": 1000}"#).unwrap();
        assert!(!full.is_stub());
    }

    #[test]
    fn test_resolved_resource_kinds() {
        let track: ResolvedResource =
            serde_json::from_str(r#"{"kind": "track", "id": 1, "title": "A"}"#).unwrap();
        assert!(matches!(track, ResolvedResource::Track(t) if t.id == 1));

        let playlist: ResolvedResource = serde_json::from_str(
            r#"{"kind": "playlist", "id": 2, "title": "P", "tracks": [{"id": 3}]}"#,
        )
        .unwrap();
        match playlist {
            ResolvedResource::Playlist(p) => assert_eq!(p.tracks.len(), 1),
            other => panic!("unexpected resource: {:?}", other),
        }

        let user: ResolvedResource =
            serde_json::from_str(r#"{"kind": "user", "id": 4, "username": "dj"}"#).unwrap();
        assert_eq!(user, ResolvedResource::Other);
    }

    #[test]
    fn test_best_transcoding_prefers_progressive_mp3() {
        let track: RawTrack = serde_json::from_str(
            r#"{
                "id": 1,
                "title": "A",
                "media": {"transcodings": [
                    {"url": "https://x/hls", "format": {"protocol": "hls", "mime_type": "audio/mpeg"}},
                    {"url": "https://x/prog-mp4", "format": {"protocol": "progressive", "mime_type": "audio/mp4"}},
                    {"url": "https://x/prog-mp3", "format": {"protocol": "progressive", "mime_type": "audio/mpeg"}}
                ]}
            }"#,
        )
        .unwrap();
        assert_eq!(track.best_transcoding().map(|t| t.url.as_str()), Some("https://x/prog-mp3"));

        let no_media = RawTrack { id: 2, ..RawTrack::default() };
        assert!(no_media.best_transcoding().is_none());
    }
}
