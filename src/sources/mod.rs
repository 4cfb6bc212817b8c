pub mod soundcloud;

use anyhow::Result;
use async_trait::async_trait;
use serenity::model::id::UserId;
use songbird::input::{HttpRequest, Input};
use std::time::Duration;

pub use soundcloud::{
    NormalizedPlaylist, NormalizedTrack, SearchType, SoundCloudApi, SoundCloudPlugin,
};

/// Nombre de la fuente que se adjunta a cada canción y playlist
pub const SOURCE_NAME: &str = "soundcloud";

/// Trait común para las fuentes que el bot puede consultar con una URL
#[async_trait]
pub trait MusicSource: Send + Sync {
    /// Verifica si la URL es válida para esta fuente
    fn validate(&self, url: &str) -> bool;

    /// Convierte una URL validada en una canción o playlist
    async fn resolve(&self, url: &str, options: ResolveOptions) -> Result<Resolved>;

    /// Canciones relacionadas para autoplay
    async fn get_related_songs(&self, id_or_url: &str) -> Result<Vec<Song>>;

    /// URL directa de stream para reproducir
    async fn get_stream_url(&self, id_or_url: &str) -> Result<String>;

    /// Nombre de la fuente
    fn source_name(&self) -> &'static str;
}

/// Contexto de la petición: quién la hizo y metadata libre del bot
#[derive(Debug, Clone, Default)]
pub struct ResolveOptions {
    pub member: Option<UserId>,
    pub metadata: Option<serde_json::Value>,
}

impl ResolveOptions {
    pub fn requested_by(member: UserId) -> Self {
        Self {
            member: Some(member),
            metadata: None,
        }
    }

    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

/// Canción lista para encolar
#[derive(Debug, Clone)]
pub struct Song {
    info: NormalizedTrack,
    source: &'static str,
    member: Option<UserId>,
    metadata: Option<serde_json::Value>,
    stream_url: Option<String>,
}

impl Song {
    pub fn new(info: NormalizedTrack, options: Option<&ResolveOptions>) -> Self {
        Self {
            info,
            source: SOURCE_NAME,
            member: options.and_then(|o| o.member),
            metadata: options.and_then(|o| o.metadata.clone()),
            stream_url: None,
        }
    }

    // Getters
    pub fn id(&self) -> &str {
        &self.info.id
    }
    pub fn name(&self) -> Option<&str> {
        self.info.name.as_deref()
    }
    pub fn url(&self) -> Option<&str> {
        self.info.url.as_deref()
    }
    pub fn thumbnail(&self) -> Option<&str> {
        self.info.thumbnail.as_deref()
    }
    /// Duraciones negativas o no finitas cuentan como cero
    pub fn duration(&self) -> Duration {
        Duration::try_from_secs_f64(self.info.duration).unwrap_or_default()
    }
    pub fn views(&self) -> u64 {
        self.info.views
    }
    pub fn reposts(&self) -> u64 {
        self.info.reposts
    }
    pub fn uploader(&self) -> Option<&str> {
        self.info.uploader.as_deref()
    }
    pub fn uploader_url(&self) -> Option<&str> {
        self.info.uploader_url.as_deref()
    }
    pub fn source(&self) -> &'static str {
        self.source
    }
    pub fn member(&self) -> Option<UserId> {
        self.member
    }
    pub fn metadata(&self) -> Option<&serde_json::Value> {
        self.metadata.as_ref()
    }
    pub fn stream_url(&self) -> Option<&str> {
        self.stream_url.as_deref()
    }
    pub fn info(&self) -> &NormalizedTrack {
        &self.info
    }

    pub fn with_stream_url(mut self, stream_url: String) -> Self {
        self.stream_url = Some(stream_url);
        self
    }

    /// Lo que se le pasa a la fuente para pedir stream o relacionados:
    /// la URL pública si existe, si no el ID
    pub fn lookup_key(&self) -> &str {
        self.url().unwrap_or_else(|| self.id())
    }

    /// Duración en formato `m:ss` o `h:mm:ss`
    pub fn formatted_duration(&self) -> String {
        let total = self.info.duration as u64;
        let (hours, minutes, seconds) = (total / 3600, (total % 3600) / 60, total % 60);
        if hours > 0 {
            format!("{}:{:02}:{:02}", hours, minutes, seconds)
        } else {
            format!("{}:{:02}", minutes, seconds)
        }
    }

    /// Crea el input de songbird desde la URL directa de stream.
    ///
    /// Solo enlaces progresivos: `HttpRequest` reproduce un único archivo,
    /// no una playlist HLS (`.m3u8`).
    pub fn input(&self, client: reqwest::Client) -> Result<Input> {
        let Some(stream_url) = &self.stream_url else {
            anyhow::bail!("La canción {} no tiene URL de stream", self.id());
        };
        if is_hls_link(stream_url) {
            anyhow::bail!("Stream HLS no soportado para la canción {}: {}", self.id(), stream_url);
        }
        Ok(Input::from(HttpRequest::new(client, stream_url.clone())))
    }
}

/// `true` si la URL apunta a una playlist HLS
fn is_hls_link(url: &str) -> bool {
    url::Url::parse(url)
        .map(|u| u.path().ends_with(".m3u8"))
        .unwrap_or(false)
}

/// Playlist con sus canciones ya resueltas
#[derive(Debug, Clone)]
pub struct Playlist {
    id: String,
    name: Option<String>,
    url: Option<String>,
    thumbnail: Option<String>,
    songs: Vec<Song>,
    source: &'static str,
    member: Option<UserId>,
    metadata: Option<serde_json::Value>,
}

impl Playlist {
    pub fn new(mut info: NormalizedPlaylist, options: Option<&ResolveOptions>) -> Self {
        let id = std::mem::take(&mut info.id);
        let name = info.name.take();
        let url = info.url.take();
        let thumbnail = info.thumbnail.take();

        Self {
            id,
            name,
            url,
            thumbnail,
            songs: info
                .into_tracks()
                .into_iter()
                .map(|t| Song::new(t, options))
                .collect(),
            source: SOURCE_NAME,
            member: options.and_then(|o| o.member),
            metadata: options.and_then(|o| o.metadata.clone()),
        }
    }

    // Getters
    pub fn id(&self) -> &str {
        &self.id
    }
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }
    pub fn thumbnail(&self) -> Option<&str> {
        self.thumbnail.as_deref()
    }
    pub fn songs(&self) -> &[Song] {
        &self.songs
    }
    pub fn into_songs(self) -> Vec<Song> {
        self.songs
    }
    pub fn source(&self) -> &'static str {
        self.source
    }
    pub fn member(&self) -> Option<UserId> {
        self.member
    }
    pub fn metadata(&self) -> Option<&serde_json::Value> {
        self.metadata.as_ref()
    }

    /// Suma de las duraciones de todas las canciones
    pub fn duration(&self) -> Duration {
        self.songs.iter().map(Song::duration).sum()
    }
}

/// Resultado de resolver una URL
#[derive(Debug, Clone)]
pub enum Resolved {
    Song(Song),
    Playlist(Playlist),
}

/// Resultado de una búsqueda: canciones o playlists según el tipo pedido
#[derive(Debug, Clone)]
pub enum SearchResults {
    Songs(Vec<Song>),
    Playlists(Vec<Playlist>),
}

impl SearchResults {
    pub fn len(&self) -> usize {
        match self {
            SearchResults::Songs(songs) => songs.len(),
            SearchResults::Playlists(playlists) => playlists.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn track(id: &str, duration: f64) -> NormalizedTrack {
        NormalizedTrack {
            id: id.to_string(),
            name: Some(format!("Track {}", id)),
            url: Some(format!("https://soundcloud.com/artist/track-{}", id)),
            thumbnail: None,
            duration,
            views: 0,
            reposts: 0,
            uploader: Some("artist".to_string()),
            uploader_url: None,
        }
    }

    #[test]
    fn test_song_carries_options() {
        let options = ResolveOptions::requested_by(UserId::new(42))
            .with_metadata(serde_json::json!({ "channel": "music" }));
        let song = Song::new(track("1", 180.0), Some(&options));

        assert_eq!(song.source(), "soundcloud");
        assert_eq!(song.member(), Some(UserId::new(42)));
        assert_eq!(song.metadata(), Some(&serde_json::json!({ "channel": "music" })));
        assert_eq!(song.duration(), Duration::from_secs(180));
    }

    #[test]
    fn test_formatted_duration() {
        assert_eq!(Song::new(track("1", 185.5), None).formatted_duration(), "3:05");
        assert_eq!(Song::new(track("2", 3725.0), None).formatted_duration(), "1:02:05");
        assert_eq!(Song::new(track("3", 0.0), None).formatted_duration(), "0:00");
    }

    #[test]
    fn test_lookup_key_falls_back_to_id() {
        let mut info = track("77", 1.0);
        info.url = None;
        assert_eq!(Song::new(info, None).lookup_key(), "77");
        assert_eq!(
            Song::new(track("78", 1.0), None).lookup_key(),
            "https://soundcloud.com/artist/track-78"
        );
    }

    #[test]
    fn test_input_requires_stream_url() {
        let song = Song::new(track("1", 1.0), None);
        assert!(song.input(reqwest::Client::new()).is_err());

        let song = song.with_stream_url("https://cf-media.sndcdn.com/abc.mp3".to_string());
        assert!(song.input(reqwest::Client::new()).is_ok());
    }

    #[test]
    fn test_input_rejects_hls_playlist() {
        let song = Song::new(track("1", 1.0), None).with_stream_url(
            "https://cf-hls-media.sndcdn.com/playlist/abc/playlist.m3u8?Policy=x".to_string(),
        );
        assert!(song.input(reqwest::Client::new()).is_err());
    }

    #[test]
    fn test_invalid_duration_does_not_panic() {
        assert_eq!(Song::new(track("1", -5.0), None).duration(), Duration::ZERO);
        assert_eq!(Song::new(track("2", f64::NAN), None).duration(), Duration::ZERO);
        assert_eq!(Song::new(track("3", -5.0), None).formatted_duration(), "0:00");
    }

    #[test]
    fn test_playlist_propagates_options_to_songs() {
        let options = ResolveOptions::requested_by(UserId::new(7));
        let info = NormalizedPlaylist::new(
            "9".to_string(),
            Some("Mix".to_string()),
            None,
            None,
            vec![track("1", 60.0), track("2", 90.0)],
        )
        .unwrap();
        let playlist = Playlist::new(info, Some(&options));

        assert_eq!(playlist.songs().len(), 2);
        assert_eq!(playlist.member(), Some(UserId::new(7)));
        assert!(playlist.songs().iter().all(|s| s.member() == Some(UserId::new(7))));
        assert_eq!(playlist.duration(), Duration::from_secs(150));
    }
}
