//! # SoundCloud Source
//!
//! Adds SoundCloud as a content source for the bot. Everything here maps the
//! SoundCloud v2 API onto the bot's [`Song`] and [`Playlist`] types.
//!
//! ## Flow
//!
//! 1. Arguments are validated before any network call ([`validate`]).
//! 2. The injected [`SoundCloudApi`] client is queried.
//! 3. Playlist stubs are completed in batches of 50 ([`resolver`]).
//! 4. Raw records are normalized ([`normalize`]) and wrapped for the bot.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use open_music_soundcloud::config::Config;
//! use open_music_soundcloud::sources::SoundCloudPlugin;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let plugin = SoundCloudPlugin::from_config(&Config::load()?)?;
//! let results = plugin.search("lofi", "track", 5).await?;
//! println!("{} results", results.len());
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod http;
pub mod normalize;
pub mod resolver;
pub mod validate;

use async_trait::async_trait;
use futures::future::try_join_all;
use songbird::input::Input;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub use api::{RawPlaylist, RawTrack, ResolvedResource, SoundCloudApi};
pub use http::HttpSoundCloudApi;
pub use normalize::{NormalizedPlaylist, NormalizedTrack};
pub use validate::{SearchArgs, SearchType, DEFAULT_SEARCH_LIMIT};

use super::{MusicSource, Playlist, ResolveOptions, Resolved, SearchResults, Song, SOURCE_NAME};
use crate::config::Config;
use crate::error::{Result, SoundCloudError};

/// Límite de tracks relacionados por defecto
pub const RELATED_LIMIT: u32 = 10;

/// Plugin de SoundCloud para el bot
#[derive(Clone)]
pub struct SoundCloudPlugin {
    api: Arc<dyn SoundCloudApi>,
    default_search_limit: u32,
    related_limit: u32,
}

impl SoundCloudPlugin {
    pub fn new(api: Arc<dyn SoundCloudApi>) -> Self {
        Self {
            api,
            default_search_limit: DEFAULT_SEARCH_LIMIT,
            related_limit: RELATED_LIMIT,
        }
    }

    /// Crea el plugin con el cliente HTTP y las credenciales de `config`
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        config.validate()?;
        if config.is_anonymous() {
            info!("🔓 SoundCloud en modo anónimo");
        }
        let api = HttpSoundCloudApi::new(config)?;
        Ok(Self {
            api: Arc::new(api),
            default_search_limit: config.default_search_limit,
            related_limit: config.related_limit,
        })
    }

    /// Busca tracks o playlists en SoundCloud
    pub async fn search(&self, query: &str, kind: &str, limit: i64) -> Result<SearchResults> {
        let args = validate::validate_search(query, kind, limit)?;
        debug!("🔍 Buscando en SoundCloud ({}): {}", args.kind, args.query);

        match args.kind {
            SearchType::Track => self.search_songs(&args).await.map(SearchResults::Songs),
            SearchType::Playlist => self
                .search_playlist_results(&args)
                .await
                .map(SearchResults::Playlists),
        }
    }

    /// Búsqueda de tracks con el límite por defecto
    pub async fn search_tracks(&self, query: &str) -> Result<Vec<Song>> {
        let args = validate::validate_search(query, SearchType::Track.as_str(), self.default_search_limit.into())?;
        self.search_songs(&args).await
    }

    /// Búsqueda de playlists con el límite por defecto
    pub async fn search_playlists(&self, query: &str) -> Result<Vec<Playlist>> {
        let args = validate::validate_search(
            query,
            SearchType::Playlist.as_str(),
            self.default_search_limit.into(),
        )?;
        self.search_playlist_results(&args).await
    }

    async fn search_songs(&self, args: &SearchArgs) -> Result<Vec<Song>> {
        let tracks = self.api.search_tracks(&args.query, args.limit).await?;
        if tracks.is_empty() {
            return Err(SoundCloudError::NoResult {
                query: args.query.clone(),
                kind: args.kind,
            });
        }

        info!("✅ SoundCloud: {} canciones para '{}'", tracks.len(), args.query);
        Ok(tracks
            .into_iter()
            .map(|t| Song::new(NormalizedTrack::from(t), None))
            .collect())
    }

    async fn search_playlist_results(&self, args: &SearchArgs) -> Result<Vec<Playlist>> {
        let summaries = self.api.search_playlists(&args.query, args.limit).await?;

        let playlists = try_join_all(summaries.into_iter().map(|summary| async move {
            let detail = self.api.fetch_playlist(summary.id).await?;
            self.build_playlist(detail, None).await
        }))
        .await?;

        let playlists: Vec<Playlist> = playlists.into_iter().flatten().collect();
        info!("✅ SoundCloud: {} playlists para '{}'", playlists.len(), args.query);
        Ok(playlists)
    }

    /// Resuelve stubs, normaliza y envuelve. `None` si queda vacía.
    async fn build_playlist(
        &self,
        mut raw: RawPlaylist,
        options: Option<&ResolveOptions>,
    ) -> Result<Option<Playlist>> {
        if raw.tracks.is_empty() {
            warn!("⚠️ Playlist {} sin tracks, se descarta", raw.id);
            return Ok(None);
        }

        let tracks = std::mem::take(&mut raw.tracks);
        let resolved = resolver::resolve_tracks(self.api.as_ref(), tracks).await?;

        match NormalizedPlaylist::from_raw(raw, resolved) {
            Ok(info) => Ok(Some(Playlist::new(info, options))),
            Err(SoundCloudError::EmptyPlaylist) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Verifica si la URL es de SoundCloud
    pub fn validate(&self, url: &str) -> bool {
        validate::is_soundcloud_url(url)
    }

    /// Resuelve una URL pública de track o playlist
    pub async fn resolve(&self, url: &str, options: ResolveOptions) -> Result<Resolved> {
        validate::validate_url(url)?;
        let url = validate::canonicalize(url);
        debug!("🔗 Resolviendo URL de SoundCloud: {}", url);

        let resource = match self.api.resolve_url(&url).await {
            Ok(Some(resource)) => resource,
            Ok(None) => {
                warn!("⚠️ URL no encontrada en SoundCloud: {}", url);
                return Err(SoundCloudError::NotSupported);
            }
            Err(e) => {
                warn!("⚠️ No se pudo resolver {}: {}", url, e);
                return Err(SoundCloudError::NotSupported);
            }
        };

        match resource {
            ResolvedResource::Track(track) => Ok(Resolved::Song(Song::new(
                NormalizedTrack::from(track),
                Some(&options),
            ))),
            ResolvedResource::Playlist(playlist) => self
                .build_playlist(playlist, Some(&options))
                .await?
                .map(Resolved::Playlist)
                .ok_or(SoundCloudError::EmptyPlaylist),
            ResolvedResource::Other => {
                warn!("⚠️ Tipo de recurso no soportado: {}", url);
                Err(SoundCloudError::NotSupported)
            }
        }
    }

    /// Tracks relacionados, sin stubs. Una lista vacía es válida.
    pub async fn get_related_songs(&self, id_or_url: &str) -> Result<Vec<Song>> {
        let related = self.api.related_tracks(id_or_url, self.related_limit).await?;
        Ok(related
            .into_iter()
            .filter(|t| !t.is_stub())
            .map(|t| Song::new(NormalizedTrack::from(t), None))
            .collect())
    }

    /// URL directa de stream. Sin enlace = límite de SoundCloud alcanzado.
    pub async fn get_stream_url(&self, id_or_url: &str) -> Result<String> {
        match self.api.stream_link(id_or_url).await? {
            Some(link) => Ok(link),
            None => {
                warn!("⏳ SoundCloud no devolvió stream para {}", id_or_url);
                Err(SoundCloudError::RateLimited)
            }
        }
    }

    /// Pide el stream de la canción y crea el input de songbird
    pub async fn create_input(&self, song: &Song, client: reqwest::Client) -> Result<Input> {
        let stream_url = self.get_stream_url(song.lookup_key()).await?;
        let song = song.clone().with_stream_url(stream_url);
        Ok(song.input(client)?)
    }
}

#[async_trait]
impl MusicSource for SoundCloudPlugin {
    fn validate(&self, url: &str) -> bool {
        SoundCloudPlugin::validate(self, url)
    }

    async fn resolve(&self, url: &str, options: ResolveOptions) -> anyhow::Result<Resolved> {
        Ok(SoundCloudPlugin::resolve(self, url, options).await?)
    }

    async fn get_related_songs(&self, id_or_url: &str) -> anyhow::Result<Vec<Song>> {
        Ok(SoundCloudPlugin::get_related_songs(self, id_or_url).await?)
    }

    async fn get_stream_url(&self, id_or_url: &str) -> anyhow::Result<String> {
        Ok(SoundCloudPlugin::get_stream_url(self, id_or_url).await?)
    }

    fn source_name(&self) -> &'static str {
        SOURCE_NAME
    }
}
