// Cliente HTTP mínimo para la API v2 de SoundCloud
//
// No descubre client_id ni reintenta: usa las credenciales configuradas o
// va en modo anónimo.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, error, info};

use super::api::{RawPlaylist, RawTrack, ResolvedResource, SoundCloudApi};
use super::validate::canonicalize;
use crate::config::Config;

#[derive(Debug, Deserialize)]
struct Collection<T> {
    #[serde(default = "Vec::new")]
    collection: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct StreamResponse {
    url: Option<String>,
}

pub struct HttpSoundCloudApi {
    client: reqwest::Client,
    api_base: String,
    client_id: Option<String>,
    oauth_token: Option<String>,
}

impl HttpSoundCloudApi {
    pub fn new(config: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            client_id: config.client_id.clone(),
            oauth_token: config.oauth_token.clone(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.api_base, path)
    }

    /// Añade client_id y cabecera OAuth si están configurados
    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        let request = match &self.client_id {
            Some(client_id) => request.query(&[("client_id", client_id)]),
            None => request,
        };
        match &self.oauth_token {
            Some(token) => request.header("Authorization", format!("OAuth {}", token)),
            None => request,
        }
    }

    /// GET autenticado; `None` en 404
    async fn get_optional<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<Option<T>> {
        debug!("🌐 GET {}", url);

        let response = self
            .authorize(self.client.get(url).query(query))
            .send()
            .await
            .with_context(|| format!("Request to {} failed", url))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            error!("❌ SoundCloud API error: {} - {}", status, error_text);
            anyhow::bail!("SoundCloud API error: {} - {}", status, error_text);
        }

        let body = response
            .json::<T>()
            .await
            .with_context(|| format!("Invalid response from {}", url))?;
        Ok(Some(body))
    }

    async fn get<T: DeserializeOwned>(&self, url: &str, query: &[(&str, String)]) -> Result<T> {
        self.get_optional(url, query)
            .await?
            .with_context(|| format!("SoundCloud API error: 404 Not Found - {}", url))
    }

    /// Obtiene el track completo a partir de un ID numérico o una URL pública
    async fn track(&self, id_or_url: &str) -> Result<Option<RawTrack>> {
        if let Ok(id) = id_or_url.parse::<u64>() {
            return self.get_optional(&self.endpoint(&format!("/tracks/{}", id)), &[]).await;
        }

        match self.resolve_url(&canonicalize(id_or_url)).await? {
            Some(ResolvedResource::Track(track)) => Ok(Some(track)),
            Some(_) => anyhow::bail!("{} is not a SoundCloud track", id_or_url),
            None => Ok(None),
        }
    }

    async fn track_id(&self, id_or_url: &str) -> Result<u64> {
        if let Ok(id) = id_or_url.parse::<u64>() {
            return Ok(id);
        }
        self.track(id_or_url)
            .await?
            .map(|t| t.id)
            .with_context(|| format!("Track not found: {}", id_or_url))
    }
}

#[async_trait]
impl SoundCloudApi for HttpSoundCloudApi {
    async fn search_tracks(&self, query: &str, limit: u32) -> Result<Vec<RawTrack>> {
        debug!("🔍 Búsqueda SoundCloud (tracks): {}", query);

        let data: Collection<RawTrack> = self
            .get(
                &self.endpoint("/search/tracks"),
                &[("q", query.to_string()), ("limit", limit.to_string())],
            )
            .await?;

        info!("✅ SoundCloud: {} tracks", data.collection.len());
        Ok(data.collection)
    }

    async fn search_playlists(&self, query: &str, limit: u32) -> Result<Vec<RawPlaylist>> {
        debug!("🔍 Búsqueda SoundCloud (playlists): {}", query);

        let data: Collection<RawPlaylist> = self
            .get(
                &self.endpoint("/search/playlists"),
                &[("q", query.to_string()), ("limit", limit.to_string())],
            )
            .await?;

        info!("✅ SoundCloud: {} playlists", data.collection.len());
        Ok(data.collection)
    }

    async fn fetch_playlist(&self, id: u64) -> Result<RawPlaylist> {
        self.get(&self.endpoint(&format!("/playlists/{}", id)), &[]).await
    }

    async fn resolve_url(&self, url: &str) -> Result<Option<ResolvedResource>> {
        self.get_optional(&self.endpoint("/resolve"), &[("url", url.to_string())])
            .await
    }

    async fn fetch_tracks(&self, ids: &[u64]) -> Result<Vec<RawTrack>> {
        let ids = ids.iter().map(u64::to_string).collect::<Vec<_>>().join(",");
        self.get(&self.endpoint("/tracks"), &[("ids", ids)]).await
    }

    async fn related_tracks(&self, id_or_url: &str, limit: u32) -> Result<Vec<RawTrack>> {
        let id = self.track_id(id_or_url).await?;
        let data: Collection<RawTrack> = self
            .get(
                &self.endpoint(&format!("/tracks/{}/related", id)),
                &[("limit", limit.to_string())],
            )
            .await?;
        Ok(data.collection)
    }

    async fn stream_link(&self, id_or_url: &str) -> Result<Option<String>> {
        let Some(track) = self.track(id_or_url).await? else {
            return Ok(None);
        };
        let Some(transcoding) = track.best_transcoding() else {
            debug!("🔇 Track {} sin transcodificaciones reproducibles", track.id);
            return Ok(None);
        };

        let query: Vec<(&str, String)> = track
            .track_authorization
            .iter()
            .map(|auth| ("track_authorization", auth.clone()))
            .collect();

        let stream: Option<StreamResponse> = self.get_optional(&transcoding.url, &query).await?;
        Ok(stream.and_then(|s| s.url))
    }
}
