// Validación de argumentos y URLs antes de tocar la red

use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use crate::error::{Result, SoundCloudError};

pub const DEFAULT_SEARCH_LIMIT: u32 = 10;

static SOUNDCLOUD_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https?://(?:(?:www|m)\.)?(soundcloud\.com|snd\.sc)/(.*)$")
        .expect("valid SoundCloud URL regex")
});

static HOST_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"://(m|www)\.").expect("valid host prefix regex"));

/// Tipos de búsqueda soportados
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchType {
    #[default]
    Track,
    Playlist,
}

impl SearchType {
    pub const SUPPORTED: [SearchType; 2] = [SearchType::Track, SearchType::Playlist];

    pub fn as_str(&self) -> &'static str {
        match self {
            SearchType::Track => "track",
            SearchType::Playlist => "playlist",
        }
    }
}

impl fmt::Display for SearchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchType {
    type Err = SoundCloudError;

    fn from_str(s: &str) -> Result<Self> {
        Self::SUPPORTED
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| SoundCloudError::invalid_argument("type", "\"track\" or \"playlist\"", s))
    }
}

/// Argumentos de búsqueda ya validados
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchArgs {
    pub query: String,
    pub kind: SearchType,
    pub limit: u32,
}

/// Valida `(query, type, limit)` sin efectos secundarios
pub fn validate_search(query: &str, kind: &str, limit: i64) -> Result<SearchArgs> {
    let kind = kind.parse::<SearchType>()?;
    let limit = u32::try_from(limit)
        .ok()
        .filter(|l| *l >= 1)
        .ok_or_else(|| SoundCloudError::invalid_argument("limit", "natural number", limit))?;

    Ok(SearchArgs {
        query: query.to_string(),
        kind,
        limit,
    })
}

/// Verifica si una URL pertenece a SoundCloud
pub fn is_soundcloud_url(url: &str) -> bool {
    SOUNDCLOUD_URL.is_match(url)
}

/// Quita los prefijos `www.` y `m.` del host
pub fn canonicalize(url: &str) -> String {
    HOST_PREFIX.replace_all(url, "://").into_owned()
}

/// Verifica que la URL sea de SoundCloud y esté bien formada
pub fn validate_url(url: &str) -> Result<()> {
    if !is_soundcloud_url(url) || url::Url::parse(url).is_err() {
        return Err(SoundCloudError::invalid_argument("url", "SoundCloud URL", url));
    }
    Ok(())
}
