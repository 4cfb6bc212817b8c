use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_API_BASE: &str = "https://api-v2.soundcloud.com";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    // Credenciales (opcionales - sin ellas se usa el modo anónimo)
    pub client_id: Option<String>,
    pub oauth_token: Option<String>,

    // API
    pub api_base: String,
    pub request_timeout_secs: u64, // En segundos

    // Límites
    pub default_search_limit: u32,
    pub related_limit: u32,
}

impl Config {
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self {
            // Credenciales
            client_id: non_empty_var("SOUNDCLOUD_CLIENT_ID"),
            oauth_token: non_empty_var("SOUNDCLOUD_OAUTH_TOKEN"),

            // API
            api_base: std::env::var("SOUNDCLOUD_API_BASE")
                .unwrap_or_else(|_| DEFAULT_API_BASE.to_string()),
            request_timeout_secs: std::env::var("SOUNDCLOUD_TIMEOUT_SECS")
                .unwrap_or_else(|_| "15".to_string())
                .parse()
                .context("SOUNDCLOUD_TIMEOUT_SECS must be a number of seconds")?,

            // Límites
            default_search_limit: std::env::var("SOUNDCLOUD_SEARCH_LIMIT")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .context("SOUNDCLOUD_SEARCH_LIMIT must be a positive integer")?,
            related_limit: std::env::var("SOUNDCLOUD_RELATED_LIMIT")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .context("SOUNDCLOUD_RELATED_LIMIT must be a positive integer")?,
        };

        // Validate configuration before returning
        config.validate()?;

        Ok(config)
    }

    /// Builds a configuration with an explicit credential pair.
    ///
    /// Either half may be `None`; the client then falls back to anonymous
    /// requests for that part.
    pub fn with_credentials(client_id: Option<String>, oauth_token: Option<String>) -> Self {
        Self {
            client_id,
            oauth_token,
            ..Self::default()
        }
    }

    /// Validates configuration values for correctness.
    ///
    /// # Validation Rules
    ///
    /// - The API base must be an absolute http(s) URL
    /// - Timeout and limits must be greater than 0
    pub fn validate(&self) -> Result<()> {
        let base = url::Url::parse(&self.api_base)
            .with_context(|| format!("Invalid SoundCloud API base: {}", self.api_base))?;
        if !matches!(base.scheme(), "http" | "https") {
            anyhow::bail!("SoundCloud API base must use http(s), got: {}", base.scheme());
        }

        if self.request_timeout_secs == 0 {
            anyhow::bail!("Request timeout must be greater than 0");
        }

        if self.default_search_limit == 0 {
            anyhow::bail!("Default search limit must be greater than 0");
        }

        if self.related_limit == 0 {
            anyhow::bail!("Related tracks limit must be greater than 0");
        }

        Ok(())
    }

    /// `true` when no credential is configured.
    pub fn is_anonymous(&self) -> bool {
        self.client_id.is_none() && self.oauth_token.is_none()
    }

    /// Returns a summary of the current configuration for logging.
    ///
    /// Credentials are masked.
    pub fn summary(&self) -> String {
        format!(
            "Config Summary:\n  \
            API: {} ({}s timeout)\n  \
            Credentials: client_id={}, oauth={}\n  \
            Limits: {} search, {} related",
            self.api_base,
            self.request_timeout_secs,
            mask(self.client_id.as_deref()),
            mask(self.oauth_token.as_deref()),
            self.default_search_limit,
            self.related_limit,
        )
    }
}

/// Default configuration values.
///
/// Used as fallbacks when environment variables are not provided.
impl Default for Config {
    fn default() -> Self {
        Self {
            client_id: None,
            oauth_token: None,

            api_base: DEFAULT_API_BASE.to_string(),
            request_timeout_secs: 15,

            default_search_limit: 10,
            related_limit: 10,
        }
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn mask(secret: Option<&str>) -> String {
    match secret {
        Some(s) if s.chars().count() > 4 => format!("{}***", s.chars().take(4).collect::<String>()),
        Some(_) => "***".to_string(),
        None => "none".to_string(),
    }
}
