//! # Error Module
//!
//! Error kinds surfaced by the SoundCloud source.
//!
//! Every public operation of [`SoundCloudPlugin`](crate::sources::SoundCloudPlugin)
//! fails with a [`SoundCloudError`]. Nothing is retried or downgraded to a
//! partial result: the caller always sees the first failure.
//!
//! Failures coming from the SoundCloud client are carried unchanged inside
//! [`SoundCloudError::Service`].

use thiserror::Error;

use crate::sources::soundcloud::SearchType;

/// Result alias used across the plugin.
pub type Result<T, E = SoundCloudError> = std::result::Result<T, E>;

/// Errors returned by the SoundCloud source.
#[derive(Debug, Error)]
pub enum SoundCloudError {
    /// Malformed input to a public operation. Never reaches the network.
    #[error("Expected {expected} for '{name}', but got {got}")]
    InvalidArgument {
        name: &'static str,
        expected: String,
        got: String,
    },

    /// A track search returned an empty collection.
    #[error("Cannot find any \"{query}\" {kind} on SoundCloud!")]
    NoResult { query: String, kind: SearchType },

    /// The URL does not point to a public track or playlist.
    #[error("Only public links are supported.")]
    NotSupported,

    /// The playlist resolved to zero usable tracks.
    #[error("Playlist is empty.")]
    EmptyPlaylist,

    /// SoundCloud returned no stream link for the track.
    #[error(
        "Reached SoundCloud rate limits\nSee more: https://developers.soundcloud.com/docs/api/rate-limits#play-requests"
    )]
    RateLimited,

    /// Any other failure from the SoundCloud client, untouched.
    #[error(transparent)]
    Service(#[from] anyhow::Error),
}

impl SoundCloudError {
    pub(crate) fn invalid_argument(
        name: &'static str,
        expected: impl Into<String>,
        got: impl std::fmt::Debug,
    ) -> Self {
        Self::InvalidArgument {
            name,
            expected: expected.into(),
            got: format!("{:?}", got),
        }
    }

    /// Stable code for the error kind, suitable for matching in the host bot.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidArgument { .. } => "INVALID_TYPE",
            Self::NoResult { .. } => "SOUNDCLOUD_PLUGIN_NO_RESULT",
            Self::NotSupported => "SOUNDCLOUD_PLUGIN_NOT_SUPPORTED",
            Self::EmptyPlaylist => "SOUNDCLOUD_PLUGIN_EMPTY_PLAYLIST",
            Self::RateLimited => "SOUNDCLOUD_PLUGIN_RATE_LIMITED",
            Self::Service(_) => "SOUNDCLOUD_PLUGIN_SERVICE",
        }
    }

    /// `true` when the failure happened before any network call.
    pub fn is_client_side(&self) -> bool {
        matches!(self, Self::InvalidArgument { .. })
    }
}
