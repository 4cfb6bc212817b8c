//! # Open Music - SoundCloud
//!
//! SoundCloud source for the Open Music Discord bot: search, URL resolution,
//! related tracks and stream links, mapped onto the bot's `Song` and
//! `Playlist` types.

pub mod config;
pub mod error;
pub mod sources;

pub use config::Config;
pub use error::{Result, SoundCloudError};
pub use sources::{
    MusicSource, Playlist, ResolveOptions, Resolved, SearchResults, Song, SoundCloudPlugin,
};

/// Inicializa logging con `RUST_LOG` y los defaults del plugin.
///
/// Para bots que no configuran `tracing` por su cuenta; si ya hay un
/// subscriber global, no hace nada.
pub fn init_tracing() -> anyhow::Result<()> {
    let filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive("open_music_soundcloud=debug".parse()?)
        .add_directive("reqwest=info".parse()?);

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
    Ok(())
}
