// Resolución por lotes de los stubs que devuelve SoundCloud en playlists grandes

use anyhow::Result;
use futures::future::try_join_all;
use tracing::{debug, error};

use super::api::{RawTrack, SoundCloudApi};

/// Máximo de IDs por llamada a `/tracks?ids=`
pub const MAX_IDS_PER_LOOKUP: usize = 50;

/// Completa los stubs de una lista de tracks de playlist.
///
/// SoundCloud devuelve un prefijo resuelto seguido de un sufijo de stubs.
/// Todo lo que va desde el primer stub hasta el final se vuelve a pedir,
/// aunque haya tracks completos detrás. Los resultados de cada lote se
/// añaden en orden de lote, con el orden interno que devuelva la API.
///
/// Los lotes se lanzan en paralelo; el primer error cancela el resto.
pub async fn resolve_tracks(api: &dyn SoundCloudApi, mut tracks: Vec<RawTrack>) -> Result<Vec<RawTrack>> {
    let Some(first_stub) = tracks.iter().position(RawTrack::is_stub) else {
        return Ok(tracks);
    };

    let unresolved = tracks.split_off(first_stub);
    let ids: Vec<u64> = unresolved.iter().map(|t| t.id).collect();
    let batches: Vec<&[u64]> = ids.chunks(MAX_IDS_PER_LOOKUP).collect();

    debug!(
        "🧩 Resolviendo {} tracks incompletos en {} lotes ({} ya resueltos)",
        ids.len(),
        batches.len(),
        tracks.len()
    );

    let resolved = try_join_all(batches.into_iter().map(|batch| api.fetch_tracks(batch)))
        .await
        .map_err(|e| {
            error!("❌ Falló la resolución por lotes: {}", e);
            e
        })?;

    tracks.extend(resolved.into_iter().flatten());
    Ok(tracks)
}
