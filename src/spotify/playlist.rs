use crate::{
    config, spotify,
    types::{
        AddTracksRequest, CreatePlaylistRequest, CreatePlaylistResponse, PlaylistTracksResponse,
        PlaylistsResponse,
    },
    warning,
};

/// Spotify rejects insertions of more than 100 tracks per call.
pub const ADD_TRACKS_BATCH_LIMIT: usize = 100;

/// Retrieves one page of the user's playlists. Follows the same `next`-link
/// pagination contract as [`crate::spotify::tracks::saved_tracks_page`].
pub async fn playlists_page(
    token: &str,
    url: &str,
) -> Result<Option<PlaylistsResponse>, reqwest::Error> {
    let Some(response) = spotify::get_with_retry(token, url).await? else {
        return Ok(None);
    };

    let page = response.json::<PlaylistsResponse>().await?;
    Ok(Some(page))
}

/// Creates a private, non-collaborative playlist owned by the configured
/// user and returns its catalog-assigned metadata.
pub async fn create(
    token: &str,
    name: &str,
) -> Result<Option<CreatePlaylistResponse>, reqwest::Error> {
    let api_url = format!(
        "{uri}/users/{user}/playlists",
        uri = config::spotify_apiurl(),
        user = config::spotify_user()
    );

    let request = CreatePlaylistRequest {
        name: name.to_string(),
        description: "Tracks grouped by tempo. Managed by bpmsort.".to_string(),
        public: false,
        collaborative: false,
    };

    let Some(response) = spotify::post_with_retry(token, &api_url, &request).await? else {
        return Ok(None);
    };

    let created = response.json::<CreatePlaylistResponse>().await?;
    Ok(Some(created))
}

/// Retrieves one page of a playlist's tracks.
pub async fn tracks_page(
    token: &str,
    url: &str,
) -> Result<Option<PlaylistTracksResponse>, reqwest::Error> {
    let Some(response) = spotify::get_with_retry(token, url).await? else {
        return Ok(None);
    };

    let page = response.json::<PlaylistTracksResponse>().await?;
    Ok(Some(page))
}

/// Inserts a single batch of track ids into a playlist and returns how many
/// were accepted: the whole batch, or zero when the catalog refused it.
///
/// The batch must already respect [`ADD_TRACKS_BATCH_LIMIT`]; splitting is
/// the gateway's job so the limit stays in one place there. A refused batch
/// (403, or throttling past the retry bound) is dropped with a warning
/// instead of failing the run.
pub async fn add_tracks_batch(
    token: &str,
    playlist_id: &str,
    track_ids: &[String],
) -> Result<usize, reqwest::Error> {
    let api_url = format!(
        "{uri}/playlists/{id}/tracks",
        uri = config::spotify_apiurl(),
        id = playlist_id
    );

    let request = AddTracksRequest {
        uris: track_ids
            .iter()
            .map(|id| format!("spotify:track:{}", id))
            .collect(),
    };

    if spotify::post_with_retry(token, &api_url, &request)
        .await?
        .is_none()
    {
        warning!(
            "Batch of {} track(s) for playlist {} was refused. Skipping...",
            track_ids.len(),
            playlist_id
        );
        return Ok(0);
    }

    Ok(track_ids.len())
}
