use std::collections::HashSet;

use crate::{
    Res, config,
    management::TokenManager,
    spotify,
    types::{PlaylistSummary, SavedTrack},
    warning,
};

const SAVED_TRACKS_PAGE_SIZE: u32 = 50;
const PLAYLISTS_PAGE_SIZE: u32 = 50;
const PLAYLIST_TRACKS_PAGE_SIZE: u32 = 100;

/// The streaming-catalog operations the sync engine depends on.
///
/// The engine only ever talks to the catalog through this trait, so its
/// logic can be exercised against an in-memory fake without network access.
/// Implementations own throttling retries; callers see either complete
/// results or fatal errors.
#[allow(async_fn_in_trait)]
pub trait Catalog {
    /// Enumerates all saved tracks, following pagination until exhausted.
    async fn saved_tracks(&mut self) -> Res<Vec<SavedTrack>>;

    /// Enumerates all of the user's playlists (id and name), following
    /// pagination until exhausted.
    async fn playlists(&mut self) -> Res<Vec<PlaylistSummary>>;

    /// Creates a private, non-collaborative playlist and returns its id.
    async fn create_playlist(&mut self, name: &str) -> Res<String>;

    /// Returns the set of track ids currently in a playlist.
    async fn playlist_tracks(&mut self, playlist_id: &str) -> Res<HashSet<String>>;

    /// Inserts tracks into a playlist, splitting the input into batches of
    /// at most 100 (the catalog API limit), and returns how many tracks
    /// were actually accepted; refused batches are dropped with a warning.
    /// No ordering is guaranteed across or within batches.
    async fn add_tracks(&mut self, playlist_id: &str, track_ids: &[String]) -> Res<usize>;
}

/// [`Catalog`] backed by the Spotify Web API.
pub struct SpotifyCatalog {
    token: TokenManager,
}

impl SpotifyCatalog {
    pub fn new(token: TokenManager) -> Self {
        SpotifyCatalog { token }
    }
}

impl Catalog for SpotifyCatalog {
    async fn saved_tracks(&mut self) -> Res<Vec<SavedTrack>> {
        let mut tracks = Vec::new();
        let mut url = Some(format!(
            "{uri}/me/tracks?limit={limit}",
            uri = config::spotify_apiurl(),
            limit = SAVED_TRACKS_PAGE_SIZE
        ));

        while let Some(page_url) = url {
            let token = self.token.get_valid_token().await;
            let Some(page) = spotify::tracks::saved_tracks_page(&token, &page_url).await? else {
                warning!("Saved tracks listing unavailable. Stopping enumeration.");
                break;
            };

            for item in page.items {
                // Spotify returns null entries for removed tracks and null
                // ids for local files; neither can be resolved or re-added.
                let Some(track) = item.track else { continue };
                let Some(id) = track.id else { continue };

                let artist = track
                    .artists
                    .first()
                    .map(|a| a.name.clone())
                    .unwrap_or_default();

                tracks.push(SavedTrack {
                    id,
                    title: track.name,
                    artist,
                    album: track.album.name,
                });
            }

            url = page.next;
        }

        Ok(tracks)
    }

    async fn playlists(&mut self) -> Res<Vec<PlaylistSummary>> {
        let mut playlists = Vec::new();
        let mut url = Some(format!(
            "{uri}/me/playlists?limit={limit}",
            uri = config::spotify_apiurl(),
            limit = PLAYLISTS_PAGE_SIZE
        ));

        while let Some(page_url) = url {
            let token = self.token.get_valid_token().await;
            let Some(page) = spotify::playlist::playlists_page(&token, &page_url).await? else {
                warning!("Playlist listing unavailable. Stopping enumeration.");
                break;
            };

            playlists.extend(page.items);
            url = page.next;
        }

        Ok(playlists)
    }

    async fn create_playlist(&mut self, name: &str) -> Res<String> {
        let token = self.token.get_valid_token().await;
        match spotify::playlist::create(&token, name).await? {
            Some(created) => Ok(created.id),
            None => Err(format!("creation of playlist '{}' was refused", name).into()),
        }
    }

    async fn playlist_tracks(&mut self, playlist_id: &str) -> Res<HashSet<String>> {
        let mut track_ids = HashSet::new();
        let mut url = Some(format!(
            "{uri}/playlists/{id}/tracks?limit={limit}",
            uri = config::spotify_apiurl(),
            id = playlist_id,
            limit = PLAYLIST_TRACKS_PAGE_SIZE
        ));

        while let Some(page_url) = url {
            let token = self.token.get_valid_token().await;
            let Some(page) = spotify::playlist::tracks_page(&token, &page_url).await? else {
                warning!("Tracks of playlist {} unavailable. Stopping.", playlist_id);
                break;
            };

            for item in page.items {
                if let Some(id) = item.track.and_then(|t| t.id) {
                    track_ids.insert(id);
                }
            }

            url = page.next;
        }

        Ok(track_ids)
    }

    async fn add_tracks(&mut self, playlist_id: &str, track_ids: &[String]) -> Res<usize> {
        let mut accepted = 0;
        for batch in track_ids.chunks(spotify::playlist::ADD_TRACKS_BATCH_LIMIT) {
            let token = self.token.get_valid_token().await;
            accepted += spotify::playlist::add_tracks_batch(&token, playlist_id, batch).await?;
        }
        Ok(accepted)
    }
}
