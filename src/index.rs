use std::collections::{HashMap, HashSet};

use crate::{Res, catalog::Catalog, warning};

/// Classifies a playlist name as a BPM bucket.
///
/// Only the literal pattern `BPM ` followed by one to three digits and
/// nothing else matches; everything else is a foreign playlist that the
/// sync never touches. This naming convention is the sole persisted state
/// distinguishing managed playlists from user playlists, so it has to be
/// matched exactly for restarts to find prior playlists.
pub fn classify(name: &str) -> Option<u32> {
    let digits = name.strip_prefix("BPM ")?;
    if digits.is_empty() || digits.len() > 3 {
        return None;
    }
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Returns the managed playlist name for a bucket.
pub fn playlist_name(bucket: u32) -> String {
    format!("BPM {}", bucket)
}

/// In-memory index of managed playlists for one sync run.
///
/// Holds the bucket-to-playlist mapping built by a single scan of the
/// user's playlists, plus a lazily filled per-playlist track-set cache.
/// State lives for one run only and is never persisted.
pub struct PlaylistIndex {
    buckets: HashMap<u32, String>,
    tracks: HashMap<String, HashSet<String>>,
}

impl PlaylistIndex {
    /// Builds the index from a full scan of the user's playlists.
    ///
    /// A bucket maps to at most one playlist: the first playlist matching
    /// the naming pattern wins, later duplicates are reported and left
    /// untouched (not merged).
    pub async fn scan<C: Catalog>(catalog: &mut C) -> Res<Self> {
        let mut buckets: HashMap<u32, String> = HashMap::new();

        for playlist in catalog.playlists().await? {
            let Some(bucket) = classify(&playlist.name) else {
                continue; // foreign playlist
            };

            if buckets.contains_key(&bucket) {
                warning!(
                    "Duplicate playlist '{}' ({}). Keeping the first one found.",
                    playlist.name,
                    playlist.id
                );
                continue;
            }

            buckets.insert(bucket, playlist.id);
        }

        Ok(PlaylistIndex {
            buckets,
            tracks: HashMap::new(),
        })
    }

    /// Returns the playlist id registered for `bucket`, creating the
    /// playlist through the catalog on first encounter.
    pub async fn get_or_create<C: Catalog>(&mut self, catalog: &mut C, bucket: u32) -> Res<String> {
        if let Some(id) = self.buckets.get(&bucket) {
            return Ok(id.clone());
        }

        let id = catalog.create_playlist(&playlist_name(bucket)).await?;
        self.buckets.insert(bucket, id.clone());
        Ok(id)
    }

    /// Returns the current track set of a playlist, fetching it through the
    /// catalog on first access and caching it for the rest of the run.
    pub async fn current_tracks<C: Catalog>(
        &mut self,
        catalog: &mut C,
        playlist_id: &str,
    ) -> Res<&HashSet<String>> {
        if !self.tracks.contains_key(playlist_id) {
            let set = catalog.playlist_tracks(playlist_id).await?;
            self.tracks.insert(playlist_id.to_string(), set);
        }

        Ok(&self.tracks[playlist_id])
    }

    /// Number of managed playlists currently known to the index.
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}
