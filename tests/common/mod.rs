#![allow(dead_code)]

use std::collections::{HashMap, HashSet};

use bpmsort::Res;
use bpmsort::catalog::Catalog;
use bpmsort::engine::TempoSource;
use bpmsort::types::{PlaylistSummary, SavedTrack};

pub fn track(id: &str, title: &str, artist: &str, album: &str) -> SavedTrack {
    SavedTrack {
        id: id.to_string(),
        title: title.to_string(),
        artist: artist.to_string(),
        album: album.to_string(),
    }
}

/// In-memory catalog standing in for the Spotify gateway.
pub struct FakeCatalog {
    pub saved: Vec<SavedTrack>,
    pub playlists: Vec<PlaylistSummary>,
    pub tracks: HashMap<String, Vec<String>>,
    pub created: Vec<String>,
    pub add_calls: Vec<(String, Vec<String>)>,
    refuses_adds_to: Option<String>,
    next_id: u32,
}

impl FakeCatalog {
    pub fn new(saved: Vec<SavedTrack>) -> Self {
        FakeCatalog {
            saved,
            playlists: Vec::new(),
            tracks: HashMap::new(),
            created: Vec::new(),
            add_calls: Vec::new(),
            refuses_adds_to: None,
            next_id: 0,
        }
    }

    /// Makes every insertion into the given playlist come back refused,
    /// like a playlist the user revoked write access to.
    pub fn refusing_adds_to(mut self, playlist_id: &str) -> Self {
        self.refuses_adds_to = Some(playlist_id.to_string());
        self
    }

    pub fn with_playlist(mut self, id: &str, name: &str, track_ids: &[&str]) -> Self {
        self.playlists.push(PlaylistSummary {
            id: id.to_string(),
            name: name.to_string(),
        });
        self.tracks.insert(
            id.to_string(),
            track_ids.iter().map(|t| t.to_string()).collect(),
        );
        self
    }

    pub fn playlist_named(&self, name: &str) -> Option<&PlaylistSummary> {
        self.playlists.iter().find(|p| p.name == name)
    }

    pub fn tracks_of(&self, playlist_id: &str) -> Vec<String> {
        self.tracks.get(playlist_id).cloned().unwrap_or_default()
    }
}

impl Catalog for FakeCatalog {
    async fn saved_tracks(&mut self) -> Res<Vec<SavedTrack>> {
        Ok(self.saved.clone())
    }

    async fn playlists(&mut self) -> Res<Vec<PlaylistSummary>> {
        Ok(self.playlists.clone())
    }

    async fn create_playlist(&mut self, name: &str) -> Res<String> {
        self.next_id += 1;
        let id = format!("pl-{}", self.next_id);
        self.playlists.push(PlaylistSummary {
            id: id.clone(),
            name: name.to_string(),
        });
        self.tracks.insert(id.clone(), Vec::new());
        self.created.push(name.to_string());
        Ok(id)
    }

    async fn playlist_tracks(&mut self, playlist_id: &str) -> Res<HashSet<String>> {
        Ok(self
            .tracks
            .get(playlist_id)
            .cloned()
            .unwrap_or_default()
            .into_iter()
            .collect())
    }

    async fn add_tracks(&mut self, playlist_id: &str, track_ids: &[String]) -> Res<usize> {
        self.add_calls
            .push((playlist_id.to_string(), track_ids.to_vec()));
        if self.refuses_adds_to.as_deref() == Some(playlist_id) {
            return Ok(0);
        }
        self.tracks
            .entry(playlist_id.to_string())
            .or_default()
            .extend(track_ids.iter().cloned());
        Ok(track_ids.len())
    }
}

/// Tempo source with canned values keyed by track id; unknown ids resolve
/// to the unresolved sentinel.
pub struct FakeTempo(pub HashMap<String, u32>);

impl FakeTempo {
    pub fn new(tempos: &[(&str, u32)]) -> Self {
        FakeTempo(
            tempos
                .iter()
                .map(|(id, bpm)| (id.to_string(), *bpm))
                .collect(),
        )
    }
}

impl TempoSource for FakeTempo {
    async fn tempo(&self, track: &SavedTrack) -> Result<u32, reqwest::Error> {
        Ok(*self.0.get(&track.id).unwrap_or(&0))
    }
}
