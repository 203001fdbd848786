use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tabled::Table;

use crate::{
    acousticbrainz::UNRESOLVED_TEMPO,
    catalog::{Catalog, SpotifyCatalog},
    engine::{BrainzTempoSource, TempoSource},
    error,
    fetch::RateLimitedFetcher,
    management::TokenManager,
    types::{TempoTableRow, TrackTableRow},
    warning,
};

pub async fn tracks(limit: Option<usize>, with_tempo: bool) {
    let token_mgr = match TokenManager::load().await {
        Ok(t) => t,
        Err(e) => {
            error!(
                "Failed to load token. Please run bpmsort auth\n Error: {}",
                e
            );
        }
    };

    let pb = ProgressBar::new_spinner();
    pb.set_message("Fetching saved tracks...");
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} {msg}")
            .unwrap()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );

    let mut catalog = SpotifyCatalog::new(token_mgr);
    let mut saved = match catalog.saved_tracks().await {
        Ok(tracks) => tracks,
        Err(e) => {
            pb.finish_and_clear();
            error!("Failed to fetch saved tracks: {}", e);
        }
    };
    pb.finish_and_clear();

    if let Some(limit) = limit {
        saved.truncate(limit);
    }

    if !with_tempo {
        let rows: Vec<TrackTableRow> = saved
            .into_iter()
            .map(|t| TrackTableRow {
                title: t.title,
                artist: t.artist,
                album: t.album,
            })
            .collect();

        println!("{}", Table::new(rows));
        return;
    }

    let tempo_source = BrainzTempoSource::new(RateLimitedFetcher::new());
    let mut rows: Vec<TempoTableRow> = Vec::new();

    for track in saved {
        let bpm = match tempo_source.tempo(&track).await {
            Ok(bpm) => bpm,
            Err(e) => {
                warning!("Tempo lookup failed for {}: {}", track.title, e);
                UNRESOLVED_TEMPO
            }
        };

        rows.push(TempoTableRow {
            title: track.title,
            artist: track.artist,
            bpm: if bpm == UNRESOLVED_TEMPO {
                "-".to_string()
            } else {
                bpm.to_string()
            },
        });
    }

    println!("{}", Table::new(rows));
}
