mod common;

use bpmsort::index::{PlaylistIndex, classify, playlist_name};
use common::FakeCatalog;

#[test]
fn classify_matches_the_exact_naming_pattern() {
    assert_eq!(classify("BPM 128"), Some(128));
    assert_eq!(classify("BPM 0"), Some(0));
    assert_eq!(classify("BPM 7"), Some(7));
    assert_eq!(classify("BPM 999"), Some(999));
}

#[test]
fn classify_rejects_foreign_names() {
    assert_eq!(classify("BPM 1280"), None);
    assert_eq!(classify("My BPM 90 Mix"), None);
    assert_eq!(classify("BPM "), None);
    assert_eq!(classify("BPM"), None);
    assert_eq!(classify("BPM 90 "), None);
    assert_eq!(classify("BPM ninety"), None);
    assert_eq!(classify("bpm 90"), None);
    assert_eq!(classify("Weekly Picks 12/2023"), None);
}

#[test]
fn playlist_names_round_trip_through_classify() {
    for bucket in [0, 1, 92, 128, 999] {
        assert_eq!(classify(&playlist_name(bucket)), Some(bucket));
    }
}

#[tokio::test]
async fn get_or_create_registers_the_new_playlist() {
    let mut catalog = FakeCatalog::new(Vec::new());
    let mut index = PlaylistIndex::scan(&mut catalog).await.unwrap();

    let first = index.get_or_create(&mut catalog, 120).await.unwrap();
    let second = index.get_or_create(&mut catalog, 120).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(catalog.created, vec!["BPM 120"]);
    assert_eq!(index.len(), 1);
}

#[tokio::test]
async fn scan_picks_up_existing_managed_playlists() {
    let mut catalog = FakeCatalog::new(Vec::new())
        .with_playlist("pl-1", "BPM 120", &[])
        .with_playlist("pl-2", "road trip", &[]);
    let mut index = PlaylistIndex::scan(&mut catalog).await.unwrap();

    let id = index.get_or_create(&mut catalog, 120).await.unwrap();

    assert_eq!(id, "pl-1");
    assert!(catalog.created.is_empty());
}

#[tokio::test]
async fn current_tracks_is_fetched_once_and_cached() {
    let mut catalog = FakeCatalog::new(Vec::new()).with_playlist("pl-1", "BPM 120", &["t1"]);
    let mut index = PlaylistIndex::scan(&mut catalog).await.unwrap();

    let first = index.current_tracks(&mut catalog, "pl-1").await.unwrap();
    assert!(first.contains("t1"));

    // changes behind the cache's back are not observed within a run
    catalog.tracks.get_mut("pl-1").unwrap().push("t2".to_string());

    let second = index.current_tracks(&mut catalog, "pl-1").await.unwrap();
    assert_eq!(second.len(), 1);
}
