use std::collections::{HashMap, HashSet};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use crate::{
    Res, acousticbrainz,
    acousticbrainz::UNRESOLVED_TEMPO,
    catalog::Catalog,
    fetch::RateLimitedFetcher,
    index::PlaylistIndex,
    info, musicbrainz, success,
    types::SavedTrack,
};

/// Resolves a saved track to a rounded tempo value.
///
/// Abstracted as a trait so the engine can run against canned tempos in
/// tests. [`UNRESOLVED_TEMPO`] signals that no tempo could be determined.
#[allow(async_fn_in_trait)]
pub trait TempoSource {
    async fn tempo(&self, track: &SavedTrack) -> Result<u32, reqwest::Error>;
}

/// [`TempoSource`] backed by MusicBrainz and AcousticBrainz: the track
/// metadata is resolved to a recording id first, then the id is looked up
/// in the low-level analysis store.
pub struct BrainzTempoSource {
    fetcher: RateLimitedFetcher,
}

impl BrainzTempoSource {
    pub fn new(fetcher: RateLimitedFetcher) -> Self {
        BrainzTempoSource { fetcher }
    }
}

impl TempoSource for BrainzTempoSource {
    async fn tempo(&self, track: &SavedTrack) -> Result<u32, reqwest::Error> {
        let mbid = musicbrainz::resolve(
            &self.fetcher,
            &track.title,
            &track.artist,
            Some(&track.album),
        )
        .await?;

        match mbid {
            Some(mbid) => acousticbrainz::lookup(&self.fetcher, &mbid).await,
            None => Ok(UNRESOLVED_TEMPO),
        }
    }
}

/// What to do with a track whose tempo could not be resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnresolvedPolicy {
    /// File the track under the dedicated `BPM 0` bucket (default). The
    /// track stays visible instead of silently disappearing from the sync.
    BucketZero,
    /// Leave the track out of every playlist.
    Skip,
}

/// Counters describing one completed sync run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SyncReport {
    pub total_tracks: usize,
    pub unresolved: usize,
    pub buckets: usize,
    pub tracks_added: usize,
}

/// Orchestrates one full sync run.
///
/// The run proceeds strictly in phases: scan existing playlists, enumerate
/// saved tracks, resolve a tempo per track, group tracks into buckets in
/// first-seen order, then reconcile each bucket's playlist by inserting
/// only tracks it does not already contain. Requests are issued one at a
/// time; all backoff waiting happens inside the catalog and fetcher layers.
///
/// Lookup failures never abort a run; they degrade to the unresolved
/// policy. Any catalog error that is not throttling or a 403 aborts the
/// run immediately. Playlists created or filled before the abort remain,
/// which is safe because reconciliation is idempotent: a rerun diffs
/// against the current playlist contents and re-adds nothing.
pub struct SyncEngine<C, T> {
    catalog: C,
    tempo: T,
    policy: UnresolvedPolicy,
}

impl<C: Catalog, T: TempoSource> SyncEngine<C, T> {
    pub fn new(catalog: C, tempo: T, policy: UnresolvedPolicy) -> Self {
        SyncEngine {
            catalog,
            tempo,
            policy,
        }
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    pub async fn run(&mut self) -> Res<SyncReport> {
        let mut index = PlaylistIndex::scan(&mut self.catalog).await?;
        if !index.is_empty() {
            info!("Found {} BPM playlist(s) from earlier runs.", index.len());
        }

        let tracks = self.catalog.saved_tracks().await?;
        info!("Resolving tempo for {} saved track(s)...", tracks.len());

        let (order, buckets, unresolved) = self.bucket_tracks(&tracks).await?;

        let mut tracks_added = 0;
        for bucket in &order {
            let track_ids = &buckets[bucket];
            tracks_added += self
                .reconcile_bucket(&mut index, *bucket, track_ids)
                .await?;
        }

        Ok(SyncReport {
            total_tracks: tracks.len(),
            unresolved,
            buckets: order.len(),
            tracks_added,
        })
    }

    /// Resolves every track's tempo and groups the track ids by bucket,
    /// remembering the order in which buckets were first seen.
    async fn bucket_tracks(
        &mut self,
        tracks: &[SavedTrack],
    ) -> Res<(Vec<u32>, HashMap<u32, Vec<String>>, usize)> {
        let pb = ProgressBar::new(tracks.len() as u64);
        pb.set_style(
            ProgressStyle::with_template("{spinner:.blue} [{pos}/{len}] {msg}")
                .unwrap()
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
        );
        pb.enable_steady_tick(Duration::from_millis(100));

        let mut order: Vec<u32> = Vec::new();
        let mut buckets: HashMap<u32, Vec<String>> = HashMap::new();
        let mut unresolved = 0;

        for track in tracks {
            pb.set_message(format!("{} - {}", track.artist, track.title));

            let bpm = self.tempo.tempo(track).await?;
            if bpm == UNRESOLVED_TEMPO {
                unresolved += 1;
                pb.println(format!(
                    "No tempo found for {} - {}.",
                    track.artist, track.title
                ));

                if self.policy == UnresolvedPolicy::Skip {
                    pb.inc(1);
                    continue;
                }
            }

            if !buckets.contains_key(&bpm) {
                order.push(bpm);
            }
            buckets.entry(bpm).or_default().push(track.id.clone());

            pb.inc(1);
        }

        pb.finish_and_clear();
        Ok((order, buckets, unresolved))
    }

    /// Brings one bucket's playlist up to date and returns how many tracks
    /// were inserted.
    async fn reconcile_bucket(
        &mut self,
        index: &mut PlaylistIndex,
        bucket: u32,
        track_ids: &[String],
    ) -> Res<usize> {
        let playlist_id = index.get_or_create(&mut self.catalog, bucket).await?;

        let new_tracks: Vec<String> = {
            let current = index
                .current_tracks(&mut self.catalog, &playlist_id)
                .await?;
            let wanted: HashSet<&String> = track_ids.iter().collect();
            wanted
                .into_iter()
                .filter(|id| !current.contains(*id))
                .cloned()
                .collect()
        };

        if new_tracks.is_empty() {
            info!("BPM {}: nothing new.", bucket);
            return Ok(0);
        }

        // refused batches are warned about by the gateway and not counted
        let accepted = self.catalog.add_tracks(&playlist_id, &new_tracks).await?;
        if accepted > 0 {
            success!("Added {} track(s) to BPM {}.", accepted, bucket);
        }
        Ok(accepted)
    }
}
