use crate::{
    catalog::SpotifyCatalog,
    engine::{BrainzTempoSource, SyncEngine, UnresolvedPolicy},
    error,
    fetch::RateLimitedFetcher,
    management::TokenManager,
    success,
};

pub async fn sync(skip_unresolved: bool) {
    let token_mgr = match TokenManager::load().await {
        Ok(t) => t,
        Err(e) => {
            error!(
                "Failed to load token. Please run bpmsort auth\n Error: {}",
                e
            );
        }
    };

    let policy = if skip_unresolved {
        UnresolvedPolicy::Skip
    } else {
        UnresolvedPolicy::BucketZero
    };

    let catalog = SpotifyCatalog::new(token_mgr);
    let tempo = BrainzTempoSource::new(RateLimitedFetcher::new());
    let mut engine = SyncEngine::new(catalog, tempo, policy);

    match engine.run().await {
        Ok(report) => {
            success!(
                "Synced {} track(s) into {} BPM playlist(s); {} newly added, {} without tempo.",
                report.total_tracks,
                report.buckets,
                report.tracks_added,
                report.unresolved
            );
        }
        Err(e) => {
            error!("Sync aborted: {}", e);
        }
    }
}
