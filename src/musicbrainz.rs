use crate::{config, fetch::RateLimitedFetcher, types::RecordingSearchResponse};

/// Builds a percent-encoded MusicBrainz recording query from track metadata.
///
/// Clauses are joined with a logical AND: `recording:<title>`,
/// `artist:<artist>`, optionally `release:<album>`, and a fixed exclusion
/// that suppresses live recordings. The album clause sits before the
/// exclusion clause when present.
pub fn build_query(title: &str, artist: &str, album: Option<&str>) -> String {
    let mut clauses = vec![
        format!("recording:{}", title),
        format!("artist:{}", artist),
        "NOT comment:live".to_string(),
    ];
    if let Some(album) = album {
        clauses.insert(2, format!("release:{}", album));
    }
    urlencoding::encode(&clauses.join(" AND ")).into_owned()
}

/// Resolves track metadata to a canonical MusicBrainz recording id.
///
/// Queries with the album clause first; if that yields no match, retries
/// exactly once with the album clause omitted (broader match). Still no
/// match means the track is simply absent from the index, a normal outcome
/// surfaced as `Ok(None)`. On success only the first (highest-ranked) match
/// is taken; no secondary disambiguation is performed.
pub async fn resolve(
    fetcher: &RateLimitedFetcher,
    title: &str,
    artist: &str,
    album: Option<&str>,
) -> Result<Option<String>, reqwest::Error> {
    if album.is_some() {
        let query = build_query(title, artist, album);
        if let Some(mbid) = search_recording(fetcher, &query).await? {
            return Ok(Some(mbid));
        }
    }

    let query = build_query(title, artist, None);
    search_recording(fetcher, &query).await
}

async fn search_recording(
    fetcher: &RateLimitedFetcher,
    query: &str,
) -> Result<Option<String>, reqwest::Error> {
    let url = format!(
        "{base}?query={query}&limit=1&fmt=json",
        base = config::musicbrainz_apiurl(),
        query = query
    );

    let Some(body) = fetcher.fetch(&url).await? else {
        return Ok(None);
    };

    let parsed: RecordingSearchResponse = serde_json::from_value(body).unwrap_or_default();
    Ok(parsed.recordings.first().map(|r| r.id.clone()))
}
