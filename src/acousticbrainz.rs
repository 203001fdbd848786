use crate::{config, fetch::RateLimitedFetcher};

/// Tempo sentinel for tracks whose BPM could not be determined. Measured
/// tempos are always positive, so zero is never a valid value.
pub const UNRESOLVED_TEMPO: u32 = 0;

/// Looks up the measured tempo for a MusicBrainz recording id.
///
/// Fetches the low-level analysis document and extracts `rhythm.bpm`,
/// rounded to the nearest integer. A failed fetch or a document without a
/// usable tempo field yields [`UNRESOLVED_TEMPO`] rather than an error;
/// AcousticBrainz coverage is sparse and a missing document is expected.
pub async fn lookup(
    fetcher: &RateLimitedFetcher,
    mbid: &str,
) -> Result<u32, reqwest::Error> {
    let url = format!(
        "{base}/{mbid}/low-level",
        base = config::acousticbrainz_apiurl(),
        mbid = mbid
    );

    let Some(body) = fetcher.fetch(&url).await? else {
        return Ok(UNRESOLVED_TEMPO);
    };

    Ok(body["rhythm"]["bpm"]
        .as_f64()
        .map(|bpm| bpm.round() as u32)
        .unwrap_or(UNRESOLVED_TEMPO))
}
