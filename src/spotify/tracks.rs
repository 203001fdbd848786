use crate::{spotify, types::SavedTracksResponse};

/// Retrieves one page of the user's saved tracks.
///
/// `url` is either the initial `/me/tracks` URL or the `next` link from a
/// previous page; the caller follows `next` until it is exhausted.
///
/// # Returns
///
/// - `Ok(Some(page))` - the parsed page
/// - `Ok(None)` - the endpoint answered 403; the caller should stop and
///   treat the listing as unavailable
/// - `Err(reqwest::Error)` - network error or fatal API error
pub async fn saved_tracks_page(
    token: &str,
    url: &str,
) -> Result<Option<SavedTracksResponse>, reqwest::Error> {
    let Some(response) = spotify::get_with_retry(token, url).await? else {
        return Ok(None);
    };

    let page = response.json::<SavedTracksResponse>().await?;
    Ok(Some(page))
}
