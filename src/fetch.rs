use std::time::Duration;

use reqwest::{
    Client, StatusCode,
    header::{ACCEPT, USER_AGENT},
};
use serde_json::Value;
use tokio::time::sleep;

use crate::{config, warning};

/// Retry behavior for requests against shared rate-limited services.
///
/// MusicBrainz recommends roughly one request per 1.5 seconds on its shared
/// infrastructure, which is where the default interval comes from. The bound
/// keeps a persistently throttled endpoint from stalling a run forever.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub interval: Duration,
    pub max_retries: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            interval: Duration::from_millis(1500),
            max_retries: 10,
        }
    }
}

/// GET client for the unauthenticated, rate-limited metadata services.
///
/// Every request carries the identifying User-Agent and an
/// `Accept: application/json` header.
pub struct RateLimitedFetcher {
    client: Client,
    policy: RetryPolicy,
}

impl RateLimitedFetcher {
    pub fn new() -> Self {
        Self::with_policy(RetryPolicy::default())
    }

    pub fn with_policy(policy: RetryPolicy) -> Self {
        RateLimitedFetcher {
            client: Client::new(),
            policy,
        }
    }

    /// Fetches a JSON document from `url`.
    ///
    /// Returns `Ok(Some(body))` on HTTP 200. A 429, 503 or 403 response is
    /// treated as throttling: the fetcher sleeps for the policy interval and
    /// retries, up to the policy bound; exhausting the bound yields
    /// `Ok(None)`. Any other status is logged with its body and yields
    /// `Ok(None)` immediately. Only transport-level failures surface as
    /// `Err`.
    pub async fn fetch(&self, url: &str) -> Result<Option<Value>, reqwest::Error> {
        let mut retries = 0;

        while retries < self.policy.max_retries {
            let response = self
                .client
                .get(url)
                .header(USER_AGENT, config::user_agent())
                .header(ACCEPT, "application/json")
                .send()
                .await?;

            match response.status() {
                status if status.is_success() => {
                    return Ok(Some(response.json::<Value>().await?));
                }
                StatusCode::TOO_MANY_REQUESTS
                | StatusCode::SERVICE_UNAVAILABLE
                | StatusCode::FORBIDDEN => {
                    warning!(
                        "Rate limit hit ({}). Retrying in {:.1}s...",
                        response.status(),
                        self.policy.interval.as_secs_f32()
                    );
                    sleep(self.policy.interval).await;
                    retries += 1;
                }
                status => {
                    let body = response.text().await.unwrap_or_default();
                    warning!("Request failed with status {}: {}", status, body);
                    return Ok(None);
                }
            }
        }

        warning!("Max retries reached for {}", url);
        Ok(None)
    }
}

impl Default for RateLimitedFetcher {
    fn default() -> Self {
        Self::new()
    }
}
