use std::path::PathBuf;

use chrono::Utc;

use crate::{spotify, types::Token, warning};

/// Owns the OAuth token for the lifetime of a command, refreshing it
/// through the Spotify token endpoint shortly before expiry.
pub struct TokenManager {
    token: Token,
}

impl TokenManager {
    pub fn new(token: Token) -> Self {
        TokenManager { token }
    }

    pub async fn load() -> Result<Self, String> {
        let path = Self::token_path();
        let content = async_fs::read_to_string(&path)
            .await
            .map_err(|e| e.to_string())?;
        let token: Token = serde_json::from_str(&content).map_err(|e| e.to_string())?;
        Ok(Self { token })
    }

    pub async fn persist(&self) -> Result<(), String> {
        let path = Self::token_path();
        if let Some(parent) = path.parent() {
            async_fs::create_dir_all(parent)
                .await
                .map_err(|e| e.to_string())?;
        }

        let json = serde_json::to_string_pretty(&self.token).map_err(|e| e.to_string())?;
        async_fs::write(Self::token_path(), json)
            .await
            .map_err(|e| e.to_string())
    }

    /// Returns an access token that is valid right now, refreshing and
    /// re-persisting it first if the stored one is about to expire.
    ///
    /// A failed refresh falls back to the stored token so the caller's
    /// request still goes out; the catalog then answers with a proper
    /// authentication error instead of this method guessing.
    pub async fn get_valid_token(&mut self) -> String {
        if self.is_expired() {
            match spotify::auth::refresh_token(&self.token.refresh_token).await {
                Ok(new_token) => {
                    self.token = new_token;
                    if let Err(e) = self.persist().await {
                        warning!("Failed to persist refreshed token: {}", e);
                    }
                }
                Err(e) => {
                    warning!("Token refresh failed: {}. Using the stored token.", e);
                }
            }
        }

        self.token.access_token.clone()
    }

    // 240s buffer so a token never expires mid-pagination
    fn is_expired(&self) -> bool {
        let now = Utc::now().timestamp() as u64;
        now >= self.token.obtained_at + self.token.expires_in - 240
    }

    fn token_path() -> PathBuf {
        let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push("bpmsort/cache/token.json");
        path
    }

    pub fn current_token(&self) -> &Token {
        &self.token
    }
}
