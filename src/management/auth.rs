use std::path::PathBuf;

use chrono::Utc;
use reqwest::Client;

use crate::{
    config,
    management::SpotifySettings,
    types::{Token, TokenResponse},
    warning,
};

/// Seconds before expiry at which a token is refreshed.
const EXPIRY_MARGIN: u64 = 240;

/// Owns the cached Spotify token and keeps it fresh.
pub struct TokenManager {
    token: Token,
    credentials: SpotifySettings,
    path: PathBuf,
}

impl TokenManager {
    pub fn new(token: Token, credentials: &SpotifySettings) -> Self {
        TokenManager {
            token,
            credentials: credentials.clone(),
            path: config::token_path(),
        }
    }

    /// Points the manager at another cache file.
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = path.into();
        self
    }

    pub async fn load(credentials: &SpotifySettings) -> Result<Self, String> {
        Self::load_from(config::token_path(), credentials).await
    }

    pub async fn load_from(
        path: impl Into<PathBuf>,
        credentials: &SpotifySettings,
    ) -> Result<Self, String> {
        let path = path.into();
        let content = async_fs::read_to_string(&path)
            .await
            .map_err(|e| e.to_string())?;
        let token: Token = serde_json::from_str(&content).map_err(|e| e.to_string())?;
        Ok(Self {
            token,
            credentials: credentials.clone(),
            path,
        })
    }

    pub async fn persist(&self) -> Result<(), String> {
        if let Some(parent) = self.path.parent() {
            async_fs::create_dir_all(parent)
                .await
                .map_err(|e| e.to_string())?;
        }

        let json = serde_json::to_string_pretty(&self.token).map_err(|e| e.to_string())?;
        async_fs::write(&self.path, json)
            .await
            .map_err(|e| e.to_string())
    }

    /// A cached token is only reused for the same Spotify app and when it
    /// carries the scope the exporter asks for.
    pub fn is_usable(&self) -> bool {
        let required = config::spotify_scope();
        self.token.client_id == self.credentials.client_id
            && !self.token.refresh_token.is_empty()
            && required
                .split_whitespace()
                .all(|s| self.token.scope.split_whitespace().any(|t| t == s))
    }

    pub async fn get_valid_token(&mut self) -> String {
        if self.is_expired() {
            match self.refresh_token().await {
                Ok(new_token) => {
                    self.token = new_token;
                    if let Err(e) = self.persist().await {
                        warning!("Failed to cache refreshed token: {}", e);
                    }
                }
                Err(e) => warning!("Token refresh failed: {}", e),
            }
        }

        self.token.access_token.clone()
    }

    pub fn is_expired(&self) -> bool {
        let now = Utc::now().timestamp() as u64;
        now >= self.token.obtained_at + self.token.expires_in.saturating_sub(EXPIRY_MARGIN)
    }

    /// Exchanges the refresh token for a new access token.
    pub async fn refresh_token(&self) -> Result<Token, String> {
        let client = Client::new();
        let res = client
            .post(config::spotify_apitoken_url())
            .basic_auth(
                &self.credentials.client_id,
                Some(&self.credentials.client_secret),
            )
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", self.token.refresh_token.as_str()),
            ])
            .send()
            .await
            .map_err(|e| e.to_string())?
            .error_for_status()
            .map_err(|e| e.to_string())?;

        let response: TokenResponse = res.json().await.map_err(|e| e.to_string())?;
        Ok(Token::from_response(
            response,
            &self.credentials.client_id,
            &self.token.refresh_token,
        ))
    }

    pub fn current_token(&self) -> &Token {
        &self.token
    }
}
