//! Runtime configuration and well-known file locations.
//!
//! Endpoints and tool locations have sensible defaults and can be overridden
//! with environment variables, either exported in the shell or placed in a
//! `.env` file in the local data directory:
//!
//! - Linux: `~/.local/share/likedtube/.env`
//! - macOS: `~/Library/Application Support/likedtube/.env`
//! - Windows: `%LOCALAPPDATA%/likedtube/.env`
//!
//! User credentials do not live here. They are kept in the settings file
//! handled by [`crate::management::SettingsManager`].

use dotenv;
use std::{env, path::PathBuf};

pub const APP_NAME: &str = "likedtube";

/// Loads environment variables from the optional `.env` file in the local
/// data directory.
///
/// Creates the data directory if it doesn't exist yet. A missing `.env` file
/// is not an error since every value has a default.
///
/// # Errors
///
/// Returns an error string if the directory cannot be created or an existing
/// `.env` file cannot be parsed.
pub async fn load_env() -> Result<(), String> {
    let path = data_dir().join(".env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    if path.is_file() {
        dotenv::from_path(&path).map_err(|e| e.to_string())?;
    }
    Ok(())
}

/// Platform-specific application data directory, `./likedtube` as fallback.
pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push(APP_NAME);
    path
}

/// Location of the settings file.
///
/// `LIKEDTUBE_CONFIG` points to an explicit file, otherwise `config.json` in
/// the data directory is used.
pub fn settings_path() -> PathBuf {
    match env::var("LIKEDTUBE_CONFIG") {
        Ok(path) if !path.trim().is_empty() => PathBuf::from(path),
        _ => data_dir().join("config.json"),
    }
}

/// Location of the generated YouTube Music header file.
pub fn headers_path() -> PathBuf {
    data_dir().join("headers_auth.json")
}

/// Location of the cached Spotify token.
pub fn token_path() -> PathBuf {
    data_dir().join("cache/token.json")
}

/// Returns the address the OAuth callback listener binds to.
///
/// Must match the host and port of [`spotify_redirect_uri`].
pub fn server_addr() -> String {
    env_or("SERVER_ADDRESS", "127.0.0.1:8888")
}

/// Returns the Spotify OAuth redirect URI.
///
/// This has to be registered in the Spotify developer dashboard exactly as
/// returned here.
pub fn spotify_redirect_uri() -> String {
    env_or("SPOTIFY_API_REDIRECT_URI", "http://127.0.0.1:8888/callback")
}

/// Returns the scope requested during authorization. Read-only library
/// access is all the exporter needs.
pub fn spotify_scope() -> String {
    env_or("SPOTIFY_API_AUTH_SCOPE", "user-library-read")
}

/// Returns the Spotify OAuth authorization URL.
pub fn spotify_apiauth_url() -> String {
    env_or(
        "SPOTIFY_API_AUTH_URL",
        "https://accounts.spotify.com/authorize",
    )
}

/// Returns the Spotify Web API base URL.
pub fn spotify_apiurl() -> String {
    env_or("SPOTIFY_API_URL", "https://api.spotify.com/v1")
}

/// Returns the Spotify OAuth token exchange URL.
pub fn spotify_apitoken_url() -> String {
    env_or(
        "SPOTIFY_API_TOKEN_URL",
        "https://accounts.spotify.com/api/token",
    )
}

/// Returns the base URL of the YouTube Music internal API.
pub fn ytmusic_apiurl() -> String {
    env_or("YTMUSIC_API_URL", "https://music.youtube.com/youtubei/v1")
}

/// Explicit location of the `yt-dlp` executable, if configured.
pub fn ytdlp_path() -> Option<PathBuf> {
    env::var("YTDLP_PATH")
        .ok()
        .filter(|p| !p.trim().is_empty())
        .map(PathBuf::from)
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}
