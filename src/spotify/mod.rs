//! # Spotify Module
//!
//! Spotify Web API integration: the OAuth 2.0 authorization-code login in
//! [`auth`] and the paginated liked-songs reader in [`library`].
//!
//! Only read access to the user's library is requested
//! (`user-library-read`). Requests that hit `429 Too Many Requests` honour
//! the `Retry-After` header; `502 Bad Gateway` is retried after ten seconds.

pub mod auth;
pub mod library;

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("callback server: {0}")]
    Server(String),
    #[error("invalid authorization request: {0}")]
    InvalidRequest(String),
    #[error("authorization was rejected: {0}")]
    Denied(String),
    #[error("authentication failed or timed out")]
    Timeout,
}

#[derive(Debug, thiserror::Error)]
pub enum LibraryError {
    #[error("Spotify request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Spotify rate limit asks to wait {0} seconds, try again later")]
    RateLimited(u64),
}
