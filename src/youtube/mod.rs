//! # YouTube Module
//!
//! Everything on the destination side of the export:
//!
//! - [`search`] - resolves a track string to a video with `yt-dlp`
//! - [`headers`] - the browser-captured request headers used to talk to
//!   YouTube Music, persisted as `headers_auth.json`
//! - [`playlist`] - creates the playlist and appends what does not fit into
//!   the creation call

pub mod headers;
pub mod playlist;
pub mod search;

use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("yt-dlp executable not found")]
    Unavailable,
    #[error("failed to run yt-dlp: {0}")]
    Spawn(#[from] std::io::Error),
    #[error("yt-dlp did not answer within {0:?}")]
    Timeout(Duration),
    #[error("yt-dlp exited with {0}")]
    Failed(std::process::ExitStatus),
    #[error("yt-dlp printed non UTF-8 output")]
    InvalidOutput,
}

#[derive(Debug, thiserror::Error)]
pub enum PlaylistError {
    #[error("YouTube Music request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("invalid header {0}")]
    InvalidHeader(String),
    #[error("header file I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("header file is malformed: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("unexpected YouTube Music response: {0}")]
    UnexpectedResponse(String),
    #[error("YouTube Music rejected the change: {0}")]
    Rejected(String),
}
