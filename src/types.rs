use std::fmt;

use serde::{Deserialize, Serialize};
use tabled::Tabled;

use crate::management::SpotifySettings;

/// Maximum number of videos YouTube Music accepts in a playlist-creation call.
pub const PLAYLIST_BATCH_LIMIT: usize = 100;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub refresh_token: String,
    pub scope: String,
    pub expires_in: u64,
    pub obtained_at: u64,
    #[serde(default)]
    pub client_id: String,
}

impl Token {
    /// Builds a token from a token-endpoint answer. Spotify may omit the
    /// refresh token on refresh, in which case `previous_refresh` is kept.
    pub fn from_response(response: TokenResponse, client_id: &str, previous_refresh: &str) -> Token {
        Token {
            access_token: response.access_token,
            refresh_token: response
                .refresh_token
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| previous_refresh.to_string()),
            scope: response.scope.unwrap_or_default(),
            expires_in: response.expires_in.unwrap_or(3600),
            obtained_at: chrono::Utc::now().timestamp() as u64,
            client_id: client_id.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub scope: Option<String>,
    pub expires_in: Option<u64>,
}

/// State shared between the login flow and the callback handler.
#[derive(Debug, Clone)]
pub struct OAuthSession {
    pub state: String,
    pub credentials: SpotifySettings,
    pub token: Option<Token>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedTracksResponse {
    pub items: Vec<SavedTrackItem>,
    pub next: Option<String>,
    pub total: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedTrackItem {
    #[serde(default)]
    pub track: Option<SpotifyTrack>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpotifyTrack {
    pub name: String,
    pub artists: Vec<TrackArtist>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackArtist {
    pub name: String,
}

/// A liked song as far as the exporter cares: a title and its artists in
/// credit order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    pub title: String,
    pub artists: Vec<String>,
}

impl From<SpotifyTrack> for Track {
    fn from(track: SpotifyTrack) -> Self {
        Track {
            title: track.name,
            artists: track.artists.into_iter().map(|a| a.name).collect(),
        }
    }
}

impl fmt::Display for Track {
    /// `"<title> <artist1>, <artist2>"`, the string fed to the video search.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.title, self.artists.join(", "))
    }
}

/// An 11 character YouTube video identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VideoId(String);

impl VideoId {
    pub const LEN: usize = 11;

    /// Accepts exactly 11 characters out of `[A-Za-z0-9_-]`.
    pub fn parse(raw: &str) -> Option<VideoId> {
        let valid = raw.len() == Self::LEN
            && raw
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        valid.then(|| VideoId(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Watch URL of a single video. Only built from a [`VideoId`], so every
/// link is well-formed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoLink(VideoId);

impl VideoLink {
    pub fn id(&self) -> &VideoId {
        &self.0
    }

    pub fn url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.0)
    }
}

impl From<VideoId> for VideoLink {
    fn from(id: VideoId) -> Self {
        VideoLink(id)
    }
}

impl fmt::Display for VideoLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url())
    }
}

/// Outcome of looking up a single track.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveResult {
    Found(VideoLink),
    NotFound,
    /// The search executable is missing; no lookup was attempted.
    ToolUnavailable,
}

/// Ids split at the playlist-creation limit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistBatch<'a> {
    pub initial: &'a [VideoId],
    pub overflow: &'a [VideoId],
}

impl<'a> PlaylistBatch<'a> {
    pub fn split(ids: &'a [VideoId], limit: usize) -> Self {
        let (initial, overflow) = ids.split_at(ids.len().min(limit));
        PlaylistBatch { initial, overflow }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ClientContext {
    pub client: ClientInfo,
    pub user: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientInfo {
    pub client_name: String,
    pub client_version: String,
    pub hl: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePlaylistRequest {
    pub context: ClientContext,
    pub title: String,
    pub description: String,
    pub privacy_status: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub video_ids: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePlaylistResponse {
    pub playlist_id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditPlaylistRequest {
    pub context: ClientContext,
    pub playlist_id: String,
    pub actions: Vec<PlaylistAction>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistAction {
    pub action: String,
    pub added_video_id: String,
    pub dedupe_option: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EditPlaylistResponse {
    pub status: Option<String>,
}

#[derive(Tabled)]
pub struct SummaryTableRow {
    pub step: String,
    pub result: String,
}
