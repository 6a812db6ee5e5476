use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde::{Serialize, de::DeserializeOwned};

use crate::{
    config, success,
    types::{
        ClientContext, ClientInfo, CreatePlaylistRequest, CreatePlaylistResponse,
        EditPlaylistRequest, EditPlaylistResponse, PLAYLIST_BATCH_LIMIT, PlaylistAction,
        PlaylistBatch, VideoId,
    },
    utils, warning,
};

use super::{PlaylistError, headers::AuthHeaders};

/// Playlist operations of the destination service.
#[async_trait]
pub trait PlaylistService: Send + Sync {
    /// Creates a private playlist holding `video_ids` and returns its id.
    async fn create_playlist(
        &self,
        title: &str,
        description: &str,
        video_ids: &[VideoId],
    ) -> Result<String, PlaylistError>;

    /// Appends `video_ids` to an existing playlist, skipping duplicates.
    async fn add_playlist_items(
        &self,
        playlist_id: &str,
        video_ids: &[VideoId],
    ) -> Result<(), PlaylistError>;
}

/// Client for the YouTube Music web API, authenticated with browser headers.
pub struct YtMusic {
    headers: AuthHeaders,
    client: Client,
    base_url: String,
}

impl YtMusic {
    pub fn new(headers: AuthHeaders) -> Self {
        YtMusic {
            headers,
            client: Client::new(),
            base_url: config::ytmusic_apiurl(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn context() -> ClientContext {
        ClientContext {
            client: ClientInfo {
                client_name: "WEB_REMIX".to_string(),
                client_version: utils::ytmusic_client_version(Utc::now().date_naive()),
                hl: "en".to_string(),
            },
            user: serde_json::Map::new(),
        }
    }

    async fn send_request<B: Serialize + Sync, R: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<R, PlaylistError> {
        let api_url = format!(
            "{base}/{endpoint}?alt=json",
            base = self.base_url.trim_end_matches('/'),
            endpoint = endpoint
        );

        let response = self
            .client
            .post(&api_url)
            .json(body)
            .headers(self.headers.to_header_map()?)
            .send()
            .await?
            .error_for_status()?;

        Ok(response.json::<R>().await?)
    }
}

#[async_trait]
impl PlaylistService for YtMusic {
    async fn create_playlist(
        &self,
        title: &str,
        description: &str,
        video_ids: &[VideoId],
    ) -> Result<String, PlaylistError> {
        let body = CreatePlaylistRequest {
            context: Self::context(),
            title: title.to_string(),
            description: description.to_string(),
            privacy_status: "PRIVATE".to_string(),
            video_ids: video_ids.iter().map(|id| id.to_string()).collect(),
        };

        let response: CreatePlaylistResponse = self.send_request("playlist/create", &body).await?;
        response
            .playlist_id
            .ok_or_else(|| PlaylistError::UnexpectedResponse("missing playlistId".to_string()))
    }

    async fn add_playlist_items(
        &self,
        playlist_id: &str,
        video_ids: &[VideoId],
    ) -> Result<(), PlaylistError> {
        let body = EditPlaylistRequest {
            context: Self::context(),
            playlist_id: playlist_id
                .strip_prefix("VL")
                .unwrap_or(playlist_id)
                .to_string(),
            actions: video_ids
                .iter()
                .map(|id| PlaylistAction {
                    action: "ACTION_ADD_VIDEO".to_string(),
                    added_video_id: id.to_string(),
                    dedupe_option: "DEDUPE_OPTION_SKIP".to_string(),
                })
                .collect(),
        };

        let response: EditPlaylistResponse =
            self.send_request("browse/edit_playlist", &body).await?;
        match response.status {
            Some(status) if status.contains("SUCCEEDED") => Ok(()),
            Some(status) => Err(PlaylistError::Rejected(status)),
            None => Err(PlaylistError::UnexpectedResponse(
                "missing status".to_string(),
            )),
        }
    }
}

/// What an export achieved.
#[derive(Debug)]
pub struct ExportReport {
    pub playlist_id: String,
    /// Videos sent with the creation call.
    pub created_with: usize,
    /// Videos appended afterwards.
    pub appended: usize,
    /// Set when the append call failed. The playlist exists regardless.
    pub append_error: Option<PlaylistError>,
}

impl ExportReport {
    pub fn total(&self) -> usize {
        self.created_with + self.appended
    }

    pub fn is_complete(&self) -> bool {
        self.append_error.is_none()
    }
}

/// How an export ended, as reported to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportOutcome {
    /// Every id made it into the playlist.
    Complete,
    /// The playlist exists but the append call failed.
    Partial,
    /// Creation failed; the playlist may or may not exist.
    Failed,
}

impl ExportOutcome {
    pub fn of(result: &Result<ExportReport, PlaylistError>) -> Self {
        match result {
            Ok(report) if report.is_complete() => ExportOutcome::Complete,
            Ok(_) => ExportOutcome::Partial,
            Err(_) => ExportOutcome::Failed,
        }
    }
}

/// Creates the playlist with the first [`PLAYLIST_BATCH_LIMIT`] ids and
/// appends the rest in a second call, keeping the order.
///
/// A failing creation is returned as error. A failing append is recorded in
/// the report; the playlist is not rolled back.
pub async fn export<P: PlaylistService + ?Sized>(
    service: &P,
    title: &str,
    description: &str,
    video_ids: &[VideoId],
) -> Result<ExportReport, PlaylistError> {
    let batch = PlaylistBatch::split(video_ids, PLAYLIST_BATCH_LIMIT);

    let playlist_id = service
        .create_playlist(title, description, batch.initial)
        .await?;
    success!("Playlist created: {}", playlist_id);

    let mut report = ExportReport {
        playlist_id,
        created_with: batch.initial.len(),
        appended: 0,
        append_error: None,
    };

    if !batch.overflow.is_empty() {
        match service
            .add_playlist_items(&report.playlist_id, batch.overflow)
            .await
        {
            Ok(()) => {
                report.appended = batch.overflow.len();
                success!("All songs added!");
            }
            Err(e) => {
                warning!(
                    "Adding the remaining {} songs failed: {}",
                    batch.overflow.len(),
                    e
                );
                report.append_error = Some(e);
            }
        }
    }

    Ok(report)
}
