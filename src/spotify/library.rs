use std::time::Duration;

use async_trait::async_trait;
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::{Client, StatusCode};
use tokio::time::sleep;

use crate::{
    config,
    management::TokenManager,
    success,
    types::{SavedTracksResponse, Track},
    warning,
};

use super::LibraryError;

/// Items per saved-tracks page, the API maximum.
pub const PAGE_SIZE: u32 = 50;

/// Retries of a `502 Bad Gateway` answer before the read gives up.
pub const MAX_BAD_GATEWAY_RETRIES: u32 = 3;

const BAD_GATEWAY_DELAY: Duration = Duration::from_secs(10);

/// Source of saved-track pages.
#[async_trait]
pub trait LibrarySource: Send {
    /// Fetches one page. `None` asks for the first page, otherwise the
    /// `next` URL of the previous page.
    async fn saved_tracks_page(
        &mut self,
        next: Option<&str>,
    ) -> Result<SavedTracksResponse, LibraryError>;
}

/// Saved tracks of the logged-in user through the Spotify Web API.
pub struct SpotifyLibrary {
    token_mgr: TokenManager,
    client: Client,
    retry_delay: Duration,
}

impl SpotifyLibrary {
    pub fn new(token_mgr: TokenManager) -> Self {
        SpotifyLibrary {
            token_mgr,
            client: Client::new(),
            retry_delay: BAD_GATEWAY_DELAY,
        }
    }

    /// Wait between `502` retries.
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    fn first_page_url() -> String {
        format!(
            "{uri}/me/tracks?limit={limit}&offset=0",
            uri = &config::spotify_apiurl(),
            limit = PAGE_SIZE
        )
    }
}

#[async_trait]
impl LibrarySource for SpotifyLibrary {
    async fn saved_tracks_page(
        &mut self,
        next: Option<&str>,
    ) -> Result<SavedTracksResponse, LibraryError> {
        let api_url = next
            .map(str::to_string)
            .unwrap_or_else(Self::first_page_url);
        let mut bad_gateway_retries = 0;

        loop {
            let token = self.token_mgr.get_valid_token().await;
            let response = self.client.get(&api_url).bearer_auth(token).send().await?;

            if response.status() == StatusCode::TOO_MANY_REQUESTS {
                let retry_after = response
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse::<u64>().ok())
                    .unwrap_or(1);
                if retry_after <= 120 {
                    sleep(Duration::from_secs(retry_after)).await;
                    continue;
                }
                return Err(LibraryError::RateLimited(retry_after));
            }

            let response = match response.error_for_status() {
                Ok(valid_response) => valid_response,
                Err(err) => {
                    if err.status() == Some(StatusCode::BAD_GATEWAY)
                        && bad_gateway_retries < MAX_BAD_GATEWAY_RETRIES
                    {
                        bad_gateway_retries += 1;
                        warning!(
                            "Spotify answered 502, retry {}/{}",
                            bad_gateway_retries,
                            MAX_BAD_GATEWAY_RETRIES
                        );
                        sleep(self.retry_delay).await;
                        continue;
                    }
                    return Err(err.into());
                }
            };

            return Ok(response.json::<SavedTracksResponse>().await?);
        }
    }
}

/// Reads the liked songs, oldest first.
///
/// Pages are fetched until the collection ends or `max_songs` tracks were
/// collected (`0` means no limit). Entries without a track payload, such as
/// tracks removed from Spotify, are skipped and do not count towards the
/// limit. The API lists newest first; the collected list is reversed before
/// it is returned.
pub async fn read_liked_songs<S: LibrarySource + ?Sized>(
    source: &mut S,
    max_songs: u32,
) -> Result<Vec<Track>, LibraryError> {
    let limit = max_songs as usize;
    let reached = |count: usize| limit > 0 && count >= limit;

    let pb = ProgressBar::new_spinner();
    pb.set_message("Fetching liked songs...");
    pb.enable_steady_tick(Duration::from_millis(100));
    if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
        pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
    }

    let mut tracks: Vec<Track> = Vec::new();
    let mut next: Option<String> = None;

    loop {
        let page = match source.saved_tracks_page(next.as_deref()).await {
            Ok(page) => page,
            Err(e) => {
                pb.finish_and_clear();
                return Err(e);
            }
        };

        if page.items.is_empty() {
            break;
        }

        for item in page.items {
            if reached(tracks.len()) {
                break;
            }
            let Some(track) = item.track else {
                continue;
            };
            tracks.push(Track::from(track));
        }

        pb.set_message(format!("Loaded: {} songs...", tracks.len()));

        if reached(tracks.len()) {
            break;
        }

        match page.next {
            Some(url) => next = Some(url),
            None => break,
        }
    }

    pb.finish_and_clear();

    if tracks.is_empty() {
        warning!("No liked songs found.");
    } else {
        success!("Found {} liked songs!", tracks.len());
    }

    tracks.reverse();
    Ok(tracks)
}
