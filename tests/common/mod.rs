#![allow(dead_code)]

use std::sync::Mutex;

use async_trait::async_trait;
use likedtube::{
    management::{CredentialProvider, PromptError},
    spotify::{LibraryError, library::LibrarySource},
    types::{SavedTrackItem, SavedTracksResponse, SpotifyTrack, TrackArtist, VideoId},
    youtube::{PlaylistError, SearchError, playlist::PlaylistService, search::VideoSearcher},
};

// Helper to build one saved-track entry
pub fn item(name: &str, artists: &[&str]) -> SavedTrackItem {
    SavedTrackItem {
        track: Some(SpotifyTrack {
            name: name.to_string(),
            artists: artists
                .iter()
                .map(|a| TrackArtist {
                    name: a.to_string(),
                })
                .collect(),
        }),
    }
}

// A track that was removed from Spotify, the API sends `"track": null`
pub fn removed() -> SavedTrackItem {
    SavedTrackItem { track: None }
}

pub fn video_id(raw: &str) -> VideoId {
    VideoId::parse(raw).expect("test id must be valid")
}

// 11 character ids: vid00000000, vid00000001, ...
pub fn video_ids(count: usize) -> Vec<VideoId> {
    (0..count).map(|i| video_id(&format!("vid{:08}", i))).collect()
}

/// Serves pre-built pages; page `n` links to `page-{n+1}`.
pub struct FakeLibrary {
    pages: Vec<Vec<SavedTrackItem>>,
    pub requested: Vec<Option<String>>,
    pub fail_on_page: Option<usize>,
}

impl FakeLibrary {
    pub fn new(pages: Vec<Vec<SavedTrackItem>>) -> Self {
        FakeLibrary {
            pages,
            requested: Vec::new(),
            fail_on_page: None,
        }
    }

    // (title, artist) pairs, newest first, split into pages of `per_page`
    pub fn with_tracks(tracks: &[(&str, &str)], per_page: usize) -> Self {
        let items: Vec<SavedTrackItem> = tracks
            .iter()
            .map(|&(name, artist)| item(name, &[artist]))
            .collect();
        Self::new(items.chunks(per_page).map(|c| c.to_vec()).collect())
    }
}

#[async_trait]
impl LibrarySource for FakeLibrary {
    async fn saved_tracks_page(
        &mut self,
        next: Option<&str>,
    ) -> Result<SavedTracksResponse, LibraryError> {
        self.requested.push(next.map(str::to_string));
        let index = match next {
            None => 0,
            Some(url) => url
                .trim_start_matches("page-")
                .parse::<usize>()
                .expect("fake page url"),
        };

        if self.fail_on_page == Some(index) {
            return Err(LibraryError::RateLimited(3600));
        }

        let items = self.pages.get(index).cloned().unwrap_or_default();
        let next = (index + 1 < self.pages.len()).then(|| format!("page-{}", index + 1));
        Ok(SavedTracksResponse {
            items,
            next,
            total: None,
        })
    }
}

type Answer = Box<dyn Fn(&str) -> Result<String, SearchError> + Send + Sync>;

/// Answers searches through a closure and records every target.
pub struct FakeSearcher {
    pub available: bool,
    answer: Answer,
    pub targets: Mutex<Vec<String>>,
}

impl FakeSearcher {
    pub fn new(answer: impl Fn(&str) -> Result<String, SearchError> + Send + Sync + 'static) -> Self {
        FakeSearcher {
            available: true,
            answer: Box::new(answer),
            targets: Mutex::new(Vec::new()),
        }
    }

    pub fn unavailable() -> Self {
        let mut searcher = Self::new(|_| Err(SearchError::Unavailable));
        searcher.available = false;
        searcher
    }

    pub fn targets(&self) -> Vec<String> {
        self.targets.lock().unwrap().clone()
    }
}

#[async_trait]
impl VideoSearcher for FakeSearcher {
    fn is_available(&self) -> bool {
        self.available
    }

    async fn search(&self, target: &str) -> Result<String, SearchError> {
        self.targets.lock().unwrap().push(target.to_string());
        (self.answer)(target)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreateCall {
    pub title: String,
    pub description: String,
    pub ids: Vec<VideoId>,
}

/// Records playlist calls instead of talking to YouTube Music.
#[derive(Default)]
pub struct FakePlaylists {
    pub fail_create: bool,
    pub fail_append: bool,
    pub creates: Mutex<Vec<CreateCall>>,
    pub appends: Mutex<Vec<(String, Vec<VideoId>)>>,
}

impl FakePlaylists {
    pub fn creates(&self) -> Vec<CreateCall> {
        self.creates.lock().unwrap().clone()
    }

    pub fn appends(&self) -> Vec<(String, Vec<VideoId>)> {
        self.appends.lock().unwrap().clone()
    }
}

#[async_trait]
impl PlaylistService for FakePlaylists {
    async fn create_playlist(
        &self,
        title: &str,
        description: &str,
        video_ids: &[VideoId],
    ) -> Result<String, PlaylistError> {
        self.creates.lock().unwrap().push(CreateCall {
            title: title.to_string(),
            description: description.to_string(),
            ids: video_ids.to_vec(),
        });
        if self.fail_create {
            return Err(PlaylistError::UnexpectedResponse("missing playlistId".into()));
        }
        Ok("PLfake".to_string())
    }

    async fn add_playlist_items(
        &self,
        playlist_id: &str,
        video_ids: &[VideoId],
    ) -> Result<(), PlaylistError> {
        self.appends
            .lock()
            .unwrap()
            .push((playlist_id.to_string(), video_ids.to_vec()));
        if self.fail_append {
            return Err(PlaylistError::Rejected("STATUS_FAILED".into()));
        }
        Ok(())
    }
}

/// Answers every question from a script and records what was asked.
#[derive(Default)]
pub struct ScriptedPrompt {
    pub spotify: (String, String),
    pub ytmusic: (String, String),
    pub max_songs: String,
    pub title: String,
    pub asked: Vec<&'static str>,
    pub paused: Vec<String>,
}

impl CredentialProvider for ScriptedPrompt {
    fn spotify_credentials(&mut self) -> Result<(String, String), PromptError> {
        self.asked.push("spotify");
        Ok(self.spotify.clone())
    }

    fn ytmusic_credentials(&mut self) -> Result<(String, String), PromptError> {
        self.asked.push("ytmusic");
        Ok(self.ytmusic.clone())
    }

    fn max_songs(&mut self, _current: u32) -> Result<String, PromptError> {
        self.asked.push("max_songs");
        Ok(self.max_songs.clone())
    }

    fn playlist_title(&mut self, _default: &str) -> Result<String, PromptError> {
        self.asked.push("title");
        Ok(self.title.clone())
    }

    fn pause(&mut self, message: &str) {
        self.paused.push(message.to_string());
    }
}
