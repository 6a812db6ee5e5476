use std::sync::LazyLock;

use chrono::NaiveDate;
use rand::{Rng, distr::Alphanumeric};
use regex::Regex;

use crate::types::VideoId;

/// Maximum number of characters of a track string sent to the search.
pub const MAX_QUERY_LEN: usize = 80;

/// How often the resolve loop reports progress.
pub const PROGRESS_INTERVAL: usize = 20;

static QUERY_NOISE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s\-]").expect("query pattern is valid"));

// watch/embed, shorts and short-link shapes, tried in this order
static VIDEO_URL_PATTERNS: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    [
        Regex::new(r"(?:v=|/v/|vi=|/vi/|embed/)([^&\n?#]+)").expect("watch pattern is valid"),
        Regex::new(r"(?:youtube\.com/shorts/)([^&\n?#]+)").expect("shorts pattern is valid"),
        Regex::new(r"(?:youtu\.be/)([^&\n?#]+)").expect("short link pattern is valid"),
    ]
});

/// Random value for the OAuth `state` parameter.
pub fn generate_state() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(32)
        .map(char::from)
        .collect()
}

/// Cleans a track string for the video search.
///
/// Everything but word characters, whitespace and `-` becomes a space, the
/// result is cut to [`MAX_QUERY_LEN`] characters and trimmed. Applying it
/// twice gives the same result as applying it once.
pub fn normalize_query(raw: &str) -> String {
    let cleaned = QUERY_NOISE.replace_all(raw, " ");
    let truncated: String = cleaned.chars().take(MAX_QUERY_LEN).collect();
    truncated.trim().to_string()
}

/// The two `yt-dlp` search targets for a normalized query: quoted first,
/// then unquoted.
pub fn search_targets(query: &str) -> [String; 2] {
    [
        format!("ytsearch1:\"{}\"", query),
        format!("ytsearch1:{}", query),
    ]
}

/// Pulls the video id out of a YouTube URL.
///
/// Understands `watch?v=`, `/v/`, `vi=`, `/vi/`, `/embed/`, `/shorts/` and
/// `youtu.be/` links. Returns `None` if no shape matches or the captured
/// segment is not a valid id.
pub fn extract_video_id(url: &str) -> Option<VideoId> {
    VIDEO_URL_PATTERNS.iter().find_map(|pattern| {
        let captured = pattern.captures(url)?.get(1)?.as_str();
        let candidate = captured.split('?').next().unwrap_or(captured);
        VideoId::parse(candidate)
    })
}

/// Whether the resolve loop should print progress after item `current`
/// (1-based) out of `total`.
pub fn should_report_progress(current: usize, total: usize) -> bool {
    current % PROGRESS_INTERVAL == 0 || current == total
}

pub fn progress_percent(current: usize, total: usize) -> f64 {
    if total == 0 {
        return 100.0;
    }
    current as f64 / total as f64 * 100.0
}

/// Interprets the answer to the max-songs prompt.
///
/// Only a plain digit string changes the value; anything else (including an
/// empty answer) keeps `current`.
pub fn parse_max_songs(input: &str, current: u32) -> u32 {
    let input = input.trim();
    if input.is_empty() || !input.chars().all(|c| c.is_ascii_digit()) {
        return current;
    }
    input.parse().unwrap_or(current)
}

/// Removes whitespace and surrounding quotes from a pasted header value.
pub fn strip_quotes(value: &str) -> String {
    value
        .trim()
        .trim_matches(|c| c == '"' || c == '\'')
        .to_string()
}

pub fn default_playlist_title(count: usize) -> String {
    format!("Spotify Liked Songs ({})", count)
}

pub fn playlist_description(count: usize, link_file: &str) -> String {
    format!("Imported {} Spotify songs - {}", count, link_file)
}

/// Name of the link export for a run that read `track_count` songs.
pub fn link_file_name(track_count: usize) -> String {
    format!("spotify_liked_songs_{}songs.txt", track_count)
}

/// Web client version string YouTube Music expects in request contexts.
pub fn ytmusic_client_version(date: NaiveDate) -> String {
    format!("1.{}.01.00", date.format("%Y%m%d"))
}

pub fn playlist_url(playlist_id: &str) -> String {
    format!("https://music.youtube.com/playlist?list={}", playlist_id)
}
