mod common;

use std::time::Duration;

use common::{FakeLibrary, FakePlaylists, FakeSearcher, ScriptedPrompt, item};
use likedtube::cli::{MigrationError, MigrationOptions, prepare_run, run_migration};
use likedtube::management::{
    Settings, SettingsManager, SpotifySettings, TestMode, YtMusicSettings,
};
use likedtube::youtube::{SearchError, headers::AuthHeaders};

fn options(dir: &tempfile::TempDir, max_songs: u32) -> MigrationOptions {
    MigrationOptions {
        max_songs,
        output_dir: dir.path().to_path_buf(),
        pacing: Duration::ZERO,
    }
}

// Song A -> aaaaaaaaaaa, Song B -> bbbbbbbbbbb, nothing else matches
fn searcher() -> FakeSearcher {
    FakeSearcher::new(|target| {
        if target.contains("Song A") {
            Ok("aaaaaaaaaaa".to_string())
        } else if target.contains("Song B") {
            Ok("bbbbbbbbbbb".to_string())
        } else {
            Ok(String::new())
        }
    })
}

// Newest first, as the API returns it
fn two_song_library() -> FakeLibrary {
    FakeLibrary::new(vec![vec![
        item("Song B", &["Artist Y"]),
        item("Song A", &["Artist X"]),
    ]])
}

#[tokio::test]
async fn test_migration_two_songs() {
    let dir = tempfile::tempdir().unwrap();
    let mut library = two_song_library();
    let playlists = FakePlaylists::default();
    let mut prompt = ScriptedPrompt::default();

    let summary = run_migration(
        &options(&dir, 0),
        &mut library,
        &searcher(),
        &playlists,
        &mut prompt,
    )
    .await
    .unwrap();

    assert_eq!(summary.tracks_read, 2);
    assert_eq!(summary.links_found, 2);
    assert_eq!(summary.unmatched, 0);

    // Link file in library order, oldest first
    let link_file = dir.path().join("spotify_liked_songs_2songs.txt");
    assert_eq!(summary.link_file, link_file);
    assert_eq!(
        std::fs::read_to_string(&link_file).unwrap(),
        "https://www.youtube.com/watch?v=aaaaaaaaaaa\nhttps://www.youtube.com/watch?v=bbbbbbbbbbb\n"
    );

    // An empty title answer takes the default
    assert_eq!(prompt.asked, vec!["title"]);
    assert_eq!(summary.title, "Spotify Liked Songs (2)");

    let creates = playlists.creates();
    assert_eq!(creates.len(), 1);
    assert_eq!(creates[0].title, "Spotify Liked Songs (2)");
    assert_eq!(
        creates[0].description,
        "Imported 2 Spotify songs - spotify_liked_songs_2songs.txt"
    );
    let ids: Vec<&str> = creates[0].ids.iter().map(|id| id.as_str()).collect();
    assert_eq!(ids, vec!["aaaaaaaaaaa", "bbbbbbbbbbb"]);
    assert!(playlists.appends().is_empty());

    let report = summary.playlist.unwrap();
    assert_eq!(report.total(), 2);
}

#[tokio::test]
async fn test_migration_custom_title() {
    let dir = tempfile::tempdir().unwrap();
    let mut library = two_song_library();
    let playlists = FakePlaylists::default();
    let mut prompt = ScriptedPrompt {
        title: "  Road Trip  ".to_string(),
        ..Default::default()
    };

    let summary = run_migration(
        &options(&dir, 0),
        &mut library,
        &searcher(),
        &playlists,
        &mut prompt,
    )
    .await
    .unwrap();

    assert_eq!(summary.title, "Road Trip");
    assert_eq!(playlists.creates()[0].title, "Road Trip");
}

#[tokio::test]
async fn test_migration_unmatched_tracks() {
    let dir = tempfile::tempdir().unwrap();
    let mut library = FakeLibrary::new(vec![vec![
        item("Song C", &["Artist Z"]),
        item("Song B", &["Artist Y"]),
        item("Song A", &["Artist X"]),
    ]]);
    let playlists = FakePlaylists::default();
    let mut prompt = ScriptedPrompt::default();

    let summary = run_migration(
        &options(&dir, 0),
        &mut library,
        &searcher(),
        &playlists,
        &mut prompt,
    )
    .await
    .unwrap();

    // The file is named after the songs read, not the links found
    assert!(summary.link_file.ends_with("spotify_liked_songs_3songs.txt"));
    assert_eq!(summary.links_found, 2);
    assert_eq!(summary.unmatched, 1);
    assert_eq!(summary.title, "Spotify Liked Songs (2)");
}

#[tokio::test]
async fn test_migration_respects_limit() {
    let dir = tempfile::tempdir().unwrap();
    let mut library = two_song_library();
    let playlists = FakePlaylists::default();
    let mut prompt = ScriptedPrompt::default();

    let summary = run_migration(
        &options(&dir, 1),
        &mut library,
        &searcher(),
        &playlists,
        &mut prompt,
    )
    .await
    .unwrap();

    assert_eq!(summary.tracks_read, 1);
    let creates = playlists.creates();
    let ids: Vec<&str> = creates[0].ids.iter().map(|id| id.as_str()).collect();
    assert_eq!(ids, vec!["bbbbbbbbbbb"]);
}

#[tokio::test]
async fn test_migration_large_library_appends() {
    let dir = tempfile::tempdir().unwrap();
    let names: Vec<String> = (0..150).map(|i| format!("Track {}", i)).collect();
    let entries: Vec<(&str, &str)> = names.iter().map(|n| (n.as_str(), "Artist")).collect();
    let mut library = FakeLibrary::with_tracks(&entries, 50);
    let playlists = FakePlaylists::default();
    let mut prompt = ScriptedPrompt::default();

    // Every track gets its own id: "Track 7" -> "t0000000007"
    let searcher = FakeSearcher::new(|target| {
        let number: u32 = target
            .trim_start_matches("ytsearch1:\"Track ")
            .trim_end_matches(" Artist\"")
            .parse()
            .map_err(|_| SearchError::InvalidOutput)?;
        Ok(format!("t{:010}", number))
    });

    let summary = run_migration(
        &options(&dir, 0),
        &mut library,
        &searcher,
        &playlists,
        &mut prompt,
    )
    .await
    .unwrap();

    assert_eq!(summary.links_found, 150);
    assert_eq!(playlists.creates()[0].ids.len(), 100);
    assert_eq!(playlists.appends()[0].1.len(), 50);

    // Oldest song first
    assert_eq!(playlists.creates()[0].ids[0].as_str(), "t0000000149");
    assert_eq!(summary.playlist.unwrap().total(), 150);
}

#[tokio::test]
async fn test_migration_no_tracks() {
    let dir = tempfile::tempdir().unwrap();
    let mut library = FakeLibrary::new(vec![vec![]]);
    let playlists = FakePlaylists::default();
    let mut prompt = ScriptedPrompt::default();
    let searcher = searcher();

    let err = run_migration(
        &options(&dir, 0),
        &mut library,
        &searcher,
        &playlists,
        &mut prompt,
    )
    .await
    .unwrap_err();

    assert!(matches!(err, MigrationError::NoTracks));
    assert!(searcher.targets().is_empty());
    assert!(playlists.creates().is_empty());
    assert!(prompt.asked.is_empty());
}

#[tokio::test]
async fn test_migration_no_links() {
    let dir = tempfile::tempdir().unwrap();
    let mut library = two_song_library();
    let playlists = FakePlaylists::default();
    let mut prompt = ScriptedPrompt::default();

    let err = run_migration(
        &options(&dir, 0),
        &mut library,
        &FakeSearcher::new(|_| Ok(String::new())),
        &playlists,
        &mut prompt,
    )
    .await
    .unwrap_err();

    assert!(matches!(err, MigrationError::NoLinks));
    assert!(playlists.creates().is_empty());

    // The empty link file is still written
    let link_file = dir.path().join("spotify_liked_songs_2songs.txt");
    assert_eq!(std::fs::read_to_string(link_file).unwrap(), "");
}

#[tokio::test]
async fn test_migration_without_search_tool() {
    let dir = tempfile::tempdir().unwrap();
    let mut library = two_song_library();
    let playlists = FakePlaylists::default();
    let mut prompt = ScriptedPrompt::default();

    let err = run_migration(
        &options(&dir, 0),
        &mut library,
        &FakeSearcher::unavailable(),
        &playlists,
        &mut prompt,
    )
    .await
    .unwrap_err();

    assert!(matches!(err, MigrationError::ToolUnavailable));
    assert!(playlists.creates().is_empty());
}

#[tokio::test]
async fn test_migration_playlist_failure_is_not_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let mut library = two_song_library();
    let playlists = FakePlaylists {
        fail_create: true,
        ..Default::default()
    };
    let mut prompt = ScriptedPrompt::default();

    let summary = run_migration(
        &options(&dir, 0),
        &mut library,
        &searcher(),
        &playlists,
        &mut prompt,
    )
    .await
    .unwrap();

    assert!(summary.playlist.is_err());
    assert!(summary.link_file.is_file());
}

#[test]
fn test_migration_options_from_settings() {
    let settings = Settings {
        test_mode: TestMode { max_songs: 42 },
        ..Default::default()
    };

    let options = MigrationOptions::new(&settings, "/tmp/out");
    assert_eq!(options.max_songs, 42);
    assert_eq!(options.output_dir, std::path::PathBuf::from("/tmp/out"));
    assert_eq!(options.pacing, likedtube::cli::RESOLVE_PACING);
}

fn complete_settings() -> Settings {
    Settings {
        spotify: SpotifySettings {
            client_id: "client".to_string(),
            client_secret: "secret".to_string(),
        },
        ytmusic: YtMusicSettings {
            authorization: "SAPISIDHASH 1_abc".to_string(),
            cookie: "SID=1; SAPISID=key".to_string(),
        },
        test_mode: TestMode { max_songs: 0 },
    }
}

#[tokio::test]
async fn test_prepare_run_stops_on_incomplete_config() {
    let dir = tempfile::tempdir().unwrap();
    let manager = SettingsManager::new(dir.path().join("config.json"));
    let headers_path = dir.path().join("headers_auth.json");

    // The cookie answer is left empty
    let mut prompt = ScriptedPrompt {
        spotify: ("client".to_string(), "secret".to_string()),
        ytmusic: ("SAPISIDHASH 1_abc".to_string(), "   ".to_string()),
        ..Default::default()
    };

    let err = prepare_run(&manager, &mut prompt, &headers_path)
        .await
        .unwrap_err();
    assert!(matches!(err, MigrationError::IncompleteConfig));
    assert_eq!(err.to_string(), "Missing required config values!");
    assert_eq!(prompt.asked, vec!["spotify", "ytmusic", "max_songs"]);

    // Nothing past the settings step ran
    assert!(!headers_path.exists());
    assert!(prompt.paused.is_empty());
}

#[tokio::test]
async fn test_prepare_run_regenerates_header_file() {
    let dir = tempfile::tempdir().unwrap();
    let manager = SettingsManager::new(dir.path().join("config.json"));
    manager.persist(&complete_settings()).await.unwrap();

    let headers_path = dir.path().join("headers_auth.json");
    let stale = AuthHeaders::from_settings(&YtMusicSettings {
        authorization: "SAPISIDHASH 0_old".to_string(),
        cookie: "SID=old".to_string(),
    });
    stale.persist(&headers_path).await.unwrap();
    let mut prompt = ScriptedPrompt::default();

    let (settings, headers) = prepare_run(&manager, &mut prompt, &headers_path)
        .await
        .unwrap();
    assert_eq!(settings, complete_settings());
    assert!(prompt.asked.is_empty());

    let expected = AuthHeaders::from_settings(&complete_settings().ytmusic);
    assert_eq!(headers, expected);
    assert_eq!(AuthHeaders::load(&headers_path).await.unwrap(), expected);
}

#[tokio::test]
async fn test_prepare_run_first_run_writes_everything() {
    let dir = tempfile::tempdir().unwrap();
    let manager = SettingsManager::new(dir.path().join("config.json"));
    let headers_path = dir.path().join("nested").join("headers_auth.json");
    let mut prompt = ScriptedPrompt {
        spotify: ("client".to_string(), "secret".to_string()),
        ytmusic: (
            "SAPISIDHASH 1_abc".to_string(),
            "SID=1; SAPISID=key".to_string(),
        ),
        max_songs: "0".to_string(),
        ..Default::default()
    };

    let (settings, _) = prepare_run(&manager, &mut prompt, &headers_path)
        .await
        .unwrap();
    assert_eq!(settings, complete_settings());
    assert_eq!(manager.load().await.unwrap().settings, complete_settings());
    assert!(headers_path.is_file());
}
