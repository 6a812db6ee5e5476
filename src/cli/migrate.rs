use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use tabled::Table;
use tokio::time::sleep;

use crate::{
    config, error, info,
    management::{
        CredentialProvider, LinkStore, LinkStoreError, PromptError, Settings, SettingsError,
        SettingsManager, TerminalPrompt, setup,
    },
    spotify::{
        self, LibraryError,
        library::{LibrarySource, SpotifyLibrary, read_liked_songs},
    },
    success,
    types::{ResolveResult, SummaryTableRow, Track, VideoLink},
    utils, warning,
    youtube::{
        PlaylistError,
        headers::AuthHeaders,
        playlist::{ExportOutcome, ExportReport, PlaylistService, YtMusic, export},
        search::{VideoSearcher, YtDlp, resolve},
    },
};

/// Pause after every lookup so the search backend is not hammered.
pub const RESOLVE_PACING: Duration = Duration::from_millis(300);

#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    #[error("Setup failed: {0}")]
    Setup(#[from] SettingsError),
    #[error("Missing required config values!")]
    IncompleteConfig,
    #[error("Spotify error: {0}")]
    Library(#[from] LibraryError),
    #[error("No liked songs found.")]
    NoTracks,
    #[error("yt-dlp not found. Install it, place it next to the program or set YTDLP_PATH.")]
    ToolUnavailable,
    #[error("No YouTube links found.")]
    NoLinks,
    #[error(transparent)]
    LinkStore(#[from] LinkStoreError),
    #[error("No video ids could be read from {0}.")]
    NoVideoIds(String),
    #[error(transparent)]
    Prompt(#[from] PromptError),
}

/// Inputs of a migration run taken from the settings.
#[derive(Debug, Clone)]
pub struct MigrationOptions {
    pub max_songs: u32,
    pub output_dir: PathBuf,
    pub pacing: Duration,
}

impl MigrationOptions {
    pub fn new(settings: &Settings, output_dir: impl Into<PathBuf>) -> Self {
        MigrationOptions {
            max_songs: settings.test_mode.max_songs,
            output_dir: output_dir.into(),
            pacing: RESOLVE_PACING,
        }
    }
}

/// Result of the resolve step.
#[derive(Debug, Default)]
pub struct Resolution {
    pub links: Vec<VideoLink>,
    pub unmatched: usize,
    pub tool_missing: bool,
}

#[derive(Debug)]
pub struct MigrationSummary {
    pub tracks_read: usize,
    pub links_found: usize,
    pub unmatched: usize,
    pub link_file: PathBuf,
    pub title: String,
    /// The playlist step never aborts the run, its outcome is reported.
    pub playlist: Result<ExportReport, PlaylistError>,
}

/// Interactive migration as started from the command line.
///
/// Whatever happens, the run ends with a "Press Enter" pause.
pub async fn migrate() {
    info!("SPOTIFY -> YOUTUBE MUSIC PLAYLIST EXPORTER");
    let mut prompt = TerminalPrompt::new();
    migrate_with(&mut prompt).await;
    prompt.pause("Press Enter to exit...");
}

async fn migrate_with(prompt: &mut TerminalPrompt) {
    let manager = SettingsManager::new(config::settings_path());
    let (settings, headers) = match prepare_run(&manager, prompt, &config::headers_path()).await
    {
        Ok(prepared) => prepared,
        Err(e) => {
            error!("{}", e);
            return;
        }
    };

    let token_mgr = match spotify::auth::login(&settings.spotify).await {
        Ok(manager) => manager,
        Err(e) => {
            error!("Spotify error: {}", e);
            return;
        }
    };

    let mut library = SpotifyLibrary::new(token_mgr);
    let searcher = YtDlp::locate();
    let playlists = YtMusic::new(headers);
    let output_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let options = MigrationOptions::new(&settings, output_dir);

    match run_migration(&options, &mut library, &searcher, &playlists, prompt).await {
        Ok(summary) => print_summary(&summary),
        Err(e) => error!("{}", e),
    }
}

/// Loads and completes the settings, then regenerates the header file the
/// playlist client is built from.
///
/// Stops with [`MigrationError::IncompleteConfig`] if a credential is still
/// empty after setup; nothing else is touched in that case.
pub async fn prepare_run<C: CredentialProvider + ?Sized>(
    manager: &SettingsManager,
    prompt: &mut C,
    headers_path: &Path,
) -> Result<(Settings, AuthHeaders), MigrationError> {
    let settings = setup(manager, prompt).await?;
    if !settings.is_complete() {
        return Err(MigrationError::IncompleteConfig);
    }

    let headers = AuthHeaders::from_settings(&settings.ytmusic);
    let persisted = headers.persist(headers_path).await;
    let headers = match persisted {
        Ok(()) => {
            success!("{} created!", headers_path.display());
            AuthHeaders::load(headers_path).await.unwrap_or(headers)
        }
        Err(e) => {
            warning!("Failed to write {}: {}", headers_path.display(), e);
            headers
        }
    };

    Ok((settings, headers))
}

/// The migration workflow without any terminal or network specifics.
///
/// Reads the library, resolves every track, writes the link file, reads the
/// ids back and exports them as a playlist. Returns an error for the cases
/// that end the run: no songs, no links, no ids. Unmatched tracks and a
/// failing playlist step are reported in the summary instead.
pub async fn run_migration<L, S, P, C>(
    options: &MigrationOptions,
    library: &mut L,
    searcher: &S,
    playlists: &P,
    prompt: &mut C,
) -> Result<MigrationSummary, MigrationError>
where
    L: LibrarySource + ?Sized,
    S: VideoSearcher + ?Sized,
    P: PlaylistService + ?Sized,
    C: CredentialProvider + ?Sized,
{
    info!("STEP 1/3: Loading Spotify liked songs...");
    info!("MAX_SONGS={}", options.max_songs);
    let tracks = read_liked_songs(library, options.max_songs).await?;
    if tracks.is_empty() {
        return Err(MigrationError::NoTracks);
    }

    info!("STEP 2/3: Finding YouTube links...");
    let resolution = resolve_tracks(&tracks, searcher, options.pacing).await;

    let store = LinkStore::for_run(&options.output_dir, tracks.len());
    store.write(&resolution.links).await?;
    success!("{}/{} links found!", resolution.links.len(), tracks.len());
    info!("Saved: {}", store.path().display());

    if resolution.links.is_empty() {
        return Err(if resolution.tool_missing {
            MigrationError::ToolUnavailable
        } else {
            MigrationError::NoLinks
        });
    }

    info!("STEP 3/3: Creating playlist...");
    let video_ids = store.read_ids().await?;
    success!("{} video IDs ready!", video_ids.len());
    if video_ids.is_empty() {
        return Err(MigrationError::NoVideoIds(store.file_name()));
    }

    let title = ask_title(prompt, video_ids.len())?;
    let description = utils::playlist_description(video_ids.len(), &store.file_name());
    let playlist = export(playlists, &title, &description, &video_ids).await;

    Ok(MigrationSummary {
        tracks_read: tracks.len(),
        links_found: resolution.links.len(),
        unmatched: resolution.unmatched,
        link_file: store.path().to_path_buf(),
        title,
        playlist,
    })
}

/// Looks every track up, one after another, in library order.
///
/// Stops early if the search tool turns out to be missing.
pub async fn resolve_tracks<S: VideoSearcher + ?Sized>(
    tracks: &[Track],
    searcher: &S,
    pacing: Duration,
) -> Resolution {
    let total = tracks.len();
    let mut resolution = Resolution::default();
    info!("Processing {} songs...", total);

    for (index, track) in tracks.iter().enumerate() {
        let current = index + 1;
        if utils::should_report_progress(current, total) {
            info!(
                "Progress: {}/{} ({:.1}%)",
                current,
                total,
                utils::progress_percent(current, total)
            );
        }

        match resolve(searcher, &track.to_string()).await {
            ResolveResult::Found(link) => resolution.links.push(link),
            ResolveResult::NotFound => resolution.unmatched += 1,
            ResolveResult::ToolUnavailable => {
                warning!("yt-dlp not found, stopping the search.");
                resolution.tool_missing = true;
                break;
            }
        }

        if !pacing.is_zero() {
            sleep(pacing).await;
        }
    }

    resolution
}

pub(crate) fn ask_title<C: CredentialProvider + ?Sized>(
    prompt: &mut C,
    count: usize,
) -> Result<String, PromptError> {
    let default = utils::default_playlist_title(count);
    let answer = prompt.playlist_title(&default)?;
    let answer = answer.trim();
    Ok(if answer.is_empty() {
        default
    } else {
        answer.to_string()
    })
}

/// Reports how the playlist step went.
pub(crate) fn print_export(title: &str, playlist: &Result<ExportReport, PlaylistError>) {
    match playlist {
        Ok(report) => {
            match &report.append_error {
                Some(e) => warning!(
                    "PARTIAL: '{}' - only the first {} songs made it into the playlist ({}).",
                    title,
                    report.created_with,
                    e
                ),
                None => success!("SUCCESS! '{}' - {} songs", title, report.total()),
            }
            info!("{}", utils::playlist_url(&report.playlist_id));
        }
        Err(e) => {
            warning!("Playlist step reported an error: {}", e);
            warning!("Check your YouTube Music library, the playlist may exist anyway.");
        }
    }
}

fn print_summary(summary: &MigrationSummary) {
    print_export(&summary.title, &summary.playlist);

    let songs = summary.playlist.as_ref().map_or(0, ExportReport::total);
    let playlist = match ExportOutcome::of(&summary.playlist) {
        ExportOutcome::Complete => format!("{} ({} songs)", summary.title, songs),
        ExportOutcome::Partial => format!("{} (partial, {} songs)", summary.title, songs),
        ExportOutcome::Failed => format!("{} (unverified)", summary.title),
    };

    let rows = vec![
        SummaryTableRow {
            step: "Liked songs".to_string(),
            result: summary.tracks_read.to_string(),
        },
        SummaryTableRow {
            step: "Links found".to_string(),
            result: summary.links_found.to_string(),
        },
        SummaryTableRow {
            step: "Unmatched".to_string(),
            result: summary.unmatched.to_string(),
        },
        SummaryTableRow {
            step: "Link file".to_string(),
            result: display_name(&summary.link_file),
        },
        SummaryTableRow {
            step: "Playlist".to_string(),
            result: playlist,
        },
    ];
    println!("{}", Table::new(rows));
    info!("YouTube Music -> Library -> Playlists");
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
