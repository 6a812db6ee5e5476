use std::{
    path::{Path, PathBuf},
    process::Stdio,
    time::Duration,
};

use async_trait::async_trait;
use tokio::{process::Command, time::timeout};

use crate::{
    config,
    types::{ResolveResult, VideoId},
    utils,
};

use super::SearchError;

/// Upper bound for a single `yt-dlp` invocation.
pub const SEARCH_TIMEOUT: Duration = Duration::from_secs(15);

/// Something that turns a search target into a video id.
#[async_trait]
pub trait VideoSearcher: Send + Sync {
    fn is_available(&self) -> bool;

    /// Runs one search and returns the tool's output, trimmed.
    async fn search(&self, target: &str) -> Result<String, SearchError>;
}

/// `yt-dlp` run as a child process with `--get-id`.
pub struct YtDlp {
    executable: Option<PathBuf>,
    timeout: Duration,
}

impl YtDlp {
    /// Looks for the executable: `YTDLP_PATH`, then `yt-dlp(.exe)` in the
    /// working directory, then `yt-dlp` on `PATH`.
    pub fn locate() -> Self {
        Self::with_executable(find_executable())
    }

    pub fn with_executable(executable: Option<PathBuf>) -> Self {
        YtDlp {
            executable,
            timeout: SEARCH_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn executable(&self) -> Option<&Path> {
        self.executable.as_deref()
    }
}

fn find_executable() -> Option<PathBuf> {
    if let Some(path) = config::ytdlp_path() {
        return path.is_file().then_some(path);
    }

    if let Ok(cwd) = std::env::current_dir() {
        for name in ["yt-dlp.exe", "yt-dlp"] {
            let local = cwd.join(name);
            if local.is_file() {
                return Some(local);
            }
        }
    }

    which::which("yt-dlp").ok()
}

#[async_trait]
impl VideoSearcher for YtDlp {
    fn is_available(&self) -> bool {
        self.executable.as_deref().is_some_and(Path::is_file)
    }

    async fn search(&self, target: &str) -> Result<String, SearchError> {
        let Some(executable) = &self.executable else {
            return Err(SearchError::Unavailable);
        };

        let mut command = Command::new(executable);
        command
            .arg(target)
            .args(["--get-id", "--skip-download"])
            .stdin(Stdio::null())
            .kill_on_drop(true);

        let output = timeout(self.timeout, command.output())
            .await
            .map_err(|_| SearchError::Timeout(self.timeout))??;

        let stdout = String::from_utf8(output.stdout).map_err(|_| SearchError::InvalidOutput)?;
        let stdout = stdout.trim();
        if stdout.is_empty() && !output.status.success() {
            return Err(SearchError::Failed(output.status));
        }
        Ok(stdout.to_string())
    }
}

/// Finds the video for one track string.
///
/// The normalized query is tried quoted first, then unquoted. An answer
/// counts only if it is a valid 11 character id; failed or timed out runs
/// fall through to the next variant. Nothing is cached, so duplicate
/// tracks are looked up again.
pub async fn resolve<S: VideoSearcher + ?Sized>(searcher: &S, track: &str) -> ResolveResult {
    if !searcher.is_available() {
        return ResolveResult::ToolUnavailable;
    }

    let query = utils::normalize_query(track);
    if query.is_empty() {
        return ResolveResult::NotFound;
    }

    for target in utils::search_targets(&query) {
        match searcher.search(&target).await {
            Ok(output) => {
                if let Some(id) = VideoId::parse(&output) {
                    return ResolveResult::Found(id.into());
                }
            }
            Err(SearchError::Unavailable) => return ResolveResult::ToolUnavailable,
            Err(_) => continue,
        }
    }

    ResolveResult::NotFound
}
