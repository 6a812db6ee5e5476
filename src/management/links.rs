use std::path::{Path, PathBuf};

use crate::{
    types::{VideoId, VideoLink},
    utils,
};

#[derive(Debug, thiserror::Error)]
pub enum LinkStoreError {
    #[error("link file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Plain text export of resolved links, one watch URL per line.
pub struct LinkStore {
    path: PathBuf,
}

impl LinkStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        LinkStore { path: path.into() }
    }

    /// Store named after the number of songs read, inside `dir`.
    pub fn for_run(dir: &Path, track_count: usize) -> Self {
        Self::new(dir.join(utils::link_file_name(track_count)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Replaces the file with `links` in the given order.
    pub async fn write(&self, links: &[VideoLink]) -> Result<(), LinkStoreError> {
        let mut content = String::new();
        for link in links {
            content.push_str(&link.url());
            content.push('\n');
        }

        async_fs::write(&self.path, content)
            .await
            .map_err(|source| self.io_error(source))
    }

    /// Reads the file back into video ids, skipping lines that are not a
    /// recognised YouTube URL.
    pub async fn read_ids(&self) -> Result<Vec<VideoId>, LinkStoreError> {
        let content = async_fs::read_to_string(&self.path)
            .await
            .map_err(|source| self.io_error(source))?;

        Ok(content
            .lines()
            .map(str::trim)
            .filter_map(utils::extract_video_id)
            .collect())
    }

    fn io_error(&self, source: std::io::Error) -> LinkStoreError {
        LinkStoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}
