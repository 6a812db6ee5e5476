use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{
    management::prompt::{CredentialProvider, PromptError},
    success, utils, warning,
};

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("settings file I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("settings could not be serialized: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("setup was interrupted: {0}")]
    Prompt(#[from] PromptError),
}

/// Everything the exporter needs from the user, as stored in `config.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub spotify: SpotifySettings,
    #[serde(default)]
    pub ytmusic: YtMusicSettings,
    #[serde(default)]
    pub test_mode: TestMode,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpotifySettings {
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub client_secret: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct YtMusicSettings {
    #[serde(default)]
    pub authorization: String,
    #[serde(default)]
    pub cookie: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestMode {
    /// Upper bound on songs read from Spotify, `0` reads everything.
    #[serde(default)]
    pub max_songs: u32,
}

impl SpotifySettings {
    pub fn is_complete(&self) -> bool {
        !self.client_id.is_empty() && !self.client_secret.is_empty()
    }
}

impl YtMusicSettings {
    pub fn is_complete(&self) -> bool {
        !self.authorization.is_empty() && !self.cookie.is_empty()
    }
}

impl Settings {
    pub fn is_complete(&self) -> bool {
        self.spotify.is_complete() && self.ytmusic.is_complete()
    }
}

/// Result of reading the settings file.
#[derive(Debug, Clone)]
pub struct LoadedSettings {
    pub settings: Settings,
    /// `true` when the file was missing or unreadable and defaults were
    /// written in its place.
    pub created: bool,
}

pub struct SettingsManager {
    path: PathBuf,
}

impl SettingsManager {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        SettingsManager { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the settings file, writing defaults if it is missing or cannot
    /// be parsed.
    pub async fn load(&self) -> Result<LoadedSettings, SettingsError> {
        if self.path.is_file() {
            let content = async_fs::read_to_string(&self.path).await?;
            match serde_json::from_str::<Settings>(&content) {
                Ok(settings) => {
                    success!("{} loaded!", self.path.display());
                    return Ok(LoadedSettings {
                        settings,
                        created: false,
                    });
                }
                Err(e) => warning!("{} is invalid ({}), recreating it.", self.path.display(), e),
            }
        }

        let settings = Settings::default();
        self.persist(&settings).await?;
        success!("{} created!", self.path.display());
        Ok(LoadedSettings {
            settings,
            created: true,
        })
    }

    pub async fn persist(&self, settings: &Settings) -> Result<(), SettingsError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                async_fs::create_dir_all(parent).await?;
            }
        }

        let json = serde_json::to_string_pretty(settings)?;
        async_fs::write(&self.path, json).await?;
        Ok(())
    }
}

/// Asks for whatever is missing and for the test limit.
///
/// Returns the completed settings and whether anything changed.
pub fn complete_settings<P: CredentialProvider + ?Sized>(
    mut settings: Settings,
    prompt: &mut P,
) -> Result<(Settings, bool), PromptError> {
    let mut updated = false;

    if !settings.spotify.is_complete() {
        let (client_id, client_secret) = prompt.spotify_credentials()?;
        settings.spotify = SpotifySettings {
            client_id: client_id.trim().to_string(),
            client_secret: client_secret.trim().to_string(),
        };
        updated = true;
    }

    if !settings.ytmusic.is_complete() {
        let (authorization, cookie) = prompt.ytmusic_credentials()?;
        settings.ytmusic = YtMusicSettings {
            authorization: utils::strip_quotes(&authorization),
            cookie: utils::strip_quotes(&cookie),
        };
        updated = true;
    }

    let current = settings.test_mode.max_songs;
    let answer = prompt.max_songs(current)?;
    let max_songs = utils::parse_max_songs(&answer, current);
    if max_songs != current {
        settings.test_mode.max_songs = max_songs;
        updated = true;
    }

    Ok((settings, updated))
}

/// Loads the settings and runs the interactive setup when needed.
///
/// Setup runs if the file was just created or a credential is missing.
/// Changes are written back before returning. The returned value is not
/// modified afterwards.
pub async fn setup<P: CredentialProvider + ?Sized>(
    manager: &SettingsManager,
    prompt: &mut P,
) -> Result<Settings, SettingsError> {
    let loaded = manager.load().await?;
    if !loaded.created && loaded.settings.is_complete() {
        return Ok(loaded.settings);
    }

    let (settings, updated) = complete_settings(loaded.settings, prompt)?;
    if updated {
        manager.persist(&settings).await?;
        success!("{} updated!", manager.path().display());
    }
    Ok(settings)
}
