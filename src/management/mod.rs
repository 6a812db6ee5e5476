//! # Management Module
//!
//! Local state the exporter reads and writes between and during runs:
//!
//! - [`SettingsManager`] - the `config.json` settings file and the
//!   interactive setup that fills it ([`setup`], [`complete_settings`])
//! - [`TokenManager`] - the cached Spotify OAuth token, refreshed on demand
//! - [`LinkStore`] - the line-delimited export of resolved YouTube links
//! - [`CredentialProvider`] - how the user is asked for anything, with
//!   [`TerminalPrompt`] as the interactive implementation
//!
//! Every file is opened, written and closed within one call; nothing here
//! holds a handle across awaits.

mod auth;
mod links;
mod prompt;
mod settings;

pub use auth::TokenManager;
pub use links::LinkStore;
pub use links::LinkStoreError;
pub use prompt::CredentialProvider;
pub use prompt::PromptError;
pub use prompt::TerminalPrompt;
pub use settings::LoadedSettings;
pub use settings::Settings;
pub use settings::SettingsError;
pub use settings::SettingsManager;
pub use settings::SpotifySettings;
pub use settings::TestMode;
pub use settings::YtMusicSettings;
pub use settings::complete_settings;
pub use settings::setup;
