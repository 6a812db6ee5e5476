//! # CLI Module
//!
//! User-facing commands. Each one reports through the crate's output macros
//! and never panics on bad input or network failures.
//!
//! - [`migrate`] - the full export: settings, Spotify login, liked songs,
//!   `yt-dlp` lookups, link file and YouTube Music playlist. This is what
//!   runs when no subcommand is given.
//! - [`playlist`] - builds a playlist from an existing link file
//! - [`auth`] - Spotify login only, refreshes the token cache
//!
//! The workflow behind [`migrate`] is available without a terminal as
//! [`run_migration`], driven through the [`crate::spotify::library::LibrarySource`],
//! [`crate::youtube::search::VideoSearcher`],
//! [`crate::youtube::playlist::PlaylistService`] and
//! [`crate::management::CredentialProvider`] traits.
//!
//! ```text
//! settings -> liked songs -> lookups -> link file -> ids -> playlist
//! ```

mod auth;
mod migrate;
mod playlist;

pub use auth::auth;
pub use migrate::MigrationError;
pub use migrate::MigrationOptions;
pub use migrate::MigrationSummary;
pub use migrate::RESOLVE_PACING;
pub use migrate::Resolution;
pub use migrate::migrate;
pub use migrate::prepare_run;
pub use migrate::resolve_tracks;
pub use migrate::run_migration;
pub use playlist::playlist;
