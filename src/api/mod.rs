//! # API Module
//!
//! HTTP endpoints served by the short-lived local listener that completes
//! the Spotify login:
//!
//! - [`callback`] - receives the authorization code from Spotify's redirect,
//!   checks the `state` parameter and exchanges the code for a token
//! - [`health`] - reports name and version, handy to check the listener is up
//!
//! The listener only runs while [`crate::spotify::auth::authorize`] waits for
//! the browser; see [`crate::server`].

mod callback;
mod health;

pub use callback::callback;
pub use health::health;
