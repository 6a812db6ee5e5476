use dialoguer::{Input, Password};

use crate::{config, info};

#[derive(Debug, thiserror::Error)]
pub enum PromptError {
    #[error("failed to read input: {0}")]
    Input(#[from] dialoguer::Error),
}

/// Everything the exporter asks the user.
///
/// Answers are returned as typed; trimming and validation happen in the
/// callers. Tests drive the workflow headless with a scripted implementation.
pub trait CredentialProvider {
    /// Spotify app client id and secret.
    fn spotify_credentials(&mut self) -> Result<(String, String), PromptError>;

    /// `Authorization` and `Cookie` header values copied from a logged-in
    /// YouTube Music browser session.
    fn ytmusic_credentials(&mut self) -> Result<(String, String), PromptError>;

    /// Raw answer to the test-limit question.
    fn max_songs(&mut self, current: u32) -> Result<String, PromptError>;

    /// Raw playlist title; empty means "use `default`".
    fn playlist_title(&mut self, default: &str) -> Result<String, PromptError>;

    /// Blocks until the user acknowledges `message`.
    fn pause(&mut self, message: &str);
}

/// Prompts on the terminal.
#[derive(Default)]
pub struct TerminalPrompt;

impl TerminalPrompt {
    pub fn new() -> Self {
        TerminalPrompt
    }
}

fn banner(title: &str, lines: &[String]) {
    println!("\n{}", "=".repeat(60));
    info!("{}", title);
    for line in lines {
        println!("  {}", line);
    }
    println!("{}", "=".repeat(60));
}

fn ask(prompt: &str) -> Result<String, PromptError> {
    Ok(Input::<String>::new()
        .with_prompt(prompt)
        .allow_empty(true)
        .interact_text()?)
}

impl CredentialProvider for TerminalPrompt {
    fn spotify_credentials(&mut self) -> Result<(String, String), PromptError> {
        banner(
            "SPOTIFY SETUP",
            &[
                "1. https://developer.spotify.com/dashboard".to_string(),
                format!(
                    "2. Create App -> add redirect URI: {}",
                    config::spotify_redirect_uri()
                ),
            ],
        );

        let client_id = ask("CLIENT_ID")?;
        let client_secret = Password::new()
            .with_prompt("CLIENT_SECRET")
            .allow_empty_password(true)
            .interact()?;
        Ok((client_id, client_secret))
    }

    fn ytmusic_credentials(&mut self) -> Result<(String, String), PromptError> {
        banner(
            "YOUTUBE MUSIC SETUP",
            &[
                "1. Open https://music.youtube.com while logged in".to_string(),
                "2. Developer tools (F12) -> Network -> pick a 'browse' request".to_string(),
                "3. Copy exactly two request header values:".to_string(),
                "   Authorization: SAPISIDHASH ...".to_string(),
                "   Cookie: LOGIN_INFO=...; VISITOR_INFO1_LIVE=...".to_string(),
            ],
        );

        let authorization = ask("PASTE_AUTHORIZATION")?;
        let cookie = ask("PASTE_COOKIE")?;
        Ok((authorization, cookie))
    }

    fn max_songs(&mut self, current: u32) -> Result<String, PromptError> {
        ask(&format!(
            "MAX_SONGS_TEST (current={}, Enter=keep, 0=full)",
            current
        ))
    }

    fn playlist_title(&mut self, default: &str) -> Result<String, PromptError> {
        ask(&format!("Playlist name (Enter='{}')", default))
    }

    fn pause(&mut self, message: &str) {
        // nothing left to do if stdin is gone
        let _ = Input::<String>::new()
            .with_prompt(message)
            .allow_empty(true)
            .interact_text();
    }
}
