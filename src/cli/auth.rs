use crate::{
    config, error,
    management::{SettingsManager, TerminalPrompt, TokenManager, setup},
    spotify, success,
};

/// Logs in to Spotify in the browser and caches the token, replacing any
/// cached one.
pub async fn auth() {
    let mut prompt = TerminalPrompt::new();
    let manager = SettingsManager::new(config::settings_path());
    let settings = match setup(&manager, &mut prompt).await {
        Ok(settings) => settings,
        Err(e) => {
            error!("Setup failed: {}", e);
            return;
        }
    };

    if !settings.spotify.is_complete() {
        error!("Missing Spotify credentials in {}", manager.path().display());
        return;
    }

    match spotify::auth::authorize(&settings.spotify).await {
        Ok(token) => {
            let token_manager = TokenManager::new(token, &settings.spotify);
            if let Err(e) = token_manager.persist().await {
                error!("Failed to save token to cache: {}", e);
                return;
            }
            success!("Authentication successful!");
        }
        Err(e) => error!("{}", e),
    }
}
