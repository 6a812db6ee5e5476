use std::path::PathBuf;

use crate::{
    config, error, info,
    management::{LinkStore, SettingsManager, TerminalPrompt, setup},
    success,
    youtube::{
        headers::AuthHeaders,
        playlist::{YtMusic, export},
    },
    utils,
};

use super::migrate::{ask_title, print_export};

/// Creates a playlist from a link file of an earlier run.
///
/// Useful when the playlist step of a migration failed: the links are
/// already resolved, so neither Spotify nor `yt-dlp` is needed again.
pub async fn playlist(file: PathBuf) {
    let mut prompt = TerminalPrompt::new();
    let manager = SettingsManager::new(config::settings_path());
    let settings = match setup(&manager, &mut prompt).await {
        Ok(settings) => settings,
        Err(e) => {
            error!("Setup failed: {}", e);
            return;
        }
    };

    if !settings.ytmusic.is_complete() {
        error!("Missing YouTube Music credentials in {}", manager.path().display());
        return;
    }

    let store = LinkStore::new(file);
    let video_ids = match store.read_ids().await {
        Ok(ids) => ids,
        Err(e) => {
            error!("{}", e);
            return;
        }
    };

    if video_ids.is_empty() {
        error!("No video ids could be read from {}.", store.path().display());
        return;
    }
    success!("{} video IDs ready!", video_ids.len());

    let headers = AuthHeaders::from_settings(&settings.ytmusic);
    if let Err(e) = headers.persist(&config::headers_path()).await {
        info!("Header file not updated: {}", e);
    }

    let title = match ask_title(&mut prompt, video_ids.len()) {
        Ok(title) => title,
        Err(e) => {
            error!("{}", e);
            return;
        }
    };

    let description = utils::playlist_description(video_ids.len(), &store.file_name());
    let service = YtMusic::new(headers);
    let outcome = export(&service, &title, &description, &video_ids).await;
    print_export(&title, &outcome);
}
