use std::{sync::Arc, time::Duration};

use reqwest::{Client, Url};
use tokio::sync::Mutex;

use crate::{
    config, info,
    management::{SpotifySettings, TokenManager},
    server::start_api_server,
    success,
    types::{OAuthSession, Token, TokenResponse},
    utils, warning,
};

use super::AuthError;

/// How long the login waits for the browser to hit the callback.
const LOGIN_TIMEOUT: Duration = Duration::from_secs(120);

/// Returns a token manager holding a usable Spotify token.
///
/// A cached token is reused when it belongs to the configured app and has
/// the required scope; an expired one is refreshed. Otherwise the browser
/// login from [`authorize`] runs and its token is cached for the next run.
pub async fn login(credentials: &SpotifySettings) -> Result<TokenManager, AuthError> {
    if let Ok(cached) = TokenManager::load(credentials).await {
        if cached.is_usable() {
            if !cached.is_expired() {
                success!("Connected to Spotify!");
                return Ok(cached);
            }

            match cached.refresh_token().await {
                Ok(token) => {
                    let manager = TokenManager::new(token, credentials);
                    if let Err(e) = manager.persist().await {
                        warning!("Failed to save token to cache: {}", e);
                    }
                    success!("Connected to Spotify!");
                    return Ok(manager);
                }
                Err(e) => warning!("Cached Spotify token could not be refreshed: {}", e),
            }
        }
    }

    let token = authorize(credentials).await?;
    let manager = TokenManager::new(token, credentials);
    if let Err(e) = manager.persist().await {
        warning!("Failed to save token to cache: {}", e);
    }

    success!("Connected to Spotify!");
    Ok(manager)
}

/// Builds the URL the user is sent to for granting access.
pub fn authorize_url(credentials: &SpotifySettings, state: &str) -> Result<String, AuthError> {
    let url = Url::parse_with_params(
        &config::spotify_apiauth_url(),
        &[
            ("client_id", credentials.client_id.as_str()),
            ("response_type", "code"),
            ("redirect_uri", config::spotify_redirect_uri().as_str()),
            ("scope", config::spotify_scope().as_str()),
            ("state", state),
        ],
    )
    .map_err(|e| AuthError::InvalidRequest(e.to_string()))?;

    Ok(url.to_string())
}

/// Runs the OAuth 2.0 authorization-code flow.
///
/// 1. Starts the local callback listener on the redirect address
/// 2. Opens the authorization URL in the default browser
/// 3. Waits for the callback to exchange the code for a token
///
/// The listener is shut down again once the flow ends, successful or not.
pub async fn authorize(credentials: &SpotifySettings) -> Result<Token, AuthError> {
    let state = utils::generate_state();
    let shared_state = Arc::new(Mutex::new(Some(OAuthSession {
        state: state.clone(),
        credentials: credentials.clone(),
        token: None,
        error: None,
    })));

    let server = start_api_server(Arc::clone(&shared_state))
        .await
        .map_err(AuthError::Server)?;

    let auth_url = match authorize_url(credentials, &state) {
        Ok(url) => url,
        Err(e) => {
            server.abort();
            return Err(e);
        }
    };

    if webbrowser::open(&auth_url).is_err() {
        warning!(
            "Failed to open browser. Please navigate to the following URL manually:\n{}",
            auth_url
        )
    } else {
        info!("Waiting for Spotify login in your browser...");
    }

    let outcome = wait_for_token(shared_state, LOGIN_TIMEOUT).await;
    server.abort();
    outcome
}

/// Polls the shared session until the callback stored a token or an error,
/// or `max_wait` has passed.
pub async fn wait_for_token(
    shared_state: Arc<Mutex<Option<OAuthSession>>>,
    max_wait: Duration,
) -> Result<Token, AuthError> {
    use std::time::Instant;

    let start = Instant::now();

    loop {
        {
            let lock = shared_state.lock().await;
            if let Some(session) = lock.as_ref() {
                if let Some(token) = &session.token {
                    return Ok(token.clone());
                }
                if let Some(error) = &session.error {
                    return Err(AuthError::Denied(error.clone()));
                }
            }
        }

        if start.elapsed() >= max_wait {
            return Err(AuthError::Timeout);
        }
        tokio::time::sleep(Duration::from_secs(1)).await;
    }
}

/// Exchanges an authorization code for a token, authenticating the app
/// with its client id and secret.
pub async fn exchange_code(
    code: &str,
    credentials: &SpotifySettings,
) -> Result<Token, reqwest::Error> {
    let redirect_uri = config::spotify_redirect_uri();

    let client = Client::new();
    let res = client
        .post(config::spotify_apitoken_url())
        .basic_auth(&credentials.client_id, Some(&credentials.client_secret))
        .form(&[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", redirect_uri.as_str()),
        ])
        .send()
        .await?
        .error_for_status()?;

    let response: TokenResponse = res.json().await?;
    Ok(Token::from_response(response, &credentials.client_id, ""))
}
