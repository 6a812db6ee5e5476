use std::{collections::HashMap, sync::Arc};

use axum::{Extension, extract::Query, response::Html};
use tokio::sync::Mutex;

use crate::{spotify::auth::exchange_code, types::OAuthSession, warning};

/// Receives the redirect from Spotify's authorization page.
///
/// Stores either the exchanged token or the failure reason in the shared
/// session, where [`crate::spotify::auth::wait_for_token`] picks it up.
pub async fn callback(
    Query(params): Query<HashMap<String, String>>,
    Extension(shared_state): Extension<Arc<Mutex<Option<OAuthSession>>>>,
) -> Html<&'static str> {
    let mut state = shared_state.lock().await;
    let Some(session) = state.as_mut() else {
        return Html("<h4>No login in progress.</h4>");
    };

    if let Some(error) = params.get("error") {
        session.error = Some(error.clone());
        return Html("<h4>Login was denied.</h4>");
    }

    // a stray request must not end the login
    if params.get("state") != Some(&session.state) {
        return Html("<h4>Unknown login request.</h4>");
    }

    let Some(code) = params.get("code") else {
        return Html("<h4>Missing authorization code.</h4>");
    };

    let credentials = session.credentials.clone();
    match exchange_code(code, &credentials).await {
        Ok(token) => {
            session.token = Some(token);
            Html("<h2>Authentication successful.</h2><p>Close browser window.</p>")
        }
        Err(e) => {
            warning!("Token exchange failed: {}", e);
            session.error = Some(e.to_string());
            Html("<h4>Login failed.</h4>")
        }
    }
}
