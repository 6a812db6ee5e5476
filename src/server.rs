use axum::{Extension, Router, routing::get};
use std::{net::SocketAddr, str::FromStr, sync::Arc};
use tokio::{sync::Mutex, task::JoinHandle};

use crate::{api, config, types::OAuthSession, warning};

/// Binds the OAuth callback listener and serves it in the background.
///
/// Binding happens before this returns, so a busy port is reported to the
/// caller instead of surfacing as a login timeout. Abort the returned handle
/// to stop the listener.
pub async fn start_api_server(
    state: Arc<Mutex<Option<OAuthSession>>>,
) -> Result<JoinHandle<()>, String> {
    let app = Router::new()
        .route("/health", get(api::health))
        .route("/callback", get(api::callback).layer(Extension(state)));

    let addr = SocketAddr::from_str(&config::server_addr())
        .map_err(|e| format!("Failed to parse server address: {}", e))?;

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| format!("Failed to bind {}: {}", addr, e))?;

    Ok(tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            warning!("Callback server stopped: {}", e);
        }
    }))
}
