//! Media file routes
//!
//! `GET {media_url}/{path}` serves `{media_root}/{path}` unless the policy
//! registry denies the request, in which case the answer is the same
//! `404 Not Found` a missing file gets.

use crate::access_control::MediaPath;
use crate::auth::SharedAuthenticator;
use crate::config::ServerConfig;
use crate::error::AccessError;
use crate::gate::Gate;
use crate::util::{decode_media_path, normalize_media_path, parse_bind_addr};
use axum::{
    Router,
    extract::{Request, State},
    middleware::{self, Next},
    response::{IntoResponse, Response},
};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Shared state for the media routes
#[derive(Clone)]
pub struct MediaState {
    pub gate: Gate,
    pub auth: SharedAuthenticator,
}

impl MediaState {
    pub fn new(gate: Gate, auth: SharedAuthenticator) -> Self {
        Self { gate, auth }
    }
}

/// Middleware deciding each media request before the file is looked up.
///
/// Runs inside the media mount, so the request path is already relative to
/// `media_url`. The path is checked in the form `ServeDir` resolves it, with
/// `.` and empty segments removed. Paths with `..` get a 404 here.
pub async fn enforce_media_access(
    State(state): State<MediaState>,
    request: Request,
    next: Next,
) -> Response {
    let decision = {
        let decoded = decode_media_path(request.uri().path());
        match normalize_media_path(&decoded) {
            Some(path) => {
                let principal = state.auth.authenticate(request.headers());
                state
                    .gate
                    .authorize(&principal, MediaPath::from_utf8_or_bytes(&path))
            }
            None => Err(AccessError::not_found(
                String::from_utf8_lossy(&decoded).into_owned(),
            )),
        }
    };

    match decision {
        Ok(()) => next.run(request).await,
        Err(err) => err.into_response(),
    }
}

/// Build the router serving `config.media_root` under `config.media_url`
pub fn media_router(config: &ServerConfig, state: MediaState) -> Router {
    let media = ServiceBuilder::new()
        .layer(middleware::from_fn_with_state(state, enforce_media_access))
        .service(ServeDir::new(&config.media_root));

    Router::new()
        .nest_service(config.media_mount(), media)
        .layer(TraceLayer::new_for_http())
}

/// Run the media server until Ctrl+C or SIGTERM
pub async fn run_server(config: &ServerConfig, state: MediaState) -> anyhow::Result<()> {
    let bind_addr = parse_bind_addr(&config.host, config.port)?;
    let app = media_router(config, state);

    let listener = TcpListener::bind(bind_addr).await?;
    info!(
        media_url = config.media_mount(),
        media_root = %config.media_root.display(),
        "Media server listening on http://{}",
        bind_addr
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Media server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("Received shutdown signal");
}
