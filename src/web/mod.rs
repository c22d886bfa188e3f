//! Browser front-end: upload, generate, download and feedback.

use std::num::NonZeroU16;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::header::CONTENT_TYPE;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;
use tower_sessions::{Expiry, SessionManagerLayer};
use tracing::{error, info};

use crate::constants::{MAX_UPLOAD_BYTES, SESSION_CACHE_BYTES, SESSION_INACTIVITY_SECONDS};
use crate::feedback::FeedbackSink;
use crate::inference::InferenceClient;

mod actions;
mod csrf;
mod flash;
mod images;
mod prelude;
mod session;
mod store;
mod views;

use actions::{feedback_handler, generate_handler, upload_handler};
use images::{download_handler, generated_image_handler, uploaded_image_handler};
use store::SessionCache;
use views::root_handler;

/// Shared by every request; per-user state lives in the session instead.
#[derive(Clone, Debug)]
pub struct AppState {
    inference: InferenceClient,
    feedback: FeedbackSink,
}

impl AppState {
    /// Bundles the remote client and the feedback file.
    pub fn new(inference: InferenceClient, feedback: FeedbackSink) -> Self {
        Self {
            inference,
            feedback,
        }
    }
}

fn create_router() -> Router<AppState> {
    Router::new()
        .route("/", get(root_handler))
        .route("/static/styles.css", get(styles_handler))
        .route("/upload", post(upload_handler))
        .route("/generate", post(generate_handler))
        .route("/feedback", post(feedback_handler))
        .route("/images/uploaded", get(uploaded_image_handler))
        .route("/images/generated", get(generated_image_handler))
        .route("/download", get(download_handler))
}

async fn styles_handler() -> impl IntoResponse {
    const STYLES: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/static/styles.css"));
    ([(CONTENT_TYPE, "text/css")], STYLES)
}

/// The full application with session handling.
pub fn build_app(state: AppState, secure_cookies: bool) -> Router {
    let store = SessionCache::new(
        SESSION_CACHE_BYTES,
        std::time::Duration::from_secs(SESSION_INACTIVITY_SECONDS.unsigned_abs()),
    );
    let session_layer = SessionManagerLayer::new(store)
        .with_secure(secure_cookies)
        .with_expiry(Expiry::OnInactivity(time::Duration::seconds(
            SESSION_INACTIVITY_SECONDS,
        )));

    create_router()
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(session_layer)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", err);
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}

/// Binds the listener and serves until ctrl-c.
pub async fn setup_server(
    listen_addr: &str,
    port: NonZeroU16,
    state: AppState,
    secure_cookies: bool,
) -> Result<(), anyhow::Error> {
    let app = build_app(state, secure_cookies);

    let addr = format!("{}:{}", listen_addr, port);
    info!("Starting server on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    if let Err(err) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("Server error: {}", err);
    }
    Ok(())
}
