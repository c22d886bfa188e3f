//! Error handling

use axum::response::IntoResponse;
use tracing::info;

/// Errors returned by the web handlers.
#[derive(Debug)]
pub enum StudioError {
    /// When you didn't do the right thing
    BadRequest,
    /// Missing or invalid CSRF token
    Unauthorized,
    /// When a requested resource is not found
    NotFound(String),
    /// When an internal server error occurs, including failed feedback writes
    InternalServerError(String),
}

impl std::fmt::Display for StudioError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BadRequest => write!(f, "Bad request"),
            Self::Unauthorized => write!(f, "Unauthorized"),
            Self::NotFound(what) => write!(f, "Not found: {what}"),
            Self::InternalServerError(message) => write!(f, "Internal server error: {message}"),
        }
    }
}

impl std::error::Error for StudioError {}

impl From<std::io::Error> for StudioError {
    fn from(err: std::io::Error) -> Self {
        StudioError::InternalServerError(err.to_string())
    }
}

impl From<axum::http::Error> for StudioError {
    fn from(err: axum::http::Error) -> Self {
        StudioError::InternalServerError(err.to_string())
    }
}

impl From<tower_sessions::session::Error> for StudioError {
    fn from(err: tower_sessions::session::Error) -> Self {
        StudioError::InternalServerError(err.to_string())
    }
}

impl From<axum::extract::multipart::MultipartError> for StudioError {
    fn from(err: axum::extract::multipart::MultipartError) -> Self {
        info!("Malformed upload: {}", err);
        StudioError::BadRequest
    }
}

impl IntoResponse for StudioError {
    fn into_response(self) -> axum::response::Response {
        match self {
            StudioError::BadRequest => {
                info!("Bad request received");
                let mut response =
                    axum::response::Response::new(axum::body::Body::from("Bad Request"));
                *response.status_mut() = axum::http::StatusCode::BAD_REQUEST;
                response
            }
            StudioError::Unauthorized => {
                info!("Unauthorized request received");
                let mut response = axum::response::Response::new(axum::body::Body::from(
                    "Unauthorized: invalid or missing form token, reload the page and try again.",
                ));
                *response.status_mut() = axum::http::StatusCode::UNAUTHORIZED;
                response
            }
            StudioError::NotFound(url) => {
                tracing::debug!("404 {url}");
                let mut response =
                    axum::response::Response::new(axum::body::Body::from("Not Found"));
                *response.status_mut() = axum::http::StatusCode::NOT_FOUND;
                response
            }
            StudioError::InternalServerError(message) => {
                tracing::error!("Internal server error: {}", message);
                let mut response =
                    axum::response::Response::new(axum::body::Body::from("Internal server error"));
                *response.status_mut() = axum::http::StatusCode::INTERNAL_SERVER_ERROR;
                response
            }
        }
    }
}
