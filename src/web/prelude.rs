pub(crate) use crate::error::StudioError;
pub(crate) use crate::web::AppState;
pub(crate) use crate::web::session::StudioSession;
pub(crate) use askama::Template;
pub(crate) use askama_web::WebTemplate;
pub(crate) use axum::extract::{Form, State};
pub(crate) use axum::http::{HeaderValue, header::CONTENT_TYPE};
pub(crate) use axum::response::{Redirect, Response};
pub(crate) use serde::Deserialize;
pub(crate) use tracing::{debug, error, info};
