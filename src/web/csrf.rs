use rand::distr::{Alphanumeric, SampleString};
use tower_sessions::Session;
use tracing::debug;

use crate::constants::CSRF_TOKEN_LENGTH;
use crate::error::StudioError;

const CSRF_TOKEN_KEY: &str = "csrf_token";

fn generate_token() -> String {
    Alphanumeric.sample_string(&mut rand::rng(), CSRF_TOKEN_LENGTH)
}

/// Token embedded in every form on the page; stable for the session.
pub(crate) async fn csrf_token(session: &Session) -> Result<String, StudioError> {
    if let Some(existing) = session.get::<String>(CSRF_TOKEN_KEY).await? {
        return Ok(existing);
    }
    let token = generate_token();
    session.insert(CSRF_TOKEN_KEY, token.clone()).await?;
    Ok(token)
}

pub(crate) async fn validate_csrf(session: &Session, token: &str) -> Result<(), StudioError> {
    match session.get::<String>(CSRF_TOKEN_KEY).await? {
        Some(expected) if !token.is_empty() && expected == token => Ok(()),
        Some(_) => {
            debug!("Form token mismatch");
            Err(StudioError::Unauthorized)
        }
        None => {
            debug!("Form posted without a session token");
            Err(StudioError::Unauthorized)
        }
    }
}
