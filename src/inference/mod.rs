//! Clients for the two remote models: visual question answering and image
//! generation. Every call returns a [`Result`]; nothing here shows anything
//! to the user, that's up to the caller.

use serde::Serialize;
use tracing::debug;
use url::Url;

use crate::config::InferenceConfig;

pub mod analysis;
pub mod generation;

/// How much of an error body is kept for the notice text.
const ERROR_BODY_PREVIEW_CHARS: usize = 200;

/// Failures from a remote model call.
#[derive(Debug)]
pub enum RemoteError {
    /// The HTTP client couldn't be constructed.
    ClientBuild(reqwest::Error),
    /// Connection, TLS or timeout failure.
    Transport(reqwest::Error),
    /// The endpoint answered with a non-2xx status.
    Status {
        /// Response status
        status: reqwest::StatusCode,
        /// Start of the response body
        body: String,
    },
    /// The response didn't have the expected shape.
    MalformedResponse(String),
    /// The generation endpoint returned something that isn't an image.
    UndecodableImage(image::ImageError),
}

impl std::fmt::Display for RemoteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ClientBuild(err) => write!(f, "Failed to build HTTP client: {err}"),
            Self::Transport(err) => write!(f, "Request failed: {err}"),
            Self::Status { status, body } if body.is_empty() => {
                write!(f, "Remote model returned {status}")
            }
            Self::Status { status, body } => write!(f, "Remote model returned {status}: {body}"),
            Self::MalformedResponse(detail) => write!(f, "Unexpected response: {detail}"),
            Self::UndecodableImage(err) => write!(f, "Generated image could not be decoded: {err}"),
        }
    }
}

impl std::error::Error for RemoteError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ClientBuild(err) | Self::Transport(err) => Some(err),
            Self::UndecodableImage(err) => Some(err),
            Self::Status { .. } | Self::MalformedResponse(_) => None,
        }
    }
}

/// Shared HTTP client for both endpoints.
#[derive(Clone, Debug)]
pub struct InferenceClient {
    client: reqwest::Client,
    config: InferenceConfig,
}

impl InferenceClient {
    /// Builds a client, applying the configured timeout if there is one.
    pub fn new(config: InferenceConfig) -> Result<Self, RemoteError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(RemoteError::ClientBuild)?;
        Ok(Self { client, config })
    }

    /// The configuration this client was built with.
    pub fn config(&self) -> &InferenceConfig {
        &self.config
    }

    /// POSTs a JSON body with the bearer token and returns the raw response
    /// body of a 2xx answer.
    async fn post_json<T: Serialize + ?Sized>(
        &self,
        url: &Url,
        body: &T,
    ) -> Result<Vec<u8>, RemoteError> {
        let response = self
            .client
            .post(url.clone())
            .bearer_auth(&self.config.api_token)
            .json(body)
            .send()
            .await
            .map_err(RemoteError::Transport)?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(RemoteError::Transport)?;
        debug!("POST {} -> {} ({} bytes)", url, status, bytes.len());
        if !status.is_success() {
            return Err(RemoteError::Status {
                status,
                body: String::from_utf8_lossy(&bytes)
                    .chars()
                    .take(ERROR_BODY_PREVIEW_CHARS)
                    .collect(),
            });
        }
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{MockAnalysis, MockGeneration, spawn_mock_remote};

    #[tokio::test]
    async fn bearer_token_is_sent() {
        let mock = spawn_mock_remote(
            MockAnalysis::Answer { gender: "male" },
            MockGeneration::Png,
        )
        .await;
        let mut config = mock.config.clone();
        config.api_token = "wrong-token".to_string();
        let client = InferenceClient::new(config).expect("client");
        let image = crate::test_support::uploaded_png();

        let err = client
            .query_analysis(&image, analysis::Attribute::Gender.question())
            .await
            .expect_err("unauthorised");
        assert!(matches!(
            err,
            RemoteError::Status { status, .. } if status == reqwest::StatusCode::UNAUTHORIZED
        ));
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_a_transport_error() {
        let config = InferenceConfig {
            api_token: "token".to_string(),
            // port 9 (discard) on loopback is never listening in CI
            analysis_url: Url::parse("http://127.0.0.1:9/vqa").expect("url"),
            generation_url: Url::parse("http://127.0.0.1:9/generate").expect("url"),
            timeout: Some(std::time::Duration::from_secs(5)),
        };
        let client = InferenceClient::new(config).expect("client");
        let image = crate::test_support::uploaded_png();
        let err = client
            .query_generation("prompt", &image)
            .await
            .expect_err("nothing listening");
        assert!(matches!(err, RemoteError::Transport(_)));
        assert!(err.to_string().starts_with("Request failed"));
    }
}
