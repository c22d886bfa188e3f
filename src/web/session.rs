//! Per-session studio state: the uploaded image, and the last generated image
//! stored together with the prompt that produced it. Each slot is
//! last-write-wins.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use base64::Engine;
use base64::engine::general_purpose;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use crate::error::StudioError;
use crate::intake::{ImageMime, UploadedImage};

const UPLOADED_KEY: &str = "uploaded_image";
const GENERATED_KEY: &str = "generated_image";

/// Where a session is in the upload → generate flow.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum SessionStage {
    Idle,
    ImageUploaded,
    Displayed,
}

impl SessionStage {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::ImageUploaded => "image-uploaded",
            Self::Displayed => "displayed",
        }
    }
}

#[derive(Serialize, Deserialize)]
struct StoredImage {
    mime: ImageMime,
    data: String,
}

/// A generated PNG and its prompt share one value so they never drift apart.
#[derive(Serialize, Deserialize)]
struct StoredGeneration {
    prompt: String,
    png: String,
}

/// Handle on the requesting user's session.
#[derive(Clone, Debug)]
pub(crate) struct StudioSession {
    session: Session,
}

impl<S> FromRequestParts<S> for StudioSession
where
    S: Send + Sync,
{
    type Rejection = <Session as FromRequestParts<S>>::Rejection;

    fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        async move {
            let session = Session::from_request_parts(parts, state).await?;
            Ok(Self { session })
        }
    }
}

impl StudioSession {
    pub(crate) fn session(&self) -> &Session {
        &self.session
    }

    pub(crate) async fn set_uploaded(&self, image: &UploadedImage) -> Result<(), StudioError> {
        let stored = StoredImage {
            mime: image.mime(),
            data: image.to_base64(),
        };
        self.session.insert(UPLOADED_KEY, stored).await?;
        Ok(())
    }

    pub(crate) async fn uploaded(&self) -> Result<Option<UploadedImage>, StudioError> {
        let Some(stored) = self.session.get::<StoredImage>(UPLOADED_KEY).await? else {
            return Ok(None);
        };
        UploadedImage::from_base64(&stored.data, stored.mime)
            .map(Some)
            .map_err(|err| StudioError::InternalServerError(err.to_string()))
    }

    /// Only called with bytes that already passed PNG validation.
    pub(crate) async fn set_generated(&self, png: &[u8], prompt: &str) -> Result<(), StudioError> {
        let stored = StoredGeneration {
            prompt: prompt.to_string(),
            png: general_purpose::STANDARD.encode(png),
        };
        self.session.insert(GENERATED_KEY, stored).await?;
        Ok(())
    }

    async fn stored_generation(&self) -> Result<Option<StoredGeneration>, StudioError> {
        Ok(self.session.get::<StoredGeneration>(GENERATED_KEY).await?)
    }

    pub(crate) async fn generated(&self) -> Result<Option<Vec<u8>>, StudioError> {
        let Some(stored) = self.stored_generation().await? else {
            return Ok(None);
        };
        general_purpose::STANDARD
            .decode(stored.png)
            .map(Some)
            .map_err(|err| StudioError::InternalServerError(err.to_string()))
    }

    /// The prompt behind the image returned by [`Self::generated`].
    pub(crate) async fn generated_prompt(&self) -> Result<Option<String>, StudioError> {
        Ok(self.stored_generation().await?.map(|stored| stored.prompt))
    }

    pub(crate) async fn stage(&self) -> Result<SessionStage, StudioError> {
        if self.stored_generation().await?.is_some() {
            return Ok(SessionStage::Displayed);
        }
        if self
            .session
            .get::<StoredImage>(UPLOADED_KEY)
            .await?
            .is_some()
        {
            return Ok(SessionStage::ImageUploaded);
        }
        Ok(SessionStage::Idle)
    }
}
