use axum::body::Body;
use axum::http::header::{CACHE_CONTROL, CONTENT_DISPOSITION};

use super::prelude::*;
use crate::constants::{GENERATED_IMAGE_FILENAME, IMAGE_CACHE_CONTROL};
use crate::intake::ImageMime;

fn image_response(
    bytes: Vec<u8>,
    mime: ImageMime,
    attachment: Option<&str>,
) -> Result<Response, StudioError> {
    let mut builder = Response::builder()
        .header(CONTENT_TYPE, mime.as_str())
        .header(CACHE_CONTROL, IMAGE_CACHE_CONTROL);
    if let Some(filename) = attachment {
        let value = HeaderValue::from_str(&format!("attachment; filename=\"{filename}\""))
            .map_err(|err| StudioError::InternalServerError(err.to_string()))?;
        builder = builder.header(CONTENT_DISPOSITION, value);
    }
    builder.body(Body::from(bytes)).map_err(StudioError::from)
}

/// The uploaded image, as the browser sent it.
pub(crate) async fn uploaded_image_handler(
    session: StudioSession,
) -> Result<Response, StudioError> {
    let image = session
        .uploaded()
        .await?
        .ok_or_else(|| StudioError::NotFound("uploaded image".to_string()))?;
    let mime = image.mime();
    image_response(image.bytes().to_vec(), mime, None)
}

/// The last generated image, for display.
pub(crate) async fn generated_image_handler(
    session: StudioSession,
) -> Result<Response, StudioError> {
    let png = session
        .generated()
        .await?
        .ok_or_else(|| StudioError::NotFound("generated image".to_string()))?;
    image_response(png, ImageMime::Png, None)
}

/// The last generated image as a file download.
pub(crate) async fn download_handler(session: StudioSession) -> Result<Response, StudioError> {
    let png = session
        .generated()
        .await?
        .ok_or_else(|| StudioError::NotFound("generated image".to_string()))?;
    debug!("Serving {} byte download", png.len());
    image_response(png, ImageMime::Png, Some(GENERATED_IMAGE_FILENAME))
}
