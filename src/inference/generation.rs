//! Image generation from a composed prompt plus the uploaded image.

use std::io::Cursor;

use serde::Serialize;
use tracing::debug;

use super::{InferenceClient, RemoteError};
use crate::intake::UploadedImage;

/// Request body for the generation endpoint.
#[derive(Serialize, Debug)]
struct GenerationRequest<'a> {
    inputs: &'a str,
    image: &'a str,
}

impl InferenceClient {
    /// Renders `prompt` using the uploaded image as reference. The returned
    /// bytes are always a decodable PNG.
    pub async fn query_generation(
        &self,
        prompt: &str,
        image: &UploadedImage,
    ) -> Result<Vec<u8>, RemoteError> {
        let encoded = image.to_base64();
        let request = GenerationRequest {
            inputs: prompt,
            image: &encoded,
        };
        let body = self
            .post_json(&self.config.generation_url, &request)
            .await?;
        ensure_png(&body)
    }
}

/// Decodes the response body and returns it as PNG, converting if needed.
pub fn ensure_png(bytes: &[u8]) -> Result<Vec<u8>, RemoteError> {
    let reader = image::ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|err| RemoteError::UndecodableImage(image::ImageError::IoError(err)))?;
    let format = reader.format();
    let decoded = reader.decode().map_err(RemoteError::UndecodableImage)?;

    if format == Some(image::ImageFormat::Png) {
        return Ok(bytes.to_vec());
    }

    debug!("Converting generated {:?} image to PNG", format);
    let mut output = Vec::new();
    decoded
        .write_to(&mut Cursor::new(&mut output), image::ImageFormat::Png)
        .map_err(RemoteError::UndecodableImage)?;
    Ok(output)
}
