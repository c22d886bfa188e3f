//! Uploaded image handling.

use std::io::Cursor;
use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Image formats accepted for upload.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum ImageMime {
    /// `image/jpeg`
    Jpeg,
    /// `image/png`
    Png,
}

impl ImageMime {
    /// MIME type string
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
        }
    }
}

/// Reasons an upload is refused.
#[derive(Debug)]
pub enum IntakeError {
    /// No bytes were uploaded.
    Empty,
    /// The bytes aren't a JPEG or PNG image.
    UnsupportedFormat(String),
    /// Reading a local file failed.
    Io(std::io::Error),
}

impl std::fmt::Display for IntakeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "No image was uploaded"),
            Self::UnsupportedFormat(detail) => {
                write!(f, "Please upload a JPG or PNG image ({detail})")
            }
            Self::Io(err) => write!(f, "Failed to read image: {err}"),
        }
    }
}

impl std::error::Error for IntakeError {}

impl From<std::io::Error> for IntakeError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

/// The user's image, as uploaded. Replaced wholesale on the next upload.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UploadedImage {
    bytes: Vec<u8>,
    mime: ImageMime,
}

impl UploadedImage {
    /// Checks the bytes are a JPEG or PNG image; the detected format wins over
    /// whatever the browser declared.
    pub fn from_bytes(bytes: Vec<u8>, declared_mime: Option<&str>) -> Result<Self, IntakeError> {
        if bytes.is_empty() {
            return Err(IntakeError::Empty);
        }
        let format = image::ImageReader::new(Cursor::new(&bytes))
            .with_guessed_format()
            .map_err(|err| IntakeError::UnsupportedFormat(err.to_string()))?
            .format();
        let mime = match format {
            Some(image::ImageFormat::Jpeg) => ImageMime::Jpeg,
            Some(image::ImageFormat::Png) => ImageMime::Png,
            Some(other) => {
                return Err(IntakeError::UnsupportedFormat(format!("{other:?}")));
            }
            None => {
                return Err(IntakeError::UnsupportedFormat(
                    declared_mime.unwrap_or("unknown type").to_string(),
                ));
            }
        };
        if let Some(declared) = declared_mime
            && declared != mime.as_str()
        {
            debug!(
                "Declared type {} doesn't match detected {}",
                declared,
                mime.as_str()
            );
        }
        Ok(Self { bytes, mime })
    }

    /// Reads an image from disk.
    pub async fn from_path(path: &Path) -> Result<Self, IntakeError> {
        let bytes = tokio::fs::read(path).await?;
        Self::from_bytes(bytes, None)
    }

    /// Raw bytes
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Detected MIME type
    pub fn mime(&self) -> ImageMime {
        self.mime
    }

    /// Standard base64 encoding, as sent to the remote models.
    pub fn to_base64(&self) -> String {
        general_purpose::STANDARD.encode(&self.bytes)
    }

    /// Inverse of [`UploadedImage::to_base64`] for values that were already
    /// validated once, eg. restored from the session.
    pub fn from_base64(encoded: &str, mime: ImageMime) -> Result<Self, IntakeError> {
        let bytes = general_purpose::STANDARD
            .decode(encoded)
            .map_err(|err| IntakeError::UnsupportedFormat(err.to_string()))?;
        if bytes.is_empty() {
            return Err(IntakeError::Empty);
        }
        Ok(Self { bytes, mime })
    }
}
