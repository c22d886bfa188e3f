//! One generation request: analyse, compose, generate.

use tracing::{error, info};

use crate::inference::analysis::AttributeSet;
use crate::inference::{InferenceClient, RemoteError};
use crate::intake::UploadedImage;
use crate::notice::Notice;
use crate::prompt::compose;

/// Everything a generation request produced.
#[derive(Debug)]
pub struct PipelineOutcome {
    /// Answers from the VQA model, placeholders where it failed.
    pub attributes: AttributeSet,
    /// The prompt sent to the image model.
    pub prompt: String,
    /// Error notices from attribute extraction.
    pub analysis_notices: Vec<Notice>,
    /// PNG bytes, or why generation failed.
    pub generated: Result<Vec<u8>, RemoteError>,
}

impl PipelineOutcome {
    /// Notices to show for this outcome, including the generation result.
    pub fn notices(&self) -> Vec<Notice> {
        let mut notices = self.analysis_notices.clone();
        match &self.generated {
            Ok(_) => notices.push(Notice::success("Image generated successfully!")),
            Err(err) => notices.push(Notice::error(format!("Error: {err}"))),
        }
        notices
    }
}

/// Runs each step after the previous one finishes.
pub async fn run(
    client: &InferenceClient,
    image: &UploadedImage,
    user_suffix: &str,
) -> PipelineOutcome {
    info!("Analyzing the image...");
    let (attributes, analysis_notices) = client.extract_attributes(image).await;

    let prompt = compose(&attributes, user_suffix);
    info!("Composed prompt: {}", prompt);

    info!("Generating the image...");
    let generated = client.query_generation(&prompt, image).await;
    match &generated {
        Ok(bytes) => info!("Generated {} bytes", bytes.len()),
        Err(err) => error!("Generation failed: {}", err),
    }

    PipelineOutcome {
        attributes,
        prompt,
        analysis_notices,
        generated,
    }
}
