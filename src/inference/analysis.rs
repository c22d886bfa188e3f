//! Attribute extraction through visual question answering.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::{InferenceClient, RemoteError};
use crate::constants::PLACEHOLDER_ATTRIBUTE;
use crate::intake::UploadedImage;
use crate::notice::Notice;

/// One of the six things asked about every image.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Attribute {
    /// Gender of the subject; picks the prompt template.
    Gender,
    /// What they're wearing, including colour.
    Clothing,
    /// Hair colour
    HairColor,
    /// Facial expression
    FacialExpression,
    /// Estimated age
    Age,
    /// What's behind them
    Background,
}

impl Attribute {
    /// Every attribute, in the order they're asked.
    pub const ALL: [Attribute; 6] = [
        Attribute::Gender,
        Attribute::Clothing,
        Attribute::HairColor,
        Attribute::FacialExpression,
        Attribute::Age,
        Attribute::Background,
    ];

    /// Stable snake_case name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Gender => "gender",
            Self::Clothing => "clothing",
            Self::HairColor => "hair_color",
            Self::FacialExpression => "facial_expression",
            Self::Age => "age",
            Self::Background => "background",
        }
    }

    /// The question sent to the VQA model.
    pub fn question(self) -> &'static str {
        match self {
            Self::Gender => "What is the gender of the person in the image?",
            Self::Clothing => "What is the person wearing and which color?",
            Self::HairColor => "What is the hair color of the person?",
            Self::FacialExpression => "What is the facial expression of the person?",
            Self::Age => "What is the estimated age of the person?",
            Self::Background => "What is in the background of the image?",
        }
    }
}

/// Answers for all six attributes; failed ones hold the placeholder.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct AttributeSet {
    /// Gender answer
    pub gender: String,
    /// Clothing answer
    pub clothing: String,
    /// Hair colour answer
    pub hair_color: String,
    /// Facial expression answer
    pub facial_expression: String,
    /// Age answer
    pub age: String,
    /// Background answer
    pub background: String,
}

impl Default for AttributeSet {
    fn default() -> Self {
        Self {
            gender: PLACEHOLDER_ATTRIBUTE.to_string(),
            clothing: PLACEHOLDER_ATTRIBUTE.to_string(),
            hair_color: PLACEHOLDER_ATTRIBUTE.to_string(),
            facial_expression: PLACEHOLDER_ATTRIBUTE.to_string(),
            age: PLACEHOLDER_ATTRIBUTE.to_string(),
            background: PLACEHOLDER_ATTRIBUTE.to_string(),
        }
    }
}

impl AttributeSet {
    /// Value for one attribute.
    pub fn get(&self, attribute: Attribute) -> &str {
        match attribute {
            Attribute::Gender => &self.gender,
            Attribute::Clothing => &self.clothing,
            Attribute::HairColor => &self.hair_color,
            Attribute::FacialExpression => &self.facial_expression,
            Attribute::Age => &self.age,
            Attribute::Background => &self.background,
        }
    }

    /// Replaces the value for one attribute.
    pub fn set(&mut self, attribute: Attribute, value: String) {
        let slot = match attribute {
            Attribute::Gender => &mut self.gender,
            Attribute::Clothing => &mut self.clothing,
            Attribute::HairColor => &mut self.hair_color,
            Attribute::FacialExpression => &mut self.facial_expression,
            Attribute::Age => &mut self.age,
            Attribute::Background => &mut self.background,
        };
        *slot = value;
    }
}

#[derive(Serialize, Debug)]
struct VqaRequest<'a> {
    inputs: VqaInputs<'a>,
}

#[derive(Serialize, Debug)]
struct VqaInputs<'a> {
    question: &'a str,
    image: &'a str,
}

/// Only string answers are accepted; any other JSON type is malformed.
#[derive(Deserialize, Debug)]
struct VqaAnswer {
    #[serde(default)]
    answer: Option<String>,
}

impl InferenceClient {
    /// Asks one question about the image and returns the top answer.
    pub async fn query_analysis(
        &self,
        image: &UploadedImage,
        question: &str,
    ) -> Result<String, RemoteError> {
        self.ask(&image.to_base64(), question).await
    }

    /// Asks all six questions, one after the other. A failed question is
    /// reported as an error notice and left as the placeholder; it never
    /// stops the remaining questions.
    pub async fn extract_attributes(&self, image: &UploadedImage) -> (AttributeSet, Vec<Notice>) {
        let encoded = image.to_base64();
        let mut attributes = AttributeSet::default();
        let mut notices = Vec::new();

        for attribute in Attribute::ALL {
            match self.ask(&encoded, attribute.question()).await {
                Ok(answer) => {
                    info!("{} = {}", attribute.name(), answer);
                    attributes.set(attribute, answer);
                }
                Err(err) => {
                    warn!("Failed to extract {}: {}", attribute.name(), err);
                    notices.push(Notice::error(format!("Error: {err}")));
                }
            }
        }
        (attributes, notices)
    }

    async fn ask(&self, encoded_image: &str, question: &str) -> Result<String, RemoteError> {
        let request = VqaRequest {
            inputs: VqaInputs {
                question,
                image: encoded_image,
            },
        };
        let body = self
            .post_json(&self.config.analysis_url, &request)
            .await?;
        parse_answer(&body)
    }
}

/// Pulls `[0].answer` out of a VQA response.
fn parse_answer(body: &[u8]) -> Result<String, RemoteError> {
    let answers: Vec<VqaAnswer> = serde_json::from_slice(body)
        .map_err(|err| RemoteError::MalformedResponse(err.to_string()))?;
    let first = answers
        .into_iter()
        .next()
        .ok_or_else(|| RemoteError::MalformedResponse("empty answer list".to_string()))?;
    first
        .answer
        .ok_or_else(|| RemoteError::MalformedResponse("missing answer field".to_string()))
}
