//! Fixtures shared by the unit tests: tiny images and a stand-in for the
//! remote models.

use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header::AUTHORIZATION, header::CONTENT_TYPE};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use serde_json::{Value, json};
use url::Url;

use crate::config::InferenceConfig;
use crate::inference::InferenceClient;
use crate::inference::analysis::Attribute;
use crate::intake::UploadedImage;

pub(crate) const TEST_TOKEN: &str = "test-token";

fn encode(format: image::ImageFormat) -> Vec<u8> {
    let pixels = image::RgbImage::from_pixel(4, 4, image::Rgb([200, 40, 90]));
    let mut bytes = Vec::new();
    image::DynamicImage::ImageRgb8(pixels)
        .write_to(&mut Cursor::new(&mut bytes), format)
        .expect("encode test image");
    bytes
}

pub(crate) fn tiny_png() -> Vec<u8> {
    encode(image::ImageFormat::Png)
}

pub(crate) fn tiny_jpeg() -> Vec<u8> {
    encode(image::ImageFormat::Jpeg)
}

pub(crate) fn tiny_webp() -> Vec<u8> {
    encode(image::ImageFormat::WebP)
}

pub(crate) fn uploaded_png() -> UploadedImage {
    UploadedImage::from_bytes(tiny_png(), Some("image/png")).expect("valid png")
}

/// How the fake VQA endpoint answers.
#[derive(Clone, Copy, Debug)]
pub(crate) enum MockAnalysis {
    Answer { gender: &'static str },
    Status(u16),
    EmptyList,
    MissingAnswer,
}

/// How the fake generation endpoint answers.
#[derive(Clone, Copy, Debug)]
pub(crate) enum MockGeneration {
    Png,
    Jpeg,
    Webp,
    Status(u16),
    Garbage,
    /// A PNG on the first call, then the given status.
    PngThenStatus(u16),
}

#[derive(Clone)]
struct MockState {
    analysis: MockAnalysis,
    generation: MockGeneration,
    analysis_calls: Arc<AtomicUsize>,
    generation_calls: Arc<AtomicUsize>,
    questions: Arc<Mutex<Vec<String>>>,
    prompts: Arc<Mutex<Vec<String>>>,
}

pub(crate) struct MockRemote {
    pub(crate) config: InferenceConfig,
    pub(crate) analysis_calls: Arc<AtomicUsize>,
    pub(crate) generation_calls: Arc<AtomicUsize>,
    questions: Arc<Mutex<Vec<String>>>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl MockRemote {
    pub(crate) fn client(&self) -> InferenceClient {
        InferenceClient::new(self.config.clone()).expect("build client")
    }

    pub(crate) fn questions(&self) -> Vec<String> {
        self.questions.lock().expect("questions lock").clone()
    }

    pub(crate) fn prompts(&self) -> Vec<String> {
        self.prompts.lock().expect("prompts lock").clone()
    }
}

fn authorised(headers: &HeaderMap) -> bool {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value == format!("Bearer {TEST_TOKEN}"))
}

fn status(code: u16) -> Response {
    (
        StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        "mock failure",
    )
        .into_response()
}

fn answer_for(question: &str, gender: &'static str) -> &'static str {
    match Attribute::ALL
        .into_iter()
        .find(|attribute| attribute.question() == question)
    {
        Some(Attribute::Gender) => gender,
        Some(Attribute::Clothing) => "red jacket",
        Some(Attribute::HairColor) => "brown",
        Some(Attribute::FacialExpression) => "smile",
        Some(Attribute::Age) => "30",
        Some(Attribute::Background) => "beach",
        None => "unknown question",
    }
}

async fn mock_analysis(
    State(state): State<MockState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    state.analysis_calls.fetch_add(1, Ordering::SeqCst);
    if !authorised(&headers) {
        return status(401);
    }
    let (Some(question), Some(image)) = (
        body["inputs"]["question"].as_str(),
        body["inputs"]["image"].as_str(),
    ) else {
        return status(400);
    };
    if image.is_empty() {
        return status(400);
    }
    state
        .questions
        .lock()
        .expect("questions lock")
        .push(question.to_string());

    match state.analysis {
        MockAnalysis::Answer { gender } => {
            Json(json!([{"answer": answer_for(question, gender), "score": 0.9}])).into_response()
        }
        MockAnalysis::Status(code) => status(code),
        MockAnalysis::EmptyList => Json(json!([])).into_response(),
        MockAnalysis::MissingAnswer => Json(json!([{"score": 0.4}])).into_response(),
    }
}

async fn mock_generation(
    State(state): State<MockState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let previous_calls = state.generation_calls.fetch_add(1, Ordering::SeqCst);
    if !authorised(&headers) {
        return status(401);
    }
    let (Some(prompt), Some(_image)) = (body["inputs"].as_str(), body["image"].as_str()) else {
        return status(400);
    };
    state
        .prompts
        .lock()
        .expect("prompts lock")
        .push(prompt.to_string());

    match state.generation {
        MockGeneration::Png => ([(CONTENT_TYPE, "image/png")], tiny_png()).into_response(),
        MockGeneration::Jpeg => ([(CONTENT_TYPE, "image/jpeg")], tiny_jpeg()).into_response(),
        MockGeneration::Webp => ([(CONTENT_TYPE, "image/webp")], tiny_webp()).into_response(),
        MockGeneration::Status(code) => status(code),
        MockGeneration::PngThenStatus(code) => {
            if previous_calls == 0 {
                ([(CONTENT_TYPE, "image/png")], tiny_png()).into_response()
            } else {
                status(code)
            }
        }
        MockGeneration::Garbage => {
            ([(CONTENT_TYPE, "image/png")], "definitely not a png").into_response()
        }
    }
}

/// Serves `/vqa` and `/generate` on an ephemeral loopback port.
pub(crate) async fn spawn_mock_remote(
    analysis: MockAnalysis,
    generation: MockGeneration,
) -> MockRemote {
    let state = MockState {
        analysis,
        generation,
        analysis_calls: Arc::new(AtomicUsize::new(0)),
        generation_calls: Arc::new(AtomicUsize::new(0)),
        questions: Arc::new(Mutex::new(Vec::new())),
        prompts: Arc::new(Mutex::new(Vec::new())),
    };
    let app = Router::new()
        .route("/vqa", axum::routing::post(mock_analysis))
        .route("/generate", axum::routing::post(mock_generation))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind mock remote");
    let addr = listener.local_addr().expect("mock address");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    MockRemote {
        config: InferenceConfig {
            api_token: TEST_TOKEN.to_string(),
            analysis_url: Url::parse(&format!("http://{addr}/vqa")).expect("vqa url"),
            generation_url: Url::parse(&format!("http://{addr}/generate")).expect("generate url"),
            timeout: Some(std::time::Duration::from_secs(10)),
        },
        analysis_calls: state.analysis_calls,
        generation_calls: state.generation_calls,
        questions: state.questions,
        prompts: state.prompts,
    }
}
