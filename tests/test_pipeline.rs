//! End-to-end runs of the pipeline against a local stand-in for the
//! inference API.

use std::io::Cursor;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use insight_studio::config::{InferenceConfig, setup_logging};
use insight_studio::constants::PLACEHOLDER_ATTRIBUTE;
use insight_studio::inference::analysis::{Attribute, AttributeSet};
use insight_studio::inference::{InferenceClient, RemoteError};
use insight_studio::intake::UploadedImage;
use insight_studio::notice::NoticeLevel;
use insight_studio::pipeline;
use url::Url;

#[derive(Clone, Default)]
struct Calls {
    analysis: Arc<AtomicUsize>,
    generation: Arc<AtomicUsize>,
}

async fn broken_vqa(State(calls): State<Calls>) -> StatusCode {
    calls.analysis.fetch_add(1, Ordering::SeqCst);
    StatusCode::SERVICE_UNAVAILABLE
}

async fn broken_generation(State(calls): State<Calls>) -> StatusCode {
    calls.generation.fetch_add(1, Ordering::SeqCst);
    StatusCode::BAD_GATEWAY
}

async fn spawn_broken_remote() -> (InferenceConfig, Calls) {
    let calls = Calls::default();
    let app = Router::new()
        .route("/vqa", axum::routing::post(broken_vqa))
        .route("/generate", axum::routing::post(broken_generation))
        .with_state(calls.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    let config = InferenceConfig {
        api_token: "token".to_string(),
        analysis_url: Url::parse(&format!("http://{addr}/vqa")).expect("url"),
        generation_url: Url::parse(&format!("http://{addr}/generate")).expect("url"),
        timeout: None,
    };
    (config, calls)
}

fn portrait_jpeg() -> UploadedImage {
    let pixels = image::RgbImage::from_pixel(8, 8, image::Rgb([240, 200, 180]));
    let mut bytes = Vec::new();
    image::DynamicImage::ImageRgb8(pixels)
        .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Jpeg)
        .expect("encode jpeg");
    UploadedImage::from_bytes(bytes, Some("image/jpeg")).expect("jpeg upload")
}

#[tokio::test]
async fn everything_failing_degrades_gracefully() {
    let _ = setup_logging(true);
    let (config, calls) = spawn_broken_remote().await;
    let client = InferenceClient::new(config).expect("client");

    let outcome = pipeline::run(&client, &portrait_jpeg(), "").await;

    assert_eq!(calls.analysis.load(Ordering::SeqCst), Attribute::ALL.len());
    assert_eq!(outcome.attributes, AttributeSet::default());
    for attribute in Attribute::ALL {
        assert_eq!(outcome.attributes.get(attribute), PLACEHOLDER_ATTRIBUTE);
    }
    assert_eq!(
        outcome.prompt,
        "Create a unspecified-year-old person with unspecified hair, wearing unspecified, showing a unspecified. Include a unspecified background. "
    );

    assert_eq!(calls.generation.load(Ordering::SeqCst), 1);
    assert!(matches!(
        &outcome.generated,
        Err(RemoteError::Status { status, .. }) if status.as_u16() == 502
    ));

    let notices = outcome.notices();
    assert_eq!(notices.len(), 7);
    assert!(notices.iter().all(|notice| notice.level == NoticeLevel::Error));
}
