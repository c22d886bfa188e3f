use axum::extract::Multipart;

use super::csrf::validate_csrf;
use super::flash::{push_notice, push_notices};
use super::prelude::*;
use crate::feedback::{FeedbackRecord, Rating};
use crate::intake::UploadedImage;
use crate::notice::Notice;
use crate::pipeline;

#[derive(Deserialize)]
pub(crate) struct GenerateForm {
    csrf_token: String,
    #[serde(default)]
    user_prompt: String,
}

#[derive(Deserialize)]
pub(crate) struct FeedbackForm {
    csrf_token: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    feedback: String,
    rating: u8,
}

/// Stores a new upload, replacing the previous one.
pub(crate) async fn upload_handler(
    session: StudioSession,
    mut multipart: Multipart,
) -> Result<Redirect, StudioError> {
    let mut csrf_token_value: Option<String> = None;
    let mut upload: Option<(Vec<u8>, Option<String>)> = None;

    while let Some(field) = multipart.next_field().await? {
        let field_name = field.name().unwrap_or_default().to_string();
        match field_name.as_str() {
            "csrf_token" => {
                csrf_token_value = Some(field.text().await?);
            }
            "image" => {
                let content_type = field.content_type().map(str::to_owned);
                let bytes = field.bytes().await?;
                upload = Some((bytes.to_vec(), content_type));
            }
            _ => {}
        }
    }

    let csrf_token_value = csrf_token_value.ok_or(StudioError::BadRequest)?;
    validate_csrf(session.session(), &csrf_token_value).await?;

    let (bytes, content_type) = upload.unwrap_or_default();
    match UploadedImage::from_bytes(bytes, content_type.as_deref()) {
        Ok(image) => {
            info!(
                "Received {} upload ({} bytes)",
                image.mime().as_str(),
                image.bytes().len()
            );
            session.set_uploaded(&image).await?;
        }
        Err(err) => {
            debug!("Rejected upload: {}", err);
            push_notice(session.session(), Notice::error(err.to_string())).await?;
        }
    }
    Ok(Redirect::to("/"))
}

/// Analyses the uploaded image and generates a new one from it.
pub(crate) async fn generate_handler(
    State(state): State<AppState>,
    session: StudioSession,
    Form(form): Form<GenerateForm>,
) -> Result<Redirect, StudioError> {
    validate_csrf(session.session(), &form.csrf_token).await?;

    let Some(image) = session.uploaded().await? else {
        push_notice(
            session.session(),
            Notice::info("Upload an image before generating."),
        )
        .await?;
        return Ok(Redirect::to("/"));
    };

    let outcome = pipeline::run(&state.inference, &image, &form.user_prompt).await;
    let mut notices = outcome.notices();
    match outcome.generated {
        Ok(png) => session.set_generated(&png, &outcome.prompt).await?,
        Err(err) => {
            error!("Keeping previous image, generation failed: {}", err);
            notices.push(Notice::info(format!("Prompt: {}", outcome.prompt)));
        }
    }
    push_notices(session.session(), notices).await?;
    Ok(Redirect::to("/"))
}

/// Appends feedback about the generated image.
pub(crate) async fn feedback_handler(
    State(state): State<AppState>,
    session: StudioSession,
    Form(form): Form<FeedbackForm>,
) -> Result<Redirect, StudioError> {
    validate_csrf(session.session(), &form.csrf_token).await?;

    if session.generated().await?.is_none() {
        push_notice(
            session.session(),
            Notice::info("Generate an image before leaving feedback."),
        )
        .await?;
        return Ok(Redirect::to("/"));
    }

    let rating = Rating::new(form.rating).ok_or(StudioError::BadRequest)?;
    let record = FeedbackRecord {
        name: form.name,
        feedback: form.feedback,
        rating,
    };
    state.feedback.append(&record).await?;
    push_notice(
        session.session(),
        Notice::success("Thank you for your feedback!"),
    )
    .await?;
    Ok(Redirect::to("/"))
}
