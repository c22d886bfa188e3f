use super::csrf::csrf_token;
use super::flash::{NoticeView, take_notices};
use super::prelude::*;
use crate::constants::GENERATED_IMAGE_FILENAME;
use crate::feedback::Rating;
use crate::web::session::SessionStage;

#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub(crate) struct HomeTemplate {
    pub(crate) stage: &'static str,
    pub(crate) has_upload: bool,
    pub(crate) has_generated: bool,
    pub(crate) generated_prompt: String,
    pub(crate) notices: Vec<NoticeView>,
    pub(crate) csrf_token: String,
    pub(crate) download_name: &'static str,
    pub(crate) ratings: Vec<u8>,
}

/// handles the / GET
pub(crate) async fn root_handler(session: StudioSession) -> Result<HomeTemplate, StudioError> {
    let stage = session.stage().await?;
    let generated_prompt = session.generated_prompt().await?;
    let csrf_token = csrf_token(session.session()).await?;
    let notices = take_notices(session.session()).await?;

    Ok(HomeTemplate {
        stage: stage.as_str(),
        has_upload: stage != SessionStage::Idle,
        has_generated: stage == SessionStage::Displayed,
        generated_prompt: generated_prompt.unwrap_or_default(),
        notices,
        csrf_token,
        download_name: GENERATED_IMAGE_FILENAME,
        ratings: (Rating::MIN..=Rating::MAX).collect(),
    })
}
