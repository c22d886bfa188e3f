use tower_sessions::Session;

use crate::error::StudioError;
use crate::notice::Notice;

const NOTICES_KEY: &str = "notices";

/// Notice as handed to the template.
#[derive(Clone, Debug)]
pub(crate) struct NoticeView {
    pub(crate) text: String,
    pub(crate) class: &'static str,
}

impl From<Notice> for NoticeView {
    fn from(notice: Notice) -> Self {
        Self {
            text: notice.text,
            class: notice.level.as_str(),
        }
    }
}

/// Queues notices for the next page render.
pub(crate) async fn push_notices(
    session: &Session,
    notices: impl IntoIterator<Item = Notice>,
) -> Result<(), StudioError> {
    let mut queued = session
        .get::<Vec<Notice>>(NOTICES_KEY)
        .await?
        .unwrap_or_default();
    queued.extend(notices);
    session.insert(NOTICES_KEY, queued).await?;
    Ok(())
}

pub(crate) async fn push_notice(session: &Session, notice: Notice) -> Result<(), StudioError> {
    push_notices(session, [notice]).await
}

/// Returns queued notices and clears them.
pub(crate) async fn take_notices(session: &Session) -> Result<Vec<NoticeView>, StudioError> {
    let queued = session
        .remove::<Vec<Notice>>(NOTICES_KEY)
        .await?
        .unwrap_or_default();
    Ok(queued.into_iter().map(NoticeView::from).collect())
}
