//! Inline messages shown to the user next to the action that caused them.

use serde::{Deserialize, Serialize};

/// How a notice is styled.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    /// Something failed; the rest of the page still works.
    Error,
    /// An action completed.
    Success,
    /// Neutral guidance.
    Info,
}

impl NoticeLevel {
    /// CSS class used when rendering.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Success => "success",
            Self::Info => "info",
        }
    }
}

/// A user-visible message.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Notice {
    /// Styling level
    pub level: NoticeLevel,
    /// Message text
    pub text: String,
}

impl Notice {
    /// An error notice
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            text: text.into(),
        }
    }

    /// A success notice
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            text: text.into(),
        }
    }

    /// An informational notice
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            text: text.into(),
        }
    }
}
