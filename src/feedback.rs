//! Append-only feedback file.
//!
//! Writes are not locked; one writer at a time is assumed.

use std::path::{Path, PathBuf};

use tokio::io::AsyncWriteExt;
use tracing::info;

/// Rating between 1 and 5 inclusive.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Rating(u8);

impl Rating {
    /// Lowest accepted rating
    pub const MIN: u8 = 1;
    /// Highest accepted rating
    pub const MAX: u8 = 5;

    /// Returns `None` outside 1..=5.
    pub fn new(value: u8) -> Option<Self> {
        (Self::MIN..=Self::MAX).contains(&value).then_some(Self(value))
    }

    /// The numeric rating
    pub fn get(self) -> u8 {
        self.0
    }
}

/// One feedback submission.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FeedbackRecord {
    /// Who left it
    pub name: String,
    /// Free text
    pub feedback: String,
    /// Image quality rating
    pub rating: Rating,
}

impl FeedbackRecord {
    /// The block appended to the feedback file.
    pub fn render(&self) -> String {
        format!(
            "Name: {}\nFeedback: {}\nRating: {}/5\n\n",
            self.name,
            self.feedback,
            self.rating.get()
        )
    }
}

/// Appends feedback records to a text file.
#[derive(Clone, Debug)]
pub struct FeedbackSink {
    path: PathBuf,
}

impl FeedbackSink {
    /// A sink writing to `path`; the file is created on first append.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The target file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Opens the file in append mode, writes one block and closes it.
    pub async fn append(&self, record: &FeedbackRecord) -> std::io::Result<()> {
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(record.render().as_bytes()).await?;
        file.flush().await?;
        info!(
            "Saved feedback from {:?} ({}/5) to {}",
            record.name,
            record.rating.get(),
            self.path.display()
        );
        Ok(())
    }
}
