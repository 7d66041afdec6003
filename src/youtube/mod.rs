//! Upstream YouTube collaborators: caption source and metadata providers.
//!
//! The transcript pipeline only depends on the traits here; the concrete
//! InnerTube and Data API clients live in their own modules.

mod data_api;
mod innertube;

pub use data_api::DataApiClient;
pub use innertube::InnerTubeSource;

use crate::error::{Result, TekstError};
use crate::transcript::{ChannelInfo, Cue, VideoMetadata};
use async_trait::async_trait;
use regex::Regex;
use thiserror::Error;

/// Failure shapes a caption source must distinguish.
///
/// The fetcher's fallback loop aborts on [`CaptionError::NoCaptions`] and
/// moves to the next candidate on the other two.
#[derive(Error, Debug)]
pub enum CaptionError {
    /// The video has no caption tracks in any language.
    #[error("video has no captions")]
    NoCaptions,

    /// Captions exist, but not for the requested language.
    #[error("no caption track for language '{0}'")]
    LanguageUnavailable(String),

    /// Network or parsing failure; retryable with the next candidate.
    #[error("caption fetch failed: {0}")]
    Transport(String),
}

impl From<reqwest::Error> for CaptionError {
    fn from(err: reqwest::Error) -> Self {
        CaptionError::Transport(err.to_string())
    }
}

/// Fetches raw caption cues for a `(video, language)` pair.
#[async_trait]
pub trait CaptionSource: Send + Sync {
    async fn get_captions(
        &self,
        video_id: &str,
        language: &str,
    ) -> std::result::Result<Vec<Cue>, CaptionError>;
}

/// Fetches video and channel details.
#[async_trait]
pub trait MetadataProvider: Send + Sync {
    async fn get_video(&self, video_id: &str) -> Result<VideoMetadata>;

    async fn get_channel(&self, channel_id: &str) -> Result<ChannelInfo>;
}

/// Extract a video ID from a YouTube URL or a bare 11-character ID.
pub fn extract_video_id(input: &str) -> Option<String> {
    // Matches watch/short/embed URLs and bare IDs.
    let re = Regex::new(
        r"(?x)
        (?:
            (?:https?://)?
            (?:www\.|m\.)?
            (?:youtube\.com/watch\?v=|youtu\.be/|youtube\.com/embed/|youtube\.com/shorts/|youtube\.com/v/)
            ([a-zA-Z0-9_-]{11})
        )
        |
        ^([a-zA-Z0-9_-]{11})$
    ",
    )
    .expect("Invalid regex");

    let caps = re.captures(input.trim())?;
    caps.get(1)
        .or_else(|| caps.get(2))
        .map(|m| m.as_str().to_string())
}

/// Extract a video ID, rejecting anything unrecognizable.
pub fn parse_video_id(input: &str) -> Result<String> {
    extract_video_id(input).ok_or_else(|| {
        TekstError::InvalidInput(format!("Invalid YouTube video ID or URL: {}", input))
    })
}
