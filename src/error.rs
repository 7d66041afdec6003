//! Error types for Tekst.

use thiserror::Error;

/// Library-level error type for Tekst operations.
#[derive(Error, Debug)]
pub enum TekstError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("No captions available for video {video_id}")]
    NoCaptions { video_id: String },

    #[error("Failed to fetch transcript for video {video_id} (attempted languages: {attempted}): {source}")]
    AllLanguagesFailed {
        video_id: String,
        attempted: String,
        #[source]
        source: Box<TekstError>,
    },

    #[error("Captions not available in language '{language}' for video {video_id}")]
    LanguageUnavailable { video_id: String, language: String },

    #[error("Caption fetch failed: {0}")]
    CaptionFetch(String),

    #[error("Video not found: {0}")]
    VideoNotFound(String),

    #[error("Channel not found: {0}")]
    ChannelNotFound(String),

    #[error("YouTube API error: {0}")]
    Api(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl TekstError {
    /// Whether this is a routine "no transcript" outcome rather than a
    /// genuine failure. Callers should not log these as severe errors.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            TekstError::NoCaptions { .. }
                | TekstError::AllLanguagesFailed { .. }
                | TekstError::LanguageUnavailable { .. }
                | TekstError::VideoNotFound(_)
                | TekstError::ChannelNotFound(_)
        )
    }
}

/// Result type alias for Tekst operations.
pub type Result<T> = std::result::Result<T, TekstError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_classification() {
        let missing = TekstError::NoCaptions {
            video_id: "vid".to_string(),
        };
        assert!(missing.is_not_found());

        let exhausted = TekstError::AllLanguagesFailed {
            video_id: "vid".to_string(),
            attempted: "en, ko".to_string(),
            source: Box::new(TekstError::LanguageUnavailable {
                video_id: "vid".to_string(),
                language: "ko".to_string(),
            }),
        };
        assert!(exhausted.is_not_found());
        assert!(TekstError::VideoNotFound("vid".to_string()).is_not_found());

        assert!(!TekstError::Config("bad".to_string()).is_not_found());
        assert!(!TekstError::CaptionFetch("timeout".to_string()).is_not_found());
        assert!(!TekstError::InvalidInput("bad id".to_string()).is_not_found());
    }
}
