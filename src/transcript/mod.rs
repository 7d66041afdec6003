//! Transcript pipeline: fetching, processing, and formatting caption data.
//!
//! The pipeline flows caller request -> [`TranscriptFetcher`] (per video) ->
//! processor filters (time range, search, segmentation) -> formatter ->
//! [`FormattedTranscript`]. Key-moment extraction and fixed-count
//! segmentation reports are built on top of the same fetch path.

mod cache;
mod fetcher;
mod formatter;
mod language;
mod moments;
mod processor;
mod segments;

pub use cache::TranscriptCache;
pub use fetcher::TranscriptFetcher;
pub use formatter::format_transcript;
pub use language::LanguageResolver;
pub use moments::KeyMomentExtractor;
pub use processor::{apply_filters, filter_search, filter_time_range, segment_cues};
pub use segments::SegmentAnalyzer;

use serde::{Deserialize, Serialize};

/// A single caption cue: one line of caption text with timing.
///
/// Ordering by `offset_ms` is an invariant; every transform in the pipeline
/// preserves it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cue {
    /// Caption text.
    pub text: String,
    /// Start time in milliseconds.
    pub offset_ms: u64,
    /// Duration in milliseconds.
    pub duration_ms: u64,
    /// Source video, set when cues from multiple videos are merged.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_id: Option<String>,
}

impl Cue {
    /// Create a new cue without a video tag.
    pub fn new(text: impl Into<String>, offset_ms: u64, duration_ms: u64) -> Self {
        Self {
            text: text.into(),
            offset_ms,
            duration_ms,
            video_id: None,
        }
    }

    /// Start time in seconds.
    pub fn start_seconds(&self) -> f64 {
        self.offset_ms as f64 / 1000.0
    }

    /// End time in seconds.
    pub fn end_seconds(&self) -> f64 {
        (self.offset_ms + self.duration_ms) as f64 / 1000.0
    }
}

/// Requested time window in seconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeRange {
    /// Start of the window (defaults to 0 when absent).
    pub start: Option<f64>,
    /// End of the window; no upper bound when absent.
    pub end: Option<f64>,
}

/// Text search with context expansion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchOptions {
    /// Substring to look for in cue text.
    pub query: String,
    /// Match case exactly instead of case-insensitively.
    #[serde(default)]
    pub case_sensitive: bool,
    /// Number of surrounding cues to include on each side of a match.
    #[serde(default)]
    pub context_lines: usize,
}

/// Segmentation strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentMethod {
    /// Contiguous chunks of equal cue count.
    Equal,
    /// Content-density grouping: equal share of spoken duration per segment.
    Smart,
}

impl std::str::FromStr for SegmentMethod {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "equal" => Ok(SegmentMethod::Equal),
            "smart" => Ok(SegmentMethod::Smart),
            _ => Err(format!("Unknown segment method: {}", s)),
        }
    }
}

/// Segmentation request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SegmentOptions {
    pub method: SegmentMethod,
    pub count: usize,
}

/// Output representation for a processed transcript.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Cue list only, no rendered text.
    #[default]
    Raw,
    /// One `[M:SS] text` line per cue.
    Timestamped,
    /// Cue texts joined into a single block, no timestamps.
    Merged,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "raw" => Ok(OutputFormat::Raw),
            "timestamped" => Ok(OutputFormat::Timestamped),
            "merged" => Ok(OutputFormat::Merged),
            _ => Err(format!("Unknown output format: {}", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Raw => write!(f, "raw"),
            OutputFormat::Timestamped => write!(f, "timestamped"),
            OutputFormat::Merged => write!(f, "merged"),
        }
    }
}

/// Configuration value for a transcript request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TranscriptOptions {
    /// Preferred caption language code.
    pub language: Option<String>,
    /// Keep only cues inside this window.
    pub time_range: Option<TimeRange>,
    /// Keep only cues matching this search (plus context).
    pub search: Option<SearchOptions>,
    /// Group cues into a fixed number of segments.
    pub segment: Option<SegmentOptions>,
    /// Output representation.
    pub format: OutputFormat,
    /// Attach per-video metadata to the result.
    pub include_metadata: bool,
}

/// Read-only projection of upstream video details.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoMetadata {
    pub id: String,
    pub title: String,
    pub channel_id: String,
    pub channel_title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_at: Option<chrono::DateTime<chrono::Utc>>,
    /// Video duration in seconds.
    pub duration: u64,
    pub view_count: u64,
    pub like_count: u64,
}

/// Channel details used only for the language-detection hint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelInfo {
    pub id: String,
    pub title: String,
    /// Two-letter country code, when the channel declares one.
    pub country: Option<String>,
}

/// Output envelope for every pipeline operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormattedTranscript {
    /// Processed cue list.
    pub segments: Vec<Cue>,
    pub total_segments: usize,
    /// Total spoken duration in seconds (sum of cue durations).
    pub duration: f64,
    pub format: OutputFormat,
    /// Rendered text, present for timestamped/merged formats.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Per-video descriptors, present when metadata was requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Vec<VideoMetadata>>,
}

/// Format a millisecond offset as `M:SS`.
///
/// No hour component, even past 59:59 (75 minutes renders as "75:30") --
/// an inherited output format that downstream consumers rely on.
pub fn format_timestamp_ms(offset_ms: u64) -> String {
    let total_seconds = offset_ms / 1000;
    let minutes = total_seconds / 60;
    let seconds = total_seconds % 60;
    format!("{}:{:02}", minutes, seconds)
}
