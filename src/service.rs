//! Pipeline assembly: wires settings into the transcript fetcher and exposes
//! the operations the CLI and MCP server both consume.

use crate::config::Settings;
use crate::error::Result;
use crate::transcript::{
    ChannelInfo, FormattedTranscript, KeyMomentExtractor, SegmentAnalyzer, TranscriptCache,
    TranscriptFetcher, TranscriptOptions, VideoMetadata,
};
use crate::youtube::{parse_video_id, DataApiClient, InnerTubeSource, MetadataProvider};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

/// Stand-in metadata provider when no Data API key is configured.
///
/// Every lookup fails, which the pipeline already tolerates: country
/// detection silently yields no hint and metadata arrays come back empty.
struct NoMetadata;

#[async_trait]
impl MetadataProvider for NoMetadata {
    async fn get_video(&self, video_id: &str) -> Result<VideoMetadata> {
        Err(crate::error::TekstError::Config(format!(
            "no YouTube API key configured; cannot fetch metadata for {video_id}"
        )))
    }

    async fn get_channel(&self, channel_id: &str) -> Result<ChannelInfo> {
        Err(crate::error::TekstError::Config(format!(
            "no YouTube API key configured; cannot fetch channel {channel_id}"
        )))
    }
}

/// Entry point for all transcript operations.
pub struct TranscriptService {
    fetcher: TranscriptFetcher,
    default_language: Option<String>,
}

impl TranscriptService {
    /// Build the service from settings.
    pub fn new(settings: &Settings) -> Self {
        let metadata: Arc<dyn MetadataProvider> = match settings.api_key() {
            Some(key) => Arc::new(DataApiClient::new(key)),
            None => {
                info!("No YouTube API key configured; metadata and language detection disabled");
                Arc::new(NoMetadata)
            }
        };

        let fetcher = TranscriptFetcher::new(
            Arc::new(InnerTubeSource::new()),
            metadata,
            TranscriptCache::new(settings.cache_ttl()),
        );

        Self {
            fetcher,
            default_language: settings.transcript.default_language.clone(),
        }
    }

    /// Build the service around an existing fetcher (used by tests).
    pub fn with_fetcher(fetcher: TranscriptFetcher) -> Self {
        Self {
            fetcher,
            default_language: None,
        }
    }

    fn with_defaults(&self, mut options: TranscriptOptions) -> TranscriptOptions {
        if options.language.is_none() {
            options.language = self.default_language.clone();
        }
        options
    }

    /// Fetch a single video's transcript.
    pub async fn get_transcript(
        &self,
        input: &str,
        options: TranscriptOptions,
    ) -> Result<FormattedTranscript> {
        let video_id = parse_video_id(input)?;
        let options = self.with_defaults(options);
        self.fetcher.fetch_transcript(&video_id, &options).await
    }

    /// Fetch and merge transcripts for several videos.
    pub async fn get_enhanced_transcript(
        &self,
        inputs: &[String],
        options: TranscriptOptions,
    ) -> Result<FormattedTranscript> {
        let video_ids = inputs
            .iter()
            .map(|i| parse_video_id(i))
            .collect::<Result<Vec<_>>>()?;
        let options = self.with_defaults(options);
        self.fetcher.fetch_enhanced(&video_ids, &options).await
    }

    /// Extract key moments for a video.
    pub async fn extract_key_moments(
        &self,
        input: &str,
        max_moments: usize,
    ) -> Result<FormattedTranscript> {
        let video_id = parse_video_id(input)?;
        KeyMomentExtractor::new(&self.fetcher)
            .extract(&video_id, max_moments)
            .await
    }

    /// Split a video's transcript into wall-clock segments.
    pub async fn segment_transcript(
        &self,
        input: &str,
        segment_count: usize,
    ) -> Result<FormattedTranscript> {
        let video_id = parse_video_id(input)?;
        SegmentAnalyzer::new(&self.fetcher)
            .segment(&video_id, segment_count)
            .await
    }
}
