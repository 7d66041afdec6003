//! Transcript fetching: cache, language fallback, and multi-video merging.

use crate::error::{Result, TekstError};
use crate::transcript::{
    apply_filters, format_transcript, Cue, FormattedTranscript, LanguageResolver, TranscriptCache,
    TranscriptOptions, VideoMetadata,
};
use crate::youtube::{CaptionError, CaptionSource, MetadataProvider};
use futures::future;
use std::sync::Arc;
use tracing::{debug, instrument};

/// States of the language-fallback loop.
///
/// Attempts are strictly sequential; a video-level "no captions" signal
/// aborts before any further attempt is issued, while per-language failures
/// advance to the next candidate.
enum FetchState {
    Trying(usize),
    Success(Vec<Cue>, String),
    NoCaptions,
    Exhausted(TekstError),
}

/// Orchestrates the caption source, language resolver, and cue cache to
/// produce a definitive cue list per video.
pub struct TranscriptFetcher {
    captions: Arc<dyn CaptionSource>,
    metadata: Arc<dyn MetadataProvider>,
    resolver: LanguageResolver,
    cache: TranscriptCache,
}

impl TranscriptFetcher {
    pub fn new(
        captions: Arc<dyn CaptionSource>,
        metadata: Arc<dyn MetadataProvider>,
        cache: TranscriptCache,
    ) -> Self {
        Self {
            captions,
            metadata,
            resolver: LanguageResolver::new(),
            cache,
        }
    }

    /// Fetch the raw cue list for one video, trying candidate languages in
    /// order. Only raw cues are cached; callers apply filters afterwards.
    #[instrument(skip(self), fields(video_id = %video_id))]
    pub async fn fetch_cues(&self, video_id: &str, options: &TranscriptOptions) -> Result<Vec<Cue>> {
        let requested = options.language.as_deref();

        if let Some(cues) = self.cache.get(video_id, requested) {
            debug!("Cache hit for {video_id}");
            return Ok(cues);
        }

        // Country detection needs two upstream calls, so only bother when
        // no explicit language narrows the first attempt already.
        let hint = if requested.is_none() {
            self.detect_country(video_id).await
        } else {
            None
        };

        let candidates = self.resolver.resolve(requested, hint.as_deref());
        debug!("Candidate languages for {video_id}: {}", candidates.join(","));

        let mut last_error: Option<TekstError> = None;
        let mut state = FetchState::Trying(0);

        let terminal = loop {
            state = match state {
                FetchState::Trying(i) => match candidates.get(i) {
                    None => FetchState::Exhausted(last_error.take().unwrap_or_else(|| {
                        TekstError::CaptionFetch("no languages attempted".to_string())
                    })),
                    Some(lang) => match self.captions.get_captions(video_id, lang).await {
                        Ok(cues) if !cues.is_empty() => FetchState::Success(cues, lang.clone()),
                        Ok(_) => {
                            last_error = Some(TekstError::LanguageUnavailable {
                                video_id: video_id.to_string(),
                                language: lang.clone(),
                            });
                            FetchState::Trying(i + 1)
                        }
                        Err(CaptionError::NoCaptions) => FetchState::NoCaptions,
                        Err(CaptionError::LanguageUnavailable(language)) => {
                            debug!("No '{language}' captions for {video_id}, trying next");
                            last_error = Some(TekstError::LanguageUnavailable {
                                video_id: video_id.to_string(),
                                language,
                            });
                            FetchState::Trying(i + 1)
                        }
                        Err(CaptionError::Transport(msg)) => {
                            debug!("Caption fetch error for {video_id}: {msg}");
                            last_error = Some(TekstError::CaptionFetch(msg));
                            FetchState::Trying(i + 1)
                        }
                    },
                },
                terminal => break terminal,
            };
        };

        match terminal {
            FetchState::Success(cues, language) => {
                self.cache.put(video_id, requested, &language, &cues);
                Ok(cues)
            }
            FetchState::NoCaptions => Err(TekstError::NoCaptions {
                video_id: video_id.to_string(),
            }),
            FetchState::Exhausted(cause) => Err(TekstError::AllLanguagesFailed {
                video_id: video_id.to_string(),
                attempted: candidates.join(", "),
                source: Box::new(cause),
            }),
            FetchState::Trying(_) => unreachable!("loop exits only on terminal states"),
        }
    }

    /// Fetch, filter, and format a single video's transcript.
    pub async fn fetch_transcript(
        &self,
        video_id: &str,
        options: &TranscriptOptions,
    ) -> Result<FormattedTranscript> {
        let cues = self.fetch_cues(video_id, options).await?;
        let processed = apply_filters(&cues, options);

        let metadata = if options.include_metadata {
            Some(self.collect_metadata(&[video_id.to_string()]).await)
        } else {
            None
        };

        Ok(format_transcript(processed, metadata, options))
    }

    /// Fetch several videos concurrently and merge their cues.
    ///
    /// The merged sequence preserves input order regardless of which fetch
    /// resolves first, and every cue is tagged with its source video.
    pub async fn fetch_enhanced(
        &self,
        video_ids: &[String],
        options: &TranscriptOptions,
    ) -> Result<FormattedTranscript> {
        if video_ids.is_empty() {
            return Err(TekstError::InvalidInput(
                "at least one video ID is required".to_string(),
            ));
        }

        let fetches = video_ids.iter().map(|id| self.fetch_cues(id, options));
        let per_video = future::try_join_all(fetches).await?;

        let mut merged = Vec::new();
        for (id, cues) in video_ids.iter().zip(per_video) {
            merged.extend(cues.into_iter().map(|mut cue| {
                cue.video_id = Some(id.clone());
                cue
            }));
        }

        let processed = apply_filters(&merged, options);

        let metadata = if options.include_metadata {
            Some(self.collect_metadata(video_ids).await)
        } else {
            None
        };

        Ok(format_transcript(processed, metadata, options))
    }

    /// Best-effort channel country lookup for the language hint.
    ///
    /// Any upstream failure silently yields no hint; the plain fallback
    /// pool is still a valid candidate list.
    async fn detect_country(&self, video_id: &str) -> Option<String> {
        let video = match self.metadata.get_video(video_id).await {
            Ok(v) => v,
            Err(e) => {
                debug!("Country detection skipped for {video_id}: {e}");
                return None;
            }
        };
        match self.metadata.get_channel(&video.channel_id).await {
            Ok(channel) => channel.country,
            Err(e) => {
                debug!("Country detection skipped for {video_id}: {e}");
                None
            }
        }
    }

    /// Fetch metadata for each video, dropping any that can't be retrieved.
    async fn collect_metadata(&self, video_ids: &[String]) -> Vec<VideoMetadata> {
        let lookups = video_ids.iter().map(|id| self.metadata.get_video(id));
        future::join_all(lookups)
            .await
            .into_iter()
            .filter_map(|r| r.ok())
            .collect()
    }

    /// The cue cache, exposed for inspection in tests and diagnostics.
    pub fn cache(&self) -> &TranscriptCache {
        &self.cache
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcript::{ChannelInfo, OutputFormat};
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Scripted caption source that records every attempt.
    struct ScriptedSource {
        attempts: Mutex<Vec<String>>,
        /// Language that succeeds, if any.
        available: Option<String>,
        /// Report video-level caption absence instead of per-language.
        no_captions: bool,
        /// Delay before responding, keyed by nothing (applies to all calls).
        delay_ms: u64,
    }

    impl ScriptedSource {
        fn with_language(lang: &str) -> Self {
            Self {
                attempts: Mutex::new(Vec::new()),
                available: Some(lang.to_string()),
                no_captions: false,
                delay_ms: 0,
            }
        }

        fn without_captions() -> Self {
            Self {
                attempts: Mutex::new(Vec::new()),
                available: None,
                no_captions: true,
                delay_ms: 0,
            }
        }

        fn unavailable_everywhere() -> Self {
            Self {
                attempts: Mutex::new(Vec::new()),
                available: None,
                no_captions: false,
                delay_ms: 0,
            }
        }

        fn attempts(&self) -> Vec<String> {
            self.attempts.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl CaptionSource for ScriptedSource {
        async fn get_captions(
            &self,
            video_id: &str,
            language: &str,
        ) -> std::result::Result<Vec<Cue>, CaptionError> {
            self.attempts.lock().unwrap().push(language.to_string());
            if self.delay_ms > 0 && video_id == "videoA" {
                tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;
            }
            if self.no_captions {
                return Err(CaptionError::NoCaptions);
            }
            match &self.available {
                Some(lang) if lang == language => Ok(vec![
                    Cue::new(format!("{video_id} says hello"), 0, 2000),
                    Cue::new(format!("{video_id} says goodbye"), 2000, 2000),
                ]),
                _ => Err(CaptionError::LanguageUnavailable(language.to_string())),
            }
        }
    }

    /// Metadata provider with a fixed channel country.
    struct FixedMetadata {
        country: Option<String>,
        fail_video: bool,
    }

    #[async_trait]
    impl MetadataProvider for FixedMetadata {
        async fn get_video(&self, video_id: &str) -> Result<VideoMetadata> {
            if self.fail_video {
                return Err(TekstError::VideoNotFound(video_id.to_string()));
            }
            Ok(VideoMetadata {
                id: video_id.to_string(),
                title: format!("Title of {video_id}"),
                channel_id: "UCchan".to_string(),
                channel_title: "Channel".to_string(),
                published_at: None,
                duration: 120,
                view_count: 100,
                like_count: 10,
            })
        }

        async fn get_channel(&self, channel_id: &str) -> Result<ChannelInfo> {
            Ok(ChannelInfo {
                id: channel_id.to_string(),
                title: "Channel".to_string(),
                country: self.country.clone(),
            })
        }
    }

    fn fetcher_with(
        source: Arc<ScriptedSource>,
        metadata: FixedMetadata,
    ) -> TranscriptFetcher {
        TranscriptFetcher::new(source, Arc::new(metadata), TranscriptCache::default())
    }

    fn no_hint_metadata() -> FixedMetadata {
        FixedMetadata {
            country: None,
            fail_video: true,
        }
    }

    #[tokio::test]
    async fn test_no_captions_aborts_after_single_probe() {
        let source = Arc::new(ScriptedSource::without_captions());
        let fetcher = fetcher_with(source.clone(), no_hint_metadata());

        let err = fetcher
            .fetch_cues("vid", &TranscriptOptions::default())
            .await
            .unwrap_err();

        assert!(matches!(err, TekstError::NoCaptions { .. }));
        assert_eq!(source.attempts().len(), 1);
    }

    #[tokio::test]
    async fn test_exhausts_all_candidates_before_failing() {
        let source = Arc::new(ScriptedSource::unavailable_everywhere());
        let fetcher = fetcher_with(source.clone(), no_hint_metadata());

        let err = fetcher
            .fetch_cues("vid", &TranscriptOptions::default())
            .await
            .unwrap_err();

        match err {
            TekstError::AllLanguagesFailed { attempted, .. } => {
                assert!(attempted.starts_with("en, ko, ja"));
            }
            other => panic!("unexpected error: {other}"),
        }
        // Full fallback pool was tried in order.
        assert_eq!(source.attempts().len(), 12);
        assert_eq!(source.attempts()[0], "en");
    }

    #[tokio::test]
    async fn test_fallback_populates_both_cache_keys() {
        let source = Arc::new(ScriptedSource::with_language("ko"));
        let fetcher = fetcher_with(source.clone(), no_hint_metadata());

        let options = TranscriptOptions {
            language: Some("en".to_string()),
            ..Default::default()
        };
        let cues = fetcher.fetch_cues("vid", &options).await.unwrap();

        assert_eq!(cues[0].text, "vid says hello");
        assert_eq!(source.attempts(), vec!["en".to_string(), "ko".to_string()]);
        assert!(fetcher.cache().get("vid", Some("en")).is_some());
        assert!(fetcher.cache().get("vid", Some("ko")).is_some());
    }

    #[tokio::test]
    async fn test_cache_hit_skips_the_source() {
        let source = Arc::new(ScriptedSource::with_language("en"));
        let fetcher = fetcher_with(source.clone(), no_hint_metadata());
        let options = TranscriptOptions::default();

        fetcher.fetch_cues("vid", &options).await.unwrap();
        let first_attempts = source.attempts().len();
        fetcher.fetch_cues("vid", &options).await.unwrap();

        assert_eq!(source.attempts().len(), first_attempts);
    }

    #[tokio::test]
    async fn test_country_hint_seeds_first_attempt() {
        let source = Arc::new(ScriptedSource::with_language("ko"));
        let metadata = FixedMetadata {
            country: Some("KR".to_string()),
            fail_video: false,
        };
        let fetcher = fetcher_with(source.clone(), metadata);

        fetcher
            .fetch_cues("vid", &TranscriptOptions::default())
            .await
            .unwrap();

        assert_eq!(source.attempts(), vec!["ko".to_string()]);
    }

    #[tokio::test]
    async fn test_explicit_language_skips_country_detection() {
        let source = Arc::new(ScriptedSource::with_language("fr"));
        let metadata = FixedMetadata {
            country: Some("KR".to_string()),
            fail_video: false,
        };
        let fetcher = fetcher_with(source.clone(), metadata);

        let options = TranscriptOptions {
            language: Some("fr".to_string()),
            ..Default::default()
        };
        fetcher.fetch_cues("vid", &options).await.unwrap();

        assert_eq!(source.attempts(), vec!["fr".to_string()]);
    }

    #[tokio::test]
    async fn test_enhanced_rejects_empty_input() {
        let source = Arc::new(ScriptedSource::with_language("en"));
        let fetcher = fetcher_with(source, no_hint_metadata());

        let err = fetcher
            .fetch_enhanced(&[], &TranscriptOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, TekstError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_enhanced_preserves_input_order_and_tags() {
        // videoA responds slower than videoB; order must still hold.
        let source = Arc::new(ScriptedSource {
            attempts: Mutex::new(Vec::new()),
            available: Some("en".to_string()),
            no_captions: false,
            delay_ms: 30,
        });
        let fetcher = fetcher_with(source, no_hint_metadata());

        let ids = vec!["videoA".to_string(), "videoB".to_string()];
        let result = fetcher
            .fetch_enhanced(&ids, &TranscriptOptions::default())
            .await
            .unwrap();

        assert_eq!(result.total_segments, 4);
        let tags: Vec<_> = result
            .segments
            .iter()
            .map(|c| c.video_id.clone().unwrap())
            .collect();
        assert_eq!(tags, vec!["videoA", "videoA", "videoB", "videoB"]);
    }

    #[tokio::test]
    async fn test_transcript_formats_end_to_end() {
        let source = Arc::new(ScriptedSource::with_language("en"));
        let fetcher = fetcher_with(source, no_hint_metadata());

        let options = TranscriptOptions {
            format: OutputFormat::Timestamped,
            ..Default::default()
        };
        let result = fetcher.fetch_transcript("vid", &options).await.unwrap();

        assert_eq!(
            result.text.as_deref(),
            Some("[0:00] vid says hello\n[0:02] vid says goodbye")
        );
    }

    #[tokio::test]
    async fn test_metadata_drops_unfetchable_videos() {
        let source = Arc::new(ScriptedSource::with_language("en"));
        let fetcher = fetcher_with(source, no_hint_metadata());

        let options = TranscriptOptions {
            language: Some("en".to_string()),
            include_metadata: true,
            ..Default::default()
        };
        let result = fetcher.fetch_transcript("vid", &options).await.unwrap();
        // Video details fail, so the metadata array is present but empty.
        assert_eq!(result.metadata.unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_search_without_matches_yields_empty_payload() {
        let source = Arc::new(ScriptedSource::with_language("en"));
        let fetcher = fetcher_with(source, no_hint_metadata());

        let options = TranscriptOptions {
            search: Some(crate::transcript::SearchOptions {
                query: "nonexistent phrase".to_string(),
                case_sensitive: false,
                context_lines: 2,
            }),
            ..Default::default()
        };
        let result = fetcher.fetch_transcript("vid", &options).await.unwrap();
        assert_eq!(result.total_segments, 0);
        assert!(result.segments.is_empty());
    }
}
