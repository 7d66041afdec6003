//! Fixed-count wall-clock segmentation reports.

use crate::error::{Result, TekstError};
use crate::transcript::{
    format_timestamp_ms, Cue, FormattedTranscript, OutputFormat, TranscriptFetcher,
    TranscriptOptions,
};

/// Splits a transcript into equal wall-clock windows and renders one headed
/// section per non-empty window.
pub struct SegmentAnalyzer<'a> {
    fetcher: &'a TranscriptFetcher,
}

impl<'a> SegmentAnalyzer<'a> {
    pub fn new(fetcher: &'a TranscriptFetcher) -> Self {
        Self { fetcher }
    }

    /// Produce a `segment_count`-window report for a video.
    pub async fn segment(
        &self,
        video_id: &str,
        segment_count: usize,
    ) -> Result<FormattedTranscript> {
        if segment_count == 0 {
            return Err(TekstError::InvalidInput(
                "segment count must be at least 1".to_string(),
            ));
        }

        let options = TranscriptOptions::default();
        let cues = self.fetcher.fetch_cues(video_id, &options).await?;

        if cues.is_empty() {
            return Err(TekstError::NoCaptions {
                video_id: video_id.to_string(),
            });
        }

        let report = build_report(&cues, segment_count);
        let duration: f64 = cues.iter().map(|c| c.duration_ms as f64 / 1000.0).sum();

        Ok(FormattedTranscript {
            total_segments: cues.len(),
            duration,
            format: OutputFormat::Timestamped,
            text: Some(report),
            metadata: None,
            segments: cues,
        })
    }
}

/// One heading per window labelled `start-end`, followed by the window's
/// timestamped cues. A cue belongs to the window containing its start
/// offset; windows with no cues are omitted rather than padded.
fn build_report(cues: &[Cue], segment_count: usize) -> String {
    let total_ms = cues.last().map(|c| c.offset_ms + c.duration_ms).unwrap_or(0);
    let window_ms = total_ms as f64 / segment_count as f64;

    let mut out = String::from("# Transcript Segments\n\n");
    for i in 0..segment_count {
        let window_start = (i as f64 * window_ms) as u64;
        let window_end = ((i + 1) as f64 * window_ms) as u64;

        let window_cues: Vec<&Cue> = cues
            .iter()
            .filter(|c| {
                c.offset_ms >= window_start
                    && (c.offset_ms < window_end || i == segment_count - 1)
            })
            .collect();

        if window_cues.is_empty() {
            continue;
        }

        out.push_str(&format!(
            "## Segment {} [{} - {}]\n",
            i + 1,
            format_timestamp_ms(window_start),
            format_timestamp_ms(window_end),
        ));
        for cue in window_cues {
            out.push_str(&format!(
                "[{}] {}\n",
                format_timestamp_ms(cue.offset_ms),
                cue.text
            ));
        }
        out.push('\n');
    }
    out
}
