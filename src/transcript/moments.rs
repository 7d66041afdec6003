//! Key-moment extraction: ranked paragraph-length excerpts of a transcript.

use crate::error::{Result, TekstError};
use crate::transcript::{
    format_timestamp_ms, formatter::render_timestamped, Cue, FormattedTranscript, OutputFormat,
    TranscriptFetcher, TranscriptOptions,
};

/// Paragraphs shorter than this are never considered moments.
const MIN_PARAGRAPH_CHARS: usize = 100;

/// A contiguous run of cues treated as one paragraph.
struct Paragraph {
    start_ms: u64,
    text: String,
}

/// Picks the most substantial paragraphs of a transcript and renders them
/// as a timestamped report.
///
/// Ranking is by raw text length, a deliberate placeholder for content
/// analysis; changing it would change which moments existing clients see.
pub struct KeyMomentExtractor<'a> {
    fetcher: &'a TranscriptFetcher,
}

impl<'a> KeyMomentExtractor<'a> {
    pub fn new(fetcher: &'a TranscriptFetcher) -> Self {
        Self { fetcher }
    }

    /// Extract up to `max_moments` key moments for a video.
    pub async fn extract(&self, video_id: &str, max_moments: usize) -> Result<FormattedTranscript> {
        let options = TranscriptOptions::default();
        let cues = self.fetcher.fetch_cues(video_id, &options).await?;

        if cues.is_empty() {
            return Err(TekstError::NoCaptions {
                video_id: video_id.to_string(),
            });
        }

        let report = build_report(&cues, max_moments);
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

/// Group consecutive cues into paragraphs of `clamp(n/15, 5, 8)` cues each.
fn group_paragraphs(cues: &[Cue]) -> Vec<Paragraph> {
    let size = (cues.len() / 15).clamp(5, 8);
    cues.chunks(size)
        .map(|chunk| Paragraph {
            start_ms: chunk[0].offset_ms,
            text: chunk
                .iter()
                .map(|c| c.text.as_str())
                .collect::<Vec<_>>()
                .join(" "),
        })
        .collect()
}

/// Indices of the top paragraphs by text length, short ones discarded.
fn rank_paragraphs(paragraphs: &[Paragraph], max_moments: usize) -> Vec<usize> {
    let mut ranked: Vec<usize> = paragraphs
        .iter()
        .enumerate()
        .filter(|(_, p)| p.text.len() >= MIN_PARAGRAPH_CHARS)
        .map(|(i, _)| i)
        .collect();
    ranked.sort_by(|a, b| paragraphs[*b].text.len().cmp(&paragraphs[*a].text.len()));
    ranked.truncate(max_moments);
    ranked
}

/// Headed moment sections followed by the full timestamped transcript.
fn build_report(cues: &[Cue], max_moments: usize) -> String {
    let paragraphs = group_paragraphs(cues);
    let selected = rank_paragraphs(&paragraphs, max_moments);

    let mut out = String::from("# Key Moments\n\n");
    for (n, &idx) in selected.iter().enumerate() {
        let paragraph = &paragraphs[idx];
        out.push_str(&format!(
            "## Key Moment {} [{}]\n{}\n\n",
            n + 1,
            format_timestamp_ms(paragraph.start_ms),
            paragraph.text
        ));
    }

    out.push_str("# Full Transcript\n\n");
    out.push_str(&render_timestamped(cues));
    out
}
