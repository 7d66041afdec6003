//! Rendering processed cues into the output envelope.

use crate::transcript::{
    format_timestamp_ms, Cue, FormattedTranscript, OutputFormat, TranscriptOptions, VideoMetadata,
};

/// Render a processed cue list (plus optional per-video metadata) into a
/// [`FormattedTranscript`].
///
/// `duration` is total spoken duration (sum of cue durations), not the
/// wall-clock span of the video.
pub fn format_transcript(
    cues: Vec<Cue>,
    metadata: Option<Vec<VideoMetadata>>,
    options: &TranscriptOptions,
) -> FormattedTranscript {
    let duration: f64 = cues.iter().map(|c| c.duration_ms as f64 / 1000.0).sum();

    let text = match options.format {
        OutputFormat::Raw => None,
        OutputFormat::Timestamped => Some(render_timestamped(&cues)),
        OutputFormat::Merged => Some(render_merged(&cues)),
    };

    let metadata = if options.include_metadata { metadata } else { None };

    FormattedTranscript {
        total_segments: cues.len(),
        duration,
        format: options.format,
        text,
        metadata,
        segments: cues,
    }
}

/// One `[M:SS] text` line per cue.
pub fn render_timestamped(cues: &[Cue]) -> String {
    cues.iter()
        .map(|cue| format!("[{}] {}", format_timestamp_ms(cue.offset_ms), cue.text))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Cue texts joined by single spaces, no timestamps.
pub fn render_merged(cues: &[Cue]) -> String {
    cues.iter()
        .map(|cue| cue.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}
