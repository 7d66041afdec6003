//! `tekst transcript` command.

use crate::cli::Output;
use crate::config::Settings;
use crate::error::Result;
use crate::service::TranscriptService;
use crate::transcript::{
    FormattedTranscript, OutputFormat, SearchOptions, SegmentMethod, SegmentOptions, TimeRange,
    TranscriptOptions,
};

#[allow(clippy::too_many_arguments)]
pub async fn run_transcript(
    videos: &[String],
    language: Option<String>,
    format: &str,
    start: Option<f64>,
    end: Option<f64>,
    query: Option<String>,
    case_sensitive: bool,
    context: usize,
    segment_method: Option<String>,
    segment_count: Option<usize>,
    metadata: bool,
    json: bool,
    settings: Settings,
) -> Result<()> {
    let format: OutputFormat = format
        .parse()
        .map_err(crate::error::TekstError::InvalidInput)?;

    let time_range = if start.is_some() || end.is_some() {
        Some(TimeRange { start, end })
    } else {
        None
    };

    let search = query.map(|query| SearchOptions {
        query,
        case_sensitive,
        context_lines: context,
    });

    let segment = match segment_method {
        Some(method) => {
            let method: SegmentMethod = method
                .parse()
                .map_err(crate::error::TekstError::InvalidInput)?;
            let count = segment_count.ok_or_else(|| {
                crate::error::TekstError::InvalidInput(
                    "--segment-count is required with --segment-method".to_string(),
                )
            })?;
            Some(SegmentOptions { method, count })
        }
        None => None,
    };

    let options = TranscriptOptions {
        language,
        time_range,
        search,
        segment,
        format,
        include_metadata: metadata,
    };

    let service = TranscriptService::new(&settings);
    let spinner = Output::spinner("Fetching transcript...");
    let result = if videos.len() == 1 {
        service.get_transcript(&videos[0], options).await
    } else {
        service.get_enhanced_transcript(videos, options).await
    };
    spinner.finish_and_clear();

    let transcript = result?;
    print_transcript(&transcript, json)?;
    Ok(())
}

fn print_transcript(transcript: &FormattedTranscript, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(transcript)?);
        return Ok(());
    }

    match &transcript.text {
        Some(text) => println!("{}", text),
        None => println!("{}", serde_json::to_string_pretty(&transcript.segments)?),
    }

    Output::kv("segments", &transcript.total_segments.to_string());
    Output::kv("spoken duration", &format!("{:.1}s", transcript.duration));
    if let Some(metadata) = &transcript.metadata {
        for video in metadata {
            Output::kv(
                &video.id,
                &format!("{} ({} views)", video.title, video.view_count),
            );
        }
    }
    Ok(())
}
