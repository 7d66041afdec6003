//! `tekst segments` command.

use crate::cli::Output;
use crate::config::Settings;
use crate::error::Result;
use crate::service::TranscriptService;

pub async fn run_segments(video: &str, count: usize, settings: Settings) -> Result<()> {
    let service = TranscriptService::new(&settings);

    let spinner = Output::spinner("Segmenting transcript...");
    let result = service.segment_transcript(video, count).await;
    spinner.finish_and_clear();

    let transcript = result?;
    if let Some(text) = &transcript.text {
        println!("{}", text);
    }
    Ok(())
}
