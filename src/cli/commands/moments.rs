//! `tekst moments` command.

use crate::cli::Output;
use crate::config::Settings;
use crate::error::Result;
use crate::service::TranscriptService;

pub async fn run_moments(video: &str, max_moments: usize, settings: Settings) -> Result<()> {
    let service = TranscriptService::new(&settings);

    let spinner = Output::spinner("Extracting key moments...");
    let result = service.extract_key_moments(video, max_moments).await;
    spinner.finish_and_clear();

    let transcript = result?;
    if let Some(text) = &transcript.text {
        println!("{}", text);
    }
    Ok(())
}
