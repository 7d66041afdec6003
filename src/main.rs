//! Tekst CLI entry point.

use anyhow::Result;
use clap::Parser;
use tekst::cli::{commands, Cli, Commands, Output};
use tekst::config::Settings;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("tekst={}", log_level)),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();

    // Load configuration
    let settings = match &cli.config {
        Some(path) => Settings::load_from(Some(&std::path::PathBuf::from(path)))?,
        None => Settings::load()?,
    };

    let result = match &cli.command {
        Commands::Transcript {
            videos,
            language,
            format,
            start,
            end,
            query,
            case_sensitive,
            context,
            segment_method,
            segment_count,
            metadata,
            json,
        } => {
            commands::run_transcript(
                videos,
                language.clone(),
                format,
                *start,
                *end,
                query.clone(),
                *case_sensitive,
                *context,
                segment_method.clone(),
                *segment_count,
                *metadata,
                *json,
                settings,
            )
            .await
        }

        Commands::Moments { video, max_moments } => {
            commands::run_moments(video, *max_moments, settings).await
        }

        Commands::Segments { video, count } => {
            commands::run_segments(video, *count, settings).await
        }

        Commands::Config { init } => commands::run_config(*init, &settings),

        Commands::Mcp => return commands::run_mcp(&settings).await,
    };

    if let Err(err) = result {
        // A missing transcript is a routine outcome, not a crash.
        if err.is_not_found() {
            Output::warning(&err.to_string());
        } else {
            Output::error(&err.to_string());
        }
        std::process::exit(1);
    }

    Ok(())
}
