//! Tekst - YouTube transcripts for humans and LLMs
//!
//! Fetches caption transcripts from YouTube with multi-language fallback,
//! filters and segments them, and exposes the pipeline both as a CLI and as
//! MCP tools for LLM clients.
//!
//! The name "Tekst" is the Norwegian word for "text" (and, on a TV remote,
//! for subtitles).
//!
//! # Overview
//!
//! - Fetch caption cues for a video, trying candidate languages in order
//!   and caching raw cues per `(video, language)`
//! - Filter by time range, search with context expansion, and segment by
//!   cue count or spoken duration
//! - Render raw, timestamped, or merged output, optionally with video
//!   metadata
//! - Extract key moments and fixed-count segment reports
//!
//! # Architecture
//!
//! - `config` - Configuration management
//! - `youtube` - Upstream collaborators (caption source, metadata providers)
//! - `transcript` - The pipeline: fetcher, cache, processor, formatter
//! - `service` - Pipeline assembly from settings
//! - `mcp` - MCP stdio server exposing the pipeline as tools
//! - `cli` - Command-line interface
//!
//! # Example
//!
//! ```rust,no_run
//! use tekst::config::Settings;
//! use tekst::service::TranscriptService;
//! use tekst::transcript::TranscriptOptions;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let service = TranscriptService::new(&settings);
//!
//!     let transcript = service
//!         .get_transcript("dQw4w9WgXcQ", TranscriptOptions::default())
//!         .await?;
//!     println!("{} cues", transcript.total_segments);
//!
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod mcp;
pub mod service;
pub mod transcript;
pub mod youtube;

pub use error::{Result, TekstError};
