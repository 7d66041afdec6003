//! CLI module for Tekst.

pub mod commands;
mod output;

pub use output::Output;

use clap::{Parser, Subcommand};

/// Tekst - YouTube transcripts for humans and LLMs
///
/// Fetches caption transcripts with automatic language fallback, filters and
/// segments them, and serves the same pipeline as MCP tools.
#[derive(Parser, Debug)]
#[command(name = "tekst")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch a transcript for one or more videos
    Transcript {
        /// YouTube video IDs or URLs (several are merged in order)
        #[arg(required = true)]
        videos: Vec<String>,

        /// Preferred caption language code
        #[arg(short, long)]
        language: Option<String>,

        /// Output format (raw, timestamped, merged)
        #[arg(short, long, default_value = "timestamped")]
        format: String,

        /// Keep cues starting at or after this time (seconds)
        #[arg(long)]
        start: Option<f64>,

        /// Keep cues ending at or before this time (seconds)
        #[arg(long)]
        end: Option<f64>,

        /// Keep only cues containing this text
        #[arg(short, long)]
        query: Option<String>,

        /// Match the search query case-sensitively
        #[arg(long)]
        case_sensitive: bool,

        /// Cues of context around each search match
        #[arg(long, default_value_t = 0)]
        context: usize,

        /// Segmentation method (equal, smart)
        #[arg(long)]
        segment_method: Option<String>,

        /// Number of segments (requires --segment-method)
        #[arg(long)]
        segment_count: Option<usize>,

        /// Include video metadata in the output
        #[arg(short, long)]
        metadata: bool,

        /// Print the full JSON envelope instead of rendered text
        #[arg(long)]
        json: bool,
    },

    /// Extract key moments from a video's transcript
    Moments {
        /// YouTube video ID or URL
        video: String,

        /// Maximum number of key moments
        #[arg(short, long, default_value_t = 5)]
        max_moments: usize,
    },

    /// Split a video's transcript into equal wall-clock segments
    Segments {
        /// YouTube video ID or URL
        video: String,

        /// Number of segments
        #[arg(short = 'n', long, default_value_t = 4)]
        count: usize,
    },

    /// Show or initialize the configuration
    Config {
        /// Write a default configuration file if none exists
        #[arg(long)]
        init: bool,
    },

    /// Run as an MCP server (stdio)
    Mcp,
}
