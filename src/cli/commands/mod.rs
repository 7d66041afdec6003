//! Command implementations for the Tekst CLI.

mod config;
mod mcp;
mod moments;
mod segments;
mod transcript;

pub use config::run_config;
pub use mcp::run_mcp;
pub use moments::run_moments;
pub use segments::run_segments;
pub use transcript::run_transcript;
