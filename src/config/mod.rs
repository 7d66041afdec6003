//! Configuration module for Tekst.

mod settings;

pub use settings::{GeneralSettings, Settings, TranscriptSettings, YoutubeSettings};
