//! `tekst config` command.

use crate::cli::Output;
use crate::config::Settings;
use crate::error::Result;

pub fn run_config(init: bool, settings: &Settings) -> Result<()> {
    let path = Settings::default_config_path();

    if init {
        if path.exists() {
            Output::warning(&format!("Config already exists at {}", path.display()));
        } else {
            Settings::default().save()?;
            Output::success(&format!("Wrote default config to {}", path.display()));
        }
        return Ok(());
    }

    if !path.exists() {
        Output::info("No config file on disk; showing defaults");
    }

    Output::header("Configuration");
    Output::kv("path", &path.display().to_string());
    Output::kv(
        "api key",
        if settings.api_key().is_some() {
            "configured"
        } else {
            "not set (metadata and language detection disabled)"
        },
    );
    Output::kv(
        "cache ttl",
        &format!("{}s", settings.transcript.cache_ttl_seconds),
    );
    Output::kv(
        "default language",
        settings.transcript.default_language.as_deref().unwrap_or("none"),
    );
    Ok(())
}
