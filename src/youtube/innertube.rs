//! Caption fetching via YouTube's InnerTube player endpoint.
//!
//! Flow: fetch the watch page to recover the InnerTube API key, call the
//! player endpoint for the caption track list, then download and parse the
//! track XML for the exact requested language. Cross-language fallback is
//! deliberately not done here; that ordering lives in the fetcher.

use super::{CaptionError, CaptionSource};
use crate::transcript::Cue;
use async_trait::async_trait;
use regex::Regex;
use serde::Deserialize;
use tracing::debug;

const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";
const CLIENT_VERSION: &str = "2.20241126.01.00";

#[derive(Debug, Deserialize)]
struct PlayerResponse {
    captions: Option<CaptionsData>,
}

#[derive(Debug, Deserialize)]
struct CaptionsData {
    #[serde(rename = "playerCaptionsTracklistRenderer")]
    tracklist: Option<TracklistRenderer>,
}

#[derive(Debug, Deserialize)]
struct TracklistRenderer {
    #[serde(rename = "captionTracks")]
    caption_tracks: Option<Vec<CaptionTrack>>,
}

#[derive(Debug, Deserialize)]
struct CaptionTrack {
    #[serde(rename = "baseUrl")]
    base_url: String,
    #[serde(rename = "languageCode")]
    language_code: String,
}

/// Caption source backed by the InnerTube API.
pub struct InnerTubeSource {
    client: reqwest::Client,
}

impl InnerTubeSource {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    async fn fetch_watch_page(&self, video_id: &str) -> Result<String, CaptionError> {
        let url = format!("https://www.youtube.com/watch?v={video_id}");
        debug!("Fetching watch page: {url}");
        let html = self
            .client
            .get(&url)
            .header("User-Agent", USER_AGENT)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        Ok(html)
    }

    async fn fetch_player_response(
        &self,
        video_id: &str,
        api_key: &str,
        language: &str,
    ) -> Result<PlayerResponse, CaptionError> {
        let url =
            format!("https://www.youtube.com/youtubei/v1/player?key={api_key}&prettyPrint=false");
        let body = serde_json::json!({
            "context": {
                "client": {
                    "hl": language,
                    "gl": "US",
                    "clientName": "WEB",
                    "clientVersion": CLIENT_VERSION,
                }
            },
            "videoId": video_id,
        });

        let resp = self
            .client
            .post(&url)
            .header("User-Agent", USER_AGENT)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json::<PlayerResponse>()
            .await?;
        Ok(resp)
    }

    async fn fetch_track_xml(&self, base_url: &str) -> Result<String, CaptionError> {
        let xml = self
            .client
            .get(base_url)
            .header("User-Agent", USER_AGENT)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        Ok(xml)
    }
}

impl Default for InnerTubeSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CaptionSource for InnerTubeSource {
    async fn get_captions(
        &self,
        video_id: &str,
        language: &str,
    ) -> Result<Vec<Cue>, CaptionError> {
        let html = self.fetch_watch_page(video_id).await?;
        let api_key = extract_api_key(&html)?;

        let resp = self
            .fetch_player_response(video_id, &api_key, language)
            .await?;

        let tracks = resp
            .captions
            .and_then(|c| c.tracklist)
            .and_then(|t| t.caption_tracks)
            .unwrap_or_default();

        if tracks.is_empty() {
            return Err(CaptionError::NoCaptions);
        }

        let track = tracks
            .iter()
            .find(|t| t.language_code == language)
            .ok_or_else(|| CaptionError::LanguageUnavailable(language.to_string()))?;

        debug!("Using caption track: video={video_id} lang={language}");
        let xml = self.fetch_track_xml(&track.base_url).await?;
        parse_caption_xml(&xml)
    }
}

fn extract_api_key(html: &str) -> Result<String, CaptionError> {
    let re = Regex::new(r#""INNERTUBE_API_KEY"\s*:\s*"([^"]+)""#)
        .map_err(|e| CaptionError::Transport(e.to_string()))?;
    if let Some(caps) = re.captures(html) {
        return Ok(caps[1].to_string());
    }

    // Newer pages embed the key differently.
    let re2 = Regex::new(r#"innertubeApiKey\s*[=:]\s*"([^"]+)""#)
        .map_err(|e| CaptionError::Transport(e.to_string()))?;
    if let Some(caps) = re2.captures(html) {
        return Ok(caps[1].to_string());
    }

    Err(CaptionError::Transport(
        "could not extract InnerTube API key from watch page".to_string(),
    ))
}

/// Parse `<text start=".." dur="..">..</text>` caption XML into cues.
fn parse_caption_xml(xml: &str) -> Result<Vec<Cue>, CaptionError> {
    use quick_xml::events::Event;
    use quick_xml::Reader;

    let mut reader = Reader::from_str(xml);
    let mut cues = Vec::new();
    let mut current_start: Option<f64> = None;
    let mut current_dur: Option<f64> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) if e.name().as_ref() == b"text" => {
                let mut start = None;
                let mut dur = None;
                for attr in e.attributes().flatten() {
                    match attr.key.as_ref() {
                        b"start" => {
                            start = String::from_utf8_lossy(&attr.value).parse::<f64>().ok();
                        }
                        b"dur" => {
                            dur = String::from_utf8_lossy(&attr.value).parse::<f64>().ok();
                        }
                        _ => {}
                    }
                }
                current_start = start;
                current_dur = dur;
            }
            Ok(Event::Text(ref e)) => {
                if let (Some(start), Some(dur)) = (current_start.take(), current_dur.take()) {
                    let raw = e.unescape().unwrap_or_default().to_string();
                    let text = html_escape::decode_html_entities(&raw).to_string();
                    if !text.is_empty() {
                        cues.push(Cue::new(
                            text,
                            (start * 1000.0).round() as u64,
                            (dur * 1000.0).round() as u64,
                        ));
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(CaptionError::Transport(format!(
                    "error parsing caption XML: {e}"
                )))
            }
            _ => {}
        }
    }

    Ok(cues)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_api_key() {
        let html = r#"var ytInitialPlayerResponse = {};"INNERTUBE_API_KEY":"AIzaSyTest123";"#;
        assert_eq!(extract_api_key(html).unwrap(), "AIzaSyTest123");
    }

    #[test]
    fn test_extract_api_key_fallback_pattern() {
        let html = r#"innertubeApiKey="AIzaSyB456";"#;
        assert_eq!(extract_api_key(html).unwrap(), "AIzaSyB456");
    }

    #[test]
    fn test_extract_api_key_missing() {
        assert!(extract_api_key("<html><body>no key</body></html>").is_err());
    }

    #[test]
    fn test_parse_caption_xml_basic() {
        let xml = r#"<?xml version="1.0" encoding="utf-8" ?>
<transcript>
    <text start="0.21" dur="2.34">Hello world</text>
    <text start="2.55" dur="1.50">This is a test</text>
</transcript>"#;

        let cues = parse_caption_xml(xml).unwrap();
        assert_eq!(cues.len(), 2);
        assert_eq!(cues[0].text, "Hello world");
        assert_eq!(cues[0].offset_ms, 210);
        assert_eq!(cues[0].duration_ms, 2340);
        assert_eq!(cues[1].offset_ms, 2550);
    }

    #[test]
    fn test_parse_caption_xml_decodes_entities() {
        let xml = r#"<transcript><text start="0.0" dur="1.0">it&amp;#39;s a &amp;quot;test&amp;quot;</text></transcript>"#;
        let cues = parse_caption_xml(xml).unwrap();
        assert_eq!(cues.len(), 1);
        assert_eq!(cues[0].text, "it's a \"test\"");
    }

    #[test]
    fn test_parse_caption_xml_empty() {
        let xml = r#"<?xml version="1.0" encoding="utf-8" ?><transcript></transcript>"#;
        assert!(parse_caption_xml(xml).unwrap().is_empty());
    }
}
