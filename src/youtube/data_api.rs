//! Video and channel details via the YouTube Data API v3.

use super::MetadataProvider;
use crate::error::{Result, TekstError};
use crate::transcript::{ChannelInfo, VideoMetadata};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::debug;

const API_BASE: &str = "https://www.googleapis.com/youtube/v3";

#[derive(Debug, Deserialize)]
struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    items: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct VideoItem {
    id: String,
    snippet: VideoSnippet,
    #[serde(rename = "contentDetails")]
    content_details: Option<ContentDetails>,
    statistics: Option<Statistics>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoSnippet {
    title: String,
    channel_id: String,
    channel_title: String,
    published_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct ContentDetails {
    duration: Option<String>,
}

// The API reports counts as decimal strings.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Statistics {
    view_count: Option<String>,
    like_count: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChannelItem {
    id: String,
    snippet: ChannelSnippet,
}

#[derive(Debug, Deserialize)]
struct ChannelSnippet {
    title: String,
    country: Option<String>,
}

/// YouTube Data API v3 client.
pub struct DataApiClient {
    client: reqwest::Client,
    api_key: String,
}

impl DataApiClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        resource: &str,
        part: &str,
        id: &str,
    ) -> Result<ListResponse<T>> {
        let url = format!("{API_BASE}/{resource}");
        debug!("Data API request: {resource} id={id}");
        let resp = self
            .client
            .get(&url)
            .query(&[("part", part), ("id", id), ("key", &self.api_key)])
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(TekstError::Api(format!(
                "{resource} request failed with {status}: {body}"
            )));
        }

        Ok(resp.json::<ListResponse<T>>().await?)
    }
}

#[async_trait]
impl MetadataProvider for DataApiClient {
    async fn get_video(&self, video_id: &str) -> Result<VideoMetadata> {
        let resp: ListResponse<VideoItem> = self
            .get_json("videos", "snippet,contentDetails,statistics", video_id)
            .await?;

        let item = resp
            .items
            .into_iter()
            .next()
            .ok_or_else(|| TekstError::VideoNotFound(video_id.to_string()))?;

        let duration = item
            .content_details
            .and_then(|d| d.duration)
            .map(|iso| parse_iso8601_duration(&iso))
            .unwrap_or(0);

        let (view_count, like_count) = item
            .statistics
            .map(|s| {
                (
                    s.view_count.and_then(|v| v.parse().ok()).unwrap_or(0),
                    s.like_count.and_then(|v| v.parse().ok()).unwrap_or(0),
                )
            })
            .unwrap_or((0, 0));

        Ok(VideoMetadata {
            id: item.id,
            title: item.snippet.title,
            channel_id: item.snippet.channel_id,
            channel_title: item.snippet.channel_title,
            published_at: item.snippet.published_at,
            duration,
            view_count,
            like_count,
        })
    }

    async fn get_channel(&self, channel_id: &str) -> Result<ChannelInfo> {
        let resp: ListResponse<ChannelItem> =
            self.get_json("channels", "snippet", channel_id).await?;

        let item = resp
            .items
            .into_iter()
            .next()
            .ok_or_else(|| TekstError::ChannelNotFound(channel_id.to_string()))?;

        Ok(ChannelInfo {
            id: item.id,
            title: item.snippet.title,
            country: item.snippet.country,
        })
    }
}

/// Parse an ISO-8601 video duration (`PT1H2M3S`) into seconds.
///
/// Unparseable input yields 0 rather than an error; duration is advisory
/// metadata, not pipeline input.
fn parse_iso8601_duration(s: &str) -> u64 {
    let rest = match s.strip_prefix("PT") {
        Some(r) => r,
        None => match s.strip_prefix("P") {
            // Day component appears on very long streams (P1DT2H...).
            Some(r) => r,
            None => return 0,
        },
    };

    let mut total: u64 = 0;
    let mut number = String::new();
    for ch in rest.chars() {
        if ch.is_ascii_digit() {
            number.push(ch);
            continue;
        }
        let value: u64 = number.parse().unwrap_or(0);
        number.clear();
        match ch {
            'D' => total += value * 86_400,
            'H' => total += value * 3600,
            'M' => total += value * 60,
            'S' => total += value,
            'T' => {}
            _ => return 0,
        }
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_iso8601_duration() {
        assert_eq!(parse_iso8601_duration("PT15S"), 15);
        assert_eq!(parse_iso8601_duration("PT4M13S"), 253);
        assert_eq!(parse_iso8601_duration("PT1H2M3S"), 3723);
        assert_eq!(parse_iso8601_duration("PT2H"), 7200);
        assert_eq!(parse_iso8601_duration("P1DT1H"), 90_000);
        assert_eq!(parse_iso8601_duration("garbage"), 0);
    }

    #[test]
    fn test_video_item_deserialization() {
        let json = serde_json::json!({
            "items": [{
                "id": "dQw4w9WgXcQ",
                "snippet": {
                    "title": "Test Video",
                    "channelId": "UC123",
                    "channelTitle": "Test Channel",
                    "publishedAt": "2020-01-01T00:00:00Z"
                },
                "contentDetails": { "duration": "PT3M33S" },
                "statistics": { "viewCount": "1000", "likeCount": "50" }
            }]
        });

        let resp: ListResponse<VideoItem> = serde_json::from_value(json).unwrap();
        let item = &resp.items[0];
        assert_eq!(item.snippet.channel_id, "UC123");
        assert_eq!(
            item.statistics.as_ref().unwrap().view_count.as_deref(),
            Some("1000")
        );
    }

    #[test]
    fn test_empty_items_deserializes() {
        let resp: ListResponse<ChannelItem> = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(resp.items.is_empty());
    }
}
