//! MCP tool definitions for Tekst.

use super::protocol::Tool;
use serde_json::json;

/// Get all available tools.
pub fn get_tools() -> Vec<Tool> {
    vec![
        Tool {
            name: "get_transcript".to_string(),
            description: "Fetch the caption transcript of a YouTube video, with automatic \
                language fallback. Supports time-range filtering, text search with context, \
                segmentation, and raw/timestamped/merged output formats."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "videoId": {
                        "type": "string",
                        "description": "YouTube video ID or URL"
                    },
                    "language": {
                        "type": "string",
                        "description": "Preferred caption language code (e.g. 'en', 'ko')"
                    },
                    "format": {
                        "type": "string",
                        "enum": ["raw", "timestamped", "merged"],
                        "description": "Output representation",
                        "default": "raw"
                    },
                    "startTime": {
                        "type": "number",
                        "description": "Keep cues starting at or after this time (seconds)"
                    },
                    "endTime": {
                        "type": "number",
                        "description": "Keep cues ending at or before this time (seconds)"
                    },
                    "query": {
                        "type": "string",
                        "description": "Keep only cues containing this text (plus context)"
                    },
                    "caseSensitive": {
                        "type": "boolean",
                        "description": "Match the search query case-sensitively",
                        "default": false
                    },
                    "contextLines": {
                        "type": "integer",
                        "description": "Cues of context around each search match",
                        "default": 0
                    },
                    "segmentMethod": {
                        "type": "string",
                        "enum": ["equal", "smart"],
                        "description": "Group cues into segments by count or by spoken duration"
                    },
                    "segmentCount": {
                        "type": "integer",
                        "description": "Number of segments to produce"
                    },
                    "includeMetadata": {
                        "type": "boolean",
                        "description": "Attach video metadata (title, channel, counts)",
                        "default": false
                    }
                },
                "required": ["videoId"]
            }),
        },
        Tool {
            name: "get_enhanced_transcript".to_string(),
            description: "Fetch and merge transcripts for several YouTube videos in one call. \
                Cues keep input-video order and carry their source video ID. Accepts the same \
                filtering and formatting options as get_transcript."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "videoIds": {
                        "type": "array",
                        "items": { "type": "string" },
                        "description": "YouTube video IDs or URLs, in output order"
                    },
                    "language": { "type": "string" },
                    "format": {
                        "type": "string",
                        "enum": ["raw", "timestamped", "merged"],
                        "default": "raw"
                    },
                    "startTime": { "type": "number" },
                    "endTime": { "type": "number" },
                    "query": { "type": "string" },
                    "caseSensitive": { "type": "boolean", "default": false },
                    "contextLines": { "type": "integer", "default": 0 },
                    "segmentMethod": { "type": "string", "enum": ["equal", "smart"] },
                    "segmentCount": { "type": "integer" },
                    "includeMetadata": { "type": "boolean", "default": false }
                },
                "required": ["videoIds"]
            }),
        },
        Tool {
            name: "extract_key_moments".to_string(),
            description: "Extract the most substantial moments of a video's transcript as a \
                timestamped report, followed by the full transcript."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "videoId": {
                        "type": "string",
                        "description": "YouTube video ID or URL"
                    },
                    "maxMoments": {
                        "type": "integer",
                        "description": "Maximum number of key moments to return",
                        "default": 5
                    }
                },
                "required": ["videoId"]
            }),
        },
        Tool {
            name: "segment_transcript".to_string(),
            description: "Split a video's transcript into a fixed number of equal wall-clock \
                segments and return one timestamped section per segment."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "videoId": {
                        "type": "string",
                        "description": "YouTube video ID or URL"
                    },
                    "segmentCount": {
                        "type": "integer",
                        "description": "Number of segments to produce",
                        "default": 4
                    }
                },
                "required": ["videoId"]
            }),
        },
    ]
}
