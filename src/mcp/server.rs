//! MCP server implementation.

use super::protocol::*;
use super::tools::get_tools;
use crate::config::Settings;
use crate::service::TranscriptService;
use crate::transcript::{
    OutputFormat, SearchOptions, SegmentMethod, SegmentOptions, TimeRange, TranscriptOptions,
};
use crate::error::TekstError;
use serde_json::{json, Value};
use std::io::{self, BufRead, Write};
use tracing::{debug, warn};

const PROTOCOL_VERSION: &str = "2024-11-05";
const SERVER_NAME: &str = "tekst";
const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// MCP Server for Tekst.
pub struct McpServer {
    service: TranscriptService,
}

impl McpServer {
    /// Create a new MCP server.
    pub fn new(settings: &Settings) -> Self {
        Self {
            service: TranscriptService::new(settings),
        }
    }

    /// Run the MCP server (reads from stdin, writes to stdout).
    pub async fn run(&mut self) -> anyhow::Result<()> {
        let stdin = io::stdin();
        let mut stdout = io::stdout();

        // Log to stderr so it doesn't interfere with JSON-RPC
        eprintln!("Tekst MCP server starting...");

        for line in stdin.lock().lines() {
            let line = line?;
            if line.is_empty() {
                continue;
            }

            let request: JsonRpcRequest = match serde_json::from_str(&line) {
                Ok(req) => req,
                Err(e) => {
                    eprintln!("Failed to parse request: {}", e);
                    let response = JsonRpcResponse::error(None, -32700, "Parse error");
                    writeln!(stdout, "{}", serde_json::to_string(&response)?)?;
                    stdout.flush()?;
                    continue;
                }
            };

            let response = self.handle_request(request).await;
            writeln!(stdout, "{}", serde_json::to_string(&response)?)?;
            stdout.flush()?;
        }

        Ok(())
    }

    /// Handle a single JSON-RPC request.
    async fn handle_request(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        match request.method.as_str() {
            "initialize" => self.handle_initialize(request.id),
            "initialized" => JsonRpcResponse::success(request.id, json!({})),
            "tools/list" => self.handle_tools_list(request.id),
            "tools/call" => self.handle_tools_call(request.id, request.params).await,
            _ => JsonRpcResponse::error(
                request.id,
                -32601,
                &format!("Method not found: {}", request.method),
            ),
        }
    }

    fn handle_initialize(&self, id: Option<Value>) -> JsonRpcResponse {
        let result = InitializeResult {
            protocol_version: PROTOCOL_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: ToolsCapability { list_changed: false },
            },
            server_info: ServerInfo {
                name: SERVER_NAME.to_string(),
                version: SERVER_VERSION.to_string(),
            },
        };

        JsonRpcResponse::success(id, serde_json::to_value(result).unwrap())
    }

    fn handle_tools_list(&self, id: Option<Value>) -> JsonRpcResponse {
        let result = ToolsListResult { tools: get_tools() };
        JsonRpcResponse::success(id, serde_json::to_value(result).unwrap())
    }

    async fn handle_tools_call(&self, id: Option<Value>, params: Option<Value>) -> JsonRpcResponse {
        let params: ToolCallParams = match params {
            Some(p) => match serde_json::from_value(p) {
                Ok(params) => params,
                Err(e) => {
                    return JsonRpcResponse::error(id, -32602, &format!("Invalid params: {}", e))
                }
            },
            None => return JsonRpcResponse::error(id, -32602, "Missing params"),
        };

        debug!("Tool call: {}", params.name);
        let result = match params.name.as_str() {
            "get_transcript" => self.tool_get_transcript(params.arguments).await,
            "get_enhanced_transcript" => self.tool_get_enhanced_transcript(params.arguments).await,
            "extract_key_moments" => self.tool_extract_key_moments(params.arguments).await,
            "segment_transcript" => self.tool_segment_transcript(params.arguments).await,
            _ => ToolCallResult::error(format!("Unknown tool: {}", params.name)),
        };

        JsonRpcResponse::success(id, serde_json::to_value(result).unwrap())
    }

    async fn tool_get_transcript(&self, args: Option<Value>) -> ToolCallResult {
        let args = match args {
            Some(a) => a,
            None => return ToolCallResult::error("Missing arguments".to_string()),
        };

        let video_id = match args.get("videoId").and_then(|v| v.as_str()) {
            Some(id) => id.to_string(),
            None => return ToolCallResult::error("Missing 'videoId' argument".to_string()),
        };

        let options = match options_from_args(&args) {
            Ok(o) => o,
            Err(e) => return ToolCallResult::error(e),
        };

        match self.service.get_transcript(&video_id, options).await {
            Ok(transcript) => render(&transcript),
            Err(e) => tool_failure("Transcript fetch failed", &e),
        }
    }

    async fn tool_get_enhanced_transcript(&self, args: Option<Value>) -> ToolCallResult {
        let args = match args {
            Some(a) => a,
            None => return ToolCallResult::error("Missing arguments".to_string()),
        };

        let video_ids: Vec<String> = match args.get("videoIds").and_then(|v| v.as_array()) {
            Some(ids) => ids
                .iter()
                .filter_map(|v| v.as_str().map(|s| s.to_string()))
                .collect(),
            None => return ToolCallResult::error("Missing 'videoIds' argument".to_string()),
        };
        if video_ids.is_empty() {
            return ToolCallResult::error("'videoIds' must name at least one video".to_string());
        }

        let options = match options_from_args(&args) {
            Ok(o) => o,
            Err(e) => return ToolCallResult::error(e),
        };

        match self.service.get_enhanced_transcript(&video_ids, options).await {
            Ok(transcript) => render(&transcript),
            Err(e) => tool_failure("Transcript fetch failed", &e),
        }
    }

    async fn tool_extract_key_moments(&self, args: Option<Value>) -> ToolCallResult {
        let args = match args {
            Some(a) => a,
            None => return ToolCallResult::error("Missing arguments".to_string()),
        };

        let video_id = match args.get("videoId").and_then(|v| v.as_str()) {
            Some(id) => id.to_string(),
            None => return ToolCallResult::error("Missing 'videoId' argument".to_string()),
        };
        let max_moments = arg_usize(&args, "maxMoments").unwrap_or(5);

        match self.service.extract_key_moments(&video_id, max_moments).await {
            Ok(transcript) => render(&transcript),
            Err(e) => tool_failure("Key moment extraction failed", &e),
        }
    }

    async fn tool_segment_transcript(&self, args: Option<Value>) -> ToolCallResult {
        let args = match args {
            Some(a) => a,
            None => return ToolCallResult::error("Missing arguments".to_string()),
        };

        let video_id = match args.get("videoId").and_then(|v| v.as_str()) {
            Some(id) => id.to_string(),
            None => return ToolCallResult::error("Missing 'videoId' argument".to_string()),
        };
        let segment_count = arg_usize(&args, "segmentCount").unwrap_or(4);

        match self.service.segment_transcript(&video_id, segment_count).await {
            Ok(transcript) => render(&transcript),
            Err(e) => tool_failure("Segmentation failed", &e),
        }
    }
}

/// Report a failed tool call, logging missing transcripts at debug only.
fn tool_failure(action: &str, err: &TekstError) -> ToolCallResult {
    if err.is_not_found() {
        debug!("{action}: {err}");
    } else {
        warn!("{action}: {err}");
    }
    ToolCallResult::error(format!("{action}: {err}"))
}

/// Serialize a transcript envelope into the tool's text payload.
fn render(transcript: &crate::transcript::FormattedTranscript) -> ToolCallResult {
    match serde_json::to_string_pretty(transcript) {
        Ok(json) => ToolCallResult::text(json),
        Err(e) => ToolCallResult::error(format!("Serialization failed: {}", e)),
    }
}

/// Read an integer argument, accepting numbers and numeric strings.
///
/// Some MCP clients send every argument as a string; the core only accepts
/// typed values, so the coercion happens here at the boundary.
fn arg_usize(args: &Value, key: &str) -> Option<usize> {
    match args.get(key)? {
        Value::Number(n) => n.as_u64().map(|v| v as usize),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Read a float argument, accepting numbers and numeric strings.
fn arg_f64(args: &Value, key: &str) -> Option<f64> {
    match args.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn arg_bool(args: &Value, key: &str) -> bool {
    match args.get(key) {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => s == "true",
        _ => false,
    }
}

/// Build [`TranscriptOptions`] from normalized tool arguments.
fn options_from_args(args: &Value) -> Result<TranscriptOptions, String> {
    let format = match args.get("format").and_then(|v| v.as_str()) {
        Some(s) => s.parse::<OutputFormat>()?,
        None => OutputFormat::default(),
    };

    let start = arg_f64(args, "startTime");
    let end = arg_f64(args, "endTime");
    let time_range = if start.is_some() || end.is_some() {
        Some(TimeRange { start, end })
    } else {
        None
    };

    let search = match args.get("query").and_then(|v| v.as_str()) {
        Some(query) if !query.trim().is_empty() => Some(SearchOptions {
            query: query.to_string(),
            case_sensitive: arg_bool(args, "caseSensitive"),
            context_lines: arg_usize(args, "contextLines").unwrap_or(0),
        }),
        Some(_) => return Err("'query' must not be empty".to_string()),
        None => None,
    };

    let segment = match args.get("segmentMethod").and_then(|v| v.as_str()) {
        Some(method) => {
            let count = arg_usize(args, "segmentCount")
                .ok_or_else(|| "'segmentCount' is required with 'segmentMethod'".to_string())?;
            Some(SegmentOptions {
                method: method.parse::<SegmentMethod>()?,
                count,
            })
        }
        None => None,
    };

    Ok(TranscriptOptions {
        language: args
            .get("language")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string()),
        time_range,
        search,
        segment,
        format,
        include_metadata: arg_bool(args, "includeMetadata"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_strings_are_coerced() {
        let args = json!({ "segmentCount": "4", "startTime": "12.5" });
        assert_eq!(arg_usize(&args, "segmentCount"), Some(4));
        assert_eq!(arg_f64(&args, "startTime"), Some(12.5));
    }

    #[test]
    fn test_native_numbers_accepted() {
        let args = json!({ "segmentCount": 7, "startTime": 3 });
        assert_eq!(arg_usize(&args, "segmentCount"), Some(7));
        assert_eq!(arg_f64(&args, "startTime"), Some(3.0));
    }

    #[test]
    fn test_options_from_full_args() {
        let args = json!({
            "language": "ko",
            "format": "timestamped",
            "startTime": 10,
            "endTime": "60",
            "query": "hello",
            "contextLines": "2",
            "segmentMethod": "smart",
            "segmentCount": 3,
            "includeMetadata": true
        });
        let options = options_from_args(&args).unwrap();
        assert_eq!(options.language.as_deref(), Some("ko"));
        assert_eq!(options.format, OutputFormat::Timestamped);
        let range = options.time_range.unwrap();
        assert_eq!(range.start, Some(10.0));
        assert_eq!(range.end, Some(60.0));
        let search = options.search.unwrap();
        assert_eq!(search.query, "hello");
        assert_eq!(search.context_lines, 2);
        let segment = options.segment.unwrap();
        assert_eq!(segment.method, SegmentMethod::Smart);
        assert_eq!(segment.count, 3);
        assert!(options.include_metadata);
    }

    #[test]
    fn test_empty_query_rejected() {
        let args = json!({ "query": "  " });
        assert!(options_from_args(&args).is_err());
    }

    #[test]
    fn test_segment_method_without_count_rejected() {
        let args = json!({ "segmentMethod": "equal" });
        assert!(options_from_args(&args).is_err());
    }

    #[test]
    fn test_tool_failure_flags_error() {
        let err = TekstError::NoCaptions {
            video_id: "vid".to_string(),
        };
        let result = tool_failure("Transcript fetch failed", &err);
        assert_eq!(result.is_error, Some(true));
        let ToolContent::Text { text } = &result.content[0];
        assert!(text.starts_with("Transcript fetch failed:"));
        assert!(text.contains("vid"));
    }

    #[test]
    fn test_minimal_args_use_defaults() {
        let options = options_from_args(&json!({})).unwrap();
        assert_eq!(options.format, OutputFormat::Raw);
        assert!(options.time_range.is_none());
        assert!(options.search.is_none());
        assert!(options.segment.is_none());
        assert!(!options.include_metadata);
    }
}
