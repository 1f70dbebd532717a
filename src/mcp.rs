use std::io::{self, BufRead, Write};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::cache::SegmentCache;
use crate::render::{self, Format, Style};

// Sent to the client via the MCP `instructions` field during initialization.
const SERVER_INSTRUCTIONS: &str = "\
highlighter: marks every occurrence of a search term in a block of text.\n\
\n\
highlight: pass `text` and `term`. Matching is case-insensitive unless `case_sensitive` is true; \
matched text keeps the casing it has in `text`. An empty `term` highlights nothing. \
`format` picks the output: html (default, `<mark>` tags), marked (`**` delimiters), ansi, or json \
(the segment list, each `{text, isMatch}`). Overlapping occurrences are matched left to right \
without overlap.";

/// Most segmentations the server keeps memoized.
const CACHE_CAPACITY: usize = 256;
/// Cached segmentations older than this are dropped on the next sweep.
const CACHE_TTL: Duration = Duration::from_secs(300);
/// Requests between TTL sweeps.
const PRUNE_EVERY: usize = 64;

/// JSON-RPC server over stdio.
pub fn run(style: Style) -> io::Result<()> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    let cache = SegmentCache::bounded(CACHE_CAPACITY);
    serve(stdin.lock(), stdout.lock(), &cache, &style)
}

/// Serve newline-delimited requests from `input` until it closes.
pub fn serve(
    input: impl BufRead,
    mut out: impl Write,
    cache: &SegmentCache,
    style: &Style,
) -> io::Result<()> {
    let mut handled = 0usize;
    for line in input.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let req: JsonRpcRequest = match serde_json::from_str(&line) {
            Ok(r) => r,
            Err(e) => {
                warn!("unparsable request: {e}");
                write_error(&mut out, None, -32700, &format!("parse error: {e}"))?;
                continue;
            }
        };

        // Notifications have no id; JSON-RPC says never answer them
        if req.id.is_none() {
            debug!(method = %req.method, "notification dropped");
            continue;
        }

        let response = handle_request(&req, cache, style);
        serde_json::to_writer(&mut out, &response)?;
        out.write_all(b"\n")?;
        out.flush()?;

        handled += 1;
        if handled % PRUNE_EVERY == 0 {
            cache.prune(CACHE_TTL);
            debug!(entries = cache.len(), "cache swept");
        }
    }

    Ok(())
}

#[derive(Deserialize)]
struct JsonRpcRequest {
    #[serde(rename = "jsonrpc")]
    _jsonrpc: String,
    id: Option<Value>,
    method: String,
    #[serde(default)]
    params: Value,
}

#[derive(Serialize)]
struct JsonRpcResponse {
    jsonrpc: &'static str,
    id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<JsonRpcError>,
}

#[derive(Serialize)]
struct JsonRpcError {
    code: i32,
    message: String,
}

impl JsonRpcResponse {
    fn ok(id: Option<Value>, result: Value) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: Some(result),
            error: None,
        }
    }
}

fn handle_request(req: &JsonRpcRequest, cache: &SegmentCache, style: &Style) -> JsonRpcResponse {
    match req.method.as_str() {
        "initialize" => JsonRpcResponse::ok(
            req.id.clone(),
            serde_json::json!({
                "protocolVersion": "2024-11-05",
                "capabilities": {
                    "tools": {}
                },
                "serverInfo": {
                    "name": "highlighter",
                    "version": crate::version()
                },
                "instructions": SERVER_INSTRUCTIONS
            }),
        ),

        "tools/list" => JsonRpcResponse::ok(
            req.id.clone(),
            serde_json::json!({
                "tools": tool_definitions()
            }),
        ),

        "tools/call" => handle_tool_call(req, cache, style),

        "ping" => JsonRpcResponse::ok(req.id.clone(), serde_json::json!({})),

        _ => JsonRpcResponse {
            jsonrpc: "2.0",
            id: req.id.clone(),
            result: None,
            error: Some(JsonRpcError {
                code: -32601,
                message: format!("method not found: {}", req.method),
            }),
        },
    }
}

fn handle_tool_call(req: &JsonRpcRequest, cache: &SegmentCache, style: &Style) -> JsonRpcResponse {
    let params = &req.params;
    let tool_name = params.get("name").and_then(|v| v.as_str()).unwrap_or("");
    let args = params.get("arguments").unwrap_or(&Value::Null);

    let result = match tool_name {
        "highlight" => tool_highlight(args, cache, style),
        _ => Err(format!("unknown tool: {tool_name}")),
    };

    match result {
        Ok(output) => JsonRpcResponse::ok(
            req.id.clone(),
            serde_json::json!({
                "content": [{
                    "type": "text",
                    "text": output
                }]
            }),
        ),
        Err(e) => JsonRpcResponse::ok(
            req.id.clone(),
            serde_json::json!({
                "content": [{
                    "type": "text",
                    "text": e
                }],
                "isError": true
            }),
        ),
    }
}

fn tool_highlight(args: &Value, cache: &SegmentCache, style: &Style) -> Result<String, String> {
    let text = args
        .get("text")
        .and_then(|v| v.as_str())
        .ok_or("missing required parameter: text")?;
    let term = args
        .get("term")
        .and_then(|v| v.as_str())
        .ok_or("missing required parameter: term")?;
    let case_sensitive = args
        .get("case_sensitive")
        .and_then(serde_json::Value::as_bool)
        .unwrap_or(false);
    let format = match args.get("format").and_then(|v| v.as_str()) {
        Some(f) => f.parse::<Format>()?,
        None => Format::Html,
    };

    let spans = cache.get_or_compute(text, term, case_sensitive);
    let segments: Vec<_> = spans.iter().map(|s| s.segment(text)).collect();
    Ok(render::render(&segments, format, style))
}

fn tool_definitions() -> Vec<Value> {
    vec![serde_json::json!({
        "name": "highlight",
        "description": "Mark every non-overlapping occurrence of `term` in `text`. Returns the text with matches wrapped per `format`.",
        "inputSchema": {
            "type": "object",
            "required": ["text", "term"],
            "properties": {
                "text": {
                    "type": "string",
                    "description": "Source text to highlight."
                },
                "term": {
                    "type": "string",
                    "description": "Literal search term. Empty highlights nothing."
                },
                "case_sensitive": {
                    "type": "boolean",
                    "description": "Exact-case matching. Default: false."
                },
                "format": {
                    "type": "string",
                    "enum": ["html", "marked", "ansi", "json"],
                    "description": "Output format. Default: html."
                }
            }
        }
    })]
}

fn write_error(w: &mut impl Write, id: Option<Value>, code: i32, msg: &str) -> io::Result<()> {
    let resp = JsonRpcResponse {
        jsonrpc: "2.0",
        id,
        result: None,
        error: Some(JsonRpcError {
            code,
            message: msg.into(),
        }),
    };
    serde_json::to_writer(&mut *w, &resp)?;
    w.write_all(b"\n")?;
    w.flush()
}
