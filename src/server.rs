//! Ingestion service — stdio transport, JSON-RPC 2.0, newline-delimited.
//!
//! The news-ingestion pipeline spawns the `newsgate` binary and speaks
//! JSON-RPC 2.0 over its stdin/stdout, one request per line. Responses go
//! to stdout; logs go to stderr so the protocol stream stays clean.
//!
//! Protocol flow:
//! 1. Pipeline sends `similarity/score` or `dedup/screen` requests
//! 2. Server responds with scores/verdicts, one response per line
//! 3. Pipeline closes stdin → server exits

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::dedup::{self, DuplicateMatch, DEFAULT_DUPLICATE_THRESHOLD};
use crate::error::{NewsgateError, NewsgateResult};
use crate::similarity::{self, Article, Weights};

/// Maximum size of a single JSON-RPC line (10 MiB).
const MAX_LINE_BYTES: usize = 10 * 1024 * 1024;

// ---------------------------------------------------------------------------
// JSON-RPC 2.0 types
// ---------------------------------------------------------------------------

/// JSON-RPC 2.0 request.
#[derive(Debug, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    pub id: Option<serde_json::Value>,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

/// JSON-RPC 2.0 response.
#[derive(Debug, Serialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

/// JSON-RPC 2.0 error object.
#[derive(Debug, Serialize)]
pub struct JsonRpcError {
    pub code: i64,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

// ---------------------------------------------------------------------------
// Method payloads
// ---------------------------------------------------------------------------

/// Params for `similarity/score`.
#[derive(Debug, Deserialize)]
struct ScoreParams {
    a: Article,
    b: Article,
    /// Overrides the service-level weights for this request.
    #[serde(default)]
    weights: Option<Weights>,
}

/// Result of `similarity/score`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ScoreResult {
    score: f64,
    percent: i64,
    title_similarity: f64,
    content_similarity: f64,
}

/// Params for `dedup/screen`.
#[derive(Debug, Deserialize)]
struct ScreenParams {
    candidate: Article,
    recent: Vec<Article>,
    #[serde(default)]
    threshold: Option<f64>,
    #[serde(default)]
    weights: Option<Weights>,
}

/// Result of `dedup/screen`.
#[derive(Debug, Serialize)]
struct ScreenResult {
    duplicate: bool,
    matches: Vec<DuplicateMatch>,
}

// ---------------------------------------------------------------------------
// Service configuration
// ---------------------------------------------------------------------------

/// Configuration for the ingestion service.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Composite weights used when a request does not supply its own.
    pub weights: Weights,
    /// Duplicate threshold used when a request does not supply its own.
    pub threshold: f64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            weights: Weights::default(),
            threshold: DEFAULT_DUPLICATE_THRESHOLD,
        }
    }
}

impl ServiceConfig {
    /// Build a config from `NEWSGATE_*` environment variables, keeping
    /// defaults for unset ones.
    ///
    /// # Errors
    ///
    /// Returns an error if a set variable does not parse as a finite
    /// float.
    pub fn from_env() -> NewsgateResult<Self> {
        let mut config = Self::default();

        if let Ok(raw) = std::env::var("NEWSGATE_THRESHOLD") {
            config.threshold = parse_finite("NEWSGATE_THRESHOLD", &raw)?;
        }
        if let Ok(raw) = std::env::var("NEWSGATE_TITLE_WEIGHT") {
            config.weights.title = parse_finite("NEWSGATE_TITLE_WEIGHT", &raw)?;
        }
        if let Ok(raw) = std::env::var("NEWSGATE_CONTENT_WEIGHT") {
            config.weights.content = parse_finite("NEWSGATE_CONTENT_WEIGHT", &raw)?;
        }

        Ok(config)
    }
}

fn parse_finite(name: &str, raw: &str) -> NewsgateResult<f64> {
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(NewsgateError::Config {
            name: name.to_owned(),
            value: raw.to_owned(),
        }),
    }
}

// ---------------------------------------------------------------------------
// Service dispatcher
// ---------------------------------------------------------------------------

/// Dispatches JSON-RPC requests to the scoring and screening handlers.
pub struct Service {
    config: ServiceConfig,
}

impl Service {
    /// Create a service with the given configuration.
    pub fn new(config: ServiceConfig) -> Self {
        Self { config }
    }

    /// Handle a single request and produce the response, if any.
    pub fn handle(&self, req: &JsonRpcRequest) -> Option<JsonRpcResponse> {
        match req.method.as_str() {
            "similarity/score" => Some(self.handle_score(req)),
            "dedup/screen" => Some(self.handle_screen(req)),
            "ping" => Some(success_response(req.id.clone(), &serde_json::json!({}))),
            _ => {
                warn!(method = req.method, "unknown method");
                Some(error_response(
                    req.id.clone(),
                    -32601,
                    &format!("method not found: {}", req.method),
                ))
            }
        }
    }

    fn handle_score(&self, req: &JsonRpcRequest) -> JsonRpcResponse {
        let params: ScoreParams = match serde_json::from_value(req.params.clone()) {
            Ok(p) => p,
            Err(e) => {
                return error_response(
                    req.id.clone(),
                    -32602,
                    &format!("invalid similarity/score params: {e}"),
                );
            }
        };

        let weights = params.weights.unwrap_or(self.config.weights);
        let breakdown = similarity::compare(&params.a, &params.b);
        let score = breakdown.composite(weights);
        debug!(score, "scored article pair");

        success_response(
            req.id.clone(),
            &ScoreResult {
                score,
                percent: similarity::to_percent(score),
                title_similarity: breakdown.title,
                content_similarity: breakdown.content,
            },
        )
    }

    fn handle_screen(&self, req: &JsonRpcRequest) -> JsonRpcResponse {
        let params: ScreenParams = match serde_json::from_value(req.params.clone()) {
            Ok(p) => p,
            Err(e) => {
                return error_response(
                    req.id.clone(),
                    -32602,
                    &format!("invalid dedup/screen params: {e}"),
                );
            }
        };

        let threshold = params.threshold.unwrap_or(self.config.threshold);
        let weights = params.weights.unwrap_or(self.config.weights);
        let matches = dedup::screen(&params.candidate, &params.recent, threshold, weights);

        success_response(
            req.id.clone(),
            &ScreenResult {
                duplicate: !matches.is_empty(),
                matches,
            },
        )
    }
}

// ---------------------------------------------------------------------------
// Server main loop
// ---------------------------------------------------------------------------

/// Run the ingestion service on stdin/stdout.
///
/// Reads JSON-RPC 2.0 requests line-by-line from stdin, dispatches to the
/// service, and writes responses to stdout. Exits when stdin is closed.
///
/// # Errors
///
/// Returns an error if stdin/stdout I/O fails fatally.
pub fn run_service(config: ServiceConfig) -> Result<()> {
    info!(
        threshold = config.threshold,
        title_weight = config.weights.title,
        content_weight = config.weights.content,
        "newsgate service starting"
    );

    let service = Service::new(config);
    let stdin = std::io::stdin();
    let mut reader = std::io::BufReader::new(stdin.lock());
    let mut stdout = std::io::stdout().lock();
    let mut line_buf = String::new();

    loop {
        line_buf.clear();
        let bytes_read = read_line_limited(&mut reader, &mut line_buf, MAX_LINE_BYTES)
            .context("failed to read from stdin")?;

        // EOF — pipeline closed stdin, clean exit.
        if bytes_read == 0 {
            info!("stdin closed, shutting down");
            break;
        }

        let trimmed = line_buf.trim();
        if trimmed.is_empty() {
            continue;
        }

        debug!(raw = trimmed, "received request");

        let request: JsonRpcRequest = match serde_json::from_str(trimmed) {
            Ok(r) => r,
            Err(e) => {
                warn!(error = %e, "invalid JSON-RPC request");
                let resp = error_response(None, -32700, &format!("parse error: {e}"));
                write_response(&mut stdout, &resp)?;
                continue;
            }
        };

        // JSON-RPC 2.0 spec: "jsonrpc" MUST be exactly "2.0".
        if request.jsonrpc != "2.0" {
            warn!(
                version = request.jsonrpc,
                "invalid JSON-RPC version (expected \"2.0\")"
            );
            let resp = error_response(
                request.id.clone(),
                -32600,
                &format!(
                    "invalid request: jsonrpc version must be \"2.0\", got \"{}\"",
                    request.jsonrpc
                ),
            );
            write_response(&mut stdout, &resp)?;
            continue;
        }

        // Notifications (no id) don't receive a response.
        let is_notification = request.id.is_none();
        let response = service.handle(&request);

        if is_notification {
            debug!(method = request.method, "notification handled (no response)");
            continue;
        }

        if let Some(resp) = response {
            write_response(&mut stdout, &resp)?;
        }
    }

    info!("newsgate service stopped");
    Ok(())
}

// ---------------------------------------------------------------------------
// Response helpers
// ---------------------------------------------------------------------------

fn success_response(id: Option<serde_json::Value>, result: &impl Serialize) -> JsonRpcResponse {
    match serde_json::to_value(result) {
        Ok(v) => JsonRpcResponse {
            jsonrpc: "2.0".to_owned(),
            id,
            result: Some(v),
            error: None,
        },
        Err(e) => {
            error!(error = %e, "failed to serialize success response");
            JsonRpcResponse {
                jsonrpc: "2.0".to_owned(),
                id,
                result: None,
                error: Some(JsonRpcError {
                    code: -32603,
                    message: format!("internal error: failed to serialize result: {e}"),
                    data: None,
                }),
            }
        }
    }
}

fn error_response(id: Option<serde_json::Value>, code: i64, message: &str) -> JsonRpcResponse {
    JsonRpcResponse {
        jsonrpc: "2.0".to_owned(),
        id,
        result: None,
        error: Some(JsonRpcError {
            code,
            message: message.to_owned(),
            data: None,
        }),
    }
}

/// Write a JSON-RPC response as a single line to stdout.
fn write_response(out: &mut impl Write, resp: &JsonRpcResponse) -> Result<()> {
    let json = serde_json::to_string(resp).context("failed to serialize response")?;
    debug!(response = json, "sending response");
    out.write_all(json.as_bytes())
        .context("failed to write to stdout")?;
    out.write_all(b"\n")
        .context("failed to write newline to stdout")?;
    out.flush().context("failed to flush stdout")?;
    Ok(())
}

/// Read a line from `reader` into `buf`, stopping at newline or `max_bytes`.
///
/// Returns the number of bytes read (0 = EOF). If the line exceeds
/// `max_bytes`, the excess is consumed and discarded, and an error is
/// returned.
fn read_line_limited(
    reader: &mut impl BufRead,
    buf: &mut String,
    max_bytes: usize,
) -> NewsgateResult<usize> {
    // Bytes are accumulated raw and validated as UTF-8 once the full line
    // is in hand: a multi-byte Thai/Korean char can straddle a fill_buf
    // boundary, so per-chunk validation would reject valid input.
    let mut bytes: Vec<u8> = Vec::new();
    loop {
        let available = reader.fill_buf()?;
        if available.is_empty() {
            break; // EOF
        }
        // Find newline position in available data.
        let (consumed, found_newline) = match available.iter().position(|&b| b == b'\n') {
            Some(pos) => (pos + 1, true),
            None => (available.len(), false),
        };
        if bytes.len() + consumed > max_bytes {
            // Consume everything up to the newline (or buffer end) and error out.
            reader.consume(consumed);
            // Keep consuming until we find a newline or EOF.
            if !found_newline {
                loop {
                    let rest = reader.fill_buf()?;
                    if rest.is_empty() {
                        break;
                    }
                    match rest.iter().position(|&b| b == b'\n') {
                        Some(pos) => {
                            reader.consume(pos + 1);
                            break;
                        }
                        None => {
                            let eat = rest.len();
                            reader.consume(eat);
                        }
                    }
                }
            }
            return Err(NewsgateError::Protocol(format!(
                "line exceeds maximum size ({max_bytes} bytes)"
            )));
        }
        bytes.extend_from_slice(&available[..consumed]);
        reader.consume(consumed);
        if found_newline {
            break;
        }
    }

    let total = bytes.len();
    let line = String::from_utf8(bytes)
        .map_err(|_| NewsgateError::Protocol("non-UTF-8 data on stdin".to_owned()))?;
    buf.push_str(&line);
    Ok(total)
}
