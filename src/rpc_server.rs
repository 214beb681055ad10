//! Linkshelf RPC Server: JSON-RPC over stdin/stdout.
//!
//! Protocol: one JSON object per line (newline-delimited JSON).
//! Request:  {"id":1, "method":"collection.contents", "params":{"collectionId":"..."}, "token":"..."}
//! Response: {"id":1, "result":{...}} or {"id":1, "error":"..."}
//!
//! A request is authenticated when its `token` equals `LINKSHELF_SESSION_TOKEN`.
//! Logs go to stderr; stdout carries only protocol lines.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Instant;

use linkshelf::app::App;
use linkshelf::platform;
use linkshelf::rpc_handler::handle_method;
use linkshelf::types::session::StaticSession;

use serde_json::{json, Value};
use tracing_subscriber::EnvFilter;

/// Fixed-window limiter: max requests per second.
struct RateLimiter {
    window_start: Instant,
    request_count: u32,
    max_per_second: u32,
}

impl RateLimiter {
    fn new(max_per_second: u32) -> Self {
        Self { window_start: Instant::now(), request_count: 0, max_per_second }
    }

    /// Returns true if the request is allowed, false if rate-limited.
    fn check(&mut self) -> bool {
        if self.window_start.elapsed().as_secs() >= 1 {
            self.window_start = Instant::now();
            self.request_count = 0;
        }
        self.request_count += 1;
        self.request_count <= self.max_per_second
    }
}

fn database_path() -> PathBuf {
    let dir = match std::env::var("LINKSHELF_DATA_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(_) => platform::get_data_dir(),
    };
    dir.join("linkshelf.db")
}

fn emit(value: &Value) -> io::Result<()> {
    let mut out = io::stdout().lock();
    writeln!(out, "{}", value)?;
    out.flush()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("linkshelf=info")),
        )
        .with_writer(io::stderr)
        .init();

    let db_path = database_path();
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let app = Mutex::new(App::new(&db_path.to_string_lossy(), None)?);
    let expected_token = std::env::var("LINKSHELF_SESSION_TOKEN").ok();
    if expected_token.is_none() {
        tracing::warn!("LINKSHELF_SESSION_TOKEN not set, every request is anonymous");
    }

    let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;

    tracing::info!(db = %db_path.display(), "linkshelf rpc server ready");
    emit(&json!({"event":"ready","version":env!("CARGO_PKG_VERSION")}))?;

    let mut rate_limiter = RateLimiter::new(200);

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(_) => break,
        };
        if line.trim().is_empty() {
            continue;
        }

        let req: Value = match serde_json::from_str(&line) {
            Ok(v) => v,
            Err(e) => {
                emit(&json!({"id":null,"error":format!("parse error: {}",e)}))?;
                continue;
            }
        };

        let id = req.get("id").cloned().unwrap_or(Value::Null);

        if !rate_limiter.check() {
            tracing::warn!("rate limit exceeded");
            emit(&json!({"id": id, "error": "rate limit exceeded"}))?;
            continue;
        }

        let method = req.get("method").and_then(|v| v.as_str()).unwrap_or("");
        let params = req.get("params").cloned().unwrap_or(json!({}));
        let session = StaticSession::from_token(
            expected_token.as_deref(),
            req.get("token").and_then(|v| v.as_str()),
        );

        let result = runtime.block_on(handle_method(&app, &session, method, &params));
        if let Err(e) = &result {
            tracing::debug!(method, error = %e, "request failed");
        }

        let response = match result {
            Ok(val) => json!({"id": id, "result": val}),
            Err(err) => json!({"id": id, "error": err}),
        };
        emit(&response)?;
    }

    Ok(())
}
