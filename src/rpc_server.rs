//! SEOForge RPC Server: JSON-RPC over stdin/stdout for the dashboard shell.
//!
//! Protocol: one JSON object per line (newline-delimited JSON).
//! Request:  {"id":1, "method":"content.generate", "params":{"title":"...","keywords":["..."]}}
//! Response: {"id":1, "result":{...}} or {"id":1, "error":"..."}

use std::io::{self, BufRead, Write};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use serde_json::{json, Value};

use seoforge::app::App;
use seoforge::platform;
use seoforge::rpc_handler::handle_method;
use seoforge::services::env_config::{load_dotenv, EnvConfig};

/// Requests accepted per one-second window before callers get
/// `rate limit exceeded`.
const MAX_REQUESTS_PER_SECOND: u32 = 200;

/// Fixed-window rate limiter: max requests per second.
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
        self.check_at(Instant::now())
    }

    fn check_at(&mut self, now: Instant) -> bool {
        if now.saturating_duration_since(self.window_start) >= Duration::from_secs(1) {
            self.window_start = now;
            self.request_count = 0;
        }
        self.request_count += 1;
        self.request_count <= self.max_per_second
    }
}

fn respond(out: &mut impl Write, value: &Value) -> io::Result<()> {
    writeln!(out, "{}", value)?;
    out.flush()
}

fn main() -> Result<()> {
    load_dotenv();
    seoforge::logging::init();

    let env = EnvConfig::from_env();
    for issue in env.validate() {
        tracing::warn!(variable = %issue.variable, level = ?issue.level, "{}", issue.message);
    }

    let db_path = platform::get_database_path();
    let app = App::new(&db_path, None, env)
        .map_err(|e| anyhow::anyhow!("{}", e))
        .with_context(|| format!("failed to open {}", db_path.display()))?;
    let app = Mutex::new(app);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    respond(&mut out, &json!({"event": "ready", "version": env!("CARGO_PKG_VERSION")}))?;
    tracing::info!(db = %db_path.display(), "rpc server ready");

    let mut rate_limiter = RateLimiter::new(MAX_REQUESTS_PER_SECOND);

    for line in io::stdin().lock().lines() {
        let Ok(line) = line else { break };
        if line.trim().is_empty() {
            continue;
        }

        let req: Value = match serde_json::from_str(&line) {
            Ok(v) => v,
            Err(e) => {
                respond(&mut out, &json!({"id": null, "error": format!("parse error: {}", e)}))?;
                continue;
            }
        };

        let id = req.get("id").cloned().unwrap_or(Value::Null);

        if !rate_limiter.check() {
            respond(&mut out, &json!({"id": id, "error": "rate limit exceeded"}))?;
            continue;
        }

        let method = req.get("method").and_then(|v| v.as_str()).unwrap_or("");
        let params = req.get("params").cloned().unwrap_or(json!({}));

        let started = Instant::now();
        let result = runtime.block_on(handle_method(&app, method, &params));
        tracing::debug!(method, elapsed_ms = started.elapsed().as_millis() as u64, ok = result.is_ok(), "rpc call");

        let response = match result {
            Ok(val) => json!({"id": id, "result": val}),
            Err(err) => json!({"id": id, "error": err}),
        };
        respond(&mut out, &response)?;
    }

    tracing::info!("stdin closed, shutting down");
    Ok(())
}
