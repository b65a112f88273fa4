use std::time::Instant;

use anyhow::Context;
use axum::{
    extract::{MatchedPath, Request},
    http::HeaderValue,
    middleware::Next,
    response::Response,
};
use tracing::{Instrument, error, info, info_span, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub const REQUEST_ID_HEADER: &str = "x-request-id";

const DEFAULT_LOG_DIR: &str = "storage/logs";

/// Logs every request with a request id, reusing the caller's
/// `x-request-id` when present and echoing it on the response.
pub async fn logging_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().clone();
    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| req.uri().path().to_string());

    let request_id = req
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty() && v.len() <= 128)
        .map(str::to_string)
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    let span = info_span!("request", request_id = %request_id, method = %method, path = %path);

    let mut response = next.run(req).instrument(span.clone()).await;

    let latency_ms = start.elapsed().as_millis() as u64;
    let status = response.status().as_u16();

    span.in_scope(|| match status {
        500..=599 => error!(status, latency_ms, "Server error"),
        400..=499 => warn!(status, latency_ms, "Client error"),
        _ => info!(status, latency_ms, "Request completed"),
    });

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}

/// Default filter when neither `RUST_LOG` nor `LOG_LEVEL` is set.
fn default_directives(level: Option<&str>) -> String {
    let level = level.unwrap_or("info");
    format!(
        "{}={level},eduplatform_auth={level},tower_http=warn,sqlx=warn",
        env!("CARGO_CRATE_NAME")
    )
}

fn console_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = std::env::var("LOG_LEVEL").ok();
        EnvFilter::new(default_directives(level.as_deref()))
    })
}

/// Console output plus daily rolling files under `LOG_DIR`
/// (default `storage/logs`): plain text for errors, JSON for everything at
/// info and above.
///
/// The returned guards flush the file writers and must live until exit.
pub fn init_tracing() -> anyhow::Result<Vec<WorkerGuard>> {
    let log_dir = std::env::var("LOG_DIR").unwrap_or_else(|_| DEFAULT_LOG_DIR.to_string());
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("Failed to create log directory {log_dir}"))?;

    let console_layer = fmt::layer()
        .with_target(false)
        .with_file(true)
        .with_line_number(true)
        .compact()
        .with_filter(console_filter());

    let (error_writer, error_guard) = tracing_appender::non_blocking(RollingFileAppender::new(
        Rotation::DAILY,
        &log_dir,
        "eduplatform.log",
    ));
    let error_layer = fmt::layer()
        .with_writer(error_writer)
        .with_target(false)
        .with_ansi(false)
        .with_filter(EnvFilter::new("error"));

    let (json_writer, json_guard) = tracing_appender::non_blocking(RollingFileAppender::new(
        Rotation::DAILY,
        &log_dir,
        "eduplatform.json",
    ));
    let json_layer = fmt::layer()
        .json()
        .with_writer(json_writer)
        .with_current_span(true)
        .with_span_list(true)
        .with_filter(EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(console_layer)
        .with(error_layer)
        .with(json_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    info!(log_dir = %log_dir, "Tracing initialized");

    Ok(vec![error_guard, json_guard])
}
