use std::sync::OnceLock;
use std::time::{Duration, Instant};

use anyhow::Context;
use axum::{
    Router,
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
    routing::get,
};
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};

static OBSERVABILITY_ENABLED: OnceLock<bool> = OnceLock::new();

fn parse_enabled(raw: Option<&str>) -> bool {
    raw.map(|v| !v.eq_ignore_ascii_case("false") && v != "0")
        .unwrap_or(true)
}

/// Check if observability is enabled via OBSERVABILITY_ENABLED env var
pub fn is_observability_enabled() -> bool {
    *OBSERVABILITY_ENABLED
        .get_or_init(|| parse_enabled(std::env::var("OBSERVABILITY_ENABLED").ok().as_deref()))
}

/// Install the Prometheus recorder and spawn its upkeep task.
/// Returns `None` when observability is disabled.
pub fn init_metrics() -> anyhow::Result<Option<PrometheusHandle>> {
    if !is_observability_enabled() {
        return Ok(None);
    }

    let handle = PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full("http_request_duration_seconds".to_string()),
            &[
                0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
            ],
        )
        .context("Failed to set histogram buckets")?
        .install_recorder()
        .context("Failed to install Prometheus recorder")?;

    let upkeep_handle = handle.clone();
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(Duration::from_secs(5)).await;
            upkeep_handle.run_upkeep();
        }
    });

    Ok(Some(handle))
}

/// Metrics middleware to track HTTP requests
pub async fn metrics_middleware(req: Request, next: Next) -> Response {
    if !is_observability_enabled() {
        return next.run(req).await;
    }

    let start = Instant::now();
    let method = req.method().as_str().to_owned();
    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| "unmatched".to_owned());

    gauge!("http_requests_active").increment(1.0);

    let response = next.run(req).await;

    let latency = start.elapsed().as_secs_f64();
    let status = response.status().as_u16().to_string();

    counter!("http_requests_total", "method" => method.clone(), "path" => path.clone(), "status" => status).increment(1);
    histogram!("http_request_duration_seconds", "method" => method, "path" => path).record(latency);

    gauge!("http_requests_active").decrement(1.0);

    response
}

/// Router exposing the Prometheus scrape endpoint
pub fn metrics_app(handle: PrometheusHandle) -> Router {
    Router::new().route("/metrics", get(move || async move { handle.render() }))
}

// Gateway metrics

pub fn track_auth_rejection(reason: &'static str) {
    if !is_observability_enabled() {
        return;
    }
    counter!("auth_rejections_total", "reason" => reason).increment(1);
}

pub fn track_authorization(role: &'static str, permitted: bool) {
    if !is_observability_enabled() {
        return;
    }
    let decision = if permitted { "permitted" } else { "denied" };
    counter!("authorization_decisions_total", "role" => role, "decision" => decision).increment(1);
}

pub fn track_token_issued(role: &'static str) {
    if !is_observability_enabled() {
        return;
    }
    counter!("tokens_issued_total", "role" => role).increment(1);
}

// Business metrics

pub fn track_user_registered(role: &'static str) {
    if !is_observability_enabled() {
        return;
    }
    counter!("users_registered_total", "role" => role).increment(1);
}

pub fn track_user_login_success(role: &'static str) {
    if !is_observability_enabled() {
        return;
    }
    counter!("user_logins_total", "role" => role, "status" => "success").increment(1);
}

pub fn track_user_login_failure() {
    if !is_observability_enabled() {
        return;
    }
    counter!("user_logins_total", "role" => "unknown", "status" => "failure").increment(1);
}

pub fn track_assignment_created() {
    if !is_observability_enabled() {
        return;
    }
    counter!("assignments_created_total").increment(1);
}

pub fn track_submission_received(resubmission: bool) {
    if !is_observability_enabled() {
        return;
    }
    let kind = if resubmission { "resubmission" } else { "new" };
    counter!("submissions_received_total", "kind" => kind).increment(1);
}

pub fn track_submission_graded() {
    if !is_observability_enabled() {
        return;
    }
    counter!("submissions_graded_total").increment(1);
}

pub fn track_file_uploaded(kind: &'static str, bytes: usize) {
    if !is_observability_enabled() {
        return;
    }
    counter!("files_uploaded_total", "kind" => kind).increment(1);
    histogram!("file_upload_bytes", "kind" => kind).record(bytes as f64);
}
