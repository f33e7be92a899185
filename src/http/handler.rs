//! Request handling: identifier extraction and verdict mapping.
//!
//! The verdict surfaces as `x-ratelimit-*` headers on every response,
//! with a 200 body for admitted requests and a 429 body for rejected
//! ones. A store failure maps to 503: this deployment fails closed
//! rather than admitting unmetered traffic.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{ConnectInfo, Request, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::FloodgateError;
use crate::ratelimit::{RateLimiter, Verdict};
use crate::store::WindowStore;

/// Body returned when a request is admitted.
///
/// `remaining` is one less than the verdict's: it reports the quota left
/// after the request about to be served.
#[derive(Debug, Serialize)]
struct AdmittedBody {
    ip: String,
    limit: u32,
    remaining: u32,
}

/// Body returned with a 429.
#[derive(Debug, Serialize)]
struct RejectedBody {
    ip: String,
    message: &'static str,
    penalty: i64,
    reset: String,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    message: String,
}

/// Build the service router.
pub fn router<S: WindowStore + 'static>(limiter: Arc<RateLimiter<S>>) -> Router {
    Router::new()
        .route("/", get(check::<S>))
        .with_state(limiter)
}

async fn check<S: WindowStore + 'static>(
    State(limiter): State<Arc<RateLimiter<S>>>,
    request: Request,
) -> Response {
    let connect_info = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .copied();
    let Some(ip) = client_identifier(request.headers(), connect_info) else {
        return error_response(StatusCode::BAD_REQUEST, "client identifier missing");
    };

    let now = Utc::now().timestamp();
    let verdict = match limiter.check(&ip, now).await {
        Ok(verdict) => verdict,
        Err(FloodgateError::InvalidInput(reason)) => {
            return error_response(StatusCode::BAD_REQUEST, &reason);
        }
        Err(err) => {
            warn!(error = %err, "Window store check failed, refusing request");
            return error_response(StatusCode::SERVICE_UNAVAILABLE, "window store unavailable");
        }
    };

    debug!(
        ip = %ip,
        rejected = verdict.rejected,
        remaining = verdict.remaining,
        reset = verdict.reset,
        "Admission decision made"
    );

    if verdict.rejected {
        (
            StatusCode::TOO_MANY_REQUESTS,
            ratelimit_headers(&verdict),
            Json(RejectedBody {
                ip,
                message: "Too Many Requests",
                penalty: limiter.limits().delay_secs,
                reset: human_time(verdict.reset),
            }),
        )
            .into_response()
    } else {
        (
            StatusCode::OK,
            ratelimit_headers(&verdict),
            Json(AdmittedBody {
                ip,
                limit: verdict.limit,
                remaining: verdict.remaining.saturating_sub(1),
            }),
        )
            .into_response()
    }
}

/// Pick the client identifier: the `x-real-ip` header when a proxy set
/// one, else the peer address. Identity across NAT boundaries is an
/// accepted approximation.
fn client_identifier(
    headers: &HeaderMap,
    connect_info: Option<ConnectInfo<SocketAddr>>,
) -> Option<String> {
    if let Some(real_ip) = headers
        .get("x-real-ip")
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
    {
        return Some(real_ip.to_string());
    }
    connect_info.map(|ConnectInfo(addr)| addr.ip().to_string())
}

fn ratelimit_headers(verdict: &Verdict) -> [(&'static str, String); 3] {
    [
        ("x-ratelimit-limit", verdict.limit.to_string()),
        ("x-ratelimit-remaining", verdict.remaining.to_string()),
        ("x-ratelimit-reset", verdict.reset.to_string()),
    ]
}

fn human_time(timestamp: i64) -> String {
    DateTime::from_timestamp(timestamp, 0)
        .map(|time| time.format("%H:%M:%S UTC").to_string())
        .unwrap_or_else(|| timestamp.to_string())
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(ErrorBody {
            message: message.to_string(),
        }),
    )
        .into_response()
}
