//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: method check, path parsing,
//! bucket resolution and the outcome-to-response mapping.

use crate::config::AppState;
use crate::http::{self, ErrorCode};
use crate::logger::{self, AccessLogEntry};
use crate::storage::ResolutionOutcome;
use http_body_util::Full;
use hyper::body::{Body as _, Bytes};
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Main entry point for HTTP request handling
///
/// Never fails: every outcome, including internal faults, becomes a response.
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();
    let access_format = state.access_log_format().map(ToString::to_string);
    let mut entry = access_format
        .as_ref()
        .map(|_| AccessLogEntry::from_request(&req, peer_addr));

    let response = if req.method() == Method::GET {
        serve_object(req.uri().path(), &state).await
    } else {
        logger::log_warning(&format!("Method not allowed: {}", req.method()));
        http::build_405_response(req.method())
    };

    if let (Some(entry), Some(format)) = (entry.as_mut(), access_format.as_deref()) {
        entry.status = response.status().as_u16();
        entry.body_bytes = usize::try_from(response.body().size_hint().lower()).unwrap_or(0);
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(entry, format);
    }

    Ok(response)
}

/// Parse the path, resolve it on the blocking pool, map the outcome
async fn serve_object(raw_path: &str, state: &Arc<AppState>) -> Response<Full<Bytes>> {
    let object = match http::parse_object_path(raw_path) {
        Ok(object) => object,
        Err(e) => return http::build_error_response(ErrorCode::InvalidRequest, &e.to_string()),
    };
    logger::log_debug(&format!("Resolving bucket={} key={}", object.bucket, object.key));

    let state = Arc::clone(state);
    let resolved =
        tokio::task::spawn_blocking(move || state.registry.resolve(&object.bucket, &object.key))
            .await;

    match resolved {
        Ok(outcome) => response_for_outcome(outcome),
        Err(e) => {
            logger::log_error(&format!("Resolution task failed for '{raw_path}': {e}"));
            http::build_error_response(
                ErrorCode::InternalError,
                &format!("Internal server error: {e}"),
            )
        }
    }
}

/// Map a resolution outcome onto the wire response
pub fn response_for_outcome(outcome: ResolutionOutcome) -> Response<Full<Bytes>> {
    match outcome {
        ResolutionOutcome::Success { data } => http::build_object_response(data),
        ResolutionOutcome::Failure { reason, message } => {
            http::build_error_response(ErrorCode::from(reason), &message)
        }
    }
}
