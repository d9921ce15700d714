//! HTTP response building module
//!
//! Builders for the object payload and the JSON error envelope.

use super::error_code::ErrorCode;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{ALLOW, CONTENT_LENGTH, CONTENT_TYPE};
use hyper::{Response, StatusCode};
use serde::Serialize;

pub const PDF_CONTENT_TYPE: &str = "application/pdf";
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// `{"error": {"code": ..., "message": ...}}`
#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: ErrorDetail<'a>,
}

#[derive(Debug, Serialize)]
struct ErrorDetail<'a> {
    code: ErrorCode,
    message: &'a str,
}

/// Build 200 response carrying a PDF payload
pub fn build_object_response(data: Vec<u8>) -> Response<Full<Bytes>> {
    let content_length = data.len();

    Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, PDF_CONTENT_TYPE)
        .header(CONTENT_LENGTH, content_length)
        .body(Full::new(Bytes::from(data)))
        .unwrap_or_else(|e| {
            log_build_error("200", &e);
            build_fallback_500()
        })
}

/// Build an error response with the JSON envelope; status follows the code
pub fn build_error_response(code: ErrorCode, message: &str) -> Response<Full<Bytes>> {
    let body = ErrorBody {
        error: ErrorDetail { code, message },
    };
    let json = match serde_json::to_vec(&body) {
        Ok(j) => j,
        Err(e) => {
            crate::logger::log_error(&format!("Failed to serialize error body: {e}"));
            return build_fallback_500();
        }
    };

    Response::builder()
        .status(code.status())
        .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
        .header(CONTENT_LENGTH, json.len())
        .body(Full::new(Bytes::from(json)))
        .unwrap_or_else(|e| {
            log_build_error(code.as_str(), &e);
            build_fallback_500()
        })
}

/// Build 405 Method Not Allowed response
pub fn build_405_response(method: &hyper::Method) -> Response<Full<Bytes>> {
    let mut response = build_error_response(
        ErrorCode::MethodNotAllowed,
        &format!("Method not allowed: {method}; only GET is supported"),
    );
    response
        .headers_mut()
        .insert(ALLOW, hyper::header::HeaderValue::from_static("GET"));
    response
}

/// Last-resort response when a builder fails
fn build_fallback_500() -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(Bytes::from_static(
        br#"{"error":{"code":"InternalError","message":"Internal server error"}}"#,
    )));
    *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
    response
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}
