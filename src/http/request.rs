//! Object path parsing
//!
//! Splits `/{bucket}/{key}` into its parts after percent-decoding.

use percent_encoding::percent_decode_str;
use thiserror::Error;

/// A request path split into bucket and key, not yet checked against the registry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectPath {
    pub bucket: String,
    /// Decoded key; may contain `/`
    pub key: String,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid S3 path format: expected /{{bucket}}/{{key}}, got {path}")]
pub struct ParseError {
    pub path: String,
}

/// Parse a raw request path into bucket and key.
///
/// The whole path is decoded first, so an encoded `%2F` in either segment
/// acts as a separator. Invalid UTF-8 sequences decode to U+FFFD.
pub fn parse_object_path(raw: &str) -> Result<ObjectPath, ParseError> {
    let decoded = percent_decode_str(raw).decode_utf8_lossy();
    let trimmed = decoded.strip_prefix('/').unwrap_or(&decoded);

    match trimmed.split_once('/') {
        Some((bucket, key)) if !bucket.is_empty() && !key.is_empty() => Ok(ObjectPath {
            bucket: bucket.to_string(),
            key: key.to_string(),
        }),
        _ => Err(ParseError {
            path: raw.to_string(),
        }),
    }
}
