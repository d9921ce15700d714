//! S3-style error codes and their HTTP status mapping

use crate::storage::FailureReason;
use hyper::StatusCode;
use serde::Serialize;

/// Error code carried in the JSON error body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorCode {
    InvalidRequest,
    NoSuchBucket,
    NoSuchKey,
    AccessDenied,
    InvalidFileType,
    MethodNotAllowed,
    InternalError,
}

impl ErrorCode {
    pub const fn status(self) -> StatusCode {
        match self {
            Self::InvalidRequest => StatusCode::BAD_REQUEST,
            Self::NoSuchBucket | Self::NoSuchKey => StatusCode::NOT_FOUND,
            Self::AccessDenied | Self::InvalidFileType => StatusCode::FORBIDDEN,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidRequest => "InvalidRequest",
            Self::NoSuchBucket => "NoSuchBucket",
            Self::NoSuchKey => "NoSuchKey",
            Self::AccessDenied => "AccessDenied",
            Self::InvalidFileType => "InvalidFileType",
            Self::MethodNotAllowed => "MethodNotAllowed",
            Self::InternalError => "InternalError",
        }
    }
}

impl From<FailureReason> for ErrorCode {
    fn from(reason: FailureReason) -> Self {
        match reason {
            FailureReason::NoSuchBucket => Self::NoSuchBucket,
            // An unreadable file looks the same as a missing one to callers
            FailureReason::NoSuchKey | FailureReason::ReadFailure => Self::NoSuchKey,
            FailureReason::PathEscape => Self::AccessDenied,
            FailureReason::UnsupportedType => Self::InvalidFileType,
        }
    }
}
