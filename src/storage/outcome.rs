//! Resolution outcome types
//!
//! Every call to `BucketRegistry::resolve` yields exactly one of these.

use std::fmt;

/// Why a `(bucket, key)` pair could not be served
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureReason {
    /// Bucket name is not registered
    NoSuchBucket,
    /// Path is contained and typed correctly but is missing or not a regular file
    NoSuchKey,
    /// Canonical path falls outside the bucket root
    PathEscape,
    /// File name does not end in `.pdf`
    UnsupportedType,
    /// File exists but could not be read
    ReadFailure,
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::NoSuchBucket => "NoSuchBucket",
            Self::NoSuchKey => "NoSuchKey",
            Self::PathEscape => "PathEscape",
            Self::UnsupportedType => "UnsupportedType",
            Self::ReadFailure => "ReadFailure",
        };
        f.write_str(name)
    }
}

/// Result of resolving a single object request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionOutcome {
    Success { data: Vec<u8> },
    Failure {
        reason: FailureReason,
        /// Human-readable detail, surfaced as the error body message
        message: String,
    },
}

impl ResolutionOutcome {
    pub fn failure(reason: FailureReason, message: impl Into<String>) -> Self {
        Self::Failure {
            reason,
            message: message.into(),
        }
    }

    /// Failure reason, or `None` on success
    pub const fn reason(&self) -> Option<FailureReason> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { reason, .. } => Some(*reason),
        }
    }
}
