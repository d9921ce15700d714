//! Error types
//!
//! Startup errors are fatal and propagate out of `main`. Per-request failures
//! are plain values (see `storage::ResolutionOutcome`) and never reach here.

use std::path::PathBuf;
use thiserror::Error;

/// Bucket registry construction errors
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Bucket directory does not exist: {path} (bucket '{bucket}')")]
    BucketNotFound {
        bucket: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Bucket path is not a directory: {path} (bucket '{bucket}')")]
    NotADirectory { bucket: String, path: PathBuf },

    #[error("Invalid bucket name '{0}': must be non-empty and contain no '/'")]
    InvalidBucketName(String),
}

/// Configuration loading errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid address '{addr}': {source}")]
    InvalidAddress {
        addr: String,
        #[source]
        source: std::net::AddrParseError,
    },

    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),

    #[error("No buckets configured: pass --bucket NAME=PATH or add a [buckets] table")]
    NoBuckets,
}

/// Top-level server error returned from `main`
#[derive(Error, Debug)]
pub enum ServerError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("Logger initialization failed: {0}")]
    Logger(#[source] std::io::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = ServerError> = std::result::Result<T, E>;
