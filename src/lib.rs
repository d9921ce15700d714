//! S3-style GET server for PDF files kept in local directories.
//!
//! `GET /{bucket}/{key}` is resolved against a registry of bucket roots.
//! Only `.pdf` files are served, and canonical paths must stay inside the
//! bucket root.

pub mod cli;
pub mod config;
pub mod error;
pub mod handler;
pub mod http;
pub mod logger;
pub mod server;
pub mod storage;
