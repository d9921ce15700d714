// Application state module
// Everything a connection task needs, built once before serving

use super::types::Config;
use crate::storage::BucketRegistry;

/// Application state, shared read-only behind an `Arc`
#[derive(Debug)]
pub struct AppState {
    pub config: Config,
    pub registry: BucketRegistry,
}

impl AppState {
    pub const fn new(config: Config, registry: BucketRegistry) -> Self {
        Self { config, registry }
    }

    /// Access log format, or `None` when access logging is off
    pub fn access_log_format(&self) -> Option<&str> {
        self.config
            .logging
            .access_log
            .then_some(self.config.logging.access_log_format.as_str())
    }
}
