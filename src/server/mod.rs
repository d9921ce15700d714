// Server module entry point
// Binds the listener, installs signal handlers and runs the accept loop

pub mod connection;
pub mod listener;
pub mod signal;

// `loop` is a keyword, so the module is exposed as `server_loop`
#[path = "loop.rs"]
pub mod server_loop;

use std::sync::Arc;

use crate::config::{AppState, Config};
use crate::error::{ConfigError, Result};
use crate::logger;
use crate::storage::BucketRegistry;

// Re-export commonly used items
pub use listener::create_listener;
pub use server_loop::start_server_loop;
pub use signal::ShutdownSignal;

/// Bind the configured address and serve until SIGINT/SIGTERM.
pub async fn run(config: Config, registry: BucketRegistry) -> Result<()> {
    if registry.is_empty() {
        return Err(ConfigError::NoBuckets.into());
    }
    let addr = config.get_socket_addr()?;
    let listener = create_listener(addr)?;
    let mut shutdown = ShutdownSignal::register()?;

    logger::log_server_start(&listener.local_addr()?, &config, &registry);

    let state = Arc::new(AppState::new(config, registry));
    start_server_loop(listener, state, async move { shutdown.recv().await }).await;
    Ok(())
}
