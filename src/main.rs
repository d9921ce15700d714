use std::process::ExitCode;

use clap::Parser;
use pdf_bucket_server::cli::Cli;
use pdf_bucket_server::config::Config;
use pdf_bucket_server::error::{Result, ServerError};
use pdf_bucket_server::storage::BucketRegistry;
use pdf_bucket_server::{logger, server};

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("[FATAL] {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let cfg = Config::load(cli)?;
    logger::init(&cfg.logging).map_err(ServerError::Logger)?;

    // Fail fast: every bucket must validate before anything is served
    let registry = BucketRegistry::new(&cfg.buckets)?;
    logger::log_info(&format!("Registered {} bucket(s)", registry.len()));

    // Size the Tokio runtime from the workers setting
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(server::run(cfg, registry))
}
