// src/lib.rs

pub mod cli;
pub mod config;
pub mod exec;
pub mod logging;
pub mod watch;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use tokio::sync::{Mutex, mpsc};
use tracing::info;

use crate::cli::{CliArgs, Command};
use crate::config::Config;
use crate::exec::restart::{RestartOrchestrator, RestartRequest, spawn_restart_loop};
use crate::exec::supervisor::ProcessSupervisor;
use crate::watch::detector::ChangeDetector;
use crate::watch::fingerprint::FingerprintStore;
use crate::watch::scanner::WatchFilter;

/// High-level entry point used by `main.rs`.
///
/// Dispatches the subcommand:
/// - `init` writes the default config file
/// - `watch` loads (or creates) the config and runs the watch session
pub async fn run(args: CliArgs) -> Result<()> {
    let config_path = PathBuf::from(&args.config);

    match args.command {
        Command::Init { force } => {
            logging::init_logging(args.log_level, None)?;
            config::loader::init_config(&config_path, force)
        }
        Command::Watch => {
            let cfg = config::loader::ensure_config(&config_path)?;
            logging::init_logging(args.log_level, Some(&cfg.log_level))?;
            watch(cfg).await
        }
    }
}

/// Run a watch session until the process is terminated.
///
/// This wires together:
/// - the shared fingerprint store
/// - the single process supervisor behind an async mutex
/// - the bounded restart channel and its consumer loop
/// - one change-detector task per include path
///
/// The detector tasks never complete under normal operation; the session
/// ends only with the process (e.g. on interrupt). There is deliberately no
/// graceful-shutdown machinery stopping in-flight children beyond
/// `kill_on_drop` on the managed handle.
pub async fn watch(cfg: Config) -> Result<()> {
    let cfg = Arc::new(cfg);
    let filter = WatchFilter::from_config(&cfg)?;

    let store = Arc::new(FingerprintStore::new());
    let supervisor = Arc::new(Mutex::new(ProcessSupervisor::new()));

    // Capacity 1: overlapping edit triggers collapse into one pending restart.
    let (restart_tx, restart_rx) = mpsc::channel::<RestartRequest>(1);

    let orchestrator = RestartOrchestrator::new(Arc::clone(&cfg), supervisor);
    let _restart_loop = spawn_restart_loop(orchestrator, restart_rx);

    info!(
        paths = ?cfg.include_paths,
        delay_ms = cfg.delay_ms,
        "starting watch session"
    );

    let mut handles = Vec::new();
    for include_path in &cfg.include_paths {
        if include_path.is_empty() {
            continue;
        }
        let detector = ChangeDetector::new(
            PathBuf::from(include_path),
            filter.clone(),
            Arc::clone(&store),
            restart_tx.clone(),
            &cfg,
        );
        handles.push(tokio::spawn(detector.run()));
    }

    for handle in handles {
        handle.await?;
    }

    Ok(())
}
