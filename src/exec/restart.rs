// src/exec/restart.rs

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::config::{CommandSpec, Config};
use crate::exec::runner::{run_to_completion, spawn_managed};
use crate::exec::supervisor::ProcessSupervisor;

/// A trigger from a change detector: some watched file was edited.
#[derive(Debug, Clone)]
pub struct RestartRequest {
    pub path: PathBuf,
}

/// Sequences the kill → clean → pre-hooks → build → relaunch → post-hooks
/// cycle against the one shared [`ProcessSupervisor`].
///
/// The sequence is best-effort, not transactional: a failed hook or a failed
/// build command is logged and the remaining steps still run. The only hard
/// abort is a failure to remove the previous build artifact, since a stale
/// artifact would make the subsequent "relaunch" a lie.
pub struct RestartOrchestrator {
    config: Arc<Config>,
    supervisor: Arc<Mutex<ProcessSupervisor>>,
}

impl RestartOrchestrator {
    pub fn new(config: Arc<Config>, supervisor: Arc<Mutex<ProcessSupervisor>>) -> Self {
        Self { config, supervisor }
    }

    pub fn supervisor(&self) -> Arc<Mutex<ProcessSupervisor>> {
        Arc::clone(&self.supervisor)
    }

    /// Run one full restart sequence.
    ///
    /// Returns `Err` only when the sequence aborted (artifact removal
    /// failure); per-command failures are logged and swallowed.
    pub async fn restart(&self) -> Result<()> {
        // 1. Kill the old process, then give the OS a moment to let go of
        //    the binary before the rebuild rewrites it.
        {
            let mut supervisor = self.supervisor.lock().await;
            if let Err(err) = supervisor.kill_current().await {
                warn!(error = %err, "failed to kill managed process");
            }
        }
        tokio::time::sleep(Duration::from_millis(self.config.settle_delay_ms)).await;

        // 2. Remove the previous build artifact; failure aborts the rest.
        self.remove_stale_artifact()
            .context("removing previous build artifact")?;

        // 3. Pre-command hooks, in order, best-effort.
        run_hooks(&self.config.pre_commands, "pre-command").await;

        // 4. Build commands, synchronously and in order.
        for spec in self.config.build_commands() {
            match run_to_completion(spec).await {
                Ok(status) if status.success() => self.log_artifact_mtime(),
                Ok(status) => {
                    warn!(
                        cmd = %spec.display(),
                        exit_code = status.code().unwrap_or(-1),
                        "build command failed"
                    );
                }
                Err(err) => {
                    warn!(cmd = %spec.display(), error = %err, "build command error");
                }
            }
        }

        // 5. Relaunch the managed process and hand the handle to the
        //    supervisor. A spawn failure leaves nothing registered.
        if let Some(spec) = self.config.run_command() {
            match spawn_managed(spec) {
                Ok(child) => {
                    let mut supervisor = self.supervisor.lock().await;
                    supervisor.track_new(child);
                }
                Err(err) => {
                    error!(cmd = %spec.display(), error = %err, "failed to launch managed process");
                }
            }
        }

        // 6. Post-command hooks run regardless of the relaunch outcome.
        run_hooks(&self.config.post_commands, "post-command").await;

        Ok(())
    }

    fn remove_stale_artifact(&self) -> Result<()> {
        let artifact = Path::new(&self.config.artifact_path);
        match std::fs::remove_file(artifact) {
            Ok(()) => {
                debug!(path = %artifact.display(), "removed previous build artifact");
                Ok(())
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err)
                .with_context(|| format!("removing build artifact at {:?}", artifact)),
        }
    }

    /// Build-confirmation signal: the artifact's mtime after a successful
    /// build command.
    fn log_artifact_mtime(&self) {
        let artifact = Path::new(&self.config.artifact_path);
        match std::fs::metadata(artifact).and_then(|meta| meta.modified()) {
            Ok(mtime) => {
                info!(path = %artifact.display(), mtime = ?mtime, "build artifact updated");
            }
            Err(err) => {
                warn!(
                    path = %artifact.display(),
                    error = %err,
                    "build succeeded but artifact could not be stat'ed"
                );
            }
        }
    }
}

async fn run_hooks(hooks: &[CommandSpec], kind: &str) {
    for spec in hooks {
        match run_to_completion(spec).await {
            Ok(status) if status.success() => {}
            Ok(status) => {
                warn!(
                    cmd = %spec.display(),
                    exit_code = status.code().unwrap_or(-1),
                    "{kind} failed"
                );
            }
            Err(err) => {
                warn!(cmd = %spec.display(), error = %err, "{kind} error");
            }
        }
    }
}

/// Spawn the background loop that consumes restart requests one at a time.
///
/// The channel is bounded (capacity 1 in the watch session) and detectors
/// use `try_send`, so overlapping Edited events collapse into a single
/// in-flight restart instead of piling up.
pub fn spawn_restart_loop(
    orchestrator: RestartOrchestrator,
    mut restart_rx: mpsc::Receiver<RestartRequest>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!("restart loop started");
        while let Some(request) = restart_rx.recv().await {
            info!(path = %request.path.display(), "restart sequence starting");
            if let Err(err) = orchestrator.restart().await {
                error!(error = %err, "restart sequence aborted");
            }
        }
        debug!("restart loop finished (channel closed)");
    })
}
