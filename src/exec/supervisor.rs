// src/exec/supervisor.rs

use std::time::Duration;

use anyhow::{Context, Result};
use tokio::process::Child;
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// Upper bound on how long `kill_current` waits for the old process to exit.
/// On timeout the handle is dropped and `kill_on_drop` is the backstop.
const KILL_WAIT: Duration = Duration::from_secs(5);

#[derive(Debug)]
enum ProcessState {
    NotRunning,
    Running(Child),
}

/// Holder of the one managed child process.
///
/// At most one logical instance exists at a time: the restart orchestrator
/// creates a child and hands ownership here via [`track_new`], and the next
/// restart takes it back through [`kill_current`]. Callers share the
/// supervisor behind an async mutex, so the at-most-one invariant holds even
/// with several watch-path tasks triggering concurrently.
///
/// [`track_new`]: ProcessSupervisor::track_new
/// [`kill_current`]: ProcessSupervisor::kill_current
#[derive(Debug, Default)]
pub struct ProcessSupervisor {
    state: ProcessState,
}

impl Default for ProcessState {
    fn default() -> Self {
        ProcessState::NotRunning
    }
}

impl ProcessSupervisor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Kill the managed process if one is running, and wait for it to exit.
    ///
    /// A no-op success when nothing is tracked or the tracked process has
    /// already exited on its own. The wait is bounded by [`KILL_WAIT`]; on
    /// timeout the handle is dropped with a warning rather than hanging the
    /// restart sequence.
    pub async fn kill_current(&mut self) -> Result<()> {
        let state = std::mem::replace(&mut self.state, ProcessState::NotRunning);

        let mut child = match state {
            ProcessState::NotRunning => {
                debug!("no managed process to kill");
                return Ok(());
            }
            ProcessState::Running(child) => child,
        };

        // Non-destructive liveness probe first.
        if let Some(status) = child.try_wait().context("probing managed process liveness")? {
            info!(%status, "managed process already exited");
            return Ok(());
        }

        child.start_kill().context("killing managed process")?;

        match timeout(KILL_WAIT, child.wait()).await {
            Ok(status_res) => {
                let status = status_res.context("waiting for managed process to exit")?;
                info!(%status, "managed process killed");
            }
            Err(_) => {
                warn!(
                    timeout_secs = KILL_WAIT.as_secs(),
                    "timed out waiting for managed process to exit; dropping handle"
                );
            }
        }

        Ok(())
    }

    /// Record `child` as the current managed process.
    ///
    /// Replaces any previous value outright; callers are expected to call
    /// [`kill_current`](Self::kill_current) first.
    pub fn track_new(&mut self, child: Child) {
        if matches!(self.state, ProcessState::Running(_)) {
            warn!("replacing a managed process handle that was never killed");
        }
        self.state = ProcessState::Running(child);
    }

    /// Whether a managed process handle is currently held.
    pub fn is_running(&self) -> bool {
        matches!(self.state, ProcessState::Running(_))
    }

    /// OS pid of the managed process, if one is tracked and still has an id.
    pub fn current_pid(&self) -> Option<u32> {
        match &self.state {
            ProcessState::Running(child) => child.id(),
            ProcessState::NotRunning => None,
        }
    }
}
