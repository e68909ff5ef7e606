// src/exec/runner.rs

use std::process::{ExitStatus, Stdio};

use anyhow::{Context, Result};
use tokio::process::{Child, Command};
use tracing::info;

use crate::config::CommandSpec;

/// Run a command synchronously to completion.
///
/// The child inherits our stdout/stderr so its output lands in front of the
/// operator unmodified.
pub async fn run_to_completion(spec: &CommandSpec) -> Result<ExitStatus> {
    info!(cmd = %spec.display(), "running command");

    let status = Command::new(&spec.command)
        .args(&spec.args)
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .await
        .with_context(|| format!("running command '{}'", spec.display()))?;

    info!(
        cmd = %spec.display(),
        exit_code = status.code().unwrap_or(-1),
        success = status.success(),
        "command exited"
    );

    Ok(status)
}

/// Launch the managed run command without waiting for it.
///
/// The returned handle is what the supervisor tracks until the next restart.
/// `kill_on_drop` backstops the case where the handle is dropped without an
/// explicit kill.
pub fn spawn_managed(spec: &CommandSpec) -> Result<Child> {
    info!(cmd = %spec.display(), "launching managed process");

    let child = Command::new(&spec.command)
        .args(&spec.args)
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .kill_on_drop(true)
        .spawn()
        .with_context(|| format!("launching managed process '{}'", spec.display()))?;

    Ok(child)
}
