use std::error::Error;
use std::path::Path;
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

use tempfile::tempdir;
use tokio::process::Command;
use tokio::sync::Mutex;

use remon::config::{CommandSpec, Config};
use remon::exec::{ProcessSupervisor, RestartOrchestrator};

type TestResult = Result<(), Box<dyn Error>>;

fn spawn_sleeper() -> Result<tokio::process::Child, Box<dyn Error>> {
    Ok(Command::new("sleep")
        .arg("30")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .kill_on_drop(true)
        .spawn()?)
}

fn sh(script: String) -> CommandSpec {
    CommandSpec {
        command: "sh".to_string(),
        args: vec!["-c".to_string(), script],
    }
}

/// Config whose build writes a marker file and whose run command idles.
fn restart_config(dir: &Path) -> Config {
    let artifact = dir.join("app");
    Config {
        commands: vec![
            sh(format!("echo built > {}", artifact.display())),
            CommandSpec::new("sleep", &["30"]),
        ],
        pre_commands: vec![],
        post_commands: vec![],
        settle_delay_ms: 0,
        artifact_path: artifact.display().to_string(),
        ..Config::default()
    }
}

#[tokio::test]
async fn kill_current_is_a_noop_when_nothing_is_tracked() -> TestResult {
    let mut supervisor = ProcessSupervisor::new();
    assert!(!supervisor.is_running());
    supervisor.kill_current().await?;
    supervisor.kill_current().await?;
    Ok(())
}

#[tokio::test]
async fn track_then_kill_clears_the_handle() -> TestResult {
    let mut supervisor = ProcessSupervisor::new();
    supervisor.track_new(spawn_sleeper()?);
    assert!(supervisor.is_running());
    assert!(supervisor.current_pid().is_some());

    supervisor.kill_current().await?;
    assert!(!supervisor.is_running());
    assert!(supervisor.current_pid().is_none());
    Ok(())
}

#[tokio::test]
async fn kill_current_tolerates_an_already_exited_process() -> TestResult {
    let mut supervisor = ProcessSupervisor::new();
    let child = Command::new("true").kill_on_drop(true).spawn()?;
    supervisor.track_new(child);

    // Give the process time to exit on its own.
    tokio::time::sleep(Duration::from_millis(300)).await;

    supervisor.kill_current().await?;
    assert!(!supervisor.is_running());
    Ok(())
}

#[tokio::test]
async fn restart_builds_artifact_and_tracks_the_run_command() -> TestResult {
    let dir = tempdir()?;
    let cfg = restart_config(dir.path());
    let artifact = dir.path().join("app");

    let supervisor = Arc::new(Mutex::new(ProcessSupervisor::new()));
    let orchestrator = RestartOrchestrator::new(Arc::new(cfg), Arc::clone(&supervisor));

    orchestrator.restart().await?;

    assert!(artifact.exists());
    let pid_first = supervisor.lock().await.current_pid();
    assert!(pid_first.is_some());

    // A second qualifying edit kills that exact process and relaunches.
    orchestrator.restart().await?;

    assert!(artifact.exists());
    let pid_second = supervisor.lock().await.current_pid();
    assert!(pid_second.is_some());
    assert_ne!(pid_first, pid_second);

    supervisor.lock().await.kill_current().await?;
    Ok(())
}

#[tokio::test]
async fn failed_pre_command_does_not_abort_the_sequence() -> TestResult {
    let dir = tempdir()?;
    let mut cfg = restart_config(dir.path());
    cfg.pre_commands = vec![CommandSpec::new("false", &[])];

    let supervisor = Arc::new(Mutex::new(ProcessSupervisor::new()));
    let orchestrator = RestartOrchestrator::new(Arc::new(cfg), Arc::clone(&supervisor));

    orchestrator.restart().await?;

    assert!(dir.path().join("app").exists());
    assert!(supervisor.lock().await.is_running());

    supervisor.lock().await.kill_current().await?;
    Ok(())
}

#[tokio::test]
async fn artifact_removal_failure_aborts_the_remaining_steps() -> TestResult {
    let dir = tempdir()?;
    let mut cfg = restart_config(dir.path());

    // A non-empty directory at the artifact path cannot be remove_file'd.
    let blocked = dir.path().join("blocked");
    std::fs::create_dir(&blocked)?;
    std::fs::write(blocked.join("keep"), "x")?;
    cfg.artifact_path = blocked.display().to_string();

    let marker = dir.path().join("marker");
    cfg.commands = vec![
        sh(format!("echo built > {}", marker.display())),
        CommandSpec::new("sleep", &["30"]),
    ];

    let supervisor = Arc::new(Mutex::new(ProcessSupervisor::new()));
    let orchestrator = RestartOrchestrator::new(Arc::new(cfg), Arc::clone(&supervisor));

    assert!(orchestrator.restart().await.is_err());

    // Neither the build nor the relaunch ran.
    assert!(!marker.exists());
    assert!(!supervisor.lock().await.is_running());
    Ok(())
}

#[tokio::test]
async fn run_command_spawn_failure_leaves_nothing_registered() -> TestResult {
    let dir = tempdir()?;
    let mut cfg = restart_config(dir.path());
    cfg.commands = vec![CommandSpec::new("/nonexistent/remon-test-bin", &[])];

    let supervisor = Arc::new(Mutex::new(ProcessSupervisor::new()));
    let orchestrator = RestartOrchestrator::new(Arc::new(cfg), Arc::clone(&supervisor));

    orchestrator.restart().await?;
    assert!(!supervisor.lock().await.is_running());
    Ok(())
}
