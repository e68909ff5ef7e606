use std::error::Error;
use std::fs;

use tempfile::tempdir;

use remon::config::{
    Config, ensure_config, init_config, load_and_validate, load_from_path, validate_config,
};

type TestResult = Result<(), Box<dyn Error>>;

#[test]
fn empty_config_file_gets_documented_defaults() -> TestResult {
    let dir = tempdir()?;
    let path = dir.path().join("Remon.toml");
    fs::write(&path, "")?;

    let cfg = load_from_path(&path)?;

    assert_eq!(cfg.include_paths, vec!["."]);
    assert_eq!(cfg.watch_file_types, vec!["*"]);
    assert_eq!(cfg.delay_ms, 500);
    assert!(cfg.debounce);
    assert!(cfg.notify_on_change);
    assert_eq!(cfg.artifact_path, "./bin/app");
    Ok(())
}

#[test]
fn partial_config_keeps_explicit_values() -> TestResult {
    let dir = tempdir()?;
    let path = dir.path().join("Remon.toml");
    fs::write(
        &path,
        r#"
watch_file_types = ["*.rs"]
delay_ms = 100
debounce = false

[[commands]]
command = "cargo"
args = ["build"]

[[commands]]
command = "./target/debug/app"
"#,
    )?;

    let cfg = load_and_validate(&path)?;

    assert_eq!(cfg.watch_file_types, vec!["*.rs"]);
    assert_eq!(cfg.include_paths, vec!["."]); // normalised, not configured
    assert_eq!(cfg.delay_ms, 100);
    assert!(!cfg.debounce);
    assert_eq!(cfg.build_commands().len(), 1);
    assert_eq!(cfg.run_command().unwrap().command, "./target/debug/app");
    Ok(())
}

#[test]
fn init_writes_a_loadable_default_config() -> TestResult {
    let dir = tempdir()?;
    let path = dir.path().join("Remon.toml");

    init_config(&path, false)?;
    let cfg = load_and_validate(&path)?;

    assert_eq!(cfg.commands.len(), 2);
    assert_eq!(cfg.run_command().unwrap().command, "./bin/app");
    assert_eq!(cfg.pre_commands.len(), 1);
    assert_eq!(cfg.post_commands.len(), 1);
    Ok(())
}

#[test]
fn init_refuses_to_overwrite_without_force() -> TestResult {
    let dir = tempdir()?;
    let path = dir.path().join("Remon.toml");
    fs::write(&path, "delay_ms = 42\n[[commands]]\ncommand = \"true\"\n")?;

    assert!(init_config(&path, false).is_err());
    // Untouched.
    assert_eq!(load_from_path(&path)?.delay_ms, 42);

    init_config(&path, true)?;
    assert_eq!(load_from_path(&path)?.delay_ms, 500);
    Ok(())
}

#[test]
fn init_refuses_a_directory_path() -> TestResult {
    let dir = tempdir()?;
    assert!(init_config(dir.path(), false).is_err());
    assert!(init_config(dir.path(), true).is_err());
    Ok(())
}

#[test]
fn ensure_config_creates_missing_file_then_loads_it() -> TestResult {
    let dir = tempdir()?;
    let path = dir.path().join("Remon.toml");
    assert!(!path.exists());

    let cfg = ensure_config(&path)?;
    assert!(path.exists());
    assert_eq!(cfg.delay_ms, 500);
    Ok(())
}

#[test]
fn validation_rejects_zero_delay_and_empty_commands() -> TestResult {
    let mut cfg = Config::default();
    validate_config(&cfg)?;

    cfg.delay_ms = 0;
    assert!(validate_config(&cfg).is_err());

    let mut cfg = Config::default();
    cfg.commands.clear();
    assert!(validate_config(&cfg).is_err());

    let mut cfg = Config::default();
    cfg.pre_commands[0].command = "  ".to_string();
    assert!(validate_config(&cfg).is_err());
    Ok(())
}
