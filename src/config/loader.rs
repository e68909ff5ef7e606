// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use tracing::info;

use crate::config::model::Config;
use crate::config::validate::validate_config;

/// Load a configuration file from a given path and return the raw `Config`.
///
/// This only performs TOML deserialization and empty-list normalisation; it
/// does **not** perform semantic validation. Use [`load_and_validate`] for
/// that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<Config> {
    let path = path.as_ref();
    let contents =
        fs::read_to_string(path).with_context(|| format!("reading config file at {:?}", path))?;

    let mut config: Config = toml::from_str(&contents)
        .with_context(|| format!("parsing TOML config from {:?}", path))?;
    config.apply_defaults();

    Ok(config)
}

/// Load a configuration file from path and run basic validation.
///
/// Configuration errors are fatal at load time; nothing malformed reaches
/// the watch loop.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<Config> {
    let config = load_from_path(&path)?;
    validate_config(&config)?;
    Ok(config)
}

/// Load the config at `path`, writing the default config there first if no
/// file exists yet.
///
/// This is the `watch` entry point behaviour: a missing config is not an
/// error, it just gets created.
pub fn ensure_config(path: impl AsRef<Path>) -> Result<Config> {
    let path = path.as_ref();
    if !path.exists() {
        write_default_config(path)?;
    }
    load_and_validate(path)
}

/// The `init` subcommand: write the default config file.
///
/// Refuses to overwrite an existing file unless `force` is set, and refuses
/// a config path that points at a directory.
pub fn init_config(path: impl AsRef<Path>, force: bool) -> Result<()> {
    let path = path.as_ref();

    match fs::metadata(path) {
        Ok(meta) if meta.is_dir() => {
            return Err(anyhow!("config path {:?} is a directory", path));
        }
        Ok(_) if !force => {
            return Err(anyhow!(
                "config file {:?} already exists; use --force to overwrite",
                path
            ));
        }
        _ => {}
    }

    write_default_config(path)
}

fn write_default_config(path: &Path) -> Result<()> {
    let rendered = toml::to_string_pretty(&Config::default())
        .context("serialising default configuration")?;
    fs::write(path, rendered)
        .with_context(|| format!("writing default config file at {:?}", path))?;
    info!(path = %path.display(), "default configuration file created");
    println!("Default configuration file created: {}", path.display());
    Ok(())
}

/// Default config path: `Remon.toml` in the current working directory.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("Remon.toml")
}
