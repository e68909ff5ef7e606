// src/config/mod.rs

//! Configuration loading and validation for remon.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk, writing a default one when asked (`loader.rs`).
//! - Validate basic invariants like a usable command list (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_config_path, ensure_config, init_config, load_and_validate, load_from_path};
pub use model::{CommandSpec, Config};
pub use validate::validate_config;
