// src/exec/mod.rs

//! Process execution layer.
//!
//! This module owns everything that touches external processes, using
//! `tokio::process::Command`:
//!
//! - [`supervisor`] tracks the single managed child process and knows how to
//!   kill it and record a replacement.
//! - [`runner`] spawns the configured commands, blocking or not.
//! - [`restart`] sequences kill → clean → pre-hooks → build → relaunch →
//!   post-hooks, consuming triggers from the bounded restart channel.

pub mod restart;
pub mod runner;
pub mod supervisor;

pub use restart::{RestartOrchestrator, RestartRequest, spawn_restart_loop};
pub use supervisor::ProcessSupervisor;
