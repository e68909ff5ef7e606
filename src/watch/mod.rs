// src/watch/mod.rs

//! File watching and change detection.
//!
//! This module is responsible for:
//! - Recursively scanning watch paths with file-type and exclude filters.
//! - Content hashing (blake3) and the shared fingerprint store.
//! - The per-watch-path polling loop that classifies changes as
//!   Created/Edited/Deleted and fires restart triggers on edits.
//!
//! It does **not** run any commands itself; it only turns filesystem changes
//! into restart requests for the exec layer.

pub mod detector;
pub mod fingerprint;
pub mod scanner;

pub use detector::{ChangeDetector, ChangeKind, ChangeRecord};
pub use fingerprint::{FingerprintStore, fingerprint_file};
pub use scanner::{WatchFilter, scan};
