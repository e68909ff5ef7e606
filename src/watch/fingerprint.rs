// src/watch/fingerprint.rs

use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use blake3::Hasher;
use tracing::debug;

/// Compute the blake3 hash of a file's full byte stream, as a hex string.
///
/// Unreadable files produce the empty sentinel hash instead of an error; the
/// change detector reconciles those as deletions once a stat check confirms
/// the file is actually gone.
pub fn fingerprint_file(path: &Path) -> String {
    let mut file = match File::open(path) {
        Ok(file) => file,
        Err(_) => return String::new(),
    };

    let mut hasher = Hasher::new();
    let mut buf = [0u8; 8192];
    loop {
        match file.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => {
                hasher.update(&buf[..n]);
            }
            Err(_) => return String::new(),
        }
    }

    hasher.finalize().to_hex().to_string()
}

/// The shared path → last-seen-hash mapping: the ground truth for change
/// detection.
///
/// One instance lives for the whole watch session and is shared by every
/// change-detector task, so the map sits behind a mutex. No lock is ever
/// held across an await point.
#[derive(Debug, Default)]
pub struct FingerprintStore {
    inner: Mutex<HashMap<PathBuf, String>>,
}

impl FingerprintStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last-seen hash for `path`, if tracked.
    pub fn get(&self, path: &Path) -> Option<String> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner()).get(path).cloned()
    }

    /// Record the latest hash for `path`.
    pub fn insert(&self, path: PathBuf, hash: String) {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(path, hash);
    }

    /// Stop tracking `path`. Returns true if it was tracked.
    pub fn remove(&self, path: &Path) -> bool {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(path)
            .is_some()
    }

    /// Remove and return every tracked path not present in `checked`.
    ///
    /// This is the end-of-cycle sweep that catches files deleted between
    /// polls.
    pub fn sweep_unchecked(&self, checked: &HashSet<PathBuf>) -> Vec<PathBuf> {
        let mut map = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        let stale: Vec<PathBuf> = map
            .keys()
            .filter(|path| !checked.contains(*path))
            .cloned()
            .collect();
        for path in &stale {
            map.remove(path);
            debug!(path = %path.display(), "swept missing file from fingerprint store");
        }
        stale
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
