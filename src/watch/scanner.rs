// src/watch/scanner.rs

use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};

use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use tracing::warn;

use crate::config::Config;

/// Compiled scan filters: which file names qualify and which paths are
/// excluded outright.
///
/// Exclusion is by exact path match (after `./`-prefix normalisation), not
/// prefix match; an excluded directory is simply never descended into, which
/// is what keeps everything beneath it out of the live set.
#[derive(Debug, Clone)]
pub struct WatchFilter {
    types: GlobSet,
    exclude: HashSet<PathBuf>,
}

impl WatchFilter {
    /// Compile file-type patterns and exclude paths.
    ///
    /// Patterns are matched against the file name only, so `"*.go"` matches
    /// `src/a.go` and `"*"` matches every regular file.
    pub fn new(file_types: &[String], exclude_paths: &[String]) -> Result<Self> {
        let mut builder = GlobSetBuilder::new();
        for pattern in file_types {
            let glob = Glob::new(pattern)
                .with_context(|| format!("invalid watch_file_types pattern '{}'", pattern))?;
            builder.add(glob);
        }
        let types = builder.build().context("compiling watch_file_types globs")?;

        let exclude = exclude_paths
            .iter()
            .map(|p| normalize(Path::new(p)))
            .collect();

        Ok(Self { types, exclude })
    }

    pub fn from_config(cfg: &Config) -> Result<Self> {
        Self::new(&cfg.watch_file_types, &cfg.exclude_paths)
    }

    pub fn is_excluded(&self, path: &Path) -> bool {
        self.exclude.contains(&normalize(path))
    }

    pub fn matches_type(&self, path: &Path) -> bool {
        path.file_name()
            .map(|name| self.types.is_match(Path::new(name)))
            .unwrap_or(false)
    }
}

/// Recursively list the files under `root` that pass the filter.
///
/// Directory-read failures are logged and treated as "no contents"; a scan
/// never fails outright.
pub fn scan(root: &Path, filter: &WatchFilter) -> Vec<PathBuf> {
    let mut contents = Vec::new();

    let entries = match std::fs::read_dir(root) {
        Ok(entries) => entries,
        Err(err) => {
            warn!(path = %root.display(), error = %err, "error reading directory");
            return contents;
        }
    };

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!(path = %root.display(), error = %err, "error reading directory entry");
                continue;
            }
        };

        let full_path = root.join(entry.file_name());
        if filter.is_excluded(&full_path) {
            continue;
        }

        if entry.path().is_dir() {
            contents.extend(scan(&full_path, filter));
        } else if filter.matches_type(&full_path) {
            contents.push(full_path);
        }
    }

    contents
}

/// Drop `.` components so `./build` and `build` compare equal.
fn normalize(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}
