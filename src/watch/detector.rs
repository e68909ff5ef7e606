// src/watch/detector.rs

use std::collections::HashSet;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::exec::restart::RestartRequest;
use crate::watch::fingerprint::{FingerprintStore, fingerprint_file};
use crate::watch::scanner::{WatchFilter, scan};

/// How a path changed relative to the previous poll cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ChangeKind {
    Created,
    Edited,
    Deleted,
}

/// One classified change, produced transiently each poll cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangeRecord {
    pub path: PathBuf,
    pub status: ChangeKind,
}

/// Per-watch-path polling loop.
///
/// One detector runs as an independent tokio task per configured include
/// path. All detectors share the one [`FingerprintStore`] and feed the one
/// bounded restart channel; a full channel means a restart is already
/// pending, so the trigger is collapsed rather than queued.
pub struct ChangeDetector {
    watch_path: PathBuf,
    filter: WatchFilter,
    store: Arc<FingerprintStore>,
    restart_tx: mpsc::Sender<RestartRequest>,
    delay: Duration,
    debounce: bool,
    notify_on_change: bool,
}

impl ChangeDetector {
    pub fn new(
        watch_path: PathBuf,
        filter: WatchFilter,
        store: Arc<FingerprintStore>,
        restart_tx: mpsc::Sender<RestartRequest>,
        cfg: &Config,
    ) -> Self {
        Self {
            watch_path,
            filter,
            store,
            restart_tx,
            delay: Duration::from_millis(cfg.delay_ms),
            debounce: cfg.debounce,
            notify_on_change: cfg.notify_on_change,
        }
    }

    /// Run one scan/hash/diff cycle against the shared store.
    ///
    /// Classification per live path: not in store ⇒ Created, hash differs ⇒
    /// Edited, same hash ⇒ no record. Tracked paths that were not seen this
    /// cycle are swept from the store as Deleted.
    pub fn poll_once(&self) -> Vec<ChangeRecord> {
        let mut records = Vec::new();
        let mut checked: HashSet<PathBuf> = HashSet::new();

        for path in scan(&self.watch_path, &self.filter) {
            let hash = fingerprint_file(&path);

            // The file can vanish between the scan and here; reconcile as a
            // deletion immediately instead of tracking the empty sentinel.
            if let Err(err) = std::fs::metadata(&path) {
                if err.kind() == ErrorKind::NotFound {
                    records.push(ChangeRecord {
                        path: path.clone(),
                        status: ChangeKind::Deleted,
                    });
                    self.store.remove(&path);
                } else {
                    warn!(path = %path.display(), error = %err, "error reading file");
                }
                continue;
            }

            match self.store.get(&path) {
                None => records.push(ChangeRecord {
                    path: path.clone(),
                    status: ChangeKind::Created,
                }),
                Some(previous) if previous != hash => records.push(ChangeRecord {
                    path: path.clone(),
                    status: ChangeKind::Edited,
                }),
                Some(_) => {}
            }

            self.store.insert(path.clone(), hash);
            checked.insert(path);
        }

        for stale in self.store.sweep_unchecked(&checked) {
            records.push(ChangeRecord {
                path: stale,
                status: ChangeKind::Deleted,
            });
        }

        records
    }

    /// Turn this cycle's records into restart triggers.
    ///
    /// Only Edited records trigger; Created/Deleted are informational. With
    /// `debounce` on (the default) the first Edited record stands in for the
    /// whole cycle. Either way a full restart channel collapses the trigger:
    /// at most one restart is ever pending.
    pub fn dispatch_restarts(&self, records: &[ChangeRecord]) {
        let edited = records
            .iter()
            .filter(|r| r.status == ChangeKind::Edited);

        for record in edited {
            self.request_restart(record);
            if self.debounce {
                break;
            }
        }
    }

    fn request_restart(&self, record: &ChangeRecord) {
        let request = RestartRequest {
            path: record.path.clone(),
        };
        match self.restart_tx.try_send(request) {
            Ok(()) => {
                info!(path = %record.path.display(), "edit detected; restart requested");
            }
            Err(TrySendError::Full(_)) => {
                debug!(
                    path = %record.path.display(),
                    "restart already pending; collapsing trigger"
                );
            }
            Err(TrySendError::Closed(_)) => {
                warn!("restart channel closed; dropping trigger");
            }
        }
    }

    /// The detector task body: poll, report, trigger, sleep, forever.
    ///
    /// Only returns if the restart channel has closed underneath us, which
    /// under normal operation never happens.
    pub async fn run(self) {
        println!("Starting watcher for: {}", self.watch_path.display());
        info!(path = %self.watch_path.display(), "change detector started");

        loop {
            let records = self.poll_once();

            if !records.is_empty() && self.notify_on_change {
                match serde_json::to_string_pretty(&records) {
                    Ok(json) => println!("Modified files: {json}"),
                    Err(err) => warn!(error = %err, "failed to serialise change records"),
                }
            }

            self.dispatch_restarts(&records);

            tokio::time::sleep(self.delay).await;
        }
    }
}
