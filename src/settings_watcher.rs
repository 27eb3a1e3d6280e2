//! Settings file watching
//!
//! Uses the `notify` crate with debouncing to detect edits to the
//! settings file and turn them into configuration-change events for
//! the coordinator. Hosts with their own configuration event source
//! can skip this and call
//! [`ColorizationCoordinator::on_configuration_changed`] directly.
//!
//! [`ColorizationCoordinator::on_configuration_changed`]:
//! crate::coordinator::ColorizationCoordinator::on_configuration_changed

use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver};
use std::time::Duration;

use anyhow::Context;
use notify_debouncer_mini::{new_debouncer, Debouncer};

use crate::settings::{ConfigChange, Settings};

/// Watches the settings file and reports debounced change sets
///
/// Edits are debounced with a 500ms delay to coalesce rapid saves.
pub struct SettingsWatcher {
    /// The debouncer handles watching and event coalescing
    _debouncer: Debouncer<notify::RecommendedWatcher>,
    /// Receiver for debounced events
    rx: Receiver<Result<Vec<notify_debouncer_mini::DebouncedEvent>, notify::Error>>,
    /// Settings file being watched
    path: PathBuf,
    /// Last observed settings, for diffing
    snapshot: Settings,
}

impl SettingsWatcher {
    /// Watch `path` (its parent directory, non-recursively, since the
    /// file itself may be replaced atomically on save).
    pub fn new(path: PathBuf) -> anyhow::Result<Self> {
        let (tx, rx) = mpsc::channel();

        let debounce_duration = Duration::from_millis(500);
        let mut debouncer = new_debouncer(debounce_duration, tx)?;

        let watch_root = path.parent().unwrap_or(Path::new(".")).to_path_buf();
        debouncer
            .watcher()
            .watch(&watch_root, notify::RecursiveMode::NonRecursive)
            .with_context(|| format!("Failed to watch {}", watch_root.display()))?;

        tracing::info!("Watching settings file {}", path.display());

        let snapshot = Settings::load_from(&path);
        Ok(Self {
            _debouncer: debouncer,
            rx,
            path,
            snapshot,
        })
    }

    /// The most recently observed settings
    pub fn settings(&self) -> &Settings {
        &self.snapshot
    }

    /// Poll for a pending settings change (non-blocking).
    ///
    /// Drains queued file events; if any touched the settings file,
    /// reloads it and returns the change set plus the new snapshot.
    /// Returns `None` when nothing relevant changed.
    pub fn poll_change(&mut self) -> Option<(ConfigChange, Settings)> {
        let mut touched = false;

        while let Ok(result) = self.rx.try_recv() {
            match result {
                Ok(events) => {
                    for event in events {
                        if event.path == self.path {
                            touched = true;
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!("Settings watcher error: {:?}", e);
                }
            }
        }

        if !touched {
            return None;
        }

        let newer = Settings::load_from(&self.path);
        let change = self.snapshot.diff(&newer);
        if change.is_empty() {
            tracing::debug!("Settings file touched but contents unchanged");
            return None;
        }

        tracing::info!("Settings changed: {:?}", change);
        self.snapshot = newer.clone();
        Some((change, newer))
    }
}
