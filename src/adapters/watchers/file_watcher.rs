// SPDX-License-Identifier: MIT OR Apache-2.0

//! File system watcher for configuration file changes.
//!
//! This module provides a watcher that monitors a configuration file for
//! changes and invokes a callback once the file has been quiet for the debounce
//! delay. Editors often write a file in several steps; the debounce turns such a
//! burst into a single reload.

use crate::domain::{ConfigError, Result};
use crate::ports::{ConfigWatcher, WatchCallback};
use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Default debounce delay.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(250);

/// How often the watch thread checks for a stop request.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// File system watcher for a single configuration file.
///
/// The watcher observes the file's parent directory, so the file itself may be
/// missing when watching starts and may be deleted and recreated later.
///
/// # Examples
///
/// ```rust,no_run
/// use layercfg::adapters::FileWatcher;
/// use layercfg::ports::ConfigWatcher;
/// use std::path::Path;
/// use std::sync::Arc;
///
/// # fn main() -> layercfg::domain::Result<()> {
/// let mut watcher = FileWatcher::new("/etc/myapp/config.yaml", None)?;
///
/// watcher.watch(Arc::new(|path: &Path| {
///     println!("Configuration changed: {}", path.display());
/// }))?;
///
/// // Later, stop watching
/// watcher.stop()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct FileWatcher {
    /// Path to the file being watched
    file_path: PathBuf,
    /// Quiet period required before the callback runs
    debounce_delay: Duration,
    /// Internal watcher
    watcher: Option<RecommendedWatcher>,
    /// Thread handle for the watcher thread
    watch_thread: Option<JoinHandle<()>>,
    /// Stop signal sender
    stop_tx: Option<Sender<()>>,
}

impl FileWatcher {
    /// Creates a watcher for `path`.
    ///
    /// Fails if the parent directory does not exist.
    pub fn new(path: impl AsRef<Path>, debounce_delay: Option<Duration>) -> Result<Self> {
        let file_path = path.as_ref().to_path_buf();

        match file_path.parent() {
            Some(parent) if parent.as_os_str().is_empty() || parent.is_dir() => {}
            _ => {
                return Err(ConfigError::WatcherError {
                    message: format!(
                        "Directory of the watched file does not exist: {}",
                        file_path.display()
                    ),
                    source: None,
                })
            }
        }

        Ok(Self {
            file_path,
            debounce_delay: debounce_delay.unwrap_or(DEFAULT_DEBOUNCE),
            watcher: None,
            watch_thread: None,
            stop_tx: None,
        })
    }

    /// The debounce delay in use.
    pub fn debounce_delay(&self) -> Duration {
        self.debounce_delay
    }

    /// Returns `true` while the watcher is running.
    pub fn is_watching(&self) -> bool {
        self.watcher.is_some()
    }

    fn watch_dir(&self) -> PathBuf {
        match self.file_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }
}

fn concerns(event: &Event, file_name: Option<&std::ffi::OsStr>) -> bool {
    event
        .paths
        .iter()
        .any(|path| path.file_name().is_some() && path.file_name() == file_name)
}

impl ConfigWatcher for FileWatcher {
    fn watch(&mut self, callback: WatchCallback) -> Result<()> {
        if self.watcher.is_some() {
            return Err(ConfigError::WatcherError {
                message: "Watcher is already running".to_string(),
                source: None,
            });
        }

        let (event_tx, event_rx) = channel::<notify::Result<Event>>();
        let (stop_tx, stop_rx) = channel::<()>();

        let mut watcher =
            RecommendedWatcher::new(event_tx, notify::Config::default()).map_err(|e| {
                ConfigError::WatcherError {
                    message: format!("Failed to create file watcher: {}", e),
                    source: Some(Box::new(e)),
                }
            })?;

        // Watch the parent directory; watching the file directly loses track of
        // it when editors replace the file.
        watcher
            .watch(&self.watch_dir(), RecursiveMode::NonRecursive)
            .map_err(|e| ConfigError::WatcherError {
                message: format!("Failed to start watching: {}", e),
                source: Some(Box::new(e)),
            })?;

        let file_path = self.file_path.clone();
        let debounce_delay = self.debounce_delay;

        let watch_thread = thread::Builder::new()
            .name("layercfg-file-watcher".to_string())
            .spawn(move || {
                let file_name = file_path.file_name();
                let mut pending: Option<Instant> = None;

                loop {
                    if stop_rx.try_recv().is_ok() {
                        break;
                    }

                    match event_rx.recv_timeout(POLL_INTERVAL) {
                        Ok(Ok(event)) if concerns(&event, file_name) => {
                            pending = Some(Instant::now() + debounce_delay);
                        }
                        Ok(Ok(_)) => {}
                        Ok(Err(e)) => tracing::warn!("File watch error for {}: {}", file_path.display(), e),
                        Err(RecvTimeoutError::Timeout) => {}
                        Err(RecvTimeoutError::Disconnected) => break,
                    }

                    if pending.is_some_and(|deadline| Instant::now() >= deadline) {
                        pending = None;
                        tracing::debug!("Detected change in {}", file_path.display());
                        callback(&file_path);
                    }
                }
            })
            .map_err(ConfigError::IoError)?;

        self.watcher = Some(watcher);
        self.stop_tx = Some(stop_tx);
        self.watch_thread = Some(watch_thread);

        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        // Send stop signal
        if let Some(stop_tx) = self.stop_tx.take() {
            let _ = stop_tx.send(());
        }

        // Drop the watcher so its event channel disconnects
        self.watcher = None;

        if let Some(handle) = self.watch_thread.take() {
            // The last owner may be dropped from inside the callback.
            if handle.thread().id() == thread::current().id() {
                return Ok(());
            }
            handle.join().map_err(|_| ConfigError::WatcherError {
                message: "Failed to join watcher thread".to_string(),
                source: None,
            })?;
        }

        Ok(())
    }
}

impl Drop for FileWatcher {
    fn drop(&mut self) {
        let _ = self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tempfile::TempDir;

    #[test]
    fn test_file_watcher_new() {
        let dir = TempDir::new().unwrap();
        let watcher = FileWatcher::new(dir.path().join("missing-yet.yaml"), None);
        assert!(watcher.is_ok());
    }

    #[test]
    fn test_file_watcher_missing_directory() {
        let watcher = FileWatcher::new("/nonexistent/path/to/file.yaml", None);
        assert!(watcher.is_err());
    }

    #[test]
    fn test_file_watcher_watch_and_stop() {
        let dir = TempDir::new().unwrap();
        let mut watcher = FileWatcher::new(dir.path().join("app.yaml"), None).unwrap();

        assert!(watcher.watch(Arc::new(|_: &Path| {})).is_ok());
        assert!(watcher.is_watching());
        assert!(watcher.stop().is_ok());
        assert!(!watcher.is_watching());
    }

    #[test]
    fn test_file_watcher_double_watch() {
        let dir = TempDir::new().unwrap();
        let mut watcher = FileWatcher::new(dir.path().join("app.yaml"), None).unwrap();
        let callback: WatchCallback = Arc::new(|_: &Path| {});

        assert!(watcher.watch(Arc::clone(&callback)).is_ok());
        assert!(watcher.watch(callback).is_err());

        watcher.stop().unwrap();
    }

    #[test]
    fn test_file_watcher_debounces_bursts() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("app.yaml");
        fs::write(&path, "a: 1").unwrap();

        let mut watcher = FileWatcher::new(&path, Some(Duration::from_millis(200))).unwrap();
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);
        watcher
            .watch(Arc::new(move |_: &Path| {
                counter.fetch_add(1, Ordering::SeqCst);
            }))
            .unwrap();

        thread::sleep(Duration::from_millis(100));
        for i in 0..3 {
            fs::write(&path, format!("a: {}", i)).unwrap();
        }
        thread::sleep(Duration::from_millis(800));
        watcher.stop().unwrap();

        // File system notification timing varies between platforms; a burst
        // must never produce more than one callback per quiet period.
        assert!(hits.load(Ordering::SeqCst) <= 1);
    }

    #[test]
    fn test_file_watcher_custom_debounce() {
        let dir = TempDir::new().unwrap();
        let watcher =
            FileWatcher::new(dir.path().join("app.yaml"), Some(Duration::from_secs(1))).unwrap();

        assert_eq!(watcher.debounce_delay(), Duration::from_secs(1));
    }
}
