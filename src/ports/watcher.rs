// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration watcher trait definition.
//!
//! This module defines the `ConfigWatcher` trait, the file-watch primitive a
//! reloading file provider sits on. The watcher only reports that a watched
//! file changed; the provider decides what a change means.

use crate::domain::Result;
use std::path::Path;
use std::sync::Arc;

/// Callback invoked with the path of the file that changed.
///
/// It runs on the watcher's own thread and may block while a reload completes.
pub type WatchCallback = Arc<dyn Fn(&Path) + Send + Sync>;

/// A trait for watching configuration files for changes.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` so the owning provider can be shared.
///
/// # Examples
///
/// ```rust
/// use layercfg::domain::Result;
/// use layercfg::ports::{ConfigWatcher, WatchCallback};
///
/// struct NeverChanges {
///     running: bool,
/// }
///
/// impl ConfigWatcher for NeverChanges {
///     fn watch(&mut self, _callback: WatchCallback) -> Result<()> {
///         self.running = true;
///         Ok(())
///     }
///
///     fn stop(&mut self) -> Result<()> {
///         self.running = false;
///         Ok(())
///     }
/// }
/// ```
pub trait ConfigWatcher: Send + Sync {
    /// Starts watching and invokes `callback` for every (debounced) change.
    ///
    /// Fails if the watcher is already running.
    fn watch(&mut self, callback: WatchCallback) -> Result<()>;

    /// Stops watching. No callback runs after this returns.
    fn stop(&mut self) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::sync::Mutex;

    struct ManualWatcher {
        callback: Option<WatchCallback>,
    }

    impl ManualWatcher {
        fn touch(&self, path: &Path) {
            if let Some(callback) = &self.callback {
                callback(path);
            }
        }
    }

    impl ConfigWatcher for ManualWatcher {
        fn watch(&mut self, callback: WatchCallback) -> Result<()> {
            self.callback = Some(callback);
            Ok(())
        }

        fn stop(&mut self) -> Result<()> {
            self.callback = None;
            Ok(())
        }
    }

    #[test]
    fn test_watcher_callback_receives_path() {
        let seen = Arc::new(Mutex::new(Vec::<PathBuf>::new()));
        let sink = Arc::clone(&seen);
        let mut watcher = ManualWatcher { callback: None };

        watcher
            .watch(Arc::new(move |path: &Path| {
                sink.lock().unwrap().push(path.to_path_buf());
            }))
            .unwrap();
        watcher.touch(Path::new("app.yaml"));
        watcher.stop().unwrap();
        watcher.touch(Path::new("ignored.yaml"));

        assert_eq!(*seen.lock().unwrap(), vec![PathBuf::from("app.yaml")]);
    }

    #[test]
    fn test_watcher_is_send_sync() {
        fn assert_send_sync<T: Send + Sync + ?Sized>() {}
        assert_send_sync::<dyn ConfigWatcher>();
    }
}
