// SPDX-License-Identifier: MIT OR Apache-2.0

//! Periodic refresh for providers that have no change notification of their own.
//!
//! [`RefreshingProvider`] wraps another provider and calls its `load` on a tokio
//! interval. After every successful load it fires its reload token, so a root
//! built over it reports the refresh to its own subscribers.

use crate::domain::{ChangeToken, ConfigError, ProviderData, ReloadTrigger, Result};
use crate::ports::{ConfigProvider, ConfigSource};
use crate::service::ConfigBuilder;
use std::fmt;
use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::time::{self, MissedTickBehavior};

/// A provider decorator that reloads its inner provider periodically.
///
/// The refresh task runs on the tokio runtime that was current when the
/// provider was started and stops when the provider is dropped.
pub struct RefreshingProvider {
    name: String,
    inner: Arc<dyn ConfigProvider>,
    period: Duration,
    trigger: ReloadTrigger,
    cancel: Mutex<Option<oneshot::Sender<()>>>,
}

impl RefreshingProvider {
    /// Wraps `inner` and starts the refresh task.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(inner: Arc<dyn ConfigProvider>, period: Duration) -> Result<Arc<Self>> {
        let handle = tokio::runtime::Handle::try_current().map_err(|e| ConfigError::SourceError {
            source_name: format!("refresh:{}", inner.name()),
            message: "Periodic refresh requires a running tokio runtime".to_string(),
            source: Some(Box::new(e)),
        })?;

        let (cancel_tx, mut cancel_rx) = oneshot::channel::<()>();
        let provider = Arc::new(Self {
            name: format!("refresh:{}", inner.name()),
            inner,
            period,
            trigger: ReloadTrigger::new(),
            cancel: Mutex::new(Some(cancel_tx)),
        });

        let weak: Weak<Self> = Arc::downgrade(&provider);
        handle.spawn(async move {
            let mut ticker = time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately; the root performs the initial load.
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let Some(provider) = weak.upgrade() else { break };
                        // Loads do blocking I/O; keep them off the runtime's workers.
                        if let Err(e) = tokio::task::spawn_blocking(move || provider.refresh()).await {
                            tracing::warn!("Refresh task failed: {}", e);
                        }
                    }
                    _ = &mut cancel_rx => break,
                }
            }
            tracing::debug!("Refresh task stopped");
        });

        Ok(provider)
    }

    /// The refresh period.
    pub fn period(&self) -> Duration {
        self.period
    }

    /// The wrapped provider.
    pub fn inner(&self) -> &Arc<dyn ConfigProvider> {
        &self.inner
    }

    fn refresh(&self) {
        match self.inner.load() {
            Ok(()) => {
                tracing::debug!("Refreshed configuration from {}", self.inner.name());
                self.trigger.fire();
            }
            Err(e) => tracing::warn!("Failed to refresh {}: {}", self.inner.name(), e),
        }
    }
}

impl ConfigProvider for RefreshingProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn data(&self) -> &ProviderData {
        self.inner.data()
    }

    fn load(&self) -> Result<()> {
        self.inner.load()
    }

    fn try_get(&self, key: &str) -> Option<Option<String>> {
        self.inner.try_get(key)
    }

    fn set(&self, key: &str, value: Option<&str>) {
        self.inner.set(key, value)
    }

    fn child_keys(&self, earlier_keys: Vec<String>, parent_path: Option<&str>) -> Vec<String> {
        self.inner.child_keys(earlier_keys, parent_path)
    }

    fn reload_token(&self) -> Option<ChangeToken> {
        Some(self.trigger.token())
    }
}

impl Drop for RefreshingProvider {
    fn drop(&mut self) {
        let sender = match self.cancel.get_mut() {
            Ok(slot) => slot.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };
        if let Some(tx) = sender {
            let _ = tx.send(());
        }
    }
}

impl fmt::Debug for RefreshingProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RefreshingProvider")
            .field("name", &self.name)
            .field("period", &self.period)
            .finish()
    }
}

/// Source that wraps another source in a [`RefreshingProvider`].
///
/// # Examples
///
/// ```rust,no_run
/// use layercfg::adapters::{RefreshSource, YamlFileSource};
/// use layercfg::prelude::*;
/// use std::time::Duration;
///
/// # #[tokio::main]
/// # async fn main() -> Result<()> {
/// let root = ConfigBuilder::new()
///     .add(RefreshSource::new(
///         YamlFileSource::new("/etc/myapp/config.yaml"),
///         Duration::from_secs(30),
///     ))
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct RefreshSource {
    source: Box<dyn ConfigSource>,
    period: Duration,
}

impl RefreshSource {
    /// Refreshes the providers built by `source` every `period`.
    pub fn new<S: ConfigSource + 'static>(source: S, period: Duration) -> Self {
        Self {
            source: Box::new(source),
            period,
        }
    }
}

impl ConfigSource for RefreshSource {
    fn build(&self, builder: &ConfigBuilder) -> Result<Arc<dyn ConfigProvider>> {
        let inner = self.source.build(builder)?;
        let provider: Arc<dyn ConfigProvider> = RefreshingProvider::start(inner, self.period)?;
        Ok(provider)
    }
}

impl fmt::Debug for RefreshSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RefreshSource")
            .field("period", &self.period)
            .finish_non_exhaustive()
    }
}
