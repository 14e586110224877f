// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared test utilities and a mock provider.

#![allow(dead_code)]

use layercfg::domain::{insert_unique, ConfigData, ConfigError, ProviderData, ReloadTrigger, Result};
use layercfg::prelude::*;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// A provider whose backing data can be changed between loads.
///
/// `load` copies the backing entries into the provider data, so tests can
/// simulate a file or remote store changing underneath the root.
#[derive(Debug)]
pub struct MockProvider {
    name: String,
    backing: Mutex<Vec<(String, String)>>,
    data: ProviderData,
    loads: AtomicUsize,
    fail_load: AtomicBool,
    trigger: Option<ReloadTrigger>,
}

impl MockProvider {
    /// Creates an empty mock provider.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            backing: Mutex::new(Vec::new()),
            data: ProviderData::new(),
            loads: AtomicUsize::new(0),
            fail_load: AtomicBool::new(false),
            trigger: None,
        }
    }

    /// Adds a backing entry.
    pub fn with_value(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.backing_mut().push((key.into(), value.into()));
        self
    }

    /// Gives the provider its own reload token, fired after each load.
    pub fn with_reload_token(mut self) -> Self {
        self.trigger = Some(ReloadTrigger::new());
        self
    }

    /// Wraps the provider for registration on a builder.
    pub fn shared(self) -> Arc<MockProvider> {
        Arc::new(self)
    }

    /// Replaces the backing entries; visible after the next load.
    pub fn set_backing(&self, entries: &[(&str, &str)]) {
        *self.backing_mut() = entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
    }

    /// Makes subsequent loads fail.
    pub fn fail_loads(&self, fail: bool) {
        self.fail_load.store(fail, Ordering::SeqCst);
    }

    /// Number of times `load` ran.
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    fn backing_mut(&self) -> std::sync::MutexGuard<'_, Vec<(String, String)>> {
        self.backing.lock().unwrap()
    }
}

impl ConfigProvider for MockProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn data(&self) -> &ProviderData {
        &self.data
    }

    fn load(&self) -> Result<()> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        if self.fail_load.load(Ordering::SeqCst) {
            return Err(ConfigError::SourceError {
                source_name: self.name.clone(),
                message: "Mock load failure".to_string(),
                source: None,
            });
        }

        let mut entries = ConfigData::new();
        for (key, value) in self.backing_mut().iter() {
            insert_unique(&mut entries, &self.name, key.as_str(), Some(value.clone()))?;
        }
        self.data.replace(entries);

        if let Some(trigger) = &self.trigger {
            trigger.fire();
        }
        Ok(())
    }

    fn reload_token(&self) -> Option<ChangeToken> {
        self.trigger.as_ref().map(ReloadTrigger::token)
    }
}

/// Builds a root over the given mock providers, in order.
pub fn root_over(providers: &[&Arc<MockProvider>]) -> ConfigRoot {
    providers
        .iter()
        .fold(ConfigBuilder::new(), |builder, provider| {
            let provider: Arc<dyn ConfigProvider> = (*provider).clone();
            builder.add(provider)
        })
        .build()
        .unwrap()
}

/// Creates a temporary file with the given content and extension.
pub fn temp_file(content: &str, suffix: &str) -> tempfile::NamedTempFile {
    use std::io::Write;
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    write!(file, "{}", content).unwrap();
    file.flush().unwrap();
    file
}

/// Counts how often a callback ran.
#[derive(Debug, Clone, Default)]
pub struct Counter(Arc<AtomicUsize>);

impl Counter {
    /// Returns a callback that increments the counter.
    pub fn callback(&self) -> impl Fn() + Send + Sync + 'static {
        let count = Arc::clone(&self.0);
        move || {
            count.fetch_add(1, Ordering::SeqCst);
        }
    }

    /// The current count.
    pub fn get(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}
