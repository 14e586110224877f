// SPDX-License-Identifier: MIT OR Apache-2.0

//! The composite configuration root.
//!
//! A [`ConfigRoot`] owns an ordered list of providers. Reads scan the providers
//! from the most recently added to the first and return the first hit, so the
//! provider added last wins. Writes go to every provider. The root also owns the
//! reload token observers use to learn about reloads, whether triggered through
//! [`ConfigRoot::reload`] or by a provider reloading on its own.

use crate::domain::config_path;
use crate::domain::{
    compare_keys, on_change, ChangeSubscription, ChangeToken, ConfigError, ReloadTrigger, Result,
};
use crate::ports::{ConfigProvider, Configuration};
use crate::service::section::{collect_entries, ConfigSection};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

struct RootInner {
    providers: Vec<Arc<dyn ConfigProvider>>,
    trigger: Arc<ReloadTrigger>,
    _subscriptions: Vec<ChangeSubscription>,
}

/// The root of a configuration tree.
///
/// Cloning a root is cheap and yields another handle to the same providers;
/// sections hold such a handle.
///
/// # Examples
///
/// ```rust
/// use layercfg::prelude::*;
///
/// # fn main() -> Result<()> {
/// let root = ConfigBuilder::new()
///     .with_in_memory([("Logging:Level", "info"), ("Port", "80")])
///     .with_in_memory([("port", "8080")])
///     .build()?;
///
/// assert_eq!(root.get("PORT").as_deref(), Some("8080"));
/// assert_eq!(root.section("Logging").get("level").as_deref(), Some("info"));
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ConfigRoot {
    inner: Arc<RootInner>,
}

/// One flattened entry of [`ConfigRoot::debug_entries`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DebugEntry {
    /// The absolute key.
    pub path: String,
    /// The winning value, if the key has one.
    pub value: Option<String>,
    /// The name of the provider the value comes from.
    pub provider: Option<String>,
}

impl ConfigRoot {
    /// Creates a root over `providers`, loading each of them in order.
    ///
    /// The root subscribes to every provider that exposes its own reload token,
    /// so a provider reloading by itself also fires the root's token.
    pub fn new(providers: Vec<Arc<dyn ConfigProvider>>) -> Result<Self> {
        let trigger = Arc::new(ReloadTrigger::new());
        let mut subscriptions = Vec::new();

        for provider in &providers {
            provider.load()?;
            tracing::debug!(
                "Loaded provider '{}' ({} entries)",
                provider.name(),
                provider.data().len()
            );

            if provider.reload_token().is_some() {
                let source = Arc::clone(provider);
                let root_trigger = Arc::clone(&trigger);
                let name = provider.name().to_string();
                subscriptions.push(on_change(
                    move || source.reload_token().unwrap_or_else(ChangeToken::never),
                    move || {
                        tracing::debug!("Provider '{}' reloaded; notifying root observers", name);
                        root_trigger.fire();
                    },
                ));
            }
        }

        Ok(Self {
            inner: Arc::new(RootInner {
                providers,
                trigger,
                _subscriptions: subscriptions,
            }),
        })
    }

    /// Returns the providers in the order they were added.
    pub fn providers(&self) -> &[Arc<dyn ConfigProvider>] {
        &self.inner.providers
    }

    /// Reloads every provider in order and then fires the reload token.
    ///
    /// The first provider error aborts the reload and is returned; the token
    /// does not fire in that case.
    pub fn reload(&self) -> Result<()> {
        for provider in &self.inner.providers {
            provider.load()?;
        }
        tracing::debug!("Reloaded {} providers", self.inner.providers.len());
        self.inner.trigger.fire();
        Ok(())
    }

    /// Returns the section at `key`, or an error if it has neither a value nor
    /// children.
    pub fn required_section(&self, key: &str) -> Result<ConfigSection> {
        let section = self.section(key);
        if section.exists() {
            Ok(section)
        } else {
            Err(ConfigError::ConfigKeyNotFound {
                key: key.to_string(),
            })
        }
    }

    /// Returns every key of the tree that has a value, with the winning value,
    /// in natural key order.
    pub fn entries(&self) -> Vec<(String, String)> {
        let mut entries = collect_entries(self, None);
        entries.sort_by(|a, b| compare_keys(&a.0, &b.0));
        entries
    }

    /// Returns every node of the tree together with the provider that supplies
    /// its value, in depth-first order.
    pub fn debug_entries(&self) -> Vec<DebugEntry> {
        let mut entries = Vec::new();
        self.walk_debug(self.children(), &mut entries);
        entries
    }

    fn walk_debug(&self, sections: Vec<ConfigSection>, out: &mut Vec<DebugEntry>) {
        for section in sections {
            let (value, provider) = match self.winning_provider(section.path()) {
                Some((value, provider)) => (value, Some(provider)),
                None => (None, None),
            };
            out.push(DebugEntry {
                path: section.path().to_string(),
                value,
                provider,
            });
            self.walk_debug(section.children(), out);
        }
    }

    fn winning_provider(&self, key: &str) -> Option<(Option<String>, String)> {
        self.inner
            .providers
            .iter()
            .rev()
            .find_map(|provider| {
                provider
                    .try_get(key)
                    .map(|value| (value, provider.name().to_string()))
            })
    }

    /// Renders the tree as indented text, one node per line, naming the provider
    /// each value comes from.
    ///
    /// ```text
    /// Logging:
    ///   Level=info (memory)
    /// Port=8080 (memory)
    /// ```
    pub fn debug_view(&self) -> String {
        let mut view = String::new();
        for entry in self.debug_entries() {
            let depth = entry.path.matches(config_path::KEY_DELIMITER).count();
            let indent = "  ".repeat(depth);
            let key = config_path::last_segment(&entry.path);
            match (entry.value, entry.provider) {
                (Some(value), Some(provider)) => {
                    view.push_str(&format!("{}{}={} ({})\n", indent, key, value, provider))
                }
                _ => view.push_str(&format!("{}{}:\n", indent, key)),
            }
        }
        view
    }

    pub(crate) fn children_of(&self, parent_path: Option<&str>) -> Vec<ConfigSection> {
        self.inner
            .providers
            .iter()
            .fold(Vec::new(), |keys, provider| {
                provider.child_keys(keys, parent_path)
            })
            .into_iter()
            .map(|key| match parent_path {
                Some(parent) => self.section(&config_path::combine([parent, key.as_str()])),
                None => self.section(&key),
            })
            .collect()
    }
}

impl Configuration for ConfigRoot {
    fn get(&self, key: &str) -> Option<String> {
        self.inner
            .providers
            .iter()
            .rev()
            .find_map(|provider| provider.try_get(key))
            .flatten()
    }

    fn set(&self, key: &str, value: Option<&str>) -> Result<()> {
        if key.is_empty() {
            return Err(ConfigError::EmptyKey { operation: "set" });
        }
        if self.inner.providers.is_empty() {
            return Err(ConfigError::NoSources {
                key: key.to_string(),
            });
        }
        for provider in &self.inner.providers {
            provider.set(key, value);
        }
        Ok(())
    }

    fn section(&self, key: &str) -> ConfigSection {
        ConfigSection::new(self.clone(), key.to_string())
    }

    fn children(&self) -> Vec<ConfigSection> {
        self.children_of(None)
    }

    fn reload_token(&self) -> ChangeToken {
        self.inner.trigger.token()
    }
}

impl fmt::Debug for ConfigRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self
            .inner
            .providers
            .iter()
            .map(|provider| provider.name())
            .collect();
        f.debug_struct("ConfigRoot")
            .field("providers", &names)
            .finish()
    }
}
