// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory configuration provider.
//!
//! Holds entries supplied by the application itself. Useful for defaults added
//! before other sources and for tests.

use crate::domain::{insert_unique, ConfigData, ProviderData, Result};
use crate::ports::{ConfigProvider, ConfigSource};
use crate::service::ConfigBuilder;
use std::sync::Arc;

const NAME: &str = "memory";

/// Provider over a fixed initial set of entries.
///
/// Loading does nothing, so values written through
/// [`ConfigRoot::set`](crate::ports::Configuration::set) survive a reload.
///
/// # Examples
///
/// ```rust
/// use layercfg::adapters::MemoryConfigProvider;
/// use layercfg::ports::ConfigProvider;
///
/// let provider = MemoryConfigProvider::new([("Db:Host", "localhost")]).unwrap();
/// assert_eq!(provider.try_get("db:host"), Some(Some("localhost".to_string())));
/// ```
#[derive(Debug, Default)]
pub struct MemoryConfigProvider {
    data: ProviderData,
}

impl MemoryConfigProvider {
    /// Creates a provider holding `entries`.
    ///
    /// Fails if two entries have the same key, compared case-insensitively.
    pub fn new<I, K, V>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut data = ConfigData::new();
        for (key, value) in entries {
            insert_unique(&mut data, NAME, key, Some(value.into()))?;
        }
        Ok(Self {
            data: ProviderData::with_entries(data),
        })
    }

    /// Adds or replaces a single entry.
    pub fn add(&self, key: &str, value: &str) {
        self.data.set(key, Some(value));
    }
}

impl ConfigProvider for MemoryConfigProvider {
    fn name(&self) -> &str {
        NAME
    }

    fn data(&self) -> &ProviderData {
        &self.data
    }
}

/// Source for a [`MemoryConfigProvider`]; each build gets its own copy of the
/// entries.
#[derive(Debug, Clone, Default)]
pub struct MemoryConfigSource {
    entries: Vec<(String, String)>,
}

impl MemoryConfigSource {
    /// Creates a source holding `entries`.
    pub fn new<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}

impl ConfigSource for MemoryConfigSource {
    fn build(&self, _builder: &ConfigBuilder) -> Result<Arc<dyn ConfigProvider>> {
        Ok(Arc::new(MemoryConfigProvider::new(self.entries.clone())?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ConfigError;

    #[test]
    fn test_memory_provider_name() {
        let provider = MemoryConfigProvider::default();
        assert_eq!(provider.name(), "memory");
    }

    #[test]
    fn test_memory_provider_get() {
        let provider = MemoryConfigProvider::new([("A:B", "1")]).unwrap();
        assert_eq!(provider.try_get("a:b"), Some(Some("1".to_string())));
        assert_eq!(provider.try_get("a"), None);
    }

    #[test]
    fn test_memory_provider_duplicate_keys() {
        let err = MemoryConfigProvider::new([("Key", "1"), ("kEY", "2")]).unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateKey { .. }));
    }

    #[test]
    fn test_memory_provider_load_keeps_writes() {
        let provider = MemoryConfigProvider::new([("Key", "1")]).unwrap();
        provider.add("Other", "2");
        provider.load().unwrap();

        assert_eq!(provider.try_get("other"), Some(Some("2".to_string())));
    }
}
