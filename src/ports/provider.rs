// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration provider trait definition.
//!
//! This module defines the `ConfigProvider` trait, the contract every source of
//! flat key/value data implements. A [`ConfigRoot`](crate::service::ConfigRoot)
//! holds an ordered list of providers and never touches their data directly.

use crate::domain::{ChangeToken, ProviderData, Result};

/// A single ordered source of flat key/value configuration data.
///
/// Providers own their data exclusively. Methods take `&self`; implementations
/// keep their entries in a [`ProviderData`], which synchronizes concurrent
/// `set` calls with reloads running on a background thread.
///
/// Only [`name`](ConfigProvider::name) and [`data`](ConfigProvider::data) are
/// required. The remaining methods have defaults that delegate to the data map,
/// which is what every provider in this crate does for lookups and writes.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` so a root can be shared across threads
/// and reloaded from a watcher thread.
///
/// # Examples
///
/// ```rust
/// use layercfg::domain::{ProviderData, Result};
/// use layercfg::ports::ConfigProvider;
///
/// struct Fixed {
///     data: ProviderData,
/// }
///
/// impl ConfigProvider for Fixed {
///     fn name(&self) -> &str {
///         "fixed"
///     }
///
///     fn data(&self) -> &ProviderData {
///         &self.data
///     }
///
///     fn load(&self) -> Result<()> {
///         self.data.set("App:Name", Some("demo"));
///         Ok(())
///     }
/// }
///
/// let provider = Fixed { data: ProviderData::new() };
/// provider.load().unwrap();
/// assert_eq!(provider.try_get("app:name"), Some(Some("demo".to_string())));
/// ```
pub trait ConfigProvider: Send + Sync {
    /// Returns a short identifier used in logs, errors and
    /// [`ConfigRoot::debug_view`](crate::service::ConfigRoot::debug_view).
    fn name(&self) -> &str;

    /// Returns the provider's own entries.
    fn data(&self) -> &ProviderData;

    /// (Re)populates the data from the backing source.
    ///
    /// A reload must replace the previous entries wholesale so that keys removed
    /// from the source disappear. Providers without a backing source keep the
    /// default no-op.
    fn load(&self) -> Result<()> {
        Ok(())
    }

    /// Looks up `key` case-insensitively in this provider only.
    ///
    /// Returns `None` when the key is absent and `Some(None)` when the key exists
    /// without a scalar value.
    fn try_get(&self, key: &str) -> Option<Option<String>> {
        self.data().try_get(key)
    }

    /// Inserts or overwrites `key`, or removes it when `value` is `None`.
    fn set(&self, key: &str, value: Option<&str>) {
        self.data().set(key, value)
    }

    /// Returns the immediate child segments under `parent_path` merged with the
    /// segments `earlier_keys` already collected from other providers.
    ///
    /// The result is de-duplicated case-insensitively and sorted with numeric
    /// segments first.
    fn child_keys(&self, earlier_keys: Vec<String>, parent_path: Option<&str>) -> Vec<String> {
        self.data().child_keys(earlier_keys, parent_path)
    }

    /// Returns a token that fires when this provider reloads on its own.
    ///
    /// Providers that only change through explicit [`load`](ConfigProvider::load)
    /// calls return `None`, and the root does not subscribe to them.
    fn reload_token(&self) -> Option<ChangeToken> {
        None
    }
}
