// SPDX-License-Identifier: MIT OR Apache-2.0

//! The flat key/value map owned by a single provider.
//!
//! Every provider in this crate embeds a [`ProviderData`] and delegates the
//! lookup, write and child-enumeration parts of the provider contract to it.

use crate::domain::change_token::{ChangeToken, ReloadTrigger};
use crate::domain::config_key::{compare_segments, keys_equal, ConfigKey};
use crate::domain::config_path::KEY_DELIMITER;
use crate::domain::errors::{ConfigError, Result};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// A provider's entries: case-insensitive keys, values that may be absent.
///
/// An absent value marks a key that exists as a section without a scalar of
/// its own (for example an empty object in a JSON document).
pub type ConfigData = HashMap<ConfigKey, Option<String>>;

/// Inserts an entry, failing if the key (compared case-insensitively) is
/// already present.
///
/// Loaders use this instead of plain `insert` so the same flattened key never
/// silently overwrites an earlier one within a single document.
///
/// # Examples
///
/// ```
/// use layercfg::domain::provider_data::{insert_unique, ConfigData};
///
/// let mut data = ConfigData::new();
/// insert_unique(&mut data, "memory", "Key", Some("a".to_string())).unwrap();
/// assert!(insert_unique(&mut data, "memory", "KEY", Some("b".to_string())).is_err());
/// ```
pub fn insert_unique(
    data: &mut ConfigData,
    source_name: &str,
    key: impl Into<String>,
    value: Option<String>,
) -> Result<()> {
    match data.entry(ConfigKey::from(key.into())) {
        Entry::Occupied(existing) => Err(ConfigError::DuplicateKey {
            source_name: source_name.to_string(),
            key: existing.key().to_string(),
        }),
        Entry::Vacant(slot) => {
            slot.insert(value);
            Ok(())
        }
    }
}

/// Thread-safe storage for one provider's entries plus its reload signal.
///
/// Reads take a shared lock; `set` and `replace` take the exclusive lock, so a
/// reload swapping in a new map never interleaves with a concurrent write.
#[derive(Debug, Default)]
pub struct ProviderData {
    entries: RwLock<ConfigData>,
    trigger: ReloadTrigger,
}

impl ProviderData {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a map pre-populated with `entries`.
    pub fn with_entries(entries: ConfigData) -> Self {
        Self {
            entries: RwLock::new(entries),
            trigger: ReloadTrigger::new(),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, ConfigData> {
        self.entries
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, ConfigData> {
        self.entries
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Looks up `key` case-insensitively.
    ///
    /// Returns `None` when the key is absent and `Some(None)` when it is present
    /// without a value.
    pub fn try_get(&self, key: &str) -> Option<Option<String>> {
        self.read().get(&ConfigKey::from(key)).cloned()
    }

    /// Inserts or overwrites `key`, or removes it when `value` is `None`.
    ///
    /// An existing entry keeps the casing it was first stored with.
    pub fn set(&self, key: &str, value: Option<&str>) {
        let mut entries = self.write();
        match value {
            Some(value) => match entries.entry(ConfigKey::from(key)) {
                Entry::Occupied(mut existing) => {
                    existing.insert(Some(value.to_string()));
                }
                Entry::Vacant(slot) => {
                    slot.insert(Some(value.to_string()));
                }
            },
            None => {
                entries.remove(&ConfigKey::from(key));
            }
        }
    }

    /// Replaces every entry with `entries`, dropping keys that are gone.
    pub fn replace(&self, entries: ConfigData) {
        *self.write() = entries;
    }

    /// Removes every entry.
    pub fn clear(&self) {
        self.write().clear();
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Returns `true` if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Returns a copy of every entry.
    pub fn snapshot(&self) -> ConfigData {
        self.read().clone()
    }

    /// Returns the immediate child segments below `parent_path`, merged with
    /// `earlier_keys`, de-duplicated and sorted with [`compare_segments`].
    ///
    /// With no parent the first segment of every key is used. Segments that
    /// differ only in case collapse to this provider's spelling, so the latest
    /// provider in a chain decides the casing.
    pub fn child_keys(&self, earlier_keys: Vec<String>, parent_path: Option<&str>) -> Vec<String> {
        let prefix = parent_path.map(|path| format!("{}{}", path, KEY_DELIMITER));
        let mut keys: Vec<String> = {
            let entries = self.read();
            entries
                .keys()
                .filter_map(|key| match &prefix {
                    Some(prefix) => key.strip_prefix_ignore_case(prefix),
                    None => Some(key.as_str()),
                })
                .map(|rest| rest.split(KEY_DELIMITER).next().unwrap_or(rest).to_string())
                .collect()
        };

        keys.extend(earlier_keys);
        keys.sort_by(|a, b| compare_segments(a, b));
        keys.dedup_by(|a, b| keys_equal(a, b));
        keys
    }

    /// Returns the current reload token.
    pub fn reload_token(&self) -> ChangeToken {
        self.trigger.token()
    }

    /// Fires the reload token; call after the new entries are in place.
    pub fn on_reload(&self) {
        self.trigger.fire();
    }
}
