// SPDX-License-Identifier: MIT OR Apache-2.0

//! The read/write view shared by the configuration root and its sections.

use crate::domain::{ChangeToken, Result};
use crate::service::ConfigSection;

/// A node of the configuration tree.
///
/// Implemented by [`ConfigRoot`](crate::service::ConfigRoot) and
/// [`ConfigSection`]. Keys passed to these methods are relative to the node; a
/// section prefixes them with its own path before consulting the root.
///
/// The object binder consumes `&dyn Configuration`, so anything that can answer
/// these questions can be bound from.
pub trait Configuration: Send + Sync {
    /// Returns the value of `key` from the provider added last that has it.
    fn get(&self, key: &str) -> Option<String>;

    /// Writes `key` into every provider, or removes it when `value` is `None`.
    ///
    /// Fails with [`ConfigError::NoSources`](crate::domain::ConfigError::NoSources)
    /// when there are no providers and
    /// [`ConfigError::EmptyKey`](crate::domain::ConfigError::EmptyKey) when the
    /// resulting absolute key is empty.
    fn set(&self, key: &str, value: Option<&str>) -> Result<()>;

    /// Returns the section at `key`. Never fails; the section may be empty.
    fn section(&self, key: &str) -> ConfigSection;

    /// Returns the immediate child sections in natural key order.
    fn children(&self) -> Vec<ConfigSection>;

    /// Returns the current, not yet fired, reload token of the root.
    fn reload_token(&self) -> ChangeToken;

    /// The node's own scalar value. The root never has one.
    fn value(&self) -> Option<String> {
        None
    }

    /// The node's absolute path. Empty for the root.
    fn path(&self) -> &str {
        ""
    }
}
