// SPDX-License-Identifier: MIT OR Apache-2.0

use super::convert::conversion_error;
use super::{bind_value, create_value, Bind, BinderOptions};
use crate::domain::Result;
use crate::ports::Configuration;

/// Binding conveniences for every [`Configuration`].
///
/// # Examples
///
/// ```rust
/// use layercfg::prelude::*;
///
/// # fn main() -> Result<()> {
/// let root = ConfigBuilder::new()
///     .with_in_memory([("timeout", "5s"), ("retries", "0x10")])
///     .build()?;
///
/// let timeout: Option<std::time::Duration> = root.get_value("timeout")?;
/// assert_eq!(timeout, Some(std::time::Duration::from_secs(5)));
/// assert_eq!(root.get_value_or("retries", 1u32)?, 16);
/// assert_eq!(root.get_value_or("missing", 1u32)?, 1);
/// # Ok(())
/// # }
/// ```
pub trait ConfigurationBinder: Configuration + Sized {
    /// Binds this node into `target` with default options.
    fn bind<T: Bind>(&self, target: &mut T) -> Result<()> {
        bind_value(target, self, &BinderOptions::default())
    }

    /// Binds this node into `target`.
    fn bind_with<T: Bind>(&self, target: &mut T, options: &BinderOptions) -> Result<()> {
        bind_value(target, self, options)
    }

    /// Creates a `T` from this node, or `None` if the node is empty.
    fn get_as<T: Bind>(&self) -> Result<Option<T>> {
        create_value(self, &BinderOptions::default())
    }

    /// Like [`get_as`](Self::get_as), with explicit options.
    fn get_as_with<T: Bind>(&self, options: &BinderOptions) -> Result<Option<T>> {
        create_value(self, options)
    }

    /// Converts the value at `key`, or returns `None` if it is absent.
    ///
    /// Only leaf values are considered; a type without a string conversion is
    /// a conversion error.
    fn get_value<T: Bind>(&self, key: &str) -> Result<Option<T>> {
        let section = self.section(key);
        let Some(value) = section.value() else {
            return Ok(None);
        };
        match T::convert(&value, section.path()) {
            Some(converted) => converted.map(Some),
            None => Err(conversion_error::<T>(
                &value,
                section.path(),
                "type has no conversion from a string",
            )),
        }
    }

    /// Like [`get_value`](Self::get_value), returning `default` when the key is
    /// absent. Conversion failures are still errors.
    fn get_value_or<T: Bind>(&self, key: &str, default: T) -> Result<T> {
        Ok(self.get_value(key)?.unwrap_or(default))
    }
}

impl<C: Configuration> ConfigurationBinder for C {}
