// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration source trait definition.
//!
//! A `ConfigSource` is the builder-facing half of a provider: it carries the
//! source-specific settings (path, prefix, initial data, ...) and creates the
//! provider when [`ConfigBuilder::build`](crate::service::ConfigBuilder::build)
//! runs. Sources may read cross-cutting settings such as the base path from the
//! builder's property bag at that point.

use crate::domain::Result;
use crate::ports::ConfigProvider;
use crate::service::ConfigBuilder;
use std::sync::Arc;

/// Factory for a [`ConfigProvider`].
///
/// # Examples
///
/// ```rust
/// use layercfg::domain::{ProviderData, Result};
/// use layercfg::ports::{ConfigProvider, ConfigSource};
/// use layercfg::service::ConfigBuilder;
/// use std::sync::Arc;
///
/// struct Empty {
///     data: ProviderData,
/// }
///
/// impl ConfigProvider for Empty {
///     fn name(&self) -> &str { "empty" }
///     fn data(&self) -> &ProviderData { &self.data }
/// }
///
/// struct EmptySource;
///
/// impl ConfigSource for EmptySource {
///     fn build(&self, _builder: &ConfigBuilder) -> Result<Arc<dyn ConfigProvider>> {
///         Ok(Arc::new(Empty { data: ProviderData::new() }))
///     }
/// }
///
/// let root = ConfigBuilder::new().add(EmptySource).build().unwrap();
/// assert_eq!(root.providers().len(), 1);
/// ```
pub trait ConfigSource: Send + Sync {
    /// Creates the provider this source describes.
    ///
    /// The provider is not loaded yet; the root loads every provider in order
    /// once all of them have been built.
    fn build(&self, builder: &ConfigBuilder) -> Result<Arc<dyn ConfigProvider>>;
}

/// An already constructed provider can be added to a builder directly.
impl ConfigSource for Arc<dyn ConfigProvider> {
    fn build(&self, _builder: &ConfigBuilder) -> Result<Arc<dyn ConfigProvider>> {
        Ok(Arc::clone(self))
    }
}
