// SPDX-License-Identifier: MIT OR Apache-2.0

//! Builder for a [`ConfigRoot`].
//!
//! The builder collects sources in order and, on [`ConfigBuilder::build`], asks
//! each to create its provider. A [`BuilderProperties`] bag carries settings
//! shared between sources, such as the base directory relative file paths
//! resolve against.

use crate::adapters::file::FileLoadErrorHandler;
use crate::adapters::memory::MemoryConfigSource;
use crate::domain::Result;
use crate::ports::ConfigSource;
use crate::service::ConfigRoot;
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

const BASE_PATH_KEY: &str = "FileProvider:BasePath";
const FILE_LOAD_ERROR_HANDLER_KEY: &str = "FileProvider:LoadErrorHandler";

/// A string-keyed bag of shared builder settings.
///
/// Values are stored type-erased and read back with [`BuilderProperties::get`],
/// which returns `None` when the key is missing or holds another type.
#[derive(Clone, Default)]
pub struct BuilderProperties {
    values: HashMap<String, Arc<dyn Any + Send + Sync>>,
}

impl BuilderProperties {
    /// Stores `value` under `key`, replacing any previous value.
    pub fn insert<T: Any + Send + Sync>(&mut self, key: impl Into<String>, value: T) {
        self.values.insert(key.into(), Arc::new(value));
    }

    /// Returns the value under `key` if it has type `T`.
    pub fn get<T: Any + Send + Sync>(&self, key: &str) -> Option<&T> {
        self.values.get(key).and_then(|value| value.downcast_ref::<T>())
    }

    /// Removes the value under `key`.
    pub fn remove(&mut self, key: &str) -> bool {
        self.values.remove(key).is_some()
    }

    /// Returns `true` if anything is stored under `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }
}

impl fmt::Debug for BuilderProperties {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.values.keys()).finish()
    }
}

/// Builder for constructing a [`ConfigRoot`].
///
/// Sources added later take precedence over sources added earlier.
///
/// # Examples
///
/// ```rust
/// use layercfg::prelude::*;
///
/// # fn main() -> Result<()> {
/// let root = ConfigBuilder::new()
///     .with_in_memory([("Server:Port", "80")])
///     .with_cli_args(["--Server:Port=8080"])
///     .build()?;
///
/// assert_eq!(root.get("server:port").as_deref(), Some("8080"));
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct ConfigBuilder {
    sources: Vec<Box<dyn ConfigSource>>,
    properties: BuilderProperties,
}

impl ConfigBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder with the conventional sources for an application: an
    /// optional YAML file from the per-user config directory, followed by
    /// environment variables.
    #[cfg(all(feature = "yaml", feature = "env"))]
    pub fn with_defaults(qualifier: &str, organization: &str, application: &str) -> Self {
        use crate::adapters::yaml_file::YamlFileSource;

        let mut builder = Self::new();
        match YamlFileSource::from_default_location(qualifier, organization, application) {
            Some(source) => builder = builder.add(source.optional(true)),
            None => tracing::debug!("No per-user configuration directory; skipping YAML file"),
        }
        builder.with_env_vars()
    }

    /// Appends a source.
    pub fn add<S: ConfigSource + 'static>(self, source: S) -> Self {
        self.with_source(Box::new(source))
    }

    /// Appends a boxed source.
    pub fn with_source(mut self, source: Box<dyn ConfigSource>) -> Self {
        self.sources.push(source);
        self
    }

    /// Appends an in-memory provider holding `entries`.
    ///
    /// Duplicate keys among `entries` make [`build`](ConfigBuilder::build) fail.
    pub fn with_in_memory<I, K, V>(self, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.add(MemoryConfigSource::new(entries))
    }

    /// Appends every environment variable of the process.
    #[cfg(feature = "env")]
    pub fn with_env_vars(self) -> Self {
        self.add(crate::adapters::env_var::EnvVarSource::new())
    }

    /// Appends the environment variables starting with `prefix`, with the
    /// prefix removed from their keys.
    #[cfg(feature = "env")]
    pub fn with_env_prefix(self, prefix: impl Into<String>) -> Self {
        self.add(crate::adapters::env_var::EnvVarSource::with_prefix(prefix))
    }

    /// Appends command-line arguments.
    #[cfg(feature = "cli")]
    pub fn with_cli_args<I, S>(self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.add(crate::adapters::cli::CommandLineSource::new(args))
    }

    /// Appends a required YAML file.
    #[cfg(feature = "yaml")]
    pub fn with_yaml_file(self, path: impl Into<PathBuf>) -> Self {
        self.add(crate::adapters::yaml_file::YamlFileSource::new(path))
    }

    /// Appends a required JSON file.
    #[cfg(feature = "json")]
    pub fn with_json_file(self, path: impl Into<PathBuf>) -> Self {
        self.add(crate::adapters::json_file::JsonFileSource::new(path))
    }

    /// Sets the directory relative file paths are resolved against.
    pub fn set_base_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.properties.insert(BASE_PATH_KEY, path.into());
        self
    }

    /// The directory relative file paths are resolved against, if set.
    pub fn base_path(&self) -> Option<&Path> {
        self.properties
            .get::<PathBuf>(BASE_PATH_KEY)
            .map(PathBuf::as_path)
    }

    /// Sets the handler file providers consult when a load fails and they have
    /// no handler of their own.
    pub fn set_file_load_error_handler(mut self, handler: FileLoadErrorHandler) -> Self {
        self.properties.insert(FILE_LOAD_ERROR_HANDLER_KEY, handler);
        self
    }

    /// The shared file load error handler, if set.
    pub fn file_load_error_handler(&self) -> Option<FileLoadErrorHandler> {
        self.properties
            .get::<FileLoadErrorHandler>(FILE_LOAD_ERROR_HANDLER_KEY)
            .cloned()
    }

    /// The shared property bag.
    pub fn properties(&self) -> &BuilderProperties {
        &self.properties
    }

    /// The shared property bag, for sources that define their own settings.
    pub fn properties_mut(&mut self) -> &mut BuilderProperties {
        &mut self.properties
    }

    /// The sources added so far.
    pub fn sources(&self) -> &[Box<dyn ConfigSource>] {
        &self.sources
    }

    /// Creates every provider in order and loads them into a new root.
    pub fn build(&self) -> Result<ConfigRoot> {
        let providers = self
            .sources
            .iter()
            .map(|source| source.build(self))
            .collect::<Result<Vec<_>>>()?;
        ConfigRoot::new(providers)
    }
}

impl fmt::Debug for ConfigBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigBuilder")
            .field("sources", &self.sources.len())
            .field("properties", &self.properties)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::Configuration;

    #[test]
    fn test_builder_empty() {
        let root = ConfigBuilder::new().build().unwrap();
        assert!(root.providers().is_empty());
        assert!(root.children().is_empty());
    }

    #[test]
    fn test_builder_keeps_source_order() {
        let root = ConfigBuilder::new()
            .with_in_memory([("Key", "first")])
            .with_in_memory([("Key", "second")])
            .build()
            .unwrap();

        assert_eq!(root.providers().len(), 2);
        assert_eq!(root.get("key").as_deref(), Some("second"));
    }

    #[test]
    fn test_builder_can_build_twice() {
        let builder = ConfigBuilder::new().with_in_memory([("Key", "v")]);
        let first = builder.build().unwrap();
        let second = builder.build().unwrap();

        first.set("Key", Some("changed")).unwrap();

        assert_eq!(second.get("Key").as_deref(), Some("v"));
    }

    #[test]
    fn test_builder_duplicate_in_memory_keys_fail() {
        let result = ConfigBuilder::new()
            .with_in_memory([("Key", "a"), ("KEY", "b")])
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_properties_typed_access() {
        let mut props = BuilderProperties::default();
        props.insert("answer", 42u32);

        assert_eq!(props.get::<u32>("answer"), Some(&42));
        assert_eq!(props.get::<String>("answer"), None);
        assert!(props.remove("answer"));
        assert!(!props.contains("answer"));
    }

    #[test]
    fn test_base_path_helper() {
        let builder = ConfigBuilder::new().set_base_path("/etc/app");
        assert_eq!(builder.base_path(), Some(Path::new("/etc/app")));
        assert!(builder.file_load_error_handler().is_none());
    }
}
