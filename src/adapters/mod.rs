// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapters layer containing configuration provider implementations.
//!
//! Each adapter pairs a `ConfigSource` (the recipe registered on a builder) with
//! the `ConfigProvider` it produces.

#[cfg(feature = "cli")]
pub mod cli;
#[cfg(feature = "env")]
pub mod env_var;
pub mod file;
#[cfg(feature = "json")]
pub mod json_file;
pub mod memory;
#[cfg(feature = "refresh")]
pub mod refresh;
#[cfg(feature = "yaml")]
pub mod yaml_file;

pub mod watchers;

pub use file::{FileConfigProvider, FileLoadErrorContext, FileLoadErrorHandler, FileSource};
pub use memory::{MemoryConfigProvider, MemoryConfigSource};

// Re-export adapters based on feature flags
#[cfg(feature = "cli")]
pub use cli::{CommandLineProvider, CommandLineSource};
#[cfg(feature = "env")]
pub use env_var::{EnvVarProvider, EnvVarSource};
#[cfg(feature = "json")]
pub use json_file::{JsonFileSource, JsonParser};
#[cfg(feature = "refresh")]
pub use refresh::{RefreshSource, RefreshingProvider};
#[cfg(feature = "reload")]
pub use watchers::FileWatcher;
#[cfg(feature = "yaml")]
pub use yaml_file::{YamlFileSource, YamlParser};
