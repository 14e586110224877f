// SPDX-License-Identifier: MIT OR Apache-2.0

//! Layered configuration with precedence, reload notification and typed binding.
//!
//! A [`ConfigRoot`](service::ConfigRoot) composes an ordered list of providers
//! into one hierarchical, case-insensitive key space. Keys are `:`-separated
//! paths; the provider added last wins when several define the same key.
//! Sections are cheap path-scoped views over the root, and the binder projects
//! any node of the tree onto typed Rust values.
//!
//! # Architecture
//!
//! The crate follows hexagonal architecture principles:
//!
//! - **Domain Layer**: keys and paths, provider data, change tokens and errors
//! - **Ports**: the traits providers, sources, parsers, watchers and views implement
//! - **Adapters**: in-memory, environment, command-line and file providers
//! - **Service**: the builder, the composite root and sections
//! - **Binder**: typed projection of configuration onto values and structs
//!
//! # Feature Flags
//!
//! - `yaml`: YAML file support (default)
//! - `json`: JSON file support (default)
//! - `env`: environment variable support (default)
//! - `cli`: command-line argument support, including `clap` matches (default)
//! - `reload`: reload files when they change on disk
//! - `refresh`: periodic reload of any provider on a tokio runtime
//! - `full`: enable all features
//!
//! # Quick Start
//!
//! ```rust
//! use layercfg::prelude::*;
//!
//! # fn main() -> Result<()> {
//! let root = ConfigBuilder::new()
//!     .with_in_memory([("Logging:Level", "info"), ("Server:Port", "8080")])
//!     .with_in_memory([("logging:level", "debug")])
//!     .build()?;
//!
//! // The later provider wins, and keys ignore case.
//! assert_eq!(root.get("LOGGING:LEVEL").as_deref(), Some("debug"));
//!
//! let server = root.section("Server");
//! assert_eq!(server.get_value_or("Port", 80u16)?, 8080);
//! # Ok(())
//! # }
//! ```
//!
//! # Change notification
//!
//! ```rust
//! use layercfg::prelude::*;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use std::sync::Arc;
//!
//! # fn main() -> Result<()> {
//! let root = ConfigBuilder::new().with_in_memory([("a", "1")]).build()?;
//! let reloads = Arc::new(AtomicUsize::new(0));
//!
//! let counter = Arc::clone(&reloads);
//! let source = root.clone();
//! let _subscription = on_change(
//!     move || source.reload_token(),
//!     move || {
//!         counter.fetch_add(1, Ordering::SeqCst);
//!     },
//! );
//!
//! root.reload()?;
//! root.reload()?;
//! assert_eq!(reloads.load(Ordering::SeqCst), 2);
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![warn(clippy::all)]

pub mod adapters;
pub mod binder;
pub mod domain;
pub mod ports;
pub mod service;

/// Commonly used types and traits.
///
/// This module re-exports the most commonly used types and traits for convenient access.
pub mod prelude {
    pub use crate::binder::{Bind, BindObject, BinderOptions, ConfigurationBinder, ObjectDescriptor};
    pub use crate::domain::{
        on_change, ChangeSubscription, ChangeToken, ConfigError, ConfigKey, Result,
    };
    pub use crate::ports::{ConfigProvider, ConfigSource, Configuration};
    pub use crate::service::{ConfigBuilder, ConfigRoot, ConfigSection};
    pub use crate::{bind_abstract, bind_from_str, bind_object};

    pub use crate::adapters::{MemoryConfigProvider, MemoryConfigSource};

    // Re-export adapters based on feature flags
    #[cfg(feature = "cli")]
    pub use crate::adapters::CommandLineSource;
    #[cfg(feature = "env")]
    pub use crate::adapters::EnvVarSource;
    #[cfg(feature = "json")]
    pub use crate::adapters::JsonFileSource;
    #[cfg(feature = "yaml")]
    pub use crate::adapters::YamlFileSource;
}
